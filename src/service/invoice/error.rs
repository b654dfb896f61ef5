#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("No membership selected")]
    NoPlanSelected,
    #[error("Too many requests")]
    RateLimited,
    #[error("Billing error: {0}")]
    Provider(String),
}
