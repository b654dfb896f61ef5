#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to fetch memberships. Please try again later.")]
    Unavailable,
    #[error("Catalog provider error: {0}")]
    Provider(String),
}
