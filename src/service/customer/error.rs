#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("No customer found for this phone number")]
    NotFound,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Registry error: {0}")]
    Provider(String),
}
