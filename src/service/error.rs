use crate::storage::StorageError;

use super::catalog::CatalogError;
use super::customer::CustomerError;
use super::http::HttpError;
use super::identity::IdentityError;
use super::invoice::InvoiceError;
use super::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),
    #[error("Invoice error: {0}")]
    Invoice(#[from] InvoiceError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("Other error: {0}")]
    Other(String),
}
