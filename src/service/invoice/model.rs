use serde::{Deserialize, Serialize};

/// Enriched invoice view: the created invoice joined with its first line
/// item and the customer snapshot. Drives the confirmation view and the
/// payment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub membership: String,
    pub net_price: f64,
    pub tax: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateInvoiceResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
