use serde::{Deserialize, Serialize};

use crate::service::customer::CustomerRecord;
use crate::service::invoice::InvoiceDetail;

/// The persisted slice of a purchase session: who the customer is and, once
/// the invoice detail has arrived, what they are buying. OTP codes and
/// payment secrets are never part of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub membership: Option<String>,
    #[serde(default)]
    pub net_price: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl From<&InvoiceDetail> for CustomerProfile {
    fn from(detail: &InvoiceDetail) -> Self {
        Self {
            first_name: detail.first_name.clone(),
            last_name: detail.last_name.clone(),
            phone: detail.phone.clone(),
            membership: Some(detail.membership.clone()),
            net_price: Some(detail.net_price),
            tax: Some(detail.tax),
            total: Some(detail.total),
        }
    }
}

impl From<&CustomerRecord> for CustomerProfile {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            phone: record.phone.clone(),
            membership: None,
            net_price: None,
            tax: None,
            total: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub guest_info: Option<CustomerProfile>,
    pub modal_visible: bool,
}
