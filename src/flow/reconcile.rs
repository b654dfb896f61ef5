use std::collections::HashMap;
use url::Url;

use super::model::{InvoiceStatus, PaymentOutcome, PaymentStatus};

/// Interprets a gateway redirect-back URL. `None` means there is nothing
/// to reconcile (a normal first load).
pub fn reconcile(return_url: &str) -> Option<PaymentOutcome> {
    let url = Url::parse(return_url).ok()?;
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    let status = params.get("status")?;

    let invoice_status = if params.get("sisinvoiceid").map(String::as_str) == Some("true") {
        InvoiceStatus::Closed
    } else {
        InvoiceStatus::Pending
    };

    Some(PaymentOutcome {
        status: if status == "success" {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failure
        },
        error_message: params.get("error_message").cloned(),
        invoice_status,
        productinfo: params.get("productinfo").cloned(),
        amount: params.get("amount").cloned(),
    })
}
