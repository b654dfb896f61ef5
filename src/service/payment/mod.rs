mod hash;
mod model;

pub use hash::payment_hash;
pub use model::{PaymentRedirect, PaymentRequest};

use crate::config::PaymentConfig;
use crate::service::invoice::InvoiceDetail;

/// Builds the signed gateway redirect. After the UI submits it the process
/// is expected to unload; control returns only via the gateway's redirect
/// back to the success/failure URL.
#[derive(Clone)]
pub struct PaymentService {
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(config: PaymentConfig) -> Self {
        Self { config }
    }

    pub fn build_redirect(&self, detail: &InvoiceDetail, phone: &str) -> PaymentRedirect {
        let request = PaymentRequest {
            key: self.config.merchant_key.clone(),
            txnid: detail.invoice_id.clone(),
            amount: format_amount(detail.total),
            productinfo: detail.membership.clone(),
            firstname: detail.first_name.clone(),
            email: String::new(),
            phone: phone.to_string(),
            udf1: String::new(),
            udf2: String::new(),
            udf3: String::new(),
            udf4: String::new(),
            udf5: String::new(),
            salt: self.config.salt.clone(),
            surl: self.config.success_url.clone(),
            furl: self.config.failure_url.clone(),
        };

        let hash = payment_hash(&request, &request.salt);

        info!("Built payment redirect for invoice {}", request.txnid);

        let fields = vec![
            ("key".to_string(), request.key),
            ("txnid".to_string(), request.txnid),
            ("amount".to_string(), request.amount),
            ("productinfo".to_string(), request.productinfo),
            ("firstname".to_string(), request.firstname),
            ("email".to_string(), request.email),
            ("phone".to_string(), request.phone),
            ("udf1".to_string(), request.udf1),
            ("udf2".to_string(), request.udf2),
            ("udf3".to_string(), request.udf3),
            ("udf4".to_string(), request.udf4),
            ("udf5".to_string(), request.udf5),
            ("salt".to_string(), request.salt),
            ("surl".to_string(), request.surl),
            ("furl".to_string(), request.furl),
            ("hash".to_string(), hash),
        ];

        PaymentRedirect {
            endpoint: self.config.gateway_url.clone(),
            method: "POST".to_string(),
            fields,
        }
    }
}

/// Whole amounts serialize without a decimal point, matching what the
/// hash and the gateway expect.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> InvoiceDetail {
        InvoiceDetail {
            invoice_id: "inv-1".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "+91 9876543210".to_string(),
            membership: "Gold Membership".to_string(),
            net_price: 15000.0,
            tax: 2700.0,
            total: 17700.0,
        }
    }

    fn service() -> PaymentService {
        PaymentService::new(crate::config::AppConfig::new_test_config().payment)
    }

    #[test]
    fn test_redirect_carries_gateway_field_set_in_order() {
        let redirect = service().build_redirect(&detail(), "9876543210");

        let names: Vec<&str> = redirect.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "key", "txnid", "amount", "productinfo", "firstname", "email", "phone", "udf1", "udf2", "udf3",
                "udf4", "udf5", "salt", "surl", "furl", "hash"
            ]
        );

        assert_eq!(redirect.field("txnid"), Some("inv-1"));
        assert_eq!(redirect.field("amount"), Some("17700"));
        assert_eq!(redirect.field("phone"), Some("9876543210"));
        assert_eq!(redirect.method, "POST");
    }

    #[test]
    fn test_redirect_hash_matches_recomputation() {
        let redirect = service().build_redirect(&detail(), "9876543210");

        let request = PaymentRequest {
            key: "merchant-key".to_string(),
            txnid: "inv-1".to_string(),
            amount: "17700".to_string(),
            productinfo: "Gold Membership".to_string(),
            firstname: "Asha".to_string(),
            email: String::new(),
            phone: "9876543210".to_string(),
            udf1: String::new(),
            udf2: String::new(),
            udf3: String::new(),
            udf4: String::new(),
            udf5: String::new(),
            salt: "salty".to_string(),
            surl: "https://backend.test/api/payment/success".to_string(),
            furl: "https://backend.test/api/payment/failure".to_string(),
        };

        assert_eq!(redirect.field("hash"), Some(payment_hash(&request, "salty").as_str()));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(17700.0), "17700");
        assert_eq!(format_amount(15000.0), "15000");
        assert_eq!(format_amount(99.5), "99.5");
    }
}
