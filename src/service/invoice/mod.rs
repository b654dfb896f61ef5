mod error;
mod model;

pub use error::InvoiceError;
pub use model::InvoiceDetail;

use std::sync::Arc;

use crate::config::BillingConfig;
use crate::service::http::{HttpClient, HttpError};

use model::CreateInvoiceResponse;

/// Creates invoices and fetches the enriched detail view. Rate limits are
/// surfaced, not retried; the caller decides whether to re-prompt.
#[derive(Clone)]
pub struct InvoiceService {
    http: Arc<dyn HttpClient>,
    config: BillingConfig,
}

impl InvoiceService {
    pub fn new(config: BillingConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { http, config }
    }

    pub async fn create_invoice(&self, customer_id: &str, plan_id: Option<&str>) -> Result<String, InvoiceError> {
        let plan_id = plan_id.ok_or(InvoiceError::NoPlanSelected)?;

        let url = format!("{}/invoices/memberships", self.config.base_url);
        let payload = serde_json::json!({
            "center_id": self.config.center_id,
            "membership_ids": plan_id,
            "user_id": customer_id,
        });

        let value = self.http.post_json(&url, Some(payload)).await.map_err(|e| match e {
            HttpError::TooManyRequests => InvoiceError::RateLimited,
            other => InvoiceError::Provider(other.to_string()),
        })?;

        let response: CreateInvoiceResponse =
            serde_json::from_value(value).map_err(|e| InvoiceError::Provider(e.to_string()))?;

        if !response.success {
            let message = response
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Failed to create invoice".to_string());
            return Err(InvoiceError::Provider(message));
        }

        let invoice_id = response
            .invoice_id
            .ok_or_else(|| InvoiceError::Provider("Missing invoice_id".to_string()))?;

        info!("Invoice created with ID: {}", invoice_id);

        Ok(invoice_id)
    }

    /// Returns `Ok(None)` while the billing service is still composing the
    /// invoice (no guest or no line items yet); the caller polls again.
    pub async fn fetch_detail(&self, invoice_id: &str) -> Result<Option<InvoiceDetail>, InvoiceError> {
        let url = format!(
            "{}/invoices/{}?expand=InvoiceItems&expand=Transactions",
            self.config.base_url, invoice_id
        );

        let value = self
            .http
            .get_json(&url, None)
            .await
            .map_err(|e| InvoiceError::Provider(e.to_string()))?;

        let invoice = match value.get("invoice") {
            Some(invoice) => invoice,
            None => return Ok(None),
        };

        let guest = match invoice.get("guest") {
            Some(guest) if !guest.is_null() => guest,
            _ => return Ok(None),
        };

        let item = match invoice
            .get("invoice_items")
            .and_then(|items| items.as_array())
            .and_then(|items| items.first())
        {
            Some(item) => item,
            None => return Ok(None),
        };

        let as_str = |v: &serde_json::Value, key: &str| {
            v.get(key).and_then(|s| s.as_str()).unwrap_or_default().to_string()
        };
        let as_f64 = |v: &serde_json::Value, key: &str| v.get(key).and_then(|n| n.as_f64()).unwrap_or_default();

        let price = item.get("price").cloned().unwrap_or_default();

        Ok(Some(InvoiceDetail {
            invoice_id: invoice_id.to_string(),
            first_name: as_str(guest, "first_name"),
            last_name: as_str(guest, "last_name"),
            phone: as_str(guest, "mobile_phone"),
            membership: as_str(item, "name"),
            net_price: as_f64(&price, "sales"),
            tax: as_f64(&price, "tax"),
            total: as_f64(&price, "final"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FakeBilling {
        create_response: Value,
        detail_response: Value,
        rate_limited: bool,
    }

    #[async_trait]
    impl HttpClient for FakeBilling {
        async fn get_json(&self, _url: &str, _params: Option<Value>) -> Result<Value, HttpError> {
            Ok(self.detail_response.clone())
        }

        async fn post_json(&self, _url: &str, _data: Option<Value>) -> Result<Value, HttpError> {
            if self.rate_limited {
                return Err(HttpError::TooManyRequests);
            }
            Ok(self.create_response.clone())
        }
    }

    fn service(fake: FakeBilling) -> InvoiceService {
        let config = crate::config::AppConfig::new_test_config().billing;
        InvoiceService::new(config, Arc::new(fake))
    }

    fn complete_detail() -> Value {
        json!({
            "invoice": {
                "guest": {
                    "first_name": "Asha",
                    "last_name": "Rao",
                    "mobile_phone": "+91 9876543210",
                },
                "invoice_items": [{
                    "name": "Gold Membership",
                    "price": { "sales": 15000.0, "tax": 2700.0, "final": 17700.0 },
                }],
            }
        })
    }

    #[tokio::test]
    async fn test_create_invoice_requires_selected_plan() {
        let invoices = service(FakeBilling {
            create_response: json!({}),
            detail_response: json!({}),
            rate_limited: false,
        });

        assert!(matches!(
            invoices.create_invoice("g-1", None).await.unwrap_err(),
            InvoiceError::NoPlanSelected
        ));
    }

    #[tokio::test]
    async fn test_create_invoice_surfaces_rate_limit_distinctly() {
        let invoices = service(FakeBilling {
            create_response: json!({}),
            detail_response: json!({}),
            rate_limited: true,
        });

        assert!(matches!(
            invoices.create_invoice("g-1", Some("m-1")).await.unwrap_err(),
            InvoiceError::RateLimited
        ));
    }

    #[tokio::test]
    async fn test_create_invoice_surfaces_business_error_message() {
        let invoices = service(FakeBilling {
            create_response: json!({"success": false, "error": {"message": "Center closed"}}),
            detail_response: json!({}),
            rate_limited: false,
        });

        match invoices.create_invoice("g-1", Some("m-1")).await.unwrap_err() {
            InvoiceError::Provider(message) => assert_eq!(message, "Center closed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_detail_maps_provider_shape() {
        let invoices = service(FakeBilling {
            create_response: json!({"success": true, "invoice_id": "inv-1"}),
            detail_response: complete_detail(),
            rate_limited: false,
        });

        let detail = invoices.fetch_detail("inv-1").await.unwrap().unwrap();
        assert_eq!(detail.first_name, "Asha");
        assert_eq!(detail.membership, "Gold Membership");
        assert_eq!(detail.net_price, 15000.0);
        assert_eq!(detail.tax, 2700.0);
        assert_eq!(detail.total, 17700.0);
    }

    #[tokio::test]
    async fn test_fetch_detail_incomplete_invoice_is_not_ready() {
        let invoices = service(FakeBilling {
            create_response: json!({}),
            detail_response: json!({"invoice": {"guest": null, "invoice_items": []}}),
            rate_limited: false,
        });

        assert_eq!(invoices.fetch_detail("inv-1").await.unwrap(), None);
    }
}
