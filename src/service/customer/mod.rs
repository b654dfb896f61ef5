mod error;
mod model;

pub use error::CustomerError;
pub use model::*;

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::service::http::HttpClient;

/// Lookup-or-create against the customer registry.
#[derive(Clone)]
pub struct CustomerService {
    http: Arc<dyn HttpClient>,
    config: RegistryConfig,
}

impl CustomerService {
    pub fn new(config: RegistryConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { http, config }
    }

    /// Looks up a customer by phone. `NotFound` is the expected branch for
    /// first-time buyers and drives the registration path. When the
    /// registry returns several matches the first one wins.
    pub async fn resolve(&self, phone: &str) -> Result<String, CustomerError> {
        let url = format!("{}/guests/search?phone={}", self.config.base_url, phone);

        let value = self
            .http
            .get_json(&url, None)
            .await
            .map_err(|e| CustomerError::Provider(e.to_string()))?;

        let guests = value
            .get("guests")
            .and_then(|g| g.as_array())
            .ok_or_else(|| CustomerError::Provider("Missing guests in search response".to_string()))?;

        match guests.first().and_then(|g| g.get("id")).and_then(|id| id.as_str()) {
            Some(id) => Ok(id.to_string()),
            None => Err(CustomerError::NotFound),
        }
    }

    pub async fn register(&self, phone: &str, profile: &NewCustomer) -> Result<CustomerRecord, CustomerError> {
        if profile.first_name.trim().is_empty() {
            return Err(CustomerError::MissingField("First name"));
        }
        if profile.last_name.trim().is_empty() {
            return Err(CustomerError::MissingField("Last name"));
        }

        let url = format!("{}/guests", self.config.base_url);
        let payload = serde_json::json!({
            "center_id": self.config.center_id,
            "personal_info": {
                "first_name": profile.first_name,
                "last_name": profile.last_name,
                "mobile_phone": {
                    "country_code": self.config.mobile_country_code,
                    "number": phone,
                },
                "gender": profile.gender.wire_code(),
            },
        });

        let value = self
            .http
            .post_json(&url, Some(payload))
            .await
            .map_err(|e| CustomerError::Provider(e.to_string()))?;

        let id = value
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| CustomerError::Provider("Missing id in created customer".to_string()))?;

        info!("Registered customer {}", id);

        Ok(CustomerRecord {
            id: id.to_string(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone: phone.to_string(),
        })
    }
}
