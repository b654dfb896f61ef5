mod error;
mod model;

pub use error::CatalogError;
pub use model::*;

use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::CatalogConfig;
use crate::service::http::{HttpClient, HttpError};
use crate::utils::retry::{RetryError, RetryPolicy};

use model::MembershipsResponse;

/// Fetches the purchasable plan list and owns the fetched copy. The fetch
/// runs independently of any purchase session and is the only call that
/// auto-retries on rate limits.
#[derive(Clone)]
pub struct CatalogService {
    http: Arc<dyn HttpClient>,
    config: CatalogConfig,
    retry: RetryPolicy,
    plans: Arc<RwLock<Vec<MembershipPlan>>>,
}

impl CatalogService {
    pub fn new(config: CatalogConfig, http: Arc<dyn HttpClient>) -> Self {
        let retry = RetryPolicy::new(config.retry_max_attempts, config.retry_base_delay);

        Self {
            http,
            config,
            retry,
            plans: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn fetch_plans(&self) -> Result<Vec<MembershipPlan>, CatalogError> {
        let url = format!("{}/centers/{}/memberships", self.config.base_url, self.config.center_id);
        let params = serde_json::json!({
            "center_id": self.config.center_id,
            "show_in_catalog": "true",
            "expand": "Null",
        });

        let value = self
            .retry
            .execute(
                || self.http.get_json(&url, Some(params.clone())),
                |e| matches!(e, HttpError::TooManyRequests),
            )
            .await
            .map_err(|e| match e {
                RetryError::Unavailable { .. } => CatalogError::Unavailable,
                RetryError::Inner(e) => CatalogError::Provider(e.to_string()),
            })?;

        let response: MembershipsResponse =
            serde_json::from_value(value).map_err(|e| CatalogError::Provider(e.to_string()))?;

        let mut plans = response.memberships;
        plans.sort_by(|a, b| a.price.sales.partial_cmp(&b.price.sales).unwrap_or(Ordering::Equal));
        for plan in &mut plans {
            apply_price_tier(plan);
        }

        info!("Fetched {} membership plans", plans.len());

        *self.plans.write().await = plans.clone();

        Ok(plans)
    }

    pub async fn plans(&self) -> Vec<MembershipPlan> {
        self.plans.read().await.clone()
    }

    pub async fn plan(&self, plan_id: &str) -> Option<MembershipPlan> {
        self.plans.read().await.iter().find(|p| p.id == plan_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
    use std::time::Duration;

    struct FlakyCatalog {
        failures: AtomicU32,
    }

    #[async_trait]
    impl HttpClient for FlakyCatalog {
        async fn get_json(&self, _url: &str, _params: Option<Value>) -> Result<Value, HttpError> {
            if self.failures.load(AtomicOrdering::SeqCst) > 0 {
                self.failures.fetch_sub(1, AtomicOrdering::SeqCst);
                return Err(HttpError::TooManyRequests);
            }
            Ok(json!({
                "memberships": [
                    {"id": "m-big", "name": "Gold", "price": {"sales": 25000.0}},
                    {"id": "m-small", "name": "Silver", "price": {"sales": 15000.0}},
                ]
            }))
        }

        async fn post_json(&self, _url: &str, _data: Option<Value>) -> Result<Value, HttpError> {
            unreachable!("catalog only reads")
        }
    }

    fn test_config() -> CatalogConfig {
        CatalogConfig {
            base_url: "https://crm.test/v1".to_string(),
            api_key: "k".to_string(),
            center_id: "center-1".to_string(),
            retry_max_attempts: 3,
            retry_base_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_sorts_and_enriches() {
        let service = CatalogService::new(
            test_config(),
            Arc::new(FlakyCatalog {
                failures: AtomicU32::new(0),
            }),
        );

        let plans = service.fetch_plans().await.unwrap();
        assert_eq!(plans[0].id, "m-small");
        assert_eq!(plans[0].validity_in_months, Some(6));
        assert_eq!(plans[0].discount_percentage, Some(35));
        assert_eq!(plans[1].id, "m-big");
        assert_eq!(plans[1].validity_in_months, Some(12));

        assert!(service.plan("m-big").await.is_some());
        assert!(service.plan("m-unknown").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_retries_through_rate_limits() {
        let service = CatalogService::new(
            test_config(),
            Arc::new(FlakyCatalog {
                failures: AtomicU32::new(2),
            }),
        );

        let plans = service.fetch_plans().await.unwrap();
        assert_eq!(plans.len(), 2);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_is_terminal() {
        let service = CatalogService::new(
            test_config(),
            Arc::new(FlakyCatalog {
                failures: AtomicU32::new(u32::MAX),
            }),
        );

        let err = service.fetch_plans().await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable));
    }
}
