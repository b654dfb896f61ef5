use std::sync::Arc;

pub mod catalog;
pub mod customer;
mod error;
pub mod http;
pub mod identity;
pub mod invoice;
pub mod payment;
pub mod session;

pub use catalog::*;
pub use customer::*;
pub use error::ServiceError;
pub use identity::*;
pub use invoice::*;
pub use payment::*;
pub use session::*;

use crate::config::AppConfig;
use crate::storage::StorageManager;

use http::{HttpClient, HttpService};

#[derive(Clone)]
pub struct ServiceRegistry {
    pub catalog: CatalogService,
    pub identity: IdentityService,
    pub customer: CustomerService,
    pub invoice: InvoiceService,
    pub payment: PaymentService,
    pub session: SessionService,
}

impl ServiceRegistry {
    pub fn new(config: &AppConfig, storage: StorageManager) -> Result<Self, ServiceError> {
        info!("Initializing service registry");

        // catalog, registry and billing live behind the same provider key
        let crm_http: Arc<dyn HttpClient> = Arc::new(HttpService::new(Some(config.catalog.api_key.as_str()))?);

        // the identity provider authenticates via its key query parameter
        let identity_http: Arc<dyn HttpClient> = Arc::new(HttpService::new(None)?);
        let otp_provider: Arc<dyn OtpProvider> =
            Arc::new(HostedOtpProvider::new(config.identity.clone(), identity_http));

        let registry = Self::with_clients(config, crm_http, otp_provider, storage);

        info!("Service registry initialized");

        Ok(registry)
    }

    /// Wiring seam: embedders and tests inject their own HTTP client or
    /// OTP provider here.
    pub fn with_clients(
        config: &AppConfig,
        crm_http: Arc<dyn HttpClient>,
        otp_provider: Arc<dyn OtpProvider>,
        storage: StorageManager,
    ) -> Self {
        Self {
            catalog: CatalogService::new(config.catalog.clone(), crm_http.clone()),
            identity: IdentityService::new(config.identity.phone_prefix.clone(), otp_provider),
            customer: CustomerService::new(config.registry.clone(), crm_http.clone()),
            invoice: InvoiceService::new(config.billing.clone(), crm_http),
            payment: PaymentService::new(config.payment.clone()),
            session: SessionService::new(storage),
        }
    }
}
