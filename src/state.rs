use crate::config::AppConfig;
use crate::error::FlowResult;
use crate::flow::PurchaseOrchestrator;
use crate::service::ServiceRegistry;
use crate::storage::StorageManager;

/// Fully wired application state. Constructed once by the embedding UI
/// layer and passed around explicitly.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: StorageManager,
    pub services: ServiceRegistry,
    pub flow: PurchaseOrchestrator,
}

impl AppState {
    pub async fn new(config: AppConfig) -> FlowResult<Self> {
        let storage = match &config.storage.redis_url {
            Some(url) => StorageManager::redis(url).await?,
            None => {
                warn!("No durable store configured, session snapshots will not survive a restart");
                StorageManager::memory()
            }
        };

        let services = ServiceRegistry::new(&config, storage.clone())?;
        let flow = PurchaseOrchestrator::new(services.clone(), &config.flow);

        Ok(Self {
            config,
            storage,
            services,
            flow,
        })
    }
}
