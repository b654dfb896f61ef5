use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration key: {0}")]
    MissingKey(String),
    #[error("Invalid configuration value for {0}")]
    InvalidKey(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub identity: IdentityConfig,
    pub registry: RegistryConfig,
    pub billing: BillingConfig,
    pub payment: PaymentConfig,
    pub storage: StorageConfig,
    pub flow: FlowConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub center_id: String,
    pub retry_max_attempts: u32,
    pub retry_base_delay: Duration,
}

#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: String,
    /// Dial prefix prepended to the validated 10-digit number.
    pub phone_prefix: String,
}

#[derive(Clone, Debug)]
pub struct RegistryConfig {
    pub base_url: String,
    pub api_key: String,
    pub center_id: String,
    /// The registry's numeric country identifier for mobile numbers. Not
    /// the dial prefix.
    pub mobile_country_code: u32,
}

#[derive(Clone, Debug)]
pub struct BillingConfig {
    pub base_url: String,
    pub api_key: String,
    pub center_id: String,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub gateway_url: String,
    pub merchant_key: String,
    pub salt: String,
    pub success_url: String,
    pub failure_url: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// When unset the in-memory backend is used and snapshots do not
    /// survive a restart.
    pub redis_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Window during which re-selecting the same plan is ignored.
    pub select_guard: Duration,
}

const DEFAULT_CRM_BASE_URL: &str = "https://api.zenoti.com/v1";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_GATEWAY_URL: &str = "https://secure.payu.in/_payment";
const DEFAULT_PHONE_PREFIX: &str = "+91";
const DEFAULT_MOBILE_COUNTRY_CODE: u32 = 95;

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingKey(key.to_string()))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidKey(key.to_string()))
}

pub fn build_config() -> Result<AppConfig, ConfigError> {
    info!("Building AppConfig...");

    let crm_api_key = require("CRM_API_KEY")?;
    let crm_base_url = optional("CRM_BASE_URL", DEFAULT_CRM_BASE_URL);
    let center_id = require("CRM_CENTER_ID")?;

    let config = AppConfig {
        catalog: CatalogConfig {
            base_url: crm_base_url.clone(),
            api_key: crm_api_key.clone(),
            center_id: center_id.clone(),
            retry_max_attempts: parse("CATALOG_RETRY_MAX_ATTEMPTS", optional("CATALOG_RETRY_MAX_ATTEMPTS", "3"))?,
            retry_base_delay: Duration::from_millis(parse(
                "CATALOG_RETRY_BASE_DELAY_MS",
                optional("CATALOG_RETRY_BASE_DELAY_MS", "2000"),
            )?),
        },
        identity: IdentityConfig {
            base_url: optional("IDENTITY_BASE_URL", DEFAULT_IDENTITY_BASE_URL),
            api_key: require("IDENTITY_API_KEY")?,
            phone_prefix: optional("IDENTITY_PHONE_PREFIX", DEFAULT_PHONE_PREFIX),
        },
        registry: RegistryConfig {
            base_url: crm_base_url.clone(),
            api_key: crm_api_key.clone(),
            center_id: center_id.clone(),
            mobile_country_code: parse(
                "REGISTRY_MOBILE_COUNTRY_CODE",
                optional("REGISTRY_MOBILE_COUNTRY_CODE", "95"),
            )?,
        },
        billing: BillingConfig {
            base_url: crm_base_url,
            api_key: crm_api_key,
            center_id,
        },
        payment: PaymentConfig {
            gateway_url: optional("PAYMENT_GATEWAY_URL", DEFAULT_GATEWAY_URL),
            merchant_key: require("PAYMENT_MERCHANT_KEY")?,
            salt: require("PAYMENT_SALT")?,
            success_url: require("PAYMENT_SUCCESS_URL")?,
            failure_url: require("PAYMENT_FAILURE_URL")?,
        },
        storage: StorageConfig {
            redis_url: std::env::var("STORAGE_REDIS_URL").ok(),
        },
        flow: FlowConfig {
            select_guard: Duration::from_millis(parse(
                "FLOW_SELECT_GUARD_MS",
                optional("FLOW_SELECT_GUARD_MS", "1000"),
            )?),
        },
    };

    info!("AppConfig built");

    Ok(config)
}

impl AppConfig {
    pub fn new_test_config() -> Self {
        AppConfig {
            catalog: CatalogConfig {
                base_url: "https://crm.test/v1".to_string(),
                api_key: "test-api-key".to_string(),
                center_id: "center-1".to_string(),
                retry_max_attempts: 3,
                retry_base_delay: Duration::from_millis(10),
            },
            identity: IdentityConfig {
                base_url: "https://identity.test/v1".to_string(),
                api_key: "identity-key".to_string(),
                phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
            },
            registry: RegistryConfig {
                base_url: "https://crm.test/v1".to_string(),
                api_key: "test-api-key".to_string(),
                center_id: "center-1".to_string(),
                mobile_country_code: DEFAULT_MOBILE_COUNTRY_CODE,
            },
            billing: BillingConfig {
                base_url: "https://crm.test/v1".to_string(),
                api_key: "test-api-key".to_string(),
                center_id: "center-1".to_string(),
            },
            payment: PaymentConfig {
                gateway_url: "https://gateway.test/_payment".to_string(),
                merchant_key: "merchant-key".to_string(),
                salt: "salty".to_string(),
                success_url: "https://backend.test/api/payment/success".to_string(),
                failure_url: "https://backend.test/api/payment/failure".to_string(),
            },
            storage: StorageConfig { redis_url: None },
            flow: FlowConfig {
                select_guard: Duration::from_millis(1000),
            },
        }
    }
}
