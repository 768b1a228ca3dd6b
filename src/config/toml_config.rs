use crate::domain::model::{Address, PaymentMethod, UserProfile};
use crate::domain::ports::Bootstrap;
use crate::core::session::{CustomerSession, ProfileBootstrap};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const DEFAULT_CURRENCY: &str = "CLP";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    pub store: StoreConfig,
    pub logging: Option<LoggingConfig>,
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl StorefrontConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CUSTOMER_EMAIL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            StorefrontError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("store.name", &self.store.name)?;

        if let Some(currency) = &self.store.currency {
            if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(StorefrontError::InvalidFieldValue {
                    field: "store.currency".to_string(),
                    value: currency.clone(),
                    reason: "Expected a three-letter ISO 4217 code such as CLP".to_string(),
                });
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            if !LOG_LEVELS.contains(&level) {
                return Err(StorefrontError::InvalidFieldValue {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        if let Some(profile) = &self.profile {
            profile.validate()?;
        }
        for address in &self.addresses {
            address.validate()?;
        }
        for payment_method in &self.payment_methods {
            payment_method.validate()?;
        }

        Ok(())
    }

    /// 未設定時使用 CLP
    pub fn currency(&self) -> &str {
        self.store.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 建立並初始化一個 session
    pub fn build_session(&self) -> CustomerSession {
        let session = CustomerSession::new();
        session.bootstrap(self, self);
        session
    }
}

/// Profile address first, then the configured ones.
impl Bootstrap<Address> for StorefrontConfig {
    fn initial_records(&self) -> Vec<Address> {
        let mut records = self
            .profile
            .clone()
            .map(|profile| ProfileBootstrap::new(profile).initial_records())
            .unwrap_or_default();
        records.extend(self.addresses.iter().cloned());
        records
    }
}

impl Bootstrap<PaymentMethod> for StorefrontConfig {
    fn initial_records(&self) -> Vec<PaymentMethod> {
        self.payment_methods.clone()
    }
}

impl Validate for StorefrontConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
