//! Client configuration
//!
//! Where the platform lives (authorization server and per-service hosts),
//! and how the HTTP layer should talk to it.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEVELOPMENT_AUTHORIZE_URL, DEVELOPMENT_DOMAIN,
    DEVELOPMENT_TOKEN_URL, PRODUCTION_AUTHORIZE_URL, PRODUCTION_DOMAIN, PRODUCTION_TOKEN_URL,
};
use crate::errors::{BasalamError, Result};
use crate::impl_domain_status_conversions;

/// Deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl_domain_status_conversions!(Environment {
    Production => "production",
    Development => "development",
});

impl Environment {
    const fn domain(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_DOMAIN,
            Self::Development => DEVELOPMENT_DOMAIN,
        }
    }
}

/// Platform services, each served from its own host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    Core,
    Wallet,
    Chat,
    Order,
    OrderProcessing,
    Search,
    Upload,
    Webhook,
}

impl_domain_status_conversions!(Service {
    Core => "core",
    Wallet => "wallet",
    Chat => "chat",
    Order => "order",
    OrderProcessing => "order-processing",
    Search => "search",
    Upload => "upload",
    Webhook => "webhook",
});

impl Service {
    pub const ALL: [Self; 8] = [
        Self::Core,
        Self::Wallet,
        Self::Chat,
        Self::Order,
        Self::OrderProcessing,
        Self::Search,
        Self::Upload,
        Self::Webhook,
    ];

    const fn subdomain(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Wallet => "wallet",
            Self::Chat => "conversation",
            Self::Order => "order",
            Self::OrderProcessing => "order-processing",
            Self::Search => "search",
            Self::Upload => "uploadio",
            Self::Webhook => "webhook",
        }
    }

    /// Host for this service in `environment`.
    #[must_use]
    pub fn default_url(self, environment: Environment) -> String {
        format!("https://{}.{}", self.subdomain(), environment.domain())
    }
}

/// Configuration for a Basalam client
///
/// Every field has a default derived from [`Environment`]; partial JSON or
/// TOML documents only need to name what they override, and omitted URLs
/// follow the document's `environment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigDocument")]
pub struct BasalamConfig {
    pub environment: Environment,
    pub token_url: String,
    pub authorize_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Per-service host overrides; services not listed use the environment
    /// default.
    pub services: BTreeMap<Service, String>,
}

/// Wire shape of [`BasalamConfig`] before environment defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigDocument {
    environment: Environment,
    token_url: Option<String>,
    authorize_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    services: BTreeMap<Service, String>,
}

impl From<ConfigDocument> for BasalamConfig {
    fn from(doc: ConfigDocument) -> Self {
        let defaults = Self::for_environment(doc.environment);
        Self {
            environment: doc.environment,
            token_url: doc.token_url.unwrap_or(defaults.token_url),
            authorize_url: doc.authorize_url.unwrap_or(defaults.authorize_url),
            timeout_secs: doc.timeout_secs.unwrap_or(defaults.timeout_secs),
            user_agent: doc.user_agent.unwrap_or(defaults.user_agent),
            services: doc.services,
        }
    }
}

impl Default for BasalamConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

impl BasalamConfig {
    /// Defaults for `environment`.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let (token_url, authorize_url) = match environment {
            Environment::Production => (PRODUCTION_TOKEN_URL, PRODUCTION_AUTHORIZE_URL),
            Environment::Development => (DEVELOPMENT_TOKEN_URL, DEVELOPMENT_AUTHORIZE_URL),
        };
        Self {
            environment,
            token_url: token_url.to_string(),
            authorize_url: authorize_url.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            services: BTreeMap::new(),
        }
    }

    /// Point one service at a different host (for example a mock server).
    #[must_use]
    pub fn with_service_url(mut self, service: Service, url: impl Into<String>) -> Self {
        self.services.insert(service, url.into());
        self
    }

    /// Point every service at the same host.
    #[must_use]
    pub fn with_all_services_at(mut self, url: &str) -> Self {
        for service in Service::ALL {
            self.services.insert(service, url.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL for `service`, without a trailing slash.
    #[must_use]
    pub fn service_url(&self, service: Service) -> String {
        self.services.get(&service).map_or_else(
            || service.default_url(self.environment),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// Per-request transport timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Headers sent with every resource request.
    #[must_use]
    pub fn default_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("User-Agent", self.user_agent.clone()),
            ("Accept", "application/json".to_string()),
        ]
    }

    /// Check that every URL parses and the timeout is non-zero.
    ///
    /// # Errors
    /// Returns `BasalamError::Config` naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(BasalamError::Config("timeout_secs must be greater than zero".into()));
        }
        check_url("token_url", &self.token_url)?;
        check_url("authorize_url", &self.authorize_url)?;
        for (service, url) in &self.services {
            check_url(&format!("services.{service}"), url)?;
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| BasalamError::Config(format!("{field} is not a valid URL ({value}): {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BasalamError::Config(format!("{field} uses unsupported scheme {scheme}"))),
    }
}
