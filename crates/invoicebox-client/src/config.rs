//! Access credentials and API configuration.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::ApiError;

/// Production API endpoint.
pub const PRODUCTION_URL: &str = "https://api.invoicebox.ru";

/// Staging API endpoint.
pub const STAGING_URL: &str = "https://api.stage.invbox.ru";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("Invoicebox Rust SDK/", env!("CARGO_PKG_VERSION"));

/// Target API environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live environment.
    #[default]
    Production,
    /// Test environment.
    Staging,
}

impl Environment {
    /// Pick the environment from a staging flag.
    #[must_use]
    pub const fn from_staging(use_staging: bool) -> Self {
        if use_staging {
            Self::Staging
        } else {
            Self::Production
        }
    }

    /// Base URL of this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Staging => STAGING_URL,
        }
    }
}

/// Credentials as supplied by the caller.
///
/// Deserializes from a mapping with `shop_id`, `token` and an optional
/// `user_agent`. Nothing is validated until [`ApiConfig::configure`].
#[derive(Clone, Default, Deserialize)]
pub struct AccessConfig {
    /// Shop identifier.
    #[serde(default)]
    pub shop_id: Option<String>,
    /// API token, sent as a bearer credential.
    #[serde(default)]
    pub token: Option<String>,
    /// Custom user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl AccessConfig {
    /// Create access credentials from a shop ID and token.
    #[must_use]
    pub fn new(shop_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            shop_id: Some(shop_id.into()),
            token: Some(token.into()),
            user_agent: None,
        }
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load credentials from `INVOICEBOX_SHOP_ID`, `INVOICEBOX_TOKEN` and
    /// `INVOICEBOX_USER_AGENT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            shop_id: lookup("INVOICEBOX_SHOP_ID"),
            token: lookup("INVOICEBOX_TOKEN"),
            user_agent: lookup("INVOICEBOX_USER_AGENT"),
        }
    }

    /// Load credentials from a JSON secrets file.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        let access = serde_json::from_str(&contents)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "Loaded Invoicebox credentials from file");
        Ok(access)
    }
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("shop_id", &self.shop_id)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Validated configuration used by the dispatcher.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: String,
    shop_id: String,
    token: String,
    user_agent: String,
    use_staging: bool,
    is_test_request: bool,
}

impl ApiConfig {
    /// Validate access credentials and select the environment.
    ///
    /// An empty or missing `user_agent` falls back to [`DEFAULT_USER_AGENT`].
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if `shop_id` or `token` is missing or empty.
    pub fn configure(
        access: AccessConfig,
        use_staging: bool,
        is_test_request: bool,
    ) -> Result<Self, ApiError> {
        let shop_id = non_empty(access.shop_id)
            .ok_or_else(|| ApiError::NotConfigured("shop_id is required param".to_string()))?;
        let token = non_empty(access.token)
            .ok_or_else(|| ApiError::NotConfigured("token is required param".to_string()))?;
        let user_agent =
            non_empty(access.user_agent).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let environment = Environment::from_staging(use_staging);
        tracing::info!(
            shop_id = %shop_id,
            environment = ?environment,
            is_test_request,
            "Invoicebox API configured"
        );

        Ok(Self {
            base_url: environment.base_url().to_string(),
            shop_id,
            token,
            user_agent,
            use_staging,
            is_test_request,
        })
    }

    /// Point the configuration at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shop identifier.
    #[must_use]
    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }

    /// Bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// User agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether the staging environment was selected.
    #[must_use]
    pub const fn use_staging(&self) -> bool {
        self.use_staging
    }

    /// Whether requests are flagged as test requests.
    #[must_use]
    pub const fn is_test_request(&self) -> bool {
        self.is_test_request
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("shop_id", &self.shop_id)
            .field("token", &"***")
            .field("user_agent", &self.user_agent)
            .field("use_staging", &self.use_staging)
            .field("is_test_request", &self.is_test_request)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
