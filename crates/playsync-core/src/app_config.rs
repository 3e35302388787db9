use std::path::PathBuf;
use std::time::Duration;

/// Package name shipped as the default; running against it asks for
/// confirmation first.
pub const PLACEHOLDER_PACKAGE_NAME: &str = "com.yourcompany.oneinabillion";

/// Lower bound on the pause between consecutive create calls.
pub const MIN_INTER_CALL_DELAY_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Android `applicationId` the products are created under.
    pub package_name: String,
    pub service_account_key_path: PathBuf,
    /// YAML catalog to provision; `None` selects the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub inter_call_delay_ms: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl AppConfig {
    #[must_use]
    pub fn uses_placeholder_package(&self) -> bool {
        self.package_name == PLACEHOLDER_PACKAGE_NAME
    }

    #[must_use]
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms.max(MIN_INTER_CALL_DELAY_MS))
    }
}
