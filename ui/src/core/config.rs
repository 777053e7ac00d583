//! Application configuration.
//!
//! Everything has a working default. The contact API base URL can be
//! overridden at build time (`DEMETRA_API_BASE=https://… dx build`) and, on
//! native targets, at runtime through the same environment variable.

use super::storage::StorageConfig;

pub const DEFAULT_CONTACT_PATH: &str = "/api/send-email";
pub const DEFAULT_STORE_NAME: &str = "demetra";
pub const API_BASE_ENV: &str = "DEMETRA_API_BASE";

/// Used when neither an override nor a page origin is available.
const FALLBACK_API_BASE: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Scheme + host (+ port) of the backend, without a trailing slash.
    pub api_base: String,
    pub contact_path: String,
    pub store_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: FALLBACK_API_BASE.to_string(),
            contact_path: DEFAULT_CONTACT_PATH.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the configuration for the current platform.
    pub fn from_env() -> Self {
        let api_base = runtime_api_base()
            .or_else(|| option_env!("DEMETRA_API_BASE").map(str::to_string))
            .or_else(page_origin)
            .unwrap_or_else(|| FALLBACK_API_BASE.to_string());

        Self {
            api_base: normalize_base(&api_base),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, base: impl AsRef<str>) -> Self {
        self.api_base = normalize_base(base.as_ref());
        self
    }

    /// Absolute URL of the contact endpoint.
    pub fn contact_url(&self) -> String {
        if self.contact_path.starts_with('/') {
            format!("{}{}", self.api_base, self.contact_path)
        } else {
            format!("{}/{}", self.api_base, self.contact_path)
        }
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig::platform_default(self.store_name.clone())
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_api_base() -> Option<String> {
    std::env::var(API_BASE_ENV).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn runtime_api_base() -> Option<String> {
    None
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}
