use movieskyy_common::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built front-end to serve with SPA fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image CDN root; size segments (`w500`, `w1280`) are appended to it
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Locale sent upstream and used to format release dates
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Env file holding the API key. Re-read on every request.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    #[serde(default = "default_api_key_var")]
    pub api_key_var: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}
fn default_language() -> String {
    "id-ID".to_string()
}
fn default_timeout() -> u64 {
    15
}
fn default_env_file() -> PathBuf {
    PathBuf::from(".env.local")
}
fn default_api_key_var() -> String {
    "TMDB_API_KEY".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
            env_file: default_env_file(),
            api_key_var: default_api_key_var(),
        }
    }
}

impl TmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Freshness of category listings (seconds)
    #[serde(default = "default_listing_max_age")]
    pub listing_max_age_secs: u32,

    /// Freshness of search results (seconds)
    #[serde(default = "default_search_max_age")]
    pub search_max_age_secs: u32,
}

fn default_listing_max_age() -> u32 {
    300
}
fn default_search_max_age() -> u32 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            listing_max_age_secs: default_listing_max_age(),
            search_max_age_secs: default_search_max_age(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub default_category: Category,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

fn default_refresh_interval() -> u64 {
    3600
}
fn default_search_debounce() -> u64 {
    500
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_category: Category::default(),
            refresh_interval_secs: default_refresh_interval(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl ViewConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
