use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Search configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Base URL every relative link is appended to
    #[serde(default = "default_root_url")]
    pub root_url: String,
    /// Page the crawl starts from, relative to `root_url`
    #[serde(default = "default_root_section")]
    pub root_section: String,
    /// Maximum number of pages fetched and extracted at the same time
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Star rating a recipe needs to be ranked
    #[serde(default = "default_required_rating")]
    pub required_rating: u8,
    /// Log a progress line every this many loaded pages
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            root_section: default_root_section(),
            parallelism: default_parallelism(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            required_rating: default_required_rating(),
            progress_interval: default_progress_interval(),
        }
    }
}

// Default value functions
fn default_root_url() -> String {
    "https://www.genaw.com/lowcarb/".to_string()
}

fn default_root_section() -> String {
    "recipes.html".to_string()
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; GenawSearch/1.0)".to_string()
}

fn default_required_rating() -> u8 {
    5
}

fn default_progress_interval() -> usize {
    50
}

impl SearchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with GENAW__ prefix
    /// 2. genaw.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: GENAW__PARALLELISM
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`SearchConfig::load`] for the lookup order.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("genaw").required(false))
        .add_source(
            Environment::with_prefix("GENAW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: SearchConfig = settings.try_deserialize()?;
    if config.parallelism == 0 {
        return Err(ConfigError::Message(
            "parallelism must be at least 1".to_string(),
        ));
    }

    Ok(config)
}
