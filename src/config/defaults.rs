//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default facility-lookup service root
pub const DEFAULT_LOOKUP_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default lookup request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default search radius in kilometers
pub const DEFAULT_RADIUS_KM: u32 = 10;

/// Default position capability ("ip" or "none")
pub const DEFAULT_POSITION_PROVIDER: &str = "ip";

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "hospital-finder";
