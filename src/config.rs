use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "BreatheThrough";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,breathethrough=debug".to_string()
}

/// Get the application data directory
/// ~/BreatheThrough/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("BreatheThrough")
}

/// Path of the local document store database.
pub fn store_db_path() -> PathBuf {
    app_data_dir().join("breathethrough.db")
}
