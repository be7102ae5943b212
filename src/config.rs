use std::env;

/// The port the service listens on when `TALKER_PORT` is unset.
pub const DEFAULT_PORT: &str = "3001";

/// The collection file used when `TALKER_DATA_PATH` is unset.
pub const DEFAULT_DATA_PATH: &str = "talker.json";

/// Returns the value of the named environment variable, or the default when unset.
pub fn get_variable_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
