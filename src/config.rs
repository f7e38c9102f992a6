//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::views::inventory_views;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds a cached view stays fresh
    pub expiration_secs: u64,
    /// Background sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Whether to preload `preload_views` at startup
    pub preload_on_start: bool,
    /// Views built by the startup preload
    pub preload_views: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `VIEW_CACHE_EXPIRATION_SECS` - View freshness window (default: 1800)
    /// - `SWEEP_INTERVAL_SECS` - Expired view sweep frequency (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PRELOAD_ON_START` - Preload views at startup (default: true)
    /// - `PRELOAD_VIEWS` - Comma-separated views to preload (default: all)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiration_secs: parse_var("VIEW_CACHE_EXPIRATION_SECS")
                .unwrap_or(defaults.expiration_secs),
            sweep_interval_secs: parse_var("SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval_secs),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            preload_on_start: parse_var("PRELOAD_ON_START").unwrap_or(defaults.preload_on_start),
            preload_views: env::var("PRELOAD_VIEWS")
                .ok()
                .and_then(|v| parse_view_list(&v))
                .unwrap_or(defaults.preload_views),
        }
    }

    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiration_secs: 1800,
            sweep_interval_secs: 60,
            server_port: 3000,
            preload_on_start: true,
            preload_views: inventory_views(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated view list, ignoring blank items.
///
/// Returns `None` when nothing is left, so the caller keeps its default.
fn parse_view_list(raw: &str) -> Option<Vec<String>> {
    let views: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    (!views.is_empty()).then_some(views)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.expiration(), Duration::from_secs(30 * 60));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.server_port, 3000);
        assert!(config.preload_on_start);
        assert_eq!(config.preload_views, inventory_views());
    }

    #[test]
    fn test_parse_view_list() {
        assert_eq!(
            parse_view_list("stock, sales,,  ,reports"),
            Some(vec![
                "stock".to_string(),
                "sales".to_string(),
                "reports".to_string()
            ])
        );
        assert_eq!(parse_view_list(" , "), None);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("VIEW_CACHE_EXPIRATION_SECS");
        env::remove_var("SWEEP_INTERVAL_SECS");
        env::remove_var("SERVER_PORT");
        env::remove_var("PRELOAD_ON_START");
        env::remove_var("PRELOAD_VIEWS");

        let config = Config::from_env();
        assert_eq!(config.expiration_secs, 1800);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.server_port, 3000);
        assert!(config.preload_on_start);
        assert_eq!(config.preload_views.len(), 9);
    }
}
