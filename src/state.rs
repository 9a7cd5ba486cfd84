use crate::error::{AppError, Result};
use crate::notification::FeedController;
use crate::websocket::RealtimeChannel;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub channel: RealtimeChannel,
    pub feed: FeedController,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub reconcile_unread: bool,
    pub initial_viewer_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL")
            .or_else(|| lookup("NEXT_PUBLIC_API_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::Config("API_URL must be set".to_string()))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Config("PORT must be a number".to_string()))?;

        let timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| AppError::Config("REQUEST_TIMEOUT_SECS must be a number".to_string()))?;

        let reconcile_unread = lookup("RECONCILE_UNREAD")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            reconcile_unread,
            initial_viewer_id: lookup("INITIAL_VIEWER_ID").filter(|id| !id.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_api_url_is_set() {
        let config = config(&[("API_URL", "http://backend:4000")]).unwrap();
        assert_eq!(config.api_url, "http://backend:4000");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.reconcile_unread);
        assert!(config.initial_viewer_id.is_none());
    }

    #[test]
    fn falls_back_to_public_api_url() {
        let config = config(&[("NEXT_PUBLIC_API_URL", "http://public:4000")]).unwrap();
        assert_eq!(config.api_url, "http://public:4000");
    }

    #[test]
    fn missing_api_url_is_an_error() {
        assert!(matches!(config(&[]), Err(AppError::Config(_))));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = config(&[("API_URL", "http://backend"), ("PORT", "eighty")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn reconcile_flag_and_viewer_are_read() {
        let config = config(&[
            ("API_URL", "http://backend"),
            ("RECONCILE_UNREAD", "true"),
            ("INITIAL_VIEWER_ID", "viewer-1"),
        ])
        .unwrap();
        assert!(config.reconcile_unread);
        assert_eq!(config.initial_viewer_id.as_deref(), Some("viewer-1"));
    }
}
