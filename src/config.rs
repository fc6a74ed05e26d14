/// Configuration management
use crate::error::{DeskError, Result};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";
const DEFAULT_TOGGLE_PATH: &str = "/webhook/toggle-mode";
const DEFAULT_SEND_PATH: &str = "/webhook/send-message";

/// Dashboard configuration. URLs are not probed at startup: a wrong endpoint
/// fails at call time and is handled by the normal error paths.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the real-time data source (REST + SSE).
    pub api_url: String,

    /// Mode-toggle webhook endpoint.
    pub toggle_url: String,

    /// Send-message webhook endpoint.
    pub send_url: String,

    /// Log file path; the TUI owns the terminal, so tracing goes to a file.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            toggle_url: format!("{}{}", DEFAULT_API_URL, DEFAULT_TOGGLE_PATH),
            send_url: format!("{}{}", DEFAULT_API_URL, DEFAULT_SEND_PATH),
            log_file: PathBuf::from("movedesk.log"),
        }
    }
}

impl Config {
    /// Create config from command line arguments.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Config::default();
        let mut api_url_set = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--api-url" => {
                    let url = args.get(i + 1).ok_or_else(|| {
                        DeskError::Config("--api-url requires a URL argument".to_string())
                    })?;
                    config.api_url = url.trim_end_matches('/').to_string();
                    api_url_set = true;
                    i += 2;
                }
                "--toggle-url" => {
                    let url = args.get(i + 1).ok_or_else(|| {
                        DeskError::Config("--toggle-url requires a URL argument".to_string())
                    })?;
                    config.toggle_url = url.clone();
                    i += 2;
                }
                "--send-url" => {
                    let url = args.get(i + 1).ok_or_else(|| {
                        DeskError::Config("--send-url requires a URL argument".to_string())
                    })?;
                    config.send_url = url.clone();
                    i += 2;
                }
                "--log-file" => {
                    let path = args.get(i + 1).ok_or_else(|| {
                        DeskError::Config("--log-file requires a path argument".to_string())
                    })?;
                    config.log_file = PathBuf::from(path);
                    i += 2;
                }
                other => {
                    return Err(DeskError::Config(format!(
                        "Unknown argument: {} (expected --api-url, --toggle-url, --send-url, --log-file)",
                        other
                    )));
                }
            }
        }

        // Env overrides (nice for scripts)
        if let Ok(url) = std::env::var("MOVEDESK_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
            api_url_set = true;
        }
        if let Ok(url) = std::env::var("MOVEDESK_TOGGLE_URL") {
            config.toggle_url = url;
        }
        if let Ok(url) = std::env::var("MOVEDESK_SEND_URL") {
            config.send_url = url;
        }
        if let Ok(path) = std::env::var("MOVEDESK_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        // Webhooks default to paths under the api base when only that was given
        if api_url_set {
            if config.toggle_url == format!("{}{}", DEFAULT_API_URL, DEFAULT_TOGGLE_PATH) {
                config.toggle_url = format!("{}{}", config.api_url, DEFAULT_TOGGLE_PATH);
            }
            if config.send_url == format!("{}{}", DEFAULT_API_URL, DEFAULT_SEND_PATH) {
                config.send_url = format!("{}{}", config.api_url, DEFAULT_SEND_PATH);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8787");
        assert!(config.toggle_url.ends_with("/webhook/toggle-mode"));
    }

    #[test]
    fn api_url_flag_rebases_webhook_defaults() {
        let args: Vec<String> = ["movedesk", "--api-url", "https://desk.example.com/"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.api_url, "https://desk.example.com");
        assert_eq!(config.toggle_url, "https://desk.example.com/webhook/toggle-mode");
        assert_eq!(config.send_url, "https://desk.example.com/webhook/send-message");
    }

    #[test]
    fn explicit_webhook_urls_win() {
        let args: Vec<String> = [
            "movedesk",
            "--api-url",
            "https://desk.example.com",
            "--toggle-url",
            "https://hooks.example.com/toggle",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.toggle_url, "https://hooks.example.com/toggle");
    }

    #[test]
    fn flag_without_value_is_an_error() {
        let args: Vec<String> = ["movedesk", "--api-url"].iter().map(|s| s.to_string()).collect();
        assert!(Config::from_args(&args).is_err());
    }
}
