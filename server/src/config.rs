//! Command-line and environment configuration.
//!
//! Every option has a default, so the binary starts with no arguments. Each
//! flag can also be supplied through the environment variable named next to
//! it.

use clap::{ArgAction, Parser};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "request-inspector")]
#[command(about = "Echo every HTTP request back as an HTML page", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "INSPECTOR_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "INSPECTOR_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Largest POST body that will be buffered and decoded
    #[arg(long, env = "INSPECTOR_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Show body decoding errors in the rendered page (development aid)
    #[arg(long, env = "INSPECTOR_DISPLAY_ERRORS", default_value_t = true, action = ArgAction::Set)]
    pub display_errors: bool,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            display_errors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["request-inspector"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.host, default.host);
        assert_eq!(parsed.port, default.port);
        assert_eq!(parsed.max_body_bytes, default.max_body_bytes);
        assert_eq!(parsed.display_errors, default.display_errors);
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = Config::try_parse_from([
            "request-inspector",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--max-body-bytes",
            "1024",
            "--display-errors",
            "false",
        ])
        .unwrap();
        assert_eq!(parsed.bind_address(), "127.0.0.1:9090");
        assert_eq!(parsed.max_body_bytes, 1024);
        assert!(!parsed.display_errors);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["request-inspector", "--port", "70000"]).is_err());
    }

    #[test]
    fn default_bind_address() {
        assert_eq!(Config::default().bind_address(), "0.0.0.0:8000");
    }
}
