use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

/// Deployment environment, controls error verbosity and request log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn request_log_format(self) -> RequestLogFormat {
        if self.is_production() {
            RequestLogFormat::Tiny
        } else {
            RequestLogFormat::Common
        }
    }
}

/// Shape of the per-request log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLogFormat {
    /// Method, uri, status and latency
    Tiny,
    /// Tiny plus client ip, HTTP version, user agent and content length
    Common,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "address-book", version, about)]
pub struct Config {
    /// Server bind address
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,

    /// Bearer token required for creating and deleting addresses
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Deployment environment
    #[arg(long = "env", env = "APP_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Prefix for Location headers of created addresses
    #[arg(long, env = "PUBLIC_URL", default_value = "")]
    pub public_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            api_token: None,
            environment: Environment::Development,
            log_level: "info".to_string(),
            public_url: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from command line arguments and environment variables
    pub fn from_env() -> Self {
        Config::parse()
    }

    /// Location of an address resource
    pub fn address_location(&self, id: &str) -> String {
        format!("{}/address/{}", self.public_url.trim_end_matches('/'), id)
    }
}
