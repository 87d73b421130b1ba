//! Configuration Module
//!
//! Loads proxy configuration from environment variables and the command line.

use std::env;

use clap::Parser;

use crate::cache::{DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_OBJECT_SIZE};

/// Default listening port when neither the CLI nor the environment names one.
pub const DEFAULT_PROXY_PORT: u16 = 15213;

// == Command Line ==
/// Command line arguments for the proxy binary.
#[derive(Debug, Parser)]
#[command(name = "caching_proxy")]
#[command(about = "Forwarding HTTP/1.0 proxy with an in-memory LRU cache", long_about = None)]
pub struct Cli {
    /// Port to accept client connections on (default: 15213)
    #[arg(env = "PROXY_PORT")]
    pub port: Option<u16>,

    /// Port for the read-only admin API (disabled when unset)
    #[arg(long, env = "ADMIN_PORT")]
    pub admin_port: Option<u16>,
}

/// Proxy configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the proxy listens on
    pub port: u16,
    /// Upper bound on the sum of cached payload sizes, in bytes
    pub max_cache_size: usize,
    /// Largest single response that will be cached, in bytes
    pub max_object_size: usize,
    /// Admin API port, None = admin API disabled
    pub admin_port: Option<u16>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PROXY_PORT` - Listening port (default: 15213)
    /// - `MAX_CACHE_SIZE` - Total cache capacity in bytes (default: 1049000)
    /// - `MAX_OBJECT_SIZE` - Largest cacheable response in bytes (default: 102400)
    /// - `ADMIN_PORT` - Admin API port (default: disabled)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from environment defaults overridden by CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::from_env().with_cli(cli)
    }

    fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if cli.admin_port.is_some() {
            self.admin_port = cli.admin_port;
        }
        self
    }

    fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            port: lookup("PROXY_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            max_cache_size: lookup("MAX_CACHE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cache_size),
            max_object_size: lookup("MAX_OBJECT_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_object_size),
            admin_port: lookup("ADMIN_PORT").and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PROXY_PORT,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            admin_port: None,
        }
    }
}
