//! HTTP server configuration
//!
//! Each service reads its bind address through the `config` crate using its
//! own environment prefix, e.g. `AUTH_HOST` / `AUTH_PORT`.

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Listener configuration for a service
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl ServerConfig {
    /// Load the server configuration for a service
    ///
    /// # Environment Variables
    /// - `{PREFIX}_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `{PREFIX}_PORT`: Port to bind (default: `default_port`)
    pub fn load(prefix: &str, default_port: u16) -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Socket address string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
