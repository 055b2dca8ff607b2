//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{AuthError, Result};
use std::path::Path;
use tracing::info;

/// Server builder for easier configuration
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the bind host
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.get_or_insert_with(Config::default).server.host = host.into();
        self
    }

    /// Override the bind port
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.get_or_insert_with(Config::default).server.port = port;
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| AuthError::config("Configuration is required"))?;

        config.validate()?;
        HttpServer::new(&config)
    }
}

/// Load `config_path` and serve until shutdown
pub async fn run_server<P: AsRef<Path>>(
    config_path: P,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = Config::from_file(config_path).await?;

    let mut builder = ServerBuilder::new().with_config(config);
    if let Some(host) = host {
        builder = builder.with_host(host);
    }
    if let Some(port) = port {
        builder = builder.with_port(port);
    }

    let server = builder.build()?;
    info!(
        "Server starting at http://{} with authenticators [{}]",
        server.config().address(),
        server.state().auth.authenticators().names().join(", ")
    );
    info!("   POST /login  - Run the authentication chain");
    info!("   GET  /me     - Current identity");
    info!("   POST /logout - Clear persisted identity");
    info!("   GET  /health - Health check");

    server.start().await
}
