// Configuration module entry point
// Layers defaults, config file, environment and command line into one Config

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable that overrides the listen port last
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration for this process, reading `$PORT` from the environment
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let port_env = std::env::var(PORT_ENV).ok();
        Self::load_from(cli, port_env.as_deref())
    }

    /// Load configuration with an explicit `$PORT` value
    ///
    /// Precedence, lowest first: defaults, config file, `FILEKEY__*`
    /// environment variables, command-line flags, `$PORT`.
    pub fn load_from(cli: &Cli, port_env: Option<&str>) -> Result<Self, config::ConfigError> {
        // An unusable $PORT is reported by the caller once logging is up
        let port_override = parse_port_env(port_env).ok().flatten();

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 60)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.enable_cors", false)?
            .add_source(config::File::from(cli.config.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("FILEKEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option(
                "server.workers",
                cli.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .set_override_option("server.port", port_override.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse `$PORT`; unset or empty means no override
///
/// A value that is not a port is an error here; `load_from` ignores it so
/// the lower layers keep the port.
pub fn parse_port_env(value: Option<&str>) -> Result<Option<u16>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .map_err(|e| format!("Ignoring {PORT_ENV}={raw:?}, not a valid port: {e}")),
    }
}
