use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Item listing service for the gifting marketplace")]
pub struct Args {
    /// Host to bind to (overrides ITEM_SERVICE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides ITEM_SERVICE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides ITEM_SERVICE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Connection pool size (overrides ITEM_SERVICE_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |name| env::var(name))?;
        Ok((cfg, migrate))
    }

    /// Merge CLI args over values read through `lookup`, falling back to defaults.
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = lookup("ITEM_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_var(&lookup, "ITEM_SERVICE_PORT", 3000u16)?;
        let env_db = lookup("ITEM_SERVICE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/items.db".into());
        let env_max = parse_var(&lookup, "ITEM_SERVICE_MAX_CONNECTIONS", 5u32)?;

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            max_connections: args.max_connections.unwrap_or(env_max),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Result<String, env::VarError>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_without_env_or_args() {
        let cfg = AppConfig::merge(Args::default(), lookup_from(&[])).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert_eq!(cfg.database_url, "sqlite://./data/items.db");
        assert_eq!(cfg.max_connections, 5);
    }

    #[test]
    fn args_override_env() {
        let args = Args {
            port: Some(8080),
            ..Args::default()
        };
        let cfg = AppConfig::merge(
            args,
            lookup_from(&[("ITEM_SERVICE_PORT", "9000"), ("ITEM_SERVICE_HOST", "127.0.0.1")]),
        )
        .unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = AppConfig::merge(Args::default(), lookup_from(&[("ITEM_SERVICE_PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("ITEM_SERVICE_PORT"));
    }
}
