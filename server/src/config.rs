use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use error_stack::{Context, ResultExt};

use kernel::KernelError;

static SERVER_HOST: &str = "SERVER_HOST";
static SERVER_PORT: &str = "SERVER_PORT";
static LOG_DIR: &str = "LOG_DIR";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_DIR: &str = "./logs/";

/// Process settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    pub fn load() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> error_stack::Result<Self, KernelError> {
        let host: IpAddr = parse_or(&lookup, SERVER_HOST, DEFAULT_HOST)?;
        let port: u16 = parse_or(&lookup, SERVER_PORT, &DEFAULT_PORT.to_string())?;
        let log_dir = lookup(LOG_DIR).unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());
        Ok(Self {
            bind: SocketAddr::new(host, port),
            log_dir: PathBuf::from(log_dir),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> error_stack::Result<T, KernelError>
where
    T: FromStr,
    T::Err: Context,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value
        .parse::<T>()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Invalid value for env {key}: {value}"))
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::ServerConfig;

    fn load(vars: &[(&str, &str)]) -> error_stack::Result<ServerConfig, kernel::KernelError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_dir, PathBuf::from("./logs/"));
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "3000"),
            ("LOG_DIR", "/var/log/catalog"),
        ])
        .unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/catalog"));
    }

    #[test]
    fn invalid_port_is_reported() {
        assert!(load(&[("SERVER_PORT", "eighty")]).is_err());
    }
}
