//! Service configuration

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Development broker key. Private key:
/// A7E3EA5D3B0A97EAE5CA1EB240902FADA0E0740F83F5DCCABD8E0BD60C3180F6
pub const DEV_BROKER_PUBKEY: &str =
    "032C2CEC8D4D581F2589DB146339995000A1D399C6BFBAA4572AA84C3E11BE6939";

/// Development user refund key. Private key:
/// 74DA34B76133040AB3F1EE6D40ED4BF338DEF1562DA8E6C3314BE19EB09AC2B1
pub const DEV_USER_PUBKEY: &str =
    "039115E11C22A7699EFBB07CD2248E7158386D0EE0ECEC0188CBFBA21CE5C4BF42";

/// Web service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// HTTP port
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// How long after invoice expiry the user must wait to reclaim a deposit
    pub swap_expiry_hours: u64,
    /// Broker public key (hex, compressed)
    pub broker_pubkey: String,
    /// User refund public key (hex, compressed)
    pub user_pubkey: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: PathBuf::from("./ui/static"),
            swap_expiry_hours: 3 * 24,
            broker_pubkey: DEV_BROKER_PUBKEY.into(),
            user_pubkey: DEV_USER_PUBKEY.into(),
        }
    }
}

impl WebConfig {
    /// Load from file
    pub fn load(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn swap_expiry(&self) -> Duration {
        Duration::from_secs(self.swap_expiry_hours * 3600)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: WebConfig = serde_json::from_str(r#"{"port": 9000, "swap_expiry_hours": 1}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.swap_expiry(), Duration::from_secs(3600));
        assert_eq!(config.broker_pubkey, DEV_BROKER_PUBKEY);
        assert_eq!(config.addr().port(), 9000);
    }

    #[test]
    fn test_missing_file() {
        assert!(WebConfig::load("/nonexistent/submarine-web.json").is_err());
    }
}
