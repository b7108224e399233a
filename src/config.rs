//! Mirror configuration
//!
//! The mirror target arrives as a single `"IP:PORT"` token. It is
//! validated here, before any session or socket exists.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::constants::FRAME_SAMPLES;
use crate::error::ConfigError;

/// Configuration for one mirror target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Listener target as "IP:PORT"
    pub target: String,

    /// Samples carried per RTP packet
    pub max_frame_samples: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1:40000".to_string(),
            max_frame_samples: FRAME_SAMPLES,
        }
    }
}

impl MirrorConfig {
    /// Parse a TOML document into a config
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the validated destination address
    pub fn target_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_target(&self.target)
    }
}

/// Parse an `"IP:PORT"` token into a socket address.
///
/// Fails fast on malformed input; port 0 is rejected.
pub fn parse_target(token: &str) -> Result<SocketAddr, ConfigError> {
    let addr: SocketAddr = token
        .parse()
        .map_err(|_| ConfigError::InvalidTarget(token.to_string()))?;

    if addr.port() == 0 {
        return Err(ConfigError::ZeroPort);
    }

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_target() {
        let addr = parse_target("127.0.0.1:40000").unwrap();
        assert!(addr.is_ipv4());
        assert_eq!(addr.port(), 40000);
    }

    #[test]
    fn test_parse_ipv6_target() {
        let addr = parse_target("[::1]:40000").unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 40000);
    }

    #[test]
    fn test_malformed_targets_rejected() {
        for token in ["", "10.0.0.1", "10.0.0.1:", "10.0.0.1:notaport", "host:40000"] {
            assert!(
                matches!(parse_target(token), Err(ConfigError::InvalidTarget(_))),
                "token: {}",
                token
            );
        }
    }

    #[test]
    fn test_zero_port_rejected() {
        assert!(matches!(
            parse_target("127.0.0.1:0"),
            Err(ConfigError::ZeroPort)
        ));
    }

    #[test]
    fn test_toml_defaults() {
        let config = MirrorConfig::from_toml("target = \"10.1.2.3:9000\"").unwrap();
        assert_eq!(config.target, "10.1.2.3:9000");
        assert_eq!(config.max_frame_samples, FRAME_SAMPLES);
    }

    #[test]
    fn test_toml_parse_error() {
        assert!(MirrorConfig::from_toml("target = 12").is_err());
    }
}
