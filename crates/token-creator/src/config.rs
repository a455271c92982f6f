//! Runtime configuration, read from `TOKEN_CREATOR_*` environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pinning::Gateway;
use crate::submit::ConfirmationSettings;
use crate::types::{Cluster, Commitment, CreationOptions, DuplicateKeyPolicy};

const ENV_PREFIX: &str = "TOKEN_CREATOR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreatorConfig {
    /// JSON-RPC endpoint. Defaults to the cluster's public endpoint.
    pub rpc_url: Option<String>,
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub duplicate_keys: DuplicateKeyPolicy,
    pub pinata_jwt: Option<String>,
    pub pinata_gateway: Option<String>,
    pub pinata_gateway_token: Option<String>,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            cluster: Cluster::Devnet,
            commitment: Commitment::Confirmed,
            confirm_timeout_secs: 60,
            poll_interval_ms: 500,
            duplicate_keys: DuplicateKeyPolicy::Reject,
            pinata_jwt: None,
            pinata_gateway: None,
            pinata_gateway_token: None,
        }
    }
}

impl CreatorConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit variable map instead of the process
    /// environment. Keys carry the `TOKEN_CREATOR_` prefix.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let config: CreatorConfig = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.confirm_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "confirm_timeout_secs",
                value: "0".into(),
                expected: "greater than 0",
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                value: "0".into(),
                expected: "greater than 0",
            });
        }
        if self.poll_interval_ms > self.confirm_timeout_secs.saturating_mul(1000) {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                value: self.poll_interval_ms.to_string(),
                expected: "at most the confirmation timeout",
            });
        }
        if self.cluster == Cluster::Custom && self.rpc_url.is_none() {
            return Err(ConfigError::Invalid {
                field: "rpc_url",
                value: "unset".into(),
                expected: "an RPC URL for the custom cluster",
            });
        }
        if let Some(url) = &self.rpc_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    field: "rpc_url",
                    value: url.clone(),
                    expected: "an http(s) URL",
                });
            }
        }
        Ok(())
    }

    pub fn rpc_url(&self) -> &str {
        match &self.rpc_url {
            Some(url) => url,
            None => self.cluster.default_rpc_url().unwrap_or_default(),
        }
    }

    pub fn confirmation(&self) -> ConfirmationSettings {
        ConfirmationSettings {
            commitment: self.commitment,
            timeout: Duration::from_secs(self.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn creation_options(&self) -> CreationOptions {
        CreationOptions {
            duplicate_keys: self.duplicate_keys,
            ..Default::default()
        }
    }

    /// The Pinata gateway, if configured.
    pub fn gateway(&self) -> Option<Gateway> {
        self.pinata_gateway
            .as_ref()
            .filter(|d| !d.is_empty())
            .map(|domain| Gateway {
                domain: domain.clone(),
                access_token: self.pinata_gateway_token.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_empty() {
        let config = CreatorConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, CreatorConfig::default());
        assert_eq!(config.rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(config.confirmation(), ConfirmationSettings::default());
        assert!(config.gateway().is_none());
    }

    #[test]
    fn reads_prefixed_vars() {
        let config = CreatorConfig::from_vars(vars(&[
            ("TOKEN_CREATOR_CLUSTER", "mainnet-beta"),
            ("TOKEN_CREATOR_COMMITMENT", "finalized"),
            ("TOKEN_CREATOR_CONFIRM_TIMEOUT_SECS", "30"),
            ("TOKEN_CREATOR_POLL_INTERVAL_MS", "250"),
            ("TOKEN_CREATOR_DUPLICATE_KEYS", "overwrite"),
            ("TOKEN_CREATOR_PINATA_GATEWAY", "example.mypinata.cloud"),
            ("TOKEN_CREATOR_PINATA_GATEWAY_TOKEN", "tok"),
        ]))
        .unwrap();

        assert_eq!(config.cluster, Cluster::MainnetBeta);
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(
            config.creation_options().duplicate_keys,
            DuplicateKeyPolicy::Overwrite
        );
        assert_eq!(config.confirmation().timeout, Duration::from_secs(30));
        assert_eq!(config.confirmation().poll_interval, Duration::from_millis(250));
        assert_eq!(config.rpc_url(), "https://api.mainnet-beta.solana.com");
        assert_eq!(
            config.gateway().unwrap().file_url("cid"),
            "https://example.mypinata.cloud/ipfs/cid?pinataGatewayToken=tok"
        );
    }

    #[test]
    fn custom_cluster_needs_rpc_url() {
        let err = CreatorConfig::from_vars(vars(&[("TOKEN_CREATOR_CLUSTER", "custom")]))
            .unwrap_err();
        assert!(err.to_string().contains("rpc_url"));

        let config = CreatorConfig::from_vars(vars(&[
            ("TOKEN_CREATOR_CLUSTER", "custom"),
            ("TOKEN_CREATOR_RPC_URL", "http://localhost:8899"),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url(), "http://localhost:8899");
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = CreatorConfig::from_vars(vars(&[("TOKEN_CREATOR_CONFIRM_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "confirm_timeout_secs", .. }));
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let config = CreatorConfig::from_vars(vars(&[(
            "TOKEN_CREATOR_CONFIRM_TIMEOUT_SECS",
            "18446744073709552",
        )]))
        .unwrap();
        assert_eq!(config.confirm_timeout_secs, 18_446_744_073_709_552);

        let err = CreatorConfig::from_vars(vars(&[
            ("TOKEN_CREATOR_CONFIRM_TIMEOUT_SECS", "1"),
            ("TOKEN_CREATOR_POLL_INTERVAL_MS", "1001"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "poll_interval_ms", .. }));
    }

    #[test]
    fn unknown_commitment_fails_to_load() {
        let err = CreatorConfig::from_vars(vars(&[("TOKEN_CREATOR_COMMITMENT", "eventually")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
