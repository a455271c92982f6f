//! Solana Explorer links.

use crate::types::Cluster;

const EXPLORER_BASE: &str = "https://explorer.solana.com";

/// Builds explorer links for one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explorer {
    cluster: Cluster,
    /// RPC endpoint, only used for the custom cluster.
    custom_url: Option<String>,
}

impl Explorer {
    pub fn new(cluster: Cluster, custom_url: Option<String>) -> Self {
        Self {
            cluster,
            custom_url,
        }
    }

    pub fn address_url(&self, address: &str) -> String {
        self.url("address", address)
    }

    pub fn transaction_url(&self, signature: &str) -> String {
        self.url("tx", signature)
    }

    fn url(&self, kind: &str, id: &str) -> String {
        let base = format!("{EXPLORER_BASE}/{kind}/{id}");
        let params: Vec<(&str, &str)> = match (self.cluster, self.custom_url.as_deref()) {
            (Cluster::MainnetBeta, _) => vec![],
            (Cluster::Custom, Some(rpc)) => vec![("cluster", "custom"), ("customUrl", rpc)],
            (cluster, _) => vec![("cluster", cluster.as_str())],
        };
        if params.is_empty() {
            return base;
        }
        match reqwest::Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_address() {
        let explorer = Explorer::new(Cluster::Devnet, None);
        assert_eq!(
            explorer.address_url("Mint111"),
            "https://explorer.solana.com/address/Mint111?cluster=devnet"
        );
    }

    #[test]
    fn devnet_transaction() {
        let explorer = Explorer::new(Cluster::Devnet, None);
        assert_eq!(
            explorer.transaction_url("5sig"),
            "https://explorer.solana.com/tx/5sig?cluster=devnet"
        );
    }

    #[test]
    fn mainnet_has_no_cluster_param() {
        let explorer = Explorer::new(Cluster::MainnetBeta, None);
        assert_eq!(
            explorer.transaction_url("5sig"),
            "https://explorer.solana.com/tx/5sig"
        );
    }

    #[test]
    fn custom_cluster_encodes_rpc_url() {
        let explorer = Explorer::new(Cluster::Custom, Some("http://localhost:8899".into()));
        assert_eq!(
            explorer.address_url("Mint111"),
            "https://explorer.solana.com/address/Mint111?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899"
        );
    }
}
