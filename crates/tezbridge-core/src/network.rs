use std::fmt;

use serde::{Deserialize, Serialize};

/// Which Tezos network a host serves.
///
/// Derived once from the host string: any host containing `alphanet` is
/// treated as alphanet, everything else as mainnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    Alphanet,
}

impl NetworkKind {
    pub fn from_host(host: &str) -> Self {
        if host.contains("alphanet") {
            Self::Alphanet
        } else {
            Self::Mainnet
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Alphanet => "alphanet",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
