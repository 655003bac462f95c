pub mod bridge;
pub mod error;
pub mod external;
pub mod network;
pub mod protocol;
pub mod step;
pub mod transport;

#[cfg(test)]
mod test_util;

pub use bridge::{Bridge, BridgeConfig};
pub use error::{CoreError, RpcError};
pub use network::NetworkKind;
pub use protocol::Protocol;
pub use step::{Flow, Step};
pub use transport::{HttpTransport, HttpTransportConfig, Method, Transport};
