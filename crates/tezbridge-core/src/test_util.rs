//! Shared test helpers for `tezbridge-core` unit tests.

use std::sync::Arc;

use crate::protocol::{Capabilities, Protocol};
use crate::transport::mock::MockTransport;
use crate::transport::{HostCall, Method};

/// Host used by mock-backed tests.
pub const HOST: &str = "http://node.test:8732";

/// Bind the default protocol's capability groups to `mock` on [`HOST`].
/// Returns the shared mock so tests can inspect recorded requests.
pub fn capabilities_on(mock: MockTransport) -> (Arc<MockTransport>, Capabilities) {
    let mock = Arc::new(mock);
    let host: Arc<str> = Arc::from(HOST);
    let capabilities = Protocol::DEFAULT.bind(
        HostCall::new(mock.clone(), Arc::clone(&host), Method::Get),
        HostCall::new(mock.clone(), host, Method::Post),
    );
    (mock, capabilities)
}
