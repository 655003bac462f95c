use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, RpcError};

use super::{Method, Transport};

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
}

/// A mock transport for testing. Returns canned JSON keyed by full URL and
/// records every request it receives. Unknown URLs answer with a 404 status
/// error.
pub struct MockTransport {
    responses: HashMap<String, Result<Value, (u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            responses: HashMap::new(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock request log poisoned").clone()
    }
}

pub struct MockTransportBuilder {
    responses: HashMap<String, Result<Value, (u16, String)>>,
}

impl MockTransportBuilder {
    /// Answer `url` with `json` (must be valid JSON text).
    pub fn with_response(mut self, url: &str, json: &str) -> Self {
        let value = serde_json::from_str(json).expect("canned response must be valid JSON");
        self.responses.insert(url.to_owned(), Ok(value));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_owned(), Err((status, body.to_owned())));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            responses: self.responses,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        url: &str,
        body: Option<&Value>,
        method: Method,
    ) -> Result<Value, CoreError> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(RecordedRequest {
                url: url.to_owned(),
                method,
                body: body.cloned(),
            });

        match self.responses.get(url) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err((status, body))) => Err(RpcError::Status {
                status: *status,
                body: body.clone(),
            }
            .into()),
            None => Err(RpcError::Status {
                status: 404,
                body: format!("no canned response for {url}"),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_url_is_a_404() {
        let mock = MockTransport::builder().build();
        let err = mock
            .request("http://node/missing", None, Method::Get)
            .await
            .expect_err("unknown url must fail");
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::Status { status: 404, .. })
        ));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn canned_status_keeps_raw_body() {
        let mock = MockTransport::builder()
            .with_status("http://node/x", 500, "[{\"kind\":\"temporary\"}]")
            .build();
        let err = mock
            .request("http://node/x", None, Method::Get)
            .await
            .expect_err("canned status must fail");
        match err {
            CoreError::Rpc(RpcError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "[{\"kind\":\"temporary\"}]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
