//! Crawler-side stub of the parser service

use crate::rpc::wire::{ParseRequest, ParseResponse, CODE_UNAVAILABLE, PARSE_PATH};
use crate::{HarvestError, Result};
use reqwest::Client;
use url::Url;

/// Sends batches to the parser service
///
/// One `parse` call is one request; nothing is retried.
#[derive(Debug, Clone)]
pub struct ParserClient {
    client: Client,
    parse_url: Url,
}

impl ParserClient {
    /// Creates a client for the service at `endpoint` (e.g. `http://parser:50051`)
    pub fn new(endpoint: &str) -> Result<Self> {
        let parse_url = Url::parse(endpoint)?.join(PARSE_PATH)?;
        let client = Client::builder().build().map_err(|e| HarvestError::Transport {
            code: CODE_UNAVAILABLE.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self { client, parse_url })
    }

    pub fn parse_url(&self) -> &Url {
        &self.parse_url
    }

    /// Calls `Parse` with the serialized batch and returns the response message
    ///
    /// A non-success status becomes [`HarvestError::Transport`] carrying the
    /// service's status code name and detail text.
    pub async fn parse(&self, data: String) -> Result<String> {
        let response = self
            .client
            .post(self.parse_url.clone())
            .json(&ParseRequest { data })
            .send()
            .await
            .map_err(|e| HarvestError::Transport {
                code: CODE_UNAVAILABLE.to_string(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| HarvestError::Transport {
            code: CODE_UNAVAILABLE.to_string(),
            detail: format!("failed to read response: {}", e),
        })?;
        let decoded = serde_json::from_str::<ParseResponse>(&body).ok();

        if status.is_success() {
            return decoded.map(|r| r.message).ok_or_else(|| HarvestError::Transport {
                code: status.as_u16().to_string(),
                detail: format!("unexpected response body {:?}", body),
            });
        }

        let (code, detail) = match decoded {
            Some(ParseResponse { code, detail, .. }) => (
                code.unwrap_or_else(|| status.as_u16().to_string()),
                detail.unwrap_or_default(),
            ),
            None => (status.as_u16().to_string(), body),
        };
        Err(HarvestError::Transport { code, detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_url() {
        let client = ParserClient::new("http://parser:50051").unwrap();
        assert_eq!(
            client.parse_url().as_str(),
            "http://parser:50051/parser.Parser/Parse"
        );
    }

    #[tokio::test]
    async fn test_parse_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PARSE_PATH))
            .and(body_json(serde_json::json!({ "data": "[]" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ParseResponse::ok()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ParserClient::new(&server.uri()).unwrap();
        assert_eq!(client.parse("[]".to_string()).await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_parse_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PARSE_PATH))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(ParseResponse::failed("INVALID_ARGUMENT", "row 0 bad")),
            )
            .mount(&server)
            .await;

        let client = ParserClient::new(&server.uri()).unwrap();
        match client.parse("[]".to_string()).await.unwrap_err() {
            HarvestError::Transport { code, detail } => {
                assert_eq!(code, "INVALID_ARGUMENT");
                assert_eq!(detail, "row 0 bad");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parse_unreachable() {
        let client = ParserClient::new("http://127.0.0.1:1").unwrap();
        let err = client.parse("[]".to_string()).await.unwrap_err();
        assert!(matches!(
            err,
            HarvestError::Transport { ref code, .. } if code == CODE_UNAVAILABLE
        ));
    }
}
