//! # REST Client
//!
//! One request per call, no retries. A non-2xx status becomes
//! [`RemoteError::Status`] carrying the server's `{"message": ...}` if any.
//!
//! ## Mutation Responses
//! ```text
//! POST / PUT response
//!      │
//!      ├── JSON body      ──► decoded record (server may assign id, dates)
//!      └── empty / 204    ──► the record that was sent
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{RemoteError, RemoteResult};
use crate::wire::RemoteResource;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client bound to one server base URL.
///
/// ## Example
/// ```rust,ignore
/// let client = RestClient::new("https://localhost:7078/api", Duration::from_secs(10), false)?;
/// let products: Vec<Product> = client.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    base: Url,
    http: reqwest::Client,
}

impl RestClient {
    /// Builds a client. The base URL must be absolute http(s).
    ///
    /// `accept_invalid_certs` allows self-signed development servers.
    pub fn new(base_url: &str, timeout: Duration, accept_invalid_certs: bool) -> RemoteResult<Self> {
        let invalid = |reason: &str| RemoteError::InvalidUrl {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let base = Url::parse(base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL"));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        Ok(RestClient { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{segments...}`, keeping any path already on the base.
    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            let err = RemoteError::from(e);
            warn!(error = %err, "Request failed");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        warn!(status = status.as_u16(), message = ?message, "Server rejected request");
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Decodes a mutation response, falling back to what was sent.
    async fn echo_or_decode<R: RemoteResource>(
        response: reqwest::Response,
        sent: &R,
    ) -> RemoteResult<R> {
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(sent.clone());
        }
        let wire: R::Wire =
            serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(R::from_wire(wire))
    }

    /// `GET {base}/{resource}`
    pub async fn list<R: RemoteResource>(&self) -> RemoteResult<Vec<R>> {
        let url = self.endpoint(&[R::PATH])?;
        debug!(%url, entity = R::ENTITY, "GET");

        let response = self.send(self.http.get(url)).await?;
        let body = response.bytes().await?;
        let wires: Vec<R::Wire> =
            serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;

        debug!(entity = R::ENTITY, count = wires.len(), "Listed");
        Ok(wires.into_iter().map(R::from_wire).collect())
    }

    /// `POST {base}/{resource}/add`
    pub async fn create<R: RemoteResource>(&self, record: &R) -> RemoteResult<R> {
        let url = self.endpoint(&[R::PATH, "add"])?;
        debug!(%url, entity = R::ENTITY, id = record.id(), "POST");

        let response = self.send(self.http.post(url).json(&record.to_wire())).await?;
        Self::echo_or_decode(response, record).await
    }

    /// `PUT {base}/{resource}/update/{id}`
    pub async fn update<R: RemoteResource>(&self, record: &R) -> RemoteResult<R> {
        let url = self.endpoint(&[R::PATH, "update", record.id()])?;
        debug!(%url, entity = R::ENTITY, "PUT");

        let response = self.send(self.http.put(url).json(&record.to_wire())).await?;
        Self::echo_or_decode(response, record).await
    }

    /// `DELETE {base}/{resource}/delete/{id}`
    pub async fn delete<R: RemoteResource>(&self, id: &str) -> RemoteResult<()> {
        let url = self.endpoint(&[R::PATH, "delete", id])?;
        debug!(%url, entity = R::ENTITY, "DELETE");

        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::new(base, Duration::from_secs(1), false).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://localhost:7078/api");
        assert_eq!(
            c.endpoint(&["products", "update", "42"]).unwrap().as_str(),
            "https://localhost:7078/api/products/update/42"
        );

        let trailing = client("http://pos.local/api/");
        assert_eq!(
            trailing.endpoint(&["sales"]).unwrap().as_str(),
            "http://pos.local/api/sales"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let c = client("http://pos.local/api");
        assert_eq!(
            c.endpoint(&["sales", "delete", "a b/c"]).unwrap().as_str(),
            "http://pos.local/api/sales/delete/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        assert!(RestClient::new("localhost:7078", Duration::from_secs(1), false).is_err());
        assert!(RestClient::new("ftp://pos.local", Duration::from_secs(1), false).is_err());
        assert!(RestClient::new("not a url", Duration::from_secs(1), false).is_err());
    }
}
