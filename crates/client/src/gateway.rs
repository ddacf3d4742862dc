use std::{collections::BTreeMap, time::Duration};

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, FieldErrors, Result},
    session::SessionStore,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error payload of the service. Depending on the failure it carries a code
/// (`error`), a human message (`message`) or per-field messages (`messages`).
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    messages: Option<BTreeMap<String, String>>,
}

/// The single HTTP client every resource call goes through.
///
/// Attaches the session's bearer token to each request. One attempt per
/// call; nothing is retried.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
    http: reqwest::Client,
    session: SessionStore,
}

impl Gateway {
    pub fn new(base_url: &str, timeout: Duration, session: SessionStore) -> Result<Self> {
        // `Url::join` drops the last segment unless the base ends with `/`.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url,
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        tracing::debug!("{method} {url}");

        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await.map_err(|err| {
            let err = ClientError::from_transport(err);
            tracing::warn!("request failed: {err}");
            err
        })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.json::<ErrorBody>().await.unwrap_or_default();
        let err = error_for_status(status, body);
        tracing::warn!("request rejected: {err}");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
        res.json::<T>().await.map_err(ClientError::from_transport)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self.send(self.request(Method::GET, path)?).await?;
        Self::decode(res).await
    }

    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .send(self.request(Method::GET, path)?.query(query))
            .await?;
        Self::decode(res).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .send(self.request(Method::POST, path)?.json(body))
            .await?;
        Self::decode(res).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self
            .send(self.request(Method::PUT, path)?.json(body))
            .await?;
        Self::decode(res).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

fn error_for_status(status: StatusCode, body: ErrorBody) -> ClientError {
    if status == StatusCode::BAD_REQUEST
        && let Some(messages) = body.messages.filter(|m| !m.is_empty())
    {
        return ClientError::Validation(messages.into_iter().collect::<FieldErrors>());
    }

    let message = body
        .message
        .or(body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("server error").to_string());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Http { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn body(json: &str) -> ErrorBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn validation_failures_become_field_errors() {
        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            body(r#"{"error":"VALIDATION_FAILED","messages":{"name":"Name of transaction is required"}}"#),
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("name"), Some("Name of transaction is required"));
    }

    #[test]
    fn message_is_preferred_over_code() {
        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            body(r#"{"error":"USERNAME_EXISTS","message":"Username already exists"}"#),
        );
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Username already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn auth_statuses_map_to_kinds() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ErrorBody::default()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, ErrorBody::default()),
            ClientError::Forbidden
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, ErrorBody::default()),
            ClientError::NotFound(_)
        ));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_prefix() {
        let gateway = Gateway::new(
            "http://localhost:8080/api",
            DEFAULT_TIMEOUT,
            SessionStore::new(MemoryStorage::new()),
        )
        .unwrap();
        let url = gateway.base_url().join("transaction/new").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/transaction/new");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = Gateway::new(
            "not a url",
            DEFAULT_TIMEOUT,
            SessionStore::new(MemoryStorage::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }
}
