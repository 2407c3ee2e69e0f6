use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::error::RestError;

/// Shared client for the control-plane REST API.
///
/// Safe for concurrent use: credentials and the TLS posture are composed at
/// construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    credentials: Option<(String, String)>,
}

impl RestClient {
    /// Build a client for `base`, optionally with basic-auth credentials
    /// (`org/user`, password) and certificate verification disabled.
    pub fn new(
        mut base: Url,
        credentials: Option<(String, String)>,
        skip_verify: bool,
        request_timeout: Option<Duration>,
    ) -> Result<Self, RestError> {
        // Url::join treats a base without a trailing slash as a file path
        // and would drop its last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(skip_verify);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, RestError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RestError::InvalidArgument(format!("invalid path '{}': {}", path, e)))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => req.basic_auth(user, Some(password)),
            None => req,
        }
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, RestError> {
        let resp = self.authorize(req).send().await?;
        let status = resp.status();
        trace!(status = status.as_u16(), "control plane response");
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = RestError::from_response(status.as_u16(), &body);
        debug!(status = status.as_u16(), error = %err, "control plane request failed");
        Err(err)
    }

    /// GET a resource and decode its JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RestError> {
        let url = self.url(path)?;
        let resp = self.execute(self.http.get(url)).await?;
        Ok(resp.json().await?)
    }

    /// GET with query parameters, decoding the JSON body.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.url(path)?;
        let resp = self.execute(self.http.get(url).query(query)).await?;
        Ok(resp.json().await?)
    }

    /// PUT a JSON body. Used for both create (no resource version) and
    /// update (version echoed for optimistic concurrency).
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RestError> {
        let url = self.url(path)?;
        self.execute(self.http.put(url).json(body)).await?;
        Ok(())
    }

    /// POST a JSON body to a sub-resource.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RestError> {
        let url = self.url(path)?;
        self.execute(self.http.post(url).json(body)).await?;
        Ok(())
    }

    /// DELETE a resource. Deletion is asynchronous server-side; poll the
    /// GET endpoint until it returns 404.
    pub async fn delete(&self, path: &str) -> Result<(), RestError> {
        let url = self.url(path)?;
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }
}
