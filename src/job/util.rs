use bytes::Bytes;
use reqwest::{IntoUrl, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Thin reqwest wrapper shared by the provider and webhook calls.
///
/// No timeout, retry or rate-limit policy is applied: a failed call is
/// reported to the caller and the movie is simply picked up again on the
/// next cycle.
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    bearer: Option<String>,
}

#[derive(Error, Debug)]
pub enum RequestError {
    /// Non-2xx response; `status` displays as code plus status text.
    #[error("HTTP error response: {status}")]
    Status { status: StatusCode, body: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum JsonDecodeError {
    #[error("network error while decoding JSON {0}")]
    NetworkError(#[from] RequestError),
    #[error("decoding error while decoding JSON {0}")]
    DecodeError(#[from] serde_json::Error),
}

impl Client {
    pub fn new() -> Self {
        Client {
            client: reqwest::Client::new(),
            bearer: None,
        }
    }

    /// Attach a bearer credential sent with every request.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub async fn get<U: IntoUrl>(&self, url: U) -> Result<Bytes, RequestError> {
        self.send(self.client.get(url)).await
    }

    pub async fn post<U: IntoUrl>(
        &self,
        url: U,
        body: serde_json::Value,
    ) -> Result<Bytes, RequestError> {
        self.send(self.client.post(url).json(&body)).await
    }

    pub async fn get_json<U: IntoUrl, T: DeserializeOwned>(
        &self,
        url: U,
    ) -> Result<T, JsonDecodeError> {
        let response = self.get(url).await?;
        serde_json::from_slice(&response).map_err(JsonDecodeError::DecodeError)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Bytes, RequestError> {
        let request = match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }
        Ok(response.bytes().await?)
    }
}
