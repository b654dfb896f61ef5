use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Response, StatusCode,
};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Too many requests")]
    TooManyRequests,
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        HttpError::Network(error.to_string())
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get_json(&self, url: &str, params: Option<Value>) -> Result<Value, HttpError>;
    async fn post_json(&self, url: &str, data: Option<Value>) -> Result<Value, HttpError>;
}

#[derive(Clone)]
pub struct HttpService {
    client: Client,
}

impl HttpService {
    /// The api key, when given, is sent as the provider's
    /// `Authorization: apikey <key>` header on every request.
    pub fn new(api_key: Option<&str>) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("apikey {}", key))
                .map_err(|e| HttpError::Network(e.to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    async fn handle_response(&self, response: Response) -> Result<Value, HttpError> {
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(HttpError::TooManyRequests),
            status if status.is_success() => {
                let text = response.text().await?;
                if text.trim().is_empty() {
                    return Err(HttpError::Deserialize("Empty response body".to_string()));
                }
                serde_json::from_str(&text)
                    .map_err(|e| HttpError::Deserialize(format!("Failed to parse JSON: {}", e)))
            }
            status => Err(HttpError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for HttpService {
    async fn get_json(&self, url: &str, params: Option<Value>) -> Result<Value, HttpError> {
        let mut builder = self.client.get(url);
        if let Some(params) = params {
            builder = builder.query(&params);
        }
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    async fn post_json(&self, url: &str, data: Option<Value>) -> Result<Value, HttpError> {
        let mut builder = self.client.post(url);
        if let Some(data) = data {
            builder = builder.json(&data);
        }
        let response = builder.send().await?;
        self.handle_response(response).await
    }
}
