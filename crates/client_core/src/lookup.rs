use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{ApplianceName, BrandName, IssueName},
    error::ErrorResponse,
    protocol::{SolutionRequest, SolutionResponse},
};

use crate::error::LookupError;

/// Default base path of the lookup service, matching its development bind.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";

#[async_trait]
pub trait LookupService: Send + Sync {
    async fn brands(&self) -> Result<Vec<BrandName>, LookupError>;
    async fn appliances(&self, brand: &BrandName) -> Result<Vec<ApplianceName>, LookupError>;
    async fn issues(
        &self,
        brand: &BrandName,
        appliance: &ApplianceName,
    ) -> Result<Vec<IssueName>, LookupError>;
    async fn solution(&self, request: &SolutionRequest) -> Result<SolutionResponse, LookupError>;
}

pub struct HttpLookupService {
    http: Client,
    base_url: String,
}

impl HttpLookupService {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let response = self
            .http
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(|err| LookupError::Unreachable(err.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LookupError> {
        let status = response.status();
        if !status.is_success() {
            // A failure body is optional; fall back to the bare status code.
            let body: ErrorResponse = response.json().await.unwrap_or_default();
            return Err(match body.into_message() {
                Some(message) => LookupError::Rejected(message),
                None => LookupError::Status(status.as_u16()),
            });
        }
        response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))
    }
}

impl Default for HttpLookupService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupService for HttpLookupService {
    async fn brands(&self) -> Result<Vec<BrandName>, LookupError> {
        self.get_json("brands", &[]).await
    }

    async fn appliances(&self, brand: &BrandName) -> Result<Vec<ApplianceName>, LookupError> {
        self.get_json("appliances", &[("brand", brand.as_str())])
            .await
    }

    async fn issues(
        &self,
        brand: &BrandName,
        appliance: &ApplianceName,
    ) -> Result<Vec<IssueName>, LookupError> {
        self.get_json(
            "issues",
            &[("brand", brand.as_str()), ("appliance", appliance.as_str())],
        )
        .await
    }

    async fn solution(&self, request: &SolutionRequest) -> Result<SolutionResponse, LookupError> {
        let response = self
            .http
            .post(format!("{}/solution", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| LookupError::Unreachable(err.to_string()))?;
        Self::decode(response).await
    }
}
