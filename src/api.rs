use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A displayable image, kept as the opaque URL the API returned.
pub type ImageUrl = String;

/// One breed as listed by the API. `name` is unique within a loaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breed {
    pub name: String,
    pub sub_breeds: Vec<String>,
}

/// Errors surfaced by the upstream breed/image API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The response envelope carried a non-success `status` field.
    #[error("API reported status {0:?}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct BreedListResponse {
    message: BTreeMap<String, Vec<String>>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct BreedImagesResponse {
    message: Vec<ImageUrl>,
    status: String,
}

/// Upstream data collaborator for the directory and gallery views.
///
/// Implementations do not enforce the per-fetch deadline; the calling task
/// wraps each call in its configured timeout.
#[async_trait]
pub trait BreedProvider: Send + Sync {
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError>;

    async fn list_images(&self, breed: &str, count: usize) -> Result<Vec<ImageUrl>, ApiError>;
}

/// HTTP client for the dog.ceo API.
pub struct DogCeoClient {
    http: reqwest::Client,
    base_url: String,
}

impl DogCeoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl BreedProvider for DogCeoClient {
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        let url = format!("{}/breeds/list/all", self.base_url);
        let body: BreedListResponse = self.get_json(&url).await?;
        ensure_success(body.status)?;
        Ok(body
            .message
            .into_iter()
            .map(|(name, sub_breeds)| Breed { name, sub_breeds })
            .collect())
    }

    async fn list_images(&self, breed: &str, count: usize) -> Result<Vec<ImageUrl>, ApiError> {
        let url = format!("{}/breed/{}/images/random/{}", self.base_url, breed, count);
        let body: BreedImagesResponse = self.get_json(&url).await?;
        ensure_success(body.status)?;
        Ok(body.message)
    }
}

fn ensure_success(status: String) -> Result<(), ApiError> {
    if status == "success" {
        Ok(())
    } else {
        Err(ApiError::Api(status))
    }
}
