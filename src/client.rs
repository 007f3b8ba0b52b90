//! Remote catalog access.
//!
//! `CatalogSource` is the seam between the session and wherever the data
//! comes from; `PokeApiClient` is the HTTP implementation backed by the
//! public PokeAPI.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ExplorerConfig;
use crate::errors::{ConfigError, FetchError, FetchResult};
use schema::{
    GenerationMembers, GenerationResource, Locator, PokemonResource, ResourceList, ResourceRef,
    SpeciesDetail, SpeciesRef, VersionGroupResource, VersionRef, VersionResource,
};

/// Everything the explorer needs from a data source.
///
/// Missing optional links (a version without a version group, a version group
/// without a generation) come back as `Ok(None)`; only failed requests are
/// errors.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_species(&self) -> FetchResult<Vec<SpeciesRef>>;

    async fn list_versions(&self) -> FetchResult<Vec<VersionRef>>;

    async fn list_generations(&self) -> FetchResult<Vec<ResourceRef>>;

    async fn generation_detail(&self, generation: &ResourceRef) -> FetchResult<GenerationMembers>;

    /// Locator of the version group a version belongs to.
    async fn version_group_of(&self, version: &VersionRef) -> FetchResult<Option<Locator>>;

    /// Name of the generation a version group belongs to.
    async fn generation_of(&self, version_group: &str) -> FetchResult<Option<String>>;

    async fn species_detail(&self, species: &SpeciesRef) -> FetchResult<SpeciesDetail>;
}

/// PokeAPI v2 client.
pub struct PokeApiClient {
    base_url: String,
    page_limit: u32,
    http_client: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(config: &ExplorerConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch every entry of a list endpoint, following `next` links.
    async fn list_all(&self, path: &str) -> FetchResult<Vec<ResourceRef>> {
        let mut entries = Vec::new();
        let mut next = Some(format!("{}?limit={}", self.endpoint(path), self.page_limit));

        while let Some(url) = next {
            let page: ResourceList = self.get_json(&url).await?;
            entries.extend(page.results.into_iter().map(ResourceRef::from));
            next = page.next.filter(|next_url| *next_url != url);
        }

        tracing::debug!("Listed {} entries from /{}", entries.len(), path);
        Ok(entries)
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_species(&self) -> FetchResult<Vec<SpeciesRef>> {
        self.list_all("pokemon").await
    }

    async fn list_versions(&self) -> FetchResult<Vec<VersionRef>> {
        self.list_all("version").await
    }

    async fn list_generations(&self) -> FetchResult<Vec<ResourceRef>> {
        self.list_all("generation").await
    }

    async fn generation_detail(&self, generation: &ResourceRef) -> FetchResult<GenerationMembers> {
        let resource: GenerationResource = self.get_json(&generation.locator).await?;
        Ok(GenerationMembers::from_resource(
            resource,
            generation.locator.clone(),
        ))
    }

    async fn version_group_of(&self, version: &VersionRef) -> FetchResult<Option<Locator>> {
        let resource: VersionResource = self.get_json(&version.locator).await?;
        Ok(resource.version_group.map(|group| group.url))
    }

    async fn generation_of(&self, version_group: &str) -> FetchResult<Option<String>> {
        let resource: VersionGroupResource = self.get_json(version_group).await?;
        Ok(resource.generation.map(|generation| generation.name))
    }

    async fn species_detail(&self, species: &SpeciesRef) -> FetchResult<SpeciesDetail> {
        let resource: PokemonResource = self.get_json(&species.locator).await?;
        Ok(SpeciesDetail::from(resource))
    }
}
