//! Session catalogs and the loaders that populate them.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::client::CatalogSource;
use crate::errors::FetchResult;
use schema::{GenerationMembers, GenerationRef, SpeciesRef, VersionRef};

/// Generations in release order plus the species each one lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationCatalog {
    generations: Vec<GenerationRef>,
    index: HashMap<String, HashSet<String>>,
}

impl GenerationCatalog {
    pub fn from_members(members: Vec<GenerationMembers>) -> Self {
        let mut generations = Vec::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());

        for entry in members {
            index.insert(
                entry.generation.name.clone(),
                entry.species.into_iter().collect::<HashSet<_>>(),
            );
            generations.push(entry.generation);
        }
        generations.sort_by_key(|generation| generation.release_order);

        Self { generations, index }
    }

    /// Generations sorted by release order.
    pub fn generations(&self) -> &[GenerationRef] {
        &self.generations
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty() || self.index.is_empty()
    }

    pub fn position(&self, generation: &str) -> Option<usize> {
        self.generations.iter().position(|g| g.name == generation)
    }

    /// Union of the species listed for every generation up to and including
    /// the one at `position`.
    pub fn species_through(&self, position: usize) -> HashSet<&str> {
        self.generations
            .iter()
            .take(position + 1)
            .filter_map(|generation| self.index.get(&generation.name))
            .flat_map(|species| species.iter().map(String::as_str))
            .collect()
    }
}

/// Versions and generations, loaded together as the session's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub versions: Vec<VersionRef>,
    pub generations: GenerationCatalog,
}

/// The full species list, sorted by name.
pub async fn load_species_catalog(source: &dyn CatalogSource) -> FetchResult<Vec<SpeciesRef>> {
    let mut species = source.list_species().await?;
    species.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!("Loaded {} species", species.len());
    Ok(species)
}

/// List generations, then fetch each one's detail with at most `concurrency`
/// requests in flight.
pub async fn load_generation_catalog(
    source: &dyn CatalogSource,
    concurrency: usize,
) -> FetchResult<GenerationCatalog> {
    let generations = source.list_generations().await?;

    let members: Vec<GenerationMembers> = stream::iter(generations)
        .map(|generation| async move { source.generation_detail(&generation).await })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    let catalog = GenerationCatalog::from_members(members);
    tracing::info!("Loaded {} generations", catalog.generations().len());
    Ok(catalog)
}

pub async fn load_metadata(source: &dyn CatalogSource, concurrency: usize) -> FetchResult<Metadata> {
    let versions = source.list_versions().await?;
    tracing::info!("Loaded {} versions", versions.len());
    let generations = load_generation_catalog(source, concurrency).await?;
    Ok(Metadata {
        versions,
        generations,
    })
}
