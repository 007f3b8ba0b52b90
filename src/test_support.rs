//! In-memory `CatalogSource` and record builders for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::client::CatalogSource;
use crate::errors::{FetchError, FetchResult};
use schema::{
    BaseStat, GenerationMembers, GenerationRef, Locator, ResourceRef, SpeciesDetail, SpeciesRef,
    SpriteSet, VersionRef,
};

pub fn generation(name: &str, release_order: u32, species: &[&str]) -> GenerationMembers {
    GenerationMembers {
        generation: GenerationRef {
            name: name.to_string(),
            locator: format!("fake://generation/{name}"),
            release_order,
        },
        species: species.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn species_refs(names: &[&str]) -> Vec<SpeciesRef> {
    names
        .iter()
        .map(|name| ResourceRef::new(*name, format!("fake://pokemon/{name}")))
        .collect()
}

pub fn species_detail(name: &str, id: u32, types: &[&str]) -> SpeciesDetail {
    SpeciesDetail {
        id,
        name: name.to_string(),
        height: 7,
        weight: 69,
        types: types.iter().map(|t| t.to_string()).collect(),
        past_types: Default::default(),
        abilities: vec!["overgrow".to_string()],
        stats: vec![
            BaseStat {
                name: "hp".to_string(),
                value: 45,
            },
            BaseStat {
                name: "attack".to_string(),
                value: 49,
            },
        ],
        sprites: SpriteSet::default(),
    }
}

/// Scripted catalog source.
///
/// Requests can be held open with [`FakeSource::gate`] or made to fail with
/// [`FakeSource::failing`]. Keys are `"version:<name>"`, `"species:<name>"`,
/// and `"list:species"`.
#[derive(Default)]
pub struct FakeSource {
    species: Vec<SpeciesRef>,
    versions: Vec<VersionRef>,
    version_groups: HashMap<String, Option<Locator>>,
    group_generations: HashMap<Locator, Option<String>>,
    generations: Vec<GenerationMembers>,
    details: HashMap<String, SpeciesDetail>,
    failures: HashSet<String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    detail_calls: AtomicUsize,
    generation_calls: AtomicUsize,
}

impl FakeSource {
    /// Two generations, six species, and five games:
    /// - `red` -> generation-i, `gold` -> generation-ii
    /// - `orphan` has no version group, `limbo`'s group has no generation
    /// - `glitch` resolves like `orphan` unless made to fail
    pub fn kanto_johto() -> Self {
        let mut source = FakeSource {
            species: species_refs(&["pikachu", "togepi", "bulbasaur", "mewtwo", "chikorita", "clefable"]),
            generations: vec![
                generation("generation-ii", 2, &["chikorita", "togepi"]),
                generation("generation-i", 1, &["bulbasaur", "pikachu", "mewtwo", "clefable"]),
            ],
            ..FakeSource::default()
        };

        for (version, group, generation) in [
            ("red", Some("red-blue"), Some("generation-i")),
            ("gold", Some("gold-silver"), Some("generation-ii")),
            ("orphan", None, None),
            ("limbo", Some("colosseum"), None),
            ("glitch", None, None),
        ] {
            source
                .versions
                .push(ResourceRef::new(version, format!("fake://version/{version}")));
            let group_locator = group.map(|g| format!("fake://version-group/{g}"));
            if let Some(locator) = &group_locator {
                source
                    .group_generations
                    .insert(locator.clone(), generation.map(str::to_string));
            }
            source.version_groups.insert(version.to_string(), group_locator);
        }

        let mut clefable = species_detail("clefable", 36, &["fairy"]);
        clefable
            .past_types
            .insert("generation-i".to_string(), vec!["normal".to_string()]);

        for detail in [
            species_detail("bulbasaur", 1, &["grass", "poison"]),
            species_detail("pikachu", 25, &["electric"]),
            species_detail("mewtwo", 150, &["psychic"]),
            species_detail("chikorita", 152, &["grass"]),
            species_detail("togepi", 175, &["fairy"]),
            clefable,
        ] {
            source.details.insert(detail.name.clone(), detail);
        }

        source
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failures.insert(key.to_string());
        self
    }

    /// Hold requests for `key` until the returned handle is notified.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), gate.clone());
        gate
    }

    pub fn version(&self, name: &str) -> VersionRef {
        self.versions
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no fake version {name}"))
    }

    pub fn detail_fetches(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn generation_fetches(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }

    async fn checkpoint(&self, key: &str) -> FetchResult<()> {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failures.contains(key) {
            return Err(FetchError::Status {
                url: format!("fake://{key}"),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn list_species(&self) -> FetchResult<Vec<SpeciesRef>> {
        self.checkpoint("list:species").await?;
        Ok(self.species.clone())
    }

    async fn list_versions(&self) -> FetchResult<Vec<VersionRef>> {
        Ok(self.versions.clone())
    }

    async fn list_generations(&self) -> FetchResult<Vec<ResourceRef>> {
        Ok(self
            .generations
            .iter()
            .map(|g| ResourceRef::new(g.generation.name.clone(), g.generation.locator.clone()))
            .collect())
    }

    async fn generation_detail(&self, generation: &ResourceRef) -> FetchResult<GenerationMembers> {
        self.generation_calls.fetch_add(1, Ordering::SeqCst);
        self.generations
            .iter()
            .find(|g| g.generation.name == generation.name)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: generation.locator.clone(),
                status: 404,
            })
    }

    async fn version_group_of(&self, version: &VersionRef) -> FetchResult<Option<Locator>> {
        self.checkpoint(&format!("version:{}", version.name)).await?;
        Ok(self.version_groups.get(&version.name).cloned().flatten())
    }

    async fn generation_of(&self, version_group: &str) -> FetchResult<Option<String>> {
        Ok(self.group_generations.get(version_group).cloned().flatten())
    }

    async fn species_detail(&self, species: &SpeciesRef) -> FetchResult<SpeciesDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.checkpoint(&format!("species:{}", species.name)).await?;
        self.details
            .get(&species.name)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: species.locator.clone(),
                status: 404,
            })
    }
}
