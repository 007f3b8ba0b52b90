use crate::api::{GenerationResource, NamedResource, PokemonResource, TypeSlot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque reference used to fetch a resource's detail (a URL for the PokeAPI).
pub type Locator = String;

/// A catalog entry: a unique name plus where to fetch its detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub locator: Locator,
}

pub type SpeciesRef = ResourceRef;
pub type VersionRef = ResourceRef;

impl ResourceRef {
    pub fn new(name: impl Into<String>, locator: impl Into<Locator>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
        }
    }
}

impl From<NamedResource> for ResourceRef {
    fn from(resource: NamedResource) -> Self {
        Self {
            name: resource.name,
            locator: resource.url,
        }
    }
}

/// A generation with its explicit position in release order.
///
/// Ordering between generations is always decided by `release_order`, never
/// by comparing names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRef {
    pub name: String,
    pub locator: Locator,
    pub release_order: u32,
}

/// A generation together with the species the upstream lists for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMembers {
    pub generation: GenerationRef,
    pub species: Vec<String>,
}

impl GenerationMembers {
    pub fn from_resource(resource: GenerationResource, locator: Locator) -> Self {
        Self {
            generation: GenerationRef {
                name: resource.name,
                locator,
                release_order: resource.id,
            },
            species: resource
                .pokemon_species
                .into_iter()
                .map(|species| species.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub default: Option<String>,
    /// generation name -> variant name -> image, in upstream order
    pub per_generation: IndexMap<String, IndexMap<String, Option<String>>>,
}

/// Everything the explorer shows about one species.
///
/// `past_types` is sparse: it only holds the generations in which the typing
/// differed from `types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDetail {
    pub id: u32,
    pub name: String,
    /// decimetres
    pub height: u32,
    /// hectograms
    pub weight: u32,
    pub types: Vec<String>,
    pub past_types: IndexMap<String, Vec<String>>,
    pub abilities: Vec<String>,
    pub stats: Vec<BaseStat>,
    pub sprites: SpriteSet,
}

fn type_names(mut slots: Vec<TypeSlot>) -> Vec<String> {
    slots.sort_by_key(|slot| slot.slot);
    slots.into_iter().map(|slot| slot.kind.name).collect()
}

impl From<PokemonResource> for SpeciesDetail {
    fn from(resource: PokemonResource) -> Self {
        let past_types = resource
            .past_types
            .into_iter()
            .map(|entry| (entry.generation.name, type_names(entry.types)))
            .collect();

        let abilities = resource
            .abilities
            .into_iter()
            .filter_map(|slot| slot.ability.map(|ability| ability.name))
            .collect();

        let stats = resource
            .stats
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect();

        let per_generation = resource
            .sprites
            .versions
            .into_iter()
            .map(|(generation, variants)| {
                let variants = variants
                    .into_iter()
                    .map(|(variant, sprite)| (variant, sprite.and_then(|s| s.front_default)))
                    .collect();
                (generation, variants)
            })
            .collect();

        SpeciesDetail {
            id: resource.id,
            name: resource.name,
            height: resource.height,
            weight: resource.weight,
            types: type_names(resource.types),
            past_types,
            abilities,
            stats,
            sprites: SpriteSet {
                default: resource.sprites.front_default,
                per_generation,
            },
        }
    }
}
