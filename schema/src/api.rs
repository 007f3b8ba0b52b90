//! Wire records for the subset of the PokeAPI v2 resources the explorer reads.
//!
//! Only the fields that are actually consumed are declared; everything else in
//! the upstream documents is ignored. Fields the upstream sometimes omits or
//! sends as `null` are optional or defaulted rather than rejected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A `{ name, url }` pair, the PokeAPI's universal reference shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of a list endpoint such as `/pokemon?limit=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResource {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub pokemon_species: Vec<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResource {
    pub name: String,
    #[serde(default)]
    pub version_group: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionGroupResource {
    pub name: String,
    #[serde(default)]
    pub generation: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Typing a species had up to and including `generation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastTypeEntry {
    pub generation: NamedResource,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
    #[serde(default)]
    pub ability: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// One sprite rendering tied to a game or game pairing.
///
/// Variants carry many more image fields (back, shiny, animated...); the
/// explorer only shows the front default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteVariantResource {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteResource {
    #[serde(default)]
    pub front_default: Option<String>,
    /// generation name -> variant name -> variant, in document order
    #[serde(default)]
    pub versions: IndexMap<String, IndexMap<String, Option<SpriteVariantResource>>>,
}

/// The `/pokemon/{name}` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonResource {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub past_types: Vec<PastTypeEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub sprites: SpriteResource,
}
