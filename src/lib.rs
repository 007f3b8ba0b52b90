// In: src/lib.rs

//! Pokedex Explorer
//!
//! Browse Pokemon the way a particular game showed them: choose a game, and the
//! species list narrows to what existed in that game's generation; choose a
//! species, and its typing and sprite are projected back to that generation.
//! Data comes from the public PokeAPI.

// --- MODULE DECLARATIONS ---
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod interface;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod view;

#[cfg(test)]
mod test_support;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Domain records shared by every layer.
pub use schema::{
    BaseStat, GenerationMembers, GenerationRef, Locator, ResourceRef, SpeciesDetail, SpeciesRef,
    SpriteSet, VersionRef,
};

// --- From this crate's modules (`src/`) ---

// Data access.
pub use client::{CatalogSource, PokeApiClient};
pub use catalog::{GenerationCatalog, Metadata};

// Resolver functions.
pub use resolver::{
    filter_species, pick_sprite, reconcile_selection, resolve_generation, types_for_generation,
    SpeciesSelection,
};

// Session and presentation.
pub use cache::DetailCache;
pub use config::ExplorerConfig;
pub use session::{LoadingFlags, Selection, Session, SessionError, Trigger};
pub use view::{DexView, SpeciesCard, StatBar};

// Crate-specific error and result types.
pub use errors::{
    ConfigError, ExplorerError, ExplorerResult, FetchError, FetchResult, SelectionError,
};
