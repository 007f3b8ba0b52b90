// Pokedex Explorer Schema - Shared type definitions
// This crate contains the wire records decoded from the PokeAPI and the
// domain model the resolver and the presentation layer work with. Keeping
// them apart lets the explorer crate swap data sources without touching
// the HTTP shapes.

// Re-export the main types
pub use api::*;
pub use model::*;

pub mod api;
pub mod model;
