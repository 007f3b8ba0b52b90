//! Selection Resolver
//!
//! Maps a chosen game to its generation and derives, from the catalogs and a
//! species' detail record, what should be visible for that generation. All
//! functions here are pure except `resolve_generation`, which walks the
//! version -> version group -> generation chain through a `CatalogSource`.

use crate::catalog::GenerationCatalog;
use crate::client::CatalogSource;
use crate::errors::FetchResult;
use schema::{SpeciesDetail, SpeciesRef, VersionRef};

/// Visible species plus the choice that is valid against them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesSelection {
    pub visible: Vec<String>,
    pub chosen: Option<String>,
}

/// Resolve the generation a game belongs to.
///
/// `Ok(None)` when the version has no version group or the version group has
/// no generation.
pub async fn resolve_generation(
    source: &dyn CatalogSource,
    version: &VersionRef,
) -> FetchResult<Option<String>> {
    let Some(version_group) = source.version_group_of(version).await? else {
        tracing::debug!("Version {} has no version group", version.name);
        return Ok(None);
    };

    let generation = source.generation_of(&version_group).await?;
    if generation.is_none() {
        tracing::debug!("Version group {} has no generation", version_group);
    }
    Ok(generation)
}

fn sorted_names<'a>(species: impl Iterator<Item = &'a SpeciesRef>) -> Vec<String> {
    let mut names: Vec<String> = species.map(|s| s.name.clone()).collect();
    names.sort();
    names
}

/// Species available by `generation`, sorted by name.
///
/// Cumulative: everything introduced at or before the generation is kept.
/// Fails open to the whole catalog when the generation is empty, unknown, or
/// the generation data hasn't loaded.
pub fn filter_species(
    species: &[SpeciesRef],
    generations: &GenerationCatalog,
    generation: Option<&str>,
) -> Vec<String> {
    let generation = match generation {
        Some(name) if !name.is_empty() && !generations.is_empty() => name,
        _ => return sorted_names(species.iter()),
    };

    let Some(position) = generations.position(generation) else {
        tracing::debug!("Generation {} not in catalog; showing every species", generation);
        return sorted_names(species.iter());
    };

    let available = generations.species_through(position);
    sorted_names(species.iter().filter(|s| available.contains(s.name.as_str())))
}

/// Recompute the visible list and repair the choice in one step.
///
/// The previous choice survives if it is still visible; otherwise the first
/// visible species is chosen.
pub fn reconcile_selection(
    species: &[SpeciesRef],
    generations: &GenerationCatalog,
    generation: Option<&str>,
    previous: Option<&str>,
) -> SpeciesSelection {
    let visible = filter_species(species, generations, generation);

    let chosen = match previous {
        Some(name) if visible.iter().any(|v| v == name) => Some(name.to_string()),
        _ => visible.first().cloned(),
    };

    SpeciesSelection { visible, chosen }
}

/// Typing as of `generation`.
///
/// `past_types` only records the generation in which a change happened, so
/// this is an exact lookup, not a range lookup.
pub fn types_for_generation<'a>(detail: &'a SpeciesDetail, generation: Option<&str>) -> &'a [String] {
    match generation {
        Some(name) if !name.is_empty() => detail
            .past_types
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(detail.types.as_slice()),
        _ => &detail.types,
    }
}

/// Sprite to show for `generation`: the first variant in that generation's
/// block with an image, falling back to the default sprite.
pub fn pick_sprite<'a>(detail: &'a SpeciesDetail, generation: Option<&str>) -> Option<&'a str> {
    let default = detail.sprites.default.as_deref();

    let Some(variants) = generation
        .filter(|name| !name.is_empty())
        .and_then(|name| detail.sprites.per_generation.get(name))
    else {
        return default;
    };

    variants
        .values()
        .find_map(|image| image.as_deref())
        .or(default)
}
