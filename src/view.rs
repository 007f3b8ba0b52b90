//! Read-only snapshot of a session for rendering.

use std::fmt;

use crate::resolver::{pick_sprite, types_for_generation};
use crate::session::{LoadingFlags, Session};
use schema::SpeciesDetail;

/// Base stats are drawn against this ceiling.
pub const STAT_CEILING: u32 = 255;
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct StatBar {
    pub label: String,
    pub value: u32,
    /// value / 255, capped at 100
    pub percent: f64,
}

impl StatBar {
    pub fn new(name: &str, value: u32) -> Self {
        let percent = (f64::from(value) / f64::from(STAT_CEILING) * 100.0).min(100.0);
        Self {
            label: stat_label(name),
            value,
            percent,
        }
    }
}

/// A species' detail projected for one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCard {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub abilities: Vec<String>,
    pub stats: Vec<StatBar>,
    /// Generation the projection was made for, if any
    pub generation: Option<String>,
}

impl SpeciesCard {
    pub fn project(detail: &SpeciesDetail, generation: Option<&str>) -> Self {
        Self {
            id: detail.id,
            name: title_case(&detail.name),
            sprite: pick_sprite(detail, generation).map(str::to_string),
            types: types_for_generation(detail, generation)
                .iter()
                .map(|t| title_case(t))
                .collect(),
            height_m: f64::from(detail.height) / 10.0,
            weight_kg: f64::from(detail.weight) / 10.0,
            abilities: detail.abilities.iter().map(|a| title_case(a)).collect(),
            stats: detail
                .stats
                .iter()
                .map(|stat| StatBar::new(&stat.name, stat.value))
                .collect(),
            generation: generation.filter(|g| !g.is_empty()).map(str::to_string),
        }
    }
}

/// Everything the presentation layer shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DexView {
    pub versions: Vec<String>,
    pub chosen_version: Option<String>,
    pub species: Vec<String>,
    pub chosen_species: Option<String>,
    pub card: Option<SpeciesCard>,
    pub error: Option<String>,
    pub loading: LoadingFlags,
}

impl DexView {
    pub fn from_session(session: &Session) -> Self {
        let selection = session.selection();
        let generation = selection.resolved_generation.as_deref();

        Self {
            versions: session.versions().iter().map(|v| v.name.clone()).collect(),
            chosen_version: selection.chosen_version.clone(),
            species: selection.visible_species.clone(),
            chosen_species: selection.chosen_species.clone(),
            card: session
                .detail()
                .map(|detail| SpeciesCard::project(detail, generation)),
            error: session.error().map(|e| e.message.clone()),
            loading: session.loading(),
        }
    }
}

/// "special-attack" -> "Special Attack"
pub fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "special-attack" => "Sp. Atk".to_string(),
        "special-defense" => "Sp. Def".to_string(),
        other => title_case(other),
    }
}

impl fmt::Display for StatBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 8;
        let filled = ((self.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        write!(
            f,
            "{:<LABEL_WIDTH$} {:>3} [{}{}] {:>5.1}%",
            self.label,
            self.value,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
            self.percent
        )
    }
}

impl fmt::Display for SpeciesCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (#{:03})", self.name, self.id)?;
        writeln!(f, "--------------------")?;
        if let Some(generation) = &self.generation {
            writeln!(f, "As seen in {}", title_case(generation))?;
        }
        writeln!(f, "Type(s): {}", self.types.join(" / "))?;
        writeln!(f, "Height: {:.1} m   Weight: {:.1} kg", self.height_m, self.weight_kg)?;
        writeln!(f, "Abilities: {}", self.abilities.join(", "))?;
        writeln!(f, "Sprite: {}", self.sprite.as_deref().unwrap_or("(none)"))?;
        writeln!(f, "--------------------")?;
        writeln!(f, "Base Stats:")?;
        for stat in &self.stats {
            writeln!(f, "  {}", stat)?;
        }
        Ok(())
    }
}

impl fmt::Display for DexView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Game: {}",
            self.chosen_version.as_deref().unwrap_or("(any)")
        )?;
        writeln!(
            f,
            "Species: {} ({} available)",
            self.chosen_species.as_deref().unwrap_or("(none)"),
            self.species.len()
        )?;

        let mut pending = Vec::new();
        if self.loading.catalog {
            pending.push("species list");
        }
        if self.loading.metadata {
            pending.push("game data");
        }
        if self.loading.detail {
            pending.push("species details");
        }
        if !pending.is_empty() {
            writeln!(f, "Loading: {}...", pending.join(", "))?;
        }

        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }

        if let Some(card) = &self.card {
            writeln!(f)?;
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::species_detail;
    use rstest::rstest;

    #[rstest]
    #[case("normal", "Normal")]
    #[case("special-attack", "Special Attack")]
    #[case("mr-mime", "Mr Mime")]
    #[case("", "")]
    fn test_title_case(#[case] slug: &str, #[case] expected: &str) {
        assert_eq!(title_case(slug), expected);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(51, 20.0)]
    #[case(255, 100.0)]
    #[case(300, 100.0)]
    fn test_stat_percent_is_capped(#[case] value: u32, #[case] expected: f64) {
        let bar = StatBar::new("attack", value);
        assert!((bar.percent - expected).abs() < 1e-9, "{} -> {}", value, bar.percent);
    }

    #[test]
    fn test_card_converts_units_and_projects_types() {
        let mut clefable = species_detail("clefable", 36, &["fairy"]);
        clefable.height = 13;
        clefable.weight = 400;
        clefable
            .past_types
            .insert("generation-i".to_string(), vec!["normal".to_string()]);

        let gen_one = SpeciesCard::project(&clefable, Some("generation-i"));
        assert_eq!(gen_one.types, vec!["Normal"]);
        assert!((gen_one.height_m - 1.3).abs() < 1e-9);
        assert!((gen_one.weight_kg - 40.0).abs() < 1e-9);

        let gen_three = SpeciesCard::project(&clefable, Some("generation-iii"));
        assert_eq!(gen_three.types, vec!["Fairy"]);
    }

    #[test]
    fn test_card_display_lists_stats() {
        let card = SpeciesCard::project(&species_detail("bulbasaur", 1, &["grass", "poison"]), None);
        let text = card.to_string();

        assert!(text.starts_with("Bulbasaur (#001)"));
        assert!(text.contains("Type(s): Grass / Poison"));
        assert!(text.contains("HP"));
        assert!(text.contains("Sprite: (none)"));
        assert!(!text.contains("As seen in"));
    }
}
