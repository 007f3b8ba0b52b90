//! Text command interface shared by the REPL and the MCP server.
//!
//! Each handler drives the session to a settled state and returns the text to
//! show the user.

use std::str::FromStr;
use std::sync::Arc;

use crate::client::PokeApiClient;
use crate::config::ExplorerConfig;
use crate::errors::ExplorerResult;
use crate::session::Session;
use crate::view::{title_case, DexView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the games
    Games,
    /// Choose a game
    Game(String),
    /// List visible species, optionally only those starting with a prefix
    Species(Option<String>),
    /// Choose a species
    Pick(String),
    /// Show the current selection and entry
    Show,
    /// Clear the error message
    Dismiss,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };
        let argument = || normalize_name(rest);

        match word.to_lowercase().as_str() {
            "games" | "versions" => Ok(Command::Games),
            "game" | "version" if !rest.is_empty() => Ok(Command::Game(argument())),
            "game" | "version" => Err("Which game? (e.g., 'game red')".to_string()),
            "species" | "list" => Ok(Command::Species(
                Some(argument()).filter(|prefix| !prefix.is_empty()),
            )),
            "pick" | "pokemon" if !rest.is_empty() => Ok(Command::Pick(argument())),
            "pick" | "pokemon" => Err("Which Pokemon? (e.g., 'pick pikachu')".to_string()),
            "show" | "" => Ok(Command::Show),
            "dismiss" | "ok" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        }
    }
}

/// "Mr. Mime" -> "mr-mime", "Farfetch'd" -> "farfetchd", matching the API's slugs.
pub fn normalize_name(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .replace(['.', '\'', '\u{2019}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub const HELP_TEXT: &str = "Commands:
  games               list every game
  game <name>         choose a game (e.g. 'game yellow')
  species [prefix]    list Pokemon available in the chosen game
  pick <name>         choose a Pokemon (e.g. 'pick pikachu')
  show                show the current entry
  dismiss             clear the error message
  help                this text
  quit                leave";

/// Build a client from `config` and start loading the catalogs.
pub fn open_session(config: &ExplorerConfig) -> ExplorerResult<Session> {
    let client = PokeApiClient::new(config)?;
    tracing::info!("Using PokeAPI at {}", client.base_url());

    let mut session = Session::new(Arc::new(client), config.max_concurrent_requests);
    session.start();
    Ok(session)
}

/// Returns formatted text listing the games, marking the chosen one.
pub fn display_games(session: &Session) -> String {
    let view = DexView::from_session(session);
    if view.versions.is_empty() {
        return "The game list is not available yet.".to_string();
    }

    let mut output = String::from("Available Games:\n");
    for version in &view.versions {
        let marker = if view.chosen_version.as_ref() == Some(version) {
            " (selected)"
        } else {
            ""
        };
        output.push_str(&format!("  {}{}\n", version, marker));
    }
    output
}

/// Returns formatted text listing the visible species.
pub fn display_species(session: &Session, prefix: Option<&str>) -> String {
    let view = DexView::from_session(session);
    let names: Vec<&str> = view
        .species
        .iter()
        .map(String::as_str)
        .filter(|name| prefix.map_or(true, |p| name.starts_with(p)))
        .collect();

    if names.is_empty() {
        return match prefix {
            Some(p) => format!("No Pokemon starting with '{}' in this game.", p),
            None => "No Pokemon available.".to_string(),
        };
    }

    let game = view.chosen_version.as_deref().unwrap_or("every game");
    let mut output = format!("{} Pokemon available in {}:\n", names.len(), game);
    for row in names.chunks(6) {
        output.push_str(&format!("  {}\n", row.join(", ")));
    }
    output
}

/// Displays the full current view.
pub fn display_entry(session: &Session) -> String {
    DexView::from_session(session).to_string()
}

fn display_card(session: &Session) -> String {
    let view = DexView::from_session(session);
    let mut output = String::new();
    if let Some(error) = &view.error {
        output.push_str(&format!("Error: {}\n", error));
    }
    match view.card {
        Some(card) => output.push_str(&card.to_string()),
        None => output.push_str("No Pokemon selected."),
    }
    output
}

/// Choose a game and wait for the species list to follow.
pub async fn choose_game(session: &mut Session, name: &str) -> String {
    if let Err(e) = session.select_version(&normalize_name(name)) {
        return format!("Error: {}", e);
    }
    session.settle().await;

    let selection = session.selection();
    let generation = selection
        .resolved_generation
        .as_deref()
        .map(|g| format!(" ({})", title_case(g)))
        .unwrap_or_default();

    format!(
        "Selected {}{}. {} Pokemon available.\n\n{}",
        selection.chosen_version.as_deref().unwrap_or(name),
        generation,
        selection.visible_species.len(),
        display_card(session)
    )
}

/// Choose a species and wait for its entry.
pub async fn choose_species(session: &mut Session, name: &str) -> String {
    if let Err(e) = session.select_species(&normalize_name(name)) {
        return format!("Error: {}", e);
    }
    session.settle().await;
    display_card(session)
}

/// Run one command. Returns `None` for `quit`.
pub async fn execute(session: &mut Session, command: Command) -> Option<String> {
    let output = match command {
        Command::Games => display_games(session),
        Command::Game(name) => choose_game(session, &name).await,
        Command::Species(prefix) => display_species(session, prefix.as_deref()),
        Command::Pick(name) => choose_species(session, &name).await,
        Command::Show => {
            session.settle().await;
            display_entry(session)
        }
        Command::Dismiss => {
            session.dismiss_error();
            "Error cleared.".to_string()
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Quit => return None,
    };
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Trigger;
    use crate::test_support::FakeSource;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case("games", Ok(Command::Games))]
    #[case("  GAME  Yellow ", Ok(Command::Game("yellow".to_string())))]
    #[case("game alpha sapphire", Ok(Command::Game("alpha-sapphire".to_string())))]
    #[case("pick Mr. Mime", Ok(Command::Pick("mr-mime".to_string())))]
    #[case("pick Farfetch'd", Ok(Command::Pick("farfetchd".to_string())))]
    #[case("pick sirfetch\u{2019}d", Ok(Command::Pick("sirfetchd".to_string())))]
    #[case("species", Ok(Command::Species(None)))]
    #[case("species pi", Ok(Command::Species(Some("pi".to_string()))))]
    #[case("", Ok(Command::Show))]
    #[case("exit", Ok(Command::Quit))]
    #[case("dismiss", Ok(Command::Dismiss))]
    fn test_command_parsing(#[case] input: &str, #[case] expected: Result<Command, String>) {
        assert_eq!(input.parse::<Command>(), expected);
    }

    #[rstest]
    #[case("game")]
    #[case("pick   ")]
    #[case("dance")]
    fn test_bad_commands_are_rejected(#[case] input: &str) {
        assert!(input.parse::<Command>().is_err());
    }

    async fn session() -> Session {
        let source = Arc::new(FakeSource::kanto_johto());
        let mut session = Session::new(source, 2);
        session.start();
        session.settle().await;
        session
    }

    #[tokio::test]
    async fn test_choose_game_reports_generation_and_count() {
        let mut session = session().await;

        let text = choose_game(&mut session, "Red").await;

        assert!(text.starts_with("Selected red (Generation I). 4 Pokemon available."));
        assert!(text.contains("Bulbasaur (#001)"));
    }

    #[tokio::test]
    async fn test_choose_species_shows_generation_typing() {
        let mut session = session().await;
        choose_game(&mut session, "red").await;

        let text = choose_species(&mut session, "Clefable").await;

        assert!(text.contains("Type(s): Normal"), "{}", text);
        assert!(text.contains("As seen in Generation I"));
    }

    #[tokio::test]
    async fn test_unknown_names_produce_error_text() {
        let mut session = session().await;

        assert!(choose_game(&mut session, "snap").await.starts_with("Error: unknown game"));
        choose_game(&mut session, "red").await;
        assert!(choose_species(&mut session, "togepi").await.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_species_listing_filters_by_prefix() {
        let mut session = session().await;
        choose_game(&mut session, "gold").await;

        let text = display_species(&session, Some("c"));
        assert!(text.starts_with("2 Pokemon available in gold:"));
        assert!(text.contains("chikorita, clefable"));

        assert!(display_species(&session, Some("z")).starts_with("No Pokemon"));
    }

    #[tokio::test]
    async fn test_quit_ends_the_loop() {
        let mut session = session().await;
        assert_eq!(execute(&mut session, Command::Quit).await, None);
        let games = execute(&mut session, Command::Games).await.unwrap();
        assert!(games.starts_with("Available Games:"));
        assert!(!games.contains("(selected)"));
    }

    #[tokio::test]
    async fn test_dismiss_clears_the_error() {
        let source = Arc::new(FakeSource::kanto_johto().failing("species:mewtwo"));
        let mut session = Session::new(source, 2);
        session.start();
        session.settle().await;

        let text = choose_species(&mut session, "mewtwo").await;
        assert!(text.starts_with("Error: Could not load species details"), "{}", text);
        assert_eq!(session.error().map(|e| e.trigger), Some(Trigger::Species));

        let reply = execute(&mut session, Command::Dismiss).await;
        assert_eq!(reply.as_deref(), Some("Error cleared."));
        assert!(session.error().is_none());
        assert!(!display_entry(&session).contains("Error:"));
    }

    #[tokio::test]
    async fn test_open_session_reports_unreachable_api_as_session_error() {
        let config = ExplorerConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..ExplorerConfig::default()
        };

        let mut session = open_session(&config).unwrap();
        assert!(session.is_busy());
        session.settle().await;

        assert!(session.error().is_some());
        assert!(session.selection().visible_species.is_empty());
        assert!(display_games(&session).starts_with("The game list is not available"));
    }
}
