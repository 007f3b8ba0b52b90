//! Pokedex Explorer
//!
//! Interactive terminal front end: choose a game, choose a Pokemon, and see its
//! types, sprite and stats as that game's generation presented them.

use std::io::{self, Write};

use pokedex_explorer::interface::{display_entry, execute, open_session, Command, HELP_TEXT};
use pokedex_explorer::{logging, ExplorerConfig, ExplorerResult};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> ExplorerResult<()> {
    logging::init();

    let config = ExplorerConfig::load()?;
    let mut session = open_session(&config)?;

    println!("Loading the Pokedex...");
    session.settle().await;
    println!("{}", display_entry(&session));
    println!("{}\n", HELP_TEXT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.parse::<Command>() {
            Ok(command) => match execute(&mut session, command).await {
                Some(output) => println!("{}\n", output),
                None => break,
            },
            Err(message) => println!("{}\n", message),
        }
    }

    println!("Goodbye!");
    Ok(())
}
