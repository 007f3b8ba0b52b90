//! Pokedex Explorer MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! lets an LLM browse Pokemon as they appeared in a chosen game.

use std::sync::Arc;

use pokedex_explorer::interface::{
    choose_game, choose_species, display_entry, display_games, display_species, normalize_name,
    open_session,
};
use pokedex_explorer::{logging, ExplorerConfig, Session};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    session: Arc<Mutex<Session>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectGameRequest {
    #[schemars(description = "Name of the game, e.g. 'red', 'yellow', 'heartgold'")]
    pub game: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSpeciesRequest {
    #[schemars(description = "Only list Pokemon whose name starts with this prefix")]
    pub prefix: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectSpeciesRequest {
    #[schemars(description = "Name of the Pokemon to show, e.g. 'pikachu'")]
    pub species_name: String,
}

#[tool_router]
impl PokedexService {
    pub fn new(session: Session) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    #[tool(description = "List every game that can be selected")]
    async fn list_games(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.settle().await;
        Ok(CallToolResult::success(vec![Content::text(display_games(
            &session,
        ))]))
    }

    #[tool(description = "Select a game; the Pokemon list is narrowed to that game's generation")]
    async fn select_game(
        &self,
        Parameters(request): Parameters<SelectGameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.settle().await;
        let text = choose_game(&mut session, &request.game).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List the Pokemon available in the selected game")]
    async fn list_species(
        &self,
        Parameters(request): Parameters<ListSpeciesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.settle().await;
        let prefix = request.prefix.as_deref().map(normalize_name);
        let text = display_species(&session, prefix.as_deref());
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Show a Pokemon's types, sprite and stats as the selected game had them")]
    async fn select_species(
        &self,
        Parameters(request): Parameters<SelectSpeciesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.settle().await;
        let text = choose_species(&mut session, &request.species_name).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Show the current game, Pokemon and entry")]
    async fn show_entry(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.settle().await;
        Ok(CallToolResult::success(vec![Content::text(display_entry(
            &session,
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    tracing::info!("Pokedex Explorer MCP Server starting...");

    let config = ExplorerConfig::load()?;
    let session = open_session(&config)?;

    let service = PokedexService::new(session);
    let transport = (stdin(), stdout());

    tracing::info!("Starting MCP server with transport...");
    let server = service.serve(transport).await?;

    tracing::info!("Server running, waiting for shutdown...");
    let quit_reason = server.waiting().await?;

    tracing::info!("Pokedex Explorer MCP Server exiting: {:?}", quit_reason);
    Ok(())
}
