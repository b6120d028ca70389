//! chatdesk - terminal chat client for a remote support agent

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatdesk_core::{AgentTransport, Config, Conversation, HttpAgentClient};
use clap::Parser;
use tracing::info;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser, Debug)]
#[command(name = "chatdesk")]
#[command(version)]
#[command(about = "Chat with a remote support agent from the terminal")]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Agent endpoint URL (overrides config and CHATDESK_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Agent id sent with every message (overrides config and CHATDESK_AGENT_ID)
    #[arg(long)]
    agent_id: Option<String>,

    /// Start with the sample conversation shown
    #[arg(long)]
    sample: bool,
}

impl Cli {
    /// Resolve configuration: file, then environment, then flags.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        config.apply_env_overrides();

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(agent_id) = &self.agent_id {
            config.agent_id = Some(agent_id.clone());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init(&config.log_file())?;
    info!(
        endpoint = config.endpoint(),
        agent_id = config.agent_id(),
        "Configuration loaded and resolved"
    );

    let transport: Arc<dyn AgentTransport> = Arc::new(
        HttpAgentClient::new(config.endpoint(), config.request_timeout())
            .context("Failed to build HTTP client")?,
    );
    let conversation = Conversation::start(&config);
    info!(session = conversation.session_id(), "Session started");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(
        conversation,
        config.agent_name().to_string(),
        transport,
        events.sender(),
    );
    app.show_sample = cli.sample;

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults() {
        let cli = Cli::parse_from(["chatdesk"]);
        assert_eq!(cli.config, None);
        assert_eq!(cli.endpoint, None);
        assert_eq!(cli.agent_id, None);
        assert!(!cli.sample);
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"endpoint": "http://file.example/api", "agent_name": "File Agent"}"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "chatdesk",
            "--config",
            path.to_str().unwrap(),
            "--agent-id",
            "cli-agent",
            "--sample",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.agent_id(), "cli-agent");
        assert_eq!(config.agent_name(), "File Agent");
        assert!(cli.sample);
    }

    #[test]
    fn test_endpoint_flag_wins() {
        let cli = Cli::parse_from([
            "chatdesk",
            "--config",
            "/nonexistent/chatdesk/config.json",
            "--endpoint",
            "http://cli.example/api",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.endpoint(), "http://cli.example/api");
    }
}
