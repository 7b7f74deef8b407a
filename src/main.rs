use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod config;
mod handler;
mod responder;
mod session;
mod tui;
mod ui;

use app::{App, Screen};
use config::Config;

#[derive(Parser)]
#[command(name = "tellme")]
#[command(about = "Tell Me Everything: AI document analysis, demo edition")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Skip the landing screen and open the document chat directly
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let start_screen = match cli.command {
        Some(Commands::Chat) => Screen::Chat,
        None => Screen::Landing,
    };

    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(config, start_screen);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event);
        }

        // Pick up a finished responder task; the tick event keeps this
        // loop turning while the user is idle
        app.poll_response().await;
    }

    tui::restore()?;
    Ok(())
}
