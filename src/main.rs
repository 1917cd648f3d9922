//! ghcard - GitHub profile cards in the terminal.

use std::io;
use std::panic;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::future::join_all;
use log::LevelFilter;
use ratatui::{Terminal, backend::CrosstermBackend};

use ghcard::app::App;
use ghcard::cli::Cli;
use ghcard::console::{ConsoleBuffer, ConsoleLogger};
use ghcard::service::ProfileService;
use ghcard::view::ProfileView;

/// Restore the terminal before printing a panic.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Fetch every profile and print its card.
async fn run_plain(service: &ProfileService, usernames: &[String]) {
    let results = join_all(usernames.iter().map(|u| service.get_profile(u))).await;

    for (i, (username, result)) in usernames.iter().zip(results).enumerate() {
        if let Err(e) = &result {
            log::error!("GitHub profile error for {}: {}", username, e);
        }
        if i > 0 {
            println!("\n{}\n", "─".repeat(40));
        }
        println!("{}", ProfileView::from_result(username, &result));
    }

    // Cards served from the cache are refreshed on disk before exiting
    service.wait_for_refreshes().await;
}

async fn run_tui(
    service: ProfileService,
    usernames: &[String],
    console: ConsoleBuffer,
) -> Result<(), Box<dyn std::error::Error>> {
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service, usernames, console);
    app.load_all();
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result.map_err(Into::into)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = cli.config();
    let usernames = cli.profiles();

    if cli.plain {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .filter_module("ghcard", level)
            .init();

        let service = ProfileService::from_config(&config)?;
        run_plain(&service, &usernames).await;
        return Ok(());
    }

    let console = ConsoleBuffer::new();
    ConsoleLogger::new(console.clone(), level).install()?;

    let service = ProfileService::from_config(&config)?;
    run_tui(service, &usernames, console).await
}
