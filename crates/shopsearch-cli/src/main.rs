mod render;
mod source;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use clap::Parser;
use shopsearch_core::{load_directory, load_profile, validate_debounce_ms, UserLocationProfile};
use shopsearch_dispatch::{search_settled, SearchDispatcher};
use shopsearch_query::MerchantQuery;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::render::Renderer;
use crate::source::DirectorySource;

/// Each line read from stdin is the full content of the search field.
///
/// `:city <name>` changes the stored city, `:quit` exits.
#[derive(Debug, Parser)]
#[command(name = "shopsearch-cli")]
#[command(about = "Search a merchant directory as you type")]
struct Cli {
    /// YAML merchant directory (defaults to `SHOPSEARCH_DIRECTORY_PATH`)
    #[arg(long)]
    directory: Option<PathBuf>,

    /// YAML user location profile (defaults to `SHOPSEARCH_PROFILE_PATH`)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Debounce window in milliseconds (defaults to `SHOPSEARCH_DEBOUNCE_MS`)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Artificial directory latency in milliseconds
    #[arg(long, default_value_t = 150)]
    latency_ms: u64,
}

enum Input {
    Text(String),
    SetCity(String),
    Quit,
}

fn parse_input(line: String) -> Input {
    if line.trim() == ":quit" {
        return Input::Quit;
    }
    match line.strip_prefix(":city ") {
        Some(city) => Input::SetCity(city.trim().to_string()),
        None => Input::Text(line),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = shopsearch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(debounce_ms) = cli.debounce_ms {
        validate_debounce_ms(debounce_ms)?;
        config.debounce_ms = debounce_ms;
    }
    if let Some(path) = cli.directory {
        config.directory_path = path;
    }
    if let Some(path) = cli.profile {
        config.profile_path = Some(path);
    }

    let directory = load_directory(&config.directory_path)?;
    let profile = match &config.profile_path {
        Some(path) => load_profile(path)?,
        None => UserLocationProfile::default(),
    };
    tracing::info!(
        env = %config.env,
        merchants = directory.merchants.len(),
        debounce_ms = config.debounce_ms,
        city = profile.city.as_deref().unwrap_or(""),
        "merchant search ready"
    );

    let source = DirectorySource::new(directory, Duration::from_millis(cli.latency_ms));
    let query = Arc::new(MerchantQuery::new(source)?.with_timeout(config.query_timeout()));
    let location = Arc::new(RwLock::new(profile));
    let dispatcher = SearchDispatcher::with_debounce(
        Arc::clone(&query),
        Arc::clone(&location),
        config.debounce(),
    )?;

    let mut state_rx = dispatcher.subscribe();
    let mut outcome_rx = query.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut renderer = Renderer::default();
    let mut input_open = true;

    dispatcher.mount();

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => match parse_input(line) {
                    Input::Text(text) => dispatcher.on_text_changed(text),
                    Input::SetCity(city) => {
                        tracing::info!(city = %city, "stored city updated");
                        location
                            .write()
                            .unwrap_or_else(PoisonError::into_inner)
                            .city = Some(city);
                    }
                    Input::Quit => break,
                },
                None => {
                    tracing::debug!("stdin closed, waiting for the last search to settle");
                    input_open = false;
                }
            },
            Ok(()) = state_rx.changed() => {}
            Ok(()) = outcome_rx.changed() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }

        let phase = dispatcher.phase();
        let state = state_rx.borrow_and_update().clone();
        let outcome = outcome_rx.borrow_and_update().clone();
        if let Some(frame) = renderer.frame(&state, &outcome) {
            stdout.write_all(frame.as_bytes()).await?;
            stdout.flush().await?;
        }

        if !input_open && search_settled(phase, &state, &outcome) {
            break;
        }
    }

    dispatcher.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_search_text() {
        assert!(matches!(
            parse_input("  pizza ".to_string()),
            Input::Text(t) if t == "  pizza "
        ));
        assert!(matches!(parse_input(String::new()), Input::Text(t) if t.is_empty()));
    }

    #[test]
    fn city_command_updates_location() {
        assert!(matches!(
            parse_input(":city  Lagos ".to_string()),
            Input::SetCity(c) if c == "Lagos"
        ));
    }

    #[test]
    fn quit_command_exits() {
        assert!(matches!(parse_input(":quit".to_string()), Input::Quit));
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "shopsearch-cli",
            "--directory",
            "merchants.yaml",
            "--debounce-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("merchants.yaml")));
        assert_eq!(cli.debounce_ms, Some(250));
        assert_eq!(cli.latency_ms, 150);
        assert!(cli.profile.is_none());
    }
}
