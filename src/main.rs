mod cli;

use movieskyy::{
    catalog::{FetchError, Normalizer, TmdbCatalogClient},
    config,
    orchestrator::{OrchestratorService, ServiceOptions, ViewState},
    server, setup,
};
use movieskyy_common::Category;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting MoviesKyy server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("TMDB API key is read from {:?}", config.tmdb.env_file);

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "movieskyy=trace,movieskyy_common=trace,tower_http=debug".to_string()
        } else {
            "movieskyy=debug,movieskyy_common=debug,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so `browse --json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Setup { env_file } => run_setup(env_file, cli.config.as_deref()),
        Commands::Browse {
            category,
            search,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(browse(
                category.as_deref(),
                search.as_deref(),
                json,
                cli.config.as_deref(),
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("movieskyy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_setup(env_file: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let env_file = env_file.unwrap_or(config.tmdb.env_file);

    let outcome = setup::run_setup(&env_file, &config.tmdb.api_key_var)?;
    println!(
        "{}",
        setup::report(outcome, &env_file, &config.tmdb.api_key_var)
    );

    Ok(())
}

async fn browse(
    category: Option<&str>,
    search: Option<&str>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let category = match category {
        Some(name) => name
            .parse::<Category>()
            .with_context(|| format!("Valid categories: {}", category_names()))?,
        None => config.view.default_category,
    };
    let search = search.map(str::trim).filter(|s| !s.is_empty());

    let client = TmdbCatalogClient::from_config(&config.tmdb)?;
    let normalizer = Normalizer::new(&config.tmdb.image_base_url, &config.tmdb.language);
    let options = ServiceOptions {
        default_category: category,
        ..ServiceOptions::from(config.view.clone())
    };

    let view = OrchestratorService::spawn(Arc::new(client), normalizer, options);

    if let Some(text) = search {
        view.submit_search_text(text).await?;
    }

    let wanted = search.unwrap_or_default().to_string();
    let state = view
        .wait_for(|s| !s.loading && s.category == category && s.search_text == wanted)
        .await?;
    view.shutdown();

    if state.setup_required {
        anyhow::bail!(
            "{} (or run `movieskyy setup`)",
            FetchError::MissingCredential.user_message()
        );
    }
    if let Some(error) = &state.error {
        anyhow::bail!("{}", error);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_view(&state);
    }

    Ok(())
}

fn print_view(state: &ViewState) {
    println!("{}", state.title());
    println!("{}", "=".repeat(state.title().chars().count()));

    if state.shows_featured() {
        if let Some(featured) = &state.featured {
            println!("Featured: {} ({})", featured.title, featured.release_date_formatted);
        }
    }

    if state.results.is_empty() {
        println!("No movies found.");
        return;
    }

    for (i, record) in state.results.iter().enumerate() {
        println!(
            "{:>3}. {} ({}) ★ {:.1}",
            i + 1,
            record.title,
            record.release_date_formatted,
            record.vote_average
        );
    }

    if let Some(updated) = state.last_updated {
        println!("\nLast updated: {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn category_names() -> String {
    Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  TMDB base URL: {}", config.tmdb.base_url);
            println!("  Language: {}", config.tmdb.language);
            println!("  Env file: {:?}", config.tmdb.env_file);
            println!("  Default category: {}", config.view.default_category);
            println!(
                "  Refresh interval: {}s",
                config.view.refresh_interval_secs
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  TMDB base URL: {}", config.tmdb.base_url);
        }
    }

    Ok(())
}
