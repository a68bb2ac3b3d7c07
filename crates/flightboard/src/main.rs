//! `flightboard` - CLI for the flight results board
//!
//! This binary shows the filtered, sorted board, submits searches, and
//! manages the recent-search list.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;
use serde_json::json;
use url::Url;

use flightboard::cli::{
    Cli, Command, ConfigCommand, NormalizeCommand, OutputFormat, RecentCommand, ResultsCommand,
    SearchCommand,
};
use flightboard::normalizer::FLAT;
use flightboard::render::{result_count, Renderer};
use flightboard::{
    init_logging, Config, Dataset, SearchForm, SearchParams, SearchSession, SortKey, Storage,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Results(cmd) => handle_results(&config, &cmd),
        Command::Search(cmd) => handle_search(&config, &cmd),
        Command::Recent(cmd) => handle_recent(&config, &cmd),
        Command::Normalize(cmd) => handle_normalize(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn load_dataset(config: &Config, path: Option<&std::path::Path>) -> flightboard::Result<Dataset> {
    Dataset::load_or_bundled(path.or_else(|| config.dataset_path()))
}

fn handle_results(config: &Config, cmd: &ResultsCommand) -> CliResult {
    let dataset = load_dataset(config, cmd.dataset.as_deref())?;
    let mut session = SearchSession::from_config(config, dataset)?;

    if let Some(url) = &cmd.url {
        session.navigate(Url::parse(url)?);
    } else {
        let params = SearchParams {
            origin: cmd.origin.clone().unwrap_or_default(),
            destination: cmd.destination.clone().unwrap_or_default(),
            depart: cmd.depart.clone().unwrap_or_default(),
            ret_depart: cmd.ret.clone().unwrap_or_default(),
        };
        if !params.is_empty() {
            session.set_search_params(params);
        }
    }

    if let Some(sort) = &cmd.sort {
        session.set_sort(SortKey::from_key(sort));
    }

    if cmd.min_price.is_some() || cmd.max_price.is_some() {
        let bounds = session.price_bounds();
        session.set_price_range(
            cmd.min_price.unwrap_or(bounds.low()),
            cmd.max_price.unwrap_or(bounds.high()),
        );
    }

    let results = session.results();
    let range = session.price_range();

    match cmd.format {
        OutputFormat::Json => {
            let board = json!({
                "priceRange": { "min": range.low(), "max": range.high() },
                "sort": session.sort().key(),
                "count": results.len(),
                "flights": results,
            });
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        OutputFormat::Plain => {
            let renderer = Renderer::new(config.display.currency_symbol.as_str());
            println!("{}", renderer.board(&results, range, session.sort()));
        }
    }
    Ok(())
}

fn handle_search(config: &Config, cmd: &SearchCommand) -> CliResult {
    let dataset = load_dataset(config, cmd.dataset.as_deref())?;
    let mut session = SearchSession::from_config(config, dataset)?;
    let storage = Storage::open(config.database_path())?;

    let form = SearchForm {
        origin: cmd.origin.clone(),
        destination: cmd.destination.clone(),
        depart: cmd.depart.clone().unwrap_or_default(),
        ret_depart: cmd.ret.clone().unwrap_or_default(),
        adults: cmd.adults.unwrap_or(config.search.default_adults),
    };
    let results = session.submit(&form, &storage);

    if cmd.json {
        let output = json!({
            "url": session.current_url().as_str(),
            "outbound": results.outbound,
            "inbound": results.inbound,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let renderer = Renderer::new(config.display.currency_symbol.as_str());
    let outbound: Vec<_> = results.outbound.iter().map(|e| FLAT.map(e)).collect();
    println!("{}", session.current_url());
    println!();
    println!("Outbound ({})", result_count(outbound.len()));
    println!("{}", renderer.list(&outbound));

    if !form.ret_depart.trim().is_empty() {
        let inbound: Vec<_> = results.inbound.iter().map(|e| FLAT.map(e)).collect();
        println!();
        println!("Inbound ({})", result_count(inbound.len()));
        println!("{}", renderer.list(&inbound));
    }
    Ok(())
}

fn handle_recent(config: &Config, cmd: &RecentCommand) -> CliResult {
    let storage = Storage::open(config.database_path())?;

    match cmd {
        RecentCommand::List { json } => {
            let entries = storage.recent_entries(config.storage.max_recent)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No recent searches.");
            } else {
                for entry in &entries {
                    println!(
                        "{}  {}",
                        entry.searched_at.format("%Y-%m-%d %H:%M"),
                        entry.search
                    );
                }
            }
        }
        RecentCommand::Clear => {
            let removed = storage.clear_recent()?;
            println!("Cleared {removed} recent searches.");
        }
    }
    Ok(())
}

fn handle_normalize(config: &Config, cmd: &NormalizeCommand) -> CliResult {
    let dataset = load_dataset(config, cmd.dataset.as_deref())?;
    let records = dataset.records();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&*records)?);
    } else {
        let renderer = Renderer::new(config.display.currency_symbol.as_str());
        println!("Shape: {} ({})", dataset.shape(), result_count(records.len()));
        println!("{}", renderer.list(&records));
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> CliResult {
    let dataset = load_dataset(config, None)?;
    let session = SearchSession::from_config(config, dataset)?;
    let storage = Storage::open(config.database_path())?;
    let stats = storage.stats()?;

    let source = session
        .dataset()
        .source()
        .map_or_else(|| "bundled".to_string(), |p| p.display().to_string());
    let bounds = session.price_bounds();

    if json {
        let status = json!({
            "dataset": source,
            "shape": session.dataset().shape().to_string(),
            "records": session.dataset().len(),
            "priceBounds": { "min": bounds.low(), "max": bounds.high() },
            "databasePath": config.database_path(),
            "recentSearches": stats.recent_searches,
            "newestSearch": stats.newest_search,
            "schemaVersion": stats.schema_version,
            "dbSizeBytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let renderer = Renderer::new(config.display.currency_symbol.as_str());
        println!("flightboard status");
        println!("------------------");
        println!("Dataset:         {source}");
        println!("Shape:           {}", session.dataset().shape());
        println!("Records:         {}", session.dataset().len());
        println!("Prices:          {}", renderer.price_summary(bounds));
        println!("Database:        {}", config.database_path().display());
        println!("Schema version:  {}", stats.schema_version);
        println!("Recent searches: {}", stats.recent_searches);
        if let Some(newest) = stats.newest_search {
            println!("Last searched:   {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Data]");
                println!(
                    "  Dataset path:       {}",
                    config
                        .dataset_path()
                        .map_or_else(|| "(bundled)".to_string(), |p| p.display().to_string())
                );
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Max recent:         {}", config.storage.max_recent);
                println!();
                println!("[Search]");
                println!("  Default sort:       {}", config.search.default_sort);
                println!("  Base URL:           {}", config.search.base_url);
                println!("  Default adults:     {}", config.search.default_adults);
                println!("  Max adults:         {}", config.search.max_adults);
                println!();
                println!("[Display]");
                println!("  Currency symbol:    {}", config.display.currency_symbol);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
