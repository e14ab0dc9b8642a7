use clap::Parser;
use colored::Colorize;
use std::process;

use volley_core::{
    build_descriptor, dispatch, DispatchMode, DispatchResult, KeyValueEntry, Method, RelayFields,
};

mod render;
mod reqwest_transport;

/// volley — Compose one HTTP request from parts and send it
#[derive(Parser, Debug)]
#[command(name = "volley", version, about = "Send one described HTTP request and show the result")]
struct Cli {
    /// Target URL to send the request to
    url: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(short, long, value_name = "KEY=VALUE")]
    query: Vec<String>,

    /// Request header as 'Key: value' (repeatable)
    #[arg(short = 'H', long, value_name = "KEY: VALUE")]
    header: Vec<String>,

    /// Raw request body (ignored for GET)
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Send through a relay endpoint instead of directly
    #[arg(long, value_name = "URL")]
    relay: Option<String>,

    /// MongoDB connection string to forward to the relay
    #[arg(long, value_name = "URI")]
    mongo_uri: Option<String>,

    /// Database name to forward to the relay
    #[arg(long, value_name = "NAME")]
    mongo_db: Option<String>,

    /// Collection name to forward to the relay
    #[arg(long, value_name = "NAME")]
    mongo_collection: Option<String>,

    /// Show verbose output (headers, body details)
    #[arg(short, long)]
    verbose: bool,

    /// Show the request without actually sending it
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.url.trim().is_empty() {
        eprintln!("{} Enter a target URL", "✖".red().bold());
        process::exit(1);
    }

    let method = match cli.method.parse::<Method>() {
        Ok(m) => m,
        Err(()) => {
            eprintln!(
                "{} Invalid HTTP method: {}",
                "✖".red().bold(),
                cli.method.bold()
            );
            process::exit(1);
        }
    };

    let mut query_entries = Vec::new();
    for raw in &cli.query {
        match parse_query_entry(raw) {
            Ok(entry) => query_entries.push(entry),
            Err(e) => {
                eprintln!("{} {}", "✖".red().bold(), e);
                process::exit(1);
            }
        }
    }

    let mut header_entries = Vec::new();
    for raw in &cli.header {
        match parse_header_entry(raw) {
            Ok(entry) => header_entries.push(entry),
            Err(e) => {
                eprintln!("{} {}", "✖".red().bold(), e);
                process::exit(1);
            }
        }
    }

    let relay_fields = RelayFields {
        mongo_uri: cli.mongo_uri.unwrap_or_default(),
        db: cli.mongo_db.unwrap_or_default(),
        collection: cli.mongo_collection.unwrap_or_default(),
    };

    let descriptor = build_descriptor(
        method,
        &cli.url,
        &query_entries,
        &header_entries,
        cli.data.as_deref().unwrap_or(""),
        &relay_fields,
    );

    let mode = match cli.relay {
        Some(endpoint) => DispatchMode::Relay { endpoint },
        None => DispatchMode::Direct,
    };

    render::print_request(&descriptor, &mode, cli.verbose);

    if cli.dry_run {
        println!("{}", "  (dry-run: request not sent)".dimmed().italic());
        return;
    }

    let transport = reqwest_transport::ReqwestTransport::new();
    let result = dispatch(&transport, &descriptor, &mode);

    render::print_result(&result);

    if let DispatchResult::Failure { .. } = result {
        process::exit(1);
    }
}

/// Split one `key=value` argument; the value may itself contain `=`.
fn parse_query_entry(raw: &str) -> Result<KeyValueEntry, String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok(KeyValueEntry::new(key, value)),
        None => Err(format!(
            "Invalid query parameter '{}': expected key=value",
            raw
        )),
    }
}

/// Split one `Key: value` argument the way headers are written by hand.
fn parse_header_entry(raw: &str) -> Result<KeyValueEntry, String> {
    match raw.split_once(':') {
        Some((key, value)) => Ok(KeyValueEntry::new(key.trim(), value.trim_start())),
        None => Err(format!("Invalid header '{}': expected 'Key: value'", raw)),
    }
}
