use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use mvc_dispatch::config::loader::load_config;
use mvc_dispatch::config::AppConfig;
use mvc_dispatch::front::strip_prefix;
use mvc_dispatch::resolver::ControllerResolver;
use mvc_dispatch::routing::RouteTable;

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect the route table of an mvc-dispatch application", long_about = None)]
struct Cli {
    /// Admin API base URL.
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Admin API key.
    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the routes declared in a config file
    Routes {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show which rule and controller a request would reach
    Match {
        #[arg(short, long)]
        config: PathBuf,
        method: String,
        uri: String,
    },
    /// Check a running server's status
    Status,
    /// List the routes a running server is using
    RemoteRoutes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Routes { config } => {
            let config = load_config(&config)?;
            let table = RouteTable::from_config(&config.routes)?;
            let resolver = ControllerResolver::new(config.global.controller_namespace.as_str());
            for rule in table.rules() {
                println!(
                    "{:<24} {:<28} {:<24} {}",
                    rule.method().to_string(),
                    rule.uri(),
                    rule.target(),
                    resolver.type_name(rule.controller())
                );
            }
        }
        Commands::Match { config, method, uri } => {
            let config = load_config(&config)?;
            print_match(&config, &method, &uri)?;
        }
        Commands::Status => {
            get_admin(&cli.url, &cli.key, "/admin/status").await?;
        }
        Commands::RemoteRoutes => {
            get_admin(&cli.url, &cli.key, "/admin/routes").await?;
        }
    }

    Ok(())
}

fn print_match(
    config: &AppConfig,
    method: &str,
    uri: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTable::from_config(&config.routes)?;
    let resolver = ControllerResolver::new(config.global.controller_namespace.as_str());
    let method = axum::http::Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;

    let path = uri.split('?').next().unwrap_or(uri);
    let path = strip_prefix(&config.global.prefix_system, path);

    match table.find(&method, path) {
        Ok(rule) => {
            println!("rule:       {}", rule);
            println!("controller: {}", resolver.type_name(rule.controller()));
            println!(
                "action:     {}",
                rule.action().unwrap_or(config.global.default_action.as_str())
            );
            for (name, value) in rule.parameters(path) {
                println!("param:      {} = {}", name, value);
            }
        }
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn get_admin(url: &str, key: &str, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);

    let res = client
        .get(format!("{}{}", url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
