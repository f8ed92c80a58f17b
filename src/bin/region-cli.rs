use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use url::Url;

use region_edge::routing::{decide_with, HostLayout, RedirectDecision, DEFAULT_SUFFIX_LABELS};

#[derive(Parser)]
#[command(name = "region-cli")]
#[command(about = "Inspect hostname facets and manage the region edge", long_about = None)]
struct Cli {
    /// Admin API base URL.
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Admin API key.
    #[arg(short, long, default_value = "admin-secret-key")]
    key: String,

    /// Trailing labels forming the base suffix.
    #[arg(short, long, default_value_t = DEFAULT_SUFFIX_LABELS)]
    suffix_labels: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse platform and region out of a hostname
    Parse { hostname: String },
    /// Rewrite the region of an absolute URL (omit --region to drop it)
    Rewrite {
        url: String,
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Show the redirect decision for a request URL and optional referrer
    Decide {
        url: String,
        #[arg(short, long)]
        referer: Option<String>,
    },
    /// Check edge status via the admin API
    Status,
    /// Show request counters via the admin API
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let layout = HostLayout::new(cli.suffix_labels);

    match cli.command {
        Commands::Parse { hostname } => {
            print_json(&serde_json::to_value(layout.parse(&hostname))?)?;
        }
        Commands::Rewrite { url, region } => {
            let parsed = Url::parse(&url)?;
            let rewritten = layout.rewrite_url(&parsed, region.as_deref())?;
            println!("{rewritten}");
        }
        Commands::Decide { url, referer } => {
            let decision = decide_with(&layout, &url, referer.as_deref());
            let value = match decision {
                RedirectDecision::NoRedirect => json!({ "redirect": false }),
                RedirectDecision::RedirectTo(target) => json!({ "redirect": true, "location": target }),
            };
            print_json(&value)?;
        }
        Commands::Status => admin_get(&cli.url, &cli.key, "/admin/status").await?,
        Commands::Stats => admin_get(&cli.url, &cli.key, "/admin/stats").await?,
    }

    Ok(())
}

async fn admin_get(base: &str, key: &str, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);

    let res = reqwest::Client::new()
        .get(format!("{}{}", base.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    print_json(&json)
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
