use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

use pseudo_spa::config::{load_config, FetchConfig};
use pseudo_spa::net::{FetchError, Fetcher, HttpFetcher, RequestKind};
use pseudo_spa::routing::matcher::{best_match, link_path, normalize_path};
use pseudo_spa::scripts::{CallbackRegistry, FetchScriptHost, ScriptLifecycleManager};

#[derive(Parser)]
#[command(name = "spa-cli")]
#[command(about = "Management CLI for pseudo-SPA sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a site configuration
    Check { config: PathBuf },
    /// Show which navigation link would be highlighted for a path
    Active {
        #[arg(short, long)]
        path: String,
        /// Link hrefs in document order
        #[arg(short, long = "link", required = true)]
        links: Vec<String>,
    },
    /// Request a document the way the router does
    Fetch {
        url: Url,
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
    /// Load every configured page's scripts against a running site
    Probe {
        config: PathBuf,
        /// Site origin, overriding `fetch.base_url`
        #[arg(long)]
        base_url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let report = match cli.command {
        Commands::Check { config } => check(&config)?,
        Commands::Active { path, links } => active(&path, &links)?,
        Commands::Fetch { url, timeout_ms } => fetch(url, timeout_ms).await,
        Commands::Probe { config, base_url } => probe(&config, base_url).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    Ok(json!({
        "valid": true,
        "pages": config.pages.keys().collect::<Vec<_>>(),
        "sharedScripts": config.shared_scripts,
    }))
}

fn active(path: &str, links: &[String]) -> Result<Value, Box<dyn std::error::Error>> {
    let location = Url::parse("http://localhost/")?.join(path)?;
    let current = normalize_path(location.path());
    let paths: Vec<String> = links
        .iter()
        .map(|href| link_path(href, &location).unwrap_or_default())
        .collect();

    let index = best_match(paths.iter().map(String::as_str), &current);
    Ok(json!({
        "path": current,
        "active": index.map(|i| &links[i]),
        "index": index,
    }))
}

async fn fetch(url: Url, timeout_ms: u64) -> Value {
    let fetcher = HttpFetcher::new(&FetchConfig {
        timeout_ms,
        base_url: None,
    });

    match fetcher.fetch(&url, RequestKind::Document).await {
        Ok(body) => json!({ "url": url.as_str(), "swappable": true, "bytes": body.len() }),
        Err(err) => {
            let status = match &err {
                FetchError::Status(code) => Some(*code),
                _ => None,
            };
            json!({ "url": url.as_str(), "swappable": false, "status": status, "error": err.to_string() })
        }
    }
}

async fn probe(path: &Path, base_url: Option<Url>) -> Result<Value, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let base = match base_url {
        Some(url) => url,
        None => {
            let configured = config.fetch.base_url.as_deref().ok_or("no --base-url and no fetch.base_url")?;
            Url::parse(configured)?
        }
    };

    let host = FetchScriptHost::new(HttpFetcher::new(&config.fetch), base);
    let page_ids: Vec<String> = config.pages.keys().cloned().collect();
    let manager = ScriptLifecycleManager::new(host, Arc::new(config), CallbackRegistry::new());

    let mut pages = Vec::with_capacity(page_ids.len());
    for page_id in page_ids {
        let result = manager.load_for_page(&page_id).await;
        let failures: Vec<String> = match &result {
            Ok(()) => Vec::new(),
            Err(err) => err.failures.iter().map(ToString::to_string).collect(),
        };
        pages.push(json!({
            "page": page_id,
            "ok": result.is_ok(),
            "loaded": manager.host().injected().len(),
            "failures": failures,
        }));
    }

    let errors = manager.teardown_current();
    Ok(json!({ "pages": pages, "teardownErrors": errors.len() }))
}
