//! Development server for pseudo-SPA sites.
//!
//! Serves a site root as static files and logs which requests come from
//! the toolkit (document swaps, layout partials, page scripts).
//!
//! ```text
//!     Browser ──▶ DevServer ──▶ classify X-Requested-With ──▶ ServeDir(root)
//!             ◀──────────────── Vary: X-Requested-With ◀──────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pseudo_spa::config::{load_config, SiteConfig};
use pseudo_spa::lifecycle::signals::shutdown_on_ctrl_c;
use pseudo_spa::observability::logging;
use pseudo_spa::{DevServer, Shutdown};

#[derive(Parser)]
#[command(name = "pseudo-spa")]
#[command(about = "Development server for pseudo-SPA sites", long_about = None)]
struct Args {
    /// Site configuration (TOML or JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve, overriding `server.root`.
    #[arg(short, long)]
    root: Option<String>,

    /// Bind address, overriding `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };
    if let Some(root) = args.root {
        config.server.root = root;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("logging already initialised: {e}");
    }

    tracing::info!("pseudo-spa v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        root = %config.server.root,
        pages = config.pages.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = DevServer::new(&config.server);
    let serve = server.run(listener, shutdown.subscribe());
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => result?,
        () = shutdown_on_ctrl_c(&shutdown) => serve.await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
