//! `waypoint`: inspect and exercise a route tree from the command line.
//!
//! Routes come either from a TOML routes file (`--config`) or from a pages
//! directory scanned by convention (`--pages`). A routes file may use the stock
//! guards `allow` and `deny`.
//!
//! ```text
//! waypoint --pages ./pages routes
//! waypoint --config routes.toml resolve /user/42
//! waypoint --config routes.toml navigate / /user/42 /blog/tech/7?ref=home
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use waypoint::config::{build_routes, load_config, RouterConfig};
use waypoint::navigation::{GuardRegistry, MemoryHistory, NavigateOptions, Router, Transition};
use waypoint::observability::logging::init_logging;
use waypoint::routing::discovery::discover_routes;
use waypoint::routing::Route;
use waypoint::BoxError;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Inspect and exercise a waypoint route tree", long_about = None)]
struct Cli {
    /// TOML routes file.
    #[arg(short, long, conflicts_with = "pages")]
    config: Option<PathBuf>,

    /// Pages directory to discover routes from.
    #[arg(short, long)]
    pages: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every route in pre-order with its full pattern
    Routes,
    /// Show which route a path resolves to
    Resolve {
        path: String,
    },
    /// Navigate headlessly through each path in turn and print the final state
    Navigate {
        paths: Vec<String>,
        /// Replace the history entry instead of pushing
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_routes(&cli);
    let level = loaded
        .as_ref()
        .map(|(config, _)| config.navigation.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&format!("waypoint={}", level))?;

    let (config, routes) = loaded.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load routes");
    })?;

    let history = Arc::new(MemoryHistory::new());
    let router = Router::builder()
        .routes(routes)
        .config(&config.navigation)
        .history(history.clone())
        .build()?;

    tracing::info!(routes = router.all_routes().len(), "Router ready");

    match cli.command {
        Commands::Routes => {
            for entry in router.route_entries() {
                let params = if entry.is_static {
                    "static".to_string()
                } else {
                    entry.params.join(",")
                };
                println!(
                    "{:indent$}{:<32} {:<24} {:<16} {}",
                    "",
                    entry.pattern,
                    entry.route.component(),
                    entry.route.name().unwrap_or("-"),
                    params,
                    indent = entry.depth * 2
                );
            }
        }
        Commands::Resolve { path } => match router.resolve(&path) {
            Some(resolved) => {
                let chain: Vec<&str> = resolved.matched.iter().map(|r| r.component()).collect();
                println!("pattern:   {}", resolved.pattern);
                println!("component: {}", resolved.route.component());
                println!("chain:     {}", chain.join(" > "));
                println!("params:    {}", serde_json::to_string(&resolved.params)?);
            }
            None => {
                println!("no route matches `{}`", path);
                std::process::exit(1);
            }
        },
        Commands::Navigate { paths, replace } => {
            let options = NavigateOptions { replace };
            for path in &paths {
                let committed = router.navigate(path, options).await;
                println!("{:<40} {}", path, if committed { "ok" } else { "rejected" });
            }
            println!("{}", serde_json::to_string_pretty(&router.state())?);
            println!("history: {:?}", history.entries());
        }
    }

    Ok(())
}

/// Guards a routes file may refer to when driven from the command line.
fn stock_guards() -> GuardRegistry {
    let mut guards = GuardRegistry::new();
    guards
        .register("allow", |_t: Transition| async { Ok::<_, BoxError>(true) })
        .register("deny", |_t: Transition| async { Ok::<_, BoxError>(false) });
    guards
}

fn load_routes(cli: &Cli) -> Result<(RouterConfig, Vec<Route>), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        let config = load_config(path)?;
        let routes = build_routes(&config, &stock_guards())?;
        return Ok((config, routes));
    }

    let pages = cli.pages.clone().unwrap_or_else(|| PathBuf::from("pages"));
    let routes = discover_routes(&pages)?;
    Ok((RouterConfig::default(), routes))
}
