//! # Till
//!
//! Command-line front end for Till POS.
//!
//! ## Module Organization
//! ```text
//! till/
//! ├── lib.rs          ◄─── You are here (tracing setup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── App: config + one store per collection
//! │   ├── config.rs   ◄─── Layered TillConfig
//! │   ├── store.rs    ◄─── Cached collection over local or remote backend
//! │   └── draft.rs    ◄─── Sale being assembled or edited
//! ├── commands/
//! │   ├── mod.rs      ◄─── ItemSpec parsing
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── salesperson.rs ◄ Roster commands
//! │   └── sale.rs     ◄─── Record / edit / show sales
//! ├── notice.rs       ◄─── Notice + Reply returned by commands
//! ├── render.rs       ◄─── Text tables
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging to stderr (RUST_LOG overrides the default)       │
//! │  3. Load TillConfig: defaults → file → env → flags                      │
//! │  4. Open the backend: SQLite blob store, or REST client                 │
//! │  5. Run one command, print its reply, exit                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod notice;
pub mod render;
pub mod state;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use till_core::{ProductInput, SalespersonInput};

use cli::{Cli, Command, ConfigCommand, ProductCommand, SaleCommand, SalespersonCommand};
use commands::product::ProductPatch;
use commands::sale::{SalePatch, SaleRequest};
use commands::{product, sale, salesperson};
use error::{ApiError, ErrorCode};
use notice::{Notice, Reply};
use state::{App, TillConfig};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,till=info,sqlx=warn";

/// Initializes the tracing subscriber. Logs go to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Everything
/// - `RUST_LOG=till_db=debug` - Blob store reads and writes
/// - Default: warnings, plus info from the till crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs one parsed command against the loaded configuration.
pub async fn run(cli: Cli, config: TillConfig) -> Result<(), ApiError> {
    let json = cli.json;

    if let Command::Config(cmd) = &cli.command {
        return config_command(cmd, &cli, &config, json);
    }

    let mut app = App::open(config).await?;
    info!(backend = %app.products.backend().describe(), "Backend ready");

    let result = dispatch(&mut app, cli.command, json).await;
    app.close().await;
    result
}

async fn dispatch(app: &mut App, command: Command, json: bool) -> Result<(), ApiError> {
    let per_page = app.config.display.page_size;

    match command {
        Command::Product(cmd) => match cmd {
            ProductCommand::List(args) => {
                let page = product::list_products(app, &args.to_query(per_page)?).await?;
                emit(json, &page, || render::product_page(&page, &app.config))
            }
            ProductCommand::Add {
                name,
                code,
                cost,
                retail,
                image_url,
            } => {
                let input = ProductInput {
                    name,
                    code,
                    image_url,
                    cost_price: cost,
                    retail_price: retail,
                };
                let reply = product::add_product(app, input).await?;
                emit_reply(json, &reply, |p| render::product_summary(p, &app.config))
            }
            ProductCommand::Edit {
                key,
                name,
                cost,
                retail,
                image_url,
            } => {
                let patch = ProductPatch {
                    name,
                    image_url,
                    cost_price: cost,
                    retail_price: retail,
                };
                let reply = product::edit_product(app, &key, patch).await?;
                emit_reply(json, &reply, |p| render::product_summary(p, &app.config))
            }
            ProductCommand::Delete { key } => {
                let reply = product::delete_product(app, &key).await?;
                emit_reply(json, &reply, |p| render::product_summary(p, &app.config))
            }
            ProductCommand::Stats => {
                let stats = product::product_stats(app).await?;
                emit(json, &stats, || render::stats("Products", &stats))
            }
        },

        Command::Salesperson(cmd) => match cmd {
            SalespersonCommand::List(args) => {
                let page = salesperson::list_salespersons(app, &args.to_query(per_page)?).await?;
                emit(json, &page, || render::salesperson_page(&page, &app.config))
            }
            SalespersonCommand::Add { name, code } => {
                let reply =
                    salesperson::add_salesperson(app, SalespersonInput { name, code }).await?;
                emit_reply(json, &reply, render::salesperson_summary)
            }
            SalespersonCommand::Edit { key, name } => {
                let reply = salesperson::rename_salesperson(app, &key, &name).await?;
                emit_reply(json, &reply, render::salesperson_summary)
            }
            SalespersonCommand::Delete { key } => {
                let reply = salesperson::delete_salesperson(app, &key).await?;
                emit_reply(json, &reply, render::salesperson_summary)
            }
            SalespersonCommand::Stats => {
                let stats = salesperson::salesperson_stats(app).await?;
                emit(json, &stats, || render::stats("Salespersons", &stats))
            }
        },

        Command::Sale(cmd) => match cmd {
            SaleCommand::List(args) => {
                let listing = sale::list_sales(app, &args.to_query(per_page)?).await?;
                emit(json, &listing, || render::sale_page(&listing, &app.config))
            }
            SaleCommand::Show { id } => {
                let detail = sale::show_sale(app, &id).await?;
                emit(json, &detail, || render::sale_detail(&detail, &app.config))
            }
            SaleCommand::Record {
                salesperson,
                items,
                comments,
            } => {
                let request = SaleRequest {
                    salesperson,
                    items,
                    comments,
                };
                let reply = sale::record_sale(app, request).await?;
                emit_reply(json, &reply, |s| render::sale_summary(s, &app.config))
            }
            SaleCommand::Edit {
                id,
                salesperson,
                items,
                remove,
                comments,
            } => {
                let patch = SalePatch {
                    salesperson,
                    comments,
                    items,
                    remove,
                };
                let reply = sale::edit_sale(app, &id, patch).await?;
                emit_reply(json, &reply, |s| render::sale_summary(s, &app.config))
            }
            SaleCommand::Delete { id } => {
                let reply = sale::delete_sale(app, &id).await?;
                emit_reply(json, &reply, |s| render::sale_summary(s, &app.config))
            }
            SaleCommand::Stats => {
                let stats = sale::sale_stats(app).await?;
                emit(json, &stats, || render::stats("Sales", &stats))
            }
        },

        Command::Config(_) => Err(ApiError::internal("config commands do not open storage")),
    }
}

fn config_command(
    cmd: &ConfigCommand,
    cli: &Cli,
    config: &TillConfig,
    json: bool,
) -> Result<(), ApiError> {
    let path = cli.config.clone().or_else(TillConfig::default_config_path);

    match cmd {
        ConfigCommand::Show => {
            let text = config.to_toml()?;
            emit(json, config, || text.trim_end().to_string())
        }
        ConfigCommand::Path => {
            let path = path.ok_or_else(|| {
                ApiError::new(ErrorCode::ConfigError, "No config directory on this platform")
            })?;
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = path.ok_or_else(|| {
                ApiError::new(ErrorCode::ConfigError, "No config directory on this platform")
            })?;
            if path.exists() && !force {
                return Err(ApiError::new(
                    ErrorCode::ConfigError,
                    format!("{} already exists (use --force to replace it)", path.display()),
                ));
            }
            config.save(&path)?;
            let reply = Reply::new(path.display().to_string()).with_notice(Notice::success(
                "Saved!",
                "Configuration file written.",
            ));
            emit_reply(json, &reply, |p| p.clone())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Prints a value as JSON or as text.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<(), ApiError> {
    if json {
        println!("{}", to_json(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

/// Prints warnings, the headline notice, then a summary of the value.
fn emit_reply<T: Serialize>(
    json: bool,
    reply: &Reply<T>,
    summary: impl FnOnce(&T) -> String,
) -> Result<(), ApiError> {
    if json {
        println!("{}", to_json(reply)?);
        return Ok(());
    }
    for warning in &reply.warnings {
        println!("{}", render::notice(warning));
    }
    if let Some(notice) = &reply.notice {
        println!("{}", render::notice(notice));
    }
    println!("{}", summary(&reply.value));
    Ok(())
}
