//! # Command-Line Interface
//!
//! ```text
//! till [--config FILE] [--backend local|remote] [--api-url URL] [--db PATH] [--json] <command>
//!
//!   product      list | add | edit | delete | stats
//!   salesperson  list | add | edit | delete | stats
//!   sale         list | show | record | edit | delete | stats
//!   config       show | path | init
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use till_core::validation::validate_page_size;
use till_core::{ListQuery, Money, SortDirection, SortKey, ValidationError};

use crate::commands::ItemSpec;
use crate::state::config::{Backend, Overrides};

#[derive(Debug, Parser)]
#[command(name = "till", version, about = "Single-store point of sale")]
pub struct Cli {
    /// Config file (default: till.toml in the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where records are kept
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// REST server base URL
    #[arg(long = "api-url", global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// SQLite file for the local backend
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            backend: self.backend,
            api_url: self.api_url.clone(),
            db_path: self.db.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Manage the salesperson roster
    #[command(subcommand)]
    Salesperson(SalespersonCommand),

    /// Record and review sales
    #[command(subcommand)]
    Sale(SaleCommand),

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Search, sort and paging flags shared by every `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Case-insensitive text to look for
    #[arg(short, long)]
    pub search: Option<String>,

    /// created | updated | name | code | amount
    #[arg(long, default_value = "created")]
    pub sort: SortKey,

    /// Oldest / smallest first
    #[arg(long)]
    pub asc: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// 5, 10, 25 or 50 (default from config)
    #[arg(long)]
    pub per_page: Option<usize>,
}

impl ListArgs {
    pub fn to_query(&self, default_per_page: usize) -> Result<ListQuery, ValidationError> {
        Ok(ListQuery {
            search: self.search.clone(),
            sort: self.sort,
            direction: if self.asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
            page: self.page.max(1),
            per_page: validate_page_size(self.per_page.unwrap_or(default_per_page))?,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List(ListArgs),

    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long, allow_negative_numbers = true)]
        cost: Money,
        #[arg(long, allow_negative_numbers = true)]
        retail: Money,
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Change a product. The code cannot be changed.
    Edit {
        /// Product id or code
        key: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        cost: Option<Money>,
        #[arg(long, allow_negative_numbers = true)]
        retail: Option<Money>,
        /// Empty string removes the image
        #[arg(long)]
        image_url: Option<String>,
    },

    Delete {
        /// Product id or code
        key: String,
    },

    Stats,
}

#[derive(Debug, Subcommand)]
pub enum SalespersonCommand {
    List(ListArgs),

    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },

    /// Rename a salesperson. The code cannot be changed.
    Edit {
        /// Salesperson id or code
        key: String,
        #[arg(long)]
        name: String,
    },

    Delete {
        key: String,
    },

    Stats,
}

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    List(ListArgs),

    Show {
        id: String,
    },

    Record {
        /// Salesperson id or code
        #[arg(long, default_value = "")]
        salesperson: String,

        /// TEXT[:QTY[:DISCOUNT]], repeatable
        #[arg(long = "item", value_name = "ITEM")]
        items: Vec<ItemSpec>,

        #[arg(long)]
        comments: Option<String>,
    },

    Edit {
        id: String,

        #[arg(long)]
        salesperson: Option<String>,

        /// Add a line, or change qty / discount of an existing one
        #[arg(long = "item", value_name = "ITEM")]
        items: Vec<ItemSpec>,

        /// Drop the line with this code
        #[arg(long = "remove", value_name = "CODE")]
        remove: Vec<String>,

        /// Empty string clears the comments
        #[arg(long)]
        comments: Option<String>,
    },

    Delete {
        id: String,
    },

    Stats,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print where the config file is looked for
    Path,
    /// Write the effective configuration to the config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sale_record() {
        let cli = Cli::parse_from([
            "till",
            "--backend",
            "remote",
            "sale",
            "record",
            "--salesperson",
            "SP-01",
            "--item",
            "BEV-001:2:10",
            "--item",
            "chips",
        ]);
        assert_eq!(cli.overrides().backend, Some(Backend::Remote));
        match cli.command {
            Command::Sale(SaleCommand::Record { items, .. }) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], ItemSpec::new("BEV-001").quantity(2.0).discount(10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_list_args_to_query() {
        let cli = Cli::parse_from(["till", "product", "list", "--sort", "price", "--asc", "--per-page", "25"]);
        let Command::Product(ProductCommand::List(args)) = cli.command else {
            panic!("expected product list");
        };
        let query = args.to_query(10).unwrap();
        assert_eq!(query.sort, SortKey::Amount);
        assert_eq!(query.direction, SortDirection::Ascending);
        assert_eq!(query.per_page, 25);

        let bad = ListArgs {
            per_page: Some(7),
            ..args
        };
        assert!(bad.to_query(10).is_err());
    }

    #[test]
    fn test_money_arguments() {
        let cli = Cli::parse_from([
            "till", "product", "add", "--name", "Cola", "--code", "BEV-001", "--cost", "0.80",
            "--retail", "$1.50",
        ]);
        let Command::Product(ProductCommand::Add { cost, retail, .. }) = cli.command else {
            panic!("expected product add");
        };
        assert_eq!(cost, Money::from_cents(80));
        assert_eq!(retail, Money::from_cents(150));
    }
}
