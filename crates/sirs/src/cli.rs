//! Clap derive structures for the `sirs` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sirs -- admin console for the SIRS retail and service backend
#[derive(Debug, Parser)]
#[command(
    name = "sirs",
    version,
    about = "Manage the SIRS product catalog and service data from the command line",
    long_about = "Admin console for the SIRS appliance retail and service backend.\n\n\
        Lists are fetched wholesale, then filtered, sorted and paged locally.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SIRS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 'u', env = "SIRS_URL", global = true)]
    pub url: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, env = "SIRS_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SIRS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SIRS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SIRS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and manage the product catalog
    #[command(alias = "prod", alias = "p")]
    Products(ProductsArgs),

    /// List product categories
    #[command(alias = "cat")]
    Categories(ListOnlyArgs),

    /// List user accounts
    Users(ListOnlyArgs),

    /// List service requests
    #[command(alias = "sr")]
    ServiceRequests(ListOnlyArgs),

    /// List deliveries
    Deliveries(ListOnlyArgs),

    /// List notifications
    Notifications(ListOnlyArgs),

    /// Log in and store the session for later commands
    Login,

    /// Forget the stored session
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Search and paging for plain lists.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Page to show (1-based; clamped into range)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the profile's page_size)
    #[arg(long, short = 'l')]
    pub page_size: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ListOnlyArgs {
    #[command(subcommand)]
    pub command: ListOnlyCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListOnlyCommand {
    /// List entries
    #[command(alias = "ls")]
    List(SearchArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products (filtered, sorted and paged locally)
    #[command(alias = "ls")]
    List(ProductListArgs),

    /// Inventory summary for the whole catalog
    Stats(ProductFilterArgs),

    /// Show one product
    Get {
        /// Product id
        id: u64,
    },

    /// Create a product
    Create(ProductFieldArgs),

    /// Update fields of a product
    Update {
        /// Product id
        id: u64,

        #[command(flatten)]
        fields: ProductFieldArgs,
    },

    /// Delete one or more products
    #[command(alias = "rm")]
    Delete {
        /// Product ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },
}

/// Filter panel flags.
#[derive(Debug, Args)]
pub struct ProductFilterArgs {
    /// Case-insensitive search over name, brand and category
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only this category id
    #[arg(long)]
    pub category: Option<u64>,

    /// Minimum price (non-numeric values are ignored)
    #[arg(long, allow_hyphen_values = true)]
    pub min_price: Option<String>,

    /// Maximum price (non-numeric values are ignored)
    #[arg(long, allow_hyphen_values = true)]
    pub max_price: Option<String>,

    /// Stock state
    #[arg(long)]
    pub stock: Option<StockArg>,
}

#[derive(Debug, Args)]
pub struct ProductListArgs {
    #[command(flatten)]
    pub filter: ProductFilterArgs,

    /// Saved view (applied before the filter flags)
    #[arg(long)]
    pub view: Option<ViewArg>,

    /// Sort column
    #[arg(long)]
    pub sort: Option<SortArg>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page to show (1-based; clamped into range)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the profile's page_size)
    #[arg(long, short = 'l')]
    pub page_size: Option<usize>,
}

/// Editable product fields. Unset flags are left untouched on update.
#[derive(Debug, Args)]
pub struct ProductFieldArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Decimal price, e.g. 1299.90
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub stock: Option<i64>,

    /// Category id
    #[arg(long)]
    pub category: Option<u64>,

    #[arg(long)]
    pub model_code: Option<String>,

    #[arg(long)]
    pub campaign_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StockArg {
    All,
    InStock,
    OutOfStock,
    LowStock,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Id,
    Name,
    Brand,
    Category,
    Price,
    Stock,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ViewArg {
    /// Stock between 1 and 9
    LowStock,
    /// Stock of zero
    OutOfStock,
    /// Newest first
    Recent,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Store the profile password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Switch the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
