use clap::{Args, Parser, Subcommand, ValueEnum};
use mountctl_core::core::services::storage_service::RecordSelector;
use mountctl_core::error::{AppError, ValidationError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mountctl")]
#[command(about = "Manage the storage mounts recorded in an OpenList database")]
#[command(version)]
#[command(after_help = "Examples:
  mountctl --db data/data.db storage list        # List storages, secrets masked
  mountctl storage show --mount-path /baidu      # Show one storage
  mountctl storage add --mount-path /local --driver Local --template
  mountctl storage rotate --driver Quark --value-file cookie.txt
  mountctl drivers list                          # Known driver tags
  mountctl token decode --token-file token.txt   # Inspect a JWT offline
  mountctl config set --db /opt/openlist/data/data.db

Environment Variables:
  MOUNTCTL_DB         Path to the application's SQLite database
  MOUNTCTL_TABLE      Storage table name (default: x_storages)
  MOUNTCTL_URL        Base URL of the application (default: http://localhost:5244)
  MOUNTCTL_PASSWORD   Admin password read by 'token check'
  RUST_LOG            Log filter, e.g. RUST_LOG=mountctl_core=debug")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Path to the application's SQLite database
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Storage table name
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Base URL of the application's HTTP API
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Disable colored table output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and edit storage records
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
    /// Known driver tags and their default settings
    Drivers {
        #[command(subcommand)]
        command: DriverCommands,
    },
    /// Decode tokens and check them against the running application
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Check a browser cookie header before storing it
    Cookie {
        #[command(subcommand)]
        command: CookieCommands,
    },
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Exactly one way of addressing a storage
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SelectorArgs {
    /// Storage ID
    #[arg(long)]
    pub id: Option<i64>,

    /// Mount path, e.g. /baidu
    #[arg(long)]
    pub mount_path: Option<String>,

    /// Driver tag; the first storage using it is selected
    #[arg(long)]
    pub driver: Option<String>,
}

impl SelectorArgs {
    pub fn selector(&self) -> Result<RecordSelector, AppError> {
        match (self.id, &self.mount_path, &self.driver) {
            (Some(id), None, None) => Ok(RecordSelector::Id(id)),
            (None, Some(path), None) => Ok(RecordSelector::MountPath(path.clone())),
            (None, None, Some(driver)) => Ok(RecordSelector::Driver(driver.clone())),
            _ => Err(ValidationError::InvalidArguments(
                "Use exactly one of --id, --mount-path or --driver".to_string(),
            )
            .into()),
        }
    }
}

/// Arguments shared by `storage add` and `storage configure`
#[derive(Args, Debug)]
pub struct StorageArgs {
    /// Mount path inside the application, e.g. /quark
    #[arg(long)]
    pub mount_path: String,

    /// Driver tag, e.g. Quark (see 'mountctl drivers list')
    #[arg(long)]
    pub driver: String,

    /// Driver settings as a JSON object
    #[arg(long, conflicts_with = "addition_file")]
    pub addition: Option<String>,

    /// Read the driver settings JSON from a file ('-' for stdin)
    #[arg(long)]
    pub addition_file: Option<PathBuf>,

    /// Free-text note shown in the application's admin UI
    #[arg(long, default_value = "")]
    pub remark: String,

    /// Start from the driver's default settings
    #[arg(long)]
    pub template: bool,
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// List all storages
    #[command(after_help = "Examples:
  mountctl storage list                  # Table, credentials masked
  mountctl storage list --format json    # Output as JSON
  mountctl storage list --show-secrets   # Print credentials in clear")]
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print credential values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Show one storage
    Show {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print credential values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Create a new storage
    #[command(after_help = "Examples:
  mountctl storage add --mount-path /local --driver Local --template
  mountctl storage add --mount-path /dav --driver Webdav --addition-file dav.json")]
    Add(StorageArgs),
    /// Create a storage, or overwrite the one already at the mount path
    Configure(StorageArgs),
    /// Change selected columns of a storage
    #[command(after_help = "Examples:
  mountctl storage update --id 3 --disabled true
  mountctl storage update --id 3 --mount-path /archive --order 10")]
    Update {
        /// Storage ID
        #[arg(long)]
        id: i64,

        #[arg(long)]
        mount_path: Option<String>,

        #[arg(long)]
        driver: Option<String>,

        /// Replacement settings as a JSON object
        #[arg(long, conflicts_with = "addition_file")]
        addition: Option<String>,

        /// Read replacement settings from a file ('-' for stdin)
        #[arg(long)]
        addition_file: Option<PathBuf>,

        #[arg(long)]
        remark: Option<String>,

        /// Disable or re-enable the storage
        #[arg(long)]
        disabled: Option<bool>,

        /// Display order in the application
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a storage
    Delete {
        /// Storage ID
        #[arg(long)]
        id: i64,
    },
    /// Replace one credential of a storage, keeping its other settings
    #[command(after_help = "Examples:
  mountctl storage rotate --driver BaiduNetdisk --value-file refresh_token.txt
  pbpaste | mountctl storage rotate --mount-path /quark --value-file -
  mountctl storage rotate --id 2 --key password --value-file pass.txt")]
    Rotate {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Settings key to replace (default: the driver's credential key)
        #[arg(long)]
        key: Option<String>,

        /// New value (prefer --value-file to keep it out of shell history)
        #[arg(long, conflicts_with = "value_file")]
        value: Option<String>,

        /// Read the new value from a file ('-' for stdin)
        #[arg(long)]
        value_file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DriverCommands {
    /// List known driver tags
    List,
    /// Print the default settings of a driver
    Template {
        /// Driver tag, e.g. BaiduNetdisk
        driver: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Decode a token's header and claims without verifying it
    Decode {
        /// Token text
        #[arg(conflicts_with = "token_file")]
        token: Option<String>,

        /// Read the token from a file ('-' for stdin)
        #[arg(long)]
        token_file: Option<PathBuf>,
    },
    /// Log in (or use an existing token) and probe the admin API
    #[command(after_help = "Examples:
  MOUNTCTL_PASSWORD=... mountctl token check --username admin
  mountctl token check --token-file token.txt --url http://nas:5244")]
    Check {
        /// Admin username to log in with
        #[arg(long, conflicts_with_all = ["token", "token_file"])]
        username: Option<String>,

        /// Environment variable holding the password
        #[arg(long, default_value = "MOUNTCTL_PASSWORD")]
        password_env: String,

        /// Existing token to probe
        #[arg(long, conflicts_with = "token_file")]
        token: Option<String>,

        /// Read an existing token from a file ('-' for stdin)
        #[arg(long)]
        token_file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CookieCommands {
    /// Summarize a cookie header without printing its values
    Inspect {
        /// Cookie header text
        #[arg(long, conflicts_with = "value_file")]
        value: Option<String>,

        /// Read the cookie header from a file ('-' for stdin)
        #[arg(long)]
        value_file: Option<PathBuf>,

        /// Driver whose expected session fields are checked
        #[arg(long, default_value = "Quark")]
        driver: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the configuration file and the resolved settings
    Show,
    /// Store the global --db, --table and --url values in the config file
    #[command(after_help = "Examples:
  mountctl config set --db /opt/openlist/data/data.db
  mountctl config set --url http://localhost:5244")]
    Set,
}
