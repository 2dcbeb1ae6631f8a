use crate::cli::command_handlers::{
    ConfigHandler, CookieHandler, DriverHandler, StorageHandler, TokenHandler,
};
use crate::cli::main_types::Commands;
use mountctl_core::api::client::AdminClient;
use mountctl_core::core::services::storage_service::StorageService;
use mountctl_core::display::TableDisplay;
use mountctl_core::error::AppError;
use mountctl_core::storage::config::{Config, Overrides, Settings};
use mountctl_core::store::StorageStore;
use mountctl_core::utils::logging::print_verbose;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    overrides: Overrides,
    settings: Settings,
    verbose: bool,
    use_colors: bool,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        overrides: Overrides,
        verbose: bool,
        use_colors: bool,
    ) -> Self {
        let mut settings = config.resolve(&overrides, &Overrides::from_env());
        if let Ok(cwd) = std::env::current_dir() {
            settings.discover_database(&cwd);
        }
        Self {
            config,
            config_path,
            overrides,
            settings,
            verbose,
            use_colors,
        }
    }

    fn create_display(&self) -> TableDisplay {
        TableDisplay::new().with_colors(self.use_colors)
    }

    // Opens the database only for commands that need it
    fn create_storage_service(&self) -> Result<StorageService, AppError> {
        let path = self.settings.require_database_path()?;
        let store = StorageStore::open(path, &self.settings.table)?;
        self.log_verbose(&format!(
            "Using {} (table {})",
            store.path().display(),
            store.table()
        ));
        Ok(StorageService::new(store))
    }

    fn create_client(&self) -> Result<AdminClient, AppError> {
        self.log_verbose(&format!("Using API at {}", self.settings.api_url));
        AdminClient::new(self.settings.api_url.clone())
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Storage { command } => {
                let handler = StorageHandler::new();
                let service = self.create_storage_service()?;
                handler.handle(command, &service, &self.create_display(), self.verbose)
            }
            Commands::Drivers { command } => {
                let handler = DriverHandler::new();
                handler.handle(command, &self.create_display())
            }
            Commands::Token { command } => {
                let handler = TokenHandler::new();
                handler
                    .handle(
                        command,
                        || self.create_client(),
                        &self.create_display(),
                        self.verbose,
                    )
                    .await
            }
            Commands::Cookie { command } => {
                let handler = CookieHandler::new();
                handler.handle(command, self.verbose)
            }
            Commands::Config { command } => {
                let handler = ConfigHandler::new();
                handler.handle(
                    command,
                    self.config.clone(),
                    self.config_path.clone(),
                    &self.overrides,
                    &self.settings,
                )
            }
        }
    }
}
