use crate::cli::main_types::{
    ConfigCommands, CookieCommands, DriverCommands, OutputFormat, StorageArgs, StorageCommands,
    TokenCommands,
};
use chrono::Utc;
use mountctl_core::api::client::AdminClient;
use mountctl_core::core::drivers::{
    apply_template, credential_key, important_cookie_fields, supported_drivers, template,
};
use mountctl_core::core::mask::preview_secret;
use mountctl_core::core::services::storage_service::{RecordSelector, StorageService};
use mountctl_core::core::token::{ExpiryStatus, decode_unverified};
use mountctl_core::display::{OperationStatus, TableDisplay, display_status, records_to_json};
use mountctl_core::error::{AppError, ValidationError};
use mountctl_core::storage::config::{Config, Overrides, Settings};
use mountctl_core::store::{Addition, RecordUpdate};
use mountctl_core::utils::cookie::CookieJar;
use mountctl_core::utils::input::read_value;
use mountctl_core::utils::logging::print_verbose;
use mountctl_core::utils::validation::{parse_json_object, validate_table_name, validate_url};
use serde_json::Value;
use std::path::{Path, PathBuf};

const RESTART_NOTICE: &str = "Restart the application for the change to take effect";

/// Driver settings from `--addition` or `--addition-file`, if either was given
fn read_addition(inline: Option<String>, file: Option<&Path>) -> Result<Option<Addition>, AppError> {
    if inline.is_none() && file.is_none() {
        return Ok(None);
    }
    let text = read_value("addition", inline, file)?;
    Ok(Some(parse_json_object("addition", &text)?))
}

#[derive(Default)]
pub struct StorageHandler;

impl StorageHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: StorageCommands,
        service: &StorageService,
        display: &TableDisplay,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            StorageCommands::List {
                format,
                show_secrets,
            } => {
                print_verbose(verbose, "Listing storages");
                let records = service.list()?;
                match format {
                    OutputFormat::Table => {
                        println!("{}", display.render_records(&records, show_secrets));
                        if !records.is_empty() {
                            println!("\n{} storage(s)", records.len());
                        }
                    }
                    OutputFormat::Json => {
                        println!("{:#}", records_to_json(&records, show_secrets));
                    }
                }
                Ok(())
            }
            StorageCommands::Show {
                selector,
                format,
                show_secrets,
            } => {
                let record = service.get(&selector.selector()?)?;
                match format {
                    OutputFormat::Table => {
                        println!("{}", display.render_record_detail(&record, show_secrets));
                    }
                    OutputFormat::Json => {
                        let mut rows = records_to_json(std::slice::from_ref(&record), show_secrets);
                        println!("{:#}", rows[0].take());
                    }
                }
                Ok(())
            }
            StorageCommands::Add(args) => {
                let (addition, remark) = Self::prepare(&args, verbose)?;
                let record = service.add(&args.mount_path, &args.driver, &addition, &remark)?;

                display_status(
                    &format!(
                        "Added storage {} (id {}, driver {})",
                        record.mount_path, record.id, record.driver
                    ),
                    OperationStatus::Success,
                );
                display_status(RESTART_NOTICE, OperationStatus::Info);
                Ok(())
            }
            StorageCommands::Configure(args) => {
                let (addition, remark) = Self::prepare(&args, verbose)?;
                let outcome =
                    service.configure(&args.mount_path, &args.driver, &addition, &remark)?;

                let verb = if outcome.created { "Created" } else { "Updated" };
                display_status(
                    &format!(
                        "{} storage {} (id {}, driver {})",
                        verb, outcome.record.mount_path, outcome.record.id, outcome.record.driver
                    ),
                    OperationStatus::Success,
                );
                display_status(RESTART_NOTICE, OperationStatus::Info);
                Ok(())
            }
            StorageCommands::Update {
                id,
                mount_path,
                driver,
                addition,
                addition_file,
                remark,
                disabled,
                order,
            } => {
                let mut update = RecordUpdate::new();
                if let Some(mount_path) = mount_path {
                    update = update.mount_path(mount_path);
                }
                if let Some(driver) = driver {
                    update = update.driver(driver);
                }
                if let Some(addition) = read_addition(addition, addition_file.as_deref())? {
                    update = update.addition(addition);
                }
                if let Some(remark) = remark {
                    update = update.remark(remark);
                }
                if let Some(disabled) = disabled {
                    update = update.disabled(disabled);
                }
                if let Some(order) = order {
                    update = update.order(order);
                }

                if update.is_empty() {
                    return Err(ValidationError::InvalidArguments(
                        "Nothing to update. Pass at least one of --mount-path, --driver, --addition, --remark, --disabled or --order".to_string(),
                    )
                    .into());
                }

                print_verbose(verbose, &format!("Updating storage {}", id));
                if service.update(id, &update)? == 0 {
                    return Err(AppError::NotFound {
                        selector: RecordSelector::Id(id).to_string(),
                    });
                }

                display_status(&format!("Updated storage {}", id), OperationStatus::Success);
                display_status(RESTART_NOTICE, OperationStatus::Info);
                Ok(())
            }
            StorageCommands::Delete { id } => {
                if service.delete(id)? == 0 {
                    display_status(
                        &format!("No storage with id {}; nothing deleted", id),
                        OperationStatus::Warning,
                    );
                } else {
                    display_status(&format!("Deleted storage {}", id), OperationStatus::Success);
                    display_status(RESTART_NOTICE, OperationStatus::Info);
                }
                Ok(())
            }
            StorageCommands::Rotate {
                selector,
                key,
                value,
                value_file,
            } => {
                let record = service.get(&selector.selector()?)?;

                let key = match key.as_deref().or_else(|| credential_key(&record.driver)) {
                    Some(key) => key.to_string(),
                    None => {
                        return Err(ValidationError::InvalidArguments(format!(
                            "Driver {} has no known credential key; pass --key",
                            record.driver
                        ))
                        .into());
                    }
                };

                let mut value = read_value(&key, value, value_file.as_deref())?;
                if key == "cookie" {
                    let jar = CookieJar::parse(&value)?;
                    if jar.skipped() > 0 {
                        display_status(
                            &format!(
                                "{} segment(s) without name=value were dropped from the cookie",
                                jar.skipped()
                            ),
                            OperationStatus::Warning,
                        );
                    }
                    value = jar.to_header();
                }

                print_verbose(
                    verbose,
                    &format!("Replacing '{}' on storage {}", key, record.id),
                );
                let updated =
                    service.rotate_credential(&RecordSelector::Id(record.id), &key, &value)?;

                display_status(
                    &format!(
                        "Updated {} of {} ({})",
                        key,
                        updated.mount_path,
                        preview_secret(&value)
                    ),
                    OperationStatus::Success,
                );
                display_status(RESTART_NOTICE, OperationStatus::Info);
                Ok(())
            }
        }
    }

    // Resolve the settings to write for add/configure
    fn prepare(args: &StorageArgs, verbose: bool) -> Result<(Addition, String), AppError> {
        let supplied = read_addition(args.addition.clone(), args.addition_file.as_deref())?
            .unwrap_or_default();

        let addition = if args.template {
            if template(&args.driver).is_none() {
                display_status(
                    &format!("No template for driver {}; using the given settings", args.driver),
                    OperationStatus::Warning,
                );
            }
            apply_template(&args.driver, supplied)
        } else {
            supplied
        };

        print_verbose(
            verbose,
            &format!(
                "Settings keys for {}: {}",
                args.mount_path,
                addition.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        );
        Ok((addition, args.remark.clone()))
    }
}

#[derive(Default)]
pub struct DriverHandler;

impl DriverHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: DriverCommands, display: &TableDisplay) -> Result<(), AppError> {
        match command {
            DriverCommands::List => {
                let rows: Vec<(&str, Option<&str>)> = supported_drivers()
                    .into_iter()
                    .map(|driver| (driver, credential_key(driver)))
                    .collect();
                println!("{}", display.render_drivers(&rows));
                Ok(())
            }
            DriverCommands::Template { driver } => match template(&driver) {
                Some(addition) => {
                    println!("{:#}", Value::Object(addition));
                    Ok(())
                }
                None => Err(ValidationError::InvalidArguments(format!(
                    "No template for driver {}. See 'mountctl drivers list'",
                    driver
                ))
                .into()),
            },
        }
    }
}

#[derive(Default)]
pub struct TokenHandler;

impl TokenHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle<F>(
        &self,
        command: TokenCommands,
        create_client: F,
        display: &TableDisplay,
        verbose: bool,
    ) -> Result<(), AppError>
    where
        F: Fn() -> Result<AdminClient, AppError>,
    {
        match command {
            TokenCommands::Decode { token, token_file } => {
                let token = read_value("token", token, token_file.as_deref())?;
                let decoded = decode_unverified(&token)?;

                println!("Header:");
                println!("{:#}", Value::Object(decoded.header.clone()));
                println!("\nClaims:");
                println!("{:#}", Value::Object(decoded.claims.clone()));
                println!("\nSignature: {}", decoded.signature_preview);

                if let Some(username) = decoded.username() {
                    println!("Username: {}", username);
                }

                match decoded.expiry_status(Utc::now()) {
                    ExpiryStatus::Valid {
                        expires_at,
                        remaining,
                    } => display_status(
                        &format!(
                            "Expires {} ({}h {}m left)",
                            expires_at,
                            remaining.num_hours(),
                            remaining.num_minutes() % 60
                        ),
                        OperationStatus::Success,
                    ),
                    ExpiryStatus::Expired { expires_at } => display_status(
                        &format!("Expired at {}", expires_at),
                        OperationStatus::Error,
                    ),
                    ExpiryStatus::NoExpiry => {
                        display_status("Token has no exp claim", OperationStatus::Warning)
                    }
                }
                Ok(())
            }
            TokenCommands::Check {
                username,
                password_env,
                token,
                token_file,
            } => {
                let client = create_client()?;

                let token = match username {
                    Some(username) => {
                        let password = std::env::var(&password_env).map_err(|_| {
                            ValidationError::InvalidArguments(format!(
                                "Set {} to the password of {}",
                                password_env, username
                            ))
                        })?;
                        print_verbose(verbose, &format!("Logging in to {}", client.base_url));
                        let token = client.login(&username, &password).await?;
                        display_status(
                            &format!("Logged in as {} (token {})", username, preview_secret(&token)),
                            OperationStatus::Success,
                        );
                        token
                    }
                    None => read_value("token", token, token_file.as_deref())?,
                };

                let results = client.probe_all(&token).await?;
                println!("{}", display.render_probe_results(&results));

                let rejected = results.iter().filter(|r| !r.is_authorized()).count();
                if rejected == 0 {
                    display_status("Token accepted by every endpoint", OperationStatus::Success);
                } else {
                    display_status(
                        &format!("Token rejected by {} of {} endpoints", rejected, results.len()),
                        OperationStatus::Warning,
                    );
                }
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct CookieHandler;

impl CookieHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: CookieCommands, verbose: bool) -> Result<(), AppError> {
        match command {
            CookieCommands::Inspect {
                value,
                value_file,
                driver,
            } => {
                let header = read_value("cookie", value, value_file.as_deref())?;
                let jar = CookieJar::parse(&header)?;
                let summary = jar.summary(important_cookie_fields(&driver));

                println!("Cookie Summary:");
                println!("===============");
                println!("Fields: {}", summary.field_count);
                println!("Length: {}", summary.total_length);
                print_verbose(
                    verbose,
                    &format!("Field names: {}", jar.names().collect::<Vec<_>>().join(", ")),
                );

                if !summary.present.is_empty() {
                    println!("\n{} session fields:", driver);
                    for (name, length) in &summary.present {
                        println!("  ✅ {} ({} chars)", name, length);
                    }
                }

                if summary.missing.is_empty() {
                    display_status("Cookie looks complete", OperationStatus::Success);
                } else {
                    for name in &summary.missing {
                        println!("  ❌ {}", name);
                    }
                    display_status(
                        &format!(
                            "{} expected field(s) missing; copy the cookie from a logged-in session",
                            summary.missing.len()
                        ),
                        OperationStatus::Warning,
                    );
                }
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        mut config: Config,
        config_path: Option<PathBuf>,
        overrides: &Overrides,
        settings: &Settings,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let file = match &config_path {
                    Some(path) => path.clone(),
                    None => Config::config_file_path()?,
                };

                println!("Current Configuration:");
                println!("=====================");
                println!("Config file: {}", file.display());
                println!(
                    "Database:    {}",
                    settings
                        .database_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(not set)".to_string())
                );
                println!("Table:       {}", settings.table);
                println!("API URL:     {}", settings.api_url);
                Ok(())
            }
            ConfigCommands::Set => {
                let mut updated_fields = Vec::new();

                if let Some(db) = &overrides.database_path {
                    config.set_database_path(db.clone());
                    updated_fields.push(format!("database to: {}", db));
                }
                if let Some(table) = &overrides.table {
                    validate_table_name(table)?;
                    config.set_table(table.clone());
                    updated_fields.push(format!("table to: {}", table));
                }
                if let Some(url) = &overrides.api_url {
                    validate_url(url)?;
                    config.set_api_url(url.clone());
                    updated_fields.push(format!("URL to: {}", url));
                }

                if updated_fields.is_empty() {
                    return Err(ValidationError::InvalidArguments(
                        "No configuration values provided. Use --db, --table and/or --url"
                            .to_string(),
                    )
                    .into());
                }

                config.save(config_path)?;
                display_status(
                    &format!("Set {}", updated_fields.join(", ")),
                    OperationStatus::Success,
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_addition_absent() {
        assert!(read_addition(None, None).expect("read").is_none());
    }

    #[test]
    fn test_read_addition_inline() {
        let addition = read_addition(Some(r#"{"root_folder_path": "/srv"}"#.to_string()), None)
            .expect("read")
            .expect("present");
        assert_eq!(addition.get("root_folder_path"), Some(&Value::from("/srv")));
    }

    #[test]
    fn test_read_addition_rejects_non_object() {
        assert!(matches!(
            read_addition(Some("[1, 2]".to_string()), None),
            Err(AppError::Validation(ValidationError::InvalidJson { .. }))
        ));
    }
}
