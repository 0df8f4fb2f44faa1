use super::context::AppContext;
use super::{prompts, ui};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(context: &AppContext, api_key: Option<String>, show: bool, output: &Output) -> Result<()> {
    if let Some(key) = api_key {
        store_api_key(context, key, output)?;
    } else if !show {
        configure_api_key(context, output)?;
    }

    if show {
        show_config(context, output)?;
    }
    Ok(())
}

fn configure_api_key(context: &AppContext, output: &Output) -> Result<()> {
    if !ui::is_interactive() {
        return Err(eyre!("Not running in a terminal. Use 'popcorn config --api-key <KEY>'."));
    }

    let credentials = context.credentials()?;
    if credentials.get_omdb_api_key().is_some()
        && !prompts::prompt_yes_no("An OMDb API key is already stored. Replace it?", Some(false))?
    {
        output.info("Keeping the stored API key");
        return Ok(());
    }

    output.info("Get a free key at https://www.omdbapi.com/apikey.aspx");
    let key = prompts::prompt_api_key()?;
    store_api_key(context, key, output)
}

fn store_api_key(context: &AppContext, key: String, output: &Output) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    if write_default_config(context)? {
        output.info(format!("Wrote default settings to {}", context.paths.config_file().display()));
    }

    let mut credentials = context.credentials()?;
    credentials.set_omdb_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "OMDb API key saved to {}",
        context.paths.credentials_file().display()
    ));
    Ok(())
}

/// Creates the app directories and, on first run, a config file holding the
/// effective settings. Returns whether the file was written.
fn write_default_config(context: &AppContext) -> Result<bool> {
    context
        .paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;

    let config_file = context.paths.config_file();
    if config_file.exists() {
        return Ok(false);
    }
    context
        .config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    Ok(true)
}

fn show_config(context: &AppContext, output: &Output) -> Result<()> {
    let credentials = context.credentials()?;
    let api_key = credentials.get_omdb_api_key().map(|k| mask_string(k));
    let config = &context.config;

    if output.is_json() {
        output.json(&json!({
            "config_file": context.paths.config_file(),
            "credentials_file": context.paths.credentials_file(),
            "storage_dir": context.storage_dir(),
            "log_dir": context.paths.log_dir(),
            "omdb_api_key": api_key,
            "config": {
                "omdb": { "base_url": config.omdb.base_url },
                "search": { "min_query_length": config.search.min_query_length },
                "storage": { "watched_key": config.storage.watched_key },
                "logging": { "level": config.logging.level, "file": config.logging.file },
            },
        }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    let config_file = context.paths.config_file();
    let mut files = Table::new();
    files.set_header(vec![
        Cell::new("Files").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    files.add_row(vec![
        Cell::new("Config"),
        Cell::new(if config_file.exists() {
            config_file.display().to_string()
        } else {
            format!("{} (not created, using defaults)", config_file.display())
        }),
    ]);
    files.add_row(vec![Cell::new("Credentials"), Cell::new(context.paths.credentials_file().display())]);
    files.add_row(vec![Cell::new("Watched list"), Cell::new(context.storage_dir().display())]);
    files.add_row(vec![Cell::new("Logs"), Cell::new(context.paths.log_dir().display())]);
    files.load_preset(comfy_table::presets::UTF8_FULL);
    files.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", files);

    let mut settings = Table::new();
    settings.set_header(vec![
        Cell::new("Settings").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    settings.add_row(vec![
        Cell::new("OMDb API key"),
        Cell::new(match &api_key {
            Some(masked) => masked.green().to_string(),
            None => "<not set>".red().to_string(),
        }),
    ]);
    settings.add_row(vec![Cell::new("OMDb base URL"), Cell::new(&config.omdb.base_url)]);
    settings.add_row(vec![Cell::new("Min query length"), Cell::new(config.search.min_query_length)]);
    settings.add_row(vec![Cell::new("Storage key"), Cell::new(&config.storage.watched_key)]);
    settings.add_row(vec![Cell::new("Log level"), Cell::new(&config.logging.level)]);
    settings.load_preset(comfy_table::presets::UTF8_FULL);
    settings.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", settings);

    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.chars().count() <= 4 {
        return "*".repeat(s.chars().count());
    }
    let chars: Vec<char> = s.chars().collect();
    format!(
        "{}***{}",
        chars[..2].iter().collect::<String>(),
        chars[chars.len() - 2..].iter().collect::<String>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use popcorn_config::{Config, PathManager};

    #[test]
    fn test_write_default_config_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.search.min_query_length = 5;
        let context = AppContext { paths: PathManager::with_base(dir.path()), config };

        assert!(write_default_config(&context).unwrap());
        assert!(context.paths.storage_dir().is_dir());
        let written = Config::load_from_file(&context.paths.config_file()).unwrap();
        assert_eq!(written.search.min_query_length, 5);

        assert!(!write_default_config(&context).unwrap());
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("a1b2c3d4"), "a1***d4");
    }
}
