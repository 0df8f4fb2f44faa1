use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Select};
use popcorn_models::UserRating;

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Pick a rating from a row of stars
pub fn prompt_rating(title: &str) -> Result<UserRating> {
    let items: Vec<String> = (UserRating::MIN..=UserRating::MAX)
        .map(|n| format!("{:>2}  {}", n, stars(n)))
        .collect();

    let index = Select::new()
        .with_prompt(format!("Rate {}", title))
        .items(&items)
        .default(items.len() / 2)
        .interact()
        .map_err(|e| eyre!("Failed to read rating: {}", e))?;

    let value = UserRating::MIN + index as u8;
    UserRating::new(value).map_err(|e| eyre!("{}", e))
}

/// Masked input for the API key
pub fn prompt_api_key() -> Result<String> {
    let key = rpassword::prompt_password("OMDb API key: ")
        .map_err(|e| eyre!("Failed to read API key: {}", e))?;
    Ok(key.trim().to_string())
}

pub fn stars(n: u8) -> String {
    let filled = n.min(UserRating::MAX) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(UserRating::MAX as usize - filled))
}
