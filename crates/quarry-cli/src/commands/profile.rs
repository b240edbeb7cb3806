//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs, ProfileSetArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => {
            println!("{}", formatter.format_profiles(&config.profiles, &config.active_profile));
            Ok(())
        }
        ProfileAction::Show => {
            let profile = config.get_active_profile()?;
            println!("{}", formatter.format_profile(&config.active_profile, profile));
            Ok(())
        }
        ProfileAction::Use { name } => use_profile(config, path, name, formatter),
        ProfileAction::Set(set) => set_profile(config, path, set, formatter),
    }
}

/// Switch to a different profile.
fn use_profile(config: &mut Config, path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, path: &Path, set: ProfileSetArgs, formatter: &Formatter) -> Result<()> {
    let action = if config.profiles.contains_key(&set.name) {
        "Updated"
    } else {
        "Created"
    };

    let mut profile = config.profiles.get(&set.name).cloned().unwrap_or_default();
    let contentful = &mut profile.contentful;
    overwrite(&mut contentful.space_id, set.space_id);
    overwrite(&mut contentful.delivery_token, set.delivery_token);
    overwrite(&mut contentful.preview_token, set.preview_token);
    overwrite(&mut contentful.environment, set.environment);

    let opensearch = &mut profile.opensearch;
    overwrite(&mut opensearch.url, set.opensearch_url);
    overwrite(&mut opensearch.username, set.opensearch_username);
    overwrite(&mut opensearch.password, set.opensearch_password);
    overwrite(&mut opensearch.index, set.index);

    let embedding = &mut profile.embedding;
    if let Some(provider) = set.embedder {
        embedding.provider = provider;
    }
    if let Some(endpoint) = set.ollama_url {
        embedding.endpoint = endpoint;
    }
    if let Some(model) = set.model {
        embedding.model = model;
    }
    if let Some(dimension) = set.dimension {
        embedding.dimension = dimension;
    }

    config.set_profile(set.name.clone(), profile);
    config.save(path)?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, set.name))
    );

    Ok(())
}

fn overwrite(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}
