//! Load command implementation.

use crate::cli::LoadArgs;
use crate::config::Profile;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use quarry_contentful::{ContentfulCredentials, ContentfulLoader, LoaderOptions, DEFAULT_ENVIRONMENT};
use quarry_domain::TextSplitter;
use quarry_extractor::TextChunker;
use serde_json::Value;
use std::fs;
use tracing::info;

/// Execute the load command.
pub async fn execute_load(args: LoadArgs, profile: &Profile, formatter: &Formatter) -> Result<()> {
    let credentials = credentials(&args, profile)?;
    let options = loader_options(&args, profile)?;
    let loader = ContentfulLoader::connect(&credentials, options)?;

    let chunker = args
        .split
        .map(|strategy| TextChunker::new(strategy.into(), args.chunk_size));
    let splitter = chunker.as_ref().map(|c| c as &(dyn TextSplitter + Sync));

    let output = loader.run(args.output.into(), splitter).await?;
    info!(count = output.len(), space = %credentials.space_id, "Load complete");

    println!("{}", formatter.format_output(&output)?);
    Ok(())
}

/// Flags and environment first, then the profile.
pub(crate) fn credentials(args: &LoadArgs, profile: &Profile) -> Result<ContentfulCredentials> {
    let space_id = args
        .space_id
        .clone()
        .or_else(|| profile.contentful.space_id.clone())
        .ok_or_else(|| CliError::Config("Contentful space id is required (--space-id or CONTENTFUL_SPACE_ID)".to_string()))?;
    let delivery_token = args
        .delivery_token
        .clone()
        .or_else(|| profile.contentful.delivery_token.clone())
        .ok_or_else(|| {
            CliError::Config("Contentful delivery token is required (--delivery-token or CONTENTFUL_DELIVERY_TOKEN)".to_string())
        })?;

    let mut credentials = ContentfulCredentials::new(space_id, delivery_token);
    if let Some(token) = args.preview_token.clone().or_else(|| profile.contentful.preview_token.clone()) {
        credentials = credentials.with_preview_token(token);
    }
    Ok(credentials)
}

pub(crate) fn loader_options(args: &LoadArgs, profile: &Profile) -> Result<LoaderOptions> {
    let environment_id = args
        .environment
        .clone()
        .or_else(|| profile.contentful.environment.clone())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

    let mut options = LoaderOptions {
        environment_id,
        api_type: args.api.into(),
        include: args.include,
        include_all: args.include_all,
        limit: args.limit,
        include_field_names: args.include_field_names,
        ..LoaderOptions::default()
    };

    if let Some(path) = &args.loader_config {
        let raw = fs::read_to_string(path)
            .map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))?;
        options = options.with_config_json(&raw);
    }
    if let Some(metadata) = &args.metadata {
        options = options.with_metadata(&Value::String(metadata.clone()));
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ApiArg, OutputArg};
    use quarry_contentful::ApiType;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn args() -> LoadArgs {
        LoadArgs {
            space_id: None,
            delivery_token: None,
            preview_token: None,
            environment: None,
            api: ApiArg::Delivery,
            loader_config: None,
            include_field_names: false,
            include: None,
            include_all: false,
            limit: None,
            metadata: None,
            split: None,
            chunk_size: 2000,
            output: OutputArg::Documents,
        }
    }

    fn profile() -> Profile {
        let mut profile = Profile::default();
        profile.contentful.space_id = Some("profile-space".to_string());
        profile.contentful.delivery_token = Some("profile-token".to_string());
        profile.contentful.environment = Some("staging".to_string());
        profile
    }

    #[test]
    fn test_flags_override_profile() {
        let args = LoadArgs {
            space_id: Some("flag-space".to_string()),
            ..args()
        };
        let credentials = credentials(&args, &profile()).unwrap();
        assert_eq!(credentials.space_id, "flag-space");
        assert_eq!(credentials.delivery_token, "profile-token");
        assert_eq!(credentials.preview_token, None);
    }

    #[test]
    fn test_missing_credentials() {
        let err = credentials(&args(), &Profile::default()).unwrap_err();
        assert!(err.to_string().contains("space id"));
    }

    #[test]
    fn test_options_from_profile_and_flags() {
        let args = LoadArgs {
            api: ApiArg::Preview,
            include_all: true,
            limit: Some(10),
            metadata: Some(r#"{"locale": "de"}"#.to_string()),
            ..args()
        };
        let options = loader_options(&args, &profile()).unwrap();

        assert_eq!(options.environment_id, "staging");
        assert_eq!(options.api_type, ApiType::Preview);
        assert!(options.include_all);
        assert_eq!(options.metadata.get("locale"), Some(&json!("de")));
        // include_all suppresses limit
        assert!(options.query().get("limit").is_none());
    }

    #[test]
    fn test_loader_config_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"{"mainContentType": {"contentType": "faq", "fieldsToParse": ["fields.question"]}}"#,
        )
        .unwrap();
        let args = LoadArgs {
            loader_config: Some(file.path().to_path_buf()),
            ..args()
        };

        let options = loader_options(&args, &Profile::default()).unwrap();

        assert_eq!(options.environment_id, DEFAULT_ENVIRONMENT);
        assert_eq!(options.config.main_content_type.content_type, "faq");
    }

    #[test]
    fn test_unreadable_loader_config() {
        let args = LoadArgs {
            loader_config: Some("/nonexistent/quarry.json".into()),
            ..args()
        };
        assert!(matches!(
            loader_options(&args, &Profile::default()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
