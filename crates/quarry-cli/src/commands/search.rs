//! Search command implementation.

use crate::cli::SearchArgs;
use crate::config::{EmbeddingProvider, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use quarry_domain::{Embeddings, NodeOutput, OutputKind};
use quarry_embed::{MockEmbeddingModel, OllamaEmbeddings};
use quarry_opensearch::{OpenSearchConfig, OpenSearchRetriever, SearchValues, DEFAULT_TOP_K};
use serde_json::json;
use std::fmt::Display;
use tracing::debug;

/// Vector length of the mock model when no dimension is configured
const MOCK_DIMENSION: usize = 384;

/// Execute the search command.
pub async fn execute_search(args: SearchArgs, profile: &Profile, formatter: &Formatter) -> Result<()> {
    if let Some(min) = args.min_score {
        if !(0.0..=100.0).contains(&min) {
            return Err(CliError::InvalidInput(
                "Minimum score must be between 0 and 100".to_string(),
            ));
        }
    }

    let config = opensearch_config(&args, profile)?;
    let values = SearchValues::parse(&json!({
        "question": args.question,
        "filter": args.filter,
    }))?;
    let output = args.output.into();

    let embedding = &profile.embedding;
    let provider = args.embedder.unwrap_or(embedding.provider);
    debug!(?provider, index = %config.index_name, "Running search");

    let result = match provider {
        EmbeddingProvider::Ollama => {
            let endpoint = args.ollama_url.as_deref().unwrap_or(&embedding.endpoint);
            let model = args.model.as_deref().unwrap_or(&embedding.model);
            let embeddings = OllamaEmbeddings::new(endpoint, model, embedding.dimension)?;
            search_with(&config, embeddings, &values, output).await?
        }
        EmbeddingProvider::Mock => {
            let dimension = if embedding.dimension == 0 {
                MOCK_DIMENSION
            } else {
                embedding.dimension
            };
            search_with(&config, MockEmbeddingModel::new(dimension), &values, output).await?
        }
    };

    println!("{}", formatter.format_output(&result)?);
    Ok(())
}

async fn search_with<E>(
    config: &OpenSearchConfig,
    embeddings: E,
    values: &SearchValues,
    output: OutputKind,
) -> Result<NodeOutput>
where
    E: Embeddings,
    E::Error: Display,
{
    let retriever = OpenSearchRetriever::from_config(config, embeddings)?;
    Ok(retriever.run(values, output).await?)
}

/// Flags and environment first, then the profile.
pub(crate) fn opensearch_config(args: &SearchArgs, profile: &Profile) -> Result<OpenSearchConfig> {
    let saved = &profile.opensearch;
    let url = args
        .url
        .clone()
        .or_else(|| saved.url.clone())
        .ok_or_else(|| CliError::Config("OpenSearch URL is required (--url or OPENSEARCH_URL)".to_string()))?;
    let index_name = args
        .index
        .clone()
        .or_else(|| saved.index.clone())
        .ok_or_else(|| CliError::Config("Index name is required (--index)".to_string()))?;

    Ok(OpenSearchConfig {
        url,
        username: args.username.clone().or_else(|| saved.username.clone()),
        password: args.password.clone().or_else(|| saved.password.clone()),
        index_name,
        top_k: args.top_k.unwrap_or(DEFAULT_TOP_K),
        min_score: args.min_score,
    })
}
