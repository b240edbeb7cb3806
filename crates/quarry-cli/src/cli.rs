//! CLI command definitions and argument parsing.

use crate::config::EmbeddingProvider;
use clap::{ArgAction, Parser, Subcommand};
use quarry_contentful::ApiType;
use quarry_domain::OutputKind;
use quarry_extractor::ChunkStrategy;
use std::path::PathBuf;

/// Quarry - Load Contentful entries as documents and search an OpenSearch index.
#[derive(Debug, Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load entries from a Contentful space as documents
    Load(LoadArgs),

    /// Search an existing OpenSearch index
    Search(SearchArgs),

    /// Print a node descriptor as JSON
    Describe(DescribeArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the load command.
#[derive(Debug, Parser)]
pub struct LoadArgs {
    /// Space identifier
    #[arg(long, env = "CONTENTFUL_SPACE_ID")]
    pub space_id: Option<String>,

    /// Content Delivery API token
    #[arg(long, env = "CONTENTFUL_DELIVERY_TOKEN", hide_env_values = true)]
    pub delivery_token: Option<String>,

    /// Content Preview API token
    #[arg(long, env = "CONTENTFUL_PREVIEW_TOKEN", hide_env_values = true)]
    pub preview_token: Option<String>,

    /// Environment identifier
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Which API to read from
    #[arg(long, value_enum, default_value = "delivery")]
    pub api: ApiArg,

    /// JSON file with the content type configuration
    #[arg(long)]
    pub loader_config: Option<PathBuf>,

    /// Prefix rendered fields with their names
    #[arg(long)]
    pub include_field_names: bool,

    /// Link include depth
    #[arg(long)]
    pub include: Option<u32>,

    /// Fetch every page instead of one
    #[arg(long)]
    pub include_all: bool,

    /// Page size when not fetching every page
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// JSON object used as query parameters and merged into document metadata
    #[arg(short, long)]
    pub metadata: Option<String>,

    /// Split documents with this strategy
    #[arg(long, value_enum)]
    pub split: Option<SplitArg>,

    /// Maximum chunk size in characters when splitting
    #[arg(long, default_value = "2000")]
    pub chunk_size: usize,

    /// Node output
    #[arg(short, long, value_enum, default_value = "documents")]
    pub output: OutputArg,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Question to search for
    pub question: String,

    /// Cluster address (host:port or full URL)
    #[arg(long, env = "OPENSEARCH_URL")]
    pub url: Option<String>,

    /// Basic auth user
    #[arg(long, env = "OPENSEARCH_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "OPENSEARCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Index name
    #[arg(short, long)]
    pub index: Option<String>,

    /// Number of results to request
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Minimum score in percent
    #[arg(long)]
    pub min_score: Option<f64>,

    /// JSON object of metadata values that must match
    #[arg(long)]
    pub filter: Option<String>,

    /// Embedding model implementation
    #[arg(long, value_enum)]
    pub embedder: Option<EmbeddingProvider>,

    /// Ollama server root
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long)]
    pub model: Option<String>,

    /// Node output
    #[arg(short, long, value_enum, default_value = "documents")]
    pub output: OutputArg,
}

/// Arguments for the describe command.
#[derive(Debug, Parser)]
pub struct DescribeArgs {
    /// Node to describe
    #[arg(value_enum)]
    pub node: NodeArg,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Use {
        /// Profile name
        name: String,
    },

    /// Create or update a profile; only the given values change
    Set(ProfileSetArgs),
}

/// Values for `profile set`.
#[derive(Debug, Default, Parser)]
pub struct ProfileSetArgs {
    /// Profile name
    pub name: String,
    /// Contentful space identifier
    #[arg(long)]
    pub space_id: Option<String>,
    /// Contentful delivery token
    #[arg(long)]
    pub delivery_token: Option<String>,
    /// Contentful preview token
    #[arg(long)]
    pub preview_token: Option<String>,
    /// Contentful environment
    #[arg(long)]
    pub environment: Option<String>,
    /// OpenSearch address
    #[arg(long)]
    pub opensearch_url: Option<String>,
    /// OpenSearch user
    #[arg(long)]
    pub opensearch_username: Option<String>,
    /// OpenSearch password
    #[arg(long)]
    pub opensearch_password: Option<String>,
    /// OpenSearch index
    #[arg(long)]
    pub index: Option<String>,
    /// Embedding model implementation
    #[arg(long, value_enum)]
    pub embedder: Option<EmbeddingProvider>,
    /// Ollama server root
    #[arg(long)]
    pub ollama_url: Option<String>,
    /// Ollama model name
    #[arg(long)]
    pub model: Option<String>,
    /// Expected embedding dimension
    #[arg(long)]
    pub dimension: Option<usize>,
}

/// API argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ApiArg {
    /// Published content
    Delivery,
    /// Draft content
    Preview,
}

/// Output argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputArg {
    /// Document list
    Documents,
    /// Plain text
    Text,
}

/// Split strategy argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SplitArg {
    /// Blank-line separated paragraphs
    Paragraph,
    /// Markdown headers or numbered sections
    Section,
    /// Approximate token count
    Tokens,
}

/// Node argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NodeArg {
    /// The Contentful document loader
    Contentful,
    /// The OpenSearch existing-index vector store
    Opensearch,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ApiArg> for ApiType {
    fn from(api: ApiArg) -> Self {
        match api {
            ApiArg::Delivery => ApiType::Delivery,
            ApiArg::Preview => ApiType::Preview,
        }
    }
}

impl From<OutputArg> for OutputKind {
    fn from(output: OutputArg) -> Self {
        match output {
            OutputArg::Documents => OutputKind::Documents,
            OutputArg::Text => OutputKind::Text,
        }
    }
}

impl From<SplitArg> for ChunkStrategy {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Paragraph => ChunkStrategy::ByParagraph,
            SplitArg::Section => ChunkStrategy::BySection,
            SplitArg::Tokens => ChunkStrategy::ByTokenCount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_is_an_error_exit() {
        let result = Cli::try_parse_from(["quarry", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_command() {
        let cli = Cli::try_parse_from([
            "quarry",
            "load",
            "--space-id",
            "sp1",
            "--delivery-token",
            "tok",
            "--include-all",
            "--split",
            "paragraph",
            "-o",
            "text",
        ])
        .unwrap();
        match cli.command {
            Command::Load(args) => {
                assert_eq!(args.space_id.as_deref(), Some("sp1"));
                assert!(args.include_all);
                assert!(matches!(args.split, Some(SplitArg::Paragraph)));
                assert!(matches!(args.output, OutputArg::Text));
                assert_eq!(args.chunk_size, 2000);
            }
            _ => panic!("Expected Load command"),
        }
    }

    #[test]
    fn test_search_command_with_global_flags() {
        let cli = Cli::try_parse_from([
            "quarry", "search", "how do I install?", "-k", "2", "--format", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.question, "how do I install?");
                assert_eq!(args.top_k, Some(2));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_describe_command() {
        let cli = Cli::try_parse_from(["quarry", "describe", "opensearch"]).unwrap();
        assert!(matches!(cli.command, Command::Describe(DescribeArgs { node: NodeArg::Opensearch })));
        assert!(Cli::try_parse_from(["quarry", "describe", "pinecone"]).is_err());
    }

    #[test]
    fn test_profile_set_command() {
        let cli = Cli::try_parse_from(["quarry", "profile", "set", "work", "--index", "docs", "--embedder", "mock"])
            .unwrap();
        match cli.command {
            Command::Profile(ProfileArgs { action: ProfileAction::Set(set) }) => {
                assert_eq!(set.name, "work");
                assert_eq!(set.index.as_deref(), Some("docs"));
                assert_eq!(set.embedder, Some(EmbeddingProvider::Mock));
            }
            _ => panic!("Expected profile set"),
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ApiType::from(ApiArg::Preview), ApiType::Preview);
        assert_eq!(OutputKind::from(OutputArg::Text), OutputKind::Text);
        assert_eq!(ChunkStrategy::from(SplitArg::Section), ChunkStrategy::BySection);
    }
}
