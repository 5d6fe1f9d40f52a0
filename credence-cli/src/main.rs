//! Credence CLI
//!
//! Scores the credibility of web articles from AI-authorship, domain trust
//! and text heuristics.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use credence_core::{ContentType, CredibilityScorer, DomainTrustTable, ScoreInput};
use credence_detect::{
    AiEstimator, HuggingFaceConfig, HuggingFaceDetector, LlmDetector, NeutralDetector,
    SharedDetector,
};
use credence_fetch::{FetchConfig, HttpFetcher};
use credence_runtime::{Analyzer, AnalyzerConfig, MemoryCache};

#[derive(Parser)]
#[command(name = "credence")]
#[command(author, version, about = "Credence: URL credibility scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8000", env = "CREDENCE_BIND")]
        bind: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Analyze URLs once and print the results as JSON
    Analyze {
        /// URLs to analyze
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Score a page offline from a known AI probability
    Score {
        /// Page URL
        #[arg(short, long)]
        url: String,

        /// Probability (0-1) that the text is AI-generated
        #[arg(short, long)]
        ai_probability: f64,

        /// Content type hint (news, research, pdf, blog, unknown)
        #[arg(short, long, default_value = "blog")]
        content_type: String,

        /// File holding the article text
        #[arg(short, long)]
        text_file: Option<PathBuf>,

        /// TOML file of domain trust overrides
        #[arg(long, env = "CREDENCE_TRUST_TABLE")]
        trust_table: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DetectorKind {
    Huggingface,
    Openai,
    Anthropic,
    Openrouter,
    Neutral,
}

#[derive(Args)]
struct PipelineArgs {
    /// URLs analyzed concurrently
    #[arg(short, long, default_value = "3")]
    workers: usize,

    /// Page fetch timeout in seconds
    #[arg(long, default_value = "10")]
    fetch_timeout: u64,

    /// TOML file of domain trust overrides
    #[arg(long, env = "CREDENCE_TRUST_TABLE")]
    trust_table: Option<PathBuf>,

    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Args)]
struct DetectorArgs {
    /// AI-authorship detector
    #[arg(long, value_enum, default_value = "huggingface")]
    detector: DetectorKind,

    /// Detector model (provider default when unset)
    #[arg(short, long)]
    model: Option<String>,

    /// Custom API base URL for the detector
    #[arg(long)]
    detector_url: Option<String>,

    /// Hugging Face token (or set HF_API_TOKEN env var)
    #[arg(long, env = "HF_API_TOKEN")]
    hf_token: Option<String>,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY")]
    api_key: Option<String>,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    anthropic_key: Option<String>,

    /// OpenRouter API key (or set OPENROUTER_API_KEY env var)
    #[arg(long, env = "OPENROUTER_API_KEY")]
    openrouter_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Serve { bind, pipeline } => run_server(&bind, pipeline).await?,
        Commands::Analyze { urls, pipeline } => run_analyze(urls, pipeline).await?,
        Commands::Score {
            url,
            ai_probability,
            content_type,
            text_file,
            trust_table,
        } => run_score(&url, ai_probability, &content_type, text_file, trust_table)?,
    }

    Ok(())
}

async fn run_server(bind: &str, pipeline: PipelineArgs) -> Result<()> {
    let analyzer = build_analyzer(pipeline)?;

    eprintln!("🔎 Credence - URL credibility scoring\n");
    eprintln!("🌐 Listening on http://{}", bind);
    eprintln!("   POST   /analyze_urls");
    eprintln!("   DELETE /flush_cache\n");

    credence_runtime::serve(bind, analyzer).await?;
    Ok(())
}

async fn run_analyze(urls: Vec<String>, pipeline: PipelineArgs) -> Result<()> {
    let analyzer = build_analyzer(pipeline)?;
    let outcomes = analyzer.analyze_urls(urls).await;

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    info!("Analyzed {} URLs ({} failed)", outcomes.len(), failed);

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}

fn run_score(
    url: &str,
    ai_probability: f64,
    content_type: &str,
    text_file: Option<PathBuf>,
    trust_table: Option<PathBuf>,
) -> Result<()> {
    let scorer = build_scorer(trust_table)?;
    let hint: ContentType = content_type.parse()?;

    let text = text_file
        .map(|path| {
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
        })
        .transpose()?;

    let mut input = ScoreInput::new(ai_probability, url).content_type(hint);
    if let Some(text) = text.as_deref() {
        input = input.text(text);
    }

    let assessment = scorer.score(input);
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

fn build_analyzer(pipeline: PipelineArgs) -> Result<Arc<Analyzer>> {
    let fetcher = HttpFetcher::new(FetchConfig {
        timeout_secs: pipeline.fetch_timeout,
        ..Default::default()
    })?;
    let estimator = AiEstimator::new(build_detector(pipeline.detector)?);
    info!("AI detector: {}", estimator.detector_name());

    Ok(Arc::new(Analyzer::new(
        Arc::new(fetcher),
        estimator,
        build_scorer(pipeline.trust_table)?,
        Arc::new(MemoryCache::new()),
        AnalyzerConfig {
            max_concurrent: pipeline.workers,
        },
    )))
}

fn build_scorer(trust_table: Option<PathBuf>) -> Result<CredibilityScorer> {
    let table = match trust_table {
        Some(path) => {
            let overrides = DomainTrustTable::load(&path)?;
            info!("Loaded {} trust overrides from {}", overrides.len(), path.display());
            DomainTrustTable::merged_over_builtin(&overrides)
        }
        None => DomainTrustTable::builtin(),
    };
    Ok(CredibilityScorer::new(Arc::new(table)))
}

fn build_detector(args: DetectorArgs) -> Result<SharedDetector> {
    let detector: SharedDetector = match args.detector {
        DetectorKind::Huggingface => {
            let defaults = HuggingFaceConfig::default();
            Arc::new(HuggingFaceDetector::new(HuggingFaceConfig {
                api_token: args.hf_token,
                model: args.model.unwrap_or(defaults.model),
                base_url: args.detector_url.unwrap_or(defaults.base_url),
                ..HuggingFaceConfig::default()
            })?)
        }
        DetectorKind::Openai => {
            let model = args.model.unwrap_or_else(|| "gpt-4o-mini".to_string());
            let detector = match (args.detector_url.as_deref(), args.api_key.as_deref()) {
                (Some(base_url), None) => LlmDetector::local(base_url, &model)?,
                (base_url, Some(key)) => LlmDetector::openai(key, &model, base_url)?,
                (None, None) => anyhow::bail!(
                    "OpenAI API key required. Set OPENAI_API_KEY or use --api-key"
                ),
            };
            Arc::new(detector)
        }
        DetectorKind::Openrouter => {
            let key = args.openrouter_key.ok_or_else(|| {
                anyhow::anyhow!("OpenRouter API key required. Set OPENROUTER_API_KEY or use --openrouter-key")
            })?;
            let model = args.model.unwrap_or_else(|| "openai/gpt-4o-mini".to_string());
            Arc::new(LlmDetector::openrouter(&key, &model)?)
        }
        DetectorKind::Anthropic => {
            let key = args.anthropic_key.ok_or_else(|| {
                anyhow::anyhow!("Anthropic API key required. Set ANTHROPIC_API_KEY or use --anthropic-key")
            })?;
            let model = args.model.unwrap_or_else(|| "claude-3-5-haiku-latest".to_string());
            Arc::new(LlmDetector::anthropic(&key, &model, args.detector_url.as_deref())?)
        }
        DetectorKind::Neutral => Arc::new(NeutralDetector),
    };

    Ok(detector)
}
