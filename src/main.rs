use anyhow::Result;
use clap::Parser;
use sentence_qa::{ChatConfig, ChatSession};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sentence-qa")]
#[command(about = "Answer questions from a precomputed sentence bundle")]
#[command(version)]
struct Args {
    /// Bundle file used when the data source prompt is left empty
    #[arg(long, short)]
    data: Option<PathBuf>,

    /// URL to download the bundle from when the local file is missing
    #[arg(long, short)]
    url: Option<String>,

    /// Number of neighbours retrieved per question
    #[arg(long, short = 'k', default_value_t = 3)]
    top_k: usize,

    /// Separator between questions in one submission
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    /// Directory for bundles downloaded from a URL typed at the prompt
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> ChatConfig {
        let defaults = ChatConfig::default();
        ChatConfig {
            data_path: self.data.unwrap_or(defaults.data_path),
            source_url: self.url,
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
            top_k: self.top_k,
            delimiter: self.delimiter,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr so the form on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentence_qa=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = args.into_config();
    tracing::debug!(
        "Starting with top_k={} delimiter='{}' cache_dir={}",
        config.top_k,
        config.delimiter,
        config.cache_dir.display()
    );

    println!("Sentence QA - ask questions about your documents.");
    let session = ChatSession::new(config);
    session.run(io::stdin().lock(), io::stdout())?;

    Ok(())
}
