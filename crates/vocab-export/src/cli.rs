use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, debug};

use crate::{
    DEFAULT_FULL_OUTPUT, DEFAULT_MODEL_PATH, DEFAULT_SIMPLIFIED_OUTPUT, DEFAULT_VECTORIZER_PATH,
    Exporter, SIMPLIFIED_VOCAB_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "vocab-export")]
#[command(
    about = "Export the TF-IDF vocabulary of the healthbot model to JSON",
    long_about = None
)]
pub struct Cli {
    /// Serialized classifier artifact
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Serialized TF-IDF vectorizer artifact
    #[arg(long, value_name = "PATH", default_value = DEFAULT_VECTORIZER_PATH)]
    pub vectorizer: PathBuf,

    /// Full vocabulary export
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_FULL_OUTPUT)]
    pub output: PathBuf,

    /// Simplified vocabulary export for the mobile client
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_SIMPLIFIED_OUTPUT)]
    pub android_output: PathBuf,

    /// Number of words kept in the simplified export
    #[arg(
        short = 'n',
        long,
        default_value_t = SIMPLIFIED_VOCAB_SIZE,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_words: usize,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every step
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::WARN,
            (_, true) => Level::DEBUG,
            _ => Level::INFO,
        }
    }
}

/// Install a stderr log subscriber at the verbosity `cli` asks for.
pub fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: &Cli) -> Result<()> {
    debug!(?cli, "Starting vocabulary export");
    let exporter = Exporter::new()
        .with_full_output(&cli.output)
        .with_simplified_output(&cli.android_output)
        .with_max_words(cli.max_words);

    let mut stdout = std::io::stdout().lock();
    crate::run(&cli.model, &cli.vectorizer, &exporter, &mut stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_paths() {
        let cli = Cli::parse_from(["vocab-export"]);

        assert_eq!(cli.model, PathBuf::from("healthbot_model.pkl"));
        assert_eq!(cli.vectorizer, PathBuf::from("tfidf_vectorizer.pkl"));
        assert_eq!(cli.output, PathBuf::from("tfidf_vocabulary.json"));
        assert_eq!(cli.android_output, PathBuf::from("android_vocabulary.json"));
        assert_eq!(cli.max_words, 2001);
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "vocab-export",
            "--vectorizer",
            "artifacts/vec.pkl",
            "-a",
            "mobile.json",
            "-n",
            "500",
            "-v",
        ]);

        assert_eq!(cli.vectorizer, PathBuf::from("artifacts/vec.pkl"));
        assert_eq!(cli.android_output, PathBuf::from("mobile.json"));
        assert_eq!(cli.max_words, 500);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_rejects_zero_words() {
        assert!(Cli::try_parse_from(["vocab-export", "--max-words", "0"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["vocab-export", "-q", "-v"]).is_err());
    }
}
