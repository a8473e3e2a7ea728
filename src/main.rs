use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use quizgen::config::{ConfigStore, FileConfigStore, GeneratorConfig, QuestionOrder};
use quizgen::logging;
use quizgen::pool::DuplicatePolicy;
use quizgen::Generator;

/// assemble quiz and puzzle question sets from a content catalog
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Groups and deduplicates the questions of a JSON catalog, picks a similarity-constrained answer set for each, validates it, draws every item as SVG and writes combinations.json plus an HTML preview."
)]
pub struct Cli {
    /// catalog file declaring the questions and extra answers
    catalog: PathBuf,

    /// output directory (default: next to the catalog, named after it); emptied before the run
    #[clap(short = 'o', long = "out")]
    output_dir: Option<PathBuf>,

    /// configuration file to read instead of the platform default
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seed for tie-breaks, filename hashing and the preview shuffle
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// what to do with duplicate questions
    #[clap(long, value_enum)]
    duplicate_questions: Option<DuplicatePolicy>,

    /// what to do with duplicate answers (include is not allowed)
    #[clap(long, value_enum)]
    duplicate_answers: Option<DuplicatePolicy>,

    /// tell consumers to keep the difficulty order instead of shuffling questions
    #[clap(long)]
    sort_by_difficulty: bool,

    /// plain filenames and no check that every image was drawn
    #[clap(long)]
    debug: bool,

    /// more log output (-v, -vv, -vvv)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Stored configuration with the command line flags applied on top.
    fn to_config(&self, mut cfg: GeneratorConfig) -> GeneratorConfig {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = Some(dir.clone());
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(policy) = self.duplicate_questions {
            cfg.duplicate_questions = policy;
        }
        if let Some(policy) = self.duplicate_answers {
            cfg.duplicate_answers = policy;
        }
        if self.sort_by_difficulty {
            cfg.question_order = QuestionOrder::Difficulty;
        }
        cfg.debugging |= self.debug;
        cfg
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("logging disabled: {err}");
    }

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = cli.to_config(store.load());
    if config.debugging {
        warn!("Debugging is on: filenames are not hashed");
    }

    let summary = Generator::new(config)
        .generate_catalog(&cli.catalog)
        .with_context(|| format!("failed to generate from {}", cli.catalog.display()))?;

    info!(
        "{} questions ignored, {} duplicate questions included, {} answers ignored",
        summary.stats.questions_ignored, summary.stats.questions_included, summary.stats.answers_ignored
    );
    println!(
        "{} {} combinations ({} questions, {} answers) written to {}",
        summary.combinations,
        summary.kind,
        summary.questions,
        summary.answers,
        summary.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_stored_config() {
        let cli = Cli::parse_from([
            "quizgen",
            "c.json",
            "--seed",
            "3",
            "--duplicate-answers",
            "ignore",
            "--sort-by-difficulty",
        ]);
        let stored = GeneratorConfig {
            seed: Some(1),
            duplicate_questions: DuplicatePolicy::Include,
            ..GeneratorConfig::default()
        };

        let cfg = cli.to_config(stored);
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.duplicate_questions, DuplicatePolicy::Include);
        assert_eq!(cfg.duplicate_answers, DuplicatePolicy::Ignore);
        assert_eq!(cfg.question_order, QuestionOrder::Difficulty);
        assert!(!cfg.debugging);
    }
}
