use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pool::DuplicatePolicy;

/// How consumers should order questions. The assembled list is always sorted
/// by difficulty; this only sets the report flag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuestionOrder {
    #[default]
    Random,
    Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub duplicate_questions: DuplicatePolicy,
    pub duplicate_answers: DuplicatePolicy,
    pub question_order: QuestionOrder,
    /// Plain filenames and no missing-artifact check.
    pub debugging: bool,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duplicate_questions: DuplicatePolicy::Reject,
            duplicate_answers: DuplicatePolicy::Reject,
            question_order: QuestionOrder::Random,
            debugging: false,
            output_dir: None,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn sort_questions_randomly(&self) -> bool {
        self.question_order == QuestionOrder::Random
    }

    /// Where a run over `catalog` writes its output: the configured directory,
    /// or one named after the catalog next to it.
    pub fn output_dir_for(&self, catalog: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        let stem = catalog
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "quizgen_output".into());
        catalog
            .parent()
            .map(|parent| parent.join(&stem))
            .unwrap_or_else(|| PathBuf::from(stem))
    }
}

pub trait ConfigStore {
    fn load(&self) -> GeneratorConfig;
    fn save(&self, cfg: &GeneratorConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "quizgen") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("quizgen_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GeneratorConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<GeneratorConfig>(&bytes) {
                return cfg;
            }
        }
        GeneratorConfig::default()
    }

    fn save(&self, cfg: &GeneratorConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
