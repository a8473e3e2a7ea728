//! One batch run: assemble, draw every item, write the report.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::info;

use crate::assembler::{Assembler, AssemblyOptions, DuplicateStats, ExtraAnswers, FilenameScheme};
use crate::catalog::{Catalog, CatalogQuestion};
use crate::config::GeneratorConfig;
use crate::content::{PuzzleQuestion, Question, QuizQuestion};
use crate::error::Result;
use crate::render::{OutputDir, Renderer, SvgRenderer};
use crate::report::{self, ReportModel};
use crate::selection::{AnswerSelector, PuzzleSelector, QuizSelector, SelectorKind};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub kind: SelectorKind,
    pub output_dir: PathBuf,
    pub combinations: usize,
    pub questions: usize,
    pub answers: usize,
    pub stats: DuplicateStats,
    pub report: PathBuf,
    pub preview: PathBuf,
}

/// Where a run reads its content from and writes its output to.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub output_dir: &'a Path,
    /// Copied into the output directory when given.
    pub source: Option<&'a Path>,
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate_quiz<Q, R>(
        &self,
        questions: Vec<Q>,
        extra_answers: ExtraAnswers<Q::Answer>,
        renderer: &R,
        target: Target<'_>,
    ) -> Result<RunSummary>
    where
        Q: QuizQuestion,
        R: Renderer<Q> + ?Sized,
    {
        self.generate(QuizSelector::new(), questions, extra_answers, renderer, target)
    }

    pub fn generate_puzzle<Q, R>(
        &self,
        questions: Vec<Q>,
        extra_answers: ExtraAnswers<Q::Answer>,
        renderer: &R,
        target: Target<'_>,
    ) -> Result<RunSummary>
    where
        Q: PuzzleQuestion,
        R: Renderer<Q> + ?Sized,
    {
        self.generate(PuzzleSelector::new(), questions, extra_answers, renderer, target)
    }

    /// Loads a catalog and runs it with the built-in SVG renderer.
    pub fn generate_catalog(&self, path: &Path) -> Result<RunSummary> {
        let catalog = Catalog::load(path)?;
        let kind = catalog.kind;
        let (questions, extra_answers) = catalog.into_parts();
        let output_dir = self.config.output_dir_for(path);
        let target = Target {
            output_dir: &output_dir,
            source: Some(path),
        };
        let renderer = SvgRenderer::default();

        match kind {
            SelectorKind::Quiz => {
                self.generate_quiz::<CatalogQuestion, _>(questions, extra_answers, &renderer, target)
            }
            SelectorKind::Puzzle => {
                self.generate_puzzle::<CatalogQuestion, _>(questions, extra_answers, &renderer, target)
            }
        }
    }

    pub fn generate<S, R>(
        &self,
        selector: S,
        questions: Vec<S::Question>,
        extra_answers: ExtraAnswers<<S::Question as Question>::Answer>,
        renderer: &R,
        target: Target<'_>,
    ) -> Result<RunSummary>
    where
        S: AnswerSelector,
        R: Renderer<S::Question> + ?Sized,
    {
        let mut rng = self.rng();
        let options = self.assembly_options(renderer.extension(), &mut rng);
        let assembler = Assembler::new(selector, options);

        info!("Assembling {} {} questions", questions.len(), assembler.selector().kind());
        let assembly = assembler.assemble(questions, extra_answers, &mut rng)?;

        let output = OutputDir::prepare(target.output_dir, target.source)?;
        output.draw(renderer, &assembly, !self.config.debugging)?;

        let model = ReportModel::build(assembler.selector(), &assembly, self.config.sort_questions_randomly());
        let report_path = output.join(report::COMBINATIONS_FILE);
        report::write_combinations(&model.document(), &report_path)?;
        let preview_path = output.join(report::PREVIEW_FILE);
        report::write_preview(&model.preview(&mut rng), &preview_path)?;

        info!("Done: {} combinations written to {}", model.len(), output.path().display());
        Ok(RunSummary {
            kind: model.kind,
            output_dir: output.path().to_path_buf(),
            combinations: model.len(),
            questions: assembly.questions.len(),
            answers: assembly.answers.len(),
            stats: assembly.stats,
            report: report_path,
            preview: preview_path,
        })
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn assembly_options(&self, extension: &str, rng: &mut dyn RngCore) -> AssemblyOptions {
        let filenames = if self.config.debugging {
            FilenameScheme::Plain
        } else {
            FilenameScheme::Hashed {
                salt: format!("{:016x}", rng.gen::<u64>()),
            }
        };
        AssemblyOptions {
            duplicate_questions: self.config.duplicate_questions,
            duplicate_answers: self.config.duplicate_answers,
            filenames,
            extension: extension.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::report::CombinationsDocument;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const CATALOG: &str = r#"{
        "kind": "quiz",
        "questions": [
            {
                "text": "hard",
                "group": "g",
                "difficulty": 5.0,
                "num_answers": 2,
                "required_correct_answers": 1,
                "answers": [{"label": "x"}, {"label": "y", "features": [10.0]}],
                "correct": ["x"]
            },
            {
                "text": "easy",
                "group": "g",
                "difficulty": 1.0,
                "num_answers": 2,
                "required_correct_answers": 1,
                "answers": [{"label": "z", "features": [20.0]}],
                "correct": ["z"]
            }
        ]
    }"#;

    fn debug_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            debugging: true,
            seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn catalog_run_writes_report_next_to_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("capitals.json");
        fs::write(&path, CATALOG).unwrap();

        let summary = Generator::new(debug_config(1)).generate_catalog(&path).unwrap();

        assert_eq!(summary.output_dir, dir.path().join("capitals"));
        assert_eq!(summary.combinations, 2);
        assert_eq!(summary.questions, 2);
        assert_eq!(summary.answers, 3);
        assert!(summary.output_dir.join("capitals.json").is_file());
        assert!(summary.output_dir.join("q0000.svg").is_file());
        assert!(summary.output_dir.join("a0004.svg").is_file());

        let doc: CombinationsDocument = serde_json::from_slice(&fs::read(&summary.report).unwrap()).unwrap();
        // "easy" was accepted second but sorts first.
        assert_eq!(doc.questions[0].filename, "q0003.svg");
        assert_eq!(doc.questions[1].filename, "q0000.svg");
        assert!(doc.sort_questions_randomly);
        assert!(summary.preview.is_file());
    }

    #[test]
    fn hashed_filenames_are_reproducible_with_a_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, CATALOG).unwrap();
        let config = |out: &str| GeneratorConfig {
            seed: Some(9),
            output_dir: Some(dir.path().join(out)),
            ..GeneratorConfig::default()
        };

        let first = Generator::new(config("one")).generate_catalog(&path).unwrap();
        let second = Generator::new(config("two")).generate_catalog(&path).unwrap();

        let first = fs::read_to_string(first.report).unwrap();
        let second = fs::read_to_string(second.report).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains("q0000"));
    }

    #[test]
    fn failed_assembly_leaves_no_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, CATALOG.replace(r#""correct": ["z"]"#, r#""correct": []"#)).unwrap();

        let result = Generator::new(debug_config(1)).generate_catalog(&path);

        assert_matches!(result, Err(GeneratorError::Validation(_)));
        assert!(!dir.path().join("bad").exists());
    }
}
