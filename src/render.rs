use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::assembler::Assembly;
use crate::content::Question;
use crate::error::{GeneratorError, Result};
use crate::pool::{ContentKind, Shared};

/// Draws questions and answers to image files.
pub trait Renderer<Q: Question> {
    /// Extension of the files this renderer produces, without the dot.
    fn extension(&self) -> &str;

    fn render_question(&self, question: &Q, path: &Path) -> io::Result<()>;

    fn render_answer(&self, answer: &Q::Answer, path: &Path) -> io::Result<()>;
}

/// Renders any content as its display text on a plain SVG card.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 400,
            height: 120,
        }
    }
}

impl SvgRenderer {
    fn card(&self, text: &dyn Display, path: &Path) -> io::Result<()> {
        let text = escape_text(&text.to_string());
        let svg = format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
                "  <rect width=\"100%\" height=\"100%\" fill=\"white\" />\n",
                "  <text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" ",
                "font-family=\"serif\" font-size=\"24\">{text}</text>\n",
                "</svg>\n"
            ),
            w = self.width,
            h = self.height,
            text = text
        );
        fs::write(path, svg)
    }
}

impl<Q: Question> Renderer<Q> for SvgRenderer {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render_question(&self, question: &Q, path: &Path) -> io::Result<()> {
        self.card(question, path)
    }

    fn render_answer(&self, answer: &Q::Answer, path: &Path) -> io::Result<()> {
        self.card(answer, path)
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The directory a run writes its artifacts to.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Empties (or creates) `path` and copies the content source into it so
    /// the output can always be traced back to its input.
    pub fn prepare(path: impl Into<PathBuf>, source: Option<&Path>) -> Result<Self> {
        let path = path.into();
        if let Some(source) = source {
            if path.exists() && fs::canonicalize(source)?.starts_with(fs::canonicalize(&path)?) {
                return Err(GeneratorError::Configuration(format!(
                    "output directory {} contains the source {}; choose another output directory",
                    path.display(),
                    source.display()
                )));
            }
        }
        if path.is_dir() {
            info!("Truncating directory: {}", path.display());
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;

        if let Some(source) = source {
            if let Some(name) = source.file_name() {
                fs::copy(source, path.join(name))?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }

    /// Renders every accepted question, then every accepted answer, to its
    /// allocated filename. With `check_artifacts` a renderer that reports
    /// success without producing the file fails the run.
    pub fn draw<Q, R>(&self, renderer: &R, assembly: &Assembly<Q>, check_artifacts: bool) -> Result<()>
    where
        Q: Question,
        R: Renderer<Q> + ?Sized,
    {
        info!("Drawing images to {}", self.path.display());
        self.draw_items(&assembly.questions, ContentKind::Question, check_artifacts, |q, path| {
            renderer.render_question(q, path)
        })?;
        self.draw_items(&assembly.answers, ContentKind::Answer, check_artifacts, |a, path| {
            renderer.render_answer(a, path)
        })
    }

    fn draw_items<T, F>(&self, items: &[Shared<T>], kind: ContentKind, check_artifacts: bool, draw: F) -> Result<()>
    where
        T: Display,
        F: Fn(&T, &Path) -> io::Result<()>,
    {
        for (i, item) in items.iter().enumerate() {
            let path = self.join(item.filename());
            debug!(
                "Drawing {} {} of {}: {} => {}",
                kind,
                i + 1,
                items.len(),
                item.item(),
                item.filename()
            );
            draw(item.item(), &path).map_err(|source| GeneratorError::Render {
                path: path.clone(),
                source,
            })?;

            if check_artifacts && !path.is_file() {
                return Err(GeneratorError::MissingArtifact { path });
            }
        }
        info!("Drawing of {} {}s complete", items.len(), kind);
        Ok(())
    }
}
