// Library surface for the batch generator and integration tests.
// The binary in main.rs only parses arguments and calls into this.
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod filename;
pub mod generator;
pub mod grouper;
pub mod logging;
pub mod pool;
pub mod render;
pub mod report;
pub mod selection;
pub mod validator;

pub use assembler::{Assembler, Assembly, AssemblyOptions, ExtraAnswers};
pub use error::{GeneratorError, Result, ValidationError};
pub use generator::{Generator, RunSummary};
