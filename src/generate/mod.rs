//! Contest generation pipeline
//!
//! `gen <contest>` resolves the run-level settings, fetches the task list,
//! checks the target directory, looks the contest up, then writes each
//! problem in list order:
//!
//! ```text
//! contests/abc100/
//! └── a/
//!     ├── a.cpp
//!     ├── metadata.json
//!     └── tests/
//!         ├── in_1.txt
//!         ├── out_1.txt
//!         └── run_tests.sh
//! ```

mod error;
mod materialize;
mod pipeline;

pub use error::{GenerateError, Result};
pub use materialize::{Materializer, ProblemReport, RUNNER_SCRIPT, TESTS_DIR};
pub use pipeline::{GenerateRequest, GenerationReport, Stage, generate};
