use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::error::{GenerateError, Result};
use crate::config::{ResolvedConfig, Scope};
use crate::metadata::{METADATA_FILE_NAME, Metadata, SourceMetadata, TestMetadata};
use crate::remote::{Contest, ProblemRecord, SampleTest};
use crate::template::Template;

pub const TESTS_DIR: &str = "tests";
pub const RUNNER_SCRIPT: &str = "tests/run_tests.sh";

const RUNNER_TEMPLATE: &str = include_str!("../templates/run_tests.sh");

/// What was written for one problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemReport {
    pub problem_id: String,
    pub dir: PathBuf,
    pub source: PathBuf,
    pub tests: usize,
}

/// Writes a problem directory from a resolved config
pub struct Materializer<'a> {
    config: &'a ResolvedConfig,
    runner: Template,
}

impl<'a> Materializer<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Result<Self> {
        Ok(Self {
            config,
            runner: Template::compile(RUNNER_TEMPLATE)?,
        })
    }

    pub async fn write_problem(
        &self,
        contest_dir: &Path,
        problem: &ProblemRecord,
        contest: &Contest,
    ) -> Result<ProblemReport> {
        let scope = Scope::new(problem, contest);
        let source = &self.config.source;

        let problem_dir = contest_dir.join(self.config.problem_dir.call_scoped(&scope)?);
        fs::create_dir_all(&problem_dir)
            .await
            .map_err(GenerateError::io(&problem_dir))?;

        let filename = format!(
            "{}.{}",
            source.stem.call_scoped(&scope)?,
            source.extension.call_scoped(&scope)?
        );
        let source_path = problem_dir.join(&filename);
        write_file(source_path.clone(), &source.template.call_scoped(&scope)?).await?;

        let tests_dir = problem_dir.join(TESTS_DIR);
        fs::create_dir_all(&tests_dir)
            .await
            .map_err(GenerateError::io(&tests_dir))?;
        write_samples(&tests_dir, problem.tests()).await?;

        let scope = scope.with_source(&filename);
        let execute_command = source.execute_command.call_scoped(&scope)?;
        let metadata = Metadata {
            contest: contest.id.clone(),
            problem: problem.id().to_string(),
            source: SourceMetadata {
                path: filename.clone(),
                compile_command: source.compile_command.call_scoped(&scope)?,
                execute_command: execute_command.clone(),
            },
            tests: (1..=problem.tests().len())
                .map(TestMetadata::numbered)
                .collect(),
        };
        write_file(problem_dir.join(METADATA_FILE_NAME), &metadata.to_json()?).await?;

        self.write_runner(&problem_dir, &execute_command).await?;

        for template in self.config.templates.call_scoped(&scope)?.iter() {
            let name = template.filename.call_scoped(&scope)?;
            let path = Path::new(&name);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                problem_dir.join(path)
            };

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(GenerateError::io(parent))?;
            }
            write_file(path, &template.content.call_scoped(&scope)?).await?;
        }

        Ok(ProblemReport {
            problem_id: problem.id().to_string(),
            dir: problem_dir,
            source: source_path,
            tests: problem.tests().len(),
        })
    }

    async fn write_runner(&self, problem_dir: &Path, execute_command: &str) -> Result<()> {
        let script = self.runner.render(&serde_json::json!({
            "execute_command": execute_command,
        }))?;
        let path = problem_dir.join(RUNNER_SCRIPT);
        write_file(path.clone(), &script).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(GenerateError::io(&path))?;
        }

        Ok(())
    }
}

async fn write_file(path: PathBuf, contents: &str) -> Result<()> {
    debug!("Writing {}", path.display());
    match fs::write(&path, contents).await {
        Ok(()) => Ok(()),
        Err(source) => Err(GenerateError::Io { path, source }),
    }
}

/// `in_N.txt`/`out_N.txt` for every sample, 1-indexed, in one awaited batch
async fn write_samples(tests_dir: &Path, tests: &[SampleTest]) -> Result<()> {
    let writes = tests.iter().enumerate().flat_map(|(index, test)| {
        let n = index + 1;
        [
            write_file(tests_dir.join(format!("in_{n}.txt")), &test.input),
            write_file(tests_dir.join(format!("out_{n}.txt")), &test.output),
        ]
    });
    try_join_all(writes).await?;
    Ok(())
}
