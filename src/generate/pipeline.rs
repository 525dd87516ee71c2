use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use super::error::{GenerateError, Result};
use super::materialize::{Materializer, ProblemReport};
use crate::config::ResolvedConfig;
use crate::observability::FetchStatsSnapshot;
use crate::remote::{AtCoderClient, ProblemRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingConfig,
    FetchingProblemList,
    CheckingTargetDir,
    FetchingContestMeta,
    PerProblem,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingConfig => "resolving_config",
            Stage::FetchingProblemList => "fetching_problem_list",
            Stage::CheckingTargetDir => "checking_target_dir",
            Stage::FetchingContestMeta => "fetching_contest_meta",
            Stage::PerProblem => "per_problem",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub contest_id: String,
    /// Replace an existing contest directory
    pub force: bool,
}

impl GenerateRequest {
    pub fn new(contest_id: impl Into<String>) -> Self {
        Self {
            contest_id: contest_id.into(),
            force: false,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub contest_dir: PathBuf,
    pub problems: Vec<ProblemReport>,
    pub stats: FetchStatsSnapshot,
}

/// Tracks the current stage for logging
struct Progress<'a> {
    contest_id: &'a str,
    stage: Stage,
}

impl<'a> Progress<'a> {
    fn new(contest_id: &'a str) -> Self {
        Self {
            contest_id,
            stage: Stage::ResolvingConfig,
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        info!(contest = self.contest_id, stage = %stage, "Generation stage");
    }

    fn fail(&mut self, err: &GenerateError) {
        error!(contest = self.contest_id, stage = %self.stage, error = %err, "Generation failed");
        self.stage = Stage::Failed;
    }
}

/// Generate the directory tree of one contest
///
/// Problems are processed one after another. A failure aborts the run and
/// leaves whatever was already written in place.
pub async fn generate(
    request: &GenerateRequest,
    config: &ResolvedConfig,
    client: &AtCoderClient,
) -> Result<GenerationReport> {
    let mut progress = Progress::new(&request.contest_id);

    match run(request, config, client, &mut progress).await {
        Ok(report) => {
            progress.enter(Stage::Done);
            info!(
                contest = %request.contest_id,
                problems = report.problems.len(),
                cache_hits = report.stats.cache_hits,
                network_calls = report.stats.network_calls,
                "Generated contest"
            );
            Ok(report)
        }
        Err(e) => {
            progress.fail(&e);
            Err(e)
        }
    }
}

async fn run(
    request: &GenerateRequest,
    config: &ResolvedConfig,
    client: &AtCoderClient,
    progress: &mut Progress<'_>,
) -> Result<GenerationReport> {
    let contest_id = request.contest_id.as_str();

    progress.enter(Stage::ResolvingConfig);
    validate_contest_id(contest_id)?;
    let max_age = config.cache_max_age.get()?;
    let contest_dir = config.contests_dir.get()?.join(contest_id);
    let materializer = Materializer::new(config)?;

    progress.enter(Stage::FetchingProblemList);
    let problems = client
        .problems(contest_id, max_age)
        .await
        .map_err(|source| GenerateError::Fetch {
            what: format!("problem list for {contest_id}"),
            source,
        })?;

    progress.enter(Stage::CheckingTargetDir);
    prepare_contest_dir(&contest_dir, request.force).await?;

    progress.enter(Stage::FetchingContestMeta);
    let contest = client
        .find_contest(contest_id, max_age)
        .await
        .map_err(|source| GenerateError::Fetch {
            what: format!("information for {contest_id}"),
            source,
        })?
        .ok_or_else(|| GenerateError::ContestNotFound(contest_id.to_string()))?;

    fs::create_dir_all(&contest_dir)
        .await
        .map_err(GenerateError::io(&contest_dir))?;

    let mut reports = Vec::with_capacity(problems.len());
    for problem in problems {
        progress.enter(Stage::PerProblem);
        let info = client
            .problem_info(contest_id, &problem, max_age)
            .await
            .map_err(|source| GenerateError::Fetch {
                what: format!("information for {contest_id}/{}", problem.id),
                source,
            })?;

        let record = ProblemRecord::new(problem, info);
        let report = materializer
            .write_problem(&contest_dir, &record, &contest)
            .await?;
        info!(
            contest = contest_id,
            problem = record.id(),
            tests = report.tests,
            "Wrote problem"
        );
        reports.push(report);
    }

    Ok(GenerationReport {
        contest_dir,
        problems: reports,
        stats: client.stats().snapshot(),
    })
}

/// The id becomes a path component and part of the task list URL
fn validate_contest_id(contest_id: &str) -> Result<()> {
    let valid = !contest_id.is_empty()
        && contest_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GenerateError::InvalidContestId(contest_id.to_string()))
    }
}

/// Fail on an existing directory unless `force`, which removes it
async fn prepare_contest_dir(contest_dir: &Path, force: bool) -> Result<()> {
    let exists = fs::try_exists(contest_dir)
        .await
        .map_err(GenerateError::io(contest_dir))?;
    if !exists {
        return Ok(());
    }

    if !force {
        return Err(GenerateError::DirectoryExists(contest_dir.to_path_buf()));
    }

    warn!("Removing existing contest directory {}", contest_dir.display());
    fs::remove_dir_all(contest_dir)
        .await
        .map_err(GenerateError::io(contest_dir))
}
