use serde::{Deserialize, Serialize};

/// A contest as published in the contest list feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub id: String,
    pub start_epoch_second: i64,
    pub duration_second: i64,
    pub title: String,
    pub rate_change: String,
}

/// One row of a contest's task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Short id, e.g. "a"
    pub id: String,
    pub title: String,
    /// Absolute statement URL
    pub url: String,
    /// e.g. "2 sec"
    pub run_time_limitation: String,
    /// e.g. "1024 MB"
    pub memory_limitation: String,
}

/// A sample input/output pair (plain text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTest {
    pub input: String,
    pub output: String,
}

/// Statement fragments (HTML) and samples scraped from a problem page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub problem: String,
    pub constraints: String,
    pub input: String,
    pub output: String,
    pub tests: Vec<SampleTest>,
}

/// Task list entry merged with its statement. This is what config templates
/// and computed settings see as `problem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemRecord {
    #[serde(flatten)]
    pub entry: Problem,
    #[serde(flatten)]
    pub info: ProblemInfo,
}

impl ProblemRecord {
    pub fn new(entry: Problem, info: ProblemInfo) -> Self {
        Self { entry, info }
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn tests(&self) -> &[SampleTest] {
        &self.info.tests
    }
}
