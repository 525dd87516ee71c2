use std::sync::Arc;
use std::time::Duration;

use super::error::Result;
use super::fetcher::{
    ContestListFetcher, Fetcher, ProblemInfoFetcher, ProblemListFetcher, ProblemRef, fetch_cached,
};
use super::models::{Contest, Problem, ProblemInfo};
use super::transport::{HttpConfig, HttpTransport, Transport};
use crate::cache::CacheStore;
use crate::observability::FetchStats;

pub const DEFAULT_CONTESTS_URL: &str = "https://kenkoooo.com/atcoder/resources/contests.json";
pub const DEFAULT_BASE_URL: &str = "https://atcoder.jp";
pub const DEFAULT_PROBLEM_DELAY: Duration = Duration::from_secs(1);

/// Endpoints and pacing of an [`AtCoderClient`]
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub contests_url: String,
    pub base_url: String,
    /// Pause before each live statement fetch
    pub problem_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            contests_url: DEFAULT_CONTESTS_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            problem_delay: DEFAULT_PROBLEM_DELAY,
        }
    }
}

/// Cache-aware access to the three remote resources
pub struct AtCoderClient {
    cache: CacheStore,
    stats: Arc<FetchStats>,
    contests: ContestListFetcher,
    problems: ProblemListFetcher,
    problem_info: ProblemInfoFetcher,
}

impl AtCoderClient {
    pub fn new(transport: Arc<dyn Transport>, cache: CacheStore, options: FetchOptions) -> Self {
        Self {
            cache,
            stats: Arc::new(FetchStats::new()),
            contests: ContestListFetcher::new(transport.clone(), options.contests_url),
            problems: ProblemListFetcher::new(transport.clone(), options.base_url),
            problem_info: ProblemInfoFetcher::new(transport, options.problem_delay),
        }
    }

    /// Client over the real network with default endpoints
    pub fn with_http(cache: CacheStore) -> Result<Self> {
        let transport = HttpTransport::new(HttpConfig::default())?;
        Ok(Self::new(Arc::new(transport), cache, FetchOptions::default()))
    }

    pub fn stats(&self) -> Arc<FetchStats> {
        self.stats.clone()
    }

    pub async fn contests(&self, max_age: Duration) -> Result<Vec<Contest>> {
        fetch_cached(&self.contests, &self.cache, &self.stats, &(), max_age).await
    }

    /// The stored contest list regardless of age, without touching the network
    pub fn cached_contests(&self) -> Result<Option<Vec<Contest>>> {
        let entry = self
            .cache
            .get::<Vec<Contest>>(&self.contests.cache_key(&()))?;
        Ok(entry.map(|entry| entry.value))
    }

    /// Look a contest up in the contest list
    pub async fn find_contest(&self, contest_id: &str, max_age: Duration) -> Result<Option<Contest>> {
        let contests = self.contests(max_age).await?;
        Ok(contests.into_iter().find(|contest| contest.id == contest_id))
    }

    pub async fn problems(&self, contest_id: &str, max_age: Duration) -> Result<Vec<Problem>> {
        fetch_cached(
            &self.problems,
            &self.cache,
            &self.stats,
            &contest_id.to_string(),
            max_age,
        )
        .await
    }

    pub async fn problem_info(
        &self,
        contest_id: &str,
        problem: &Problem,
        max_age: Duration,
    ) -> Result<ProblemInfo> {
        let identity = ProblemRef::new(contest_id, problem);
        fetch_cached(&self.problem_info, &self.cache, &self.stats, &identity, max_age).await
    }
}
