use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{FetchError, Result};
use super::models::{Contest, Problem, ProblemInfo};
use super::scrape;
use super::transport::Transport;
use crate::cache::{CacheStore, keys, now_millis};
use crate::observability::FetchStats;

/// One network call plus one parse step, keyed for the cache
#[async_trait]
pub trait Fetcher: Send + Sync {
    type Identity: Send + Sync;
    type Output: Serialize + DeserializeOwned + Send;

    fn cache_key(&self, identity: &Self::Identity) -> String;

    async fn fetch_live(&self, identity: &Self::Identity) -> Result<Self::Output>;

    /// Pause before every live call
    fn courtesy_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Serve from the cache while `now - time < max_age`; otherwise fetch live
/// and overwrite the entry. A failed fetch leaves the old entry in place.
pub async fn fetch_cached<F: Fetcher>(
    fetcher: &F,
    cache: &CacheStore,
    stats: &FetchStats,
    identity: &F::Identity,
    max_age: Duration,
) -> Result<F::Output> {
    let key = fetcher.cache_key(identity);

    if let Some(entry) = cache.get::<F::Output>(&key)? {
        if entry.is_fresh(now_millis(), max_age) {
            debug!(key, "Serving from cache");
            stats.cache_hit();
            return Ok(entry.value);
        }
        debug!(key, "Cache entry expired");
    }

    let delay = fetcher.courtesy_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    stats.network_call();
    let value = fetcher.fetch_live(identity).await?;
    cache.put(&key, &value)?;
    info!(key, "Fetched and cached");
    Ok(value)
}

/// Contest list from the JSON feed
pub struct ContestListFetcher {
    transport: Arc<dyn Transport>,
    url: String,
}

impl ContestListFetcher {
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Fetcher for ContestListFetcher {
    type Identity = ();
    type Output = Vec<Contest>;

    fn cache_key(&self, _identity: &()) -> String {
        keys::contests()
    }

    async fn fetch_live(&self, _identity: &()) -> Result<Vec<Contest>> {
        let body = self.transport.get_text(&self.url).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// Task list of one contest, scraped from its tasks page
pub struct ProblemListFetcher {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ProblemListFetcher {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn tasks_url(&self, contest_id: &str) -> String {
        format!(
            "{}/contests/{}/tasks",
            self.base_url.trim_end_matches('/'),
            contest_id
        )
    }
}

#[async_trait]
impl Fetcher for ProblemListFetcher {
    type Identity = String;
    type Output = Vec<Problem>;

    fn cache_key(&self, contest_id: &String) -> String {
        keys::problems(contest_id)
    }

    async fn fetch_live(&self, contest_id: &String) -> Result<Vec<Problem>> {
        let url = self.tasks_url(contest_id);
        let body = self.transport.get_text(&url).await?;
        scrape::parse_task_list(&body, &self.base_url)
            .map_err(|source| FetchError::Parse { url, source })
    }
}

/// Identity of a single statement page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRef {
    pub contest_id: String,
    pub problem_id: String,
    pub url: String,
}

impl ProblemRef {
    pub fn new(contest_id: &str, problem: &Problem) -> Self {
        Self {
            contest_id: contest_id.to_string(),
            problem_id: problem.id.clone(),
            url: problem.url.clone(),
        }
    }
}

/// Statement fragments and samples of one problem
pub struct ProblemInfoFetcher {
    transport: Arc<dyn Transport>,
    delay: Duration,
}

impl ProblemInfoFetcher {
    pub fn new(transport: Arc<dyn Transport>, delay: Duration) -> Self {
        Self { transport, delay }
    }
}

#[async_trait]
impl Fetcher for ProblemInfoFetcher {
    type Identity = ProblemRef;
    type Output = ProblemInfo;

    fn cache_key(&self, problem: &ProblemRef) -> String {
        keys::problem_info(&problem.contest_id, &problem.problem_id)
    }

    async fn fetch_live(&self, problem: &ProblemRef) -> Result<ProblemInfo> {
        let body = self.transport.get_text(&problem.url).await?;
        scrape::parse_problem_info(&body).map_err(|source| FetchError::Parse {
            url: problem.url.clone(),
            source,
        })
    }

    fn courtesy_delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct CountingTransport {
        body: String,
        calls: Mutex<Vec<String>>,
    }

    impl CountingTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn get_text(&self, url: &str) -> Result<String> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
                excerpt: "unavailable".to_string(),
            })
        }
    }

    const FEED: &str = r#"[{"id":"abc100","start_epoch_second":1528545600,"duration_second":6000,"title":"ABC 100","rate_change":" ~ 1199"}]"#;

    fn store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::open(temp_dir.path().join("cache")).unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_network() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let transport = CountingTransport::new(FEED);
        let fetcher = ContestListFetcher::new(transport.clone(), "https://feed/contests.json");

        let first = fetch_cached(&fetcher, &cache, &stats, &(), Duration::from_secs(60))
            .await
            .unwrap();
        let second = fetch_cached(&fetcher, &cache, &stats, &(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.network_calls, 1);
        assert_eq!(snapshot.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch_and_restamps() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let transport = CountingTransport::new(FEED);
        let fetcher = ContestListFetcher::new(transport.clone(), "https://feed/contests.json");

        let contests: Vec<Contest> = serde_json::from_str(FEED).unwrap();
        cache.put_at(&keys::contests(), &contests, 0).unwrap();

        fetch_cached(&fetcher, &cache, &stats, &(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(transport.calls(), 1);
        let entry = cache.get::<Vec<Contest>>(&keys::contests()).unwrap().unwrap();
        assert!(entry.time > 0);
    }

    #[tokio::test]
    async fn test_zero_max_age_always_refetches() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let transport = CountingTransport::new(FEED);
        let fetcher = ContestListFetcher::new(transport.clone(), "https://feed/contests.json");

        for _ in 0..3 {
            fetch_cached(&fetcher, &cache, &stats, &(), Duration::ZERO)
                .await
                .unwrap();
        }
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_entry() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let fetcher = ContestListFetcher::new(Arc::new(FailingTransport), "https://feed/x");

        cache.put_at(&keys::contests(), &Vec::<Contest>::new(), 7).unwrap();

        let err = fetch_cached(&fetcher, &cache, &stats, &(), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));

        let entry = cache.get::<Vec<Contest>>(&keys::contests()).unwrap().unwrap();
        assert_eq!(entry.time, 7);
    }

    #[tokio::test]
    async fn test_undecodable_feed_is_decode_error() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let transport = CountingTransport::new("<html>oops</html>");
        let fetcher = ContestListFetcher::new(transport, "https://feed/contests.json");

        let err = fetch_cached(&fetcher, &cache, &stats, &(), Duration::ZERO)
            .await
            .unwrap_err();
        match err {
            FetchError::Decode { url, .. } => assert_eq!(url, "https://feed/contests.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_problem_list_url() {
        let fetcher = ProblemListFetcher::new(CountingTransport::new(""), "https://atcoder.jp/");
        assert_eq!(
            fetcher.tasks_url("abc100"),
            "https://atcoder.jp/contests/abc100/tasks"
        );
        assert_eq!(fetcher.cache_key(&"abc100".to_string()), "problems-abc100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_problem_info_delay_only_on_live_call() {
        let (cache, _temp) = store();
        let stats = FetchStats::new();
        let page = "<div id=\"task-statement\">\
            <div class=\"part\"><section><h3>Problem Statement</h3>p</section></div>\
            <div class=\"part\"><section><h3>Constraints</h3>c</section></div>\
            <div class=\"part\"><section><h3>Input</h3>i</section></div>\
            <div class=\"part\"><section><h3>Output</h3>o</section></div></div>";
        let transport = CountingTransport::new(page);
        let fetcher = ProblemInfoFetcher::new(transport.clone(), Duration::from_secs(1));
        let problem = ProblemRef {
            contest_id: "abc100".to_string(),
            problem_id: "a".to_string(),
            url: "https://atcoder.jp/contests/abc100/tasks/abc100_a".to_string(),
        };

        let start = tokio::time::Instant::now();
        fetch_cached(&fetcher, &cache, &stats, &problem, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        fetch_cached(&fetcher, &cache, &stats, &problem, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(transport.calls(), 1);
    }
}
