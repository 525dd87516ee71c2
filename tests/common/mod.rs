//! Shared fixtures: an in-memory judge and page builders

#![allow(dead_code)]

use async_trait::async_trait;
use atcoder_cli::cache::CacheStore;
use atcoder_cli::remote::{AtCoderClient, FetchError, FetchOptions, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://judge.test";
pub const CONTESTS_URL: &str = "http://judge.test/resources/contests.json";

/// Serves canned bodies by URL and records every request
#[derive(Default)]
pub struct StubJudge {
    routes: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl StubJudge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: impl Into<String>, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(url.into(), body.into());
    }

    pub fn unroute(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Transport for StubJudge {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
                excerpt: "Not Found".to_string(),
            })
    }
}

pub fn tasks_url(contest_id: &str) -> String {
    format!("{BASE_URL}/contests/{contest_id}/tasks")
}

pub fn problem_url(contest_id: &str, problem_id: &str) -> String {
    format!("{BASE_URL}/contests/{contest_id}/tasks/{contest_id}_{problem_id}")
}

pub fn contests_feed(ids: &[&str]) -> String {
    let entries: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id":"{id}","start_epoch_second":1528545600,"duration_second":6000,"title":"Contest {id}","rate_change":" ~ 1199"}}"#
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

pub fn tasks_page(contest_id: &str, problem_ids: &[&str]) -> String {
    let rows: String = problem_ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr>
<td class="text-center no-break"><a href="/contests/{contest_id}/tasks/{contest_id}_{id}">{upper}</a></td>
<td><a href="/contests/{contest_id}/tasks/{contest_id}_{id}">Problem {upper}</a></td>
<td class="text-right">2 sec</td>
<td class="text-right">1024 MB</td>
</tr>
"#,
                upper = id.to_uppercase()
            )
        })
        .collect();

    format!(
        r#"<html><body><table class="table">
<thead><tr><th>#</th><th>Task Name</th><th>Time Limit</th><th>Memory Limit</th></tr></thead>
<tbody>
{rows}</tbody>
</table></body></html>"#
    )
}

fn part(heading: &str, body: &str) -> String {
    format!("<div class=\"part\">\n<section>\n<h3>{heading}</h3>{body}\n</section>\n</div>\n")
}

/// Statement page with `samples` example pairs; sample N reads `N` and prints `2N`
pub fn statement_page(samples: usize) -> String {
    let mut parts = String::new();
    parts.push_str(&part("問題文", "<p>Double it.</p>"));
    parts.push_str(&part("制約", "<ul><li>1 \\leq N \\leq 100</li></ul>"));
    parts.push_str(&part("入力", "<pre>N</pre>"));
    parts.push_str(&part("出力", "<p>Print 2N.</p>"));
    for n in 1..=samples {
        parts.push_str(&part(&format!("入力例 {n}"), &format!("<pre>{n}\n</pre>")));
        parts.push_str(&part(&format!("出力例 {n}"), &format!("<pre>{}\n</pre>", n * 2)));
    }

    format!(
        r#"<html><body><div id="task-statement"><span class="lang"><span class="lang-ja">
{parts}</span><span class="lang-en">
{english}</span></span></div></body></html>"#,
        english = part("Problem Statement", "<p>Double it.</p>")
    )
}

/// Route a complete contest: feed, task list and every statement
pub fn route_contest(judge: &StubJudge, contest_id: &str, problems: &[(&str, usize)]) {
    judge.route(CONTESTS_URL, contests_feed(&[contest_id]));
    let ids: Vec<&str> = problems.iter().map(|(id, _)| *id).collect();
    judge.route(tasks_url(contest_id), tasks_page(contest_id, &ids));
    for (id, samples) in problems {
        judge.route(problem_url(contest_id, id), statement_page(*samples));
    }
}

/// A client over `judge` with its own temporary cache
pub fn client(judge: &Arc<StubJudge>) -> (AtCoderClient, TempDir) {
    let cache_dir = TempDir::new().unwrap();
    let cache = CacheStore::open(cache_dir.path().join("cache")).unwrap();
    let options = FetchOptions {
        contests_url: CONTESTS_URL.to_string(),
        base_url: BASE_URL.to_string(),
        problem_delay: Duration::ZERO,
    };
    let transport: Arc<dyn Transport> = judge.clone();
    (AtCoderClient::new(transport, cache, options), cache_dir)
}
