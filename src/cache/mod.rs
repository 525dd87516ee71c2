/// Fjall-backed cache for remote responses
///
/// Every value fetched from the judge (contest list, per-contest task lists,
/// per-problem statements) is stored as a [`CacheEntry`] under a key derived
/// from what was fetched:
///
/// - `contests` -> `Vec<Contest>`
/// - `problems-{contest_id}` -> `Vec<Problem>`
/// - `problem-{contest_id}-{problem_id}` -> `ProblemInfo`
///
/// The store never expires anything on its own. Callers compare
/// [`CacheEntry::time`] against their own max age and overwrite stale entries
/// after a live fetch.
///
/// ## Usage
///
/// ```rust,ignore
/// use atcoder_cli::cache::{CacheStore, keys};
///
/// let store = CacheStore::open("/tmp/atcoder-cache")?;
/// store.put(&keys::contests(), &contests)?;
/// let entry = store.get::<Vec<Contest>>(&keys::contests())?;
/// ```

pub mod error;
pub mod keys;
pub mod store;

pub use error::{CacheError, Result};
pub use store::{CacheEntry, CacheStore, now_millis};
