/// Cache key layout
///
/// - `contests`: the full contest list
/// - `problems-{contest_id}`: task list of one contest
/// - `problem-{contest_id}-{problem_id}`: statement and samples of one task

/// Key for the contest list
pub fn contests() -> String {
    "contests".to_string()
}

/// Key for a contest's task list: problems-{contest_id}
pub fn problems(contest_id: &str) -> String {
    format!("problems-{}", contest_id)
}

/// Key for one problem statement: problem-{contest_id}-{problem_id}
pub fn problem_info(contest_id: &str, problem_id: &str) -> String {
    format!("problem-{}-{}", contest_id, problem_id)
}
