//! Literal-or-computed config leaves and their resolved, uniformly callable form

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::remote::{Contest, ProblemRecord};
use crate::template::{Template, TemplateError};

#[derive(Debug, Error)]
pub enum SettingError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("This setting needs a {0} to evaluate")]
    MissingContext(&'static str),
}

/// What a computed setting can see
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Scope<'a> {
    pub problem: Option<&'a ProblemRecord>,
    pub contest: Option<&'a Contest>,
    /// Generated source filename, set for compile/execute commands
    pub source: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(problem: &'a ProblemRecord, contest: &'a Contest) -> Self {
        Self {
            problem: Some(problem),
            contest: Some(contest),
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn problem(&self) -> Result<&'a ProblemRecord, SettingError> {
        self.problem.ok_or(SettingError::MissingContext("problem"))
    }

    pub fn contest(&self) -> Result<&'a Contest, SettingError> {
        self.contest.ok_or(SettingError::MissingContext("contest"))
    }
}

pub type Generator<T> = Arc<dyn Fn(&Scope<'_>) -> Result<T, SettingError> + Send + Sync>;

/// A config leaf as written by the user
pub enum Setting<T> {
    Literal(T),
    Computed(Generator<T>),
}

impl<T: 'static> Setting<T> {
    /// Computed from the problem and contest
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ProblemRecord, &Contest) -> T + Send + Sync + 'static,
    {
        Setting::Computed(Arc::new(move |scope: &Scope<'_>| {
            Ok(f(scope.problem()?, scope.contest()?))
        }))
    }

    /// Computed from the full scope, may fail
    pub fn scoped<F>(f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<T, SettingError> + Send + Sync + 'static,
    {
        Setting::Computed(Arc::new(f))
    }

    pub fn as_literal(&self) -> Option<&T> {
        match self {
            Setting::Literal(value) => Some(value),
            Setting::Computed(_) => None,
        }
    }
}

impl Setting<String> {
    /// Plain strings stay literal; strings containing `{{` become templates
    pub fn from_text(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        if !Template::is_template(&text) {
            return Ok(Setting::Literal(text));
        }

        let template = Template::compile(&text)?;
        Ok(Setting::Computed(Arc::new(move |scope: &Scope<'_>| {
            Ok(template.render(scope)?)
        })))
    }
}

impl<T: Clone> Clone for Setting<T> {
    fn clone(&self) -> Self {
        match self {
            Setting::Literal(value) => Setting::Literal(value.clone()),
            Setting::Computed(generator) => Setting::Computed(generator.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Setting::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A leaf after resolution. Callers never learn whether it was literal.
pub struct Resolved<T>(Generator<T>);

impl<T: 'static> Resolved<T> {
    pub fn get(&self) -> Result<T, SettingError> {
        (self.0)(&Scope::default())
    }

    pub fn call(&self, problem: &ProblemRecord, contest: &Contest) -> Result<T, SettingError> {
        (self.0)(&Scope::new(problem, contest))
    }

    pub fn call_scoped(&self, scope: &Scope<'_>) -> Result<T, SettingError> {
        (self.0)(scope)
    }

    pub fn map<U: 'static, F>(self, f: F) -> Resolved<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.0;
        Resolved(Arc::new(move |scope: &Scope<'_>| inner(scope).map(&f)))
    }
}

impl<T: Clone + Send + Sync + 'static> From<Setting<T>> for Resolved<T> {
    fn from(setting: Setting<T>) -> Self {
        match setting {
            Setting::Literal(value) => Resolved(Arc::new(move |_: &Scope<'_>| Ok(value.clone()))),
            Setting::Computed(generator) => Resolved(generator),
        }
    }
}

impl<T> Clone for Resolved<T> {
    fn clone(&self) -> Self {
        Resolved(self.0.clone())
    }
}

impl<T> fmt::Debug for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolved(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Problem, ProblemInfo};

    fn record(id: &str) -> ProblemRecord {
        ProblemRecord::new(
            Problem {
                id: id.to_string(),
                title: "Title".to_string(),
                url: format!("https://atcoder.jp/contests/abc100/tasks/abc100_{id}"),
                run_time_limitation: "2 sec".to_string(),
                memory_limitation: "1024 MB".to_string(),
            },
            ProblemInfo {
                problem: String::new(),
                constraints: String::new(),
                input: String::new(),
                output: String::new(),
                tests: Vec::new(),
            },
        )
    }

    fn contest() -> Contest {
        Contest {
            id: "abc100".to_string(),
            start_epoch_second: 0,
            duration_second: 6000,
            title: "ABC 100".to_string(),
            rate_change: " ~ 1199".to_string(),
        }
    }

    #[test]
    fn test_literal_is_callable_both_ways() {
        let resolved: Resolved<String> = Setting::Literal("cpp".to_string()).into();
        assert_eq!(resolved.get().unwrap(), "cpp");
        assert_eq!(resolved.call(&record("A"), &contest()).unwrap(), "cpp");
    }

    #[test]
    fn test_closure_sees_problem_and_contest() {
        let setting = Setting::computed(|problem: &ProblemRecord, contest: &Contest| {
            format!("{}-{}", contest.id, problem.id().to_lowercase())
        });
        let resolved: Resolved<String> = setting.into();

        assert_eq!(resolved.call(&record("B"), &contest()).unwrap(), "abc100-b");
        assert!(matches!(
            resolved.get(),
            Err(SettingError::MissingContext("problem"))
        ));
    }

    #[test]
    fn test_text_without_braces_stays_literal() {
        let setting = Setting::from_text("./a.out").unwrap();
        assert_eq!(setting.as_literal().map(String::as_str), Some("./a.out"));
    }

    #[test]
    fn test_template_text_becomes_computed() {
        let setting = Setting::from_text("{{contest.id}}/{{problem.id}} {{source}}").unwrap();
        assert!(setting.as_literal().is_none());

        let resolved: Resolved<String> = setting.into();
        let problem = record("C");
        let contest = contest();
        let scope = Scope::new(&problem, &contest).with_source("c.cpp");
        assert_eq!(resolved.call_scoped(&scope).unwrap(), "abc100/C c.cpp");
    }

    #[test]
    fn test_map_preserves_laziness() {
        let resolved: Resolved<String> = Setting::from_text("{{problem.id}}").unwrap().into();
        let lengths = resolved.map(|s| s.len());
        assert_eq!(lengths.call(&record("ABC"), &contest()).unwrap(), 3);
    }
}
