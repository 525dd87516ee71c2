use std::time::Duration;

use super::setting::{Setting, SettingError};

pub const DEFAULT_CONTESTS_DIR: &str = "contests";
pub const DEFAULT_EXTENSION: &str = "cpp";
pub const DEFAULT_EXECUTE_COMMAND: &str = "./a.out";
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// An extra file written next to each problem's source
#[derive(Debug, Clone)]
pub struct TemplateSpec {
    pub filename: Setting<String>,
    pub content: Setting<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceLayer {
    pub stem: Option<Setting<String>>,
    pub extension: Option<Setting<String>>,
    pub compile_command: Option<Setting<String>>,
    pub execute_command: Option<Setting<String>>,
    pub template: Option<Setting<String>>,
}

/// One config source. Absent fields defer to lower layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    pub contests_dir: Option<Setting<String>>,
    pub problem_dir: Option<Setting<String>>,
    pub cache_max_age: Option<Duration>,
    pub source: SourceLayer,
    /// Replaced as a whole, never combined element-wise
    pub templates: Option<Setting<Vec<TemplateSpec>>>,
}

impl SourceLayer {
    pub fn merge_over(self, lower: SourceLayer) -> SourceLayer {
        SourceLayer {
            stem: self.stem.or(lower.stem),
            extension: self.extension.or(lower.extension),
            compile_command: self.compile_command.or(lower.compile_command),
            execute_command: self.execute_command.or(lower.execute_command),
            template: self.template.or(lower.template),
        }
    }
}

impl ConfigLayer {
    /// Deep merge: `self` wins leaf by leaf, `source` recurses
    pub fn merge_over(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            contests_dir: self.contests_dir.or(lower.contests_dir),
            problem_dir: self.problem_dir.or(lower.problem_dir),
            cache_max_age: self.cache_max_age.or(lower.cache_max_age),
            source: self.source.merge_over(lower.source),
            templates: self.templates.or(lower.templates),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceDefaults {
    pub stem: Setting<String>,
    pub extension: Setting<String>,
    pub compile_command: Setting<String>,
    pub execute_command: Setting<String>,
    pub template: Setting<String>,
}

/// The bottom layer: every leaf present
#[derive(Debug, Clone)]
pub struct Defaults {
    pub contests_dir: Setting<String>,
    pub problem_dir: Setting<String>,
    pub cache_max_age: Duration,
    pub source: SourceDefaults,
    pub templates: Setting<Vec<TemplateSpec>>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            contests_dir: Setting::Literal(DEFAULT_CONTESTS_DIR.to_string()),
            problem_dir: Setting::computed(|problem, _| problem.id().to_string()),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            source: SourceDefaults {
                stem: Setting::computed(|problem, _| problem.id().to_lowercase()),
                extension: Setting::Literal(DEFAULT_EXTENSION.to_string()),
                compile_command: Setting::scoped(|scope| {
                    let source = scope.source.ok_or(SettingError::MissingContext("source"))?;
                    Ok(format!("g++ -std=gnu++20 -O2 -o a.out {source}"))
                }),
                execute_command: Setting::Literal(DEFAULT_EXECUTE_COMMAND.to_string()),
                template: Setting::Literal(String::new()),
            },
            templates: Setting::Literal(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: &str) -> Option<Setting<String>> {
        Some(Setting::Literal(value.to_string()))
    }

    fn literal_of(setting: &Option<Setting<String>>) -> Option<&str> {
        setting
            .as_ref()
            .and_then(Setting::as_literal)
            .map(String::as_str)
    }

    #[test]
    fn test_higher_layer_wins_per_leaf() {
        let upper = ConfigLayer {
            source: SourceLayer {
                extension: literal("rs"),
                ..Default::default()
            },
            ..Default::default()
        };
        let lower = ConfigLayer {
            contests_dir: literal("work"),
            source: SourceLayer {
                extension: literal("py"),
                template: literal("print()"),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = upper.merge_over(lower);
        assert_eq!(literal_of(&merged.source.extension), Some("rs"));
        assert_eq!(literal_of(&merged.source.template), Some("print()"));
        assert_eq!(literal_of(&merged.contests_dir), Some("work"));
        assert!(merged.source.stem.is_none());
    }

    #[test]
    fn test_templates_replaced_wholesale() {
        let spec = |name: &str| TemplateSpec {
            filename: Setting::Literal(name.to_string()),
            content: Setting::Literal(String::new()),
        };
        let upper = ConfigLayer {
            templates: Some(Setting::Literal(vec![spec("Makefile")])),
            ..Default::default()
        };
        let lower = ConfigLayer {
            templates: Some(Setting::Literal(vec![spec("a.txt"), spec("b.txt")])),
            ..Default::default()
        };

        let merged = upper.merge_over(lower);
        let templates = merged.templates.unwrap();
        let templates = templates.as_literal().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].filename.as_literal().unwrap(), "Makefile");
    }

    #[test]
    fn test_defaults() {
        let defaults = Defaults::default();
        assert_eq!(defaults.contests_dir.as_literal().unwrap(), "contests");
        assert_eq!(defaults.source.extension.as_literal().unwrap(), "cpp");
        assert_eq!(defaults.source.template.as_literal().unwrap(), "");
        assert!(defaults.source.stem.as_literal().is_none());
        assert_eq!(defaults.cache_max_age, Duration::from_secs(3600));
    }
}
