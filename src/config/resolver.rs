use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::layer::{ConfigLayer, Defaults, TemplateSpec};
use super::setting::{Resolved, Setting};

/// An extra template after resolution
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub filename: Resolved<String>,
    pub content: Resolved<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub stem: Resolved<String>,
    pub extension: Resolved<String>,
    /// Scope carries the generated source filename
    pub compile_command: Resolved<String>,
    pub execute_command: Resolved<String>,
    pub template: Resolved<String>,
}

/// Fully merged configuration; every leaf is callable
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project root: the directory holding the config file, or the start directory
    pub root: PathBuf,
    pub config_file: Option<PathBuf>,
    /// Absolute, relative values are joined onto `root`
    pub contests_dir: Resolved<PathBuf>,
    pub problem_dir: Resolved<String>,
    pub cache_max_age: Resolved<Duration>,
    pub source: ResolvedSource,
    pub templates: Resolved<Arc<Vec<ResolvedTemplate>>>,
}

/// Merge `cli` over `discovered` over `defaults` and normalize every leaf
pub fn resolve(
    cli: ConfigLayer,
    discovered: ConfigLayer,
    defaults: Defaults,
    root: &Path,
) -> ResolvedConfig {
    let merged = cli.merge_over(discovered);
    let source = merged.source;

    let project_root = root.to_path_buf();
    let contests_dir = Resolved::from(merged.contests_dir.unwrap_or(defaults.contests_dir))
        .map(move |dir| absolutize(&project_root, &dir));

    ResolvedConfig {
        root: root.to_path_buf(),
        config_file: None,
        contests_dir,
        problem_dir: merged.problem_dir.unwrap_or(defaults.problem_dir).into(),
        cache_max_age: Setting::Literal(merged.cache_max_age.unwrap_or(defaults.cache_max_age))
            .into(),
        source: ResolvedSource {
            stem: source.stem.unwrap_or(defaults.source.stem).into(),
            extension: source.extension.unwrap_or(defaults.source.extension).into(),
            compile_command: source
                .compile_command
                .unwrap_or(defaults.source.compile_command)
                .into(),
            execute_command: source
                .execute_command
                .unwrap_or(defaults.source.execute_command)
                .into(),
            template: source.template.unwrap_or(defaults.source.template).into(),
        },
        templates: resolve_templates(merged.templates.unwrap_or(defaults.templates)),
    }
}

fn absolutize(root: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

fn resolve_specs(specs: Vec<TemplateSpec>) -> Arc<Vec<ResolvedTemplate>> {
    Arc::new(
        specs
            .into_iter()
            .map(|spec| ResolvedTemplate {
                filename: spec.filename.into(),
                content: spec.content.into(),
            })
            .collect(),
    )
}

fn resolve_templates(setting: Setting<Vec<TemplateSpec>>) -> Resolved<Arc<Vec<ResolvedTemplate>>> {
    match setting {
        Setting::Literal(specs) => Setting::Literal(resolve_specs(specs)).into(),
        Setting::Computed(generator) => {
            Setting::scoped(move |scope| generator(scope).map(resolve_specs)).into()
        }
    }
}
