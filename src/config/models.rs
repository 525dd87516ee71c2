use serde::{Deserialize, Serialize};

use super::layer::{ConfigLayer, SourceLayer, TemplateSpec};
use super::setting::Setting;
use crate::humanize::HumanDuration;
use crate::template::TemplateError;

/// On-disk shape of `atcoder.config.{toml,json,yaml}`. The CLI builds the same
/// shape from its override flags.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contests_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_dir: Option<String>,
    /// Bare numbers are milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_max_age: Option<HumanDuration>,
    #[serde(default)]
    pub source: FileSourceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<FileTemplate>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileSourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileTemplate {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

fn text(value: Option<String>) -> Result<Option<Setting<String>>, TemplateError> {
    value.map(Setting::from_text).transpose()
}

impl FileTemplate {
    pub fn into_spec(self) -> Result<TemplateSpec, TemplateError> {
        Ok(TemplateSpec {
            filename: Setting::from_text(self.filename)?,
            content: Setting::from_text(self.content)?,
        })
    }
}

impl FileSourceConfig {
    pub fn into_layer(self) -> Result<SourceLayer, TemplateError> {
        Ok(SourceLayer {
            stem: text(self.stem)?,
            extension: text(self.extension)?,
            compile_command: text(self.compile_command)?,
            execute_command: text(self.execute_command)?,
            template: text(self.template)?,
        })
    }
}

impl FileConfig {
    /// Compile template strings and lift every present value into a layer
    pub fn into_layer(self) -> Result<ConfigLayer, TemplateError> {
        let templates = match self.templates {
            Some(templates) => Some(Setting::Literal(
                templates
                    .into_iter()
                    .map(FileTemplate::into_spec)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            None => None,
        };

        Ok(ConfigLayer {
            contests_dir: text(self.contests_dir)?,
            problem_dir: text(self.problem_dir)?,
            cache_max_age: self.cache_max_age.map(|age| age.as_duration()),
            source: self.source.into_layer()?,
            templates,
        })
    }
}
