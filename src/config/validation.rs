use super::layer::ConfigLayer;
use super::setting::Setting;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must not contain path separators: '{value}'")]
    PathSeparator { field: &'static str, value: String },

    #[error("Template #{index} has an empty filename")]
    EmptyTemplateFilename { index: usize },
}

/// Check the literal values of a layer. Computed leaves are only checked when
/// they are evaluated.
pub fn validate(layer: &ConfigLayer) -> Result<(), ValidationError> {
    validate_not_empty("contests_dir", layer.contests_dir.as_ref())?;
    validate_not_empty("problem_dir", layer.problem_dir.as_ref())?;
    validate_file_part("source.stem", layer.source.stem.as_ref())?;
    validate_file_part("source.extension", layer.source.extension.as_ref())?;
    validate_templates(layer)?;
    Ok(())
}

fn literal<'a>(setting: Option<&'a Setting<String>>) -> Option<&'a str> {
    setting.and_then(Setting::as_literal).map(String::as_str)
}

fn validate_not_empty(
    field: &'static str,
    setting: Option<&Setting<String>>,
) -> Result<(), ValidationError> {
    match literal(setting) {
        Some(value) if value.trim().is_empty() => Err(ValidationError::Empty { field }),
        _ => Ok(()),
    }
}

/// Stem and extension become part of one filename
fn validate_file_part(
    field: &'static str,
    setting: Option<&Setting<String>>,
) -> Result<(), ValidationError> {
    validate_not_empty(field, setting)?;

    if let Some(value) = literal(setting) {
        if value.contains(['/', '\\']) {
            return Err(ValidationError::PathSeparator {
                field,
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_templates(layer: &ConfigLayer) -> Result<(), ValidationError> {
    let Some(templates) = layer.templates.as_ref().and_then(Setting::as_literal) else {
        return Ok(());
    };

    for (index, template) in templates.iter().enumerate() {
        if matches!(literal(Some(&template.filename)), Some(name) if name.trim().is_empty()) {
            return Err(ValidationError::EmptyTemplateFilename { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::layer::{SourceLayer, TemplateSpec};

    fn text(value: &str) -> Option<Setting<String>> {
        Some(Setting::Literal(value.to_string()))
    }

    #[test]
    fn test_empty_layer_is_valid() {
        assert!(validate(&ConfigLayer::default()).is_ok());
    }

    #[test]
    fn test_extension_with_separator() {
        let layer = ConfigLayer {
            source: SourceLayer {
                extension: text("d/cpp"),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate(&layer),
            Err(ValidationError::PathSeparator {
                field: "source.extension",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_stem() {
        let layer = ConfigLayer {
            source: SourceLayer {
                stem: text(""),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate(&layer),
            Err(ValidationError::Empty {
                field: "source.stem"
            })
        ));
    }

    #[test]
    fn test_computed_leaves_are_not_checked() {
        let layer = ConfigLayer {
            source: SourceLayer {
                stem: Some(Setting::from_text("{{problem.id}}").unwrap()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate(&layer).is_ok());
    }

    #[test]
    fn test_empty_template_filename() {
        let layer = ConfigLayer {
            templates: Some(Setting::Literal(vec![
                TemplateSpec {
                    filename: Setting::Literal("ok.txt".to_string()),
                    content: Setting::Literal(String::new()),
                },
                TemplateSpec {
                    filename: Setting::Literal(" ".to_string()),
                    content: Setting::Literal(String::new()),
                },
            ])),
            ..Default::default()
        };
        assert!(matches!(
            validate(&layer),
            Err(ValidationError::EmptyTemplateFilename { index: 1 })
        ));
    }
}
