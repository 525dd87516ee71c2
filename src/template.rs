//! Handlebars templates for string-valued settings
//!
//! A config string containing `{{` is compiled once into a [`Template`] and
//! rendered against the problem/contest scope whenever the setting is read.
//! Output is never HTML-escaped, and `lower`/`upper` helpers are available:
//!
//! ```text
//! stem = "{{lower problem.id}}"
//! compile_command = "g++ -O2 -o a.out {{source}}"
//! ```

use handlebars::{Handlebars, handlebars_helper, no_escape};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

const TEMPLATE_NAME: &str = "main";

handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(upper: |s: str| s.to_uppercase());

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template '{text}': {error}")]
    Compile {
        text: String,
        #[source]
        error: handlebars::TemplateError,
    },

    #[error("Failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// A compiled template, cheap to clone
#[derive(Clone)]
pub struct Template {
    text: Arc<str>,
    engine: Arc<Handlebars<'static>>,
}

impl Template {
    pub fn compile(text: &str) -> Result<Self, TemplateError> {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(no_escape);
        engine.register_helper("lower", Box::new(lower));
        engine.register_helper("upper", Box::new(upper));
        engine
            .register_template_string(TEMPLATE_NAME, text)
            .map_err(|error| TemplateError::Compile {
                text: text.to_string(),
                error,
            })?;

        Ok(Self {
            text: Arc::from(text),
            engine: Arc::new(engine),
        })
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        Ok(self.engine.render(TEMPLATE_NAME, data)?)
    }

    /// Whether a config string should be treated as a template
    pub fn is_template(text: &str) -> bool {
        text.contains("{{")
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Template").field(&self.text).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_with_helpers() {
        let template = Template::compile("{{lower problem.id}}-{{upper contest.id}}").unwrap();
        let rendered = template
            .render(&json!({"problem": {"id": "A"}, "contest": {"id": "abc100"}}))
            .unwrap();
        assert_eq!(rendered, "a-ABC100");
    }

    #[test]
    fn test_output_is_not_escaped() {
        let template = Template::compile("{{source}} && echo '<done>'").unwrap();
        let rendered = template.render(&json!({"source": "a&b.cpp"})).unwrap();
        assert_eq!(rendered, "a&b.cpp && echo '<done>'");
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let template = Template::compile("[{{problem.title}}]").unwrap();
        assert_eq!(template.render(&json!({})).unwrap(), "[]");
    }

    #[test]
    fn test_invalid_template() {
        let err = Template::compile("{{#if}}").unwrap_err();
        assert!(matches!(err, TemplateError::Compile { .. }));
        assert!(err.to_string().contains("{{#if}}"));
    }

    #[test]
    fn test_is_template() {
        assert!(Template::is_template("{{problem.id}}"));
        assert!(!Template::is_template("cpp"));
    }
}
