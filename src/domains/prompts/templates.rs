//! Prompt templates module.
//!
//! Minimal `{{variable}}` substitution for the fixed natural-language
//! phrasings the server sends to the translator on its own behalf.

use std::collections::HashMap;

use super::error::PromptError;

/// A template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the template.
    pub name: &'static str,

    /// Arguments that must be supplied to render.
    pub required: &'static [&'static str],

    /// The template string with `{{variable}}` placeholders.
    pub template: &'static str,
}

impl PromptTemplate {
    pub const fn new(
        name: &'static str,
        required: &'static [&'static str],
        template: &'static str,
    ) -> Self {
        Self {
            name,
            required,
            template,
        }
    }

    /// Render the template with the given arguments.
    ///
    /// Every required argument must be present and non-blank; placeholders
    /// without a matching argument are removed.
    pub fn render(&self, arguments: &HashMap<&str, &str>) -> Result<String, PromptError> {
        for name in self.required {
            match arguments.get(name) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(PromptError::missing_argument(self.name, *name)),
            }
        }

        let mut result = self.template.to_string();
        for (key, value) in arguments {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value.trim());
        }

        Ok(clean_unmatched_placeholders(&result))
    }
}

/// Remove any placeholder left without a value.
fn clean_unmatched_placeholders(template: &str) -> String {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(pos) = result[start..].find("{{") {
        let abs_pos = start + pos;
        match result[abs_pos..].find("}}") {
            Some(end_pos) => {
                let end_abs = abs_pos + end_pos + 2;
                result = format!("{}{}", &result[..abs_pos], &result[end_abs..]);
            }
            None => break,
        }
        start = abs_pos;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: PromptTemplate = PromptTemplate::new("greeting", &["name"], "Hello, {{name}}!");

    #[test]
    fn test_simple_substitution() {
        let args = HashMap::from([("name", "World")]);
        assert_eq!(GREETING.render(&args).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_missing_required_argument() {
        let err = GREETING.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, PromptError::MissingArgument { .. }));
    }

    #[test]
    fn test_blank_required_argument() {
        let args = HashMap::from([("name", "  ")]);
        assert!(GREETING.render(&args).is_err());
    }

    #[test]
    fn test_unmatched_placeholders_are_removed() {
        let template = PromptTemplate::new("t", &[], "a{{x}}b{{y}}c");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "abc");
    }
}
