//! Template-based message resolution
//!
//! Real string tables belong to the UI layer. This resolver ships English
//! defaults and substitutes `{arg}` placeholders, which is enough for the CLI
//! and for tests.

use super::traits::Localizer;
use crate::session::effects::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TemplateLocalizer {
    templates: HashMap<String, String>,
}

impl TemplateLocalizer {
    /// English defaults
    pub fn new() -> Self {
        let templates = [
            (SHARING_ACCESS_WITH_ONE, "Sharing access with {name}"),
            (
                SHARING_ACCESS_WITH_MANY,
                "Sharing access with {name} and {numOthers} others",
            ),
            (GETTING_ACCESS_FROM, "Getting access from {name}"),
            (STOPPED_ACCESS_TO, "{name} stopped proxying through you"),
            (
                GETTING_STOPPED_UNEXPECTEDLY,
                "Your connection through {name} stopped unexpectedly",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { templates }
    }

    /// Defaults with some templates replaced
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut localizer = Self::new();
        for (key, template) in overrides {
            localizer.templates.insert(key.clone(), template.clone());
        }
        localizer
    }
}

impl Default for TemplateLocalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for TemplateLocalizer {
    fn translate(&self, message: &Message) -> String {
        let Some(template) = self.templates.get(message.key) else {
            return message.key.to_string();
        };
        substitute(template, message)
    }
}

/// Replace each `{arg}` in one pass; inserted values are never rescanned.
/// Placeholders with no matching arg are kept as written.
fn substitute(template: &str, message: &Message) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match message.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_arguments() {
        let localizer = TemplateLocalizer::new();
        let message = Message::new(SHARING_ACCESS_WITH_MANY)
            .arg("name", "Alice")
            .arg("numOthers", "2");
        assert_eq!(
            localizer.translate(&message),
            "Sharing access with Alice and 2 others"
        );
    }

    #[test]
    fn test_placeholder_in_value_is_not_substituted() {
        let localizer = TemplateLocalizer::new();
        let message = Message::new(SHARING_ACCESS_WITH_MANY)
            .arg("name", "A{numOthers}")
            .arg("numOthers", "1");
        assert_eq!(
            localizer.translate(&message),
            "Sharing access with A{numOthers} and 1 others"
        );
    }

    #[test]
    fn test_unmatched_braces_pass_through() {
        let mut overrides = HashMap::new();
        overrides.insert(
            GETTING_ACCESS_FROM.to_string(),
            "{name} ({missing}) {".to_string(),
        );
        let localizer = TemplateLocalizer::with_overrides(&overrides);
        assert_eq!(
            localizer.translate(&Message::new(GETTING_ACCESS_FROM).arg("name", "Bob")),
            "Bob ({missing}) {"
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let localizer = TemplateLocalizer::new();
        assert_eq!(localizer.translate(&Message::new("NOPE")), "NOPE");
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(GETTING_ACCESS_FROM.to_string(), "Via {name}".to_string());
        let localizer = TemplateLocalizer::with_overrides(&overrides);
        assert_eq!(
            localizer.translate(&Message::new(GETTING_ACCESS_FROM).arg("name", "Bob")),
            "Via Bob"
        );
    }
}
