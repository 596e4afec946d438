//! Widget settings carried by the container's data attributes.
//!
//! The host framework serializes `{ "h2": true, "h3": true, ... }` into
//! `data-headings` and `"true"`/`"false"` into `data-indent`. Parsing is
//! total: anything malformed degrades to empty settings, which hides the widget.

use super::heading::{HeadingLevel, HeadingLevelSet};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Parsed settings payload of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Heading levels included in the list.
    pub levels: HeadingLevelSet,
    /// Whether list items carry `data-level` for hierarchical indentation.
    pub indentation: bool,
}

/// Failure to read the `data-headings` payload.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Payload is not valid JSON.
    #[error("Settings payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload parsed but is not a JSON object.
    #[error("Settings payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl Default for WidgetSettings {
    /// Block defaults: `h2` and `h3` enabled, indentation on.
    fn default() -> Self {
        Self {
            levels: [HeadingLevel::H2, HeadingLevel::H3].into_iter().collect(),
            indentation: true,
        }
    }
}

impl WidgetSettings {
    /// Settings with no levels enabled.
    pub fn empty() -> Self {
        Self {
            levels: HeadingLevelSet::empty(),
            indentation: false,
        }
    }

    /// Read settings from raw attribute values.
    ///
    /// A missing `data-headings` is treated as `{}`. A malformed payload is
    /// logged and treated as empty. Indentation is enabled only for the exact
    /// string `"true"`.
    pub fn from_attributes(headings: Option<&str>, indent: Option<&str>) -> Self {
        let levels = match parse_levels(headings.unwrap_or("{}")) {
            Ok(levels) => levels,
            Err(err) => {
                warn!(error = %err, "Malformed heading settings; treating as empty");
                HeadingLevelSet::empty()
            }
        };

        Self {
            levels,
            indentation: indent == Some("true"),
        }
    }

    /// Serialize the level flags back into the `data-headings` payload shape.
    pub fn levels_payload(&self) -> String {
        let map: Map<String, Value> = HeadingLevel::ALL
            .into_iter()
            .map(|level| (level.tag().to_string(), Value::Bool(self.levels.contains(level))))
            .collect();
        Value::Object(map).to_string()
    }
}

/// Parse the `data-headings` JSON object into the set of enabled levels.
///
/// Keys that are not `h1`..`h5` are ignored. Values follow JavaScript
/// truthiness, so `1` and `"yes"` enable a level while `0`, `""` and `null` do not.
pub fn parse_levels(payload: &str) -> Result<HeadingLevelSet, SettingsError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(map) = value else {
        return Err(SettingsError::NotAnObject(json_kind(&value)));
    };

    Ok(map
        .iter()
        .filter(|(_, enabled)| is_truthy(enabled))
        .filter_map(|(tag, _)| {
            let level = HeadingLevel::from_tag(tag);
            if level.is_none() {
                debug!(tag = %tag, "Ignoring unsupported heading tag in settings");
            }
            level
        })
        .collect())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_h2_and_h3_with_indentation() {
        let settings = WidgetSettings::default();
        let levels: Vec<_> = settings.levels.iter().collect();
        assert_eq!(levels, vec![HeadingLevel::H2, HeadingLevel::H3]);
        assert!(settings.indentation);
    }

    #[test]
    fn parses_enabled_flags() {
        let levels = parse_levels(r#"{"h1":false,"h2":true,"h3":true,"h4":false,"h5":false}"#)
            .expect("valid payload");
        let levels: Vec<_> = levels.iter().collect();
        assert_eq!(levels, vec![HeadingLevel::H2, HeadingLevel::H3]);
    }

    #[test]
    fn all_false_is_empty() {
        let levels = parse_levels(r#"{"h1":false,"h2":false}"#).expect("valid payload");
        assert!(levels.is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let levels = parse_levels(r#"{"h6":true,"p":true,"h4":true}"#).expect("valid payload");
        let levels: Vec<_> = levels.iter().collect();
        assert_eq!(levels, vec![HeadingLevel::H4]);
    }

    #[test]
    fn truthy_values_enable_levels() {
        let levels = parse_levels(r#"{"h1":1,"h2":"yes","h3":0,"h4":"","h5":null}"#)
            .expect("valid payload");
        let levels: Vec<_> = levels.iter().collect();
        assert_eq!(levels, vec![HeadingLevel::H1, HeadingLevel::H2]);
    }

    #[test]
    fn non_object_payload_is_an_error() {
        let err = parse_levels("[true]").unwrap_err();
        assert!(matches!(err, SettingsError::NotAnObject("array")));
    }

    #[test]
    fn malformed_payload_degrades_to_empty_settings() {
        let settings = WidgetSettings::from_attributes(Some("{h2: true"), Some("true"));
        assert!(settings.levels.is_empty());
        assert!(settings.indentation);
    }

    #[test]
    fn missing_payload_is_empty_settings() {
        let settings = WidgetSettings::from_attributes(None, None);
        assert!(settings.levels.is_empty());
        assert!(!settings.indentation);
    }

    #[test]
    fn indentation_requires_exact_true() {
        let on = WidgetSettings::from_attributes(Some("{}"), Some("true"));
        let off = WidgetSettings::from_attributes(Some("{}"), Some("TRUE"));
        assert!(on.indentation);
        assert!(!off.indentation);
    }

    #[test]
    fn levels_payload_round_trips_through_parser() {
        let settings = WidgetSettings::default();
        let payload = settings.levels_payload();
        assert_eq!(
            payload,
            r#"{"h1":false,"h2":true,"h3":true,"h4":false,"h5":false}"#
        );
        assert_eq!(parse_levels(&payload).expect("valid payload"), settings.levels);
    }
}
