use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

pub const EXCEPT_NOT_NULLISH_ALTERNATES: &str = "exceptNotNullishAlternates";

/// Which conditional-rendering form the rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preference {
    #[default]
    PreferTernary,
    PreferAndOperator,
}

impl Preference {
    pub const VALUES: [&'static str; 2] = ["prefer-ternary", "prefer-and-operator"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::PreferTernary => Self::VALUES[0],
            Preference::PreferAndOperator => Self::VALUES[1],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prefer-ternary" => Some(Preference::PreferTernary),
            "prefer-and-operator" => Some(Preference::PreferAndOperator),
            _ => None,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of the `jsx-conditional` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionalOptions {
    pub preference: Preference,
    /// With `prefer-and-operator`, leave ternaries whose alternate is neither
    /// `null` nor `undefined` untouched.
    pub except_not_nullish_alternates: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("expected at most {max} options, found {found}")]
    TooMany { max: usize, found: usize },

    #[error("option 0 must be one of {allowed:?}, found {found}")]
    InvalidPreference {
        allowed: &'static [&'static str],
        found: String,
    },

    #[error("option {index} must be an object")]
    NotAnObject { index: usize },

    #[error("unknown option '{key}'{}", suggestion_suffix(.suggestion))]
    UnknownKey {
        key: String,
        suggestion: Option<&'static str>,
    },

    #[error("option '{key}' must be a {expected}")]
    InvalidType { key: String, expected: &'static str },
}

fn suggestion_suffix(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(known) => format!(", did you mean '{known}'?"),
        None => String::new(),
    }
}

/// Closest known name to `input`, if any is reasonably close.
pub fn suggest(input: &str, known: &[&'static str]) -> Option<&'static str> {
    known
        .iter()
        .map(|candidate| (*candidate, strsim::jaro_winkler(input, candidate)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}

impl ConditionalOptions {
    /// JSON schema of the positional options array.
    pub fn schema() -> Value {
        json!([
            {
                "enum": Preference::VALUES,
            },
            {
                "type": "object",
                "properties": {
                    EXCEPT_NOT_NULLISH_ALTERNATES: { "type": "boolean" },
                },
                "additionalProperties": false,
            }
        ])
    }

    /// Validate and decode a positional options list.
    ///
    /// Missing entries fall back to their defaults; `null` in position 0 is
    /// treated as absent.
    pub fn from_values(values: &[Value]) -> Result<Self, OptionsError> {
        if values.len() > 2 {
            return Err(OptionsError::TooMany {
                max: 2,
                found: values.len(),
            });
        }

        let mut options = ConditionalOptions::default();

        match values.first() {
            None | Some(Value::Null) => {}
            Some(Value::String(name)) => {
                options.preference =
                    Preference::parse(name).ok_or_else(|| OptionsError::InvalidPreference {
                        allowed: &Preference::VALUES,
                        found: format!("{name:?}"),
                    })?;
            }
            Some(other) => {
                return Err(OptionsError::InvalidPreference {
                    allowed: &Preference::VALUES,
                    found: other.to_string(),
                })
            }
        }

        if let Some(value) = values.get(1) {
            let object = value
                .as_object()
                .ok_or(OptionsError::NotAnObject { index: 1 })?;
            for (key, value) in object {
                if key != EXCEPT_NOT_NULLISH_ALTERNATES {
                    return Err(OptionsError::UnknownKey {
                        key: key.clone(),
                        suggestion: suggest(key, &[EXCEPT_NOT_NULLISH_ALTERNATES]),
                    });
                }
                options.except_not_nullish_alternates =
                    value.as_bool().ok_or_else(|| OptionsError::InvalidType {
                        key: key.clone(),
                        expected: "boolean",
                    })?;
            }
        }

        Ok(options)
    }
}
