use crate::registry::{Preset, RuleRegistry};
use crate::rule::options::suggest;
use crate::rule::{OptionsError, Rule};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Contents of a `.jsx-conditional.toml` file.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Preset the `rules` table is layered on; `recommended` when absent.
    #[serde(default)]
    pub extends: Option<String>,
    /// Directory names the file walker skips.
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub severity: Severity,
    /// Positional rule options, as in `["prefer-and-operator", { ... }]`.
    #[serde(default)]
    pub options: Vec<Value>,
}

/// How a diagnostic is treated. Accepts `"off" | "warn" | "error"` or
/// `0 | 1 | 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    #[default]
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Level(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Name(name) => match name.as_str() {
                "off" => Ok(Severity::Off),
                "warn" => Ok(Severity::Warn),
                "error" => Ok(Severity::Error),
                other => Err(de::Error::custom(format!(
                    "invalid severity {other:?}, expected \"off\", \"warn\" or \"error\""
                ))),
            },
            Repr::Level(0) => Ok(Severity::Off),
            Repr::Level(1) => Ok(Severity::Warn),
            Repr::Level(2) => Ok(Severity::Error),
            Repr::Level(other) => Err(de::Error::custom(format!(
                "invalid severity {other}, expected 0, 1 or 2"
            ))),
        }
    }
}

/// A rule instance with the severity it reports at.
pub struct ActiveRule {
    pub name: &'static str,
    pub severity: Severity,
    pub rule: Box<dyn Rule>,
}

impl fmt::Debug for ActiveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRule")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl LintConfig {
    pub fn preset(&self) -> Option<Preset> {
        match &self.extends {
            None => Some(Preset::Recommended),
            Some(name) => Preset::parse(name),
        }
    }

    /// Check every setting against `registry` before any file is visited.
    pub fn validate(&self, registry: &RuleRegistry) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.preset().is_none() {
            let name = self.extends.clone().unwrap_or_default();
            issues.push(ValidationIssue::UnknownPreset {
                suggestion: suggest(&name, &Preset::NAMES),
                name,
            });
        }

        let known: Vec<&'static str> = registry.names().collect();
        for (name, settings) in &self.rules {
            match registry.create(name, &settings.options) {
                None => issues.push(ValidationIssue::UnknownRule {
                    name: name.clone(),
                    suggestion: suggest(name, &known),
                }),
                Some(Err(source)) => issues.push(ValidationIssue::InvalidOptions {
                    rule: name.clone(),
                    source,
                }),
                Some(Ok(_)) => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Instantiate the enabled rules: the preset first, then the `rules`
    /// table layered on top. Rules set to `off` are dropped.
    pub fn resolve(&self, registry: &RuleRegistry) -> Result<Vec<ActiveRule>, ValidationError> {
        self.validate(registry)?;

        let defaults: &[Value] = &[];
        let mut settings: BTreeMap<&str, (Severity, &[Value])> = BTreeMap::new();
        if let Some(preset) = self.preset() {
            for (name, severity) in preset.rules(registry) {
                settings.insert(name, (severity, defaults));
            }
        }
        for (name, rule) in &self.rules {
            settings.insert(name.as_str(), (rule.severity, rule.options.as_slice()));
        }

        let mut active = Vec::new();
        let mut issues = Vec::new();
        for (name, (severity, options)) in settings {
            if severity == Severity::Off {
                continue;
            }
            let Some(entry) = registry.get(name) else {
                continue;
            };
            match (entry.factory)(options) {
                Ok(rule) => active.push(ActiveRule {
                    name: entry.meta.name,
                    severity,
                    rule,
                }),
                Err(source) => issues.push(ValidationIssue::InvalidOptions {
                    rule: name.to_string(),
                    source,
                }),
            }
        }

        if issues.is_empty() {
            Ok(active)
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    UnknownPreset {
        name: String,
        suggestion: Option<&'static str>,
    },
    UnknownRule {
        name: String,
        suggestion: Option<&'static str>,
    },
    InvalidOptions {
        rule: String,
        source: OptionsError,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownPreset { name, suggestion } => match suggestion {
                Some(known) => write!(f, "unknown preset '{name}', did you mean '{known}'?"),
                None => write!(
                    f,
                    "unknown preset '{name}' (expected one of: {})",
                    Preset::NAMES.join(", ")
                ),
            },
            ValidationIssue::UnknownRule { name, suggestion } => match suggestion {
                Some(known) => write!(f, "unknown rule '{name}', did you mean '{known}'?"),
                None => write!(f, "unknown rule '{name}'"),
            },
            ValidationIssue::InvalidOptions { rule, source } => {
                write!(f, "rule '{rule}' has invalid options: {source}")
            }
        }
    }
}
