//! Explicit rule registry and configuration presets.
//!
//! The integrator builds a [`RuleRegistry`] once at startup; nothing in the
//! crate keeps a global table of rules.

use crate::config::Severity;
use crate::rule::{conditional, JsxConditional, OptionsError, Rule, RuleMeta};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Builds a configured rule from its positional options.
pub type RuleFactory = fn(&[Value]) -> Result<Box<dyn Rule>, OptionsError>;

#[derive(Clone, Copy)]
pub struct RuleEntry {
    pub meta: &'static RuleMeta,
    pub factory: RuleFactory,
}

#[derive(Clone, Default)]
pub struct RuleRegistry {
    entries: BTreeMap<&'static str, RuleEntry>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every rule shipped with this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(&conditional::META, create_conditional);
        registry
    }

    pub fn register(&mut self, meta: &'static RuleMeta, factory: RuleFactory) {
        self.entries.insert(meta.name, RuleEntry { meta, factory });
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate `name` with `options`. `None` when the rule is unknown.
    pub fn create(
        &self,
        name: &str,
        options: &[Value],
    ) -> Option<Result<Box<dyn Rule>, OptionsError>> {
        self.get(name).map(|entry| (entry.factory)(options))
    }
}

fn create_conditional(values: &[Value]) -> Result<Box<dyn Rule>, OptionsError> {
    Ok(Box::new(JsxConditional::from_values(values)?))
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Named rule sets a configuration can extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// `jsx-conditional` at error severity, preferring ternaries.
    Recommended,
    /// Every registered rule at error severity with default options.
    All,
}

impl Preset {
    pub const NAMES: [&'static str; 2] = ["recommended", "all"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Preset::Recommended),
            "all" => Some(Preset::All),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Recommended => "recommended",
            Preset::All => "all",
        }
    }

    /// Rule names and severities this preset enables.
    pub fn rules(&self, registry: &RuleRegistry) -> Vec<(&'static str, Severity)> {
        match self {
            Preset::Recommended => vec![(conditional::NAME, Severity::Error)],
            Preset::All => registry
                .names()
                .map(|name| (name, Severity::Error))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_registers_conditional_rule() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["jsx-conditional"]);

        let entry = registry.get("jsx-conditional").unwrap();
        assert_eq!(entry.meta.name, "jsx-conditional");
    }

    #[test]
    fn create_validates_options() {
        let registry = RuleRegistry::builtin();
        assert!(matches!(
            registry.create("jsx-conditional", &[json!("prefer-and-operator")]),
            Some(Ok(_))
        ));
        assert!(matches!(
            registry.create("jsx-conditional", &[json!("nope")]),
            Some(Err(OptionsError::InvalidPreference { .. }))
        ));
        assert!(registry.create("jsx-no-such-rule", &[]).is_none());
    }

    #[test]
    fn presets() {
        let registry = RuleRegistry::builtin();
        assert_eq!(
            Preset::Recommended.rules(&registry),
            vec![("jsx-conditional", Severity::Error)]
        );
        assert_eq!(Preset::All.rules(&registry).len(), registry.len());
        assert_eq!(Preset::parse("all"), Some(Preset::All));
        assert_eq!(Preset::parse("strict"), None);
    }
}
