// src/config/variables.rs

//! Variable space used to resolve `${NAME}` / `%%NAME%%` placeholders in job
//! fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}|%%([^%]+)%%").expect("placeholder regex is valid")
});

/// Job variables layered over the inherited process environment.
///
/// Explicitly set variables win over inherited ones and are the ones
/// exported to the submitter (the inherited environment reaches it anyway).
#[derive(Debug, Clone, Default)]
pub struct VariableSpace {
    inherited: BTreeMap<String, String>,
    variables: BTreeMap<String, String>,
}

impl VariableSpace {
    /// Empty space, nothing inherited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Space inheriting the current process environment.
    pub fn from_env() -> Self {
        Self {
            inherited: std::env::vars().collect(),
            variables: BTreeMap::new(),
        }
    }

    pub fn with_variables<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.set(k, v);
        }
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .or_else(|| self.inherited.get(name))
            .map(String::as_str)
    }

    /// Variables to export into the child environment.
    pub fn exported(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Replace every known placeholder in `input`. Unknown names are left
    /// as written.
    pub fn substitute(&self, input: &str) -> String {
        if !input.contains("${") && !input.contains("%%") {
            return input.to_string();
        }

        PLACEHOLDER
            .replace_all(input, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match self.get(name) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
