//! Process environment snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Environment variables captured at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSnapshot {
    pub name: String,
    pub variables: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new(variables: BTreeMap<String, String>) -> Self {
        Self {
            name: "env".to_string(),
            variables,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
