//! Shared fixtures for unit tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::StoredValue;

/// Flat settings document used across the test modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct LauncherSettings {
    pub theme: String,
    pub max_results: u32,
    pub hotkey: Option<String>,
}

impl StoredValue for LauncherSettings {
    const FIELDS: &'static [&'static str] = &["theme", "max_results", "hotkey"];
}

/// Nested document for extraction tests: entries can live in a list or in
/// a map keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PluginDoc {
    pub x: i64,
    pub items: Vec<PluginDoc>,
    pub groups: BTreeMap<String, PluginDoc>,
}

impl StoredValue for PluginDoc {
    const FIELDS: &'static [&'static str] = &["x", "items", "groups"];
}

/// Newtype that serializes as a bare array rather than an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct IdList(pub Vec<u32>);

impl StoredValue for IdList {
    const FIELDS: &'static [&'static str] = &[];
}
