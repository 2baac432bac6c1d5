//! Alternate-name lookup table.
//!
//! Maps the field names a model actually emits (Chinese labels,
//! snake_case variants, synonyms) to the canonical camelCase keys the
//! domain types deserialize from.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rapidfuzz::distance::jaro_winkler;
use tracing::debug;

/// Lookup table from alternate field names to canonical ones.
///
/// Stored as canonical name to alternates; an inverted index serves
/// exact lookups. Iteration order is alphabetical on the canonical
/// name, so fuzzy scans and rendered listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    canonical: BTreeMap<String, Vec<String>>,
    by_alternate: BTreeMap<String, String>,
}

impl FieldTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a canonical-to-alternates map, such as one
    /// decoded from a mappings file.
    #[must_use]
    pub fn from_alternates(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (canonical, alternates) in map {
            table.add_mapping(canonical, alternates);
        }
        table
    }

    /// Decode a table from JSON text of the form
    /// `{"canonical": ["alternate", ...], ...}`.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a map of string lists.
    pub fn from_json(text: &str) -> Result<Self> {
        let map: BTreeMap<String, Vec<String>> =
            serde_json::from_str(text).context("mappings must be a map of alternate-name lists")?;
        Ok(Self::from_alternates(map))
    }

    /// Load a table from a JSON mappings file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or decoded.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read mappings from {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse mappings from {}", path.display()))
    }

    /// Register alternates for a canonical field name.
    ///
    /// Empty names and self-mappings are ignored. An alternate that
    /// collides with a registered canonical name is ignored; an
    /// alternate already mapped elsewhere is re-pointed (last write
    /// wins).
    pub fn add_mapping<I, S>(&mut self, canonical: impl Into<String>, alternates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let canonical = canonical.into().trim().to_string();
        if canonical.is_empty() {
            return;
        }
        self.canonical.entry(canonical.clone()).or_default();
        for alternate in alternates {
            let alternate = alternate.into().trim().to_string();
            if alternate.is_empty() || alternate == canonical {
                continue;
            }
            if self.canonical.contains_key(&alternate) {
                debug!(name = %alternate, "alternate collides with a canonical name, ignored");
                continue;
            }
            if let Some(previous) = self
                .by_alternate
                .insert(alternate.clone(), canonical.clone())
                && previous != canonical
            {
                debug!(
                    alternate = %alternate,
                    from = %previous,
                    to = %canonical,
                    "alternate re-pointed"
                );
                if let Some(list) = self.canonical.get_mut(&previous) {
                    list.retain(|name| name != &alternate);
                }
            }
            if let Some(entry) = self.canonical.get_mut(&canonical)
                && !entry.contains(&alternate)
            {
                entry.push(alternate);
            }
        }
    }

    /// Exact lookup: the canonical name for `key`, or `key` itself when
    /// it already is one.
    #[must_use]
    pub fn canonical_for(&self, key: &str) -> Option<&str> {
        if let Some((stored, _)) = self.canonical.get_key_value(key) {
            return Some(stored.as_str());
        }
        self.by_alternate.get(key).map(String::as_str)
    }

    /// Whether `key` is a registered canonical name.
    #[must_use]
    pub fn is_canonical(&self, key: &str) -> bool {
        self.canonical.contains_key(key)
    }

    /// Best fuzzy match for `key` over canonical names and alternates.
    ///
    /// Names are normalized (trimmed, lowercased, separators collapsed
    /// to spaces) before Jaro-Winkler comparison. Returns the canonical
    /// name and its similarity when it reaches `threshold`; ties keep
    /// the alphabetically first canonical name.
    #[must_use]
    pub fn fuzzy_canonical_for(&self, key: &str, threshold: f64) -> Option<(&str, f64)> {
        let needle = normalize(key);
        if needle.is_empty() {
            return None;
        }
        let mut best: Option<(&str, f64)> = None;
        for (canonical, alternates) in &self.canonical {
            let mut similarity =
                jaro_winkler::similarity(normalize(canonical).chars(), needle.chars());
            for alternate in alternates {
                let alt =
                    jaro_winkler::similarity(normalize(alternate).chars(), needle.chars());
                if alt > similarity {
                    similarity = alt;
                }
            }
            if similarity >= threshold && best.is_none_or(|(_, score)| similarity > score) {
                best = Some((canonical.as_str(), similarity));
            }
        }
        best
    }

    /// Alternates registered for a canonical name.
    #[must_use]
    pub fn alternates(&self, canonical: &str) -> Option<&[String]> {
        self.canonical.get(canonical).map(Vec::as_slice)
    }

    /// All mappings, keyed by canonical name.
    #[must_use]
    pub fn all_mappings(&self) -> &BTreeMap<String, Vec<String>> {
        &self.canonical
    }

    /// Number of canonical names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Drop every mapping.
    pub fn clear(&mut self) {
        self.canonical.clear();
        self.by_alternate.clear();
    }
}

/// Normalize a name for fuzzy comparison.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldTable {
        let mut table = FieldTable::new();
        table.add_mapping("isSafe", ["安全", "is_safe"]);
        table.add_mapping("riskLevel", ["风险等级", "risk_level"]);
        table
    }

    #[test]
    fn exact_lookup_covers_alternates_and_canonicals() {
        let table = sample();
        assert_eq!(table.canonical_for("安全"), Some("isSafe"));
        assert_eq!(table.canonical_for("risk_level"), Some("riskLevel"));
        assert_eq!(table.canonical_for("isSafe"), Some("isSafe"));
        assert_eq!(table.canonical_for("unknown"), None);
    }

    #[test]
    fn self_mapping_and_canonical_collisions_are_ignored() {
        let mut table = sample();
        table.add_mapping("isSafe", ["isSafe", "riskLevel"]);
        assert_eq!(table.canonical_for("riskLevel"), Some("riskLevel"));
        assert_eq!(
            table.alternates("isSafe"),
            Some(["安全".to_string(), "is_safe".to_string()].as_slice())
        );
    }

    #[test]
    fn conflicting_alternate_is_repointed() {
        let mut table = sample();
        table.add_mapping("suggestion", ["安全"]);
        assert_eq!(table.canonical_for("安全"), Some("suggestion"));
        assert!(table.alternates("isSafe").is_some_and(|a| !a.contains(&"安全".to_string())));
    }

    #[test]
    fn fuzzy_lookup_respects_threshold() {
        let table = sample();
        let hit = table.fuzzy_canonical_for("is safe", 0.8);
        assert!(matches!(hit, Some(("isSafe", score)) if score >= 0.8));
        assert_eq!(table.fuzzy_canonical_for("毫不相关", 0.8), None);
    }

    #[test]
    fn from_json_builds_the_same_table() {
        let table = FieldTable::from_json(r#"{"isSafe": ["安全"], "suggestion": ["建议"]}"#)
            .expect("valid mappings json");
        assert_eq!(table.canonical_for("建议"), Some("suggestion"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn clear_empties_both_directions() {
        let mut table = sample();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.canonical_for("安全"), None);
    }
}
