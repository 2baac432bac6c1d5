//! Field-name mapping.
//!
//! Models answer with their own field names: Chinese labels, snake_case
//! variants, synonyms. This crate rewrites those keys to the canonical
//! camelCase names the domain types expect, directly on the cleaned
//! text so a decode retry can pick up the result.

mod builtin;
mod rewrite;
mod table;

pub use builtin::builtin_table;
pub use table::FieldTable;

use std::collections::BTreeMap;

use rapport_model::MappingContext;

/// The field-mapping stage of the parsing pipeline.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    table: FieldTable,
}

impl FieldMapper {
    /// A mapper over a caller-provided table.
    #[must_use]
    pub fn new(table: FieldTable) -> Self {
        Self { table }
    }

    /// A mapper over the built-in alternate-name table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_table())
    }

    /// Rewrite alternate field names in `text` to canonical ones.
    ///
    /// Total and text-preserving: only quoted key spans change, values
    /// and whitespace stay byte for byte. Text without recognizable
    /// keys comes back unchanged.
    #[must_use]
    pub fn map_fields(&self, text: &str, ctx: &MappingContext) -> String {
        rewrite::rewrite_keys(text, &self.table, ctx)
    }

    /// Register extra alternates for a canonical field name.
    pub fn add_mapping<I, S>(&mut self, canonical: impl Into<String>, alternates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table.add_mapping(canonical, alternates);
    }

    /// Drop every registered mapping.
    pub fn clear_mappings(&mut self) {
        self.table.clear();
    }

    /// Every registered mapping, canonical name to alternates.
    #[must_use]
    pub fn all_mappings(&self) -> &BTreeMap<String, Vec<String>> {
        self.table.all_mappings()
    }

    /// The lookup table behind this mapper.
    #[must_use]
    pub fn table(&self) -> &FieldTable {
        &self.table
    }
}

impl Default for FieldMapper {
    /// Defaults to the built-in table.
    fn default() -> Self {
        Self::builtin()
    }
}
