//! Document-scoped style variables.
//!
//! A document carries a small table of named variables that styles can
//! reference. Names are interned to dense ids on first use; values are
//! plain strings. The table tracks which entries changed since the last
//! reset so a render-side clone of the document can be brought up to
//! date without copying the whole table.

use std::collections::HashMap;

/// Interned style-variable storage with modification tracking.
///
/// Ids are 1-based; 0 is never a valid variable id. Once interned, a
/// name keeps its id for the lifetime of the table, which is what makes
/// the incremental clone correct: both tables agree on ids for every
/// shared prefix of the interning order.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    ids: HashMap<String, usize>,
    names: Vec<String>,
    values: Vec<String>,
    modified: Vec<bool>,
}

impl VariableTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> VariableTable {
        VariableTable::default()
    }

    /// Number of interned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no variable has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a variable, interning its name on first use. An empty name
    /// is ignored.
    pub fn set(&mut self, var: &str, value: &str) {
        if var.is_empty() {
            return;
        }
        let id = self.get_or_create_id(var);
        self.values[id - 1] = value.to_string();
        self.modified[id - 1] = true;
    }

    /// Look up a variable's value.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&str> {
        let id = *self.ids.get(var)?;
        Some(self.values[id - 1].as_str())
    }

    /// Bring this table up to date with `src`, copying only entries
    /// that are new or marked modified in `src`.
    ///
    /// Both tables must share their interning history (this one must be
    /// a clone of an earlier state of `src`); ids then line up and the
    /// copy is O(changed + new).
    pub fn clone_from_incremental(&mut self, src: &VariableTable) {
        // Intern names that appeared since our last sync, in src's order
        // so the id assignment stays aligned.
        let org_size = self.values.len();
        for i in org_size..src.names.len() {
            let id = self.get_or_create_id(&src.names[i]);
            debug_assert_eq!(id, self.values.len());
        }

        // Copy new values.
        for i in org_size..src.values.len() {
            self.values[i].clone_from(&src.values[i]);
        }

        // Copy changed values.
        for i in 0..org_size {
            if src.modified[i] {
                self.values[i].clone_from(&src.values[i]);
            }
        }

        // Modified bits are cleared by the owner via reset_modified().
    }

    /// Clear all modification marks, typically after a sync.
    pub fn reset_modified(&mut self) {
        self.modified.fill(false);
    }

    fn get_or_create_id(&mut self, var: &str) -> usize {
        if let Some(&id) = self.ids.get(var) {
            return id;
        }
        self.names.push(var.to_string());
        self.values.push(String::new());
        self.modified.push(true);
        let id = self.values.len();
        let _ = self.ids.insert(var.to_string(), id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let mut vars = VariableTable::new();
        vars.set("accent", "#ff0000");
        assert_eq!(vars.get("accent"), Some("#ff0000"));
        assert_eq!(vars.get("missing"), None);
    }

    #[test]
    fn empty_name_is_ignored() {
        let mut vars = VariableTable::new();
        vars.set("", "value");
        assert!(vars.is_empty());
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let mut vars = VariableTable::new();
        vars.set("pad", "4px");
        vars.set("pad", "8px");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("pad"), Some("8px"));
    }

    #[test]
    fn incremental_clone_copies_new_and_changed() {
        let mut src = VariableTable::new();
        src.set("a", "1");
        src.set("b", "2");

        let mut dst = src.clone();
        dst.reset_modified();
        src.reset_modified();

        // One changed entry, one new entry.
        src.set("a", "10");
        src.set("c", "3");

        dst.clone_from_incremental(&src);
        assert_eq!(dst.get("a"), Some("10"));
        assert_eq!(dst.get("b"), Some("2"));
        assert_eq!(dst.get("c"), Some("3"));
        assert_eq!(dst.len(), 3);
    }

    #[test]
    fn unchanged_entries_are_not_touched() {
        let mut src = VariableTable::new();
        src.set("a", "1");
        let mut dst = src.clone();
        src.reset_modified();
        dst.reset_modified();

        // Local divergence in dst survives a sync that did not modify "a".
        dst.values[0] = "local".to_string();
        dst.clone_from_incremental(&src);
        assert_eq!(dst.get("a"), Some("local"));
    }
}
