//! Two-level open-addressing translation table
//!
//! The outer table maps an original string to an entry; each entry holds
//! its own table mapping a context string ("" for the default context) to
//! the translation record. Both levels use FNV-1a home slots and linear
//! probing with wraparound. Capacities are fixed at build time to a prime
//! strictly greater than the number of keys, and nothing is ever removed,
//! so every search ends at the wanted key or at an empty slot.

use crate::source::{parse_source, SourceEntry};
use nasr_core::hash::{slot_for, table_capacity};
use nasr_core::{NasrError, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct ContextSlot {
    context: String,
    translation: Option<String>,
    plural: Option<String>,
}

#[derive(Debug, Clone)]
struct EntrySlot {
    original: String,
    contexts: Vec<Option<ContextSlot>>,
}

/// Original string -> context -> translation lookup built once from a resource
#[derive(Debug, Clone)]
pub struct TranslationTable {
    entries: Vec<Option<EntrySlot>>,
    len: usize,
}

/// Index of the slot holding `key`, or of the empty slot where it would go
fn find_slot<T>(slots: &[Option<T>], key: &str, key_of: impl Fn(&T) -> &str) -> Option<usize> {
    let capacity = slots.len();
    if capacity == 0 {
        return None;
    }
    let home = slot_for(key, capacity);
    (0..capacity)
        .map(|step| (home + step) % capacity)
        .find(|&i| match &slots[i] {
            None => true,
            Some(slot) => key_of(slot) == key,
        })
}

impl TranslationTable {
    /// Build the table from parsed entries.
    ///
    /// A later entry with the same original and context replaces an
    /// earlier one.
    pub fn build(source: &[SourceEntry]) -> Result<Self> {
        let mut contexts_by_original: HashMap<&str, HashSet<&str>> = HashMap::new();
        for entry in source {
            contexts_by_original
                .entry(entry.original.as_str())
                .or_default()
                .insert(entry.context_key());
        }

        let len = contexts_by_original.len();
        let mut entries: Vec<Option<EntrySlot>> = vec![None; table_capacity(len)];

        for (index, entry) in source.iter().enumerate() {
            let i = find_slot(&entries, &entry.original, |e| &e.original)
                .ok_or_else(|| NasrError::malformed("original", Some(index), "translation table is full"))?;

            let slot = entries[i].get_or_insert_with(|| {
                let context_count = contexts_by_original
                    .get(entry.original.as_str())
                    .map_or(1, HashSet::len);
                EntrySlot {
                    original: entry.original.clone(),
                    contexts: vec![None; table_capacity(context_count)],
                }
            });

            let context = entry.context_key();
            let j = find_slot(&slot.contexts, context, |c| &c.context)
                .ok_or_else(|| NasrError::malformed("context", Some(index), "context table is full"))?;

            slot.contexts[j] = Some(ContextSlot {
                context: context.to_string(),
                translation: entry.translation.clone(),
                plural: entry.translation_plural.clone(),
            });
        }

        Ok(Self { entries, len })
    }

    /// Parse a JSON resource and build the table from it
    pub fn from_json(json: &str) -> Result<Self> {
        let source = parse_source(json)?;
        Self::build(&source)
    }

    /// Translation of `original` in `context`, or `original` itself when
    /// nothing is recorded
    pub fn lookup<'a>(&'a self, original: &'a str, context: &str) -> &'a str {
        self.find(original, context)
            .and_then(|c| c.translation.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(original)
    }

    /// Singular translation when `count == 1`, plural otherwise; falls back
    /// to `singular` / `plural` by the same rule
    pub fn lookup_plural<'a>(
        &'a self,
        singular: &'a str,
        plural: &'a str,
        count: u64,
        context: &str,
    ) -> &'a str {
        let found = self.find(singular, context);
        let (translated, fallback) = if count == 1 {
            (found.and_then(|c| c.translation.as_deref()), singular)
        } else {
            (found.and_then(|c| c.plural.as_deref()), plural)
        };
        translated.filter(|t| !t.is_empty()).unwrap_or(fallback)
    }

    /// Whether `original` has a record in `context`
    pub fn contains(&self, original: &str, context: &str) -> bool {
        self.find(original, context).is_some()
    }

    /// Number of distinct original strings
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the outer table
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn find(&self, original: &str, context: &str) -> Option<&ContextSlot> {
        let i = find_slot(&self.entries, original, |e| &e.original)?;
        let entry = self.entries[i].as_ref()?;
        let j = find_slot(&entry.contexts, context, |c| &c.context)?;
        entry.contexts[j].as_ref()
    }
}
