//! Host-facing translation service
//!
//! A `Localizer` owns at most one [`TranslationTable`]. Loading a new
//! language replaces it only when the resource was read and built
//! successfully; on failure the previous language stays in effect.
//!
//! Every translate call takes a `domain` argument. Domains are accepted for
//! API compatibility but not consulted: all lookups go to the single loaded
//! table.

use crate::table::TranslationTable;
use nasr_core::{NasrError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Localizer {
    table: Option<TranslationTable>,
    source_path: Option<PathBuf>,
}

impl Localizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON translation resource from disk
    pub fn set_language<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NasrError::ResourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let table = TranslationTable::from_json(&content)?;

        log::info!(
            "Loaded {} translations from {}",
            table.len(),
            path.display()
        );
        self.table = Some(table);
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Load a JSON translation resource from memory
    pub fn set_language_str(&mut self, json: &str) -> Result<()> {
        let table = TranslationTable::from_json(json)?;
        log::info!("Loaded {} translations", table.len());
        self.table = Some(table);
        self.source_path = None;
        Ok(())
    }

    /// Drop the loaded language; lookups echo their input afterwards
    pub fn clear(&mut self) {
        self.table = None;
        self.source_path = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Path of the resource the current language came from, if any
    pub fn language_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn table(&self) -> Option<&TranslationTable> {
        self.table.as_ref()
    }

    pub fn translate<'a>(&'a self, s: &'a str, domain: Option<&str>) -> &'a str {
        self.translate_with_context(s, "", domain)
    }

    pub fn translate_with_context<'a>(
        &'a self,
        s: &'a str,
        context: &str,
        _domain: Option<&str>,
    ) -> &'a str {
        match &self.table {
            Some(table) => table.lookup(s, context),
            None => s,
        }
    }

    pub fn translate_plural<'a>(
        &'a self,
        singular: &'a str,
        plural: &'a str,
        count: u64,
        _domain: Option<&str>,
    ) -> &'a str {
        match &self.table {
            Some(table) => table.lookup_plural(singular, plural, count, ""),
            None if count == 1 => singular,
            None => plural,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPANISH: &str = r#"{
        "localization": [
            { "original": "hi", "translation": "hola" },
            { "original": "file", "translation": "archivo", "translationPlural": "archivos" },
            { "original": "Open", "context": "menu", "translation": "Abrir" }
        ]
    }"#;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nasr_locale_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_unloaded_echoes_input() {
        let l = Localizer::new();
        assert!(!l.is_loaded());
        assert_eq!(l.translate("hi", None), "hi");
        assert_eq!(l.translate_with_context("Open", "menu", None), "Open");
        assert_eq!(l.translate_plural("file", "files", 1, None), "file");
        assert_eq!(l.translate_plural("file", "files", 4, None), "files");
    }

    #[test]
    fn test_translate_from_memory() {
        let mut l = Localizer::new();
        l.set_language_str(SPANISH).unwrap();
        assert_eq!(l.translate("hi", None), "hola");
        assert_eq!(l.translate("bye", None), "bye");
        assert_eq!(l.translate_with_context("Open", "menu", None), "Abrir");
        assert_eq!(l.translate("Open", None), "Open");
        assert_eq!(l.translate_plural("file", "files", 1, None), "archivo");
        assert_eq!(l.translate_plural("file", "files", 2, None), "archivos");
    }

    #[test]
    fn test_domain_is_ignored() {
        let mut l = Localizer::new();
        l.set_language_str(SPANISH).unwrap();
        assert_eq!(l.translate("hi", Some("errors")), l.translate("hi", None));
    }

    #[test]
    fn test_set_language_from_file() {
        let dir = temp_dir();
        let path = dir.join("es.json");
        std::fs::write(&path, SPANISH).unwrap();

        let mut l = Localizer::new();
        l.set_language(&path).unwrap();
        assert_eq!(l.language_path(), Some(path.as_path()));
        assert_eq!(l.translate("hi", None), "hola");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unreadable_resource_keeps_previous_language() {
        let mut l = Localizer::new();
        l.set_language_str(SPANISH).unwrap();

        let err = l.set_language(temp_dir().join("missing.json")).unwrap_err();
        assert!(matches!(err, NasrError::ResourceUnreadable { .. }));
        assert_eq!(l.translate("hi", None), "hola");
    }

    #[test]
    fn test_malformed_resource_keeps_previous_language() {
        let mut l = Localizer::new();
        l.set_language_str(SPANISH).unwrap();

        let err = l
            .set_language_str(r#"{ "localization": [ { "original": 1 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, NasrError::MalformedResource { .. }));
        assert_eq!(l.translate("hi", None), "hola");
    }

    #[test]
    fn test_clear() {
        let mut l = Localizer::new();
        l.set_language_str(SPANISH).unwrap();
        l.clear();
        assert!(!l.is_loaded());
        assert_eq!(l.translate("hi", None), "hi");
    }
}
