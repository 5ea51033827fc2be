//! Completeness validation for localization documents.
//!
//! Every translation payload implements [`Validate`], walking its entries and
//! recording each language value that the document's metadata promises but
//! the entry does not provide.

use crate::error::AppError;
use crate::i18n::{LangMap, Language};

/// Problems found while validating one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Document the report describes (used in error paths)
    source: String,

    /// Missing values; fatal for core documents
    pub errors: Vec<AppError>,

    /// Non-critical findings, logged and otherwise ignored
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record every language in `languages` that `values` lacks.
    pub fn require_all<T>(&mut self, key: &str, values: &LangMap<T>, languages: &[Language]) {
        for language in languages {
            if !values.contains_key(language.code()) {
                self.errors.push(AppError::MissingTranslation {
                    path: self.source.clone(),
                    key: key.to_string(),
                    lang: language.code().to_string(),
                });
            }
        }
    }

    /// Like [`require_all`](Self::require_all), but an entirely absent field passes.
    pub fn require_if_present<T>(
        &mut self,
        key: &str,
        values: &LangMap<T>,
        languages: &[Language],
    ) {
        if !values.is_empty() {
            self.require_all(key, values, languages);
        }
    }

    /// Record a non-critical finding.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Collapse the recorded errors into one (composite) error.
    pub fn take_error(&mut self) -> Option<AppError> {
        AppError::from_list(std::mem::take(&mut self.errors))
    }
}

/// A translation payload that can check itself for missing language values.
pub trait Validate {
    /// Structural checks that fail the load regardless of namespace.
    fn check_structure(&self, _source: &str) -> Result<(), AppError> {
        Ok(())
    }

    fn validate(&self, languages: &[Language], report: &mut ValidationReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<Language> {
        codes
            .iter()
            .map(|code| Language::from_code(code).unwrap())
            .collect()
    }

    fn map(pairs: &[(&str, &str)]) -> LangMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_new_report_is_clean() {
        let report = ValidationReport::new("doc.json");
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_require_all_records_each_missing_language() {
        let mut report = ValidationReport::new("doc.json");
        report.require_all("greeting", &map(&[("en", "Hi")]), &langs(&["en", "ru", "de"]));

        assert_eq!(report.errors.len(), 2);
        assert_eq!(
            report.errors[0],
            AppError::MissingTranslation {
                path: "doc.json".into(),
                key: "greeting".into(),
                lang: "ru".into(),
            }
        );
    }

    #[test]
    fn test_require_if_present_skips_empty_field() {
        let mut report = ValidationReport::new("doc.json");
        report.require_if_present("description", &LangMap::<String>::new(), &langs(&["en"]));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_require_if_present_checks_partial_field() {
        let mut report = ValidationReport::new("doc.json");
        report.require_if_present("description", &map(&[("ru", "x")]), &langs(&["en", "ru"]));
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut report = ValidationReport::new("doc.json");
        report.warn("dropped unknown language 'xx'");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.errors.is_empty());
        assert_eq!(report.take_error(), None);
    }

    #[test]
    fn test_take_error_builds_composite() {
        let mut report = ValidationReport::new("doc.json");
        report.require_all("a", &LangMap::<String>::new(), &langs(&["en", "ru"]));

        let error = report.take_error().unwrap();
        assert!(matches!(error, AppError::Multiple(ref list) if list.len() == 2));
        assert!(report.errors.is_empty());
    }
}
