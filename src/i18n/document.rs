//! JSON envelope shared by every localization document.
//!
//! ```json
//! {
//!   "meta": { "supported_languages": ["en", "ru"] },
//!   "translations": { ... }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// Language code → value.
pub type LangMap<T = String> = BTreeMap<String, T>;

/// Document metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    /// Language codes every entry of the document must provide
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

/// A localization document with a typed translations payload.
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    pub meta: Metadata,
    pub translations: T,
}

/// Validation tier of a document.
///
/// Core documents are the framework's own strings: any gap is a hard failure
/// and their languages feed the selectable language list. Overlay documents
/// (app and game trees) are validated permissively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Core,
    Overlay,
}
