//! Console runtime for turn-based games.
//!
//! States and commands move a player between screens, a command registry
//! resolves typed input by localized name, alias or prefix, and every piece of
//! text comes from JSON localization documents with per-language fallback.

pub mod app;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod games;
pub mod i18n;
pub mod input;
pub mod navigation;
pub mod random;
pub mod runtime;
pub mod scope;
pub mod session;
pub mod text;
