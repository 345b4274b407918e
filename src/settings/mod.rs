//! User preferences: per-workspace branding, interface language and the
//! selected workspace.

mod language;
mod service;

pub use language::{Language, ParseLanguageError};
pub use service::SettingsService;

#[cfg(test)]
mod tests;
