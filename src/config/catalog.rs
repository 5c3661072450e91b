//! File-type catalog
//!
//! Maps each file-type identifier to the ordered list of patterns that locate
//! links of that type in raw markup. A catalog is built once and handed to the
//! extractor; nothing reads it through global state.

use crate::config::validation::{validate_identifier, validate_pattern};
use crate::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;

/// Built-in identifiers and their patterns, in catalog order
///
/// When a pattern has a capture group, the first group is the link.
pub const BUILTIN_FILE_TYPES: &[(&str, &[&str])] = &[
    (
        "jpg",
        &[r#"<img.*src="?([^" ]+.jpg)"#, r#"<a.*href="?([^" ]+.jpg)"#],
    ),
    (
        "mp3",
        &[r#"<audio.*src="?([^" ]+.mp3)"#, r#"<a.*href="?([^" ]+.mp3)"#],
    ),
    ("pdf", &[r#"<a.*href="?([^" ]+.pdf)"#]),
    (
        "png",
        &[r#"<img.*src="?([^" ]+.png)"#, r#"<a.*href="?([^" ]+.png)"#],
    ),
];

/// One catalog entry: an identifier and its ordered patterns
#[derive(Debug, Clone)]
struct FileTypeEntry {
    identifier: String,
    patterns: Vec<Regex>,
}

/// Ordered, immutable mapping from file-type identifier to link patterns
#[derive(Debug, Clone, Default)]
pub struct FileTypeCatalog {
    entries: Vec<FileTypeEntry>,
}

impl FileTypeCatalog {
    /// Returns the catalog of built-in file types (jpg, mp3, pdf, png)
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_FILE_TYPES.iter().copied())
            .expect("built-in link patterns are valid")
    }

    /// Builds a catalog from `(identifier, patterns)` pairs
    ///
    /// Entries keep the order they are given in. Repeating an identifier
    /// appends its patterns to the existing entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an identifier is malformed or a pattern fails
    /// to compile.
    pub fn from_entries<I, S, P, T>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut catalog = Self::default();
        for (identifier, patterns) in entries {
            catalog.add(identifier.as_ref(), patterns)?;
        }
        Ok(catalog)
    }

    /// Builds the built-in catalog plus the extra entries from configuration
    ///
    /// New identifiers are appended after the built-ins; known identifiers get
    /// the extra patterns after their built-in ones.
    pub fn with_extensions(extra: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let mut catalog = Self::builtin();
        for (identifier, patterns) in extra {
            catalog.add(identifier, patterns)?;
        }
        Ok(catalog)
    }

    fn add<P, T>(&mut self, identifier: &str, patterns: P) -> Result<(), ConfigError>
    where
        P: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        validate_identifier(identifier)?;

        let compiled = patterns
            .into_iter()
            .map(|p| validate_pattern(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        match self.entries.iter_mut().find(|e| e.identifier == identifier) {
            Some(entry) => entry.patterns.extend(compiled),
            None => self.entries.push(FileTypeEntry {
                identifier: identifier.to_string(),
                patterns: compiled,
            }),
        }
        Ok(())
    }

    /// Iterates identifiers in catalog order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.identifier.as_str())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.patterns(identifier).is_some()
    }

    /// Patterns for one identifier, in pattern-list order
    pub fn patterns(&self, identifier: &str) -> Option<&[Regex]> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.patterns.as_slice())
    }

    /// Resolves a requested selection into identifiers in catalog order
    ///
    /// An empty selection means every identifier. Duplicates collapse. The
    /// order in which types were requested is not kept: with the built-in
    /// catalog, `-f png,jpg` scans for jpg links before png links.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownFileType` for identifiers the catalog does
    /// not know.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>, ConfigError> {
        if let Some(unknown) = requested
            .iter()
            .map(AsRef::as_ref)
            .find(|id| !self.contains(id))
        {
            return Err(ConfigError::UnknownFileType(format!(
                "'{}' (known: {})",
                unknown,
                self.identifiers().collect::<Vec<_>>().join(", ")
            )));
        }

        Ok(self
            .identifiers()
            .filter(|id| requested.is_empty() || requested.iter().any(|r| r.as_ref() == *id))
            .map(str::to_string)
            .collect())
    }

    /// Patterns for a selection, flattened in catalog then pattern-list order
    ///
    /// Identifiers the catalog does not know contribute nothing.
    pub fn patterns_for<S: AsRef<str>>(&self, file_types: &[S]) -> Vec<Regex> {
        self.entries
            .iter()
            .filter(|e| file_types.iter().any(|t| t.as_ref() == e.identifier))
            .flat_map(|e| e.patterns.iter().cloned())
            .collect()
    }
}
