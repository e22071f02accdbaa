//! The accepted-media-type filter applied before files reach the pipeline.
//!
//! The filter string uses the HTML `accept` attribute syntax: a comma
//! separated list of `type/subtype`, `type/*`, or `.ext` entries.

use crate::pipeline::FileHandle;

/// One entry of an accept string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptRule {
    /// `image/png`
    Exact(String),
    /// `image/*` (stores the top-level type)
    Wildcard(String),
    /// `.png` (stores the extension without the dot)
    Extension(String),
}

/// Parsed accept filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    rules: Vec<AcceptRule>,
}

/// Result of filtering one batch.
#[derive(Debug, Default)]
pub struct AcceptOutcome {
    /// Handles that passed the filter, in submission order
    pub accepted: Vec<FileHandle>,
    /// Names of handles that did not
    pub rejected: Vec<String>,
}

impl AcceptFilter {
    /// Parse an accept string. Blank entries are ignored.
    pub fn parse(accept: &str) -> Self {
        let rules = accept
            .split(',')
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                if let Some(ext) = entry.strip_prefix('.') {
                    return (!ext.is_empty()).then(|| AcceptRule::Extension(ext.to_string()));
                }
                match entry.split_once('/') {
                    Some(("*", "*")) => Some(AcceptRule::Wildcard("*".to_string())),
                    Some((top, "*")) if !top.is_empty() => {
                        Some(AcceptRule::Wildcard(top.to_string()))
                    }
                    Some((top, sub)) if !top.is_empty() && !sub.is_empty() => {
                        Some(AcceptRule::Exact(entry.clone()))
                    }
                    _ => {
                        tracing::warn!("Ignoring malformed accept entry: {:?}", entry);
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Whether the filter has no usable rules (accepts nothing).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a media type (parameters after `;` are ignored) and/or extension.
    pub fn matches(&self, media_type: Option<&str>, extension: Option<&str>) -> bool {
        let media_type = media_type.map(|m| {
            m.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_lowercase()
        });
        let extension = extension.map(|e| e.trim_start_matches('.').to_lowercase());

        self.rules.iter().any(|rule| match rule {
            AcceptRule::Exact(expected) => media_type.as_deref() == Some(expected.as_str()),
            AcceptRule::Wildcard(top) => media_type.as_deref().is_some_and(|m| {
                top == "*" || m.split_once('/').is_some_and(|(t, _)| t == top)
            }),
            AcceptRule::Extension(ext) => extension.as_deref() == Some(ext.as_str()),
        })
    }

    /// Check a single file handle.
    ///
    /// Matches the declared (or name-guessed) media type and the extension.
    /// A handle that declares no type is also matched on its sniffed content.
    pub fn accepts(&self, handle: &FileHandle) -> bool {
        if self.matches(handle.media_type().as_deref(), handle.extension().as_deref()) {
            return true;
        }
        handle.declared_type.is_none()
            && handle
                .sniffed_type()
                .is_some_and(|sniffed| self.matches(Some(sniffed), None))
    }

    /// Split a batch into accepted handles and rejected names.
    pub fn partition(&self, handles: Vec<FileHandle>) -> AcceptOutcome {
        let mut outcome = AcceptOutcome::default();
        for handle in handles {
            if self.accepts(&handle) {
                outcome.accepted.push(handle);
            } else {
                tracing::debug!("Rejected {:?}: media type not accepted", handle.name);
                outcome.rejected.push(handle.name);
            }
        }
        outcome
    }
}

impl std::fmt::Display for AcceptFilter {
    /// Normalized accept string, e.g. `image/*, .svg`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match rule {
                AcceptRule::Exact(media_type) => f.write_str(media_type)?,
                AcceptRule::Wildcard(top) if top == "*" => f.write_str("*/*")?,
                AcceptRule::Wildcard(top) => write!(f, "{top}/*")?,
                AcceptRule::Extension(ext) => write!(f, ".{ext}")?,
            }
        }
        Ok(())
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::parse("image/*")
    }
}
