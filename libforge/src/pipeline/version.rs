//! Version-stamp stage.
//!
//! Locates the version-declaration marker in a module's source and rewrites
//! the quoted version string in place when it differs from the resolved
//! version. The marker is a doc comment containing `@version` followed by
//! the declaration line:
//!
//! ```text
//! /**
//!  * @version
//!  */
//! export const VERSION = '1.2.3';
//! ```

use regex::Regex;
use std::sync::OnceLock;
use tokio::fs;

use crate::core::ModuleDescriptor;
use crate::errors::StageError;

/// Matches the `@version` doc comment plus the declaration line after it.
const MARKER_PATTERN: &str = r"(?s)/\*\*[^/]*?@version.*?\*/\r?\n[^\r\n]*";

/// Matches the single-quoted version string inside the marker block.
const QUOTED_PATTERN: &str = r"'([^']*)'";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

fn quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(QUOTED_PATTERN).expect("quoted pattern is valid"))
}

/// The outcome of a version-stamp stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
    /// Whether the declaration was rewritten.
    pub changed: bool,
    /// The version previously declared, when it was rewritten.
    pub previous: Option<String>,
}

impl VersionStamp {
    /// The status message reported for this outcome.
    #[must_use]
    pub fn message(&self, version: &str) -> String {
        if self.changed {
            format!("New version: {version}")
        } else {
            format!("Current version: {version}")
        }
    }
}

/// Stamps the resolved version into the module's version-declaration file.
///
/// A missing file or marker is tolerated: the module simply keeps whatever
/// it declares. Read/write failures are stage-scoped errors.
pub async fn stamp_version(module: &ModuleDescriptor) -> Result<VersionStamp, StageError> {
    let path = module.version_file();
    if !path.is_file() {
        return Ok(VersionStamp {
            changed: false,
            previous: None,
        });
    }

    let text = fs::read_to_string(&path)
        .await
        .map_err(StageError::VersionStamp)?;

    let Some(block) = marker_regex().find(&text) else {
        return Ok(VersionStamp {
            changed: false,
            previous: None,
        });
    };
    let Some(quoted) = quoted_regex().captures(block.as_str()) else {
        return Ok(VersionStamp {
            changed: false,
            previous: None,
        });
    };

    let previous = quoted[1].to_string();
    if previous == module.version {
        return Ok(VersionStamp {
            changed: false,
            previous: Some(previous),
        });
    }

    let quote_start = block.start() + quoted.get(0).map_or(0, |m| m.start());
    let quote_end = block.start() + quoted.get(0).map_or(0, |m| m.end());
    let mut updated = String::with_capacity(text.len());
    updated.push_str(&text[..quote_start]);
    updated.push('\'');
    updated.push_str(&module.version);
    updated.push('\'');
    updated.push_str(&text[quote_end..]);

    fs::write(&path, updated)
        .await
        .map_err(StageError::VersionStamp)?;
    Ok(VersionStamp {
        changed: true,
        previous: Some(previous),
    })
}
