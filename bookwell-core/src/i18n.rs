//! Message catalog for user-facing envelope messages.
//!
//! Messages are addressed by dotted ids such as `job.found`. A catalog maps ids
//! to display text; an id with no entry renders as the id itself.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{BookingError, Result};

/// Message ids emitted by the booking API.
pub mod ids {
    pub const JOB_FOUND: &str = "job.found";
    pub const JOB_NOT_FOUND: &str = "job.not.found";
    pub const BOOKING_SAVED: &str = "new.booking.saved";
    pub const BOOKING_SAVE_FAILED: &str = "failed.to.add.new.booking";
    pub const BOOKING_UPDATED: &str = "booking.has.been.updated";
    pub const BOOKING_UPDATE_FAILED: &str = "failed.to.update.booking";
    pub const HISTORY_FOUND: &str = "history.found";
    pub const FEED_UPDATED: &str = "updated";
    pub const NO_TRANSLATOR: &str = "notification.no.translator";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Nested tables are flattened into dotted ids, so
    /// `[job]\nfound = "..."` and `"job.found" = "..."` are equivalent.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table = source
            .parse()
            .map_err(|e| BookingError::InvalidInput(format!("invalid message catalog: {e}")))?;

        let mut entries = HashMap::new();
        flatten(None, &table, &mut entries);
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            BookingError::InvalidInput(format!(
                "failed to read message catalog {}: {e}",
                path.display()
            ))
        })?;
        let catalog = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), entries = catalog.len(), "loaded message catalog");
        Ok(catalog)
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(id.into(), text.into());
    }

    /// Display text for `id`, or the id itself when no entry exists.
    pub fn text<'a>(&'a self, id: &'a str) -> Cow<'a, str> {
        match self.entries.get(id) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Borrowed(id),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: Option<&str>, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let id = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::String(text) => {
                out.insert(id, text.clone());
            }
            toml::Value::Table(nested) => flatten(Some(&id), nested, out),
            other => warn!(id = %id, kind = other.type_str(), "ignoring non-string catalog entry"),
        }
    }
}
