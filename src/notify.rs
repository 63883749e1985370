// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Reanimate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Reanimate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fire-and-forget notification surface.
//!
//! Skipped references and other partial-failure conditions are reported here
//! so the hosting editor can toast them; nothing in this crate changes
//! control flow based on what a sink does.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives user-facing notifications. Implementations must not panic and
/// must not block the import for long; the import never reads anything back.
pub trait NotificationSink {
    fn notify(&self, message: &str, severity: Severity);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Records notifications in memory, in arrival order. Used by tests and by
/// callers that want to summarize an import after the fact.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.borrow().clone()
    }

    pub fn messages_with_severity(&self, severity: Severity) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, message: &str, severity: Severity) {
        self.entries.borrow_mut().push((severity, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySink, NotificationSink, Severity};

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.notify("first", Severity::Info);
        sink.notify("second", Severity::Warning);

        assert_eq!(
            sink.entries(),
            vec![
                (Severity::Info, "first".to_owned()),
                (Severity::Warning, "second".to_owned()),
            ]
        );
        assert_eq!(
            sink.messages_with_severity(Severity::Warning),
            vec!["second".to_owned()]
        );
    }

    #[test]
    fn severity_formats_as_lowercase() {
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
