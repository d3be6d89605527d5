// File: stailist-common/src/models/calls.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of AI round-trip that may be in flight at the same time.
/// At most one call of each kind runs at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Recommendation,
    TryOn,
    Autofill,
    Suggestions,
}

impl CallKind {
    pub const ALL: [CallKind; 4] = [
        CallKind::Recommendation,
        CallKind::TryOn,
        CallKind::Autofill,
        CallKind::Suggestions,
    ];

    pub fn index(&self) -> usize {
        match self {
            CallKind::Recommendation => 0,
            CallKind::TryOn => 1,
            CallKind::Autofill => 2,
            CallKind::Suggestions => 3,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallKind::Recommendation => "recommendation",
            CallKind::TryOn => "try-on",
            CallKind::Autofill => "autofill",
            CallKind::Suggestions => "suggestions",
        };
        f.write_str(name)
    }
}
