//! Lanes - the categories of entries that compete for screen time

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the display is currently showing.
///
/// `Recent`, `Older` and `Archive` are entry lanes; `Instruction` is the
/// periodic how-to-participate page and has no entries of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    #[default]
    Recent,
    Older,
    Archive,
    Instruction,
}

impl Lane {
    /// Entry lanes in fallback priority order
    pub const ENTRY_LANES: [Lane; 3] = [Lane::Recent, Lane::Older, Lane::Archive];

    /// Whether this lane carries entries
    pub fn is_entry_lane(self) -> bool {
        !matches!(self, Lane::Instruction)
    }

    /// Recent entries are paged in order; the larger pools are sampled
    pub fn is_sequential(self) -> bool {
        matches!(self, Lane::Recent)
    }

    /// Lowercase name used in logs and config
    pub fn name(self) -> &'static str {
        match self {
            Lane::Recent => "recent",
            Lane::Older => "older",
            Lane::Archive => "archive",
            Lane::Instruction => "instruction",
        }
    }

    /// Header label shown next to the title
    pub fn label(self) -> &'static str {
        match self {
            Lane::Recent => "Recent",
            Lane::Older => "Older",
            Lane::Archive => "Archive",
            Lane::Instruction => "",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
