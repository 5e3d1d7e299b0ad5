//! Schema version handling.
//!
//! A workspace is constructed against one AUTOSAR schema version and keeps
//! it for its whole lifetime. The engine never branches on the full
//! major.minor pair; it asks for the [`SchemaEra`] once and lets the
//! comspec and value layers consult that.

use std::fmt;

/// An AUTOSAR schema version, major.minor, fixed at workspace construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaVersion {
    pub major: u8,
    pub minor: u8,
}

impl SchemaVersion {
    pub const AUTOSAR_3_0: SchemaVersion = SchemaVersion { major: 3, minor: 0 };
    pub const AUTOSAR_4_2: SchemaVersion = SchemaVersion { major: 4, minor: 2 };

    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Which of the two supported schema families this version belongs to.
    pub fn era(&self) -> SchemaEra {
        if self.major >= 4 {
            SchemaEra::Autosar4
        } else {
            SchemaEra::Autosar3
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The two schema families the engine distinguishes.
///
/// Era selection happens exactly once, at workspace construction; the rest
/// of the engine matches on this enum instead of comparing version numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaEra {
    Autosar3,
    Autosar4,
}

impl SchemaEra {
    /// Get a display label for this era.
    pub fn display(&self) -> &'static str {
        match self {
            SchemaEra::Autosar3 => "AUTOSAR 3",
            SchemaEra::Autosar4 => "AUTOSAR 4",
        }
    }
}
