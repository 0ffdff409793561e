//! Contract error types for the generators and validators
//!
//! These errors carry no driver types; database and file errors live next to
//! their infra implementations.

/// Errors raised by the pure helpers of this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtilsError {
    /// `generate_mac_oui` was given no vendor prefixes to choose from
    EmptyOuiList,
    /// Vendor prefix is not three colon-separated hex pairs
    InvalidOui {
        /// The rejected prefix
        oui: String,
    },
    /// Consistency level name is not part of the known enumeration
    InvalidConsistencyLevel {
        /// The rejected name
        name: String,
    },
}

impl std::fmt::Display for UtilsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOuiList => {
                write!(f, "OUI list is empty")
            }
            Self::InvalidOui { oui } => {
                write!(f, "Invalid OUI '{}': expected three colon-separated hex pairs", oui)
            }
            Self::InvalidConsistencyLevel { name } => {
                write!(f, "Invalid consistency level: {}", name)
            }
        }
    }
}

impl std::error::Error for UtilsError {}
