//! Error taxonomy for absorption computations.
//!
//! Every variant carries the process exit code the `lbl` binary reports, so the
//! library can stay `Result`-based while the binary keeps a stable exit-code
//! contract:
//!
//! - `2`: bad input (arguments, grid, atmosphere or spectrum files, unwritable outputs)
//! - `3`: lookup failures (molecule not in the catalog)
//! - `4`: catalog and data failures (unreadable or malformed catalogs, range errors)

use std::path::PathBuf;

use thiserror::Error;

/// Boxed underlying cause for catalog failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LblError {
    /// The formula has no alias entry in the catalog.
    #[error("Molecule '{formula}' not found in catalog.")]
    MoleculeNotFound { formula: String },

    /// Connection/query failure, or a catalog that broke its contract.
    #[error("Catalog access failed: {message}")]
    CatalogAccess {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// Partition-function lookup outside the sampled temperature span.
    #[error(
        "Temperature {temperature} K is outside the partition table range [{min}, {max}] K \
         for isotopologue index {isotopologue}."
    )]
    OutOfRange {
        isotopologue: usize,
        temperature: f64,
        min: f64,
        max: f64,
    },

    /// A hard ceiling on staged catalog data was hit.
    #[error("{what} exceeds the supported capacity of {capacity}.")]
    CapacityExceeded { what: &'static str, capacity: usize },

    /// A line references an isotopologue with no mass entry.
    #[error("No mass registered for isotopologue {isotopologue}.")]
    UnknownIsotopologue { isotopologue: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LblError {
    pub fn catalog(message: impl Into<String>) -> Self {
        LblError::CatalogAccess {
            message: message.into(),
            source: None,
        }
    }

    pub fn catalog_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LblError::CatalogAccess {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        LblError::InvalidInput(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            LblError::InvalidInput(_) | LblError::Export { .. } => 2,
            LblError::MoleculeNotFound { .. } => 3,
            LblError::CatalogAccess { .. }
            | LblError::OutOfRange { .. }
            | LblError::CapacityExceeded { .. }
            | LblError::UnknownIsotopologue { .. } => 4,
        }
    }
}
