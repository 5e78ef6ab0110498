//! Input/output helpers.
//!
//! - JSON catalog files (`catalog_file`) and CSV line lists (`line_list`)
//! - atmosphere profiles for multi-layer runs (`atmosphere`)
//! - spectrum exports, CSV and JSON (`export`)

pub mod atmosphere;
pub mod catalog_file;
pub mod export;
pub mod line_list;

pub use atmosphere::*;
pub use catalog_file::*;
pub use export::*;
pub use line_list::*;
