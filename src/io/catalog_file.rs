//! JSON catalog files.
//!
//! ```json
//! {
//!   "molecules": [
//!     {
//!       "id": 2, "formula": "CO2", "aliases": ["carbon dioxide"],
//!       "isotopologues": [{ "isoid": 1, "mass": 43.98983 }],
//!       "tips": [{ "isotopologue_id": 1, "temperature": 70.0, "data": 67.9 }],
//!       "transitions_csv": "co2_lines.csv"
//!     }
//!   ]
//! }
//! ```
//!
//! Transitions can be inlined under `"transitions"` or kept in a CSV line list
//! referenced by `transitions_csv`, resolved relative to the JSON file.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{MemoryCatalog, MoleculeRecord};
use crate::error::LblError;
use crate::io::line_list::read_line_list;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub molecules: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub record: MoleculeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions_csv: Option<PathBuf>,
}

/// Load a catalog file, including any referenced line lists.
pub fn read_catalog_file(path: &Path) -> Result<MemoryCatalog, LblError> {
    let file = File::open(path).map_err(|e| {
        LblError::catalog_with(format!("Failed to open catalog '{}'", path.display()), e)
    })?;
    let contents: CatalogFile = serde_json::from_reader(file).map_err(|e| {
        LblError::catalog_with(format!("Invalid catalog JSON '{}'", path.display()), e)
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut catalog = MemoryCatalog::new();
    for entry in contents.molecules {
        let mut record = entry.record;
        if let Some(csv_path) = entry.transitions_csv {
            let csv_path = base.join(csv_path);
            let list = read_line_list(&csv_path)?;
            if let Some(first) = list.row_errors.first() {
                return Err(LblError::catalog(format!(
                    "{} invalid rows in '{}'; first at line {}: {}",
                    list.row_errors.len(),
                    csv_path.display(),
                    first.line,
                    first.message
                )));
            }
            record.transitions.extend(list.transitions);
        }
        catalog.insert(record)?;
    }
    log::info!("Loaded catalog '{}': {}", path.display(), catalog.formulas().join(", "));
    Ok(catalog)
}

/// Write every molecule of `catalog` with inlined transitions.
pub fn write_catalog_file(path: &Path, catalog: &MemoryCatalog) -> Result<(), LblError> {
    let contents = CatalogFile {
        molecules: catalog
            .molecules()
            .map(|record| CatalogEntry {
                record: record.clone(),
                transitions_csv: None,
            })
            .collect(),
    };
    write_catalog_contents(path, &contents)
}

pub fn write_catalog_contents(path: &Path, contents: &CatalogFile) -> Result<(), LblError> {
    let export_err = |source: std::io::Error| LblError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(export_err)?;
    serde_json::to_writer_pretty(file, contents).map_err(|e| export_err(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LineCatalog, MoleculeId};
    use crate::data::{SynthConfig, generate_catalog};

    #[test]
    fn written_catalog_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = generate_catalog(&SynthConfig::default()).unwrap();
        write_catalog_file(&path, &catalog).unwrap();

        let loaded = read_catalog_file(&path).unwrap();
        let original: Vec<&MoleculeRecord> = catalog.molecules().collect();
        let reloaded: Vec<&MoleculeRecord> = loaded.molecules().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn transitions_from_relative_csv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("h2o.csv"),
            "nu,sw,gamma_air,gamma_self,n_air,elower,local_iso_id\n\
             1600.5,1e-20,0.09,0.4,0.7,100.0,1\n\
             1594.7,2e-20,0.09,0.4,0.7,50.0,1\n",
        )
        .unwrap();
        let json = r#"{
            "molecules": [{
                "id": 1,
                "formula": "H2O",
                "isotopologues": [{ "isoid": 1, "mass": 18.010565 }],
                "transitions_csv": "h2o.csv"
            }]
        }"#;
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, json).unwrap();

        let catalog = read_catalog_file(&path).unwrap();
        let id = catalog.resolve_molecule_id("H2O").unwrap();
        assert_eq!(id, MoleculeId(1));
        let centers: Vec<f64> = catalog.stream_lines(id).unwrap().map(|t| t.unwrap().nu).collect();
        assert_eq!(centers, vec![1594.7, 1600.5]);
        assert!(catalog.load_partition_table(id).unwrap().is_none());
    }

    #[test]
    fn bad_rows_or_missing_files_are_catalog_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_catalog_file(&dir.path().join("absent.json")),
            Err(LblError::CatalogAccess { .. })
        ));

        std::fs::write(
            dir.path().join("bad.csv"),
            "nu,sw,gamma_air,gamma_self,n_air,elower,local_iso_id\n1600.5,x,0.09,0.4,0.7,100.0,1\n",
        )
        .unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"molecules": [{"id": 1, "formula": "H2O", "transitions_csv": "bad.csv"}]}"#,
        )
        .unwrap();
        let err = read_catalog_file(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
