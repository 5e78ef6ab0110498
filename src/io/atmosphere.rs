//! Atmosphere profiles for multi-layer runs.
//!
//! A JSON array of layers:
//!
//! ```json
//! [{ "pressure": 101325.0, "temperature": 288.0, "mixing_ratios": { "CO2": 4.1e-4 } }]
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::{AtmosphereLayer, Conditions};
use crate::error::LblError;

pub fn read_layers_json(path: &Path) -> Result<Vec<AtmosphereLayer>, LblError> {
    let file = File::open(path)
        .map_err(|e| LblError::invalid(format!("Failed to open atmosphere '{}': {e}", path.display())))?;
    let layers: Vec<AtmosphereLayer> =
        serde_json::from_reader(file).map_err(|e| LblError::invalid(format!("Invalid atmosphere JSON: {e}")))?;

    for (index, layer) in layers.iter().enumerate() {
        for (formula, &mixing_ratio) in &layer.mixing_ratios {
            Conditions {
                pressure: layer.pressure,
                temperature: layer.temperature,
                mixing_ratio,
            }
            .validate()
            .map_err(|e| LblError::invalid(format!("Layer {index}, {formula}: {e}")))?;
        }
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_validates_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atm.json");
        std::fs::write(
            &path,
            r#"[
                {"pressure": 101325.0, "temperature": 288.0, "mixing_ratios": {"CO2": 4.1e-4, "H2O": 0.01}},
                {"pressure": 5000.0, "temperature": 220.0, "mixing_ratios": {}}
            ]"#,
        )
        .unwrap();
        let layers = read_layers_json(&path).unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].mixing_ratios["H2O"], 0.01);

        std::fs::write(
            &path,
            r#"[{"pressure": 101325.0, "temperature": 288.0, "mixing_ratios": {"CO2": 2.0}}]"#,
        )
        .unwrap();
        let err = read_layers_json(&path).unwrap_err();
        assert!(err.to_string().contains("Layer 0, CO2"), "{err}");
    }
}
