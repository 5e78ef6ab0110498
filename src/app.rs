//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result of [`run`] to an exit code; this module
//! parses arguments, resolves the catalog, runs the pipelines and prints or
//! exports their results.

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{AbsorptionArgs, CatalogArgs, CatalogSource, Command, GridArgs, LayersArgs, ShowArgs, SynthArgs};
use crate::data::{SynthConfig, generate_molecule};
use crate::domain::{AccumulationSettings, Conditions, LayersConfig, RunConfig, SpectralGrid};
use crate::error::LblError;

pub mod pipeline;

/// Environment variable naming the default catalog file.
pub const CATALOG_ENV: &str = "LBL_CATALOG";

/// Entry point for the `lbl` binary.
pub fn run() -> Result<(), LblError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Absorption(args) => handle_absorption(args),
        Command::Layers(args) => handle_layers(args),
        Command::Synth(args) => handle_synth(args),
        Command::Show(args) => handle_show(args),
        Command::Catalog(args) => handle_catalog(args),
    }
}

fn handle_absorption(args: AbsorptionArgs) -> Result<(), LblError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run_absorption(&config)?;

    let summary = crate::report::summarize(&run.spectrum);
    println!(
        "{}",
        crate::report::format_summary(
            &config.molecule,
            &config.conditions,
            &config.settings,
            &summary,
            Some(&run.stats),
        )
    );
    if args.top > 0 {
        let strongest = crate::report::strongest_points(&run.spectrum, args.top);
        println!("{}", crate::report::format_strongest(&strongest));
    }

    if let Some(path) = &config.export_csv {
        crate::io::write_spectrum_csv(path, &run.spectrum)?;
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::SpectrumFile::new(
            &config.molecule,
            &config.conditions,
            &config.settings,
            &run.spectrum,
        );
        crate::io::write_spectrum_json(path, &file)?;
    }
    Ok(())
}

fn handle_layers(args: LayersArgs) -> Result<(), LblError> {
    let config = LayersConfig {
        catalog_path: resolve_catalog_path(&args.source)?,
        atmosphere_path: args.atmosphere.clone(),
        grid: grid_from_args(&args.grid)?,
        settings: settings_from_args(&args.grid),
        export_csv: args.export_csv.clone(),
    };
    let output = pipeline::run_layers(&config)?;
    println!(
        "{}",
        crate::report::format_layers_summary(&output.layers, &output.results)
    );
    if let Some(path) = &config.export_csv {
        crate::io::write_layers_csv(path, &output.results)?;
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), LblError> {
    let synth = SynthConfig {
        formula: args.formula.clone(),
        molecule_id: args.molecule_id,
        seed: args.seed,
        line_count: args.lines,
        v0: args.v0,
        vn: args.vn,
        ..SynthConfig::default()
    };
    let mut record = generate_molecule(&synth)?;

    let mut entry_csv = None;
    if let Some(csv_path) = &args.lines_csv {
        crate::io::write_line_list(csv_path, &record.transitions)?;
        record.transitions.clear();
        entry_csv = Some(relative_to(csv_path, &args.output));
    }

    let contents = crate::io::CatalogFile {
        molecules: vec![crate::io::CatalogEntry {
            record,
            transitions_csv: entry_csv,
        }],
    };
    crate::io::write_catalog_contents(&args.output, &contents)?;
    println!(
        "Wrote {} synthetic {} lines to {}",
        synth.line_count,
        synth.formula,
        args.output.display()
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), LblError> {
    let file = crate::io::read_spectrum_json(&args.spectrum)?;
    let spectrum = file.spectrum()?;
    let summary = crate::report::summarize(&spectrum);
    println!("Generated: {} by {}", file.generated_at, file.tool);
    println!(
        "{}",
        crate::report::format_summary(&file.molecule, &file.conditions, &file.settings, &summary, None)
    );
    if args.top > 0 {
        let strongest = crate::report::strongest_points(&spectrum, args.top);
        println!("{}", crate::report::format_strongest(&strongest));
    }
    Ok(())
}

fn handle_catalog(args: CatalogArgs) -> Result<(), LblError> {
    let path = resolve_catalog_path(&args.source)?;
    let catalog = crate::io::read_catalog_file(&path)?;
    print!("{}", crate::report::format_catalog_summary(&catalog));
    Ok(())
}

pub fn run_config_from_args(args: &AbsorptionArgs) -> Result<RunConfig, LblError> {
    let conditions = Conditions {
        pressure: args.pressure,
        temperature: args.temperature,
        mixing_ratio: args.vmr,
    };
    conditions.validate()?;
    Ok(RunConfig {
        catalog_path: resolve_catalog_path(&args.source)?,
        molecule: args.molecule.clone(),
        conditions,
        grid: grid_from_args(&args.grid)?,
        settings: settings_from_args(&args.grid),
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    })
}

fn grid_from_args(args: &GridArgs) -> Result<SpectralGrid, LblError> {
    SpectralGrid::new(args.v0, args.vn, args.points_per_unit)
}

fn settings_from_args(args: &GridArgs) -> AccumulationSettings {
    AccumulationSettings {
        cut_off: args.cut_off,
        remove_pedestal: args.remove_pedestal,
    }
}

/// `--catalog`, else `LBL_CATALOG` from the environment or a `.env` file.
fn resolve_catalog_path(source: &CatalogSource) -> Result<PathBuf, LblError> {
    dotenvy::dotenv().ok();
    catalog_path_from(source.catalog.clone(), std::env::var(CATALOG_ENV).ok())
}

fn catalog_path_from(arg: Option<PathBuf>, env: Option<String>) -> Result<PathBuf, LblError> {
    arg.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .ok_or_else(|| {
            LblError::invalid(format!(
                "No catalog given: pass --catalog or set {CATALOG_ENV} (environment or .env)."
            ))
        })
}

/// Path of `target` as referenced from a file at `from`: relative when both share a directory.
fn relative_to(target: &std::path::Path, from: &std::path::Path) -> PathBuf {
    match (target.parent(), from.parent(), target.file_name()) {
        (Some(a), Some(b), Some(name)) if a == b => PathBuf::from(name),
        _ => std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_flag_wins_over_environment() {
        let path = catalog_path_from(Some(PathBuf::from("a.json")), Some("b.json".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("a.json"));
        let path = catalog_path_from(None, Some("b.json".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("b.json"));
        let err = catalog_path_from(None, Some("  ".to_string())).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn run_config_validates_grid_and_conditions() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["lbl", "absorption", "--catalog", "c.json", "-m", "CO2"];
            argv.extend_from_slice(extra);
            let cli = crate::cli::Cli::parse_from(argv);
            let Command::Absorption(args) = cli.command else {
                panic!("expected absorption command");
            };
            run_config_from_args(&args)
        };

        let config = parse(&["--v0", "995", "--vn", "1005", "--cut-off", "5", "--remove-pedestal"]).unwrap();
        assert_eq!(config.grid.len(), 1000);
        assert_eq!(config.settings.cut_off, 5);
        assert!(config.settings.remove_pedestal);

        assert!(parse(&["--v0", "1005", "--vn", "995"]).is_err());
        assert!(parse(&["--v0", "995", "--vn", "1005", "--vmr", "2"]).is_err());
    }

    #[test]
    fn synth_lines_csv_is_referenced_relatively() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("catalog.json");
        let csv = dir.path().join("lines.csv");
        assert_eq!(relative_to(&csv, &output), PathBuf::from("lines.csv"));

        handle_synth(SynthArgs {
            output: output.clone(),
            formula: "CO2".to_string(),
            molecule_id: 2,
            seed: 3,
            lines: 50,
            v0: 600,
            vn: 650,
            lines_csv: Some(csv),
        })
        .unwrap();
        let catalog = crate::io::read_catalog_file(&output).unwrap();
        let record = catalog.molecules().next().unwrap();
        assert_eq!(record.transitions.len(), 50);
        assert!(!record.tips.is_empty());
    }
}
