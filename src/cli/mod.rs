//! Command-line parsing for the line-by-line absorption tool.
//!
//! Argument parsing and command dispatch stay separate from the physics: every
//! subcommand is turned into plain config structs before anything is computed.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lbl", version, about = "Line-by-line molecular absorption spectra")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Absorption spectrum of one molecule at one atmospheric state.
    Absorption(AbsorptionArgs),
    /// Per-gas and total absorption for every layer of an atmosphere profile.
    Layers(LayersArgs),
    /// Write a deterministic synthetic catalog.
    Synth(SynthArgs),
    /// Summarize a spectrum JSON written by `lbl absorption --export-json`.
    Show(ShowArgs),
    /// List the molecules of a catalog.
    Catalog(CatalogArgs),
}

/// Catalog location, falling back to `LBL_CATALOG`.
#[derive(Debug, Args, Clone)]
pub struct CatalogSource {
    /// Catalog JSON file (defaults to `$LBL_CATALOG`).
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

/// Spectral grid and per-line options shared by the compute commands.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Lower grid bound [cm-1].
    #[arg(long)]
    pub v0: i32,

    /// Upper grid bound [cm-1].
    #[arg(long)]
    pub vn: i32,

    /// Grid points per cm-1.
    #[arg(long, default_value_t = 100)]
    pub points_per_unit: u32,

    /// Line cut-off distance from center [cm-1].
    #[arg(long, default_value_t = 25)]
    pub cut_off: u32,

    /// Subtract each line's window-edge pedestal.
    #[arg(long)]
    pub remove_pedestal: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AbsorptionArgs {
    #[command(flatten)]
    pub source: CatalogSource,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Molecule formula or alias (e.g. CO2).
    #[arg(short = 'm', long)]
    pub molecule: String,

    /// Pressure [Pa].
    #[arg(short = 'p', long, default_value_t = 101325.0)]
    pub pressure: f64,

    /// Temperature [K].
    #[arg(short = 't', long, default_value_t = 296.0)]
    pub temperature: f64,

    /// Volume mixing ratio [mol mol-1].
    #[arg(long, default_value_t = 0.0)]
    pub vmr: f64,

    /// Show the N strongest grid points.
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export `wavenumber,absorption` rows to CSV.
    #[arg(long = "export-csv")]
    pub export_csv: Option<PathBuf>,

    /// Export the spectrum with run metadata to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct LayersArgs {
    #[command(flatten)]
    pub source: CatalogSource,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Atmosphere profile JSON (array of layers).
    #[arg(long, value_name = "JSON")]
    pub atmosphere: PathBuf,

    /// Export per-layer, per-gas absorption to CSV.
    #[arg(long = "export-csv")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output catalog JSON.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub output: PathBuf,

    /// Molecule formula to register.
    #[arg(long, default_value = "CO2")]
    pub formula: String,

    /// Catalog molecule id.
    #[arg(long, default_value_t = 2)]
    pub molecule_id: i64,

    /// Random seed.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Number of lines to generate.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub lines: usize,

    /// Lower bound of line centers [cm-1].
    #[arg(long, default_value_t = 600)]
    pub v0: i32,

    /// Upper bound of line centers [cm-1].
    #[arg(long, default_value_t = 700)]
    pub vn: i32,

    /// Also write the lines to this CSV and reference it from the catalog.
    #[arg(long = "lines-csv")]
    pub lines_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Spectrum JSON file.
    #[arg(value_name = "JSON")]
    pub spectrum: PathBuf,

    /// Show the N strongest grid points.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub source: CatalogSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorption_defaults() {
        let cli = Cli::parse_from(["lbl", "absorption", "-m", "CO2", "--v0", "600", "--vn", "700"]);
        let Command::Absorption(args) = cli.command else {
            panic!("expected absorption command");
        };
        assert_eq!(args.grid.points_per_unit, 100);
        assert_eq!(args.grid.cut_off, 25);
        assert!(!args.grid.remove_pedestal);
        assert_eq!(args.pressure, 101325.0);
        assert!(args.source.catalog.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
