//! Physical constants in the units the line-by-line kernel works in.

/// Speed of light [m s-1].
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

/// Pressure conversion [atm Pa-1].
pub const PA_TO_ATM: f64 = 9.86923e-6;

/// Universal gas constant [J kmol-1 K-1]; pairs with masses in g mol-1.
pub const GAS_CONSTANT: f64 = 8314.472;

/// Second radiation constant `hc/k` [cm K].
pub const SECOND_RADIATION_CONSTANT: f64 = 1.4387752;

/// Boltzmann constant [J K-1].
pub const BOLTZMANN: f64 = 1.38064852e-23;

/// HITRAN / TIPS reference temperature [K].
pub const REFERENCE_TEMPERATURE: f64 = 296.0;

/// Line strength unit conversion, cm2 -> m2.
pub const CM2_TO_M2: f64 = 1e-4;
