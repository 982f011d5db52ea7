//! Sounding analysis pipeline.
//!
//! Turns raw upstream levels into the quantities the tools report and plot:
//!
//! - [`sanitize`]: drop levels missing any field of a required set
//! - [`thermo`]: LCL, virtual temperature and adiabats via `metfor`
//! - [`parcel`]: lifted surface-parcel temperature trace
//! - [`indices`]: surface-based CAPE, CIN and LCL pressure
//! - [`kinematics`]: wind vector decomposition

pub mod indices;
pub mod kinematics;
pub mod parcel;
pub mod sanitize;
pub mod thermo;

pub use indices::{derive_indices, DerivedIndices, IndicesReport};
pub use kinematics::{wind_components, WindComponents};
pub use parcel::{parcel_path, ParcelPath};
pub use sanitize::{sanitize, sanitize_thermo, sanitize_wind, Kinematic, RequiredFields, Thermo, ThermoLevel, WindLevel};
