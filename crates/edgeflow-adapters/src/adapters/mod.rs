/*!
 * Built-in adapter types.
 */

pub mod simulation;

pub use simulation::{SimulationAdapter, SimulationAdapterFactory, SimulationInformation};
