// [libs/domain/liveness/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LIVENESS TRACKER (ESTRATO L5)
 * RESPONSABILIDAD: BARRIDO DE DISPONIBILIDAD DE SITIOS
 * =================================================================
 */

pub mod errors;
pub mod tracker;

pub use errors::{LivenessError, LivenessResult};
pub use tracker::{LivenessConfig, LivenessTracker};
