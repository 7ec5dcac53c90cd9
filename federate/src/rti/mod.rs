mod error;
mod rti_ambassador;

pub use error::{Capability, RtiError};
pub use rti_ambassador::RtiAmbassador;
