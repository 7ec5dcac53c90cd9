mod discovered_instance;
mod error;
mod federate_ambassador;
mod federate_callbacks;

pub use discovered_instance::DiscoveredInstance;
pub use error::CallbackError;
pub use federate_ambassador::FederateAmbassador;
pub use federate_callbacks::FederateCallbacks;
