use fedgate_shared::{ObjectClassHandle, ObjectInstanceHandle};

/// A remote object instance this federate has been told about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredInstance {
    pub instance: ObjectInstanceHandle,
    pub class: ObjectClassHandle,
    pub name: String,
}
