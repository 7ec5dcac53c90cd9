use std::{collections::BTreeMap, fmt};

/// Federation logical time, in the units of the federation's time axis
pub type LogicalTime = f64;

/// Field name to string value, as exchanged with the hosted application.
/// Only the fields carried by a single update are present.
pub type FieldMap = BTreeMap<String, String>;

macro_rules! runtime_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn new(value: u32) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

runtime_handle!(
    /// Runtime-assigned identity of this federate within a federation
    FederateHandle,
    "federate"
);
runtime_handle!(
    /// Runtime-assigned handle of an interaction class
    InteractionClassHandle,
    "interaction-class"
);
runtime_handle!(
    /// Runtime-assigned handle of an object class
    ObjectClassHandle,
    "object-class"
);
runtime_handle!(
    /// Runtime-assigned handle of an interaction parameter or object attribute
    FieldHandle,
    "field"
);
runtime_handle!(
    /// Runtime-assigned handle of a registered or discovered object instance
    ObjectInstanceHandle,
    "object-instance"
);
