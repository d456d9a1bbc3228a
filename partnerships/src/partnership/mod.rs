//! Partnership lifecycle
//!
//! The status state machine and the registry that owns every partnership
//! record.

pub mod registry;
pub mod status;

pub use registry::PartnershipRegistry;
pub use status::{
    PartnershipStatus, RemovalKind, StatusEvent, Transition, TransitionError, transition,
};
