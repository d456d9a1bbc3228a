//! Outbound notification hooks
//!
//! The engine never renders anything. Operator-facing feedback leaves the
//! crate as [`Notification`] values and global badge deltas, delivered to
//! every registered [`NotificationHook`].
//!
//! # Architecture
//!
//! - `notification.rs`: semantic notification payloads
//! - `traits.rs`: the `NotificationHook` trait
//! - `registry.rs`: `HookRegistry` for registration, ordering and timeouts

pub mod notification;
pub mod registry;
pub mod traits;

pub use notification::{Notification, NotificationEvent, NotifyLevel, Operation};
pub use registry::HookRegistry;
pub use traits::NotificationHook;
