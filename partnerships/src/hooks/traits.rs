//! Traits for outbound notification hooks.
//!
//! Hooks are how the engine talks to the outside world: semantic
//! notifications for the operator and deltas for the global pending badge.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use partnerships::hooks::{Notification, NotificationHook};
//!
//! #[derive(Debug)]
//! struct LoggingHook;
//!
//! #[async_trait]
//! impl NotificationHook for LoggingHook {
//!     async fn on_notify(&self, notification: &Notification) {
//!         println!("{:?}: {:?}", notification.level, notification.event);
//!     }
//! }
//! ```

use super::notification::Notification;
use async_trait::async_trait;

/// Receiver for notifications and badge updates
///
/// Every method has a no-op default, so a hook only implements what it
/// cares about.
///
/// # Hook Execution
///
/// - Hooks are executed in priority order (higher priority first)
/// - Each call runs under a timeout; a hook that times out is logged and
///   skipped, never failing the operation that triggered it
#[async_trait]
pub trait NotificationHook: Send + Sync + std::fmt::Debug {
    /// Called with every notification the engine emits
    async fn on_notify(&self, notification: &Notification) {
        let _ = notification;
    }

    /// Called when the global pending-request count changes by `delta`
    async fn on_badge_update(&self, delta: i64) {
        let _ = delta;
    }

    /// Priority of this hook (higher = runs first). Default is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Timeout for each call, in milliseconds
    ///
    /// `None` uses the registry's default timeout.
    fn timeout_ms(&self) -> Option<u64> {
        None
    }

    /// A descriptive name for this hook, used in logs
    fn name(&self) -> &str {
        "anonymous_hook"
    }
}
