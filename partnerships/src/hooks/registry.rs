//! Hook registry for outbound notifications
//!
//! The registry keeps hooks sorted by priority and runs each one under a
//! timeout. A slow hook is logged and skipped; it never fails the
//! operation that produced the notification.

use super::notification::Notification;
use super::traits::NotificationHook;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Entry in the hook registry
#[derive(Debug)]
struct HookEntry {
    hook: Arc<dyn NotificationHook>,
    priority: i32,
}

/// Registry for notification hooks
///
/// Cloning the registry shares the underlying hook list.
#[derive(Debug, Clone)]
pub struct HookRegistry {
    /// Registered hooks, kept sorted by priority (highest first)
    hooks: Arc<RwLock<Vec<HookEntry>>>,
    default_timeout: Duration,
}

impl HookRegistry {
    /// Create a new empty hook registry
    pub fn new() -> Self {
        Self::with_default_timeout_ms(DEFAULT_TIMEOUT_MS)
    }

    /// Create an empty registry whose hooks time out after `timeout_ms` unless they say otherwise
    pub fn with_default_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            hooks: Arc::new(RwLock::new(Vec::new())),
            default_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Register a new hook
    pub async fn register(&self, hook: Arc<dyn NotificationHook>) {
        let priority = hook.priority();
        let name = hook.name().to_string();
        let mut hooks = self.hooks.write().await;

        hooks.push(HookEntry { hook, priority });
        hooks.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.hook.name().cmp(b.hook.name()))
        });

        debug!("Hook registered: {} (priority: {})", name, priority);
    }

    /// Remove every hook with the given name; returns whether any was removed
    pub async fn unregister(&self, name: &str) -> bool {
        let mut hooks = self.hooks.write().await;
        let before = hooks.len();
        hooks.retain(|entry| entry.hook.name() != name);
        let removed = hooks.len() != before;
        if removed {
            debug!("Hook unregistered: {}", name);
        }
        removed
    }

    fn timeout_for(&self, hook: &dyn NotificationHook) -> Duration {
        hook.timeout_ms()
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout)
    }

    /// Deliver a notification to every hook in priority order
    pub async fn notify(&self, notification: &Notification) {
        let hooks = self.hooks.read().await;
        for entry in hooks.iter() {
            let hook = entry.hook.as_ref();
            run_guarded(
                hook.name(),
                "notify",
                self.timeout_for(hook),
                hook.on_notify(notification),
            )
            .await;
        }
    }

    /// Deliver a global pending-count delta; a zero delta is not delivered
    pub async fn update_badge(&self, delta: i64) {
        if delta == 0 {
            return;
        }
        let hooks = self.hooks.read().await;
        for entry in hooks.iter() {
            let hook = entry.hook.as_ref();
            run_guarded(
                hook.name(),
                "badge_update",
                self.timeout_for(hook),
                hook.on_badge_update(delta),
            )
            .await;
        }
    }

    /// Get the number of registered hooks
    pub async fn hook_count(&self) -> usize {
        self.hooks.read().await.len()
    }

    /// Clear all registered hooks
    pub async fn clear(&self) {
        self.hooks.write().await.clear();
        debug!("All hooks cleared from registry");
    }

    /// Hook names and priorities in execution order
    pub async fn list_hooks(&self) -> Vec<(String, i32)> {
        self.hooks
            .read()
            .await
            .iter()
            .map(|entry| (entry.hook.name().to_string(), entry.priority))
            .collect()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_guarded<F>(name: &str, call: &str, timeout: Duration, future: F)
where
    F: Future<Output = ()>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(()) => debug!(hook = name, call, "Hook completed"),
        Err(_) => warn!(
            hook = name,
            call,
            timeout_ms = timeout.as_millis() as u64,
            "Hook timed out"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::notification::NotificationEvent;
    use crate::models::PartnershipId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, AtomicU32, Ordering::SeqCst};

    #[derive(Debug)]
    struct TestHook {
        name: &'static str,
        calls: Arc<AtomicU32>,
        badge: Arc<AtomicI64>,
        priority: i32,
    }

    impl TestHook {
        fn new(name: &'static str, priority: i32) -> Self {
            Self {
                name,
                calls: Arc::new(AtomicU32::new(0)),
                badge: Arc::new(AtomicI64::new(0)),
                priority,
            }
        }
    }

    #[async_trait]
    impl NotificationHook for TestHook {
        async fn on_notify(&self, _notification: &Notification) {
            self.calls.fetch_add(1, SeqCst);
        }

        async fn on_badge_update(&self, delta: i64) {
            self.badge.fetch_add(delta, SeqCst);
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[derive(Debug)]
    struct SlowHook;

    #[async_trait]
    impl NotificationHook for SlowHook {
        async fn on_notify(&self, _notification: &Notification) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        fn timeout_ms(&self) -> Option<u64> {
            Some(10)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn sample() -> Notification {
        Notification::info(NotificationEvent::NoChanges {
            partnership_id: PartnershipId(1),
        })
    }

    #[tokio::test]
    async fn test_hook_registration() {
        let registry = HookRegistry::new();
        assert_eq!(registry.hook_count().await, 0);

        registry.register(Arc::new(TestHook::new("a", 0))).await;
        assert_eq!(registry.hook_count().await, 1);

        assert!(registry.unregister("a").await);
        assert!(!registry.unregister("a").await);
        assert_eq!(registry.hook_count().await, 0);
    }

    #[tokio::test]
    async fn test_hook_priority_ordering() {
        let registry = HookRegistry::new();
        registry.register(Arc::new(TestHook::new("low", 5))).await;
        registry.register(Arc::new(TestHook::new("high", 10))).await;

        let hooks = registry.list_hooks().await;
        assert_eq!(hooks[0], ("high".to_string(), 10));
        assert_eq!(hooks[1], ("low".to_string(), 5));
    }

    #[tokio::test]
    async fn test_notify_and_badge_delivery() {
        let registry = HookRegistry::new();
        let hook = Arc::new(TestHook::new("counter", 0));
        let calls = hook.calls.clone();
        let badge = hook.badge.clone();
        registry.register(hook).await;

        registry.notify(&sample()).await;
        registry.update_badge(3).await;
        registry.update_badge(0).await;
        registry.update_badge(-1).await;

        assert_eq!(calls.load(SeqCst), 1);
        assert_eq!(badge.load(SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_hook_does_not_block_others() {
        let registry = HookRegistry::new();
        let hook = Arc::new(TestHook::new("after", -1));
        let calls = hook.calls.clone();
        registry.register(Arc::new(SlowHook)).await;
        registry.register(hook).await;

        registry.notify(&sample()).await;
        assert_eq!(calls.load(SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_hooks() {
        let registry = HookRegistry::new();
        registry.register(Arc::new(TestHook::new("a", 0))).await;
        registry.clear().await;
        assert_eq!(registry.hook_count().await, 0);
    }
}
