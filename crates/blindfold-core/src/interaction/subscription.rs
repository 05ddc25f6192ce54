//! Scoped listener registration.
//!
//! The host environment (a browser document, a test double) registers
//! process-wide listeners on request. A `Subscription` is the owned handle
//! for one registration and releases it exactly once, either explicitly or
//! when dropped.

use std::fmt;
use std::rc::Rc;

/// Groups of global listeners the controller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer-move and pointer-up, only while a drag is active.
    Drag,
    /// Key-down, for the controller's lifetime.
    Keyboard,
}

/// Environment that can attach and detach global listeners.
pub trait ListenerHost {
    fn attach(&self, kind: ListenerKind);
    fn detach(&self, kind: ListenerKind);
}

/// Host that registers nothing, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedHost;

impl ListenerHost for DetachedHost {
    fn attach(&self, _kind: ListenerKind) {}
    fn detach(&self, _kind: ListenerKind) {}
}

/// Owned registration of one listener group.
#[must_use = "dropping a subscription detaches its listeners"]
pub struct Subscription {
    host: Rc<dyn ListenerHost>,
    kind: ListenerKind,
}

impl Subscription {
    pub fn acquire(host: Rc<dyn ListenerHost>, kind: ListenerKind) -> Self {
        host.attach(kind);
        tracing::trace!(?kind, "listeners attached");
        Self { host, kind }
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Detach now. Equivalent to dropping.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.host.detach(self.kind);
        tracing::trace!(kind = ?self.kind, "listeners detached");
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
