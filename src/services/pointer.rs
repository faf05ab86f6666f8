//! Global pointer-down notifications with per-timer scoped listeners

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, Weak,
    },
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Inside the configuration overlay of a task's timer
    TimerMenu { task_id: String },
    /// On the clock button that opens a task's timer menu
    TimerTrigger { task_id: String },
    /// Anywhere else
    Elsewhere,
}

impl PointerTarget {
    /// Whether this target is part of the given task's timer control
    pub fn belongs_to(&self, task_id: &str) -> bool {
        match self {
            Self::TimerMenu { task_id: id } | Self::TimerTrigger { task_id: id } => id == task_id,
            Self::Elsewhere => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerDown {
    pub target: PointerTarget,
}

type PointerHandler = Box<dyn FnMut(&PointerDown) + Send>;

type Registry = Mutex<BTreeMap<u64, (String, PointerHandler)>>;

/// Source of pointer-down events. Every registered handler runs before
/// `publish` returns.
#[derive(Clone, Default)]
pub struct PointerEvents {
    handlers: Arc<Registry>,
    next_id: Arc<AtomicU64>,
}

impl PointerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every listener, returning how many received it
    pub fn publish(&self, event: PointerDown) -> usize {
        let mut handlers = match self.handlers.lock() {
            Ok(handlers) => handlers,
            Err(e) => {
                error!("Failed to lock pointer listeners: {}", e);
                return 0;
            }
        };
        for (name, handler) in handlers.values_mut() {
            debug!("Delivering pointer-down to {}", name);
            handler(&event);
        }
        handlers.len()
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.handlers.lock().map(|handlers| handlers.len()).unwrap_or(0)
    }

    /// Register `handler` until the returned guard is dropped
    pub fn subscribe_scoped<F>(&self, name: String, handler: F) -> PointerSubscription
    where
        F: FnMut(&PointerDown) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.handlers.lock() {
            Ok(mut handlers) => {
                debug!("Registered pointer listener for {}", name);
                handlers.insert(id, (name, Box::new(handler)));
            }
            Err(e) => error!("Failed to register pointer listener for {}: {}", name, e),
        }

        PointerSubscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }
}

impl std::fmt::Debug for PointerEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Listener registration; removed on drop
#[derive(Debug)]
pub struct PointerSubscription {
    id: u64,
    handlers: Weak<Registry>,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        let Some(handlers) = self.handlers.upgrade() else {
            return;
        };
        match handlers.lock() {
            Ok(mut handlers) => {
                if let Some((name, _)) = handlers.remove(&self.id) {
                    debug!("Removed pointer listener for {}", name);
                }
            }
            Err(e) => error!("Failed to remove pointer listener {}: {}", self.id, e),
        };
    }
}
