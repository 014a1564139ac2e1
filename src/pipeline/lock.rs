// ABOUTME: Per-workload lock to serialize runs that target the same name.
// ABOUTME: In-process only; runs on different names proceed in parallel.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::Action;
use crate::types::WorkloadName;

/// Information about who holds a workload lock.
#[derive(Debug, Clone)]
pub struct LockInfo {
    pub action: Action,
    pub started_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            started_at: Utc::now(),
        }
    }
}

type Slot = Arc<AsyncMutex<Option<LockInfo>>>;

/// Slot per name plus how many holders and waiters claim it.
type SlotTable = Arc<Mutex<HashMap<WorkloadName, (Slot, usize)>>>;

/// Lock table keyed by workload name.
///
/// Cloning shares the table. Entries are dropped once nobody holds or waits
/// on them.
#[derive(Debug, Clone, Default)]
pub struct WorkloadLocks {
    slots: SlotTable,
}

impl WorkloadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `name`.
    ///
    /// Dropping the returned future while it waits leaves the table as if the
    /// call never happened.
    pub async fn acquire(&self, name: &WorkloadName, action: Action) -> WorkloadGuard {
        let claim = Claim::new(&self.slots, name);

        let mut guard = match claim.slot.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::info!("waiting for in-flight run on {}", name);
                claim.slot.clone().lock_owned().await
            }
        };
        *guard = Some(LockInfo::new(action));
        tracing::debug!("acquired lock on {} for {}", name, action);

        WorkloadGuard {
            guard: Some(guard),
            claim,
        }
    }

    /// Number of names currently held or waited on.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One holder's or waiter's reference to a name's slot.
///
/// The last claim to go removes the table entry.
struct Claim {
    name: WorkloadName,
    slots: SlotTable,
    slot: Slot,
}

impl Claim {
    fn new(slots: &SlotTable, name: &WorkloadName) -> Self {
        let slot = {
            let mut table = slots.lock();
            let (slot, claims) = table.entry(name.clone()).or_default();
            *claims += 1;
            Arc::clone(slot)
        };
        Self {
            name: name.clone(),
            slots: Arc::clone(slots),
            slot,
        }
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        let last = match slots.get_mut(&self.name) {
            Some((_, claims)) => {
                *claims -= 1;
                *claims == 0
            }
            None => false,
        };
        if last {
            slots.remove(&self.name);
        }
    }
}

/// A held workload lock that releases on drop.
pub struct WorkloadGuard {
    guard: Option<OwnedMutexGuard<Option<LockInfo>>>,
    claim: Claim,
}

impl std::fmt::Debug for WorkloadGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkloadGuard")
            .field("name", &self.claim.name)
            .finish()
    }
}

impl WorkloadGuard {
    pub fn name(&self) -> &WorkloadName {
        &self.claim.name
    }

    pub fn info(&self) -> Option<&LockInfo> {
        self.guard.as_deref().and_then(Option::as_ref)
    }
}

impl Drop for WorkloadGuard {
    fn drop(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            if let Some(info) = guard.take() {
                let held = Utc::now() - info.started_at;
                tracing::debug!(
                    "released lock on {} after {}ms",
                    self.claim.name,
                    held.num_milliseconds()
                );
            }
        }
    }
}
