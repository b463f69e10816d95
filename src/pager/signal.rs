use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::scroll::{OnVisible, ProximityWatcher, Sentinel, Subscription};

#[derive(Default)]
struct Slot {
    next_id: u64,
    armed: Option<Armed>,
}

struct Armed {
    id: u64,
    sentinel: Sentinel,
    on_visible: OnVisible,
}

/// A [`ProximityWatcher`] for hosts that detect sentinel visibility themselves and push it in
/// with [`SentinelSignal::notify_visible`]. Holds at most one observation; observing again
/// replaces it.
#[derive(Clone, Default)]
pub struct SentinelSignal {
    slot: Arc<Mutex<Slot>>,
}

impl SentinelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report the sentinel as visible. Returns `false` when nothing is being observed.
    pub fn notify_visible(&self) -> bool {
        let callback = self.slot().armed.as_ref().map(|a| Arc::clone(&a.on_visible));
        match callback {
            Some(on_visible) => {
                on_visible();
                true
            }
            None => false,
        }
    }

    pub fn armed_sentinel(&self) -> Option<Sentinel> {
        self.slot().armed.as_ref().map(|a| a.sentinel)
    }
}

impl ProximityWatcher for SentinelSignal {
    fn observe(&self, sentinel: Sentinel, on_visible: OnVisible) -> Subscription {
        let id = {
            let mut slot = self.slot();
            let id = slot.next_id;
            slot.next_id += 1;
            slot.armed = Some(Armed {
                id,
                sentinel,
                on_visible,
            });
            id
        };

        let slot = Arc::clone(&self.slot);
        Subscription::new(move || {
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.armed.as_ref().is_some_and(|a| a.id == id) {
                slot.armed = None;
            }
        })
    }
}
