use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared::ObjectId;

use super::InstanceHandle;

/// Uid snapshot for one tracked key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UuidInfo {
    /// Latest registered uid (empty when never registered)
    pub current: String,
    /// Uid seen right before the last detected change
    pub previous: Option<String>,
    pub changed: bool,
}

/// One tracking lane: current/previous handles and uids per key, plus the
/// set of owner ids flagged as changed.
///
/// Keys are either a plain object id or an `"{id}-{type}"` compound key; the
/// changed-set is always keyed by object id.
#[derive(Debug, Default)]
pub(crate) struct InstanceLane {
    current: HashMap<String, InstanceHandle>,
    previous: HashMap<String, InstanceHandle>,
    uuids: HashMap<String, String>,
    previous_uuids: HashMap<String, String>,
    changed: HashSet<ObjectId>,
}

impl InstanceLane {
    /// Record `handle` (and `uuid`, when the primitive carries one) for `key`.
    /// Returns whether either differs from what was registered before.
    pub(crate) fn register(
        &mut self,
        key: &str,
        owner: &str,
        handle: InstanceHandle,
        uuid: Option<&str>,
    ) -> bool {
        let mut changed = false;

        if let Some(prev) = self.current.insert(key.to_string(), handle) {
            if prev != handle {
                self.previous.insert(key.to_string(), prev);
                changed = true;
            }
        }

        if let Some(uuid) = uuid {
            if let Some(prev) = self.uuids.insert(key.to_string(), uuid.to_string()) {
                if prev != uuid {
                    self.previous_uuids.insert(key.to_string(), prev);
                    changed = true;
                }
            }
        }

        if changed {
            self.changed.insert(owner.to_string());
        }
        changed
    }

    pub(crate) fn current(&self, key: &str) -> Option<InstanceHandle> {
        self.current.get(key).copied()
    }

    pub(crate) fn previous(&self, key: &str) -> Option<InstanceHandle> {
        self.previous.get(key).copied()
    }

    pub(crate) fn is_changed(&self, owner: &str) -> bool {
        self.changed.contains(owner)
    }

    pub(crate) fn uuid_info(&self, key: &str, owner: &str) -> UuidInfo {
        UuidInfo {
            current: self.uuids.get(key).cloned().unwrap_or_default(),
            previous: self.previous_uuids.get(key).cloned(),
            changed: self.is_changed(owner),
        }
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &String> {
        self.current.keys()
    }

    /// Forget previous values and changed flags, keep the current baseline
    pub(crate) fn clear_changes(&mut self) {
        self.previous.clear();
        self.previous_uuids.clear();
        self.changed.clear();
    }
}
