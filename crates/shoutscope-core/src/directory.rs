//! Peer directory: last known display name per peer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::PeerId;

/// Best-effort naming cache, filled from observed network events
///
/// Entries are upserted and never removed; a peer that leaves the overlay
/// keeps its last known name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerDirectory {
    names: BTreeMap<PeerId, String>,
}

impl PeerDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known name of a peer, `None` if no event from it was observed
    pub fn lookup(&self, peer_id: &PeerId) -> Option<&str> {
        self.names.get(peer_id).map(String::as_str)
    }

    /// Record the name carried by an event; last write wins
    ///
    /// Returns `true` when the directory changed.
    pub fn upsert(&mut self, peer_id: PeerId, name: impl Into<String>) -> bool {
        let name = name.into();
        match self.names.get_mut(&peer_id) {
            Some(existing) if *existing == name => false,
            Some(existing) => {
                *existing = name;
                true
            }
            None => {
                self.names.insert(peer_id, name);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries ordered by peer id
    pub fn iter(&self) -> impl Iterator<Item = (&PeerId, &str)> {
        self.names.iter().map(|(id, name)| (id, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_before_any_event_is_unknown() {
        let directory = PeerDirectory::new();
        assert_eq!(directory.lookup(&PeerId::from("P1")), None);
        assert!(directory.is_empty());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut directory = PeerDirectory::new();
        assert!(directory.upsert(PeerId::from("P1"), "Alice"));
        let before = directory.clone();

        assert!(!directory.upsert(PeerId::from("P1"), "Alice"));
        assert_eq!(directory, before);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let mut directory = PeerDirectory::new();
        directory.upsert(PeerId::from("P1"), "Alice");
        assert!(directory.upsert(PeerId::from("P1"), "Alicia"));

        assert_eq!(directory.lookup(&PeerId::from("P1")), Some("Alicia"));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_iter_is_ordered_by_peer_id() {
        let mut directory = PeerDirectory::new();
        directory.upsert(PeerId::from("b"), "Bob");
        directory.upsert(PeerId::from("a"), "Alice");

        let ids: Vec<&str> = directory.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
