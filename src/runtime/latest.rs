/// Latest-request-wins guard for asynchronous results
///
/// Every request is issued as a `Ticket` naming its key and a generation
/// number. When a result comes back it is applied only if its key is still
/// the current target; otherwise it is stale and must be dropped. Results
/// may arrive in any order, nothing is cancelled.

/// Proof that a request for `key` was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Issue order of this ticket, for tracing
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The single outstanding target
#[derive(Debug, Clone)]
pub struct Latest<K> {
    target: Option<K>,
    generation: u64,
}

impl<K> Default for Latest<K> {
    fn default() -> Self {
        Self {
            target: None,
            generation: 0,
        }
    }
}

impl<K: Clone + PartialEq> Latest<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` the target, superseding any earlier ticket for another key
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.target = Some(key.clone());
        Ticket {
            key,
            generation: self.generation,
        }
    }

    pub fn target(&self) -> Option<&K> {
        self.target.as_ref()
    }

    pub fn is_target(&self, key: &K) -> bool {
        self.target.as_ref() == Some(key)
    }

    /// Drop the target; every outstanding ticket becomes stale
    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Whether a result for `ticket` may still be applied
    ///
    /// Any ticket for the current target key qualifies, so a request that
    /// was re-targeted while still in flight is not thrown away.
    pub fn accepts(&self, ticket: &Ticket<K>) -> bool {
        self.is_target(&ticket.key)
    }

    /// Accept `ticket` and clear the target, or report it stale
    pub fn settle(&mut self, ticket: &Ticket<K>) -> bool {
        if self.accepts(ticket) {
            self.target = None;
            true
        } else {
            false
        }
    }
}
