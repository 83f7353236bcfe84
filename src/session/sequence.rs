//! Last-issued-wins bookkeeping for overlapping refreshes.
//!
//! Every refresh takes a ticket before its network call starts. When the
//! results come back they are only applied if no newer ticket for the same
//! resource was issued in the meantime, so a slow early response can never
//! overwrite a later one.

/// Data a refresh can race over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Recipes,
    Lines,
}

/// Opaque token tied to one issued refresh of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    serial: u64,
}

/// What became of a completed refresh when its results were offered back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Superseded,
}

impl RefreshOutcome {
    pub fn applied(self) -> bool {
        matches!(self, RefreshOutcome::Applied)
    }
}

#[derive(Debug, Default)]
pub struct SequenceTracker {
    recipes: u64,
    lines: u64,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the ticket for a refresh that is about to start. Issuing
    /// supersedes every outstanding ticket for the same resource.
    pub fn issue(&mut self, resource: Resource) -> Ticket {
        let counter = self.counter_mut(resource);
        *counter += 1;
        Ticket {
            resource,
            serial: *counter,
        }
    }

    /// True while no newer ticket for the ticket's resource exists.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counter(ticket.resource) == ticket.serial
    }

    fn counter(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Recipes => self.recipes,
            Resource::Lines => self.lines,
        }
    }

    fn counter_mut(&mut self, resource: Resource) -> &mut u64 {
        match resource {
            Resource::Recipes => &mut self.recipes,
            Resource::Lines => &mut self.lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let mut tracker = SequenceTracker::new();
        let first = tracker.issue(Resource::Lines);
        let second = tracker.issue(Resource::Lines);

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn resources_are_tracked_independently() {
        let mut tracker = SequenceTracker::new();
        let lines = tracker.issue(Resource::Lines);
        let recipes = tracker.issue(Resource::Recipes);

        assert!(tracker.is_current(lines));
        assert!(tracker.is_current(recipes));

        tracker.issue(Resource::Recipes);
        assert!(tracker.is_current(lines));
        assert!(!tracker.is_current(recipes));
    }
}
