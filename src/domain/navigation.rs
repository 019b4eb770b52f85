use serde::Serialize;

/// Where a navigation action points. `Dashboard` is the top-level overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "phaseId", rename_all = "lowercase")]
pub enum NavTarget {
    Dashboard,
    Phase(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation already in progress")]
    Busy,
    #[error("unknown phase {0}")]
    UnknownPhase(String),
    #[error("navigation {0} is no longer pending")]
    Stale(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target already on screen; nothing to do.
    Unchanged,
    /// Entered `loading`; the caller must wait out the delay and then `complete` the ticket.
    Started(u64),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationView {
    pub displayed: NavTarget,
    pub loading: Option<NavTarget>,
    pub controls_enabled: bool,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    target: NavTarget,
    ticket: u64,
}

/// `idle -> loading(target) -> idle`, one instance per workspace.
///
/// Every load gets a fresh ticket; only the holder of the current ticket may finish it.
#[derive(Debug, Clone)]
pub struct Navigator {
    displayed: NavTarget,
    loading: Option<PendingLoad>,
    next_ticket: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            displayed: NavTarget::Dashboard,
            loading: None,
            next_ticket: 1,
        }
    }
}

impl Navigator {
    pub fn displayed_phase(&self) -> Option<&str> {
        match &self.displayed {
            NavTarget::Phase(id) => Some(id),
            NavTarget::Dashboard => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn begin(&mut self, target: NavTarget) -> Result<Transition, NavigationError> {
        if self.loading.is_some() {
            return Err(NavigationError::Busy);
        }
        if self.displayed == target {
            return Ok(Transition::Unchanged);
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.loading = Some(PendingLoad { target, ticket });
        Ok(Transition::Started(ticket))
    }

    /// Swaps the displayed view in one step and returns to idle.
    pub fn complete(&mut self, ticket: u64) -> Result<(), NavigationError> {
        match self.loading.take() {
            Some(pending) if pending.ticket == ticket => {
                self.displayed = pending.target;
                Ok(())
            }
            other => {
                self.loading = other;
                Err(NavigationError::Stale(ticket))
            }
        }
    }

    /// Back to the dashboard with nothing loading. Tickets handed out earlier stay stale.
    pub fn reset(&mut self) {
        self.displayed = NavTarget::Dashboard;
        self.loading = None;
    }

    pub fn view(&self) -> NavigationView {
        NavigationView {
            displayed: self.displayed.clone(),
            loading: self.loading.as_ref().map(|p| p.target.clone()),
            controls_enabled: !self.is_loading(),
        }
    }
}
