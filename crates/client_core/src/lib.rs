use std::sync::Arc;

use shared::{
    domain::{ApplianceName, BrandName, CascadeLevel, IssueName, Selection},
    protocol::SolutionRequest,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod error;
pub mod lookup;
pub mod state;

pub use error::{LookupError, SessionError};
pub use lookup::{HttpLookupService, LookupService, DEFAULT_API_BASE};
pub use state::{RequestStatus, SessionState, Solution};

use state::CascadeTickets;

/// Exact text surfaced when the solution action fires with an unset field.
pub const INCOMPLETE_SELECTION_MESSAGE: &str = "Please select all fields";
/// Fallback when a solution request fails without service-provided text.
pub const SOLUTION_FALLBACK_MESSAGE: &str = "Failed to fetch solution";

#[derive(Debug, Clone)]
pub enum SessionEvent {
    BrandsLoaded(Vec<BrandName>),
    AppliancesLoaded(Vec<ApplianceName>),
    IssuesLoaded(Vec<IssueName>),
    SelectionChanged(Selection),
    SolutionReady(Solution),
    StatusChanged(RequestStatus),
}

struct ControllerInner {
    state: SessionState,
    tickets: CascadeTickets,
}

/// Owns one selection session: the cascade of brand, appliance and issue
/// choices, the fetched choice lists, and the solution request lifecycle.
/// Presentation layers either poll `snapshot` or react to `subscribe_events`.
pub struct SessionController {
    lookup: Arc<dyn LookupService>,
    inner: Mutex<ControllerInner>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(lookup: Arc<dyn LookupService>) -> Self {
        let (events, _) = broadcast::channel(1024);
        Self {
            lookup,
            inner: Mutex::new(ControllerInner {
                state: SessionState::default(),
                tickets: CascadeTickets::default(),
            }),
            events,
        }
    }

    /// Fetch the brand list. A failure lands in the session status rather
    /// than being returned; there is nothing a caller could retry differently.
    pub async fn initialize(&self) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.tickets.issue_ticket(CascadeLevel::Brand)
        };

        info!("session: loading brands");
        match self.lookup.brands().await {
            Ok(brands) => {
                let applied = self
                    .apply_if_current(CascadeLevel::Brand, ticket, |state| {
                        state.brands = brands.clone()
                    })
                    .await;
                if applied {
                    info!(count = brands.len(), "session: brands loaded");
                    let _ = self.events.send(SessionEvent::BrandsLoaded(brands));
                }
            }
            Err(err) => self.fail_list_fetch(CascadeLevel::Brand, ticket, err).await,
        }
    }

    /// Select a brand (or clear it with `None`), resetting every dependent
    /// level, then fetch the appliance list for the new brand.
    pub async fn select_brand(&self, brand: Option<BrandName>) -> Result<(), SessionError> {
        let (selection, cleared_loading, ticket) = {
            let mut inner = self.inner.lock().await;
            if let Some(brand) = &brand {
                if !inner.state.brands.contains(brand) {
                    return Err(SessionError::UnknownBrand(brand.to_string()));
                }
            }
            let cleared_loading = inner.state.status.is_loading();
            inner.state.apply_brand_selection(brand.clone());
            inner.tickets.invalidate_downstream(CascadeLevel::Brand);
            let ticket = brand
                .as_ref()
                .map(|_| inner.tickets.issue_ticket(CascadeLevel::Appliance));
            (inner.state.selection.clone(), cleared_loading, ticket)
        };

        let _ = self.events.send(SessionEvent::SelectionChanged(selection));
        if cleared_loading {
            let _ = self
                .events
                .send(SessionEvent::StatusChanged(RequestStatus::Idle));
        }

        let (Some(brand), Some(ticket)) = (brand, ticket) else {
            return Ok(());
        };

        info!(brand = %brand, "session: loading appliances");
        match self.lookup.appliances(&brand).await {
            Ok(appliances) => {
                let applied = self
                    .apply_if_current(CascadeLevel::Appliance, ticket, |state| {
                        state.appliances = appliances.clone()
                    })
                    .await;
                if applied {
                    let _ = self.events.send(SessionEvent::AppliancesLoaded(appliances));
                }
            }
            Err(err) => {
                self.fail_list_fetch(CascadeLevel::Appliance, ticket, err)
                    .await
            }
        }

        Ok(())
    }

    /// Select an appliance under the current brand, resetting the issue
    /// level, then fetch the issue list for (brand, appliance).
    pub async fn select_appliance(
        &self,
        appliance: Option<ApplianceName>,
    ) -> Result<(), SessionError> {
        let (brand, selection, cleared_loading, ticket) = {
            let mut inner = self.inner.lock().await;
            let Some(brand) = inner.state.selection.brand.clone() else {
                return Err(SessionError::BrandNotSelected);
            };
            if let Some(appliance) = &appliance {
                if !inner.state.appliances.contains(appliance) {
                    return Err(SessionError::UnknownAppliance(appliance.to_string()));
                }
            }
            let cleared_loading = inner.state.status.is_loading();
            inner.state.apply_appliance_selection(appliance.clone());
            inner.tickets.invalidate_downstream(CascadeLevel::Appliance);
            let ticket = appliance
                .as_ref()
                .map(|_| inner.tickets.issue_ticket(CascadeLevel::Issue));
            (
                brand,
                inner.state.selection.clone(),
                cleared_loading,
                ticket,
            )
        };

        let _ = self.events.send(SessionEvent::SelectionChanged(selection));
        if cleared_loading {
            let _ = self
                .events
                .send(SessionEvent::StatusChanged(RequestStatus::Idle));
        }

        let (Some(appliance), Some(ticket)) = (appliance, ticket) else {
            return Ok(());
        };

        info!(brand = %brand, appliance = %appliance, "session: loading issues");
        match self.lookup.issues(&brand, &appliance).await {
            Ok(issues) => {
                let applied = self
                    .apply_if_current(CascadeLevel::Issue, ticket, |state| {
                        state.issues = issues.clone()
                    })
                    .await;
                if applied {
                    let _ = self.events.send(SessionEvent::IssuesLoaded(issues));
                }
            }
            Err(err) => self.fail_list_fetch(CascadeLevel::Issue, ticket, err).await,
        }

        Ok(())
    }

    /// Select an issue under the current appliance. Triggers no request and
    /// leaves any shown solution in place.
    pub async fn select_issue(&self, issue: Option<IssueName>) -> Result<(), SessionError> {
        let selection = {
            let mut inner = self.inner.lock().await;
            if inner.state.selection.appliance.is_none() {
                return Err(SessionError::ApplianceNotSelected);
            }
            if let Some(issue) = &issue {
                if !inner.state.issues.contains(issue) {
                    return Err(SessionError::UnknownIssue(issue.to_string()));
                }
            }
            inner.state.apply_issue_selection(issue);
            inner.state.selection.clone()
        };
        let _ = self.events.send(SessionEvent::SelectionChanged(selection));
        Ok(())
    }

    /// Post the full selection to the lookup service. With an unset field the
    /// call short-circuits into the exact incomplete-selection error without
    /// touching the network.
    pub async fn request_solution(&self) {
        let prepared = {
            let mut inner = self.inner.lock().await;
            let selection = inner.state.selection.clone();
            match (selection.brand, selection.appliance, selection.issue) {
                (Some(brand), Some(appliance), Some(issue)) => {
                    inner.state.status = RequestStatus::Loading;
                    let ticket = inner.tickets.issue_ticket(CascadeLevel::Solution);
                    Ok((
                        SolutionRequest {
                            brand,
                            appliance,
                            issue,
                        },
                        ticket,
                    ))
                }
                _ => {
                    let status =
                        RequestStatus::Error(INCOMPLETE_SELECTION_MESSAGE.to_string());
                    inner.state.status = status.clone();
                    Err(status)
                }
            }
        };

        let (request, ticket) = match prepared {
            Ok(prepared) => prepared,
            Err(status) => {
                warn!("session: solution requested with incomplete selection");
                let _ = self.events.send(SessionEvent::StatusChanged(status));
                return;
            }
        };

        let _ = self
            .events
            .send(SessionEvent::StatusChanged(RequestStatus::Loading));
        info!(
            brand = %request.brand,
            appliance = %request.appliance,
            issue = %request.issue,
            "session: requesting solution"
        );

        match self.lookup.solution(&request).await {
            Ok(response) => {
                let solution = Solution {
                    text: response.solution,
                    brand_page: response.brand_page,
                };
                let applied = self
                    .apply_if_current(CascadeLevel::Solution, ticket, |state| {
                        state.solution = Some(solution.clone());
                        state.status = RequestStatus::Idle;
                    })
                    .await;
                if applied {
                    info!("session: solution stored");
                    let _ = self.events.send(SessionEvent::SolutionReady(solution));
                    let _ = self
                        .events
                        .send(SessionEvent::StatusChanged(RequestStatus::Idle));
                }
            }
            Err(err) => {
                let message = match err {
                    LookupError::Rejected(message) => message,
                    other => {
                        warn!(error = %other, "session: solution request failed");
                        SOLUTION_FALLBACK_MESSAGE.to_string()
                    }
                };
                let applied = self
                    .apply_if_current(CascadeLevel::Solution, ticket, |state| {
                        state.solution = None;
                        state.status = RequestStatus::Error(message.clone());
                    })
                    .await;
                if applied {
                    let _ = self
                        .events
                        .send(SessionEvent::StatusChanged(RequestStatus::Error(message)));
                }
            }
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // The state lock is never held across a lookup call: mutate and take a
    // ticket, release, await the fetch, then re-check the ticket here.
    async fn apply_if_current(
        &self,
        level: CascadeLevel,
        ticket: u64,
        apply: impl FnOnce(&mut SessionState),
    ) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.tickets.is_current(level, ticket) {
            debug!(level = ?level, ticket, "session: discarding superseded response");
            return false;
        }
        apply(&mut inner.state);
        true
    }

    async fn fail_list_fetch(&self, level: CascadeLevel, ticket: u64, err: LookupError) {
        let message = err.status_message();
        let applied = self
            .apply_if_current(level, ticket, |state| {
                state.status = RequestStatus::Error(message.clone())
            })
            .await;
        if applied {
            warn!(level = ?level, error = %message, "session: choice list fetch failed");
            let _ = self
                .events
                .send(SessionEvent::StatusChanged(RequestStatus::Error(message)));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
