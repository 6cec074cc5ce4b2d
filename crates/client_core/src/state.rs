use shared::domain::{ApplianceName, BrandName, CascadeLevel, IssueName, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub text: String,
    pub brand_page: Option<String>,
}

/// Everything a presentation layer needs to render one selection session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub brands: Vec<BrandName>,
    pub appliances: Vec<ApplianceName>,
    pub issues: Vec<IssueName>,
    pub selection: Selection,
    pub solution: Option<Solution>,
    pub status: RequestStatus,
}

impl SessionState {
    pub(crate) fn apply_brand_selection(&mut self, brand: Option<BrandName>) {
        self.selection.set_brand(brand);
        self.appliances.clear();
        self.issues.clear();
        self.solution = None;
        self.clear_abandoned_loading();
    }

    pub(crate) fn apply_appliance_selection(&mut self, appliance: Option<ApplianceName>) {
        self.selection.set_appliance(appliance);
        self.issues.clear();
        self.solution = None;
        self.clear_abandoned_loading();
    }

    pub(crate) fn apply_issue_selection(&mut self, issue: Option<IssueName>) {
        self.selection.set_issue(issue);
    }

    // A cascade change supersedes any in-flight solution request; its
    // response will be discarded, so the loading flag must not outlive it.
    // An existing error text stays visible until the next solution attempt.
    fn clear_abandoned_loading(&mut self) {
        if self.status.is_loading() {
            self.status = RequestStatus::Idle;
        }
    }
}

/// Per-level monotonic sequence numbers. A fetch holds the ticket it was
/// issued; its response is applied only while that ticket is still the
/// newest for its level, so a superseded response can never win.
#[derive(Debug, Default)]
pub(crate) struct CascadeTickets {
    brand: u64,
    appliance: u64,
    issue: u64,
    solution: u64,
}

impl CascadeTickets {
    pub(crate) fn issue_ticket(&mut self, level: CascadeLevel) -> u64 {
        let slot = self.slot(level);
        *slot += 1;
        *slot
    }

    pub(crate) fn invalidate_downstream(&mut self, level: CascadeLevel) {
        for downstream in level.downstream() {
            *self.slot(*downstream) += 1;
        }
    }

    pub(crate) fn is_current(&self, level: CascadeLevel, ticket: u64) -> bool {
        self.current(level) == ticket
    }

    fn slot(&mut self, level: CascadeLevel) -> &mut u64 {
        match level {
            CascadeLevel::Brand => &mut self.brand,
            CascadeLevel::Appliance => &mut self.appliance,
            CascadeLevel::Issue => &mut self.issue,
            CascadeLevel::Solution => &mut self.solution,
        }
    }

    fn current(&self, level: CascadeLevel) -> u64 {
        match level {
            CascadeLevel::Brand => self.brand,
            CascadeLevel::Appliance => self.appliance,
            CascadeLevel::Issue => self.issue,
            CascadeLevel::Solution => self.solution,
        }
    }
}
