//! Per-scenario context.
//!
//! Everything a step body needs: the session-bound action primitives,
//! shared configuration, locators and fixtures, plus a small scratch
//! area for state captured mid-scenario (e.g. the leave application
//! that was just submitted). Lives for exactly one scenario.

use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::actions::PageActions;
use crate::config::RunConfig;
use crate::locator::LocatorStore;
use crate::pages::{
    AdminPage, ApplyLeavePage, DashboardPage, LoginPage, MyLeavePage, RecruitmentPage,
    TimesheetPage,
};
use crate::session::Session;
use crate::testdata::{LeaveApplication, TestData};

/// State shared with the step body of one scenario
pub struct ScenarioContext {
    session_id: Uuid,
    actions: PageActions,
    config: Arc<RunConfig>,
    locators: Arc<LocatorStore>,
    data: Arc<TestData>,
    applied_leave: Mutex<Option<LeaveApplication>>,
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Build a context around an acquired session
    #[must_use]
    pub fn new(
        session: &Session,
        config: Arc<RunConfig>,
        locators: Arc<LocatorStore>,
        data: Arc<TestData>,
    ) -> Self {
        Self {
            session_id: session.id,
            actions: PageActions::new(session, config.timeouts),
            config,
            locators,
            data,
            applied_leave: Mutex::new(None),
        }
    }

    /// Id of the session this scenario runs in
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Session-bound action primitives
    #[must_use]
    pub const fn actions(&self) -> &PageActions {
        &self.actions
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Locator store
    #[must_use]
    pub fn locators(&self) -> &Arc<LocatorStore> {
        &self.locators
    }

    /// Fixture data
    #[must_use]
    pub fn data(&self) -> &TestData {
        &self.data
    }

    /// Remember the leave application just submitted, for later steps
    pub fn remember_leave(&self, leave: LeaveApplication) {
        *self
            .applied_leave
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(leave);
    }

    /// The leave application submitted earlier in this scenario, if any
    #[must_use]
    pub fn applied_leave(&self) -> Option<LeaveApplication> {
        self.applied_leave
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Login page bound to this session
    #[must_use]
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(
            self.actions.clone(),
            Arc::clone(&self.locators),
            self.config.base_url.clone(),
        )
    }

    /// Dashboard page bound to this session
    #[must_use]
    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.actions.clone(), Arc::clone(&self.locators))
    }

    /// Admin page bound to this session
    #[must_use]
    pub fn admin_page(&self) -> AdminPage {
        AdminPage::new(self.actions.clone(), Arc::clone(&self.locators))
    }

    /// Apply-leave page bound to this session
    #[must_use]
    pub fn apply_leave_page(&self) -> ApplyLeavePage {
        ApplyLeavePage::new(self.actions.clone(), Arc::clone(&self.locators))
    }

    /// My-leave page bound to this session
    #[must_use]
    pub fn my_leave_page(&self) -> MyLeavePage {
        MyLeavePage::new(self.actions.clone(), Arc::clone(&self.locators))
    }

    /// Recruitment page bound to this session
    #[must_use]
    pub fn recruitment_page(&self) -> RecruitmentPage {
        RecruitmentPage::new(self.actions.clone(), Arc::clone(&self.locators))
    }

    /// Timesheet page bound to this session
    #[must_use]
    pub fn timesheet_page(&self) -> TimesheetPage {
        TimesheetPage::new(self.actions.clone(), Arc::clone(&self.locators))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::session::{DriverFactory, MockFactory, SessionManager};

    async fn context() -> ScenarioContext {
        let factory: Arc<dyn DriverFactory> = Arc::new(MockFactory::new());
        let manager = SessionManager::new(crate::config::BrowserSettings::default(), factory);
        let session = manager.acquire().await.unwrap();
        ScenarioContext::new(
            &session,
            Arc::new(RunConfig::default()),
            Arc::new(LocatorStore::orangehrm_defaults()),
            Arc::new(TestData::orangehrm_defaults()),
        )
    }

    #[tokio::test]
    async fn test_applied_leave_scratch_state() {
        let ctx = context().await;
        assert!(ctx.applied_leave().is_none());
        let leave = ctx.data().leave_application("casualLeave").unwrap().clone();
        ctx.remember_leave(leave.clone());
        assert_eq!(ctx.applied_leave(), Some(leave));
    }

    #[tokio::test]
    async fn test_page_accessors_share_the_session() {
        let ctx = context().await;
        // Construction alone must not touch the page
        let _ = ctx.login_page();
        let _ = ctx.dashboard_page();
        let _ = ctx.timesheet_page();
        assert!(!ctx.session_id().is_nil());
    }
}
