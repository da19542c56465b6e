//! Dashboard page: post-login landing view and main-menu navigation.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;

use super::PageObject;

/// The dashboard and its main menu
#[derive(Debug)]
pub struct DashboardPage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for DashboardPage {
    const SECTION: &'static str = "dashboardPage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl DashboardPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Breadcrumb header text ("Dashboard" after a successful login)
    pub async fn header_text(&self) -> EnsayoResult<String> {
        self.actions
            .read_text(&self.locator("dashboardHeader")?)
            .await
    }

    /// Whether the dashboard is currently shown
    pub async fn is_displayed(&self) -> bool {
        match self.locator("mainMenuItems") {
            Ok(menu) => self.actions.is_visible(&menu).await,
            Err(_) => false,
        }
    }

    /// Open the Leave module from the main menu
    pub async fn go_to_leave(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("leaveMenu")?).await
    }

    /// Open the Admin module from the main menu
    pub async fn go_to_admin(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("adminMenu")?).await
    }

    /// Open the Time module from the main menu
    pub async fn go_to_time(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("timeMenu")?).await
    }

    /// Open the Recruitment module from the main menu
    pub async fn go_to_recruitment(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("recruitmentMenu")?).await
    }

    /// Navigate Leave -> Apply
    pub async fn open_apply_leave(&self) -> EnsayoResult<()> {
        self.go_to_leave().await?;
        self.actions
            .click(&self.shared_locator("leaveMenu", "applyLink")?)
            .await
    }

    /// Navigate Leave -> My Leave
    pub async fn open_my_leave(&self) -> EnsayoResult<()> {
        self.go_to_leave().await?;
        self.actions
            .click(&self.shared_locator("leaveMenu", "myLeaveLink")?)
            .await
    }

    /// Log out through the user dropdown
    pub async fn logout(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("userDropdown")?).await?;
        self.actions.click(&self.locator("logoutOption")?).await
    }
}
