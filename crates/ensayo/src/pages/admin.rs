//! Admin page: system user search and record read-back.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;

use super::PageObject;

/// One row of the system-users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Login username
    pub username: String,
    /// User role (e.g. "Admin", "ESS")
    pub role: String,
    /// Enabled/disabled status
    pub status: String,
}

/// The Admin module's user-management view
#[derive(Debug)]
pub struct AdminPage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for AdminPage {
    const SECTION: &'static str = "adminPage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl AdminPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Page breadcrumb text
    pub async fn header_text(&self) -> EnsayoResult<String> {
        self.actions.read_text(&self.locator("pageHeader")?).await
    }

    /// Search system users by username and wait for results to settle
    pub async fn search_user(&self, username: &str) -> EnsayoResult<()> {
        self.actions
            .fill(&self.locator("usernameInput")?, username)
            .await?;
        self.actions.click(&self.locator("searchButton")?).await?;
        self.wait_for_spinner_gone().await
    }

    /// Read back the user records currently shown. An empty result set
    /// yields an empty sequence.
    pub async fn user_records(&self) -> EnsayoResult<Vec<UserRecord>> {
        let table = self.locators.table(Self::SECTION, "userRecords")?;
        let rows = self
            .actions
            .read_table(table, &["username", "role", "status"])
            .await?;
        Ok(rows
            .into_iter()
            .map(|mut cells| UserRecord {
                status: cells.pop().unwrap_or_default(),
                role: cells.pop().unwrap_or_default(),
                username: cells.pop().unwrap_or_default(),
            })
            .collect())
    }
}
