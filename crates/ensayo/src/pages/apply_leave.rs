//! Apply-leave page: the leave application form.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;
use crate::testdata::LeaveApplication;

use super::PageObject;

/// The Leave -> Apply form
#[derive(Debug)]
pub struct ApplyLeavePage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for ApplyLeavePage {
    const SECTION: &'static str = "applyLeavePage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl ApplyLeavePage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Whether the apply form is currently shown
    pub async fn is_displayed(&self) -> bool {
        match self.locator("leaveTypeDropdown") {
            Ok(dropdown) => self.actions.is_visible(&dropdown).await,
            Err(_) => false,
        }
    }

    /// Fill the whole form from a fixture and submit it.
    ///
    /// Dropdown, dates, optional comment, submit, in that order. Not
    /// atomic; a failed step leaves the form partially filled.
    pub async fn apply(&self, leave: &LeaveApplication) -> EnsayoResult<()> {
        self.actions
            .select_option(
                &self.locator("leaveTypeDropdown")?,
                &self.locator("leaveTypeOptions")?,
                &leave.leave_type,
                None,
            )
            .await?;
        self.actions
            .fill_date(&self.locator("fromDateInput")?, &leave.from_date)
            .await?;
        self.actions
            .fill_date(&self.locator("toDateInput")?, &leave.to_date)
            .await?;
        if let Some(comment) = &leave.comment {
            self.actions
                .fill(&self.locator("commentsTextarea")?, comment)
                .await?;
        }
        self.actions.click(&self.locator("applyButton")?).await
    }

    /// Wait for and read the success toast shown after submission
    pub async fn success_message(&self) -> EnsayoResult<String> {
        self.actions.read_text(&self.locator("successToast")?).await
    }
}
