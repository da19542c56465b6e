//! Timesheet page: time entry with project/activity selection.
//!
//! The project autocomplete is the slowest widget in the application;
//! its option list shows a searching placeholder for a while before the
//! real suggestions arrive. Selection goes through the bounded dropdown
//! polling in [`PageActions::select_option`].

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::{Locator, LocatorStore};
use crate::result::EnsayoResult;

use super::PageObject;

/// The Time module's my-timesheet view
#[derive(Debug)]
pub struct TimesheetPage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for TimesheetPage {
    const SECTION: &'static str = "timesheetPage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl TimesheetPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Navigate Timesheets -> My Timesheets and wait for the view
    pub async fn open_my_timesheet(&self) -> EnsayoResult<()> {
        self.actions
            .click(&self.locator("timesheetsSubmenu")?)
            .await?;
        self.actions
            .click(&self.locator("myTimesheetsLink")?)
            .await?;
        self.wait_for_spinner_gone().await?;
        self.actions.wait_for(&self.locator("timesheetHeader")?).await
    }

    /// Put the current timesheet into edit mode
    pub async fn start_edit(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("editButton")?).await?;
        self.wait_for_spinner_gone().await
    }

    /// Add a timesheet row: pick a project from the autocomplete, an
    /// activity from the dropdown, then enter hours per day.
    pub async fn add_entry(
        &self,
        project: &str,
        activity: &str,
        daily_hours: &[&str],
    ) -> EnsayoResult<()> {
        self.actions
            .select_option(
                &self.locator("projectInput")?,
                &self.locator("projectOptions")?,
                project,
                Some(project),
            )
            .await?;
        self.actions
            .select_option(
                &self.locator("activityDropdown")?,
                &self.locator("activityOptions")?,
                activity,
                None,
            )
            .await?;
        let hours_base = self.locator("hoursInputs")?;
        for (day, hours) in daily_hours.iter().enumerate() {
            let cell = Locator::new(
                format!("hours-day-{}", day + 1),
                format!("{}:nth-of-type({})", hours_base.selector, day + 1),
            );
            self.actions.fill(&cell, hours).await?;
        }
        Ok(())
    }

    /// Save the timesheet and wait for the page to settle
    pub async fn save(&self) -> EnsayoResult<()> {
        self.actions.click(&self.locator("saveButton")?).await?;
        self.wait_for_spinner_gone().await
    }

    /// Wait for and read the shared toast after saving
    pub async fn toast_message(&self) -> EnsayoResult<String> {
        self.actions
            .read_text(&self.shared_locator("common", "toast")?)
            .await
    }
}
