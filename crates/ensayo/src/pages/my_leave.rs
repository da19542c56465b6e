//! My-leave page: leave list search and record read-back.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;
use crate::testdata::DateRange;

use super::PageObject;

/// One row of the leave-records table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRecord {
    /// Leave date or date range as shown
    pub date: String,
    /// Leave type (e.g. "CAN - Cancel")
    pub leave_type: String,
    /// Record status (e.g. "Pending Approval")
    pub status: String,
}

/// The Leave -> My Leave list view
#[derive(Debug)]
pub struct MyLeavePage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for MyLeavePage {
    const SECTION: &'static str = "myLeavePage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl MyLeavePage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Filter title of the list view
    pub async fn header_text(&self) -> EnsayoResult<String> {
        self.actions.read_text(&self.locator("pageHeader")?).await
    }

    /// Search leave records over a date range and wait for results
    pub async fn search(&self, range: &DateRange) -> EnsayoResult<()> {
        self.actions
            .fill_date(&self.locator("fromDateInput")?, &range.from_date)
            .await?;
        self.actions
            .fill_date(&self.locator("toDateInput")?, &range.to_date)
            .await?;
        self.actions.click(&self.locator("searchButton")?).await?;
        self.wait_for_spinner_gone().await
    }

    /// Read back the leave records currently shown. "No Records Found"
    /// yields an empty sequence, never an error.
    pub async fn leave_records(&self) -> EnsayoResult<Vec<LeaveRecord>> {
        let table = self.locators.table(Self::SECTION, "leaveRecords")?;
        let rows = self
            .actions
            .read_table(table, &["date", "type", "status"])
            .await?;
        Ok(rows
            .into_iter()
            .map(|mut cells| LeaveRecord {
                status: cells.pop().unwrap_or_default(),
                leave_type: cells.pop().unwrap_or_default(),
                date: cells.pop().unwrap_or_default(),
            })
            .collect())
    }

    /// Records matching a leave type, out of those currently shown
    pub async fn records_of_type(&self, leave_type: &str) -> EnsayoResult<Vec<LeaveRecord>> {
        Ok(self
            .leave_records()
            .await?
            .into_iter()
            .filter(|r| r.leave_type.contains(leave_type))
            .collect())
    }
}
