//! Page objects for the HR application under test.
//!
//! Composition over inheritance: every page object holds a
//! [`PageActions`](crate::actions::PageActions) capability and resolves
//! its selectors from the shared locator store by symbolic name. A
//! composite intent runs its primitives in a fixed order and is not
//! atomic; on failure the page stays as the browser left it.

use crate::actions::PageActions;
use crate::locator::{Locator, LocatorStore};
use crate::result::EnsayoResult;

mod admin;
mod apply_leave;
mod dashboard;
mod login;
mod my_leave;
mod recruitment;
mod timesheet;

pub use admin::{AdminPage, UserRecord};
pub use apply_leave::ApplyLeavePage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use my_leave::{LeaveRecord, MyLeavePage};
pub use recruitment::{RecruitmentPage, VacancyRecord};
pub use timesheet::TimesheetPage;

/// Common shape of a page object: an actions capability plus a locator
/// section.
pub trait PageObject {
    /// Name of this page's section in the locator store
    const SECTION: &'static str;

    /// The session-bound action primitives
    fn actions(&self) -> &PageActions;

    /// The shared locator store
    fn locators(&self) -> &LocatorStore;

    /// Resolve a symbolic name within this page's section
    fn locator(&self, name: &str) -> EnsayoResult<Locator> {
        self.locators().get(Self::SECTION, name)
    }

    /// Resolve a symbolic name from another section (shared widgets
    /// such as toasts and spinners live under "common")
    fn shared_locator(&self, section: &str, name: &str) -> EnsayoResult<Locator> {
        self.locators().get(section, name)
    }

    /// Wait for the shared loading spinner to go away
    fn wait_for_spinner_gone(
        &self,
    ) -> impl std::future::Future<Output = EnsayoResult<()>> + Send
    where
        Self: Sync,
    {
        async {
            let spinner = self.shared_locator("common", "loadingSpinner")?;
            self.actions().wait_for(&spinner).await
        }
    }
}
