//! Recruitment page: vacancy search and creation.

use std::sync::Arc;

use crate::actions::PageActions;
use crate::locator::LocatorStore;
use crate::result::EnsayoResult;

use super::PageObject;

/// One row of the vacancies table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyRecord {
    /// Vacancy name
    pub vacancy: String,
    /// Job title the vacancy is for
    pub job_title: String,
    /// Active/closed status
    pub status: String,
}

/// The Recruitment module's vacancies view
#[derive(Debug)]
pub struct RecruitmentPage {
    actions: PageActions,
    locators: Arc<LocatorStore>,
}

impl PageObject for RecruitmentPage {
    const SECTION: &'static str = "recruitmentPage";

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn locators(&self) -> &LocatorStore {
        &self.locators
    }
}

impl RecruitmentPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(actions: PageActions, locators: Arc<LocatorStore>) -> Self {
        Self { actions, locators }
    }

    /// Filter vacancies by job title and wait for results
    pub async fn search_by_job_title(&self, job_title: &str) -> EnsayoResult<()> {
        self.actions
            .select_option(
                &self.locator("jobTitleDropdown")?,
                &self.locator("dropdownOptions")?,
                job_title,
                None,
            )
            .await?;
        self.actions.click(&self.locator("searchButton")?).await?;
        self.wait_for_spinner_gone().await
    }

    /// Read back the vacancies currently shown
    pub async fn vacancy_records(&self) -> EnsayoResult<Vec<VacancyRecord>> {
        let table = self.locators.table(Self::SECTION, "vacancyRecords")?;
        let rows = self
            .actions
            .read_table(table, &["vacancy", "jobTitle", "status"])
            .await?;
        Ok(rows
            .into_iter()
            .map(|mut cells| VacancyRecord {
                status: cells.pop().unwrap_or_default(),
                job_title: cells.pop().unwrap_or_default(),
                vacancy: cells.pop().unwrap_or_default(),
            })
            .collect())
    }

    /// Create a vacancy: name, job title, hiring manager (typed into the
    /// autocomplete and picked from its suggestions), then save.
    pub async fn add_vacancy(
        &self,
        name: &str,
        job_title: &str,
        hiring_manager: &str,
    ) -> EnsayoResult<()> {
        self.actions.click(&self.locator("addButton")?).await?;
        self.actions
            .select_option(
                &self.locator("jobTitleDropdown")?,
                &self.locator("dropdownOptions")?,
                job_title,
                None,
            )
            .await?;
        self.actions
            .fill(&self.locator("vacancyNameInput")?, name)
            .await?;
        self.actions
            .select_option(
                &self.locator("hiringManagerInput")?,
                &self.locator("autocompleteOptions")?,
                hiring_manager,
                Some(hiring_manager),
            )
            .await?;
        self.actions.click(&self.locator("saveButton")?).await
    }

    /// Wait for and read the shared toast after saving
    pub async fn toast_message(&self) -> EnsayoResult<String> {
        self.actions
            .read_text(&self.shared_locator("common", "toast")?)
            .await
    }
}
