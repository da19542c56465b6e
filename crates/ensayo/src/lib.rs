//! Ensayo: browser scenario orchestration for web application testing
//!
//! Ensayo (Spanish: "rehearsal") drives end-to-end scenarios against a
//! web HR application through page objects, with a per-scenario browser
//! session lifecycle, bounded waits and run reporting.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ENSAYO Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐             │
//! │   │ Scenario   │    │ Page       │    │ PageDriver │             │
//! │   │ Runner +   │───►│ Objects +  │───►│ (mock or   │             │
//! │   │ Hooks      │    │ Actions    │    │  chromium) │             │
//! │   └────────────┘    └────────────┘    └────────────┘             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every scenario acquires a fresh session (browser process, isolated
//! context, one page), runs its steps through session-bound
//! [`PageActions`], and releases the session in a guarded teardown no
//! matter how the steps ended. Real browser control lives behind the
//! `browser` cargo feature; the scriptable mock driver is always
//! available and backs the test suite.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod actions;
pub mod artifact;
pub mod config;
pub mod context;
pub mod driver;
pub mod hooks;
pub mod locator;
pub mod logging;
pub mod pages;
pub mod report;
pub mod result;
pub mod session;
pub mod testdata;
pub mod wait;

pub use actions::PageActions;
pub use config::{BrowserSettings, Engine, RunConfig, Timeouts, Viewport};
pub use context::ScenarioContext;
pub use driver::mock::MockDriver;
pub use driver::{ElementState, PageDriver};
pub use hooks::{ScenarioHooks, ScenarioPhase, ScenarioRunner};
pub use locator::{Locator, LocatorStore, TableRegion, WaitState};
pub use pages::{
    AdminPage, ApplyLeavePage, DashboardPage, LeaveRecord, LoginPage, MyLeavePage, PageObject,
    RecruitmentPage, TimesheetPage, UserRecord, VacancyRecord,
};
pub use report::{RunReport, ScenarioEntry, ScenarioStatus};
pub use result::{EnsayoError, EnsayoResult};
pub use session::{DriverFactory, MockFactory, Session, SessionManager};
pub use testdata::{Credentials, DateRange, LeaveApplication, TestData};

#[cfg(feature = "browser")]
pub use driver::cdp::CdpDriver;
#[cfg(feature = "browser")]
pub use session::CdpFactory;
