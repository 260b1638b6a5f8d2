//! Provisioning: probe, resolve, install.
//!
//! - [`prober`] decides whether software is already present
//! - [`resolver`] picks the install method for the host
//! - [`executor`] plans and runs that method and its post-install hook
//! - [`orchestrator`] walks the catalog selection and reports outcomes

pub mod executor;
pub mod orchestrator;
pub mod prober;
pub mod resolver;

pub use executor::{plan, Executor, InstallReport, PlannedStep};
pub use orchestrator::{
    check_prerequisites, Orchestrator, Outcome, ProvisionOptions, RunReport, SoftwareResult,
};
pub use prober::{Check, InstalledStateProber};
pub use resolver::{rank, resolve};
