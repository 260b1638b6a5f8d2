//! Host environment detection.
//!
//! Answers the questions the resolver needs about the machine being
//! provisioned: which platform family it is, which package managers are
//! usable, whether a desktop shell is running, and whether it is Linux
//! nested inside Windows.

pub mod facts;
pub mod platform;

pub use facts::{detect_wsl, expand_home, require_tool, EnvironmentFacts, HostFacts};
pub use platform::{Platform, SystemPackageManager, ThirdPartyPackageManager};
