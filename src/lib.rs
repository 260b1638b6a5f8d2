//! devstrap - Workstation provisioning across package managers.
//!
//! devstrap walks a catalog of software, probes each entry to see whether it
//! is already installed, and installs what is missing with the best method
//! the host supports: Homebrew, snap, flatpak, vendor packages, the
//! distribution package manager, archives or plain shell installers.
//!
//! # Modules
//!
//! - [`catalog`] - Built-in and user-supplied software catalogs
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and parsing
//! - [`environment`] - Host facts: platform, package managers, WSL, desktop
//! - [`error`] - Error types and result aliases
//! - [`provision`] - Probing, method resolution and installation
//! - [`shell`] - External command execution
//! - [`software`] - Software descriptors and install methods
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use devstrap::environment::{HostFacts, Platform, SystemPackageManager};
//! use devstrap::provision::{plan, resolve};
//! use devstrap::software::{BrewPackage, InstallMethod, SoftwareDescriptor};
//!
//! let zsh = SoftwareDescriptor::new("Zsh", &[Platform::MacOs, Platform::Linux])
//!     .with_method(InstallMethod::Brew(BrewPackage::formula("zsh").mac_only()))
//!     .with_method(InstallMethod::SystemPackages(vec!["zsh".into()]));
//!
//! let host = HostFacts::bare(Platform::Linux)
//!     .with_system_package_manager(SystemPackageManager::Apt);
//! let method = resolve(&zsh, &host).unwrap();
//! let steps: Vec<String> = plan(method, &host).iter().map(|s| s.to_string()).collect();
//! assert_eq!(steps, vec!["sudo apt install -y zsh"]);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod provision;
pub mod shell;
pub mod software;
pub mod ui;

pub use error::{DevstrapError, Result};
