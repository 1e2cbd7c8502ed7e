//! Install pipeline and the operations built on it.

pub mod context;
pub mod error;
pub mod install;

pub use context::Context;
pub use error::InstallError;
pub use install::{InstallOutcome, InstallRequest, SubPathStrategy, install, uninstall, update};
