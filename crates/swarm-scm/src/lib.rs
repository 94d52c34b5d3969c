pub mod driver;
pub mod errors;
pub mod git;
pub mod naming;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use driver::{DiffStat, LogSince, ScmDriver};
pub use errors::{Result, ScmError};
pub use git::GitDriver;
pub use naming::project_name_from_remote;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeScmDriver;
