pub mod driver;
pub mod errors;
pub mod tmux;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use driver::TerminalDriver;
pub use errors::{is_session_gone, Result, TermError};
pub use tmux::TmuxDriver;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTerminalDriver;
