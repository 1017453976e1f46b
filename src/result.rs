//! Result type shared across StickyWheel.
//!
//! Every fallible operation returns [`Result`], backed by `color-eyre`, so
//! typed [`StickyWheelError`](crate::error::StickyWheelError) values and
//! ad-hoc context added with `.wrap_err()` flow through the same channel up
//! to the command that triggered the rewrite.
//!
//! ```rust,ignore
//! use color_eyre::eyre::WrapErr;
//! use crate::result::Result;
//!
//! fn load(path: &Path) -> Result<PyProject> {
//!     PyProject::load(path)
//!         .wrap_err_with(|| format!("failed to read {}", path.display()))
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout StickyWheel.
pub type Result<T> = EyreResult<T>;
