//! Run callables and futures so that they report a `(failure, value)`
//! [`Outcome`] instead of panicking or failing.
//!
//! ```
//! use outcome_wrap::outcome;
//!
//! let (error, data) = outcome!(std::fs::read_to_string("file.json"));
//! if let Some(error) = error {
//!     eprintln!("cannot read: {error}");
//!     return;
//! }
//! println!("file content: {}", data.unwrap_or_default());
//! ```

mod signal;
pub use signal::{BoxError, Payload, Signal};

mod failure;
pub use failure::{Failure, FailureKind};

mod outcome;
pub use outcome::Outcome;

mod wrappable;
pub use wrappable::{Plain, Wrappable};

mod call;
pub use call::{call, call_once, call_plain, wrap, Callable, Wrapped};

mod task;
pub use task::{
    timeout, try_wrap_task, wrap_task, Task, TaskExt, TryTask, TryWrapTask, WrapTask,
};

mod config;
pub use config::Config;

mod install;
pub use install::{install, install_with, installed, InstallError};

mod contain;


/// Destructures a fallible expression into `(failure, value)`.
///
/// `outcome!(expr)` runs `expr` through [`call_once`]. `outcome!(await fut)`
/// awaits a future that settles with a `Result`, through [`try_wrap_task`].
///
/// In the `expr` form the expression is the body of a closure, so `?` and
/// `return` inside it leave that closure, not the enclosing function. A `?`
/// that fails becomes the failure slot:
///
/// ```
/// use outcome_wrap::outcome;
///
/// let (error, port) = outcome!({
///     let raw = std::env::var("OUTCOME_WRAP_UNSET_PORT")?;
///     raw.parse::<u16>().map_err(outcome_wrap::BoxError::from)
/// });
/// assert!(error.is_some());
/// assert!(port.is_none());
/// ```
///
/// The `await` form has no closure: it expands to an `.await` in the
/// enclosing async context.
#[macro_export]
macro_rules! outcome {
    (await $fut:expr) => {
        $crate::try_wrap_task($fut).await.into_tuple()
    };
    ($expr:expr) => {
        $crate::call_once(|| $expr).into_tuple()
    };
}
