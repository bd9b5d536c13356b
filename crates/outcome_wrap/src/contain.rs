use std::{
    cell::Cell,
    future::Future,
    panic::{catch_unwind, AssertUnwindSafe},
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::{future::CatchUnwind, FutureExt as _};

use crate::Failure;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct Boundary;

impl Boundary {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for Boundary {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Runs `f`, turning a panic into a [`Failure`].
pub(crate) fn contain<R>(f: impl FnOnce() -> R) -> Result<R, Failure> {
    let _boundary = Boundary::enter();
    catch_unwind(AssertUnwindSafe(f)).map_err(Failure::panicked)
}

/// A boxed future that is polled inside a wrap boundary.
pub(crate) struct Contained<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> Future for Contained<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _boundary = Boundary::enter();
        self.get_mut().inner.as_mut().poll(cx)
    }
}

pub(crate) type ContainedFuture<F> = CatchUnwind<AssertUnwindSafe<Contained<F>>>;

/// Wraps `fut` so that a panic while polling it resolves to the payload.
pub(crate) fn contain_future<F: Future>(fut: F) -> ContainedFuture<F> {
    AssertUnwindSafe(Contained {
        inner: Box::pin(fut),
    })
    .catch_unwind()
}

/// Whether the current thread is inside a wrap boundary.
pub(crate) fn is_contained() -> bool {
    DEPTH.with(Cell::get) > 0
}
