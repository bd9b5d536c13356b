use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_util::FutureExt as _;

use crate::{
    contain::{contain_future, ContainedFuture},
    signal::BoxError,
    Failure, Outcome, Wrappable,
};

enum State<F> {
    Running(ContainedFuture<F>),
    Settled(Option<Failure>),
}

impl<F: Future> State<F> {
    fn poll_settle(&mut self, cx: &mut Context<'_>) -> Poll<Result<F::Output, Failure>> {
        let result = match self {
            Self::Running(fut) => match fut.poll_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(result) => result.map_err(Failure::panicked),
            },
            Self::Settled(failure) => match failure.take() {
                Some(failure) => Err(failure),
                None => panic!("wrapped task polled after completion"),
            },
        };

        // a settled task is never polled again, even after a panic
        *self = Self::Settled(None);
        Poll::Ready(result)
    }
}

/// Awaits a future and completes with an [`Outcome`] of its output.
///
/// A panic while polling the inner future is its rejection. This future
/// itself always completes.
///
/// # Panics
///
/// Polling it again after it completed panics, like most futures.
#[must_use = "futures do nothing unless polled"]
pub struct WrapTask<F> {
    state: State<F>,
}

impl<F: Future> WrapTask<F> {
    pub fn new(fut: F) -> Self {
        Self {
            state: State::Running(contain_future(fut)),
        }
    }

    /// A task that is already settled with `failure`.
    pub fn failed(failure: Failure) -> Self {
        Self {
            state: State::Settled(Some(failure)),
        }
    }
}

impl<F: Future> Future for WrapTask<F> {
    type Output = Outcome<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().state.poll_settle(cx).map(Outcome::from)
    }
}

impl<F> std::fmt::Debug for WrapTask<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapTask")
            .field("settled", &matches!(self.state, State::Settled(..)))
            .finish()
    }
}

/// Like [`WrapTask`], for futures that settle with a `Result`. An `Err`
/// is the rejection.
///
/// # Panics
///
/// Polling it again after it completed panics.
#[must_use = "futures do nothing unless polled"]
pub struct TryWrapTask<F> {
    state: State<F>,
}

impl<F, T, E> TryWrapTask<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    pub fn new(fut: F) -> Self {
        Self {
            state: State::Running(contain_future(fut)),
        }
    }

    pub fn failed(failure: Failure) -> Self {
        Self {
            state: State::Settled(Some(failure)),
        }
    }
}

impl<F, T, E> Future for TryWrapTask<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().state.poll_settle(cx).map(|result| match result {
            Ok(Ok(value)) => Outcome::success(value),
            Ok(Err(error)) => Outcome::failure(Failure::errored(error)),
            Err(failure) => Outcome::failure(failure),
        })
    }
}

impl<F> std::fmt::Debug for TryWrapTask<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryWrapTask")
            .field("settled", &matches!(self.state, State::Settled(..)))
            .finish()
    }
}

/// Marks a future as wrap-aware, see [`WrapTask`].
#[derive(Debug)]
pub struct Task<F>(pub F);

impl<F: Future> Wrappable for Task<F> {
    type Value = F::Output;
    type Wrapped = WrapTask<F>;

    fn wrap(self) -> Self::Wrapped {
        WrapTask::new(self.0)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        WrapTask::failed(failure)
    }
}

/// Marks a `Result` future as wrap-aware, see [`TryWrapTask`].
#[derive(Debug)]
pub struct TryTask<F>(pub F);

impl<F, T, E> Wrappable for TryTask<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    type Value = T;
    type Wrapped = TryWrapTask<F>;

    fn wrap(self) -> Self::Wrapped {
        TryWrapTask::new(self.0)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        TryWrapTask::failed(failure)
    }
}

pub trait TaskExt: Future + Sized {
    fn wrap_task(self) -> WrapTask<Self> {
        WrapTask::new(self)
    }

    fn try_wrap_task<T, E>(self) -> TryWrapTask<Self>
    where
        Self: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        TryWrapTask::new(self)
    }

    fn task(self) -> Task<Self> {
        Task(self)
    }

    fn try_task(self) -> TryTask<Self> {
        TryTask(self)
    }
}

impl<F: Future> TaskExt for F {}

pub fn wrap_task<F: Future>(fut: F) -> WrapTask<F> {
    WrapTask::new(fut)
}

pub fn try_wrap_task<F, T, E>(fut: F) -> TryWrapTask<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    TryWrapTask::new(fut)
}

/// Races a wrapped task against a deadline. An elapsed deadline settles as a
/// [`FailureKind::TimedOut`](crate::FailureKind::TimedOut) failure.
///
/// Must be awaited inside a tokio runtime with the time driver enabled.
pub async fn timeout<F, T>(after: Duration, wrapped: F) -> Outcome<T>
where
    F: Future<Output = Outcome<T>>,
{
    match tokio::time::timeout(after, wrapped).await {
        Ok(outcome) => outcome,
        Err(elapsed) => Outcome::failure(Failure::timed_out(after, elapsed)),
    }
}
