use std::{any::Any, time::Duration};

use crate::signal::{BoxError, Payload, Signal};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FailureKind {
    /// The callable, or the task while being polled, panicked.
    Panicked,
    /// A wrap-aware return settled with an `Err`.
    Errored,
    /// A composed deadline elapsed before the task settled.
    TimedOut,
}

/// The failure slot of an [`Outcome`](crate::Outcome).
///
/// Whatever was raised is kept as the [`Signal`], so a falsy signal never
/// stands in for the failure itself.
#[derive(Debug)]
pub struct Failure {
    kind: FailureKind,
    signal: Signal,
}

impl Failure {
    pub fn new(kind: FailureKind, signal: impl Into<Signal>) -> Self {
        Self {
            kind,
            signal: signal.into(),
        }
    }

    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        Self::new(FailureKind::Panicked, Signal::from_panic(payload))
    }

    pub fn errored(error: impl Into<BoxError>) -> Self {
        Self::new(FailureKind::Errored, Signal::from_error(error))
    }

    pub(crate) fn timed_out(after: Duration, error: tokio::time::error::Elapsed) -> Self {
        Self::new(
            FailureKind::TimedOut,
            Signal::Error(Box::new(TimedOut { after, error })),
        )
    }

    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    pub const fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn into_signal(self) -> Signal {
        self.signal
    }

    /// Whether the raised signal was falsy and this failure was synthesized
    /// around it.
    pub fn is_falsy(&self) -> bool {
        self.signal.is_falsy()
    }

    /// The error that was raised, if it is an `E`. Common std error types
    /// raised as panic payloads (`io::Error`, parse errors) are reachable here
    /// too, any other payload type through [`Failure::payload`].
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.signal.as_error()?.downcast_ref()
    }

    pub const fn payload(&self) -> Option<&Payload> {
        self.signal.payload()
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_falsy() {
            return write!(f, "{}", self.signal);
        }

        match &self.signal {
            Signal::Message(..) => f.write_str("thrown error is falsy (\"\")"),
            Signal::Error(..) => f.write_str("thrown error is falsy (empty error)"),
            signal => write!(f, "thrown error is falsy ({signal})"),
        }
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.signal.as_error() {
            Some(error) => Some(error),
            None => None,
        }
    }
}

#[derive(Debug)]
struct TimedOut {
    after: Duration,
    error: tokio::time::error::Elapsed,
}

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task did not settle within {:.2?}", self.after)
    }
}

impl std::error::Error for TimedOut {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
