use crate::Failure;

/// A `(failure, value)` pair where exactly one side is present.
///
/// Destructure it with [`Outcome::into_tuple`] (or `.into()`):
///
/// ```
/// use outcome_wrap::call;
///
/// let (error, data) = call(|a: i32, b: i32| a + b, (2, 3)).into_tuple();
/// assert!(error.is_none());
/// assert_eq!(data, Some(5));
/// ```
#[must_use]
#[derive(Debug)]
pub struct Outcome<T> {
    inner: Result<T, Failure>,
}

impl<T> Outcome<T> {
    pub const fn success(value: T) -> Self {
        Self { inner: Ok(value) }
    }

    pub const fn failure(failure: Failure) -> Self {
        Self {
            inner: Err(failure),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.inner.is_ok()
    }

    pub const fn is_failure(&self) -> bool {
        self.inner.is_err()
    }

    pub fn failure_ref(&self) -> Option<&Failure> {
        self.inner.as_ref().err()
    }

    pub fn value(&self) -> Option<&T> {
        self.inner.as_ref().ok()
    }

    /// The value slot. This is `None` on failure, so a consumer that skips
    /// the failure check carries on with nothing rather than crashing.
    pub fn into_value(self) -> Option<T> {
        self.inner.ok()
    }

    pub fn into_failure(self) -> Option<Failure> {
        self.inner.err()
    }

    pub fn into_result(self) -> Result<T, Failure> {
        self.inner
    }

    pub fn into_tuple(self) -> (Option<Failure>, Option<T>) {
        match self.inner {
            Ok(value) => (None, Some(value)),
            Err(failure) => (Some(failure), None),
        }
    }

    pub fn map<U>(self, map: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            inner: self.inner.map(map),
        }
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(inner: Result<T, Failure>) -> Self {
        Self { inner }
    }
}

impl<T> From<Outcome<T>> for (Option<Failure>, Option<T>) {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_tuple()
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.inner
    }
}
