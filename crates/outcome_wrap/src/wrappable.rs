use crate::{signal::BoxError, Failure, Outcome};

/// The capability tag for values that know how to become an outcome.
///
/// [`call`](crate::call) dispatches through this trait exactly once on
/// whatever a callable returned. Synchronous shapes produce an
/// [`Outcome`]. Asynchronous shapes produce a future that always completes
/// with one.
///
/// Types without an impl are never inspected. A future has to be marked
/// with [`Task`](crate::Task) or [`TryTask`](crate::TryTask) before it is
/// treated as wrap-aware.
pub trait Wrappable: Sized {
    type Value;
    type Wrapped;

    fn wrap(self) -> Self::Wrapped;

    /// Produces a failed result with the same shape as [`Wrappable::wrap`].
    fn fail(failure: Failure) -> Self::Wrapped;
}

/// Marks a value as plain: it wraps into a success as-is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Plain<T>(pub T);

impl<T> Wrappable for Plain<T> {
    type Value = T;
    type Wrapped = Outcome<T>;

    fn wrap(self) -> Self::Wrapped {
        Outcome::success(self.0)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Outcome::failure(failure)
    }
}

impl<T> Wrappable for Outcome<T> {
    type Value = T;
    type Wrapped = Self;

    fn wrap(self) -> Self::Wrapped {
        self
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Self::failure(failure)
    }
}

impl<T, E> Wrappable for Result<T, E>
where
    E: Into<BoxError>,
{
    type Value = T;
    type Wrapped = Outcome<T>;

    fn wrap(self) -> Self::Wrapped {
        match self {
            Ok(value) => Outcome::success(value),
            Err(error) => Outcome::failure(Failure::errored(error)),
        }
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Outcome::failure(failure)
    }
}

macro_rules! plain {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wrappable for $ty {
                type Value = Self;
                type Wrapped = Outcome<Self>;

                #[inline]
                fn wrap(self) -> Self::Wrapped {
                    Outcome::success(self)
                }

                #[inline]
                fn fail(failure: Failure) -> Self::Wrapped {
                    Outcome::failure(failure)
                }
            }
        )*
    };
}

plain! {
    (), bool, char, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
}

impl Wrappable for &str {
    type Value = Self;
    type Wrapped = Outcome<Self>;

    fn wrap(self) -> Self::Wrapped {
        Outcome::success(self)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Outcome::failure(failure)
    }
}

impl<T> Wrappable for Vec<T> {
    type Value = Self;
    type Wrapped = Outcome<Self>;

    fn wrap(self) -> Self::Wrapped {
        Outcome::success(self)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Outcome::failure(failure)
    }
}

// `None` is a value here, not a failure.
impl<T> Wrappable for Option<T> {
    type Value = Self;
    type Wrapped = Outcome<Self>;

    fn wrap(self) -> Self::Wrapped {
        Outcome::success(self)
    }

    fn fail(failure: Failure) -> Self::Wrapped {
        Outcome::failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    #[test]
    fn results_fail_through_the_error() {
        let ok: Result<u8, std::io::Error> = Ok(4);
        assert_eq!(ok.wrap().into_value(), Some(4));

        let err: Result<u8, &str> = Err("ENOENT");
        let (failure, value) = err.wrap().into_tuple();
        let failure = failure.expect("err is a failure");
        assert_eq!(failure.kind(), FailureKind::Errored);
        assert_eq!(failure.to_string(), "ENOENT");
        assert!(value.is_none());
    }

    #[test]
    fn empty_error_is_synthesized() {
        let err: Result<(), String> = Err(String::new());
        let failure = err.wrap().into_failure().expect("err is a failure");
        assert!(failure.is_falsy());
        assert!(failure.to_string().contains("falsy"));
    }

    #[test]
    fn nested_outcomes_pass_through() {
        let inner = Outcome::success(Plain(7)).map(|Plain(v)| v);
        assert_eq!(inner.wrap().into_value(), Some(7));
    }

    #[test]
    fn plain_values_are_successes() {
        assert_eq!(None::<u8>.wrap().into_value(), Some(None));
        assert_eq!("text".wrap().into_value(), Some("text"));
        assert_eq!(Plain(vec![1, 2]).wrap().into_value(), Some(vec![1, 2]));
        assert!(<u8 as Wrappable>::fail(Failure::new(FailureKind::Panicked, crate::Signal::Unit))
            .is_failure());
    }
}
