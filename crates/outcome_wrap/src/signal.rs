use std::any::Any;

use parking_lot::Mutex;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The value a callable raised, either as a panic payload or as the `Err` of a
/// wrap-aware return.
#[derive(Debug)]
#[non_exhaustive]
pub enum Signal {
    Error(BoxError),
    Message(String),
    Bool(bool),
    Integer(i128),
    Float(f64),
    Unit,
    Absent,
    Opaque(Payload),
}

impl Signal {
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        macro_rules! try_downcast {
            ($payload:ident, $ty:ty, |$val:ident| $conv:expr) => {
                let $payload = match $payload.downcast::<$ty>() {
                    Ok($val) => return $conv,
                    Err(payload) => payload,
                };
            };
        }

        // `T` and `Option<T>`, where `None` is always absent
        macro_rules! try_value {
            ($payload:ident, $ty:ty, |$val:ident| $conv:expr) => {
                try_downcast!($payload, $ty, |boxed| {
                    let $val = *boxed;
                    $conv
                });
                try_downcast!($payload, Option<$ty>, |boxed| match *boxed {
                    Some($val) => $conv,
                    None => Self::Absent,
                });
            };
        }

        try_downcast!(payload, Self, |signal| *signal);
        try_value!(payload, String, |msg| Self::Message(msg));
        try_value!(payload, &'static str, |msg| Self::Message(msg.to_string()));
        try_value!(payload, BoxError, |error| Self::Error(error));
        try_value!(payload, std::io::Error, |error| Self::Error(Box::new(error)));
        try_value!(payload, std::fmt::Error, |error| Self::Error(Box::new(error)));
        try_value!(payload, std::num::ParseIntError, |error| Self::Error(Box::new(error)));
        try_value!(payload, std::num::ParseFloatError, |error| Self::Error(Box::new(error)));
        try_value!(payload, std::string::FromUtf8Error, |error| Self::Error(Box::new(error)));
        try_value!(payload, crate::Failure, |failure| Self::Error(Box::new(failure)));
        try_value!(payload, bool, |val| Self::Bool(val));
        try_value!(payload, char, |val| Self::Message(val.to_string()));
        try_value!(payload, i8, |val| Self::Integer(i128::from(val)));
        try_value!(payload, i16, |val| Self::Integer(i128::from(val)));
        try_value!(payload, i32, |val| Self::Integer(i128::from(val)));
        try_value!(payload, i64, |val| Self::Integer(i128::from(val)));
        try_value!(payload, i128, |val| Self::Integer(val));
        try_value!(payload, u8, |val| Self::Integer(i128::from(val)));
        try_value!(payload, u16, |val| Self::Integer(i128::from(val)));
        try_value!(payload, u32, |val| Self::Integer(i128::from(val)));
        try_value!(payload, u64, |val| Self::Integer(i128::from(val)));
        try_value!(payload, u128, |val| i128::try_from(val)
            .map_or_else(|_| Self::Message(val.to_string()), Self::Integer));
        try_value!(payload, isize, |val| Self::Integer(val as i128));
        try_value!(payload, usize, |val| Self::Integer(val as i128));
        try_value!(payload, f64, |val| Self::Float(val));
        try_value!(payload, f32, |val| Self::Float(f64::from(val)));
        try_value!(payload, (), |_unit| Self::Unit);

        Self::Opaque(Payload::new(payload))
    }

    pub fn from_error(error: impl Into<BoxError>) -> Self {
        Self::Error(error.into())
    }

    /// Whether this signal would be indistinguishable from "no failure" to a
    /// consumer that only checks for presence.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Error(error) => error.source().is_none() && error.to_string().is_empty(),
            Self::Message(msg) => msg.is_empty(),
            Self::Bool(val) => !*val,
            Self::Integer(val) => *val == 0,
            Self::Float(val) => *val == 0.0 || val.is_nan(),
            Self::Unit | Self::Absent => true,
            Self::Opaque(..) => false,
        }
    }

    pub fn as_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Error(error) => Some(&**error),
            _ => None,
        }
    }

    /// The raw panic payload, when it had no structured counterpart.
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Opaque(payload) => Some(payload),
            _ => None,
        }
    }
}

/// A panic payload of a type [`Signal`] has no variant for. The original
/// value is kept and can be downcast.
pub struct Payload {
    inner: Mutex<Box<dyn Any + Send>>,
}

impl Payload {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self {
            inner: Mutex::new(payload),
        }
    }

    pub fn is<P: Any>(&self) -> bool {
        let payload = self.inner.lock();
        (**payload).is::<P>()
    }

    /// Runs `f` on the payload if it is a `P`.
    pub fn with<P: Any, R>(&self, f: impl FnOnce(&P) -> R) -> Option<R> {
        let payload = self.inner.lock();
        (**payload).downcast_ref::<P>().map(f)
    }

    pub fn downcast_mut<P: Any>(&mut self) -> Option<&mut P> {
        (**self.inner.get_mut()).downcast_mut()
    }

    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.inner.into_inner()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").finish_non_exhaustive()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error(error) => {
                let msg = error.to_string();
                match error.source() {
                    Some(source) if msg.is_empty() => write!(f, "{source}"),
                    _ => f.write_str(&msg),
                }
            }
            Self::Message(msg) => f.write_str(msg),
            Self::Bool(val) => write!(f, "{val}"),
            Self::Integer(val) => write!(f, "{val}"),
            Self::Float(val) => write!(f, "{val}"),
            Self::Unit => f.write_str("()"),
            Self::Absent => f.write_str("None"),
            Self::Opaque(..) => f.write_str("opaque panic payload"),
        }
    }
}

impl From<BoxError> for Signal {
    fn from(error: BoxError) -> Self {
        Self::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(p: impl Any + Send) -> Box<dyn Any + Send> {
        Box::new(p)
    }

    #[test]
    fn panic_payloads() {
        assert!(matches!(Signal::from_panic(payload("boom")), Signal::Message(s) if s == "boom"));
        assert!(matches!(
            Signal::from_panic(payload(String::from("boom"))),
            Signal::Message(s) if s == "boom"
        ));
        assert!(matches!(Signal::from_panic(payload(42_u8)), Signal::Integer(42)));
        assert!(matches!(Signal::from_panic(payload(-7_isize)), Signal::Integer(-7)));
        assert!(matches!(Signal::from_panic(payload(true)), Signal::Bool(true)));
        assert!(matches!(Signal::from_panic(payload(1.5_f32)), Signal::Float(f) if f == 1.5));
        assert!(matches!(Signal::from_panic(payload(())), Signal::Unit));
        assert!(matches!(Signal::from_panic(payload(None::<String>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<&str>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<()>)), Signal::Absent));
        assert!(matches!(
            Signal::from_panic(payload(Some("late"))),
            Signal::Message(s) if s == "late"
        ));

        #[derive(Debug, PartialEq)]
        struct Custom(u8);
        let signal = Signal::from_panic(payload(Custom(4)));
        assert!(matches!(signal, Signal::Opaque(..)));
        let kept = signal.payload().and_then(|p| p.with(|custom: &Custom| custom.0));
        assert_eq!(kept, Some(4));
        match signal {
            Signal::Opaque(payload) => assert!(payload.into_inner().is::<Custom>()),
            other => panic!("expected an opaque payload, got {other:?}"),
        }

        assert!(matches!(
            Signal::from_panic(payload(std::io::Error::other("ENOENT"))),
            Signal::Error(e) if e.to_string() == "ENOENT"
        ));

        let error: BoxError = "disk on fire".into();
        assert!(matches!(
            Signal::from_panic(payload(error)),
            Signal::Error(e) if e.to_string() == "disk on fire"
        ));

        assert!(matches!(
            Signal::from_panic(payload(Signal::Integer(3))),
            Signal::Integer(3)
        ));
    }

    #[test]
    fn wide_and_optional_payloads() {
        assert!(matches!(Signal::from_panic(payload(0_i128)), Signal::Integer(0)));
        assert!(matches!(Signal::from_panic(payload(0_u128)), Signal::Integer(0)));
        assert!(matches!(
            Signal::from_panic(payload(u128::MAX)),
            Signal::Message(s) if s == u128::MAX.to_string()
        ));

        assert!(matches!(Signal::from_panic(payload(None::<i32>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<u64>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<bool>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<f64>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(None::<BoxError>)), Signal::Absent));
        assert!(matches!(Signal::from_panic(payload(Some(0_i32))), Signal::Integer(0)));
        assert!(matches!(Signal::from_panic(payload(Some(7_u8))), Signal::Integer(7)));
        assert!(matches!(Signal::from_panic(payload(Some(()))), Signal::Unit));

        for raised in [
            payload(0_i128),
            payload(0_u128),
            payload(None::<i32>),
            payload(None::<char>),
            payload(Some(false)),
        ] {
            let signal = Signal::from_panic(raised);
            assert!(signal.is_falsy(), "{signal:?} should be falsy");
        }
    }

    #[test]
    fn falsy_signals() {
        for signal in [
            Signal::Message(String::new()),
            Signal::Bool(false),
            Signal::Integer(0),
            Signal::Float(0.0),
            Signal::Float(-0.0),
            Signal::Float(f64::NAN),
            Signal::Unit,
            Signal::Absent,
            Signal::from_error(""),
        ] {
            assert!(signal.is_falsy(), "{signal:?} should be falsy");
        }

        for signal in [
            Signal::Message(String::from("timeout")),
            Signal::Bool(true),
            Signal::Integer(-1),
            Signal::Float(0.1),
            Signal::Opaque(Payload::new(payload(Vec::<u8>::new()))),
            Signal::from_error(std::io::Error::from(std::io::ErrorKind::NotFound)),
        ] {
            assert!(!signal.is_falsy(), "{signal:?} should be truthy");
        }
    }
}
