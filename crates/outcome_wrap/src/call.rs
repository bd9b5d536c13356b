use crate::{contain::contain, Outcome, Wrappable};

/// Anything that can be invoked with a tuple of arguments.
///
/// Implemented for every `FnMut` taking up to six arguments. Methods keep
/// their receiver by taking it as the first argument, e.g.
/// `call(Counter::bump, (&mut counter, 2))`.
pub trait Callable<Args> {
    type Output;

    fn invoke(&mut self, args: Args) -> Self::Output;
}

macro_rules! callable {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Callable<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

callable!();
callable!(A);
callable!(A, B);
callable!(A, B, C);
callable!(A, B, C, D);
callable!(A, B, C, D, E);
callable!(A, B, C, D, E, G);

/// Calls `f` with `args` and reports the result instead of panicking.
///
/// The return value is dispatched once through [`Wrappable`], so a callable
/// that returns a [`TryTask`](crate::TryTask) yields a future of an
/// [`Outcome`] while one that returns a `Result` yields the outcome
/// directly. A panic, whether from `f` or from the dispatch, becomes a
/// failure of the same shape.
pub fn call<F, Args>(mut f: F, args: Args) -> <F::Output as Wrappable>::Wrapped
where
    F: Callable<Args>,
    F::Output: Wrappable,
{
    dispatch(&mut f, args)
}

/// Calls `f` with `args`, treating whatever it returns as a plain value.
pub fn call_plain<F, Args>(mut f: F, args: Args) -> Outcome<F::Output>
where
    F: Callable<Args>,
{
    contain(|| f.invoke(args)).into()
}

fn dispatch<F, Args>(f: &mut F, args: Args) -> <F::Output as Wrappable>::Wrapped
where
    F: Callable<Args>,
    F::Output: Wrappable,
{
    match contain(|| f.invoke(args).wrap()) {
        Ok(wrapped) => wrapped,
        Err(failure) => <F::Output as Wrappable>::fail(failure),
    }
}

/// [`call`] for a closure that can only run once.
pub fn call_once<F, R>(f: F) -> R::Wrapped
where
    F: FnOnce() -> R,
    R: Wrappable,
{
    match contain(|| f().wrap()) {
        Ok(wrapped) => wrapped,
        Err(failure) => R::fail(failure),
    }
}

/// Adapts `f` so that every call reports an outcome.
pub const fn wrap<F>(f: F) -> Wrapped<F> {
    Wrapped { inner: f }
}

/// A callable adapted by [`wrap`].
#[derive(Debug, Clone, Copy)]
pub struct Wrapped<F> {
    inner: F,
}

impl<F> Wrapped<F> {
    pub fn call<Args>(&mut self, args: Args) -> <F::Output as Wrappable>::Wrapped
    where
        F: Callable<Args>,
        F::Output: Wrappable,
    {
        dispatch(&mut self.inner, args)
    }

    pub fn call_plain<Args>(&mut self, args: Args) -> Outcome<F::Output>
    where
        F: Callable<Args>,
    {
        contain(|| self.inner.invoke(args)).into()
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}
