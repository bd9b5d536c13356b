use once_cell::sync::OnceCell;

use crate::{contain::is_contained, Config};

static INSTALLED: OnceCell<Config> = OnceCell::new();

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    UnwindingDisabled,
    Panicking,
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let err = match self {
            Self::UnwindingDisabled => "panics abort in this build, they cannot be contained",
            Self::Panicking => "cannot install while the current thread is panicking",
        };
        f.write_str(err)
    }
}

impl std::error::Error for InstallError {}

/// Installs the process-wide panic hook with the default [`Config`].
pub fn install() -> Result<(), InstallError> {
    install_with(Config::default())
}

/// Installs the process-wide panic hook.
///
/// Panics caught at a wrap boundary are reported through `log` instead of
/// the default hook. Every other panic still reaches the hook that was
/// installed before. Only the first call installs anything; later calls
/// keep the first [`Config`] and return `Ok`.
///
/// Wrapping does not depend on this. Without it, contained panics are
/// still captured, but the default hook prints them.
pub fn install_with(config: Config) -> Result<(), InstallError> {
    if cfg!(panic = "abort") {
        return Err(InstallError::UnwindingDisabled);
    }

    if std::thread::panicking() {
        return Err(InstallError::Panicking);
    }

    let mut fresh = false;
    INSTALLED.get_or_init(|| {
        fresh = true;
        set_hook(config);
        config
    });

    if fresh {
        log::debug!("installed panic containment: {config:?}");
    } else {
        log::trace!("panic containment is already installed");
    }

    Ok(())
}

/// The [`Config`] that is in effect, if [`install`] has run.
pub fn installed() -> Option<&'static Config> {
    INSTALLED.get()
}

fn set_hook(config: Config) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let contained = is_contained();
        if contained && config.log_contained {
            log::debug!("contained panic: {info}");
        }

        if reaches_previous(&config, contained) {
            previous(info)
        }
    }));
}

fn reaches_previous(config: &Config, contained: bool) -> bool {
    !contained || config.forward_contained
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::call;

    // the only test that installs: the hook is process-wide and set once
    #[test]
    fn installed_hook_routes_panics() {
        thread_local! {
            static SEEN: Cell<usize> = const { Cell::new(0) };
        }
        let seen = || SEEN.with(Cell::get);

        std::panic::set_hook(Box::new(|_| SEEN.with(|seen| seen.set(seen.get() + 1))));
        install_with(Config::new().with_log_contained(false)).unwrap();
        let first = *installed().expect("installed");

        install_with(Config::new().with_forward_contained(true)).unwrap();
        assert_eq!(installed(), Some(&first));
        install().unwrap();
        assert_eq!(installed(), Some(&first));

        let outcome = call(|| -> u8 { crate::test::raise("quiet") }, ());
        assert!(outcome.is_failure());
        assert_eq!(seen(), 0, "contained panics skip the previous hook");

        let uncontained = std::panic::catch_unwind(|| crate::test::raise("loud"));
        assert!(uncontained.is_err());
        assert_eq!(seen(), 1, "other panics still reach it");
    }

    #[test]
    fn forwarding_is_opt_in() {
        let quiet = Config::new();
        assert!(!reaches_previous(&quiet, true));
        assert!(reaches_previous(&quiet, false));

        let forwarding = Config::new().with_forward_contained(true);
        assert!(reaches_previous(&forwarding, true));
        assert!(reaches_previous(&forwarding, false));
    }

    #[test]
    fn install_refuses_a_panicking_thread() {
        struct InstallOnDrop;
        impl Drop for InstallOnDrop {
            fn drop(&mut self) {
                if std::thread::panicking() {
                    let result = install();
                    PANICKING_RESULT.with(|slot| *slot.borrow_mut() = Some(result));
                }
            }
        }

        thread_local! {
            static PANICKING_RESULT: std::cell::RefCell<Option<Result<(), InstallError>>> =
                const { std::cell::RefCell::new(None) };
        }

        let unwound = std::panic::catch_unwind(|| {
            let _guard = InstallOnDrop;
            crate::test::raise("unwinding");
        });

        assert!(unwound.is_err());
        let result = PANICKING_RESULT.with(|slot| slot.borrow_mut().take());
        assert_eq!(result, Some(Err(InstallError::Panicking)));
    }
}
