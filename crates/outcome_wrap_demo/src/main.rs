use std::{process::ExitCode, time::Duration};

use outcome_wrap::{outcome, BoxError, TaskExt as _};
use tracing_subscriber::EnvFilter;

// `log` records from outcome_wrap are bridged into the subscriber
fn init_logging(filter: EnvFilter) -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = init_logging(EnvFilter::from_default_env()) {
        eprintln!("cannot initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = outcome_wrap::install() {
        log::error!("cannot install panic containment: {err}");
        return ExitCode::FAILURE;
    }
    if let Some(config) = outcome_wrap::installed() {
        log::debug!("panic containment: {config:?}");
    }

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: outcome_wrap_demo <file>");
        return ExitCode::FAILURE;
    };

    // out of bounds: contained, and reported through the logger instead of the default hook
    let (error, _) = outcome!(std::fs::read_to_string(&path).map(|text| text.as_bytes()[text.len()]));
    if let Some(error) = error {
        log::info!("contained: {error}");
    }

    let (error, data) = outcome!(std::fs::read_to_string(&path));
    if let Some(error) = error {
        eprintln!("cannot read {path}: {error}");
        return ExitCode::FAILURE;
    }
    println!("file content: {}", data.unwrap_or_default());

    let read = tokio::fs::read_to_string(&path).try_wrap_task();
    let (error, data) = outcome_wrap::timeout(Duration::from_secs(5), read)
        .await
        .into_tuple();
    if let Some(error) = error {
        eprintln!("cannot read {path}: {error}");
        return ExitCode::FAILURE;
    }
    println!("file length: {}", data.map_or(0, |data| data.len()));

    let (error, data) = outcome!(await tokio::fs::read_to_string(format!("{path}.missing")));
    match error {
        Some(error) => {
            log::debug!("{:?} failure: {error:?}", error.kind());
            println!("expected failure: {error}");
        }
        None => println!("unexpected content: {}", data.unwrap_or_default()),
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_reach_the_subscriber() {
        init_logging(EnvFilter::new("outcome_wrap=debug")).unwrap();
        assert!(log::log_enabled!(target: "outcome_wrap", log::Level::Debug));
        assert!(!log::log_enabled!(target: "outcome_wrap", log::Level::Trace));
    }
}
