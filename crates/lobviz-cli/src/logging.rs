use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Installs the stderr subscriber. Stdout stays reserved for the envelope.
pub fn init(filter: &str) -> Result<(), CliError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|error| CliError::Logging {
        filter: filter.to_owned(),
        message: error.to_string(),
    })?;

    // A second init (tests) keeps the first subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();

    Ok(())
}
