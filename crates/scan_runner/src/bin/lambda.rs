//! Event-driven entry point: each invocation runs one scan configured from the
//! environment and returns the notification body (empty when nothing was found).

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use scan_runner::{TriggerConfig, run_triggered};
use serde_json::Value;

async fn function_handler(_event: LambdaEvent<Value>) -> Result<String, Error> {
    let config = TriggerConfig::from_env()?;
    let outcome = run_triggered(&config).await?;

    if !outcome.report.failures.is_empty() {
        log::warn!(
            "{} campgrounds could not be checked",
            outcome.report.failures.len()
        );
    }

    Ok(outcome.message().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    run(service_fn(function_handler)).await
}
