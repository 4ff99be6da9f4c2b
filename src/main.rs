use autoblog::config::Config;
use autoblog::pipeline::{run_once, RunOutcome};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    info!("starting auto blog bot");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match run_once(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("pipeline error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &outcome {
        RunOutcome::Published { detail } => info!("{}", detail),
        RunOutcome::NothingToPublish => info!("nothing to publish"),
        RunOutcome::GenerationFailed { reason } => error!("generation failed: {}", reason),
        RunOutcome::DeliveryFailed { reason } => error!("delivery failed: {}", reason),
    }

    info!("bot execution complete");

    // Exit reflects only whether a post was actually sent.
    if outcome.is_published() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
