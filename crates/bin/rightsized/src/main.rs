//! # rightsized — EC2 right-sizing daemon
//!
//! Composition root that wires the AWS adapters into the rightsize service.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise the tracing subscriber
//! - Load the shared AWS SDK configuration and build the adapters
//! - Construct the rightsize service, injecting adapters via port traits
//! - On Lambda (`AWS_LAMBDA_RUNTIME_API` set), serve invocations until the
//!   runtime shuts the process down
//! - Elsewhere, run a single invocation and print the JSON response
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context as _;
use lambda_runtime::{LambdaEvent, service_fn};
use rightsize_app::invocation::{Invocation, InvocationResponse, handle_invocation};
use rightsize_app::services::rightsize_service::RightsizeService;
use rightsize_domain::time;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let on_lambda = std::env::var_os(LAMBDA_RUNTIME_API).is_some();

    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_ansi(!on_lambda)
        .init();

    // Adapters
    let policy = config.rightsize_policy()?;
    let adapters = config.aws_config().build().await;

    tracing::debug!(topic_arn = adapters.notifier.topic_arn(), "notifier configured");

    // Service
    let service = Arc::new(RightsizeService::new(
        adapters.compute,
        adapters.metrics,
        adapters.notifier,
        policy,
    ));
    tracing::info!(
        target_type = %service.policy().target,
        threshold = service.policy().cpu_threshold_percent,
        on_lambda,
        "rightsized ready"
    );

    if on_lambda {
        lambda_runtime::run(service_fn(move |event: LambdaEvent<serde_json::Value>| {
            let service = Arc::clone(&service);
            async move {
                let invocation = invocation_from_event(event);
                let response = handle_invocation(service.as_ref(), invocation).await;
                Ok::<InvocationResponse, lambda_runtime::Error>(response)
            }
        }))
        .await
        .map_err(|err| anyhow::anyhow!(err))
        .context("lambda runtime stopped")?;
    } else {
        let response = handle_invocation(service.as_ref(), Invocation::default()).await;
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}

/// Translate a Lambda event into an invocation; the context deadline is in
/// epoch milliseconds.
fn invocation_from_event(event: LambdaEvent<serde_json::Value>) -> Invocation {
    let (payload, context) = event.into_parts();
    Invocation {
        payload,
        deadline: i64::try_from(context.deadline)
            .ok()
            .and_then(time::from_epoch_millis),
    }
}
