//! Binary entry point: parses configuration, builds the composition
//! root, and runs the background scheduler and feedback drain tasks
//! until a shutdown signal arrives.

mod config;
mod context;
mod llm_client;

use std::time::Duration;

use anyhow::Context as _;
use router_tokio::{try_join_tasks_and_shutdown, RouterTask};
use tracing::info;

use crate::config::RouterConfig;
use crate::context::RouterContext;

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);
const FEEDBACK_DRAIN_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    router_logger::init();

    let config = RouterConfig::from_env().context("failed to load router configuration")?;
    info!(strategy = ?config.routing_strategy, "starting routing engine service");

    let ctx = RouterContext::bootstrap(&config);

    let scheduler_shutdown = ctx.shutdown.clone();
    let scheduler = ctx.scheduler.clone();
    let scheduler_task = RouterTask::spawn("renewal-scheduler", async move {
        scheduler.run(scheduler_shutdown).await;
    });

    let mut feedback_shutdown = ctx.shutdown.clone();
    let feedback_store = ctx.feedback_store.clone();
    let intelligence_repository = ctx.intelligence_repository.clone();
    let feedback_task = RouterTask::spawn("feedback-drain", async move {
        let aggregator = router_intel::Aggregator::default();
        loop {
            tokio::select! {
                biased;
                () = feedback_shutdown.recv() => break,
                () = tokio::time::sleep(FEEDBACK_DRAIN_INTERVAL) => {
                    let provider = router_intel::InternalFeedbackDataProvider::new(feedback_store.as_ref());
                    match provider.drain_into(&aggregator).await {
                        Ok(performance) => {
                            for record in performance {
                                if let Err(e) = intelligence_repository.save(record).await {
                                    tracing::warn!(error = %e, "failed to save aggregated performance record");
                                }
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "failed to drain feedback store"),
                    }
                }
            }
        }
    });

    let shutdown = ctx.shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
        shutdown.send();
    });

    try_join_tasks_and_shutdown(vec![scheduler_task, feedback_task], ctx.shutdown, SHUTDOWN_GRACE_PERIOD)
        .await
        .map_err(|e| anyhow::anyhow!("background tasks failed to shut down cleanly: {e}"))
}
