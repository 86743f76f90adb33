//! `stampede run` handler

use crate::cli::RunArgs;
use crate::output::{render_summary, write_report};
use anyhow::{Context, Result};
use stampede_agent::Orchestrator;
use stampede_config::StampedeConfig;
use stampede_http::{HttpConfig, ReqwestClient};
use stampede_resilience::{StopReason, StopSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(config: &mut StampedeConfig, args: &RunArgs) {
    if let Some(base_url) = &args.base_url {
        config.target.base_url = base_url.clone();
    }
    if let Some(agents) = args.agents {
        config.load.agent_count = agents;
    }
    if let Some(secs) = args.duration {
        config.load.duration = Duration::from_secs(secs);
    }
    if args.seed.is_some() {
        config.load.seed = args.seed;
    }
}

/// Execute a load run. Returns whether the process should exit cleanly.
pub async fn handle_run(config: StampedeConfig, args: &RunArgs) -> Result<bool> {
    let http = ReqwestClient::new(config.target.api_root(), &HttpConfig::from(&config.http))
        .context("Failed to build HTTP client")?;

    let stop = Arc::new(StopSource::new());
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping agents");
            signal_stop.stop(StopReason::Requested);
        }
    });

    let outcome = Orchestrator::new(config, Arc::new(http))
        .with_stop(stop.token())
        .run()
        .await
        .context("Load run failed")?;

    println!("{}", render_summary(&outcome));

    if let Some(path) = &args.output {
        write_report(path, &outcome.report)?;
        info!("Report written to {:?}", path);
        println!("📝 Report written to {:?}", path);
    }

    Ok(outcome.report.passed() || !args.fail_on_verdict)
}
