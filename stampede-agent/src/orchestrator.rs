//! Run orchestration: setup, staggered start, deadline, aggregation

use crate::agent::{Agent, AgentSettings};
use crate::auth::AuthClient;
use crate::error::OrchestratorError;
use futures::future::join_all;
use rand::{rngs::StdRng, Rng, SeedableRng};
use stampede_config::StampedeConfig;
use stampede_core::Persona;
use stampede_http::HttpClient;
use stampede_metrics::{spawn_live_display, AggregateReport, MetricsCollector};
use stampede_resilience::{RetryExecutor, RetryPolicy, StopReason, StopSource, StopToken};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Name and persona of one agent to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPlan {
    pub name: String,
    pub persona: Persona,
}

/// Assign personas round-robin. Repeat uses get a `-{n}` suffix.
pub fn plan_agents(personas: &[Persona], count: usize) -> Vec<AgentPlan> {
    if personas.is_empty() {
        return Vec::new();
    }

    let mut uses: HashMap<&str, usize> = HashMap::new();
    (0..count)
        .map(|index| {
            let persona = &personas[index % personas.len()];
            let n = uses.entry(persona.name.as_str()).or_insert(0);
            *n += 1;
            let name = if *n == 1 {
                persona.name.clone()
            } else {
                format!("{}-{}", persona.name, n)
            };
            AgentPlan {
                name,
                persona: persona.clone(),
            }
        })
        .collect()
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub planned_agents: usize,
    pub started_agents: usize,
    /// Agents whose task ended abnormally
    pub crashed_agents: usize,
    pub report: AggregateReport,
}

/// Creates the agents, runs them concurrently and aggregates the result
pub struct Orchestrator {
    config: StampedeConfig,
    http: Arc<dyn HttpClient>,
    collector: Arc<MetricsCollector>,
    stop: StopToken,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("agent_count", &self.config.load.agent_count)
            .field("duration", &self.config.load.duration)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(config: StampedeConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http,
            collector: Arc::new(MetricsCollector::new()),
            stop: StopToken::never(),
        }
    }

    /// Observe an external stop signal, e.g. Ctrl-C
    pub fn with_stop(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_collector(mut self, collector: Arc<MetricsCollector>) -> Self {
        self.collector = collector;
        self
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn config(&self) -> &StampedeConfig {
        &self.config
    }

    pub fn plan(&self) -> Vec<AgentPlan> {
        plan_agents(&self.config.personas, self.config.load.agent_count)
    }

    /// Verify the administrator credentials before any load is generated
    async fn check_admin(&self) -> Result<(), OrchestratorError> {
        let retry = RetryExecutor::new(RetryPolicy::fixed(self.config.http.max_attempts, self.config.http.retry_delay));
        let auth = AuthClient::new(self.http.clone(), retry);
        let target = &self.config.target;

        let pair = auth
            .login(&target.admin_username, &target.admin_password)
            .await
            .map_err(OrchestratorError::AdminLogin)?;
        if let Err(e) = auth.logout(&pair.access_token, Some(pair.refresh_token.as_str())).await {
            warn!("Administrator logout failed: {}", e);
        }
        Ok(())
    }

    fn build_agents(&self, plans: Vec<AgentPlan>) -> Vec<Agent> {
        let settings = AgentSettings::from_config(&self.config);
        let mut seeds = self.config.load.seed.map(StdRng::seed_from_u64);

        plans
            .into_iter()
            .map(|plan| {
                let seed = seeds.as_mut().map(|rng| rng.gen::<u64>());
                Agent::new(
                    plan.name,
                    plan.persona,
                    self.http.clone(),
                    self.config.weights.clone(),
                    settings.clone(),
                    self.collector.clone(),
                    seed,
                )
            })
            .collect()
    }

    /// Run the whole test and return the aggregate report.
    ///
    /// Fails only on setup faults: a rejected administrator login, or no
    /// agent able to log in.
    pub async fn run(&self) -> Result<RunOutcome, OrchestratorError> {
        let run_id = Uuid::new_v4();
        let load = &self.config.load;
        info!(
            run_id = %run_id,
            agents = load.agent_count,
            duration_secs = load.duration.as_secs(),
            target = %self.config.target.api_root(),
            "Starting load run"
        );

        self.check_admin().await?;

        let plans = self.plan();
        let planned_agents = plans.len();
        let mut agents = self.build_agents(plans);

        let results = join_all(agents.iter_mut().map(|agent| agent.initialize())).await;
        let mut ready = Vec::with_capacity(agents.len());
        for (agent, result) in agents.into_iter().zip(results) {
            match result {
                Ok(()) => ready.push(agent),
                Err(e) => warn!("{}", e),
            }
        }
        if ready.is_empty() {
            error!(run_id = %run_id, "No agents could be initialized");
            return Err(OrchestratorError::NoAgents {
                attempted: planned_agents,
            });
        }
        if self.stop.is_stopped() {
            for agent in &mut ready {
                agent.shutdown().await;
            }
            return Err(OrchestratorError::StoppedBeforeStart);
        }

        let started_agents = ready.len();
        info!(run_id = %run_id, ready = started_agents, planned = planned_agents, "Agents initialized");

        self.collector.mark_started();
        let deadline = Instant::now() + load.duration;

        let display_stop = StopSource::new();
        let display = spawn_live_display(self.collector.clone(), load.live_interval, display_stop.token());

        let handles: Vec<_> = ready
            .into_iter()
            .enumerate()
            .map(|(index, mut agent)| {
                let stop = self.stop.clone();
                let offset = load.stagger * index as u32;
                tokio::spawn(async move {
                    stop.sleep_or_stop(offset).await;
                    agent.run(deadline, stop).await;
                })
            })
            .collect();

        let mut crashed_agents = 0;
        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(run_id = %run_id, "Agent task failed: {}", e);
                crashed_agents += 1;
            }
        }

        self.collector.mark_finished();
        display_stop.stop(StopReason::Requested);
        if let Err(e) = display.await {
            warn!("Live display task failed: {}", e);
        }

        let report = self.collector.generate_report(&self.config.thresholds);
        info!(
            run_id = %run_id,
            total = report.summary.total_actions,
            failed = report.summary.failed_actions,
            verdict = %report.verdict,
            "Load run finished"
        );

        Ok(RunOutcome {
            run_id,
            planned_agents,
            started_agents,
            crashed_agents,
            report,
        })
    }
}
