//! Agent runtime: one simulated user

use crate::actions::{build_request, KnownItems, ReferenceCache};
use crate::auth::{AuthClient, PersonaLogin, Reauthenticator};
use crate::error::AgentError;
use crate::selector::{ActionSelector, Constraint};
use crate::session::Session;
use crate::transport::Transport;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stampede_config::StampedeConfig;
use stampede_core::{ActionEvent, ActionKind, Persona, WeightTable};
use stampede_http::{ApiRequest, HttpClient};
use stampede_metrics::MetricsCollector;
use stampede_resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryExecutor, RetryPolicy, StopToken};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Consecutive failures after which the agent re-logs in on its own
const AGENT_REAUTH_THRESHOLD: u32 = 2;

/// Lifecycle of an agent. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Initializing,
    Running,
    Stopped,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentState::Initializing => write!(f, "initializing"),
            AgentState::Running => write!(f, "running"),
            AgentState::Stopped => write!(f, "stopped"),
        }
    }
}

/// What one loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An event was recorded
    Completed { action: ActionKind, success: bool },
    /// The chosen action had nothing to act on; no event recorded
    Skipped(ActionKind),
    /// The circuit breaker opened; the agent is now stopped
    Tripped,
    /// The agent was already stopped; nothing happened
    Stopped,
}

/// Per-agent tunables
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub password: String,
    pub pacing_min: Duration,
    pub pacing_max: Duration,
    pub token_freshness: Duration,
    pub breaker: CircuitBreakerConfig,
    pub backoff_delay: Duration,
    pub known_items_limit: usize,
    pub retry: RetryPolicy,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            password: "password".to_string(),
            pacing_min: Duration::from_millis(1000),
            pacing_max: Duration::from_millis(3000),
            token_freshness: Duration::from_secs(12 * 60),
            breaker: CircuitBreakerConfig::default(),
            backoff_delay: Duration::from_millis(5000),
            known_items_limit: 100,
            retry: RetryPolicy::default(),
        }
    }
}

impl AgentSettings {
    pub fn from_config(config: &StampedeConfig) -> Self {
        Self {
            password: config.target.agent_password.clone(),
            pacing_min: config.load.pacing_min,
            pacing_max: config.load.pacing_max,
            token_freshness: config.agent.token_freshness,
            breaker: CircuitBreakerConfig {
                backoff_threshold: config.agent.backoff_threshold,
                failure_threshold: config.agent.circuit_threshold,
            },
            backoff_delay: config.agent.backoff_delay,
            known_items_limit: config.agent.known_items_limit,
            retry: RetryPolicy::fixed(config.http.max_attempts, config.http.retry_delay),
        }
    }

    /// Uniform delay within the pacing range, scaled by the persona's pace
    pub fn pacing_delay<R: Rng>(&self, persona: &Persona, rng: &mut R) -> Duration {
        let min = self.pacing_min.as_millis() as u64;
        let max = self.pacing_max.as_millis() as u64;
        let base = if max > min { rng.gen_range(min..=max) } else { min };
        Duration::from_millis((base as f64 * persona.pace.multiplier()).round() as u64)
    }
}

/// One simulated user driving actions until its deadline
pub struct Agent {
    name: String,
    persona: Persona,
    settings: AgentSettings,
    state: AgentState,
    session: Session,
    transport: Transport,
    login: Arc<PersonaLogin>,
    selector: ActionSelector,
    rng: StdRng,
    known: KnownItems,
    refs: ReferenceCache,
    breaker: CircuitBreaker,
    collector: Arc<MetricsCollector>,
    last_unauthorized: bool,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("persona", &self.persona)
            .finish()
    }
}

impl Agent {
    /// Build an agent. `seed` makes action choice, pacing and payloads
    /// reproducible.
    pub fn new(
        name: impl Into<String>,
        persona: Persona,
        http: Arc<dyn HttpClient>,
        weights: WeightTable,
        settings: AgentSettings,
        collector: Arc<MetricsCollector>,
        seed: Option<u64>,
    ) -> Self {
        let mut master = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let selector = ActionSelector::new(weights, persona.bias, StdRng::seed_from_u64(master.gen()));

        let retry = RetryExecutor::new(settings.retry.clone());
        let auth = AuthClient::new(http.clone(), retry.clone());
        let login = Arc::new(PersonaLogin::new(auth.clone(), persona.name.clone(), settings.password.clone()));
        let reauth: Arc<dyn Reauthenticator> = login.clone();

        Self {
            name: name.into(),
            session: Session::new(settings.token_freshness),
            transport: Transport::new(http, retry, auth, reauth),
            login,
            selector,
            rng: master,
            known: KnownItems::new(settings.known_items_limit),
            refs: ReferenceCache::default(),
            breaker: CircuitBreaker::new(settings.breaker),
            collector,
            last_unauthorized: false,
            state: AgentState::Initializing,
            persona,
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.breaker.consecutive_failures()
    }

    pub fn known_items(&self) -> &KnownItems {
        &self.known
    }

    pub fn reference_cache(&self) -> &ReferenceCache {
        &self.refs
    }

    /// Log in and fill the reference caches.
    ///
    /// Only the login can fail; an empty cache just disables the actions
    /// that need it.
    pub async fn initialize(&mut self) -> Result<(), AgentError> {
        if self.state == AgentState::Stopped {
            return Err(AgentError::AlreadyStopped(self.name.clone()));
        }
        self.state = AgentState::Initializing;

        self.login
            .login(&mut self.session)
            .await
            .map_err(|source| AgentError::Login {
                agent: self.name.clone(),
                source,
            })?;

        let categories = self.fetch_reference("/categories").await;
        let locations = self.fetch_reference("/locations").await;
        self.refs.set_categories(categories);
        self.refs.set_locations(locations);

        debug!(
            agent = %self.name,
            categories = self.refs.categories().len(),
            locations = self.refs.locations().len(),
            "Agent initialized"
        );
        Ok(())
    }

    async fn fetch_reference(&mut self, path: &str) -> Vec<serde_json::Value> {
        match self.transport.execute(&mut self.session, ApiRequest::get(path)).await {
            Ok(response) if response.is_success() => ReferenceCache::ids_from(&response),
            Ok(response) => {
                warn!(agent = %self.name, "Could not load {}: {}", path, response.error_message());
                Vec::new()
            }
            Err(e) => {
                warn!(agent = %self.name, "Could not load {}: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Mark the agent live and visible in the collector's live set
    pub fn start(&mut self) {
        if self.state == AgentState::Stopped {
            return;
        }
        self.state = AgentState::Running;
        self.collector.register_agent(&self.name);
    }

    fn constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::new();
        if self.known.is_empty() {
            constraints.push(Constraint::NoKnownItems);
        }
        if !self.refs.can_create() {
            constraints.push(Constraint::NoReferenceData);
        }
        if !self.persona.is_elevated() {
            constraints.push(Constraint::StandardRole);
        }
        constraints
    }

    /// Refresh a stale token, falling back to a full login
    async fn ensure_fresh_session(&mut self) {
        if !self.session.has_token() || !self.session.is_stale() {
            return;
        }

        debug!(agent = %self.name, "Token stale, refreshing");
        if self.session.refresh(self.transport.auth()).await {
            return;
        }
        if self.login.reauthenticate(&mut self.session).await {
            return;
        }

        warn!(agent = %self.name, "Could not renew stale session");
        self.breaker.record_failure();
    }

    /// Run one iteration without pacing.
    pub async fn step(&mut self) -> StepOutcome {
        if self.state == AgentState::Stopped {
            return StepOutcome::Stopped;
        }
        if self.state == AgentState::Initializing {
            self.start();
        }

        self.ensure_fresh_session().await;
        if self.breaker.is_open() {
            return self.trip();
        }

        let action = self.selector.select(&self.constraints());
        let Some(request) = build_request(action, &mut self.rng, &self.known, &self.refs) else {
            debug!(agent = %self.name, action = %action, "Skipping action, nothing to act on");
            return StepOutcome::Skipped(action);
        };

        let start_time = Utc::now();
        let started = Instant::now();
        let result = self.transport.execute(&mut self.session, request).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let success = match result {
            Ok(response) if response.is_success() => {
                self.known.absorb(action, &response);
                self.last_unauthorized = false;
                self.breaker.record_success();
                self.collector.record(ActionEvent::succeeded(
                    &self.name,
                    action,
                    start_time,
                    duration_ms,
                    response.status,
                ));
                true
            }
            Ok(response) => {
                self.last_unauthorized = response.is_unauthorized();
                self.breaker.record_failure();
                debug!(agent = %self.name, action = %action, status = response.status, "Action failed");
                self.collector.record(ActionEvent::failed(
                    &self.name,
                    action,
                    start_time,
                    duration_ms,
                    response.status,
                    response.error_message(),
                ));
                false
            }
            Err(e) => {
                self.last_unauthorized = false;
                self.breaker.record_failure();
                debug!(agent = %self.name, action = %action, "Action failed: {}", e);
                self.collector
                    .record(ActionEvent::failed(&self.name, action, start_time, duration_ms, 0, e.to_string()));
                false
            }
        };

        if self.breaker.is_open() {
            return self.trip();
        }

        if !success
            && self.breaker.consecutive_failures() >= AGENT_REAUTH_THRESHOLD
            && (self.last_unauthorized || !self.session.has_token())
        {
            debug!(agent = %self.name, "Repeated auth failures, logging in again");
            self.login.reauthenticate(&mut self.session).await;
        }

        StepOutcome::Completed { action, success }
    }

    fn trip(&mut self) -> StepOutcome {
        warn!(
            agent = %self.name,
            failures = self.breaker.consecutive_failures(),
            "Circuit breaker open, stopping agent"
        );
        self.state = AgentState::Stopped;
        StepOutcome::Tripped
    }

    /// Delay before the next iteration, including any back-off
    fn next_delay(&mut self) -> Duration {
        let mut delay = self.settings.pacing_delay(&self.persona, &mut self.rng);
        if self.breaker.state() == CircuitState::BackingOff {
            delay += self.settings.backoff_delay;
        }
        delay
    }

    /// Loop until `deadline`, a stop signal, or the breaker opens, then
    /// log out and leave the live set.
    pub async fn run(&mut self, deadline: Instant, stop: StopToken) {
        self.start();
        info!(agent = %self.name, persona = %self.persona.name, "Agent running");

        while self.state == AgentState::Running {
            if Instant::now() >= deadline || stop.is_stopped() {
                break;
            }

            if self.step().await == StepOutcome::Tripped {
                break;
            }

            let delay = self.next_delay().min(deadline.saturating_duration_since(Instant::now()));
            if !stop.sleep_or_stop(delay).await {
                break;
            }
        }

        self.shutdown().await;
    }

    /// Best-effort logout, then leave the live set
    pub async fn shutdown(&mut self) {
        if let Some(access) = self.session.access_token().map(str::to_string) {
            let refresh = self.session.refresh_token().map(str::to_string);
            if let Err(e) = self.transport.auth().logout(&access, refresh.as_deref()).await {
                debug!(agent = %self.name, "Logout failed: {}", e);
            }
        }
        self.session.clear_tokens();
        self.state = AgentState::Stopped;
        self.collector.deregister_agent(&self.name);
        info!(
            agent = %self.name,
            failures = self.breaker.total_failures(),
            successes = self.breaker.total_successes(),
            "Agent stopped"
        );
    }
}
