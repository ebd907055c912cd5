//! The polling loop.
//!
//! # State Transitions
//! ```text
//! Polling → Revealed:        body == "ok"
//! Polling → Polling:         any other body (lenient), "fail" or transport error (strict)
//! Polling → ErrorDisplayed:  unrecognized body (strict); polling continues
//! * → GaveUp:                retry budget exhausted
//! * → Cancelled:             cancel token triggered
//! ```
//!
//! When the backoff grows past the notice threshold the view shows
//! "Giving up." but polling carries on. Only the retry budget ends it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{BackoffConfig, DispatchMode, PollerConfig};
use crate::lifecycle::CancelToken;
use crate::observability::metrics;
use crate::poller::dispatch::classify;
use crate::poller::scheduler::{Scheduler, TokioScheduler};
use crate::poller::{PollReport, PollResult, PollState, ResourceId};
use crate::resilience::{Backoff, RetryBudget};
use crate::transport::{Endpoints, Transport, TransportError};
use crate::view::View;

/// Debug text shown once the backoff passes the notice threshold.
pub const GIVING_UP_NOTICE: &str = "Giving up.";

/// Behaviour knobs for an [`ImagePoller`].
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub dispatch: DispatchMode,
    pub backoff: BackoffConfig,
    pub budget: RetryBudget,
    pub show_metadata: bool,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            dispatch: DispatchMode::default(),
            backoff: BackoffConfig::default(),
            budget: RetryBudget::unbounded(),
            show_metadata: true,
        }
    }
}

impl PollerSettings {
    pub fn from_config(config: &PollerConfig) -> Self {
        Self {
            dispatch: config.dispatch.mode,
            backoff: config.backoff.clone(),
            budget: RetryBudget::from_config(&config.limits),
            show_metadata: config.view.show_metadata,
        }
    }
}

/// What the loop does after a status check.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The image was attached; stop.
    Reveal { image_src: String },
    /// Wait `delay`, then check again with `next`.
    Retry {
        delay: Duration,
        next: Backoff,
        state: PollState,
    },
}

/// Polls a render server until a resource is ready, then shows it.
pub struct ImagePoller {
    transport: Arc<dyn Transport>,
    view: Arc<dyn View>,
    scheduler: Arc<dyn Scheduler>,
    endpoints: Endpoints,
    settings: PollerSettings,
}

impl ImagePoller {
    /// Create a poller with a real timer and default settings.
    pub fn new(transport: Arc<dyn Transport>, view: Arc<dyn View>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            view,
            scheduler: Arc::new(TokioScheduler),
            endpoints,
            settings: PollerSettings::default(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_settings(mut self, settings: PollerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Decide the next step for a raw status body.
    pub fn handle_result(&self, id: &ResourceId, backoff: Backoff, raw: &str) -> Step {
        match classify(self.settings.dispatch, raw) {
            PollResult::Ready => self.reveal(id),
            PollResult::Pending => self.retry(backoff, PollState::Polling),
            PollResult::Unrecognized(value) => {
                tracing::warn!(value = %value, "Unexpected status body");
                self.view.alert(&format!("Unexpected Result: {}", value));
                self.retry(backoff, PollState::ErrorDisplayed)
            }
        }
    }

    /// Like [`handle_result`](Self::handle_result), folding transport
    /// failures into the retry branch.
    pub fn handle_response(
        &self,
        id: &ResourceId,
        backoff: Backoff,
        response: Result<String, TransportError>,
    ) -> Step {
        match response {
            Ok(body) => self.handle_result(id, backoff, &body),
            Err(e) => {
                tracing::warn!(error = %e, "Status check failed, treating as not ready");
                self.retry(backoff, PollState::Polling)
            }
        }
    }

    /// Poll `id` until it is revealed, the budget runs out, or `cancel` fires.
    pub async fn run(&self, id: ResourceId, initial_backoff_secs: f64, cancel: &CancelToken) -> PollReport {
        let sequence_id = Uuid::new_v4();
        let span = tracing::info_span!("poll", %sequence_id, identifier = %id);
        self.poll_loop(sequence_id, id, initial_backoff_secs, cancel)
            .instrument(span)
            .await
    }

    async fn poll_loop(
        &self,
        sequence_id: Uuid,
        id: ResourceId,
        initial_backoff_secs: f64,
        cancel: &CancelToken,
    ) -> PollReport {
        let started = Instant::now();
        let status_url = self.endpoints.status_url(&id);
        let mut backoff = Backoff::from_config(initial_backoff_secs, &self.settings.backoff);
        let mut report = PollReport {
            sequence_id,
            identifier: id.clone(),
            state: PollState::Polling,
            attempts: 0,
            delays_ms: Vec::new(),
            elapsed_ms: 0,
            image_src: None,
        };

        tracing::info!(url = %status_url, initial_backoff_secs, "Polling started");

        loop {
            if backoff.exceeds(self.settings.backoff.give_up_notice_secs) {
                tracing::warn!(backoff_secs = backoff.secs(), "Backoff past notice threshold, still polling");
                self.view.show_debug(GIVING_UP_NOTICE);
            }

            if cancel.is_cancelled() {
                report.state = PollState::Cancelled;
                break;
            }

            report.attempts += 1;
            metrics::record_attempt();

            let response = tokio::select! {
                response = self.transport.post(status_url.clone()) => Some(response),
                _ = cancel.cancelled() => None,
            };
            let Some(response) = response else {
                report.state = PollState::Cancelled;
                break;
            };

            match self.handle_response(&id, backoff, response) {
                Step::Reveal { image_src } => {
                    report.state = PollState::Revealed;
                    report.image_src = Some(image_src);
                    break;
                }
                Step::Retry { delay, next, state } => {
                    report.state = state;

                    if let Err(exhausted) = self.settings.budget.check(report.attempts, started.elapsed(), delay) {
                        tracing::warn!(attempts = report.attempts, reason = %exhausted, "Giving up");
                        self.view.show_debug(&format!(
                            "Giving up: {} after {} attempts.",
                            exhausted, report.attempts
                        ));
                        report.state = PollState::GaveUp(exhausted);
                        break;
                    }

                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    report.delays_ms.push(delay_ms);
                    metrics::record_backoff(backoff.secs());
                    tracing::debug!(
                        attempt = report.attempts,
                        delay_ms,
                        next_backoff_secs = next.secs(),
                        "Not ready, rescheduling"
                    );

                    let slept = tokio::select! {
                        _ = self.scheduler.sleep(delay) => true,
                        _ = cancel.cancelled() => false,
                    };
                    if !slept {
                        report.state = PollState::Cancelled;
                        break;
                    }
                    backoff = next;
                }
            }
        }

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        metrics::record_outcome(&report.state);
        tracing::info!(
            state = ?report.state,
            attempts = report.attempts,
            elapsed_ms = report.elapsed_ms,
            "Polling finished"
        );
        report
    }

    fn reveal(&self, id: &ResourceId) -> Step {
        let image_src = self.endpoints.render_path(id);
        self.view.hide_loading();
        self.view.attach_image(&image_src);
        if self.settings.show_metadata {
            self.view.show_metadata(id);
        }
        Step::Reveal { image_src }
    }

    fn retry(&self, backoff: Backoff, state: PollState) -> Step {
        Step::Retry {
            delay: backoff.delay(),
            next: backoff.next(),
            state,
        }
    }
}
