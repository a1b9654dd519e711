//! Simulated token streaming with throughput metering.
//!
//! A [`StreamingSession`] stands in for a real provider call. It validates
//! the submitted credentials and message, then yields a [`SessionEvent`]
//! per simulated chunk, pausing between chunks, and finishes with the
//! elapsed time and tokens-per-second.
//!
//! # Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use tpsmeter_models::credentials::CredentialSet;
//! use tpsmeter_models::session::{SessionEvent, StreamingSession};
//! use tpsmeter_models::{Model, ModelRegistry, Provider};
//!
//! # async fn example() {
//! let resolved = ModelRegistry::builtin()
//!     .resolve(Provider::Anthropic, Model::Claude3Haiku)
//!     .unwrap();
//! let mut credentials = CredentialSet::new();
//! credentials.insert("anthropic_api_key", "sk-ant-...");
//!
//! let mut stream = StreamingSession::new(resolved)
//!     .run(&credentials, "Hello!")
//!     .unwrap();
//! while let Some(event) = stream.next().await {
//!     if let SessionEvent::Completed(result) = event {
//!         println!("{:?} tokens/s", result.tokens_per_second);
//!     }
//! }
//! # }
//! ```

mod clock;
mod types;

use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream;
use tokio::time::Instant;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

pub use clock::{Clock, FrozenClock, TokioClock};
pub use types::*;

use crate::credentials::CredentialSet;
use crate::error::{Problem, Rejection};
use crate::ResolvedModel;

/// A stream of session events.
///
/// Ends after a [`SessionEvent::Completed`] or [`SessionEvent::Cancelled`].
pub type SessionStream = Pin<Box<dyn Stream<Item = SessionEvent> + Send>>;

/// One simulated test run against a provider/model pair.
pub struct StreamingSession {
    model: ResolvedModel,
    config: SimulationConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl StreamingSession {
    /// Create a session with the default simulation parameters.
    pub fn new(model: ResolvedModel) -> Self {
        Self {
            model,
            config: SimulationConfig::default(),
            clock: Arc::new(TokioClock),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the simulation parameters.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this session between iterations.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The provider/model pair this session simulates.
    pub fn model(&self) -> &ResolvedModel {
        &self.model
    }

    /// Check credentials and message without starting the run.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] listing every problem found.
    pub fn validate(&self, credentials: &CredentialSet, message: &str) -> Result<(), Rejection> {
        let mut problems = Vec::new();
        if message.trim().is_empty() {
            problems.push(Problem::EmptyMessage);
        }
        problems.extend(
            credentials
                .missing_fields(self.model.provider)
                .into_iter()
                .map(|field| Problem::MissingCredential { field }),
        );

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Rejection::new(problems))
        }
    }

    /// Validate, then start the simulated stream.
    ///
    /// Nothing is emitted and no time is measured until the stream is polled.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if validation fails; the session never starts.
    pub fn run(self, credentials: &CredentialSet, message: &str) -> Result<SessionStream, Rejection> {
        let mut state = SessionState::Idle;
        advance(&mut state, SessionState::Validating);

        if let Err(rejection) = self.validate(credentials, message) {
            advance(&mut state, SessionState::Rejected);
            debug!(
                provider = %self.model.provider,
                model = %self.model.model,
                missing = ?rejection.missing_fields(),
                "session rejected"
            );
            return Err(rejection);
        }

        debug!(
            provider = %self.model.provider,
            model = %self.model.model,
            api_identifier = self.model.api_identifier,
            iterations = self.config.iterations,
            "session starting"
        );

        let driver = Driver {
            config: self.config,
            clock: self.clock,
            cancel: self.cancel,
            state,
            step: Step::Thinking,
            text: String::new(),
            token_count: 0,
            started: None,
        };

        Ok(Box::pin(stream::unfold(driver, |mut driver| async move {
            let event = driver.next_event().await?;
            Some((event, driver))
        })))
    }
}

fn advance(state: &mut SessionState, next: SessionState) {
    debug_assert!(
        state.can_transition_to(&next),
        "illegal session transition {state:?} -> {next:?}"
    );
    trace!(from = ?state, to = ?next, "session state");
    *state = next;
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Thinking,
    Start,
    Chunk(u32),
    /// Pause after chunk `n` has been delivered.
    Pause(u32),
    Done,
}

struct Driver {
    config: SimulationConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    state: SessionState,
    step: Step,
    text: String,
    token_count: u64,
    started: Option<Instant>,
}

impl Driver {
    async fn next_event(&mut self) -> Option<SessionEvent> {
        let total = self.config.iterations;
        loop {
            match self.step {
                Step::Thinking => {
                    self.step = Step::Start;
                    return Some(SessionEvent::Thinking {
                        text: THINKING_NOTICE,
                    });
                }
                Step::Start => {
                    self.started = Some(self.clock.now());
                    if total == 0 {
                        return Some(self.complete());
                    }
                    advance(
                        &mut self.state,
                        SessionState::Running {
                            iteration: 0,
                            total,
                        },
                    );
                    self.step = Step::Chunk(0);
                }
                Step::Chunk(iteration) => {
                    if self.cancel.is_cancelled() {
                        return Some(self.cancelled(iteration));
                    }
                    if iteration > 0 {
                        advance(&mut self.state, SessionState::Running { iteration, total });
                    }

                    let chunk = self.config.fragment(iteration);
                    self.text.push_str(chunk);
                    self.token_count += word_count(chunk);
                    self.step = Step::Pause(iteration);

                    return Some(SessionEvent::Snapshot(Snapshot {
                        iteration,
                        total,
                        chunk,
                        text: self.text.clone(),
                        token_count: self.token_count,
                    }));
                }
                Step::Pause(iteration) => {
                    tokio::select! {
                        () = tokio::time::sleep(self.config.interval) => {}
                        () = self.cancel.cancelled() => {}
                    }
                    let delivered = iteration + 1;
                    if self.cancel.is_cancelled() {
                        return Some(self.cancelled(delivered));
                    }
                    if delivered == total {
                        return Some(self.complete());
                    }
                    self.step = Step::Chunk(delivered);
                }
                Step::Done => return None,
            }
        }
    }

    fn elapsed(&self) -> std::time::Duration {
        let end = self.clock.now();
        self.started
            .map(|start| end.saturating_duration_since(start))
            .unwrap_or_default()
    }

    fn complete(&mut self) -> SessionEvent {
        advance(&mut self.state, SessionState::Completed);
        self.step = Step::Done;

        let elapsed = self.elapsed();
        let result = StreamingResult {
            text: std::mem::take(&mut self.text),
            token_count: self.token_count,
            elapsed,
            tokens_per_second: tokens_per_second(self.token_count, elapsed),
        };
        info!(
            tokens = result.token_count,
            elapsed = ?elapsed,
            tps = ?result.tokens_per_second,
            "session completed"
        );
        SessionEvent::Completed(result)
    }

    fn cancelled(&mut self, completed_iterations: u32) -> SessionEvent {
        advance(&mut self.state, SessionState::Cancelled);
        self.step = Step::Done;

        let elapsed = self.elapsed();
        info!(
            completed_iterations,
            total = self.config.iterations,
            "session cancelled"
        );
        SessionEvent::Cancelled(PartialResult {
            text: std::mem::take(&mut self.text),
            token_count: self.token_count,
            completed_iterations,
            total_iterations: self.config.iterations,
            elapsed,
            partial_tokens_per_second: tokens_per_second(self.token_count, elapsed),
        })
    }
}
