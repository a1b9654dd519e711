//! Events, results and state for a simulated streaming session.

use std::time::Duration;

use serde::Serialize;

/// Fragment appended on every fifth iteration.
pub const FRAGMENT_A: &str = "This is a simulated response token. ";
/// Fragment appended on all other iterations.
pub const FRAGMENT_B: &str = "More content... ";
/// Notice shown before the first chunk.
pub const THINKING_NOTICE: &str =
    "Analyzing query... Formulating response strategy... Retrieving relevant information...";

/// Parameters of the simulated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of chunks to emit.
    pub iterations: u32,
    /// Pause after each chunk.
    pub interval: Duration,
    /// Every `cadence`-th iteration (starting at 0) uses `fragment_a`.
    pub cadence: u32,
    pub fragment_a: &'static str,
    pub fragment_b: &'static str,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            interval: Duration::from_millis(100),
            cadence: 5,
            fragment_a: FRAGMENT_A,
            fragment_b: FRAGMENT_B,
        }
    }
}

impl SimulationConfig {
    /// Set the iteration count.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the pause between chunks.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fragment for iteration `i`.
    pub fn fragment(&self, iteration: u32) -> &'static str {
        if self.cadence != 0 && iteration % self.cadence == 0 {
            self.fragment_a
        } else {
            self.fragment_b
        }
    }

    /// Token count a full, uncancelled run will report.
    pub fn expected_tokens(&self) -> u64 {
        (0..self.iterations)
            .map(|i| word_count(self.fragment(i)))
            .sum()
    }

    /// Minimum wall-clock time a full run takes.
    pub fn minimum_duration(&self) -> Duration {
        self.interval * self.iterations
    }
}

/// Tokens are approximated as whitespace-separated words.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Throughput in tokens per second, or `None` when no time has elapsed.
pub fn tokens_per_second(tokens: u64, elapsed: Duration) -> Option<f64> {
    if elapsed.is_zero() {
        None
    } else {
        Some(tokens as f64 / elapsed.as_secs_f64())
    }
}

/// Accumulated output after one iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Zero-based iteration that produced this snapshot.
    pub iteration: u32,
    /// Total iterations planned for the run.
    pub total: u32,
    /// Fragment appended in this iteration.
    pub chunk: &'static str,
    /// Full text accumulated so far.
    pub text: String,
    /// Tokens counted so far.
    pub token_count: u64,
}

/// Final outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamingResult {
    pub text: String,
    pub token_count: u64,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
    /// `None` when elapsed time was zero.
    pub tokens_per_second: Option<f64>,
}

/// Outcome of a run that was cancelled between iterations.
///
/// Throughput here covers only the chunks delivered before cancellation.
/// A completed run's elapsed time ends after the last pause, so a cancel
/// during that pause still lands here with `completed_iterations` equal to
/// `total_iterations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialResult {
    pub text: String,
    pub token_count: u64,
    pub completed_iterations: u32,
    pub total_iterations: u32,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
    pub partial_tokens_per_second: Option<f64>,
}

/// Item yielded by a running session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Reasoning notice shown before output starts.
    Thinking { text: &'static str },
    /// One chunk was appended.
    Snapshot(Snapshot),
    /// All iterations finished.
    Completed(StreamingResult),
    /// Cancelled before the last pause finished.
    Cancelled(PartialResult),
}

impl SessionEvent {
    /// Whether this is the last event of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::Completed(_) | SessionEvent::Cancelled(_))
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Not started
    Idle,
    /// Checking credentials and message
    Validating,
    /// Emitting chunk `iteration` of `total`
    Running { iteration: u32, total: u32 },
    Completed,
    /// Validation failed; nothing ran
    Rejected,
    Cancelled,
}

impl SessionState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Rejected | SessionState::Cancelled
        )
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Idle, Validating) => true,
            (Validating, Rejected) => true,
            (Validating, Running { iteration: 0, .. }) => true,
            // Zero-iteration runs complete straight from validation.
            (Validating, Completed) => true,
            (
                Running { iteration, total },
                Running {
                    iteration: following,
                    total: following_total,
                },
            ) => *following == iteration + 1 && following_total == total && following < total,
            (Running { .. }, Completed | Cancelled) => true,
            _ => false,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
