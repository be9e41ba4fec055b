use std::collections::BTreeSet;
use std::{future::Future, time::Duration};
use tripwise_core::{Result, TripwiseError};

/// Status codes retried when nothing else is configured.
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 4] = [429, 500, 503, 504];

/// How a failed outbound call is retried.
///
/// Attempt `n` (1-based) that fails with a retryable status is followed by a
/// wait of `initial_delay * exp_base^(n-1)`, until `attempts` calls were made.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub exp_base: f64,
    pub initial_delay: Duration,
    pub max_delay: Option<Duration>,
    pub http_status_codes: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7.0,
            initial_delay: Duration::from_secs(1),
            max_delay: None,
            http_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn disabled() -> Self {
        Self { attempts: 1, ..Self::default() }
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_exp_base(mut self, exp_base: f64) -> Self {
        self.exp_base = exp_base;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    #[must_use]
    pub fn with_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.http_status_codes = codes.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(TripwiseError::Config("retry attempts must be at least 1".into()));
        }
        if !(self.exp_base.is_finite() && self.exp_base > 0.0) {
            return Err(TripwiseError::Config(format!(
                "retry exp_base must be a positive number, got {}",
                self.exp_base
            )));
        }
        Ok(())
    }

    /// Wait after the failed attempt number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.exp_base.powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.http_status_codes.contains(&status)
    }

    pub fn is_retryable(&self, error: &TripwiseError) -> bool {
        match error {
            TripwiseError::Http { status, .. } => self.is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Run `operation` under `policy`.
///
/// Non-retryable errors return immediately. A retryable error on the last
/// allowed attempt comes back wrapped in [`TripwiseError::RetriesExhausted`].
pub async fn execute_with_retry<T, Op, Fut>(policy: &RetryPolicy, mut operation: Op) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if policy.is_retryable(&error) => {
                if attempt >= max_attempts {
                    tracing::error!(
                        attempts = attempt,
                        error = %error,
                        "Retryable request kept failing; giving up"
                    );
                    return Err(TripwiseError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(error),
                    });
                }
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    status = error.status_code(),
                    error = %error,
                    "Request failed with retryable status; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
