//! Fallback Provider Chain
//!
//! Sequential best-effort fallback over an ordered provider list.
//!
//! ## Strategy
//!
//! 1. Start in `Trying(0)`
//! 2. Call the provider under the per-provider timeout and run the caller's
//!    parser on its output inside the same attempt
//! 3. On success move to `Succeeded(i)` and stop; later providers are never invoked
//! 4. On any failure record `"<name>: <message>"` and move to `Trying(i + 1)`
//! 5. Past the last provider the chain is `Exhausted`
//!
//! No retries of the same provider and no state carried between executions.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::Provider;
use crate::ai::timeout::with_provider_timeout;
use crate::constants::network;
use crate::types::LlmError;

/// Position of an execution in the fallback state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// About to call the provider at this index
    Trying(usize),
    /// Provider at this index produced an accepted output
    Succeeded(usize),
    /// Every provider failed
    Exhausted,
}

/// Execution statistics for the chain
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub state: ChainState,
    pub total_attempts: usize,
    pub successful_provider: Option<String>,
    /// One entry per failed attempt, in order
    pub errors: Vec<LlmError>,
    pub total_duration_ms: u64,
}

impl ChainStats {
    fn new() -> Self {
        Self {
            state: ChainState::Trying(0),
            total_attempts: 0,
            successful_provider: None,
            errors: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Ordered `"<provider>: <message>"` lines
    pub fn error_log(&self) -> Vec<String> {
        self.errors.iter().map(LlmError::log_entry).collect()
    }
}

/// Result of one chain execution
#[derive(Debug)]
pub enum ChainOutcome<T> {
    Succeeded { value: T, stats: ChainStats },
    Exhausted { stats: ChainStats },
}

impl<T> ChainOutcome<T> {
    pub fn stats(&self) -> &ChainStats {
        match self {
            ChainOutcome::Succeeded { stats, .. } | ChainOutcome::Exhausted { stats } => stats,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChainOutcome::Succeeded { .. })
    }
}

/// Ordered fallback chain over providers of one kind
pub struct ProviderChain<P: ?Sized> {
    providers: Vec<Arc<P>>,
    timeout: Duration,
}

impl<P: ?Sized> Clone for ProviderChain<P> {
    fn clone(&self) -> Self {
        Self {
            providers: self.providers.clone(),
            timeout: self.timeout,
        }
    }
}

impl<P: Provider + ?Sized> ProviderChain<P> {
    pub fn builder() -> ProviderChainBuilder<P> {
        ProviderChainBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn providers(&self) -> &[Arc<P>] {
        &self.providers
    }

    /// Provider names in priority order
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `attempt` against each provider in order until one succeeds.
    ///
    /// `attempt` covers the provider call and the parsing of its output, so
    /// a parse rejection is a failure of that provider like any other.
    #[instrument(skip(self, attempt), fields(providers = self.providers.len()))]
    pub async fn execute<T, F, Fut>(&self, mut attempt: F) -> ChainOutcome<T>
    where
        F: FnMut(Arc<P>) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let start_time = Instant::now();
        let mut stats = ChainStats::new();

        while let ChainState::Trying(index) = stats.state {
            let Some(provider) = self.providers.get(index).map(Arc::clone) else {
                stats.state = ChainState::Exhausted;
                break;
            };
            let name = provider.name().to_string();
            let attempt_start = Instant::now();
            stats.total_attempts += 1;

            debug!(provider = %name, attempt = index + 1, "Chain attempt");

            match with_provider_timeout(self.timeout, attempt(provider), &name).await {
                Ok(value) => {
                    stats.state = ChainState::Succeeded(index);
                    stats.successful_provider = Some(name);
                    stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

                    info!(
                        provider = %stats.successful_provider.as_deref().unwrap_or("unknown"),
                        attempts = stats.total_attempts,
                        duration_ms = stats.total_duration_ms,
                        "Chain succeeded"
                    );

                    return ChainOutcome::Succeeded { value, stats };
                }
                Err(err) => {
                    let err = if err.provider.is_none() {
                        err.provider(name.clone())
                    } else {
                        err
                    };

                    warn!(
                        provider = %name,
                        attempt = index + 1,
                        category = %err.category,
                        duration_ms = attempt_start.elapsed().as_millis() as u64,
                        error = %err.message,
                        "Provider failed"
                    );

                    stats.errors.push(err);
                    stats.state = ChainState::Trying(index + 1);
                }
            }
        }

        stats.total_duration_ms = start_time.elapsed().as_millis() as u64;
        warn!(
            attempts = stats.total_attempts,
            duration_ms = stats.total_duration_ms,
            "All providers in chain failed"
        );
        ChainOutcome::Exhausted { stats }
    }
}

/// Builder for creating provider chains
pub struct ProviderChainBuilder<P: ?Sized> {
    providers: Vec<Arc<P>>,
    timeout: Duration,
}

impl<P: ?Sized> ProviderChainBuilder<P> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            timeout: Duration::from_secs(network::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Append a shared provider at the lowest priority so far
    pub fn add_shared(mut self, provider: Arc<P>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Per-provider timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ProviderChain<P> {
        ProviderChain {
            providers: self.providers,
            timeout: self.timeout,
        }
    }
}

impl<P: ?Sized> Default for ProviderChainBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
