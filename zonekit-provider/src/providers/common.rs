//! Per-instance provider context
//!
//! Every provider owns one [`Session`]: the managed domain, the vendor zone id
//! once resolved, the lifecycle state and the cached zone snapshot.

use crate::error::{ProviderError, Result};
use crate::types::ProviderState;

/// Lifecycle and snapshot cache of one provider instance.
#[derive(Debug, Clone)]
pub(crate) struct Session<T> {
    provider: &'static str,
    domain: String,
    domain_id: Option<String>,
    state: ProviderState,
    snapshot: Option<T>,
}

impl<T: Clone> Session<T> {
    pub fn new(provider: &'static str, domain: &str) -> Self {
        Self {
            provider,
            domain: domain.trim().trim_end_matches('.').to_string(),
            domain_id: None,
            state: ProviderState::Uninitialized,
            snapshot: None,
        }
    }

    /// Domain without trailing dot.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    fn invalid_state(&self, operation: &str) -> ProviderError {
        ProviderError::InvalidState {
            provider: self.provider.to_string(),
            operation: operation.to_string(),
            state: self.state.to_string(),
        }
    }

    /// Fails once the instance has been released.
    pub fn require_authenticatable(&self) -> Result<()> {
        if self.state == ProviderState::Released {
            return Err(self.invalid_state("authenticate"));
        }
        Ok(())
    }

    /// Records the resolved zone id. Re-authenticating never moves the state
    /// backwards.
    pub fn authenticated(&mut self, domain_id: String) {
        log::debug!(
            "[{}] {} resolved to zone id {domain_id}",
            self.provider,
            self.domain
        );
        self.domain_id = Some(domain_id);
        if self.state == ProviderState::Uninitialized {
            self.state = ProviderState::Authenticated;
        }
    }

    /// Guards a record operation and returns the zone id.
    pub fn enter_operation(&mut self, operation: &str) -> Result<String> {
        match (self.state, self.domain_id.clone()) {
            (ProviderState::Authenticated | ProviderState::Operating, Some(domain_id)) => {
                self.state = ProviderState::Operating;
                Ok(domain_id)
            }
            _ => Err(self.invalid_state(operation)),
        }
    }

    /// Cached snapshot, if still valid.
    pub fn snapshot(&self) -> Option<T> {
        self.snapshot.clone()
    }

    pub fn store(&mut self, snapshot: T) {
        self.snapshot = Some(snapshot);
    }

    /// Drops the snapshot. Called after every successful mutation.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Drops everything held; the instance is unusable afterwards.
    pub fn release(&mut self) {
        if self.snapshot.take().is_some() {
            log::debug!("[{}] released zone snapshot of {}", self.provider, self.domain);
        }
        self.state = ProviderState::Released;
    }
}
