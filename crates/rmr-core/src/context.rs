//! Per-request resolution context: feature gates, cancellation, deadline.
//!
//! The context is an explicit value passed into every resolver call rather
//! than ambient global state. Enablement is checked independently by both
//! `validate_params` and `resolve`, so a caller that skips validation still
//! cannot resolve through a disabled backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-resolver-type enablement flags. Owned by the caller's feature-gate
/// subsystem; the resolvers only read them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureGates {
    pub hub: bool,
    pub bundles: bool,
}

/// Handle for signalling cancellation of an in-flight resolution from
/// another thread (e.g. a control socket or a dropped reconcile).
#[derive(Debug, Clone)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Requests abort. The resolver polls the token during the transfer and
    /// stops with `ResolutionError::Canceled`.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Context for a single resolution request.
///
/// Carries no mutable state beyond the shared abort token; cloning produces
/// a context sharing the same token and deadline.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    gates: FeatureGates,
    abort: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl ResolutionContext {
    /// Context with all resolver types disabled and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gates(mut self, gates: FeatureGates) -> Self {
        self.gates = gates;
        self
    }

    pub fn with_hub_enabled(mut self) -> Self {
        self.gates.hub = true;
        self
    }

    pub fn with_bundles_enabled(mut self) -> Self {
        self.gates.bundles = true;
        self
    }

    /// Bounds the whole resolution (including the upstream call) to `timeout`
    /// from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn gates(&self) -> FeatureGates {
        self.gates
    }

    pub fn hub_enabled(&self) -> bool {
        self.gates.hub
    }

    pub fn bundles_enabled(&self) -> bool {
        self.gates.bundles
    }

    /// Returns a handle that cancels this request when aborted.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(Arc::clone(&self.abort))
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Time left until the deadline. `None` when no deadline was set;
    /// `Some(Duration::ZERO)` when the deadline has already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_default_to_disabled() {
        let ctx = ResolutionContext::new();
        assert!(!ctx.hub_enabled());
        assert!(!ctx.bundles_enabled());
    }

    #[test]
    fn builders_enable_each_type_independently() {
        let ctx = ResolutionContext::new().with_hub_enabled();
        assert!(ctx.hub_enabled());
        assert!(!ctx.bundles_enabled());

        let ctx = ResolutionContext::new().with_bundles_enabled();
        assert!(!ctx.hub_enabled());
        assert!(ctx.bundles_enabled());
    }

    #[test]
    fn abort_handle_is_visible_through_clones() {
        let ctx = ResolutionContext::new();
        let cloned = ctx.clone();
        assert!(!cloned.is_aborted());
        ctx.abort_handle().abort();
        assert!(cloned.is_aborted());
    }

    #[test]
    fn remaining_reports_deadline() {
        let ctx = ResolutionContext::new();
        assert!(ctx.remaining().is_none());

        let ctx = ctx.with_timeout(Duration::from_secs(60));
        let remaining = ctx.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(50));

        let past = ResolutionContext::new().with_deadline(Instant::now() - Duration::from_secs(1));
        assert_eq!(past.remaining().unwrap(), Duration::ZERO);
    }
}
