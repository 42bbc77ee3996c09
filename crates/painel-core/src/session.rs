// ── Page session and tenant context ──
//
// A page session bounds the lifetime of everything a page started.
// Results that resolve after the page is gone are dropped instead of
// being applied to state with no live owner.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The organizational customer a page is scoped to.
///
/// Always supplied by the caller (configuration, flags, login context).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<String>,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
        }
    }

    /// No tenant: only unscoped resources are reachable.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_option(tenant_id: Option<String>) -> Self {
        Self {
            tenant_id: tenant_id.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }
}

/// Liveness handle for one mounted page.
#[derive(Debug, Clone, Default)]
pub struct PageSession {
    token: CancellationToken,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the page that owns this session is still mounted.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Tear the page down. Pending results will be discarded.
    pub fn close(&self) {
        debug!("page session closed");
        self.token.cancel();
    }

    /// Run `fut` unless the session closes first.
    ///
    /// Returns `None` when the session was closed before or during the call.
    pub async fn scoped<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_active() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}
