//! Single-owner storage for the active wallet provider handle.
//!
//! The connection orchestrator owns the active provider; the claim pipeline
//! reads it and may install a replacement (force-switch), but always through
//! this slot so later steps never act on a stale handle.

use crate::WalletProviderKind;
use std::sync::{Arc, Mutex, PoisonError};

/// The currently active provider handle and the wallet kind it came from.
#[derive(Debug, Clone)]
pub struct ActiveProvider<P> {
    pub kind: WalletProviderKind,
    pub provider: P,
}

/// Shared, cloneable slot holding the active provider for one checkout
/// instance.
#[derive(Debug)]
pub struct ProviderSlot<P> {
    inner: Arc<Mutex<Option<ActiveProvider<P>>>>,
}

impl<P> Clone for ProviderSlot<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Clone> Default for ProviderSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> ProviderSlot<P> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Install a new active provider, replacing any previous one.
    pub fn install(&self, kind: WalletProviderKind, provider: P) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(ActiveProvider { kind, provider });
    }

    /// Snapshot of the active provider, if any.
    pub fn active(&self) -> Option<ActiveProvider<P>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Drop the active provider (wallet disconnected).
    pub fn clear(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
