//! Wallet-connection bootstrapping for checkout widgets.
//!
//! The [`ConnectionOrchestrator`] decides which connection status applies to
//! a widget instance by composing calls to the injected wallet gateway, and
//! drives the matching navigation transition. It owns the active provider
//! handle (through [`wallet::slot::ProviderSlot`]); every other component
//! reads or replaces the handle through that slot.

mod orchestrator;

pub use orchestrator::ConnectionOrchestrator;

/// The connection state machine's states. Exactly one is active at a time;
/// only the orchestrator transitions between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Bootstrapping has not finished (or a transient network query failed
    /// and the next run will retry).
    Loading,
    /// No wallet preference and no injected provider object exists.
    NotConnectedNoProvider,
    /// A provider exists but no account is connected.
    NotConnected,
    /// Connected, but the wallet is on a chain outside the allow-list.
    ConnectedWrongNetwork,
    /// Connected on an allowed chain; the widget content can render.
    ConnectedWithNetwork,
    /// Provider creation or connection checking failed unrecoverably.
    Error,
}
