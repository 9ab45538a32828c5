//! Cross-session trust — per-session verification counters bound to one agent.

pub mod state;
pub mod tracker;

pub use state::{CrossSessionState, TrustPhase};
pub use tracker::SessionTracker;
