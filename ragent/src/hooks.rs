//! Turn lifecycle hooks.
//!
//! ```rust
//! use ragent::{NoopTurnHooks, TurnHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn TurnHooks) {}
//!
//! assert_hooks_trait(&NoopTurnHooks);
//! ```

use std::time::Duration;

use rcommon::SessionId;

use crate::{AgentError, FinalReply, TurnPhase};

pub trait TurnHooks: Send + Sync {
    fn on_phase(&self, _phase: TurnPhase, _session_id: &SessionId, _turn_id: &str) {}

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _reply: &FinalReply,
        _elapsed: Duration,
    ) {
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _error: &AgentError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTurnHooks;

impl TurnHooks for NoopTurnHooks {}
