//! Observability hooks for model calls, tool executions, and turn phases.
//!
//! ```rust
//! use robserve::{FanoutHooks, MetricsObservabilityHooks, SafeTurnHooks, TracingObservabilityHooks};
//!
//! let _turn_hooks = SafeTurnHooks::new(FanoutHooks::new(
//!     TracingObservabilityHooks,
//!     MetricsObservabilityHooks,
//! ));
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeProviderHooks, SafeToolHooks, SafeTurnHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutHooks, MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
        TracingObservabilityHooks,
    };
}

#[cfg(test)]
mod tests;
