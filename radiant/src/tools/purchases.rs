use std::sync::Arc;

use rtooling::{ToolError, ToolRegistry, ToolSpec, required_string};
use serde_json::json;

use crate::monitor::MonitorSupervisor;
use crate::tool_params;

/// Starts a background monitor and returns at once; notifications arrive on
/// the supervisor's channel.
pub fn register(
    registry: &mut ToolRegistry,
    monitors: &Arc<MonitorSupervisor>,
) -> Result<(), ToolError> {
    let monitors = Arc::clone(monitors);
    registry.register_sync_fn(
        ToolSpec::new(
            "monitor_token_purchases",
            "Monitor buy transactions of a token pair on Dexscreener and notify the chat \
             about new purchases.",
        )
        .with_params(tool_params![pair_address: String => "The token pair address."]),
        move |args, _ctx| {
            let pair_address = required_string(&args, "pair_address")?;
            let status = monitors.start(&pair_address)?;
            Ok(json!({
                "status": status.as_str(),
                "pair_address": pair_address.trim(),
                "poll_interval_secs": monitors.poll_interval().as_secs(),
            }))
        },
    )
}
