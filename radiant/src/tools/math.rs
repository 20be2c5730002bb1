use rtooling::{ToolError, ToolRegistry, ToolSpec, required_i64};
use serde_json::json;

use crate::tool_params;

pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register_sync_fn(
        ToolSpec::new("add", "Add two integers and return the sum.")
            .with_params(tool_params![a: Integer, b: Integer]),
        |args, _ctx| {
            let a = required_i64(&args, "a")?;
            let b = required_i64(&args, "b")?;
            a.checked_add(b)
                .map(|sum| json!(sum))
                .ok_or_else(|| ToolError::execution("integer overflow in add"))
        },
    )?;

    registry.register_sync_fn(
        ToolSpec::new("multiply", "Multiply two integers and return the product.")
            .with_params(tool_params![a: Integer, b: Integer]),
        |args, _ctx| {
            let a = required_i64(&args, "a")?;
            let b = required_i64(&args, "b")?;
            a.checked_mul(b)
                .map(|product| json!(product))
                .ok_or_else(|| ToolError::execution("integer overflow in multiply"))
        },
    )
}
