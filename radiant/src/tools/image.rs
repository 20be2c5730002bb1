use rtooling::{ToolError, ToolRegistry, ToolSpec, required_string};
use serde_json::json;

use crate::tool_params;

/// Image generation is delegated to the calling platform through
/// [`AgentContext`](rtooling::AgentContext).
pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register_fn(
        ToolSpec::new(
            "handle_image_generation",
            "Generate an image based on a text prompt. Use this tool only when the user \
             explicitly requests to create an image.",
        )
        .with_params(tool_params![prompt: String => "The prompt to generate the image from"]),
        |args, ctx| async move {
            let prompt = required_string(&args, "prompt")?;
            if prompt.trim().is_empty() {
                return Err(ToolError::invalid_arguments("prompt must not be empty"));
            }

            let agent = ctx.agent()?;
            tracing::info!(platform = agent.platform(), "generating image");
            let image_url = agent.generate_image(&prompt).await?;
            Ok(json!({ "image_url": image_url }))
        },
    )
}
