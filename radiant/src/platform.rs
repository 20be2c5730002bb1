//! Console platform adapter: the [`AgentContext`] handed to tools and the
//! text rendering of a [`FinalReply`].

use ragent::{AgentError, FinalReply, ToolInvocationResult};
use rcommon::BoxFuture;
use rtooling::{AgentContext, ToolError};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePlatform;

impl AgentContext for ConsolePlatform {
    fn platform(&self) -> &str {
        "console"
    }

    fn generate_image<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, ToolError>> {
        Box::pin(async {
            Err(ToolError::execution(
                "image generation is not available on the console",
            ))
        })
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// One console line per part of the reply, text first.
pub fn render_reply(reply: &FinalReply) -> String {
    let mut lines = Vec::new();
    if let Some(text) = reply.text.as_deref() {
        lines.push(text.to_string());
    }
    if let Some(image_url) = reply.image_url.as_deref() {
        lines.push(format!("[image] {image_url}"));
    } else if let Some(result) = &reply.tool_result {
        match result {
            ToolInvocationResult::Success(value) => lines.push(render_value(value)),
            ToolInvocationResult::Error { message, .. } => {
                lines.push(format!("Sorry, that didn't work ({message})."))
            }
        }
    }
    if lines.is_empty() {
        lines.push("(no reply)".to_string());
    }
    lines.join("\n")
}

pub fn render_error(error: &AgentError) -> String {
    error.user_message().to_string()
}
