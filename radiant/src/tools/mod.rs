//! Built-in tools and the registry that bundles them.

pub mod http;
pub mod image;
pub mod market;
pub mod math;
pub mod prices;
pub mod purchases;


use std::sync::Arc;

use rtooling::{ToolError, ToolRegistry};

use crate::monitor::MonitorSupervisor;
use market::MarketDataClient;

/// Registration order is the order schemas are offered to the model.
pub fn builtin_registry(
    market: &Arc<MarketDataClient>,
    monitors: &Arc<MonitorSupervisor>,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    math::register(&mut registry)?;
    prices::register(&mut registry, market)?;
    image::register(&mut registry)?;
    purchases::register(&mut registry, monitors)?;
    Ok(registry)
}
