//! Renderer trait for layout output targets.

use crate::types::Layout;
use async_trait::async_trait;
use covidash_common::Result;

/// Turns a [`Layout`] into an output artifact.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// What a successful render produces.
    type Output;

    /// Renders the layout.
    async fn render(&self, layout: &Layout) -> Result<Self::Output>;

    /// Gets the name of this renderer.
    fn name(&self) -> &'static str;
}
