use crate::render::{RenderCtx, RenderTarget};
use crate::scene::GraphScene;

use super::nodes::{GridRenderer, LineRenderer, NoiseRenderer};

/// Draws a [`GraphScene`]'s node graph.
///
/// Paint order is fixed: backdrop, grid, then the shadow under the line
/// itself. Each node renderer owns its GPU resources and builds them lazily,
/// so constructing a `GraphRenderer` costs nothing until the first frame.
#[derive(Default)]
pub struct GraphRenderer {
    noise: NoiseRenderer,
    grid: GridRenderer,
    line: LineRenderer,
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the scene's current nodes, if it has any.
    ///
    /// A scene whose rect collapsed has no nodes and draws nothing; callers
    /// are expected to have run [`GraphScene::update`] beforehand so the
    /// dirty flags this render consumes are fresh.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &mut GraphScene,
    ) {
        let Some(nodes) = scene.nodes_mut() else { return };

        self.noise.render(ctx, target, &mut nodes.background);
        self.grid.render(ctx, target, &mut nodes.grid);
        self.line
            .render(ctx, target, &mut [&mut nodes.shadow, &mut nodes.line]);
    }
}
