use std::sync::Arc;

use crate::coords::Rect;
use crate::paint::Color;

use super::geometry::{self, GridVertex, LineVertex, Topology};
use super::material::LineMaterial;

/// Surface the GPU layer uses to pull geometry out of a node.
///
/// Implemented by the geometry-bearing node kinds ([`GridNode`],
/// [`LineNode`]); the renderer only ever sees bytes, a vertex count and a
/// topology, so uploads are uniform across node kinds.
pub trait GeometryNode {
    fn topology(&self) -> Topology;

    /// Current vertex data, ready for a buffer write.
    fn vertex_bytes(&self) -> &[u8];

    fn vertex_count(&self) -> usize;

    /// Whether the geometry changed since the last call, clearing the flag.
    ///
    /// The renderer calls this once per frame per node; a `false` answer
    /// means the previously uploaded buffer is still current.
    fn take_geometry_dirty(&mut self) -> bool;
}

/// Fixed-pitch grid behind the line, rebuilt whenever the rectangle moves.
#[derive(Debug)]
pub struct GridNode {
    color: Color,
    vertices: Vec<GridVertex>,
    geometry_dirty: bool,
}

impl GridNode {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            vertices: Vec::new(),
            geometry_dirty: false,
        }
    }

    /// Rebuilds the grid for `rect` and marks the node for re-upload.
    pub fn set_rect(&mut self, rect: Rect) {
        self.vertices = geometry::grid_lines(rect);
        self.geometry_dirty = true;
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }
}

impl GeometryNode for GridNode {
    fn topology(&self) -> Topology {
        Topology::LineList
    }

    fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn take_geometry_dirty(&mut self) -> bool {
        std::mem::take(&mut self.geometry_dirty)
    }
}

/// One stroked line layer: a material plus an immutable geometry snapshot.
///
/// Geometry lives behind an `Arc` so a second layer can render the identical
/// polyline without rebuilding it; see
/// [`share_geometry_from`](Self::share_geometry_from).
#[derive(Debug)]
pub struct LineNode {
    material: LineMaterial,
    geometry: Arc<[LineVertex]>,
    geometry_dirty: bool,
}

impl LineNode {
    pub fn new(material: LineMaterial) -> Self {
        Self {
            material,
            geometry: Arc::from(Vec::new()),
            geometry_dirty: false,
        }
    }

    /// Rebuilds the strip for `rect` and `samples` into a fresh snapshot.
    ///
    /// Snapshots are never mutated in place, so any node still holding the
    /// previous one keeps rendering it unchanged.
    pub fn update_geometry<I>(&mut self, rect: Rect, samples: I)
    where
        I: ExactSizeIterator<Item = f64>,
    {
        self.geometry = geometry::line_strip(rect, samples).into();
        self.geometry_dirty = true;
    }

    /// Adopts `other`'s current snapshot instead of building one.
    ///
    /// This is how the shadow layer piggybacks on the main line: same
    /// vertices, different material. The share is a point-in-time alias; if
    /// `other` rebuilds later, this node keeps the old snapshot until the
    /// share is performed again.
    pub fn share_geometry_from(&mut self, other: &LineNode) {
        self.geometry = Arc::clone(&other.geometry);
        self.geometry_dirty = true;
    }

    /// True when both nodes hold the same snapshot allocation.
    #[inline]
    pub fn shares_geometry_with(&self, other: &LineNode) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }

    #[inline]
    pub fn material(&self) -> &LineMaterial {
        &self.material
    }

    #[inline]
    pub fn vertices(&self) -> &[LineVertex] {
        &self.geometry
    }
}

impl GeometryNode for LineNode {
    fn topology(&self) -> Topology {
        Topology::TriangleStrip
    }

    fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.geometry)
    }

    fn vertex_count(&self) -> usize {
        self.geometry.len()
    }

    fn take_geometry_dirty(&mut self) -> bool {
        std::mem::take(&mut self.geometry_dirty)
    }
}

/// Backdrop behind the whole graph.
///
/// It carries no CPU geometry; the renderer fills its rectangle procedurally
/// by mixing the two tones, so the node only tracks where that rectangle is.
#[derive(Debug)]
pub struct BackgroundNode {
    tone_dark: Color,
    tone_light: Color,
    rect: Rect,
    rect_dirty: bool,
}

impl BackgroundNode {
    pub fn new(tone_dark: Color, tone_light: Color) -> Self {
        Self {
            tone_dark,
            tone_light,
            rect: Rect::default(),
            rect_dirty: false,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.rect_dirty = true;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn tone_dark(&self) -> Color {
        self.tone_dark
    }

    #[inline]
    pub fn tone_light(&self) -> Color {
        self.tone_light
    }

    /// Whether the rectangle changed since the last call, clearing the flag.
    pub fn take_rect_dirty(&mut self) -> bool {
        std::mem::take(&mut self.rect_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::geometry::line_strip;

    fn material() -> LineMaterial {
        LineMaterial::new(Color::from_srgb_u8(70, 130, 180, 255), 10.0, 0.5)
    }

    // ── dirty protocol ────────────────────────────────────────────────────

    #[test]
    fn fresh_nodes_are_clean() {
        assert!(!GridNode::new(Color::default()).take_geometry_dirty());
        assert!(!LineNode::new(material()).take_geometry_dirty());
        assert!(!BackgroundNode::new(Color::default(), Color::default()).take_rect_dirty());
    }

    #[test]
    fn set_rect_marks_grid_dirty_once() {
        let mut grid = GridNode::new(Color::default());
        grid.set_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(grid.take_geometry_dirty());
        assert!(!grid.take_geometry_dirty());
        assert_eq!(grid.vertex_count(), 12);
    }

    #[test]
    fn update_geometry_matches_the_builder() {
        let rect = Rect::new(0.0, 0.0, 40.0, 100.0);
        let samples = [0.2, 0.8, 0.5];

        let mut line = LineNode::new(material());
        line.update_geometry(rect, samples.into_iter());

        assert!(line.take_geometry_dirty());
        assert_eq!(line.vertices(), line_strip(rect, samples.into_iter()).as_slice());
    }

    // ── geometry sharing ──────────────────────────────────────────────────

    #[test]
    fn share_aliases_the_same_allocation() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut line = LineNode::new(material());
        let mut shadow = LineNode::new(material());

        line.update_geometry(rect, [0.1, 0.9, 0.5].into_iter());
        shadow.share_geometry_from(&line);

        assert!(shadow.shares_geometry_with(&line));
        assert!(shadow.take_geometry_dirty());
        assert_eq!(shadow.vertices(), line.vertices());
    }

    #[test]
    fn source_rebuild_leaves_old_snapshot_intact() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut line = LineNode::new(material());
        let mut shadow = LineNode::new(material());

        line.update_geometry(rect, [0.1, 0.9].into_iter());
        shadow.share_geometry_from(&line);
        let before = shadow.vertices().to_vec();

        line.update_geometry(rect, [0.4, 0.6, 0.5].into_iter());

        // The shadow still holds the point-in-time alias.
        assert!(!shadow.shares_geometry_with(&line));
        assert_eq!(shadow.vertices(), before.as_slice());
    }

    // ── topologies ────────────────────────────────────────────────────────

    #[test]
    fn node_topologies() {
        assert_eq!(GridNode::new(Color::default()).topology(), Topology::LineList);
        assert_eq!(LineNode::new(material()).topology(), Topology::TriangleStrip);
    }
}
