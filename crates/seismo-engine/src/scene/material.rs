use core::cmp::Ordering;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::paint::Color;

/// Shading state for one stroked line layer: color, width, edge softness.
///
/// A material is immutable after construction. Two materials with the same
/// state are interchangeable at draw time, which is exactly what
/// [`compare`](Self::compare) exists to detect.
#[derive(Debug, Copy, Clone)]
pub struct LineMaterial {
    color: Color,
    size: f32,
    spread: f32,
}

impl LineMaterial {
    /// `size` is the ribbon width in logical pixels; `spread` in `[0, 1)` is
    /// where the solid core ends and the alpha falloff begins, measured from
    /// the centerline.
    pub fn new(color: Color, size: f32, spread: f32) -> Self {
        color.debug_assert_premul();
        Self { color, size, spread }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Total ordering over material state.
    ///
    /// Renderers use this to group draws that can share uniform and bind
    /// state: any two materials comparing `Equal` must be interchangeable at
    /// draw time. The ordering itself is arbitrary but stable (color channels
    /// first, then size, then spread, each via `total_cmp`).
    pub fn compare(&self, other: &Self) -> Ordering {
        let a = self.color;
        let b = other.color;
        a.r.total_cmp(&b.r)
            .then_with(|| a.g.total_cmp(&b.g))
            .then_with(|| a.b.total_cmp(&b.b))
            .then_with(|| a.a.total_cmp(&b.a))
            .then_with(|| self.size.total_cmp(&other.size))
            .then_with(|| self.spread.total_cmp(&other.spread))
    }

    /// Writes this material's state into a uniform block.
    ///
    /// `transform` and `opacity` are owned by the caller's frame state, not by
    /// the material; passing `None` leaves those byte ranges untouched so a
    /// steady frame only rewrites what actually changed. Color, size and
    /// spread are written unconditionally.
    pub fn write_uniforms(
        &self,
        block: &mut LineUniforms,
        transform: Option<&Mat4>,
        opacity: Option<f32>,
    ) {
        if let Some(m) = transform {
            block.transform = m.to_cols_array_2d();
        }
        if let Some(o) = opacity {
            block.opacity = o;
        }
        block.color = self.color.to_array();
        block.size = self.size;
        block.spread = self.spread;
    }
}

/// Uniform block consumed by the line shader pair.
///
/// The byte layout is a wire contract shared with `line.wgsl`:
///
/// | field     | offset | size |
/// |-----------|--------|------|
/// | transform | 0      | 64   |
/// | color     | 64     | 16   |
/// | opacity   | 80     | 4    |
/// | size      | 84     | 4    |
/// | spread    | 88     | 4    |
///
/// 92 bytes total. The GPU-side buffer is 96 bytes (WGSL rounds uniform
/// structs up to a 16-byte multiple); the trailing pad is never written.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LineUniforms {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub opacity: f32,
    pub size: f32,
    pub spread: f32,
}

impl LineUniforms {
    #[inline]
    pub fn zeroed() -> Self {
        Zeroable::zeroed()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for LineUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    fn steel() -> LineMaterial {
        LineMaterial::new(Color::from_srgb_u8(70, 130, 180, 255), 10.0, 0.5)
    }

    // ── wire layout ───────────────────────────────────────────────────────

    #[test]
    fn uniform_block_is_92_bytes() {
        assert_eq!(size_of::<LineUniforms>(), 92);
        assert_eq!(LineUniforms::zeroed().as_bytes().len(), 92);
    }

    #[test]
    fn uniform_field_offsets_match_the_shader() {
        assert_eq!(offset_of!(LineUniforms, transform), 0);
        assert_eq!(offset_of!(LineUniforms, color), 64);
        assert_eq!(offset_of!(LineUniforms, opacity), 80);
        assert_eq!(offset_of!(LineUniforms, size), 84);
        assert_eq!(offset_of!(LineUniforms, spread), 88);
    }

    // ── partial updates ───────────────────────────────────────────────────

    #[test]
    fn write_uniforms_full() {
        let mut block = LineUniforms::zeroed();
        let m = Mat4::orthographic_rh(0.0, 100.0, 50.0, 0.0, -1.0, 1.0);

        steel().write_uniforms(&mut block, Some(&m), Some(1.0));

        assert_eq!(block.transform, m.to_cols_array_2d());
        assert_eq!(block.opacity, 1.0);
        assert_eq!(block.size, 10.0);
        assert_eq!(block.spread, 0.5);
        assert_eq!(block.color[3], 1.0);
    }

    #[test]
    fn write_uniforms_none_preserves_transform_and_opacity() {
        let mut block = LineUniforms::zeroed();
        let m = Mat4::IDENTITY;
        steel().write_uniforms(&mut block, Some(&m), Some(0.75));

        // A later material-only write must not disturb the frame state.
        steel().write_uniforms(&mut block, None, None);

        assert_eq!(block.transform, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(block.opacity, 0.75);
    }

    #[test]
    fn write_uniforms_always_writes_material_fields() {
        let mut block = LineUniforms::zeroed();
        block.size = 99.0;
        block.spread = 99.0;

        steel().write_uniforms(&mut block, None, None);

        assert_eq!(block.size, 10.0);
        assert_eq!(block.spread, 0.5);
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn identical_state_compares_equal() {
        assert_eq!(steel().compare(&steel()), Ordering::Equal);
    }

    #[test]
    fn color_dominates_size_and_spread() {
        let dark = LineMaterial::new(Color::from_straight(0.1, 0.1, 0.1, 1.0), 99.0, 0.9);
        let light = LineMaterial::new(Color::from_straight(0.9, 0.9, 0.9, 1.0), 1.0, 0.1);
        assert_eq!(dark.compare(&light), Ordering::Less);
    }

    #[test]
    fn size_breaks_color_ties() {
        let c = Color::from_srgb_u8(70, 130, 180, 255);
        let thin = LineMaterial::new(c, 5.0, 0.5);
        let thick = LineMaterial::new(c, 10.0, 0.5);
        assert_eq!(thin.compare(&thick), Ordering::Less);
        assert_eq!(thick.compare(&thin), Ordering::Greater);
    }

    #[test]
    fn spread_breaks_size_ties() {
        let c = Color::from_srgb_u8(70, 130, 180, 255);
        let soft = LineMaterial::new(c, 10.0, 0.2);
        let hard = LineMaterial::new(c, 10.0, 0.5);
        assert_eq!(soft.compare(&hard), Ordering::Less);
    }

    #[test]
    fn compare_is_antisymmetric() {
        let a = LineMaterial::new(Color::from_straight(0.2, 0.2, 0.2, 0.4), 20.0, 0.2);
        let b = steel();
        assert_eq!(a.compare(&b), b.compare(&a).reverse());
    }
}
