//! Vertex builders for the graph's grid and stroked line.
//!
//! Both builders are pure functions of a rectangle (and samples): same inputs,
//! byte-identical output. They produce logical-pixel positions; the shader
//! side owns the NDC conversion and any width expansion.

use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;

/// Spacing between adjacent grid lines, in logical pixels.
pub const GRID_STEP: f32 = 32.0;

/// Primitive topology a vertex buffer is meant to be drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    /// Independent segments, two vertices each.
    LineList,
    /// Connected strip, shared edges between consecutive triangles.
    TriangleStrip,
}

/// Grid vertex: position only, flat-shaded.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub pos: [f32; 2],
}

/// Line vertex: position plus the synthetic edge parameter `t`.
///
/// Each polyline point is emitted twice at the *same* position, once with
/// `t = 0` and once with `t = 1`. The vertex shader spreads the pair apart
/// vertically by the material's width, and the fragment shader turns the
/// interpolated `t` into an alpha falloff from the centerline. Width and
/// softness therefore live entirely in the material, not in this buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 2],
    pub t: f32,
}

/// Builds the grid's line-list vertices for `rect`.
///
/// Lines are laid on a fixed [`GRID_STEP`] pitch starting one step inside the
/// rectangle, so the rect edges themselves never carry a line. Counts truncate
/// toward zero: a rect narrower than one step plus a pixel gets no vertical
/// lines at all rather than a clipped one.
///
/// All vertical lines come first, then all horizontal lines. Renderers and
/// tests rely on that ordering.
pub fn grid_lines(rect: Rect) -> Vec<GridVertex> {
    let x = rect.origin.x;
    let y = rect.origin.y;
    let w = rect.size.x;
    let h = rect.size.y;

    // `as i32` truncates toward zero; the max(0) guards negative extents.
    let v_count = (((w - 1.0) / GRID_STEP) as i32).max(0);
    let h_count = (((h - 1.0) / GRID_STEP) as i32).max(0);

    let mut out = Vec::with_capacity(2 * (v_count + h_count) as usize);

    for i in 0..v_count {
        let line_x = x + (i + 1) as f32 * GRID_STEP;
        out.push(GridVertex { pos: [line_x, y] });
        out.push(GridVertex { pos: [line_x, y + h] });
    }

    for i in 0..h_count {
        let line_y = y + (i + 1) as f32 * GRID_STEP;
        out.push(GridVertex { pos: [x, line_y] });
        out.push(GridVertex { pos: [x + w, line_y] });
    }

    out
}

/// Builds the stroked line's triangle-strip vertices for `rect`.
///
/// Samples are spread evenly across the rectangle's width (first at the left
/// edge, last at the right) and mapped vertically so `0` lands on the top
/// edge and `1` on the bottom. Every point becomes a `t = 0` / `t = 1` vertex
/// pair as described on [`LineVertex`].
///
/// Fewer than two samples cannot anchor a segment, and an empty rectangle has
/// nothing to span, so both yield an empty buffer instead of dividing by the
/// zero sample gap.
pub fn line_strip<I>(rect: Rect, samples: I) -> Vec<LineVertex>
where
    I: ExactSizeIterator<Item = f64>,
{
    let n = samples.len();
    if n < 2 || rect.is_empty() {
        return Vec::new();
    }

    let x = rect.origin.x;
    let y = rect.origin.y;
    let w = rect.size.x;
    let h = rect.size.y;
    let dx = w / (n - 1) as f32;

    let mut out = Vec::with_capacity(2 * n);

    for (i, sample) in samples.enumerate() {
        let px = x + i as f32 * dx;
        let py = y + sample as f32 * h;
        out.push(LineVertex { pos: [px, py], t: 0.0 });
        out.push(LineVertex { pos: [px, py], t: 1.0 });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(verts: &[GridVertex]) -> Vec<f32> {
        verts.iter().map(|v| v.pos[0]).collect()
    }

    // ── grid ──────────────────────────────────────────────────────────────

    #[test]
    fn grid_counts_follow_step_formula() {
        // (100 - 1) / 32 truncates to 3 in each direction.
        let verts = grid_lines(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(verts.len(), 2 * (3 + 3));
    }

    #[test]
    fn grid_vertical_lines_precede_horizontal() {
        let verts = grid_lines(Rect::new(0.0, 0.0, 100.0, 100.0));

        // First block: verticals at x = 32, 64, 96 spanning the full height.
        for (i, pair) in verts[..6].chunks(2).enumerate() {
            let expected_x = (i + 1) as f32 * GRID_STEP;
            assert_eq!(pair[0].pos, [expected_x, 0.0]);
            assert_eq!(pair[1].pos, [expected_x, 100.0]);
        }

        // Second block: horizontals at y = 32, 64, 96 spanning the full width.
        for (i, pair) in verts[6..].chunks(2).enumerate() {
            let expected_y = (i + 1) as f32 * GRID_STEP;
            assert_eq!(pair[0].pos, [0.0, expected_y]);
            assert_eq!(pair[1].pos, [100.0, expected_y]);
        }
    }

    #[test]
    fn grid_respects_rect_origin() {
        let verts = grid_lines(Rect::new(10.0, 20.0, 100.0, 100.0));
        assert_eq!(verts[0].pos, [42.0, 20.0]);
        assert_eq!(verts[1].pos, [42.0, 120.0]);
        assert_eq!(verts[6].pos, [10.0, 52.0]);
        assert_eq!(verts[7].pos, [110.0, 52.0]);
    }

    #[test]
    fn grid_truncation_boundaries() {
        // One full step of width is not enough for a line; a step plus a
        // pixel buys exactly one.
        assert_eq!(xs(&grid_lines(Rect::new(0.0, 0.0, 32.0, 1.0))), Vec::<f32>::new());
        assert_eq!(xs(&grid_lines(Rect::new(0.0, 0.0, 33.0, 1.0))), vec![32.0, 32.0]);
        assert_eq!(
            xs(&grid_lines(Rect::new(0.0, 0.0, 65.0, 1.0))),
            vec![32.0, 32.0, 64.0, 64.0]
        );
    }

    #[test]
    fn grid_zero_rect_is_empty() {
        assert!(grid_lines(Rect::new(0.0, 0.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn grid_negative_extent_is_empty() {
        assert!(grid_lines(Rect::new(0.0, 0.0, -100.0, -100.0)).is_empty());
    }

    #[test]
    fn grid_rebuild_is_byte_identical() {
        let rect = Rect::new(3.0, 7.0, 211.0, 97.0);
        let a = grid_lines(rect);
        let b = grid_lines(rect);
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(&a),
            bytemuck::cast_slice::<_, u8>(&b)
        );
    }

    // ── line ──────────────────────────────────────────────────────────────

    #[test]
    fn line_three_samples_full_layout() {
        let samples = [0.2, 0.8, 0.5];
        let verts = line_strip(Rect::new(0.0, 0.0, 40.0, 100.0), samples.into_iter());

        assert_eq!(verts.len(), 6);
        let expected = [
            ([0.0, 20.0], 0.0),
            ([0.0, 20.0], 1.0),
            ([20.0, 80.0], 0.0),
            ([20.0, 80.0], 1.0),
            ([40.0, 50.0], 0.0),
            ([40.0, 50.0], 1.0),
        ];
        for (v, (pos, t)) in verts.iter().zip(expected) {
            assert_eq!(v.pos, pos);
            assert_eq!(v.t, t);
        }
    }

    #[test]
    fn line_pairs_share_position_and_alternate_t() {
        let samples = [0.1, 0.9, 0.4, 0.6, 0.5];
        let verts = line_strip(Rect::new(5.0, 5.0, 100.0, 50.0), samples.into_iter());

        assert_eq!(verts.len(), 2 * samples.len());
        for pair in verts.chunks(2) {
            assert_eq!(pair[0].pos, pair[1].pos);
            assert_eq!(pair[0].t, 0.0);
            assert_eq!(pair[1].t, 1.0);
        }
    }

    #[test]
    fn line_spacing_spans_the_rect() {
        let samples = [0.0, 0.0, 0.0, 0.0, 0.0];
        let verts = line_strip(Rect::new(0.0, 0.0, 100.0, 10.0), samples.into_iter());

        // 5 samples, 4 gaps: dx = 25 with the last pair on the right edge.
        for (i, pair) in verts.chunks(2).enumerate() {
            assert_eq!(pair[0].pos[0], i as f32 * 25.0);
        }
        assert_eq!(verts.last().map(|v| v.pos[0]), Some(100.0));
    }

    #[test]
    fn line_fewer_than_two_samples_is_empty() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(line_strip(rect, [].into_iter()).is_empty());
        assert!(line_strip(rect, [0.5].into_iter()).is_empty());
    }

    #[test]
    fn line_empty_rect_is_empty() {
        let samples = [0.2, 0.8, 0.5];
        assert!(line_strip(Rect::new(0.0, 0.0, 0.0, 0.0), samples.into_iter()).is_empty());
        assert!(line_strip(Rect::new(0.0, 0.0, 0.0, 50.0), samples.into_iter()).is_empty());
    }

    #[test]
    fn line_rebuild_is_byte_identical() {
        let rect = Rect::new(1.0, 2.0, 300.0, 120.0);
        let samples = [0.25, 0.75, 0.5, 0.125];
        let a = line_strip(rect, samples.into_iter());
        let b = line_strip(rect, samples.into_iter());
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(&a),
            bytemuck::cast_slice::<_, u8>(&b)
        );
    }
}
