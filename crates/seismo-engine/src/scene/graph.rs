use crate::coords::Rect;
use crate::paint::Color;

use super::material::LineMaterial;
use super::node::{BackgroundNode, GridNode, LineNode};
use super::observer::{PassObserver, Rebuild};
use super::samples::SampleBuffer;

/// Stroke parameters for one line layer.
#[derive(Debug, Copy, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub size: f32,
    pub spread: f32,
}

/// Visual configuration of a graph, fixed at scene construction.
#[derive(Debug, Copy, Clone)]
pub struct GraphStyle {
    pub line: LineStyle,
    pub shadow: LineStyle,
    pub grid_color: Color,
    /// Tone pair the backdrop noise mixes between.
    pub backdrop_dark: Color,
    pub backdrop_light: Color,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            line: LineStyle {
                color: Color::from_srgb_u8(70, 130, 180, 255),
                size: 10.0,
                spread: 0.5,
            },
            shadow: LineStyle {
                color: Color::from_straight(0.2, 0.2, 0.2, 0.4),
                size: 20.0,
                spread: 0.2,
            },
            grid_color: Color::from_srgb_u8(160, 160, 164, 255),
            backdrop_dark: Color::from_srgb_u8(224, 224, 224, 255),
            backdrop_light: Color::from_srgb_u8(242, 242, 242, 255),
        }
    }
}

/// The graph's retained nodes, in paint order: backdrop at the back, then the
/// grid, then the soft shadow under the line itself.
#[derive(Debug)]
pub struct GraphNodes {
    pub background: BackgroundNode,
    pub grid: GridNode,
    pub shadow: LineNode,
    pub line: LineNode,
}

impl GraphNodes {
    fn new(style: &GraphStyle) -> Self {
        Self {
            background: BackgroundNode::new(style.backdrop_dark, style.backdrop_light),
            grid: GridNode::new(style.grid_color),
            shadow: LineNode::new(LineMaterial::new(
                style.shadow.color,
                style.shadow.size,
                style.shadow.spread,
            )),
            line: LineNode::new(LineMaterial::new(
                style.line.color,
                style.line.size,
                style.line.spread,
            )),
        }
    }
}

/// Owns the sample window and decides, per pass, which geometry to rebuild.
///
/// Two idempotent flags accumulate damage between passes: `shape_dirty` for
/// rectangle changes and `data_dirty` for sample changes. Any number of
/// mutations between passes collapses into at most one grid rebuild and one
/// line rebuild, which is what makes high-rate feeds cheap.
///
/// The node graph itself is lazily built on the first pass with a usable
/// rectangle and torn down again when the rectangle collapses; both flags
/// survive a teardown so no pending damage is lost across it.
pub struct GraphScene {
    samples: SampleBuffer,
    rect: Rect,
    shape_dirty: bool,
    data_dirty: bool,
    style: GraphStyle,
    nodes: Option<GraphNodes>,
    observer: Option<Box<dyn PassObserver>>,
}

impl GraphScene {
    pub fn new() -> Self {
        Self::with_style(GraphStyle::default())
    }

    pub fn with_style(style: GraphStyle) -> Self {
        Self {
            samples: SampleBuffer::new(),
            rect: Rect::default(),
            shape_dirty: false,
            data_dirty: false,
            style,
            nodes: None,
            observer: None,
        }
    }

    /// Installs the pass hook. Replaces any previous observer.
    pub fn set_observer(&mut self, observer: Box<dyn PassObserver>) {
        self.observer = Some(observer);
    }

    /// Appends a sample at the back of the window and flags a data rebuild.
    pub fn append_sample(&mut self, value: f64) {
        self.samples.push(value);
        self.data_dirty = true;
    }

    /// Retires the oldest sample and flags a data rebuild.
    ///
    /// Silently does nothing on an empty window; an empty no-op leaves the
    /// flags untouched.
    pub fn remove_first_sample(&mut self) {
        if self.samples.remove_first().is_some() {
            self.data_dirty = true;
        }
    }

    /// Records a rectangle change from the layout host.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.shape_dirty = true;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    #[inline]
    pub fn nodes(&self) -> Option<&GraphNodes> {
        self.nodes.as_ref()
    }

    #[inline]
    pub fn nodes_mut(&mut self) -> Option<&mut GraphNodes> {
        self.nodes.as_mut()
    }

    /// Whether the next [`update`](Self::update) pass would do any work.
    ///
    /// Advisory for damage-driven hosts; a continuously redrawing host can
    /// ignore it, passes are cheap when nothing is dirty.
    pub fn needs_pass(&self) -> bool {
        if self.rect.is_empty() {
            // Only a pending teardown is left to do.
            return self.nodes.is_some();
        }
        self.shape_dirty || self.data_dirty || self.nodes.is_none()
    }

    /// Runs one update pass over the node graph.
    ///
    /// An empty rectangle tears the graph down; the dirty flags deliberately
    /// survive so the first pass after the rectangle comes back rebuilds
    /// everything that was pending. Otherwise the pass builds missing nodes,
    /// refreshes the background and grid on shape damage, and refreshes the
    /// line (re-sharing its geometry into the shadow) on shape or data
    /// damage. Flags are cleared only on this non-teardown path.
    pub fn update(&mut self) {
        if let Some(obs) = self.observer.as_deref_mut() {
            obs.pass_started();
        }

        if self.rect.is_empty() {
            if self.nodes.take().is_some() {
                log::debug!("graph nodes dropped (empty rect)");
            }
            if let Some(obs) = self.observer.as_deref_mut() {
                obs.pass_finished();
            }
            return;
        }

        let fresh = self.nodes.is_none();
        if fresh {
            log::debug!("graph nodes built");
        }
        let style = self.style;
        let nodes = self.nodes.get_or_insert_with(|| GraphNodes::new(&style));

        if fresh || self.shape_dirty {
            nodes.background.set_rect(self.rect);
            nodes.grid.set_rect(self.rect);
            if let Some(obs) = self.observer.as_deref_mut() {
                obs.rebuild_performed(Rebuild::Grid);
            }
        }

        if fresh || self.shape_dirty || self.data_dirty {
            nodes.line.update_geometry(self.rect, self.samples.iter());
            // The shadow draws the identical polyline; alias the fresh
            // snapshot instead of building it twice.
            nodes.shadow.share_geometry_from(&nodes.line);
            if let Some(obs) = self.observer.as_deref_mut() {
                obs.rebuild_performed(Rebuild::Line);
            }
        }

        self.shape_dirty = false;
        self.data_dirty = false;

        if let Some(obs) = self.observer.as_deref_mut() {
            obs.pass_finished();
        }
    }
}

impl Default for GraphScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        started: usize,
        finished: usize,
        rebuilds: Vec<Rebuild>,
    }

    struct Recorder(Rc<RefCell<Counts>>);

    impl PassObserver for Recorder {
        fn pass_started(&mut self) {
            self.0.borrow_mut().started += 1;
        }
        fn rebuild_performed(&mut self, rebuild: Rebuild) {
            self.0.borrow_mut().rebuilds.push(rebuild);
        }
        fn pass_finished(&mut self) {
            self.0.borrow_mut().finished += 1;
        }
    }

    fn observed_scene() -> (GraphScene, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut scene = GraphScene::new();
        scene.set_observer(Box::new(Recorder(Rc::clone(&counts))));
        (scene, counts)
    }

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    // ── first pass ────────────────────────────────────────────────────────

    #[test]
    fn first_pass_builds_everything() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.append_sample(0.5);

        scene.update();

        let nodes = scene.nodes().unwrap();
        assert_eq!(nodes.grid.vertices().len(), 12);
        assert_eq!(nodes.line.vertices().len(), 6);
        assert!(nodes.shadow.shares_geometry_with(&nodes.line));

        let c = counts.borrow();
        assert_eq!(c.started, 1);
        assert_eq!(c.finished, 1);
        assert_eq!(c.rebuilds, vec![Rebuild::Grid, Rebuild::Line]);
    }

    #[test]
    fn fresh_graph_rebuilds_even_without_dirty_flags() {
        let mut scene = GraphScene::new();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.update();

        // Teardown, then a pass with a restored rect but no new mutations
        // besides set_rect: the fresh graph must still fill in its line.
        scene.set_rect(Rect::default());
        scene.update();
        assert!(scene.nodes().is_none());

        scene.set_rect(rect());
        scene.update();

        let nodes = scene.nodes().unwrap();
        assert_eq!(nodes.line.vertices().len(), 4);
        assert!(nodes.shadow.shares_geometry_with(&nodes.line));
    }

    // ── coalescing ────────────────────────────────────────────────────────

    #[test]
    fn many_appends_one_rebuild() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.append_sample(0.1);
        scene.append_sample(0.2);
        scene.append_sample(0.3);
        scene.update();

        assert_eq!(counts.borrow().rebuilds, vec![Rebuild::Line]);
    }

    #[test]
    fn data_only_pass_skips_the_grid() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.append_sample(0.5);
        scene.update();

        assert_eq!(counts.borrow().rebuilds, vec![Rebuild::Line]);
    }

    #[test]
    fn shape_pass_rebuilds_grid_and_line() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.set_rect(Rect::new(0.0, 0.0, 200.0, 100.0));
        scene.update();

        assert_eq!(counts.borrow().rebuilds, vec![Rebuild::Grid, Rebuild::Line]);
    }

    #[test]
    fn clean_pass_rebuilds_nothing() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.update();

        let c = counts.borrow();
        assert!(c.rebuilds.is_empty());
        assert_eq!(c.started, 2);
        assert_eq!(c.finished, 2);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn empty_rect_drops_nodes_and_keeps_damage() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.update();

        scene.append_sample(0.5);
        scene.set_rect(Rect::new(0.0, 0.0, 0.0, 0.0));
        scene.update();
        assert!(scene.nodes().is_none());

        // Observer still saw a full pass around the teardown.
        assert_eq!(counts.borrow().started, 2);
        assert_eq!(counts.borrow().finished, 2);

        // The pending data damage survives into the next usable pass.
        scene.set_rect(rect());
        scene.update();
        let nodes = scene.nodes().unwrap();
        assert_eq!(nodes.line.vertices().len(), 6);
    }

    #[test]
    fn pass_without_a_rect_is_a_no_op() {
        let (mut scene, counts) = observed_scene();
        scene.append_sample(0.5);
        scene.update();

        assert!(scene.nodes().is_none());
        assert_eq!(counts.borrow().started, 1);
        assert_eq!(counts.borrow().finished, 1);
        assert!(counts.borrow().rebuilds.is_empty());
    }

    // ── sample window ─────────────────────────────────────────────────────

    #[test]
    fn remove_first_flags_a_data_rebuild() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.append_sample(0.5);
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.remove_first_sample();
        scene.update();

        assert_eq!(counts.borrow().rebuilds, vec![Rebuild::Line]);
        assert_eq!(scene.samples().iter().collect::<Vec<_>>(), vec![0.8, 0.5]);
        assert_eq!(scene.nodes().unwrap().line.vertices().len(), 4);
    }

    #[test]
    fn remove_first_on_empty_window_changes_nothing() {
        let (mut scene, counts) = observed_scene();
        scene.set_rect(rect());
        scene.update();
        counts.borrow_mut().rebuilds.clear();

        scene.remove_first_sample();
        scene.update();

        assert!(counts.borrow().rebuilds.is_empty());
    }

    #[test]
    fn shrinking_below_two_samples_empties_the_line() {
        let mut scene = GraphScene::new();
        scene.set_rect(rect());
        scene.append_sample(0.2);
        scene.append_sample(0.8);
        scene.update();

        scene.remove_first_sample();
        scene.update();

        let nodes = scene.nodes().unwrap();
        assert!(nodes.line.vertices().is_empty());
        assert!(nodes.shadow.shares_geometry_with(&nodes.line));
    }

    // ── needs_pass ────────────────────────────────────────────────────────

    #[test]
    fn needs_pass_follows_damage() {
        let mut scene = GraphScene::new();
        assert!(!scene.needs_pass());

        scene.set_rect(rect());
        assert!(scene.needs_pass());
        scene.update();
        assert!(!scene.needs_pass());

        scene.append_sample(0.5);
        assert!(scene.needs_pass());
        scene.update();
        assert!(!scene.needs_pass());
    }

    #[test]
    fn needs_pass_reports_pending_teardown_once() {
        let mut scene = GraphScene::new();
        scene.set_rect(rect());
        scene.update();

        scene.set_rect(Rect::default());
        assert!(scene.needs_pass());
        scene.update();
        // Rect is still empty; there is nothing further a pass could do.
        assert!(!scene.needs_pass());
    }

    // ── style ─────────────────────────────────────────────────────────────

    #[test]
    fn custom_style_lands_in_the_materials() {
        let mut style = GraphStyle::default();
        style.line.size = 4.0;
        style.shadow.spread = 0.1;

        let mut scene = GraphScene::with_style(style);
        scene.set_rect(rect());
        scene.update();

        let nodes = scene.nodes().unwrap();
        assert_eq!(nodes.line.material().size(), 4.0);
        assert_eq!(nodes.shadow.material().spread(), 0.1);
    }
}
