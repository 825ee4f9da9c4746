/// Which geometry an update pass rebuilt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rebuild {
    /// Background and grid followed a rectangle change.
    Grid,
    /// The line strip (and its shadow share) followed a shape or data change.
    Line,
}

/// Hook into [`GraphScene::update`](super::GraphScene::update).
///
/// The scene reports the start and end of every pass, including passes that
/// end up doing nothing, plus one event per rebuild actually performed. Hosts
/// use this for frame diagnostics and tests use it to pin down coalescing
/// behavior; the scene itself never depends on what an observer does.
pub trait PassObserver {
    fn pass_started(&mut self) {}

    fn rebuild_performed(&mut self, rebuild: Rebuild) {
        let _ = rebuild;
    }

    fn pass_finished(&mut self) {}
}
