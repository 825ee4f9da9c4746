use std::collections::VecDeque;

/// Rolling window of normalized samples feeding the line geometry.
///
/// Mutation is FIFO only: values are appended at the back and retired from
/// the front, so the window slides over a live feed without reindexing.
/// Values are expected in `[0, 1]`, mapped to the graph rectangle's top and
/// bottom edges; nothing is validated, out-of-range values simply draw
/// outside the rectangle.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    values: VecDeque<f64>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Appends a sample at the back of the window.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }

    /// Retires the oldest sample, or returns `None` on an empty window.
    #[inline]
    pub fn remove_first(&mut self) -> Option<f64> {
        self.values.pop_front()
    }

    /// Samples in insertion order, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_iter_preserves_order() {
        let mut buf = SampleBuffer::new();
        buf.push(0.2);
        buf.push(0.8);
        buf.push(0.5);
        assert_eq!(buf.iter().collect::<Vec<_>>(), vec![0.2, 0.8, 0.5]);
    }

    #[test]
    fn remove_first_retires_oldest() {
        let mut buf = SampleBuffer::new();
        buf.push(0.2);
        buf.push(0.8);
        assert_eq!(buf.remove_first(), Some(0.2));
        assert_eq!(buf.iter().collect::<Vec<_>>(), vec![0.8]);
    }

    #[test]
    fn remove_first_on_empty_is_none() {
        let mut buf = SampleBuffer::new();
        assert_eq!(buf.remove_first(), None);
    }
}
