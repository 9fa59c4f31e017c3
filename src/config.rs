/// Shape of a run: how many workers, and how many leaf tasks each batch spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub workers: usize,
    pub subtasks_per_worker: usize,
}

impl RunConfig {
    pub fn new(workers: usize, subtasks_per_worker: usize) -> Self {
        Self {
            workers,
            subtasks_per_worker,
        }
    }

    /// Failures the fixed even/odd policy produces for this shape.
    #[cfg(test)]
    pub(crate) fn expected_failures(&self) -> usize {
        self.workers * self.subtasks_per_worker.div_ceil(2)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(2, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape() {
        let config = RunConfig::default();
        assert_eq!(config, RunConfig::new(2, 3));
        assert_eq!(config.expected_failures(), 4);
    }

    #[test]
    fn test_expected_failures_edges() {
        assert_eq!(RunConfig::new(0, 5).expected_failures(), 0);
        assert_eq!(RunConfig::new(3, 0).expected_failures(), 0);
        assert_eq!(RunConfig::new(3, 1).expected_failures(), 3);
        assert_eq!(RunConfig::new(4, 4).expected_failures(), 8);
    }
}
