use super::EdgeId;

/// Per-run traversal state indexed by vertex id.
///
/// Owned by a single algorithm invocation so that concurrent runs over the
/// same `&Graph` never observe each other's marks.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    pub visited: Vec<bool>,
    pub dist: Vec<f64>,
    pub path: Vec<Option<EdgeId>>,
    pub indegree: Vec<usize>,
}

impl Scratch {
    pub fn new(n: usize) -> Self {
        let mut scratch = Self::default();
        scratch.reset(n);
        scratch
    }

    pub fn reset(&mut self, n: usize) {
        self.visited.clear();
        self.visited.resize(n, false);
        self.dist.clear();
        self.dist.resize(n, f64::INFINITY);
        self.path.clear();
        self.path.resize(n, None);
        self.indegree.clear();
        self.indegree.resize(n, 0);
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// First vertex id not yet visited, if any.
    pub fn first_unvisited(&self) -> Option<usize> {
        self.visited.iter().position(|v| !v)
    }
}
