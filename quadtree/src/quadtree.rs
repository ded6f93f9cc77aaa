use crate::error::{validate_boundary, QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;
use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub struct Config {
    pub node_capacity: usize,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_capacity: 4,
            max_depth: 5,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    value: T,
    x: f32,
    y: f32,
}

struct QuadNode<T> {
    boundary: Rectangle,
    depth: usize,
    entries: SmallVec<[Entry<T>; 4]>,
    // NE, NW, SE, SW
    children: Option<[usize; 4]>,
}

impl<T> QuadNode<T> {
    fn new(boundary: Rectangle, depth: usize) -> Self {
        Self {
            boundary,
            depth,
            entries: SmallVec::new(),
            children: None,
        }
    }
}

/// Point quadtree meant to be thrown away and rebuilt every tick.
///
/// Entries stay in the node that accepted them; a full node only sends new
/// points down into its quadrants. Nodes at `max_depth` never split and accept
/// any number of entries.
pub struct QuadTree<T = u32> {
    nodes: Vec<QuadNode<T>>,
    config: Config,
    len: usize,
}

impl<T> QuadTree<T> {
    pub fn new_with_config(boundary: Rectangle, config: Config) -> QuadtreeResult<Self> {
        validate_boundary(boundary.x, boundary.y, boundary.width, boundary.height)?;
        if config.node_capacity == 0 {
            return Err(QuadtreeError::InvalidNodeCapacity {
                node_capacity: config.node_capacity,
            });
        }
        Ok(QuadTree {
            nodes: vec![QuadNode::new(boundary, 0)],
            config,
            len: 0,
        })
    }

    pub fn new(boundary: Rectangle) -> QuadtreeResult<Self> {
        Self::new_with_config(boundary, Config::default())
    }

    pub fn boundary(&self) -> Rectangle {
        self.nodes[0].boundary
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert `value` at `(x, y)`.
    ///
    /// Returns false when the point is outside the root boundary. The boundary
    /// is half-open, so points on the max edges are rejected.
    pub fn insert(&mut self, value: T, x: f32, y: f32) -> bool {
        if !self.nodes[0].boundary.contains_point(x, y) {
            return false;
        }

        let mut node_index = 0;
        loop {
            let node = &self.nodes[node_index];
            if node.entries.len() < self.config.node_capacity
                || node.depth >= self.config.max_depth
            {
                break;
            }

            let existing = node.children;
            let children = match existing {
                Some(children) => children,
                None => self.subdivide(node_index),
            };

            // Float rounding can leave a sliver near the max edges that no
            // quadrant covers. Such points stay in the parent.
            match children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].boundary.contains_point(x, y))
            {
                Some(child) => node_index = child,
                None => break,
            }
        }

        self.nodes[node_index].entries.push(Entry { value, x, y });
        self.len += 1;
        true
    }

    fn subdivide(&mut self, node_index: usize) -> [usize; 4] {
        let boundary = self.nodes[node_index].boundary;
        let depth = self.nodes[node_index].depth + 1;
        let first = self.nodes.len();
        for quadrant in boundary.quadrants() {
            self.nodes.push(QuadNode::new(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];
        self.nodes[node_index].children = Some(children);
        children
    }

    /// Drop every entry and child node, keeping the root boundary.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.entries.clear();
        root.children = None;
        self.len = 0;
    }

    /// Clear, then insert every `(value, x, y)`. Returns how many points fell
    /// outside the boundary and were skipped.
    pub fn rebuild<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (T, f32, f32)>,
    {
        self.clear();
        let mut rejected = 0;
        for (value, x, y) in entries {
            if !self.insert(value, x, y) {
                rejected += 1;
            }
        }
        rejected
    }

    /// Call `f` for every entry whose point lies inside `range` (half-open,
    /// same rule as [`QuadTree::insert`]).
    pub fn query_range_with<F>(&self, range: &Rectangle, mut f: F)
    where
        F: FnMut(&T),
    {
        let mut stack: SmallVec<[usize; 32]> = SmallVec::new();
        stack.push(0);

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            if !node.boundary.intersects(range) {
                continue;
            }

            for entry in &node.entries {
                if range.contains_point(entry.x, entry.y) {
                    f(&entry.value);
                }
            }

            if let Some(children) = node.children {
                // Reverse so NE is visited first.
                stack.extend(children.iter().rev().copied());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn max_node_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn all_node_boundaries(&self, boundaries: &mut Vec<Rectangle>) {
        boundaries.extend(self.nodes.iter().map(|node| node.boundary));
    }
}

impl<T: Clone> QuadTree<T> {
    pub fn query_range(&self, range: &Rectangle) -> Vec<T> {
        let mut found = Vec::new();
        self.query_range_into(range, &mut found);
        found
    }

    pub fn query_range_into(&self, range: &Rectangle, found: &mut Vec<T>) {
        self.query_range_with(range, |value| found.push(value.clone()));
    }
}
