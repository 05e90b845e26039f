use petgraph::unionfind::UnionFind;

/// Disjoint sets over the integers `0..size`, counting how many distinct sets remain.
///
/// Used by the generators to know whether two cells are already joined by some route, so
/// carving between them would make a loop.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    sets: UnionFind<usize>,
    size: usize,
    sets_count: usize,
}

impl DisjointSets {
    /// Every element starts alone in its own set.
    pub fn new(size: usize) -> DisjointSets {
        DisjointSets {
            sets: UnionFind::new(size),
            size,
            sets_count: size,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of distinct sets remaining.
    pub fn sets_count(&self) -> usize {
        self.sets_count
    }

    /// Representative element of the set containing `element`, compressing the path to it.
    ///
    /// Panics if `element` is out of range.
    pub fn find(&mut self, element: usize) -> usize {
        self.sets.find_mut(element)
    }

    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.sets.equiv(a, b)
    }

    /// Merge the sets containing `a` and `b`. Returns false if they were already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let merged = self.sets.union(a, b);
        if merged {
            self.sets_count -= 1;
        }
        merged
    }
}
