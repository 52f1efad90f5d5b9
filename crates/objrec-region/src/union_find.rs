//! Disjoint-set forest over integer labels
//!
//! Each entry is either a parent index or, at a root, the negated size of
//! its class. `find` compresses paths so every visited node points straight
//! at the root; `union` attaches the smaller class under the larger one.

/// Disjoint sets over the indices `0..len`
#[derive(Debug, Clone)]
pub struct DisjointSets {
    /// Parent index (>= 0) or negated class size at a root (< 0)
    entries: Vec<i64>,
}

impl DisjointSets {
    /// Create `n` singleton classes.
    pub fn new(n: usize) -> Self {
        Self {
            entries: vec![-1; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the structure holds no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `x` is the representative of its class.
    pub fn is_root(&self, x: usize) -> bool {
        self.entries[x] < 0
    }

    /// Return the representative of `x`'s class.
    ///
    /// Every node on the path from `x` is re-pointed directly at the root.
    ///
    /// # Panics
    ///
    /// Panics if `x >= len()`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.entries[root] >= 0 {
            root = self.entries[root] as usize;
        }

        let mut node = x;
        while self.entries[node] >= 0 {
            let next = self.entries[node] as usize;
            self.entries[node] = root as i64;
            node = next;
        }

        root
    }

    /// Merge the classes whose roots are `a` and `b`.
    ///
    /// No-op when `a == b`. The root of the smaller class is attached under
    /// the root of the larger; on a tie `b` goes under `a`. Returns the
    /// surviving root.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(self.is_root(a) && self.is_root(b), "union requires roots");
        if a == b {
            return a;
        }

        let (keep, attach) = if self.entries[a] <= self.entries[b] {
            (a, b)
        } else {
            (b, a)
        };
        self.entries[keep] += self.entries[attach];
        self.entries[attach] = keep as i64;
        keep
    }

    /// Merge the classes containing `a` and `b`, whatever their roots.
    pub fn union_sets(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        self.union(ra, rb)
    }

    /// Whether `a` and `b` are in the same class.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Size of the class containing `x`.
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        (-self.entries[root]) as usize
    }

    /// Number of distinct classes.
    pub fn set_count(&self) -> usize {
        self.entries.iter().filter(|&&e| e < 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut sets = DisjointSets::new(4);
        assert_eq!(sets.len(), 4);
        assert_eq!(sets.set_count(), 4);
        for i in 0..4 {
            assert_eq!(sets.find(i), i);
            assert_eq!(sets.set_size(i), 1);
        }
    }

    #[test]
    fn test_union_same_root_is_noop() {
        let mut sets = DisjointSets::new(3);
        assert_eq!(sets.union(1, 1), 1);
        assert_eq!(sets.set_count(), 3);
        assert_eq!(sets.set_size(1), 1);
    }

    #[test]
    fn test_tie_attaches_second_under_first() {
        let mut sets = DisjointSets::new(3);
        assert_eq!(sets.union(2, 1), 2);
        assert_eq!(sets.find(1), 2);
    }

    #[test]
    fn test_smaller_goes_under_larger() {
        let mut sets = DisjointSets::new(6);
        sets.union(1, 2); // root 1, size 2
        sets.union(1, 3); // root 1, size 3
        let root = sets.union(4, 1);
        assert_eq!(root, 1);
        assert_eq!(sets.set_size(4), 4);
        assert_eq!(sets.set_count(), 3);
    }

    #[test]
    fn test_path_compression() {
        let mut sets = DisjointSets::new(5);
        sets.union_sets(0, 1);
        sets.union_sets(2, 3);
        sets.union_sets(0, 2);
        sets.union_sets(4, 3);
        let root = sets.find(3);
        for i in 0..5 {
            assert_eq!(sets.find(i), root);
        }
        // After compression every non-root points straight at the root
        for i in 0..5 {
            if i != root {
                assert_eq!(sets.entries[i], root as i64);
            }
        }
        assert_eq!(sets.set_size(0), 5);
    }
}
