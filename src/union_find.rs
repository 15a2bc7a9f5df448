//! Disjoint-set forest over cell indices.
//!
//! Components are tracked in two flat arenas (parent and rank) indexed by the row-major cell index,
//! so `find` and `union` never allocate.

/// Arena-backed union-find structure with union by rank and path halving.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSets {
    /// Parent index of every element; roots point to themselves.
    parent: Vec<usize>,
    /// Upper bound on the height of the tree rooted at every element.
    rank: Vec<u8>,
    /// Number of distinct components left.
    components: usize,
}

impl DisjointSets {
    /// Creates `len` singleton sets.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            components: len,
        }
    }

    /// Returns the number of disjoint components.
    pub(crate) const fn components(&self) -> usize {
        self.components
    }

    /// Returns the representative of the set containing `element`.
    ///
    /// Returns [`None`] if `element` is out of range.
    pub(crate) fn find(&mut self, element: usize) -> Option<usize> {
        let mut current = element;
        loop {
            let parent = *self.parent.get(current)?;
            if parent == current {
                return Some(current);
            }
            let grandparent = *self.parent.get(parent)?;
            *self.parent.get_mut(current)? = grandparent;
            current = grandparent;
        }
    }

    /// Merges the sets containing `first` and `second`.
    ///
    /// Returns `true` when two distinct sets were merged, `false` when both elements already
    /// shared a set or either is out of range.
    #[expect(
        clippy::indexing_slicing,
        reason = "Both roots were just returned by `find`, so they are valid indices."
    )]
    pub(crate) fn union(&mut self, first: usize, second: usize) -> bool {
        let (Some(first_root), Some(second_root)) = (self.find(first), self.find(second)) else {
            return false;
        };
        if first_root == second_root {
            return false;
        }

        let (child, parent) = if self.rank[first_root] < self.rank[second_root] {
            (first_root, second_root)
        } else {
            (second_root, first_root)
        };
        self.parent[child] = parent;
        if self.rank[child] == self.rank[parent] {
            self.rank[parent] = self.rank[parent].saturating_add(1);
        }
        self.components -= 1;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_are_singletons() {
        let mut sets = DisjointSets::new(4);

        assert_eq!(sets.components(), 4);
        for element in 0..4 {
            assert_eq!(sets.find(element), Some(element));
        }
        assert_eq!(sets.find(4), None);
    }

    #[test]
    fn test_union_merges_once() {
        let mut sets = DisjointSets::new(5);

        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0), "already merged");
        assert!(sets.union(1, 4));

        assert_eq!(sets.components(), 2);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn test_union_out_of_range() {
        let mut sets = DisjointSets::new(2);

        assert!(!sets.union(0, 7));
        assert_eq!(sets.components(), 2);
    }

    #[test]
    fn test_long_chain_collapses_to_one_root() {
        let mut sets = DisjointSets::new(100);
        for element in 1..100 {
            assert!(sets.union(element - 1, element));
        }

        let root = sets.find(0);
        assert!((0..100).all(|element| sets.find(element) == root));
        assert_eq!(sets.components(), 1);
    }
}
