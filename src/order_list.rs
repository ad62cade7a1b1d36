//! OrderList: threads every tree node in non-decreasing rank order.
//!
//! Positions are arena indices into this list, not tree node indices; a
//! `TreeNode` caches its own position so that swapping two nodes' ranks can
//! update both the tree topology and the ordering in one step. New
//! positions are always created at the head (rank-0 territory, where NYT
//! and fresh leaves live) and never relocated. Reordering happens by
//! swapping the *values* stored at two positions, not by moving positions
//! around.

pub type Position = usize;

const UNSET: usize = usize::MAX;

#[derive(Clone, Debug)]
struct Entry {
    next: Option<Position>,
    value: usize,
}

/// A singly-linked, arena-backed list of node indices in rank order.
#[derive(Clone, Debug, Default)]
pub struct OrderList {
    entries: Vec<Entry>,
    head: Option<Position>,
}

impl OrderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new position at the head of the list. The caller must
    /// follow up with `set_value` once the node occupying it is allocated;
    /// the two steps are split because the node and its list position are
    /// created in the same breath.
    pub fn prepend(&mut self) -> Position {
        let pos = self.entries.len();
        self.entries.push(Entry { next: self.head, value: UNSET });
        self.head = Some(pos);
        pos
    }

    pub fn set_value(&mut self, pos: Position, value: usize) {
        self.entries[pos].value = value;
    }

    pub fn value(&self, pos: Position) -> usize {
        self.entries[pos].value
    }

    pub fn successor(&self, pos: Position) -> Option<Position> {
        self.entries[pos].next
    }

    /// Exchanges the node references stored at two positions, without
    /// relinking either position's neighbors.
    pub fn swap_positions(&mut self, a: Position, b: Position) {
        if a == b {
            return;
        }
        let tmp = self.entries[a].value;
        self.entries[a].value = self.entries[b].value;
        self.entries[b].value = tmp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_builds_head_first_order() {
        let mut list = OrderList::new();
        let p0 = list.prepend();
        list.set_value(p0, 10);
        let p1 = list.prepend();
        list.set_value(p1, 11);
        let p2 = list.prepend();
        list.set_value(p2, 12);

        assert_eq!(list.value(p2), 12);
        assert_eq!(list.successor(p2), Some(p1));
        assert_eq!(list.successor(p1), Some(p0));
        assert_eq!(list.successor(p0), None);
    }

    #[test]
    fn swap_positions_exchanges_values_only() {
        let mut list = OrderList::new();
        let p0 = list.prepend();
        list.set_value(p0, 10);
        let p1 = list.prepend();
        list.set_value(p1, 11);
        let p2 = list.prepend();
        list.set_value(p2, 12);

        list.swap_positions(p2, p0);
        assert_eq!(list.value(p2), 10);
        assert_eq!(list.value(p0), 12);
        // neighbors are unchanged: p2 is still head, p0 still tail
        assert_eq!(list.successor(p2), Some(p1));
        assert_eq!(list.successor(p1), Some(p0));
        assert_eq!(list.successor(p0), None);
    }
}
