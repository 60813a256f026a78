//! A self-balancing ordered map keyed by an explicit comparator.
//!
//! Keys need not implement [`Ord`] (our two uses both key on `f64`, which
//! doesn't); instead a [`Comparator`] object supplies a total order. This
//! mirrors cranelift's `bforest::Comparator<K>` trait: a context-free
//! comparison object rather than a trait bound on the key type.
//!
//! Internally this is a textbook parent-pointer AVL tree, with nodes
//! allocated from an [`Arena`] (so the simplifier's two ordered maps --
//! the merge queue and the overlap-count index -- share the same
//! small-object allocation discipline as segments). A doubly linked
//! "thread" (`next`/`prev`) runs through the nodes in sorted order, so
//! in-order traversal and predecessor/successor lookups never need to
//! re-walk the tree from the root.

use crate::arena::{Arena, ArenaIndex};
use crate::TskitError;
use std::cmp::Ordering;

/// A key comparator: a total order over `K`, supplied as an object rather
/// than via [`Ord`] so keys can be plain `f64`-bearing tuples.
pub trait Comparator<K> {
    /// Compare `a` and `b`. Must provide a total order over the key space.
    fn cmp(&self, a: &K, b: &K) -> Ordering;
}

/// Where `search_closest`'s returned node sits relative to the query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The returned node's key equals the query key.
    Equal,
    /// The returned node's key is strictly less than the query key: it is
    /// the inclusive predecessor.
    Less,
    /// The returned node's key is strictly greater than the query key.
    Greater,
}

/// A handle to a node in an [`OrderedMap`].
pub type NodeHandle<K, V> = ArenaIndex<Node<K, V>>;

pub struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<NodeHandle<K, V>>,
    left: Option<NodeHandle<K, V>>,
    right: Option<NodeHandle<K, V>>,
    height: i32,
    prev: Option<NodeHandle<K, V>>,
    next: Option<NodeHandle<K, V>>,
}

/// A self-balancing ordered collection of `(K, V)` pairs.
pub struct OrderedMap<K, V, C> {
    arena: Arena<Node<K, V>>,
    root: Option<NodeHandle<K, V>>,
    head: Option<NodeHandle<K, V>>,
    len: usize,
    comparator: C,
}

impl<K, V, C: Comparator<K>> OrderedMap<K, V, C> {
    /// Create an empty map, allocating tree nodes in chunks of
    /// `chunk_capacity`.
    pub fn new(chunk_capacity: usize, comparator: C) -> Result<Self, TskitError> {
        Ok(Self {
            arena: Arena::new(chunk_capacity)?,
            root: None,
            head: None,
            len: 0,
            comparator,
        })
    }

    /// Number of entries currently in the map.
    pub fn count(&self) -> usize {
        self.len
    }

    /// `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The in-order-first (minimum-keyed) node, or `None` if empty.
    pub fn head(&self) -> Option<NodeHandle<K, V>> {
        self.head
    }

    /// The node immediately after `node` in sorted order.
    pub fn next(&self, node: NodeHandle<K, V>) -> Option<NodeHandle<K, V>> {
        self.arena.get(node).next
    }

    /// The node immediately before `node` in sorted order.
    pub fn prev(&self, node: NodeHandle<K, V>) -> Option<NodeHandle<K, V>> {
        self.arena.get(node).prev
    }

    pub fn key(&self, node: NodeHandle<K, V>) -> &K {
        &self.arena.get(node).key
    }

    pub fn value(&self, node: NodeHandle<K, V>) -> &V {
        &self.arena.get(node).value
    }

    pub fn value_mut(&mut self, node: NodeHandle<K, V>) -> &mut V {
        &mut self.arena.get_mut(node).value
    }

    fn height_of(&self, node: Option<NodeHandle<K, V>>) -> i32 {
        match node {
            Some(n) => self.arena.get(n).height,
            None => 0,
        }
    }

    fn update_height(&mut self, node: NodeHandle<K, V>) {
        let left = self.arena.get(node).left;
        let right = self.arena.get(node).right;
        let h = 1 + std::cmp::max(self.height_of(left), self.height_of(right));
        self.arena.get_mut(node).height = h;
    }

    fn balance_factor(&self, node: NodeHandle<K, V>) -> i32 {
        let left = self.arena.get(node).left;
        let right = self.arena.get(node).right;
        self.height_of(left) - self.height_of(right)
    }

    fn set_child(
        &mut self,
        parent: Option<NodeHandle<K, V>>,
        old_child: NodeHandle<K, V>,
        new_child: Option<NodeHandle<K, V>>,
    ) {
        match parent {
            None => self.root = new_child,
            Some(p) => {
                if self.arena.get(p).left == Some(old_child) {
                    self.arena.get_mut(p).left = new_child;
                } else {
                    self.arena.get_mut(p).right = new_child;
                }
            }
        }
    }

    /// Rotate `x` left: `x`'s right child `y` takes `x`'s place.
    fn rotate_left(&mut self, x: NodeHandle<K, V>) -> NodeHandle<K, V> {
        let y = self.arena.get(x).right.expect("rotate_left needs right child");
        let y_left = self.arena.get(y).left;
        let x_parent = self.arena.get(x).parent;

        self.arena.get_mut(x).right = y_left;
        if let Some(yl) = y_left {
            self.arena.get_mut(yl).parent = Some(x);
        }
        self.arena.get_mut(y).left = Some(x);
        self.arena.get_mut(x).parent = Some(y);
        self.arena.get_mut(y).parent = x_parent;
        self.set_child(x_parent, x, Some(y));

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Rotate `x` right: `x`'s left child `y` takes `x`'s place.
    fn rotate_right(&mut self, x: NodeHandle<K, V>) -> NodeHandle<K, V> {
        let y = self.arena.get(x).left.expect("rotate_right needs left child");
        let y_right = self.arena.get(y).right;
        let x_parent = self.arena.get(x).parent;

        self.arena.get_mut(x).left = y_right;
        if let Some(yr) = y_right {
            self.arena.get_mut(yr).parent = Some(x);
        }
        self.arena.get_mut(y).right = Some(x);
        self.arena.get_mut(x).parent = Some(y);
        self.arena.get_mut(y).parent = x_parent;
        self.set_child(x_parent, x, Some(y));

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rebalance_at(&mut self, node: NodeHandle<K, V>) -> NodeHandle<K, V> {
        self.update_height(node);
        let bf = self.balance_factor(node);
        if bf > 1 {
            let left = self.arena.get(node).left.unwrap();
            if self.balance_factor(left) < 0 {
                self.rotate_left(left);
            }
            self.rotate_right(node)
        } else if bf < -1 {
            let right = self.arena.get(node).right.unwrap();
            if self.balance_factor(right) > 0 {
                self.rotate_right(right);
            }
            self.rotate_left(node)
        } else {
            node
        }
    }

    /// Walk from `from` up to the root, rebalancing and fixing heights
    /// along the way.
    fn rebalance_upward(&mut self, from: Option<NodeHandle<K, V>>) {
        let mut cur = from;
        while let Some(node) = cur {
            let balanced = self.rebalance_at(node);
            cur = self.arena.get(balanced).parent;
        }
    }

    /// Insert `key`/`value`, returning the new node's handle.
    ///
    /// Does not check for an existing equal key; callers that need
    /// upsert semantics should `search` first.
    pub fn insert(&mut self, key: K, value: V) -> Result<NodeHandle<K, V>, TskitError> {
        // Descend the tree, tracking the in-order neighbors we pass so the
        // thread can be spliced in without a second traversal.
        let mut parent = None;
        let mut cur = self.root;
        let mut went_left_of: Option<NodeHandle<K, V>> = None; // predecessor candidate
        let mut went_right_of: Option<NodeHandle<K, V>> = None; // successor candidate

        while let Some(node) = cur {
            parent = Some(node);
            match self.comparator.cmp(&key, &self.arena.get(node).key) {
                Ordering::Less => {
                    went_right_of = Some(node);
                    cur = self.arena.get(node).left;
                }
                _ => {
                    went_left_of = Some(node);
                    cur = self.arena.get(node).right;
                }
            }
        }

        let new_node = Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 1,
            prev: went_left_of,
            next: went_right_of,
        };
        let handle = self.arena.alloc(new_node)?;

        match parent {
            None => self.root = Some(handle),
            Some(p) => {
                if self.comparator.cmp(self.key(handle), &self.arena.get(p).key) == Ordering::Less
                {
                    self.arena.get_mut(p).left = Some(handle);
                } else {
                    self.arena.get_mut(p).right = Some(handle);
                }
            }
        }

        if let Some(pred) = went_left_of {
            self.arena.get_mut(pred).next = Some(handle);
        } else {
            self.head = Some(handle);
        }
        if let Some(succ) = went_right_of {
            self.arena.get_mut(succ).prev = Some(handle);
        }

        self.len += 1;
        self.rebalance_upward(parent);
        Ok(handle)
    }

    /// Find the node with key exactly `key`, if any.
    pub fn search(&self, key: &K) -> Option<NodeHandle<K, V>> {
        let mut cur = self.root;
        while let Some(node) = cur {
            match self.comparator.cmp(key, &self.arena.get(node).key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => cur = self.arena.get(node).left,
                Ordering::Greater => cur = self.arena.get(node).right,
            }
        }
        None
    }

    /// Find the node closest to `key`, along with its [`Relation`] to
    /// `key`. Returns `None` only if the map is empty.
    ///
    /// When the relation is [`Relation::Greater`], the caller can step to
    /// [`OrderedMap::prev`] to obtain the inclusive predecessor.
    pub fn search_closest(&self, key: &K) -> Option<(NodeHandle<K, V>, Relation)> {
        let mut cur = self.root?;
        loop {
            match self.comparator.cmp(key, &self.arena.get(cur).key) {
                Ordering::Equal => return Some((cur, Relation::Equal)),
                Ordering::Less => match self.arena.get(cur).left {
                    Some(l) => cur = l,
                    None => return Some((cur, Relation::Less)),
                },
                Ordering::Greater => match self.arena.get(cur).right {
                    Some(r) => cur = r,
                    None => return Some((cur, Relation::Greater)),
                },
            }
        }
    }

    /// Remove `node` from the map, freeing its slot.
    pub fn unlink(&mut self, node: NodeHandle<K, V>) {
        // Splice `node` out of the sorted thread first, based on its
        // current identity -- this is correct regardless of which arena
        // slot the structural deletion below ends up physically freeing.
        let (prev, next) = {
            let n = self.arena.get(node);
            (n.prev, n.next)
        };
        match prev {
            Some(p) => self.arena.get_mut(p).next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.arena.get_mut(n).prev = prev;
        }

        let (left, right, parent) = {
            let n = self.arena.get(node);
            (n.left, n.right, n.parent)
        };

        let rebalance_from = if left.is_some() && right.is_some() {
            // Two children: splice in the in-order successor's key/value,
            // then physically remove the successor (which has no left
            // child) from the tree structure. Re-thread the successor's
            // old neighbors to point at `node`, which now holds the
            // successor's key/value.
            let succ = {
                let mut s = right.unwrap();
                while let Some(l) = self.arena.get(s).left {
                    s = l;
                }
                s
            };
            let succ_prev = self.arena.get(succ).prev;
            let succ_next = self.arena.get(succ).next;
            let succ_right = self.arena.get(succ).right;
            let succ_parent = self.arena.get(succ).parent;

            // Detach succ from the tree: it has at most a right child.
            let rebalance_start = if succ_parent == Some(node) {
                node
            } else {
                self.set_child(succ_parent, succ, succ_right);
                if let Some(sr) = succ_right {
                    self.arena.get_mut(sr).parent = succ_parent;
                }
                succ_parent.unwrap()
            };
            if succ_parent == Some(node) {
                self.arena.get_mut(node).right = succ_right;
                if let Some(sr) = succ_right {
                    self.arena.get_mut(sr).parent = Some(node);
                }
            }

            // Move succ's payload into node; node keeps its own
            // left/right/parent/height (those describe node's fixed
            // position in the tree, which we are reusing).
            let freed = self.arena.free(succ);
            self.arena.get_mut(node).key = freed.key;
            self.arena.get_mut(node).value = freed.value;

            // Re-thread: node now occupies succ's old sorted position.
            self.arena.get_mut(node).prev = succ_prev;
            self.arena.get_mut(node).next = succ_next;
            match succ_prev {
                Some(p) => self.arena.get_mut(p).next = Some(node),
                None => self.head = Some(node),
            }
            if let Some(n) = succ_next {
                self.arena.get_mut(n).prev = Some(node);
            }

            self.len -= 1;
            return self.rebalance_upward(Some(rebalance_start));
        } else if left.is_some() {
            left
        } else {
            right
        };

        self.set_child(parent, node, rebalance_from);
        if let Some(c) = rebalance_from {
            self.arena.get_mut(c).parent = parent;
        }
        self.arena.free(node);
        self.len -= 1;
        self.rebalance_upward(parent);
    }

    /// Iterate all entries in ascending key order.
    pub fn iter(&self) -> OrderedMapIter<'_, K, V, C> {
        OrderedMapIter {
            map: self,
            cur: self.head,
        }
    }
}

pub struct OrderedMapIter<'a, K, V, C> {
    map: &'a OrderedMap<K, V, C>,
    cur: Option<NodeHandle<K, V>>,
}

impl<'a, K, V, C: Comparator<K>> Iterator for OrderedMapIter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = self.map.next(node);
        let n = self.map.arena.get(node);
        Some((&n.key, &n.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct F64Cmp;
    impl Comparator<f64> for F64Cmp {
        fn cmp(&self, a: &f64, b: &f64) -> Ordering {
            a.partial_cmp(b).unwrap()
        }
    }

    fn collect_keys(map: &OrderedMap<f64, i32, F64Cmp>) -> Vec<f64> {
        map.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn insert_maintains_sorted_order() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        for (k, v) in [(5.0, 5), (1.0, 1), (3.0, 3), (4.0, 4), (2.0, 2)] {
            map.insert(k, v).unwrap();
        }
        assert_eq!(map.count(), 5);
        assert_eq!(collect_keys(&map), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn search_finds_exact_key() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        for (k, v) in [(1.0, 1), (2.0, 2), (3.0, 3)] {
            map.insert(k, v).unwrap();
        }
        let h = map.search(&2.0).unwrap();
        assert_eq!(*map.value(h), 2);
        assert!(map.search(&2.5).is_none());
    }

    #[test]
    fn search_closest_reports_relation() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        for (k, v) in [(1.0, 1), (3.0, 3), (5.0, 5)] {
            map.insert(k, v).unwrap();
        }
        let (h, rel) = map.search_closest(&3.0).unwrap();
        assert_eq!(*map.value(h), 3);
        assert_eq!(rel, Relation::Equal);

        let (h, rel) = map.search_closest(&4.0).unwrap();
        assert_eq!(rel, Relation::Greater);
        // Step back to get the inclusive predecessor.
        assert_eq!(*map.key(h), 5.0);
        let pred = map.prev(h).unwrap();
        assert_eq!(*map.key(pred), 3.0);

        let (h, rel) = map.search_closest(&0.0).unwrap();
        assert_eq!(*map.key(h), 1.0);
        assert_eq!(rel, Relation::Greater);
    }

    #[test]
    fn unlink_leaf() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        for (k, v) in [(2.0, 2), (1.0, 1), (3.0, 3)] {
            map.insert(k, v).unwrap();
        }
        let h = map.search(&1.0).unwrap();
        map.unlink(h);
        assert_eq!(map.count(), 2);
        assert_eq!(collect_keys(&map), vec![2.0, 3.0]);
    }

    #[test]
    fn unlink_node_with_two_children() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        for (k, v) in [(4.0, 4), (2.0, 2), (6.0, 6), (1.0, 1), (3.0, 3), (5.0, 5), (7.0, 7)] {
            map.insert(k, v).unwrap();
        }
        let root = map.search(&4.0).unwrap();
        map.unlink(root);
        assert_eq!(map.count(), 6);
        assert_eq!(
            collect_keys(&map),
            vec![1.0, 2.0, 3.0, 5.0, 6.0, 7.0]
        );
        // Every remaining value is still reachable and intact.
        for k in [1.0, 2.0, 3.0, 5.0, 6.0, 7.0] {
            let h = map.search(&k).unwrap();
            assert_eq!(*map.value(h) as f64, k);
        }
    }

    #[test]
    fn unlink_all_drains_the_map() {
        let mut map = OrderedMap::new(4, F64Cmp).unwrap();
        let keys: Vec<f64> = (0..50).map(|i| i as f64).collect();
        for &k in &keys {
            map.insert(k, k as i32).unwrap();
        }
        for &k in &keys {
            let h = map.search(&k).unwrap();
            map.unlink(h);
        }
        assert_eq!(map.count(), 0);
        assert!(map.is_empty());
        assert!(map.head().is_none());
    }

    #[test]
    fn large_random_like_sequence_stays_sorted() {
        let mut map = OrderedMap::new(8, F64Cmp).unwrap();
        let order = [13, 7, 1, 19, 4, 17, 9, 2, 15, 11, 6, 18, 3, 16, 8, 0, 12, 5, 14, 10];
        for &k in &order {
            map.insert(k as f64, k).unwrap();
        }
        assert_eq!(map.count(), order.len());
        let collected = collect_keys(&map);
        let mut expected: Vec<f64> = order.iter().map(|&k| k as f64).collect();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(collected, expected);
    }
}
