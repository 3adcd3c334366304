//! Fixed-capacity least-recently-used cache.
//!
//! Entries live in an arena of nodes threaded on a doubly linked list that
//! runs from a sentinel head (most recently used side) to a sentinel tail
//! (least recently used side). A key → slot map gives O(1) lookup, and
//! moving a node to the front or unlinking the tail is O(1) pointer surgery
//! on slot indices.

use std::collections::HashMap;
use std::hash::Hash;

const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug, Clone)]
struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    slots: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "called `LruCache::new()` with zero capacity");
        let mut nodes = Vec::with_capacity(capacity.min(1 << 16) + 2);
        nodes.push(Node {
            entry: None,
            prev: HEAD,
            next: TAIL,
        });
        nodes.push(Node {
            entry: None,
            prev: HEAD,
            next: TAIL,
        });
        Self {
            capacity,
            slots: HashMap::new(),
            nodes,
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Membership test that leaves recency untouched.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.slots.get(key)?;
        self.unlink(slot);
        self.push_front(slot);
        self.nodes[slot].entry.as_ref().map(|(_, v)| v)
    }

    /// Inserts or updates `key` as the most recently used entry. Returns the
    /// entry evicted to make room, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&slot) = self.slots.get(&key) {
            self.nodes[slot].entry = Some((key, value));
            self.unlink(slot);
            self.push_front(slot);
            return None;
        }

        let evicted = if self.slots.len() >= self.capacity {
            self.pop_back()
        } else {
            None
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot].entry = Some((key.clone(), value));
                slot
            }
            None => {
                self.nodes.push(Node {
                    entry: Some((key.clone(), value)),
                    prev: HEAD,
                    next: TAIL,
                });
                self.nodes.len() - 1
            }
        };
        self.slots.insert(key, slot);
        self.push_front(slot);
        evicted
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.nodes[HEAD].next;
        std::iter::from_fn(move || {
            if cursor == TAIL {
                return None;
            }
            let node = &self.nodes[cursor];
            cursor = node.next;
            node.entry.as_ref().map(|(k, _)| k)
        })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free.clear();
    }

    fn pop_back(&mut self) -> Option<(K, V)> {
        let slot = self.nodes[TAIL].prev;
        if slot == HEAD {
            return None;
        }
        self.unlink(slot);
        self.free.push(slot);
        let (key, value) = self.nodes[slot].entry.take()?;
        self.slots.remove(&key);
        Some((key, value))
    }

    #[inline]
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    #[inline]
    fn push_front(&mut self, slot: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[slot].prev = HEAD;
        self.nodes[slot].next = first;
        self.nodes[first].prev = slot;
        self.nodes[HEAD].next = slot;
    }
}
