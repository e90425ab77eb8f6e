use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    arena::{Arena, NodeId},
    comparator::prelude::*,
};

/// Highest tier a node can reach. `head` carries `MAX_LEVEL + 1` links.
pub const MAX_LEVEL: usize = 20;

struct Node<K, V> {
    key: K,
    value: V,
    // one successor per tier `0..=level`, `None` is the tail
    tower: Box<[Option<NodeId>]>,
}

impl<K, V> Node<K, V> {
    fn level(&self) -> usize {
        self.tower.len() - 1
    }
}

#[derive(Debug, Clone, Copy)]
enum Pos {
    Head,
    Node(NodeId),
}

struct Inner<K, V> {
    head: [Option<NodeId>; MAX_LEVEL + 1],
    nodes: Arena<Node<K, V>>,
    level: usize,
    rng: StdRng,
}

impl<K, V> Inner<K, V> {
    fn new(rng: StdRng) -> Self {
        Self {
            head: [None; MAX_LEVEL + 1],
            nodes: Arena::new(),
            level: 0,
            rng,
        }
    }

    fn next(&self, pos: Pos, level: usize) -> Option<NodeId> {
        match pos {
            Pos::Head => self.head[level],
            Pos::Node(id) => self.nodes.get(id).tower[level],
        }
    }

    fn set_next(&mut self, pos: Pos, level: usize, link: Option<NodeId>) {
        match pos {
            Pos::Head => self.head[level] = link,
            Pos::Node(id) => self.nodes.get_mut(id).tower[level] = link,
        }
    }

    // [1, MAX_LEVEL]
    fn choose_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.random_bool(0.5) {
            level += 1;
        }
        level
    }

    /// Walks from the top active tier down to tier 0, recording in `update`
    /// the last node whose key is less than `key` on every tier. Returns the
    /// tier-0 successor of that node: the first node not less than `key`.
    fn locate<C>(&self, c: &C, key: &K, update: &mut [Pos; MAX_LEVEL + 1]) -> Option<NodeId>
    where
        C: Comparator<Item = K>,
    {
        let mut cur = Pos::Head;
        for level in (0..=self.level).rev() {
            while let Some(next) = self.next(cur, level) {
                if c.compare(&self.nodes.get(next).key, key).is_lt() {
                    cur = Pos::Node(next);
                } else {
                    break;
                }
            }
            update[level] = cur;
        }
        self.next(cur, 0)
    }

    fn lower_bound<C>(&self, c: &C, key: &K) -> Option<NodeId>
    where
        C: Comparator<Item = K>,
    {
        let mut update = [Pos::Head; MAX_LEVEL + 1];
        self.locate(c, key, &mut update)
    }

    fn matching<C>(&self, c: &C, candidate: Option<NodeId>, key: &K) -> Option<NodeId>
    where
        C: Comparator<Item = K>,
    {
        candidate.filter(|&id| c.compare(&self.nodes.get(id).key, key).is_eq())
    }

    fn find<C>(&self, c: &C, key: &K) -> Option<NodeId>
    where
        C: Comparator<Item = K>,
    {
        self.matching(c, self.lower_bound(c, key), key)
    }
}

/// An ordered map over a randomized multi-level linked structure.
///
/// Every operation runs under a lock owned by this instance, so a list can be
/// shared between threads behind an `Arc` or a scoped borrow. Lists never
/// contend with each other.
pub struct SkipList<K, V, C> {
    c: C,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V, C> Default for SkipList<K, V, C>
where
    C: Comparator<Item = K> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C> SkipList<K, V, C>
where
    C: Comparator<Item = K>,
{
    pub fn new(c: C) -> Self {
        Self::with_rng(c, StdRng::from_os_rng())
    }

    /// Same as [`SkipList::new`], but node levels are drawn from a generator
    /// seeded with `seed`, which makes the shape of the list reproducible.
    pub fn with_seed(c: C, seed: u64) -> Self {
        Self::with_rng(c, StdRng::seed_from_u64(seed))
    }

    fn with_rng(c: C, rng: StdRng) -> Self {
        SkipList {
            c,
            inner: Mutex::new(Inner::new(rng)),
        }
    }

    pub fn comparator(&self) -> &C {
        &self.c
    }

    /// Inserts `key` with `value`. Returns `false` and leaves the list
    /// untouched if an equal key is already present.
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let mut update = [Pos::Head; MAX_LEVEL + 1];
        let candidate = inner.locate(&self.c, &key, &mut update);
        if inner.matching(&self.c, candidate, &key).is_some() {
            return false;
        }

        // tiers above the current level keep `Pos::Head` as predecessor
        let level = inner.choose_level();
        if level > inner.level {
            inner.level = level;
        }

        let tower = (0..=level)
            .map(|i| inner.next(update[i], i))
            .collect::<Box<[_]>>();
        let id = inner.nodes.insert(Node { key, value, tower });
        for (i, &pos) in update.iter().enumerate().take(level + 1) {
            inner.set_next(pos, i, Some(id));
        }

        true
    }

    pub fn search(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.search_with(key, V::clone)
    }

    /// Looks `key` up and hands its value to `f` while the lock is held.
    pub fn search_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let inner = self.inner.lock();
        inner
            .find(&self.c, key)
            .map(|id| f(&inner.nodes.get(id).value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().find(&self.c, key).is_some()
    }

    /// Overwrites the value stored under `key`. The node keeps its position
    /// and its level. Returns `false` if the key is absent.
    pub fn update(&self, key: &K, value: V) -> bool {
        let mut inner = self.inner.lock();
        match inner.find(&self.c, key) {
            Some(id) => {
                inner.nodes.get_mut(id).value = value;
                true
            }
            None => false,
        }
    }

    /// Unlinks `key` from every tier it sits on and frees its node. Returns
    /// `false` if the key is absent.
    pub fn erase(&self, key: &K) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let mut update = [Pos::Head; MAX_LEVEL + 1];
        let candidate = inner.locate(&self.c, key, &mut update);
        let Some(id) = inner.matching(&self.c, candidate, key) else {
            return false;
        };

        let level = inner.nodes.get(id).level();
        for (i, &pos) in update.iter().enumerate().take(level + 1) {
            let next = inner.nodes.get(id).tower[i];
            inner.set_next(pos, i, next);
        }
        inner.nodes.remove(id);

        while inner.level > 0 && inner.head[inner.level].is_none() {
            inner.level -= 1;
        }

        true
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.head = [None; MAX_LEVEL + 1];
        inner.nodes.clear();
        inner.level = 0;
    }

    pub fn iter(&self) -> SkipListIter<'_, K, V, C> {
        SkipListIter::new(self)
    }
}

impl<K, V, C> SkipList<K, V, C> {
    pub fn len(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest tier currently holding a node, 0 when the list is empty.
    pub fn level(&self) -> usize {
        self.inner.lock().level
    }

    /// Approximate bytes used by nodes and their link towers.
    pub fn mem_usage(&self) -> usize {
        let inner = self.inner.lock();
        let towers = inner
            .nodes
            .iter()
            .map(|node| node.tower.len() * std::mem::size_of::<Option<NodeId>>())
            .sum::<usize>();
        inner.nodes.mem_usage() + towers
    }
}

impl<K, V, C> fmt::Display for SkipList<K, V, C>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        for level in 0..=inner.level {
            write!(f, "Level {level}: ")?;
            let mut cur = inner.head[level];
            while let Some(id) = cur {
                let node = inner.nodes.get(id);
                write!(f, "{}:{};", node.key, node.value)?;
                cur = node.tower[level];
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, C> fmt::Debug for SkipList<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        let entries = Entries {
            nodes: &inner.nodes,
            cur: inner.head[0],
        };
        f.debug_map().entries(entries).finish()
    }
}

/// Forward cursor over tier 0.
///
/// The cursor holds the list's lock until it is dropped: other threads block
/// on the list meanwhile, and calling a list operation from the thread that
/// owns the cursor deadlocks.
pub struct SkipListIter<'a, K, V, C> {
    inner: MutexGuard<'a, Inner<K, V>>,
    c: &'a C,
    cur: Option<NodeId>,
}

impl<'a, K, V, C> SkipListIter<'a, K, V, C>
where
    C: Comparator<Item = K>,
{
    /// Positions the cursor on the first entry.
    pub fn new(list: &'a SkipList<K, V, C>) -> Self {
        let inner = list.inner.lock();
        let cur = inner.head[0];
        SkipListIter {
            inner,
            c: &list.c,
            cur,
        }
    }

    /// `false` once the cursor has moved past the last entry.
    pub fn is_valid(&self) -> bool {
        self.cur.is_some()
    }

    pub fn key(&self) -> Option<&K> {
        self.cur.map(|id| &self.inner.nodes.get(id).key)
    }

    pub fn value(&self) -> Option<&V> {
        self.cur.map(|id| &self.inner.nodes.get(id).value)
    }

    pub fn entry(&self) -> Option<(&K, &V)> {
        self.cur.map(|id| {
            let node = self.inner.nodes.get(id);
            (&node.key, &node.value)
        })
    }

    pub fn next(&mut self) {
        assert!(self.is_valid());
        self.cur = self.cur.and_then(|id| self.inner.nodes.get(id).tower[0]);
    }

    pub fn seek_to_first(&mut self) {
        self.cur = self.inner.head[0];
    }

    /// Moves to the first entry whose key is not less than `key`.
    pub fn seek(&mut self, key: &K) {
        self.cur = self.inner.lower_bound(self.c, key);
    }

    /// Moves to the entry equal to `key`, or past the end if there is none.
    pub fn find(&mut self, key: &K) {
        self.cur = self.inner.find(self.c, key);
    }

    /// Entries from the cursor position to the end. The cursor does not move.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            nodes: &self.inner.nodes,
            cur: self.cur,
        }
    }
}

pub struct Entries<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    cur: Option<NodeId>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?);
        self.cur = node.tower[0];
        Some((&node.key, &node.value))
    }
}
