//! A partially-sorted priority workspace over (node, distance) pairs.
//!
//! Semantically a multiset with at most one entry per node, always keeping
//! the smaller distance on duplicate insertion. Entries live in small blocks
//! of at most `block_size` elements which are only sorted when a block has to
//! be split or pulled from, never on every mutation. Two block sequences are
//! maintained: one fed by `batch_prepend` which receives batches known to be
//! smaller than everything pulled so far, and one fed by `insert`, ordered by
//! per-block upper bounds. `pull` removes up to `block_size` smallest entries
//! and reports a separator bound, so a caller can repeatedly peel off the
//! lowest distance band without ever sorting the whole workspace.

use super::graph::{NodeId, Weight};
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
struct Block {
    entries: Vec<(NodeId, Weight)>,
    upper_bound: Weight,
}

impl Block {
    fn new(upper_bound: Weight) -> Block {
        Block {
            entries: Vec::new(),
            upper_bound,
        }
    }
}

#[derive(Debug)]
pub struct BlockQueue {
    // target block size M
    block_size: usize,
    // global upper bound B, nothing at or above it belongs into the workspace
    bound: Weight,
    // blocks from batch_prepend, value ranges non-decreasing front to back
    prepended: VecDeque<Block>,
    // blocks from insert, upper bounds non-decreasing, last one always `bound`
    inserted: Vec<Block>,
    // current value of every node present in any block
    values: HashMap<NodeId, Weight>,
}

impl BlockQueue {
    /// Create a workspace for entries below `bound` with block size `block_size`.
    /// The capacity hint pre-sizes the node index for the expected number of
    /// distinct nodes.
    pub fn new(block_size: usize, bound: Weight, capacity_hint: usize) -> BlockQueue {
        BlockQueue {
            block_size: block_size.max(1),
            bound,
            prepended: VecDeque::new(),
            inserted: vec![Block::new(bound)],
            values: HashMap::with_capacity(capacity_hint),
        }
    }

    /// Number of distinct nodes currently in the workspace.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current value of a node, if present.
    pub fn value_of(&self, node: NodeId) -> Option<Weight> {
        self.values.get(&node).copied()
    }

    /// Insert a single entry. A present node keeps the smaller of its old and
    /// new value. The entry goes into the insert-block with the smallest
    /// upper bound at or above its value; overflowing blocks are split at the
    /// value median.
    pub fn insert(&mut self, node: NodeId, value: Weight) {
        if let Some(&old) = self.values.get(&node) {
            if old <= value {
                return;
            }
            self.remove(node);
        }
        self.values.insert(node, value);

        let position = self.inserted.partition_point(|block| block.upper_bound < value);
        // values at or above `bound` land in the last block, the caller keeps them out
        let position = position.min(self.inserted.len() - 1);
        self.inserted[position].entries.push((node, value));

        if self.inserted[position].entries.len() > self.block_size {
            self.split(position);
        }
    }

    /// Add a batch of entries, all expected to be smaller than everything
    /// pulled so far. Duplicates within the batch collapse to their minimum,
    /// entries which do not improve on a present node are dropped, and the
    /// survivors are prepended as sorted blocks of at most `block_size`
    /// elements.
    pub fn batch_prepend(&mut self, items: Vec<(NodeId, Weight)>) {
        if items.is_empty() {
            return;
        }

        let mut unique: HashMap<NodeId, Weight> = HashMap::with_capacity(items.len());
        for (node, value) in items {
            let entry = unique.entry(node).or_insert(value);
            if value < *entry {
                *entry = value;
            }
        }

        let mut to_add: Vec<(NodeId, Weight)> = Vec::with_capacity(unique.len());
        for (node, value) in unique {
            if let Some(&old) = self.values.get(&node) {
                if old <= value {
                    continue;
                }
                self.remove(node);
            }
            self.values.insert(node, value);
            to_add.push((node, value));
        }

        if to_add.is_empty() {
            return;
        }
        to_add.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        if to_add.len() <= self.block_size {
            self.prepended.push_front(Self::sealed_block(to_add));
        } else {
            let per_block = (self.block_size / 2).max(1);
            let chunks: Vec<_> = to_add.chunks(per_block).map(|chunk| chunk.to_vec()).collect();
            // push in reverse so the smallest chunk ends up at the very front
            for chunk in chunks.into_iter().rev() {
                self.prepended.push_front(Self::sealed_block(chunk));
            }
        }
    }

    fn sealed_block(entries: Vec<(NodeId, Weight)>) -> Block {
        let upper_bound = entries.last().expect("sealed_block needs entries").1;
        Block { entries, upper_bound }
    }

    /// Remove up to `block_size` entries of smallest value. Returns the
    /// removed nodes and a separator: every returned entry was below it,
    /// everything still in the workspace is at or above it, and it equals the
    /// configured bound once the workspace is drained.
    pub fn pull(&mut self) -> (Vec<NodeId>, Weight) {
        let mut candidates: Vec<(NodeId, Weight)> = Vec::with_capacity(2 * self.block_size);
        let gathered_prepended = Self::gather(&self.prepended, self.block_size, &mut candidates);
        let gathered_inserted = Self::gather(&self.inserted, self.block_size, &mut candidates);

        if candidates.is_empty() {
            return (Vec::new(), self.bound);
        }

        candidates.sort_unstable_by(|a, b| a.1.cmp(&b.1));
        let take = self.block_size.min(candidates.len());

        let mut result = Vec::with_capacity(take);
        for &(node, _) in &candidates[..take] {
            self.remove(node);
            self.values.remove(&node);
            result.push(node);
        }

        let mut separator = self.bound;
        if candidates.len() > take {
            separator = candidates[take].1;
        }
        // the block sequences are ordered by value band, so the first block
        // not gathered above bounds everything behind it
        if let Some(min) = Self::first_remaining_min(self.prepended.iter().skip(gathered_prepended)) {
            separator = separator.min(min);
        }
        if let Some(min) = Self::first_remaining_min(self.inserted.iter().skip(gathered_inserted)) {
            separator = separator.min(min);
        }

        // batches drain whole blocks at a time, drop the husks
        self.prepended.retain(|block| !block.entries.is_empty());

        (result, separator)
    }

    /// Copy entries from the front blocks into `candidates` until at least
    /// `goal` of them have been seen. Returns the number of blocks gathered.
    fn gather<'a>(blocks: impl IntoIterator<Item = &'a Block>, goal: usize, candidates: &mut Vec<(NodeId, Weight)>) -> usize {
        let mut gathered = 0;
        let mut collected = 0;
        for block in blocks {
            if collected >= goal {
                break;
            }
            candidates.extend_from_slice(&block.entries);
            collected += block.entries.len();
            gathered += 1;
        }
        gathered
    }

    fn first_remaining_min<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Option<Weight> {
        blocks
            .into_iter()
            .find(|block| !block.entries.is_empty())
            .map(|block| block.entries.iter().map(|&(_, value)| value).min().unwrap())
    }

    /// Drop the block entry of a node known to be present.
    /// The node index is left untouched, callers adjust it themselves.
    fn remove(&mut self, node: NodeId) {
        for block in self.prepended.iter_mut().chain(self.inserted.iter_mut()) {
            if let Some(position) = block.entries.iter().position(|&(entry, _)| entry == node) {
                block.entries.swap_remove(position);
                return;
            }
        }
    }

    /// Split the insert-block at `position` at its value median. The lower
    /// half takes the median as its new upper bound, the upper half keeps the
    /// original one.
    fn split(&mut self, position: usize) {
        let block = &mut self.inserted[position];
        block.entries.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        let mid = block.entries.len() / 2;
        let upper_entries = block.entries.split_off(mid);
        let upper = Block {
            entries: upper_entries,
            upper_bound: block.upper_bound,
        };
        block.upper_bound = block.entries[mid - 1].1;

        self.inserted.insert(position + 1, upper);
    }
}
