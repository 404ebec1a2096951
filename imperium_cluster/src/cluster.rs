// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connected groups of blocks.

use alloc::vec::Vec;

use crate::types::{Block, Footprint};

/// A maximal group of blocks connected by shared edges or overlap.
///
/// Clusters are produced by a [`ClusterManager`](crate::ClusterManager) and only
/// handed out by reference. A cluster's identity does not survive a merge or a
/// split; follow [`ClusterEvent`](crate::ClusterEvent)s to track it over time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster<T> {
    blocks: Vec<Block<T>>,
    bounds: Footprint,
}

impl<T> Cluster<T> {
    /// Build a cluster from a non-empty set of blocks.
    pub(crate) fn from_blocks(blocks: Vec<Block<T>>) -> Self {
        debug_assert!(!blocks.is_empty(), "clusters are never empty");
        let mut cluster = Self {
            blocks,
            bounds: Footprint::new(0, 0, 0, 0),
        };
        cluster.update();
        cluster
    }

    /// Left edge of the bounding box.
    pub const fn x(&self) -> i32 {
        self.bounds.min_x
    }

    /// Bottom edge of the bounding box.
    pub const fn y(&self) -> i32 {
        self.bounds.min_y
    }

    /// Width of the bounding box.
    pub const fn w(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the bounding box.
    pub const fn h(&self) -> i32 {
        self.bounds.height()
    }

    /// Tight bounding box of all blocks.
    pub const fn bounds(&self) -> Footprint {
        self.bounds
    }

    /// Blocks, sorted by `(x, y)`.
    pub fn blocks(&self) -> &[Block<T>] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for clusters owned by a manager.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether the bounding box covers `(x, y)`. The cell itself may be free.
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.bounds.contains_point(x, y)
    }

    /// The block whose footprint covers `(x, y)`.
    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block<T>> {
        if !self.contains_point(x, y) {
            return None;
        }
        self.blocks.iter().find(|b| b.contains_point(x, y))
    }

    /// Whether any block of this cluster is connected to `block`.
    pub fn is_adjacent_or_contains<U>(&self, block: &Block<U>) -> bool {
        // Skip the block scan when the bounding boxes are too far apart to touch.
        if !self.bounds.is_within_one_cell_of(&block.footprint()) {
            return false;
        }
        self.blocks
            .iter()
            .any(|b| b.is_adjacent_or_overlapping(block))
    }

    /// Whether any block of `other` is connected to this cluster.
    pub fn is_adjacent_or_contains_cluster<U>(&self, other: &Cluster<U>) -> bool {
        other
            .blocks
            .iter()
            .any(|b| self.is_adjacent_or_contains(b))
    }

    /// Bounding box as a [`kurbo::Rect`] in grid units.
    #[cfg(feature = "kurbo")]
    pub fn outline(&self) -> kurbo::Rect {
        self.bounds.to_rect()
    }

    pub(crate) fn push(&mut self, block: Block<T>) {
        self.blocks.push(block);
        self.update();
    }

    pub(crate) fn position_of(&self, x: i32, y: i32) -> Option<usize> {
        self.blocks.iter().position(|b| b.x() == x && b.y() == y)
    }

    pub(crate) fn remove_block(&mut self, index: usize) -> Block<T> {
        let block = self.blocks.remove(index);
        if !self.blocks.is_empty() {
            self.update();
        }
        block
    }

    pub(crate) fn into_blocks(self) -> Vec<Block<T>> {
        self.blocks
    }

    /// Recompute the bounding box and restore block order.
    fn update(&mut self) {
        let mut it = self.blocks.iter().map(Block::footprint);
        if let Some(first) = it.next() {
            self.bounds = it.fold(first, |acc, f| acc.union(&f));
        }
        self.blocks.sort_by_key(|b| (b.x(), b.y()));
    }
}
