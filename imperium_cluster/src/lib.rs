// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imperium Cluster: incremental connected-component tracking for grid blocks.
//!
//! Game servers need to know which placed blocks form a contiguous group: the cores
//! of a team, the displays of a logic image, the nodes of a power network. Blocks
//! are placed and destroyed one at a time, so rescanning the world on every change
//! is wasteful. This crate keeps the grouping up to date incrementally.
//!
//! - Add square [`Block`]s of any size; touching clusters are merged.
//! - Remove blocks by origin; clusters that lose their connection are split.
//! - Look up the block and [`Cluster`] covering any cell.
//! - Receive [`ClusterEvent`]s (`New`, `Update`, `Remove`) through a [`Listener`].
//!
//! Two blocks are connected when they share at least part of an edge, or overlap.
//! Touching only at a corner does not connect them.
//!
//! # Example
//!
//! ```rust
//! use imperium_cluster::{Block, Cluster, ClusterEvent, ClusterManager};
//!
//! let mut events = Vec::new();
//! let mut manager = ClusterManager::with_callback(|cluster: &Cluster<char>, event| {
//!     events.push(event);
//!     assert!(!cluster.is_empty());
//! });
//!
//! manager.add_element(Block::new(0, 0, 2, 'c')).unwrap();
//! manager.add_element(Block::new(4, 0, 1, 'n')).unwrap();
//! assert_eq!(manager.len(), 2);
//!
//! // A block touching both clusters merges them.
//! manager.add_element(Block::new(2, 0, 2, 'b')).unwrap();
//! assert_eq!(manager.len(), 1);
//!
//! let (cluster, block) = manager.get_element(3, 1).unwrap();
//! assert_eq!(*block.data(), 'b');
//! assert_eq!((cluster.x(), cluster.y(), cluster.w(), cluster.h()), (0, 0, 5, 2));
//!
//! // Removing it splits them again.
//! let removed = manager.remove_element(2, 0).unwrap();
//! assert_eq!(removed.into_data(), 'b');
//! assert_eq!(manager.len(), 2);
//!
//! drop(manager);
//! assert_eq!(
//!     events[events.len() - 3..],
//!     [ClusterEvent::Remove, ClusterEvent::New, ClusterEvent::New]
//! );
//! ```
//!
//! Placing a block over a tracked one is rejected and leaves the manager untouched:
//!
//! ```rust
//! use imperium_cluster::{Block, ClusterManager};
//!
//! let mut manager = ClusterManager::new();
//! manager.add_element(Block::new(0, 0, 3, ())).unwrap();
//! let err = manager.add_element(Block::new(2, 2, 1, ())).unwrap_err();
//! assert_eq!(err.cluster.width(), 3);
//! assert_eq!(manager.block_count(), 1);
//! ```
//!
//! ## Listeners
//!
//! Any `FnMut(&Cluster<T>, ClusterEvent)` is a [`Listener`]. [`ClusterQueue`] batches
//! snapshots of changed clusters for deferred processing, and [`ClusterRegistry`] keeps
//! one manager per team, each with its own listener.
//!
//! Events are delivered synchronously. A cluster's identity does not survive a merge
//! or a split: the old clusters are reported as `Remove` and the results as `New`.
//!
//! ## Features
//!
//! - `std` (default): use the standard library in dependencies.
//! - `kurbo`: convert footprints and cluster outlines to `kurbo::Rect`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod cluster;
pub mod error;
pub mod manager;
pub mod queue;
pub mod registry;
pub mod types;

pub use cluster::Cluster;
pub use error::OccupiedPositionError;
pub use manager::{ClusterEvent, ClusterManager, Listener, NoopListener};
pub use queue::{ClusterQueue, EventMask};
pub use registry::ClusterRegistry;
pub use types::{Block, Footprint};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn power_network_scenario() {
        // Two generators wired through a line of nodes, then the line is cut.
        let mut manager: ClusterManager<&str, ClusterQueue<&str>> =
            ClusterManager::with_listener(ClusterQueue::new());
        manager.add_element(Block::new(0, 0, 2, "generator")).unwrap();
        manager.add_element(Block::new(6, 0, 2, "generator")).unwrap();
        for x in 2..6 {
            manager.add_element(Block::new(x, 0, 1, "node")).unwrap();
        }
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.block_count(), 6);

        let pending: Vec<_> = manager.listener_mut().drain().collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].bounds(), Footprint::new(0, 0, 8, 2));

        manager.remove_element(3, 0);
        assert_eq!(manager.len(), 2);
        let sizes: Vec<_> = manager.clusters().iter().map(Cluster::len).collect();
        assert_eq!(sizes, [2, 3]);
        let mut queued: Vec<_> = manager.listener().pending().map(|c| c.bounds()).collect();
        queued.sort_by_key(|f| f.min_x);
        assert_eq!(
            queued,
            [Footprint::new(0, 0, 3, 2), Footprint::new(4, 0, 8, 2)]
        );
    }
}
