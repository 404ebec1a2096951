// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `ClusterManager` API: incremental merge and split of block clusters.

use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::cluster::Cluster;
use crate::error::OccupiedPositionError;
use crate::types::{Block, Footprint};

/// Lifecycle change reported to a [`Listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClusterEvent {
    /// A cluster was created, either from a lone block, a merge, or a split.
    New,
    /// A cluster gained or lost blocks without merging or splitting.
    Update,
    /// A cluster was destroyed. It is reported with its last published content.
    Remove,
}

/// Receives cluster lifecycle events.
///
/// Events are delivered synchronously from inside the mutating call. A single call
/// may emit several events; a merge of three clusters emits three
/// [`ClusterEvent::Remove`] followed by one [`ClusterEvent::New`].
pub trait Listener<T> {
    /// Called once per cluster created, updated or destroyed.
    fn on_cluster_event(&mut self, cluster: &Cluster<T>, event: ClusterEvent);
}

impl<T, F> Listener<T> for F
where
    F: FnMut(&Cluster<T>, ClusterEvent),
{
    fn on_cluster_event(&mut self, cluster: &Cluster<T>, event: ClusterEvent) {
        self(cluster, event);
    }
}

/// Listener that ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopListener;

impl<T> Listener<T> for NoopListener {
    fn on_cluster_event(&mut self, _cluster: &Cluster<T>, _event: ClusterEvent) {}
}

/// Tracks blocks on a grid and keeps them grouped into connected clusters.
///
/// Clusters are kept sorted by the `(x, y)` origin of their bounding box.
#[derive(Debug)]
pub struct ClusterManager<T, L = NoopListener> {
    clusters: Vec<Cluster<T>>,
    listener: L,
}

impl<T> ClusterManager<T, NoopListener> {
    /// Create an empty manager that discards events.
    pub fn new() -> Self {
        Self::with_listener(NoopListener)
    }
}

impl<T> Default for ClusterManager<T, NoopListener> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> ClusterManager<T, F>
where
    F: FnMut(&Cluster<T>, ClusterEvent),
{
    /// Create an empty manager reporting events to a closure.
    pub fn with_callback(callback: F) -> Self {
        Self::with_listener(callback)
    }
}

impl<T, L: Listener<T>> ClusterManager<T, L> {
    /// Create an empty manager reporting events to `listener`.
    pub fn with_listener(listener: L) -> Self {
        Self {
            clusters: Vec::new(),
            listener,
        }
    }

    /// Live clusters, sorted by bounding box origin.
    pub fn clusters(&self) -> &[Cluster<T>] {
        &self.clusters
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True if no block is tracked.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of tracked blocks across all clusters.
    pub fn block_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Every tracked block, cluster by cluster.
    pub fn blocks(&self) -> impl Iterator<Item = &Block<T>> + '_ {
        self.clusters.iter().flat_map(|c| c.blocks().iter())
    }

    /// The event listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the event listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Drop the manager and keep the listener.
    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Find the block covering `(x, y)` and the cluster that owns it.
    pub fn get_element(&self, x: i32, y: i32) -> Option<(&Cluster<T>, &Block<T>)> {
        self.clusters
            .iter()
            .find_map(|c| c.block_at(x, y).map(|b| (c, b)))
    }

    /// Position in [`clusters`](Self::clusters) of the cluster covering `(x, y)`.
    pub fn cluster_index_at(&self, x: i32, y: i32) -> Option<usize> {
        self.clusters
            .iter()
            .position(|c| c.block_at(x, y).is_some())
    }

    /// Whether a block with this footprint would be rejected.
    pub fn is_occupied(&self, footprint: Footprint) -> bool {
        self.find_occupant(footprint).is_some()
    }

    /// Fail with the same error [`add_element`](Self::add_element) would report if
    /// `footprint` overlaps a tracked block.
    pub fn check_free(&self, footprint: Footprint) -> Result<(), OccupiedPositionError> {
        match self.find_occupant(footprint) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// The tracked block and cluster an [`OccupiedPositionError`] reported, with payload.
    ///
    /// Returns `None` if the occupant was removed since the error was produced.
    pub fn occupant(&self, err: &OccupiedPositionError) -> Option<(&Cluster<T>, &Block<T>)> {
        self.get_element(err.occupant.x(), err.occupant.y())
            .filter(|(_, b)| b.footprint() == err.occupant)
    }

    /// Track a new block, merging every cluster it touches.
    ///
    /// Fails without side effects if the block overlaps a tracked block.
    pub fn add_element(&mut self, block: Block<T>) -> Result<(), OccupiedPositionError> {
        self.check_free(block.footprint())?;

        let candidates: Vec<usize> = self
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_adjacent_or_contains(&block))
            .map(|(i, _)| i)
            .collect();

        match candidates.as_slice() {
            [] => {
                trace!(x = block.x(), y = block.y(), "new cluster");
                let cluster = Cluster::from_blocks(alloc::vec![block]);
                self.listener.on_cluster_event(&cluster, ClusterEvent::New);
                self.clusters.push(cluster);
            }
            [i] => {
                let cluster = &mut self.clusters[*i];
                cluster.push(block);
                trace!(x = cluster.x(), y = cluster.y(), len = cluster.len(), "cluster grew");
                self.listener.on_cluster_event(cluster, ClusterEvent::Update);
            }
            _ => {
                debug!(
                    x = block.x(),
                    y = block.y(),
                    merged = candidates.len(),
                    "block bridges clusters"
                );
                let mut blocks = Vec::new();
                // Indices are ascending, so each earlier removal shifts the rest by one.
                for (shift, i) in candidates.iter().enumerate() {
                    let target = self.clusters.remove(i - shift);
                    self.listener.on_cluster_event(&target, ClusterEvent::Remove);
                    blocks.extend(target.into_blocks());
                }
                blocks.push(block);
                let cluster = Cluster::from_blocks(blocks);
                self.listener.on_cluster_event(&cluster, ClusterEvent::New);
                self.clusters.push(cluster);
            }
        }

        self.reorder();
        Ok(())
    }

    /// Stop tracking the block whose origin is exactly `(x, y)`, splitting its
    /// cluster if needed.
    ///
    /// Returns the removed block, or `None` if no block starts at `(x, y)`.
    pub fn remove_element(&mut self, x: i32, y: i32) -> Option<Block<T>> {
        let Some((c, b)) = self
            .clusters
            .iter()
            .enumerate()
            .find_map(|(i, cluster)| cluster.position_of(x, y).map(|b| (i, b)))
        else {
            trace!(x, y, "no block to remove");
            return None;
        };

        if self.clusters[c].len() == 1 {
            let mut cluster = self.clusters.remove(c);
            self.listener.on_cluster_event(&cluster, ClusterEvent::Remove);
            return Some(cluster.remove_block(b));
        }

        let components = components_without(self.clusters[c].blocks(), b);
        if components.len() == 1 {
            let cluster = &mut self.clusters[c];
            let block = cluster.remove_block(b);
            trace!(x = cluster.x(), y = cluster.y(), len = cluster.len(), "cluster shrank");
            self.listener.on_cluster_event(cluster, ClusterEvent::Update);
            self.reorder();
            return Some(block);
        }

        debug!(x, y, parts = components.len(), "block removal splits cluster");
        let old = self.clusters.remove(c);
        self.listener.on_cluster_event(&old, ClusterEvent::Remove);

        let mut slots: Vec<Option<Block<T>>> = old.into_blocks().into_iter().map(Some).collect();
        let removed = slots[b].take();
        for component in components {
            let blocks = component
                .into_iter()
                .filter_map(|i| slots[i].take())
                .collect();
            let cluster = Cluster::from_blocks(blocks);
            self.listener.on_cluster_event(&cluster, ClusterEvent::New);
            self.clusters.push(cluster);
        }

        self.reorder();
        removed
    }

    /// Track every block in order, stopping at the first rejection.
    ///
    /// Blocks before the rejected one stay tracked.
    pub fn add_all<I>(&mut self, blocks: I) -> Result<(), OccupiedPositionError>
    where
        I: IntoIterator<Item = Block<T>>,
    {
        for block in blocks {
            self.add_element(block)?;
        }
        Ok(())
    }

    /// Drop every cluster without emitting events.
    pub fn reset(&mut self) {
        self.clusters.clear();
    }

    /// Tear the manager down and return every tracked block, without emitting events.
    pub fn into_blocks(self) -> Vec<Block<T>> {
        self.clusters
            .into_iter()
            .flat_map(Cluster::into_blocks)
            .collect()
    }

    fn find_occupant(&self, footprint: Footprint) -> Option<OccupiedPositionError> {
        self.clusters
            .iter()
            .filter(|c| c.bounds().overlaps(&footprint))
            .find_map(|c| {
                c.blocks()
                    .iter()
                    .find(|b| b.footprint().overlaps(&footprint))
                    .map(|b| OccupiedPositionError {
                        occupant: b.footprint(),
                        cluster: c.bounds(),
                    })
            })
    }

    fn reorder(&mut self) {
        self.clusters.sort_by_key(|c| (c.x(), c.y()));
    }
}

/// Group `blocks`, minus the one at `skip`, into connected components.
///
/// Each component is a list of indices into `blocks`.
fn components_without<T>(blocks: &[Block<T>], skip: usize) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..blocks.len()).filter(|&i| i != skip).collect();
    let mut components = Vec::new();
    let mut stack = Vec::new();
    while let Some(seed) = remaining.pop() {
        let mut component = alloc::vec![seed];
        stack.push(seed);
        while let Some(current) = stack.pop() {
            let mut j = 0;
            while j < remaining.len() {
                let candidate = remaining[j];
                if blocks[current].is_adjacent_or_overlapping(&blocks[candidate]) {
                    remaining.swap_remove(j);
                    component.push(candidate);
                    stack.push(candidate);
                } else {
                    j += 1;
                }
            }
        }
        components.push(component);
    }
    components
}
