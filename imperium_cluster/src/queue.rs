// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A listener that batches cluster snapshots for deferred processing.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;

use crate::cluster::Cluster;
use crate::manager::{ClusterEvent, Listener};

bitflags::bitflags! {
    /// Set of [`ClusterEvent`] kinds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        /// [`ClusterEvent::New`]
        const NEW    = 0b0000_0001;
        /// [`ClusterEvent::Update`]
        const UPDATE = 0b0000_0010;
        /// [`ClusterEvent::Remove`]
        const REMOVE = 0b0000_0100;
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::NEW | Self::UPDATE
    }
}

impl From<ClusterEvent> for EventMask {
    fn from(event: ClusterEvent) -> Self {
        match event {
            ClusterEvent::New => Self::NEW,
            ClusterEvent::Update => Self::UPDATE,
            ClusterEvent::Remove => Self::REMOVE,
        }
    }
}

type Filter<T> = Box<dyn FnMut(&Cluster<T>) -> bool>;

#[derive(Clone, Debug)]
struct Pending<T> {
    cluster: Cluster<T>,
    due: u64,
}

/// Keeps the latest snapshot of every changed cluster until it is drained.
///
/// Pending snapshots are keyed by cluster origin: any event for a cluster at the
/// same origin replaces the queued snapshot, so a cluster that keeps growing is
/// only processed once, and a cluster that is removed before being drained is
/// dropped from the queue.
///
/// The queue has no clock of its own. Callers advance it with
/// [`advance_to`](Self::advance_to) in whatever unit they tick in, and
/// [`drain_due`](Self::drain_due) only yields snapshots that went
/// [`delay`](Self::with_delay) ticks without changing.
pub struct ClusterQueue<T> {
    // Sorted by `due`: the clock never goes back and the delay is fixed.
    pending: VecDeque<Pending<T>>,
    mask: EventMask,
    filter: Option<Filter<T>>,
    delay: u64,
    now: u64,
}

impl<T> ClusterQueue<T> {
    /// Queue snapshots of new and updated clusters.
    pub fn new() -> Self {
        Self::with_mask(EventMask::default())
    }

    /// Queue snapshots for the given event kinds.
    pub fn with_mask(mask: EventMask) -> Self {
        Self {
            pending: VecDeque::new(),
            mask,
            filter: None,
            delay: 0,
            now: 0,
        }
    }

    /// Hold each snapshot for `delay` ticks after the last change to its cluster.
    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    /// Only queue clusters accepted by `filter`.
    pub fn with_filter(mut self, filter: impl FnMut(&Cluster<T>) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Event kinds that enqueue a snapshot.
    pub fn mask(&self) -> EventMask {
        self.mask
    }

    /// Ticks a snapshot waits before [`drain_due`](Self::drain_due) yields it.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward to `now`. Earlier ticks are ignored.
    pub fn advance_to(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Number of pending snapshots that are due.
    pub fn ready(&self) -> usize {
        self.pending.iter().take_while(|p| p.due <= self.now).count()
    }

    /// Number of pending snapshots.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending snapshots, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Cluster<T>> + '_ {
        self.pending.iter().map(|p| &p.cluster)
    }

    /// Take every pending snapshot, due or not, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Cluster<T>> + '_ {
        self.pending.drain(..).map(|p| p.cluster)
    }

    /// Take the snapshots whose delay has elapsed, oldest first.
    pub fn drain_due(&mut self) -> impl Iterator<Item = Cluster<T>> + '_ {
        let ready = self.ready();
        self.pending.drain(..ready).map(|p| p.cluster)
    }
}

impl<T> Default for ClusterQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ClusterQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterQueue")
            .field("pending", &self.pending.len())
            .field("mask", &self.mask)
            .field("filtered", &self.filter.is_some())
            .field("delay", &self.delay)
            .field("now", &self.now)
            .finish()
    }
}

impl<T: Clone> Listener<T> for ClusterQueue<T> {
    fn on_cluster_event(&mut self, cluster: &Cluster<T>, event: ClusterEvent) {
        let before = self.pending.len();
        self.pending
            .retain(|p| (p.cluster.x(), p.cluster.y()) != (cluster.x(), cluster.y()));
        if self.pending.len() != before {
            tracing::trace!(x = cluster.x(), y = cluster.y(), ?event, "dropped queued snapshot");
        }

        if !self.mask.contains(EventMask::from(event)) {
            return;
        }
        if let Some(filter) = self.filter.as_mut()
            && !filter(cluster)
        {
            tracing::trace!(x = cluster.x(), y = cluster.y(), "cluster rejected by filter");
            return;
        }
        self.pending.push_back(Pending {
            cluster: cluster.clone(),
            due: self.now.saturating_add(self.delay),
        });
    }
}
