// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cluster outlines.
//!
//! Build a power network, cut it, and compute the overlay rectangles a client
//! would draw around each cluster.
//!
//! Run:
//! - `cargo run -p imperium_demos --example cluster_outlines`

use clap::Parser;
use imperium_cluster::{Block, Cluster, ClusterEvent, ClusterManager};
use imperium_demos::DemoArgs;
use kurbo::Rect;

/// Tile size in world units.
const TILE: f64 = 8.0;

fn main() {
    imperium_demos::init_logging(&DemoArgs::parse());

    let mut dirty: Vec<Rect> = Vec::new();
    let mut network = ClusterManager::with_callback(|cluster: &Cluster<u32>, event: ClusterEvent| {
        tracing::debug!(?event, x = cluster.x(), y = cluster.y(), "network changed");
        dirty.push(cluster.outline());
    });

    // Two batteries joined by a diode line.
    network.add_element(Block::new(0, 0, 2, 1000)).unwrap();
    network.add_element(Block::new(7, 0, 2, 1000)).unwrap();
    for x in 2..7 {
        network.add_element(Block::new(x, 0, 1, 0)).unwrap();
    }
    network.remove_element(4, 0);

    for cluster in network.clusters() {
        let capacity: u32 = cluster.blocks().iter().map(|b| *b.data()).sum();
        let outline = cluster.outline().scale_from_origin(TILE).inflate(1.0, 1.0);
        println!("network {outline:?} stores {capacity}");
    }
    drop(network);

    let damage = dirty.iter().copied().reduce(|a, b| a.union(b));
    println!("{} events, redraw {:?}", dirty.len(), damage);
}
