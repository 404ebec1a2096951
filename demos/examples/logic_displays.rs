// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logic display walls.
//!
//! Players build walls of displays to draw images. Every wall that changes is
//! queued once, and a wall is only analyzed after it went unchanged for a few
//! server ticks.
//!
//! Run:
//! - `cargo run -p imperium_demos --example logic_displays -- --log-level debug`

use clap::Parser;
use imperium_cluster::{Block, Cluster, ClusterManager, ClusterQueue};
use imperium_demos::DemoArgs;
use tracing::info;

/// Ticks a wall must stay unchanged before it is analyzed.
const ANALYSIS_DELAY: u64 = 300;

#[derive(Clone, Debug)]
struct Display {
    author: &'static str,
}

fn main() {
    imperium_demos::init_logging(&DemoArgs::parse());

    // Lone displays are not worth analyzing.
    let queue = ClusterQueue::new()
        .with_delay(ANALYSIS_DELAY)
        .with_filter(|wall: &Cluster<Display>| wall.len() >= 4);
    let mut displays = ClusterManager::with_listener(queue);

    // Large logic displays are 6 tiles wide.
    for (x, y, author) in [
        (0, 0, "alice"),
        (6, 0, "alice"),
        (12, 0, "alice"),
        (0, 6, "bob"),
        (6, 6, "alice"),
        (12, 6, "bob"),
        (30, 30, "carol"),
    ] {
        displays
            .add_element(Block::new(x, y, 6, Display { author }))
            .expect("displays do not overlap");
    }
    info!(walls = displays.len(), queued = displays.listener().len(), "placed displays");

    // Bob tears his display down before the analysis tick.
    displays.listener_mut().advance_to(120);
    displays.remove_element(0, 6);

    displays.listener_mut().advance_to(ANALYSIS_DELAY);
    info!(ready = displays.listener().ready(), "first analysis tick");
    assert_eq!(displays.listener().ready(), 0, "the wall changed at tick 120");

    displays.listener_mut().advance_to(120 + ANALYSIS_DELAY);
    for wall in displays.listener_mut().drain_due() {
        let author = most_common_author(&wall);
        println!(
            "analyzing wall at ({}, {}) {}x{} with {} displays by {}",
            wall.x(),
            wall.y(),
            wall.w(),
            wall.h(),
            wall.len(),
            author.unwrap_or("nobody")
        );
    }
    assert!(displays.listener().is_empty());
}

fn most_common_author(wall: &Cluster<Display>) -> Option<&'static str> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for block in wall.blocks() {
        let author = block.data().author;
        match counts.iter_mut().find(|(a, _)| *a == author) {
            Some((_, n)) => *n += 1,
            None => counts.push((author, 1)),
        }
    }
    counts.into_iter().max_by_key(|(_, n)| *n).map(|(a, _)| a)
}
