// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core clusters per team.
//!
//! Track the cores of two teams, capture one, and number the clusters the way
//! chat commands list them.
//!
//! Run:
//! - `cargo run -p imperium_demos --example core_clusters`
//! - `cargo run -p imperium_demos --example core_clusters -- --log-level debug`

use clap::Parser;
use imperium_cluster::{Block, Cluster, ClusterEvent, ClusterRegistry};
use imperium_demos::DemoArgs;
use tracing::{info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Team {
    Sharded,
    Crux,
}

fn main() {
    imperium_demos::init_logging(&DemoArgs::parse());

    let mut teams = ClusterRegistry::new(|team: &Team| {
        let team = *team;
        move |cluster: &Cluster<&'static str>, event: ClusterEvent| {
            info!(?team, ?event, x = cluster.x(), y = cluster.y(), cores = cluster.len(), "core cluster");
        }
    });

    // Shard, foundation and nucleus cores are 3, 4 and 5 tiles wide.
    let sharded = teams.entry(Team::Sharded);
    for (x, y, size, name) in [
        (10, 10, 3, "shard"),
        (13, 10, 4, "foundation"),
        (40, 40, 5, "nucleus"),
    ] {
        if let Err(err) = sharded.add_element(Block::new(x, y, size, name)) {
            warn!(%err, "core already tracked");
        }
    }
    let crux = teams.entry(Team::Crux);
    crux.add_element(Block::new(80, 80, 3, "shard")).unwrap();

    // A second registration of the same building is an upstream bug.
    if let Err(err) = teams.entry(Team::Crux).add_element(Block::new(80, 80, 3, "shard")) {
        warn!(%err, "duplicate core");
    }

    // Crux captures the lone nucleus.
    match teams.transfer(&Team::Sharded, Team::Crux, 40, 40) {
        Ok(true) => info!("nucleus captured"),
        Ok(false) => warn!("no core at (40, 40)"),
        Err(err) => warn!(%err, "capture rejected"),
    }

    for (team, manager) in teams.iter() {
        println!("{team:?}: found {} core clusters", manager.len());
        for (index, cluster) in manager.clusters().iter().enumerate() {
            let names: Vec<_> = cluster.blocks().iter().map(|b| *b.data()).collect();
            println!(
                "  #{} at ({}, {}) size {}x{}: {}",
                index + 1,
                cluster.x(),
                cluster.y(),
                cluster.w(),
                cluster.h(),
                names.join(", ")
            );
        }
    }

    let crux = teams.get(&Team::Crux).expect("crux has cores");
    let index = crux.cluster_index_at(42, 42).expect("nucleus is tracked");
    println!("The core cluster #{} at (40, 40) is under attack!", index + 1);
}
