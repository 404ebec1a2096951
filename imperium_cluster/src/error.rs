// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::types::Footprint;

/// Returned by [`ClusterManager::add_element`](crate::ClusterManager::add_element)
/// when the new block would overlap a block that is already tracked.
///
/// This always points at an upstream bug (a duplicate registration or a missed
/// removal); the manager is left untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("the position is occupied by the block {occupant} of the cluster {cluster}")]
pub struct OccupiedPositionError {
    /// Footprint of the tracked block in the way.
    pub occupant: Footprint,
    /// Bounding box of the cluster owning that block.
    pub cluster: Footprint,
}
