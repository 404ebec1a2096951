// Copyright 2025 the Imperium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One [`ClusterManager`] per key, typically per team.

use alloc::collections::BTreeMap;
use core::fmt;

use crate::error::OccupiedPositionError;
use crate::manager::{ClusterManager, Listener};

/// Lazily created cluster managers keyed by `K`.
///
/// Each manager gets its own listener built by the factory on first use.
pub struct ClusterRegistry<K, T, L, F> {
    managers: BTreeMap<K, ClusterManager<T, L>>,
    factory: F,
}

impl<K, T, L, F> ClusterRegistry<K, T, L, F>
where
    K: Ord,
    L: Listener<T>,
    F: FnMut(&K) -> L,
{
    /// Create an empty registry. `factory` builds the listener of each new manager.
    pub fn new(factory: F) -> Self {
        Self {
            managers: BTreeMap::new(),
            factory,
        }
    }

    /// The manager for `key`, if one was created.
    pub fn get(&self, key: &K) -> Option<&ClusterManager<T, L>> {
        self.managers.get(key)
    }

    /// Mutable access to the manager for `key`, if one was created.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut ClusterManager<T, L>> {
        self.managers.get_mut(key)
    }

    /// The manager for `key`, created on first use.
    pub fn entry(&mut self, key: K) -> &mut ClusterManager<T, L> {
        let factory = &mut self.factory;
        self.managers
            .entry(key)
            .or_insert_with_key(|k| ClusterManager::with_listener(factory(k)))
    }

    /// Move the block whose origin is `(x, y)` from the `from` manager to the `to` manager.
    ///
    /// Returns `Ok(false)` if `from` has no block starting there. If the block would
    /// overlap a block tracked by `to`, neither manager is touched.
    pub fn transfer(
        &mut self,
        from: &K,
        to: K,
        x: i32,
        y: i32,
    ) -> Result<bool, OccupiedPositionError> {
        let Some(footprint) = self
            .managers
            .get(from)
            .and_then(|m| m.get_element(x, y))
            .map(|(_, b)| b.footprint())
            .filter(|f| (f.x(), f.y()) == (x, y))
        else {
            return Ok(false);
        };
        if *from == to {
            return Ok(true);
        }
        if let Some(target) = self.managers.get(&to) {
            target.check_free(footprint).inspect_err(|_| {
                tracing::debug!(%footprint, "transfer rejected by target");
            })?;
        }

        let Some(block) = self
            .managers
            .get_mut(from)
            .and_then(|m| m.remove_element(x, y))
        else {
            return Ok(false);
        };
        self.entry(to).add_element(block)?;
        Ok(true)
    }

    /// Drop the manager for `key`, returning it.
    pub fn remove(&mut self, key: &K) -> Option<ClusterManager<T, L>> {
        self.managers.remove(key)
    }

    /// Drop every manager, without emitting events.
    pub fn clear(&mut self) {
        self.managers.clear();
    }

    /// Managers in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &ClusterManager<T, L>)> + '_ {
        self.managers.iter()
    }

    /// Number of managers.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// True if no manager was created.
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl<K: fmt::Debug, T, L, F> fmt::Debug for ClusterRegistry<K, T, L, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterRegistry")
            .field("keys", &self.managers.keys().collect::<alloc::vec::Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Block, Cluster, ClusterQueue, NoopListener};
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Team {
        Sharded,
        Crux,
    }

    fn registry() -> ClusterRegistry<Team, (), NoopListener, impl FnMut(&Team) -> NoopListener> {
        ClusterRegistry::new(|_: &Team| NoopListener)
    }

    #[test]
    fn managers_are_created_on_first_use() {
        let mut teams = registry();
        assert!(teams.get(&Team::Sharded).is_none());
        teams.entry(Team::Sharded).add_element(Block::new(0, 0, 3, ())).unwrap();
        teams.entry(Team::Crux).add_element(Block::new(0, 0, 3, ())).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams.get(&Team::Sharded).map(ClusterManager::len), Some(1));
        let keys: Vec<_> = teams.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [Team::Sharded, Team::Crux]);

        teams.clear();
        assert!(teams.is_empty());
    }

    #[test]
    fn transfer_moves_the_block() {
        let mut teams = registry();
        teams.entry(Team::Sharded).add_element(Block::new(4, 4, 2, ())).unwrap();

        assert_eq!(teams.transfer(&Team::Sharded, Team::Crux, 4, 4), Ok(true));
        assert_eq!(teams.get(&Team::Sharded).map(ClusterManager::len), Some(0));
        assert!(teams.get(&Team::Crux).and_then(|m| m.get_element(5, 5)).is_some());

        assert_eq!(teams.transfer(&Team::Sharded, Team::Crux, 4, 4), Ok(false));
    }

    #[test]
    fn rejected_transfer_touches_neither_manager() {
        let mut teams = registry();
        teams.entry(Team::Sharded).add_element(Block::new(0, 0, 2, ())).unwrap();
        teams.entry(Team::Crux).add_element(Block::new(1, 1, 1, ())).unwrap();

        let err = teams.transfer(&Team::Sharded, Team::Crux, 0, 0).unwrap_err();
        assert_eq!(err.occupant, crate::Footprint::from_xywh(1, 1, 1, 1));
        assert!(teams.get(&Team::Sharded).and_then(|m| m.get_element(0, 0)).is_some());
        assert_eq!(teams.get(&Team::Crux).map(ClusterManager::block_count), Some(1));
    }

    #[test]
    fn each_manager_gets_its_own_listener() {
        let mut teams = ClusterRegistry::new(|_: &Team| ClusterQueue::<()>::new());
        teams.entry(Team::Crux).add_element(Block::new(0, 0, 1, ())).unwrap();
        teams.entry(Team::Sharded).add_element(Block::new(3, 3, 1, ())).unwrap();
        teams.entry(Team::Sharded).add_element(Block::new(3, 4, 1, ())).unwrap();

        for (team, expected) in [(Team::Crux, vec![1]), (Team::Sharded, vec![2])] {
            let pending: Vec<usize> = teams
                .get(&team)
                .map(|m| m.listener().pending().map(Cluster::len).collect())
                .unwrap_or_default();
            assert_eq!(pending, expected, "{team:?}");
        }
    }
}
