//! In-memory group state storage and world-state archive.

use std::collections::HashMap;
use std::sync::RwLock;

use shared_types::{AccountState, Address, PrivacyGroupId, StateError, StateRoot};

use crate::ports::outbound::{GroupStateReader, WorldStateArchive, WorldStateView};

/// In-memory implementation of [`GroupStateReader`] for testing and
/// runtime simulation.
///
/// State advancement happens outside the coordination layer; simulations
/// drive it through [`InMemoryGroupState::set_latest_root`].
pub struct InMemoryGroupState {
    roots: RwLock<HashMap<PrivacyGroupId, StateRoot>>,
}

impl InMemoryGroupState {
    pub fn new() -> Self {
        Self {
            roots: RwLock::new(HashMap::new()),
        }
    }

    /// Records `root` as the group's latest state root.
    pub fn set_latest_root(
        &self,
        group_id: PrivacyGroupId,
        root: StateRoot,
    ) -> Result<(), StateError> {
        let mut roots = self.roots.write().map_err(|_| StateError::LockPoisoned)?;
        roots.insert(group_id, root);
        Ok(())
    }
}

impl Default for InMemoryGroupState {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStateReader for InMemoryGroupState {
    fn latest_state_root(
        &self,
        group_id: &PrivacyGroupId,
    ) -> Result<Option<StateRoot>, StateError> {
        let roots = self.roots.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(roots.get(group_id).copied())
    }
}

/// In-memory implementation of [`WorldStateArchive`] keyed by state root.
pub struct InMemoryWorldState {
    views: RwLock<HashMap<StateRoot, HashMap<Address, AccountState>>>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Records an account's state within the snapshot at `root`.
    pub fn put_account(
        &self,
        root: StateRoot,
        address: Address,
        account: AccountState,
    ) -> Result<(), StateError> {
        let mut views = self.views.write().map_err(|_| StateError::LockPoisoned)?;
        views.entry(root).or_default().insert(address, account);
        Ok(())
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloned snapshot of one root's account map.
struct SnapshotView {
    accounts: HashMap<Address, AccountState>,
}

impl WorldStateView for SnapshotView {
    fn account(&self, address: &Address) -> Option<AccountState> {
        self.accounts.get(address).cloned()
    }
}

impl WorldStateArchive for InMemoryWorldState {
    fn at_root(&self, root: &StateRoot) -> Result<Option<Box<dyn WorldStateView>>, StateError> {
        let views = self.views.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(views.get(root).map(|accounts| {
            Box::new(SnapshotView {
                accounts: accounts.clone(),
            }) as Box<dyn WorldStateView>
        }))
    }
}
