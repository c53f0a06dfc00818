//! Privacy-group identity resolution and lifecycle pass-throughs.

use std::sync::Arc;

use shared_types::{ParticipantKey, PrivacyGroup, PrivacyGroupId, PrivacyGroupType};

use crate::domain::errors::PrivacyError;
use crate::ports::outbound::ConfidentialStore;

/// Resolves privacy-group identity against the confidential store.
///
/// Group lifecycle calls (create/delete/find) pass through with no local
/// logic beyond parameter shaping; the one piece of real logic here is
/// legacy-group disambiguation.
#[derive(Clone)]
pub struct GroupResolver {
    store: Arc<dyn ConfidentialStore>,
    participant_key: ParticipantKey,
}

impl GroupResolver {
    /// Creates a resolver using `participant_key` as the requesting
    /// identity for lifecycle calls.
    pub fn new(store: Arc<dyn ConfidentialStore>, participant_key: ParticipantKey) -> Self {
        Self {
            store,
            participant_key,
        }
    }

    /// Resolves the legacy group for the member set
    /// `{private_from} ∪ private_for`.
    ///
    /// Zero matches is a legal state (`None`): the group simply does not
    /// exist yet. More than one match violates the store's at-most-one
    /// guarantee per exact member set and fails loudly; an arbitrary match
    /// is never picked.
    pub fn resolve_legacy_group(
        &self,
        private_from: &ParticipantKey,
        private_for: &[ParticipantKey],
    ) -> Result<Option<PrivacyGroup>, PrivacyError> {
        let mut members = Vec::with_capacity(private_for.len() + 1);
        members.push(private_from.clone());
        members.extend_from_slice(private_for);

        let matching = self
            .store
            .find_groups(&members)
            .map_err(|source| PrivacyError::Store {
                operation: "find groups",
                source,
            })?;

        let legacy: Vec<PrivacyGroup> = matching
            .into_iter()
            .filter(|group| group.group_type == PrivacyGroupType::Legacy)
            .collect();

        if legacy.len() > 1 {
            return Err(PrivacyError::AmbiguousLegacyGroup {
                found: legacy.len(),
                members,
            });
        }
        Ok(legacy.into_iter().next())
    }

    /// Creates an explicit (Pantheon) privacy group.
    pub fn create_group(
        &self,
        members: &[ParticipantKey],
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, PrivacyError> {
        self.store
            .create_group(members, &self.participant_key, name, description)
            .map_err(|source| PrivacyError::Store {
                operation: "create group",
                source,
            })
    }

    /// Deletes a privacy group; returns the store's confirmation id.
    pub fn delete_group(&self, group_id: &PrivacyGroupId) -> Result<String, PrivacyError> {
        self.store
            .delete_group(group_id, &self.participant_key)
            .map_err(|source| PrivacyError::Store {
                operation: "delete group",
                source,
            })
    }

    /// Finds the groups whose member set matches `members` exactly.
    pub fn find_groups(
        &self,
        members: &[ParticipantKey],
    ) -> Result<Vec<PrivacyGroup>, PrivacyError> {
        self.store
            .find_groups(members)
            .map_err(|source| PrivacyError::Store {
                operation: "find groups",
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockConfidentialStore;

    fn key(name: &str) -> ParticipantKey {
        ParticipantKey::new(name.as_bytes().to_vec())
    }

    fn legacy_group(id: &str, members: Vec<ParticipantKey>) -> PrivacyGroup {
        PrivacyGroup {
            id: PrivacyGroupId::new(id.as_bytes().to_vec()),
            group_type: PrivacyGroupType::Legacy,
            members,
            name: None,
            description: None,
        }
    }

    fn pantheon_group(id: &str, members: Vec<ParticipantKey>) -> PrivacyGroup {
        PrivacyGroup {
            id: PrivacyGroupId::new(id.as_bytes().to_vec()),
            group_type: PrivacyGroupType::Pantheon,
            members,
            name: Some("named".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_zero_matches_resolves_to_none() {
        let store = Arc::new(MockConfidentialStore::new());
        let resolver = GroupResolver::new(store, key("node"));

        let resolved = resolver
            .resolve_legacy_group(&key("a"), &[key("b")])
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_single_legacy_match_is_returned() {
        let members = vec![key("a"), key("b")];
        let store = Arc::new(
            MockConfidentialStore::new().with_groups(vec![legacy_group("L1", members.clone())]),
        );
        let resolver = GroupResolver::new(store, key("node"));

        let resolved = resolver
            .resolve_legacy_group(&key("a"), &[key("b")])
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, PrivacyGroupId::new(b"L1".to_vec()));
    }

    #[test]
    fn test_pantheon_matches_are_filtered_out() {
        let members = vec![key("a"), key("b")];
        let store = Arc::new(
            MockConfidentialStore::new().with_groups(vec![pantheon_group("P1", members.clone())]),
        );
        let resolver = GroupResolver::new(store, key("node"));

        let resolved = resolver
            .resolve_legacy_group(&key("a"), &[key("b")])
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_two_legacy_matches_violate_invariant() {
        let members = vec![key("a"), key("b")];
        let store = Arc::new(MockConfidentialStore::new().with_groups(vec![
            legacy_group("L1", members.clone()),
            legacy_group("L2", members.clone()),
        ]));
        let resolver = GroupResolver::new(store, key("node"));

        let err = resolver
            .resolve_legacy_group(&key("a"), &[key("b")])
            .unwrap_err();
        assert!(matches!(
            err,
            PrivacyError::AmbiguousLegacyGroup { found: 2, .. }
        ));
    }

    #[test]
    fn test_query_members_are_from_then_recipients() {
        let store = Arc::new(MockConfidentialStore::new());
        let resolver = GroupResolver::new(store.clone(), key("node"));

        resolver
            .resolve_legacy_group(&key("a"), &[key("b"), key("c")])
            .unwrap();

        let calls = store.find_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![key("a"), key("b"), key("c")]);
    }
}
