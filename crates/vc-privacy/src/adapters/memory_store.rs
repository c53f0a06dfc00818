//! In-memory confidential store.
//!
//! Models the store contract the coordination layer depends on: opaque
//! deterministic keys, membership-checked retrieval, and at most one legacy
//! group per exact member set (materialized on the first ad-hoc send).

use std::collections::HashMap;
use std::sync::RwLock;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use shared_types::{
    ParticipantKey, PrivacyGroup, PrivacyGroupId, PrivacyGroupType, StoreError, StoreKey,
    StoredEnvelope,
};

use crate::ports::outbound::{ConfidentialStore, StoreRecipients};

/// In-memory implementation of [`ConfidentialStore`] for testing and
/// runtime simulation.
pub struct InMemoryConfidentialStore {
    envelopes: RwLock<HashMap<StoreKey, StoredEnvelope>>,
    groups: RwLock<HashMap<PrivacyGroupId, PrivacyGroup>>,
}

impl InMemoryConfidentialStore {
    pub fn new() -> Self {
        Self {
            envelopes: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a group as-is, bypassing id derivation and deduplication.
    ///
    /// Test hook: lets scenarios seed states the public API refuses to
    /// produce, such as two legacy groups over one member set.
    pub fn seed_group(&self, group: PrivacyGroup) -> Result<(), StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::LockPoisoned)?;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    /// Key derivation: hash of payload, sender and resolved group, so one
    /// payload sent to two groups never collides.
    fn derive_store_key(
        payload: &[u8],
        sender_key: &ParticipantKey,
        group_id: &PrivacyGroupId,
    ) -> StoreKey {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hasher.update(sender_key.as_bytes());
        hasher.update(group_id.as_bytes());
        StoreKey::new(BASE64_STANDARD.encode(hasher.finalize()))
    }

    fn derive_group_id(tag: &str, members: &[ParticipantKey], name: Option<&str>) -> PrivacyGroupId {
        let mut sorted: Vec<&ParticipantKey> = members.iter().collect();
        sorted.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        sorted.dedup();

        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        for member in sorted {
            hasher.update(member.as_bytes());
        }
        if let Some(name) = name {
            hasher.update(name.as_bytes());
        }
        PrivacyGroupId::new(hasher.finalize().to_vec())
    }

    /// Returns the existing legacy group for `members`, or materializes one.
    fn legacy_group_for(&self, members: &[ParticipantKey]) -> Result<PrivacyGroup, StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::LockPoisoned)?;

        if let Some(existing) = groups
            .values()
            .find(|g| g.group_type == PrivacyGroupType::Legacy && g.matches_members(members))
        {
            return Ok(existing.clone());
        }

        let mut canonical = members.to_vec();
        canonical.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        canonical.dedup();

        let group = PrivacyGroup {
            id: Self::derive_group_id("legacy", &canonical, None),
            group_type: PrivacyGroupType::Legacy,
            members: canonical,
            name: None,
            description: None,
        };
        groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }
}

impl Default for InMemoryConfidentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidentialStore for InMemoryConfidentialStore {
    fn send(
        &self,
        payload: &[u8],
        sender_key: &ParticipantKey,
        recipients: &StoreRecipients,
    ) -> Result<StoreKey, StoreError> {
        let group_id = match recipients {
            StoreRecipients::Group(group_id) => {
                let groups = self.groups.read().map_err(|_| StoreError::LockPoisoned)?;
                let group = groups
                    .get(group_id)
                    .ok_or_else(|| StoreError::GroupNotFound(group_id.to_base64()))?;
                if !group.members.contains(sender_key) {
                    return Err(StoreError::NotAuthorized(sender_key.to_base64()));
                }
                group_id.clone()
            }
            StoreRecipients::Direct(recipient_keys) => {
                if recipient_keys.is_empty() {
                    return Err(StoreError::Rejected("empty recipient list".to_string()));
                }
                let mut members = recipient_keys.clone();
                members.push(sender_key.clone());
                self.legacy_group_for(&members)?.id
            }
        };

        let key = Self::derive_store_key(payload, sender_key, &group_id);
        let envelope = StoredEnvelope {
            payload: payload.to_vec(),
            sender_key: sender_key.clone(),
            privacy_group_id: group_id,
        };

        let mut envelopes = self
            .envelopes
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        envelopes.insert(key.clone(), envelope);
        Ok(key)
    }

    fn receive(
        &self,
        key: &StoreKey,
        requesting_key: &ParticipantKey,
    ) -> Result<StoredEnvelope, StoreError> {
        let envelopes = self.envelopes.read().map_err(|_| StoreError::LockPoisoned)?;
        let envelope = envelopes
            .get(key)
            .ok_or_else(|| StoreError::PayloadNotFound(key.as_str().to_string()))?;

        if envelope.sender_key != *requesting_key {
            let groups = self.groups.read().map_err(|_| StoreError::LockPoisoned)?;
            let authorized = groups
                .get(&envelope.privacy_group_id)
                .is_some_and(|g| g.members.contains(requesting_key));
            if !authorized {
                return Err(StoreError::NotAuthorized(requesting_key.to_base64()));
            }
        }

        Ok(envelope.clone())
    }

    fn create_group(
        &self,
        members: &[ParticipantKey],
        requesting_key: &ParticipantKey,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, StoreError> {
        // the creator is always a member
        let mut full_members = members.to_vec();
        if !full_members.contains(requesting_key) {
            full_members.push(requesting_key.clone());
        }

        let id = Self::derive_group_id("pantheon", &full_members, name.as_deref());
        let group = PrivacyGroup {
            id: id.clone(),
            group_type: PrivacyGroupType::Pantheon,
            members: full_members,
            name,
            description,
        };

        let mut groups = self.groups.write().map_err(|_| StoreError::LockPoisoned)?;
        if groups.contains_key(&id) {
            return Err(StoreError::Rejected("group already exists".to_string()));
        }
        groups.insert(id, group.clone());
        Ok(group)
    }

    fn delete_group(
        &self,
        group_id: &PrivacyGroupId,
        requesting_key: &ParticipantKey,
    ) -> Result<String, StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::LockPoisoned)?;
        let group = groups
            .get(group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_base64()))?;
        if !group.members.contains(requesting_key) {
            return Err(StoreError::NotAuthorized(requesting_key.to_base64()));
        }
        groups.remove(group_id);
        Ok(group_id.to_base64())
    }

    fn find_groups(&self, members: &[ParticipantKey]) -> Result<Vec<PrivacyGroup>, StoreError> {
        let groups = self.groups.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(groups
            .values()
            .filter(|g| g.matches_members(members))
            .cloned()
            .collect())
    }
}
