//! # Runtime Simulation Tests
//!
//! End-to-end tests that walk the wired privacy subsystem through the life
//! of a privacy group, the way an embedding node would drive it:
//!
//! 1. **Pantheon lifecycle**: create → submit → validate → anchor → delete
//! 2. **Nonce progression**: private state advances between submissions
//! 3. **Legacy coexistence**: ad-hoc and explicit groups over one member set

#[cfg(test)]
mod tests {
    use crate::flows::wire_privacy_subsystem;
    use shared_types::{
        AccountState, CallParameters, ParticipantKey, PrivateTransaction, StateRoot,
    };
    use vc_privacy::adapters::BincodePayloadEncoder;
    use vc_privacy::ports::inbound::PrivacyApi;
    use vc_privacy::ports::outbound::{InvalidTransactionReason, ValidationResult};

    fn key(name: &str) -> ParticipantKey {
        ParticipantKey::new(name.as_bytes().to_vec())
    }

    #[test]
    fn test_pantheon_group_full_lifecycle() {
        let h = wire_privacy_subsystem();
        let sender = [0xAA; 20];

        // the node creates a named group with one counterparty
        let group = h
            .service
            .create_privacy_group(
                &[key("counterparty")],
                Some("settlement".to_string()),
                Some("bilateral settlement group".to_string()),
            )
            .unwrap();
        assert!(group.members.contains(&h.node_key));

        // first transaction in a fresh group carries the default nonce
        let tx = PrivateTransaction::group_addressed(sender, 0, vec![0x01], group.id.clone());
        let verdict = h.service.validate_transaction(&tx, &group.id).unwrap();
        assert_eq!(verdict, ValidationResult::Valid);

        let receipt = h.service.submit_transaction(&tx).unwrap();
        assert_eq!(receipt.privacy_group_id, group.id);

        // the stored payload decodes back to the submitted transaction
        let envelope = h.service.retrieve_transaction(&receipt.store_key).unwrap();
        assert_eq!(BincodePayloadEncoder::decode(&envelope.payload).unwrap(), tx);

        // the marker anchors the store key on the public chain
        let marker = h.service.create_marker_transaction(&receipt.store_key, &tx);
        assert!(!marker.payload.is_empty());

        // simulation passes through with the group context
        let simulated = h
            .service
            .simulate_transaction(&group.id, &CallParameters::default(), 1)
            .unwrap();
        assert!(simulated.is_some_and(|r| r.successful));

        // deletion confirms with the group id
        let confirmation = h.service.delete_privacy_group(&group.id).unwrap();
        assert_eq!(confirmation, group.id.to_base64());
        assert!(h
            .service
            .find_privacy_groups(&group.members)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_nonce_progression_across_state_advances() {
        let h = wire_privacy_subsystem();
        let sender = [0xAA; 20];
        let group = h
            .service
            .create_privacy_group(&[key("counterparty")], None, None)
            .unwrap();

        // submit with nonce 0, then the execution layer advances the
        // group's private state
        let tx0 = PrivateTransaction::group_addressed(sender, 0, vec![0x01], group.id.clone());
        h.service.submit_transaction(&tx0).unwrap();

        let root: StateRoot = [0x10; 32];
        h.group_state.set_latest_root(group.id.clone(), root).unwrap();
        h.world_state
            .put_account(
                root,
                sender,
                AccountState {
                    nonce: 1,
                    ..AccountState::default()
                },
            )
            .unwrap();

        assert_eq!(h.service.next_group_nonce(&sender, &group.id).unwrap(), 1);

        // replaying nonce 0 is now rejected with the resolved context
        let verdict = h.service.validate_transaction(&tx0, &group.id).unwrap();
        assert_eq!(
            verdict,
            ValidationResult::Invalid(InvalidTransactionReason::NonceTooLow {
                expected: 1,
                actual: 0,
            })
        );

        let tx1 = PrivateTransaction::group_addressed(sender, 1, vec![0x02], group.id.clone());
        assert_eq!(
            h.service.validate_transaction(&tx1, &group.id).unwrap(),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_legacy_and_pantheon_groups_coexist_per_member_set() {
        let h = wire_privacy_subsystem();
        let sender = [0xAA; 20];

        // ad-hoc traffic materializes a legacy group for {node, peer}
        let ad_hoc = PrivateTransaction::ad_hoc(
            sender,
            0,
            vec![0x01],
            h.node_key.clone(),
            vec![key("peer")],
        );
        let receipt = h.service.submit_transaction(&ad_hoc).unwrap();

        // an explicit group over the same member set is a separate identity
        let pantheon = h
            .service
            .create_privacy_group(&[key("peer")], Some("explicit".to_string()), None)
            .unwrap();
        assert_ne!(pantheon.id, receipt.privacy_group_id);

        // legacy resolution still sees exactly one legacy group
        let nonce = h
            .service
            .next_legacy_nonce(&h.node_key, &[key("peer")], &sender)
            .unwrap();
        assert_eq!(nonce, 0);
    }
}
