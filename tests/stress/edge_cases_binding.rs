//! Edge case tests for the identity binding core: malformed input,
//! boundaries, clock skew and session misuse.

use std::sync::Arc;

use agentmemory_identity::{
    deserialize_signed_memory, sign_memory_content, verify_memory_content, IdentityBinding,
    IdentityBindingConfig, IdentityError, IdentityId, ManualClock, MemoryKeyStore,
    MemoryMetadata, MemoryType, NewMemory, TrustPhase, VerificationFailure,
};

const HOUR: u64 = 3_600_000_000;
const START: u64 = 1_700_000_000_000_000;

fn clocked(config: IdentityBindingConfig) -> (IdentityBinding, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let binding =
        IdentityBinding::with_parts(config, Arc::new(MemoryKeyStore::new()), clock.clone())
            .expect("valid config");
    (binding, clock)
}

fn memory(key: &str) -> NewMemory {
    NewMemory::new(
        key,
        "edge content",
        MemoryMetadata::new(MemoryType::Preference, 100),
        "edge-vault",
    )
}

// ── Identities ───────────────────────────────────────────────────────────────

#[test]
fn edge_empty_and_unicode_names() {
    let binding = IdentityBinding::default();
    let empty = binding.create_identity("").unwrap();
    assert_eq!(empty.name, "");
    let unicode = binding.create_identity("エージェント 🤖").unwrap();
    assert_eq!(unicode.name, "エージェント 🤖");
    assert_ne!(empty.id, unicode.id);
}

#[test]
fn edge_import_rejects_wrong_length_secret() {
    let binding = IdentityBinding::default();
    for len in [0usize, 16, 33, 63, 65] {
        assert!(
            matches!(
                binding.import_identity("bad", &vec![7u8; len]),
                Err(IdentityError::InvalidKey(_))
            ),
            "length {len} should be rejected"
        );
    }
    assert!(binding.get_all_identities().is_empty());
}

#[test]
fn edge_import_rejects_inconsistent_keypair_bytes() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("source").unwrap();
    let export = binding.export_identity(&identity.id).unwrap();
    let mut secret = export.secret_key_bytes().unwrap();
    // Public half no longer matches the seed.
    secret[40] ^= 0xFF;
    assert!(binding.import_identity("tampered", &secret).is_err());
}

#[test]
fn edge_rotate_unknown_identity() {
    let binding = IdentityBinding::default();
    assert!(matches!(
        binding.rotate_keys(&IdentityId::from("aid_missing")),
        Err(IdentityError::NotFound(_))
    ));
}

// ── Signing ──────────────────────────────────────────────────────────────────

#[test]
fn edge_importance_bounds() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();

    let at_max = binding.sign_memory(&identity.id, &memory("max")).unwrap();
    assert!(binding.verify_memory(&at_max).valid);

    let too_high = NewMemory::new(
        "over",
        "c",
        MemoryMetadata::new(MemoryType::Task, 101),
        "v",
    );
    assert!(matches!(
        binding.sign_memory(&identity.id, &too_high),
        Err(IdentityError::InvalidMetadata(_))
    ));
}

#[test]
fn edge_tag_order_is_signed() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let metadata = MemoryMetadata::new(MemoryType::Learning, 1)
        .tag("first")
        .tag(2i64);
    let mut signed = binding
        .sign_memory(&identity.id, &NewMemory::new("k", "c", metadata, "v"))
        .unwrap();
    assert!(binding.verify_memory(&signed).valid);

    signed.metadata.tags.reverse();
    let result = binding.verify_memory(&signed);
    assert_eq!(result.error, Some(VerificationFailure::InvalidSignature));
}

#[test]
fn edge_text_tag_differs_from_number_tag() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let mut signed = binding
        .sign_memory(
            &identity.id,
            &NewMemory::new(
                "k",
                "c",
                MemoryMetadata::new(MemoryType::Learning, 1).tag(7i64),
                "v",
            ),
        )
        .unwrap();
    signed.metadata.tags = vec!["7".into()];
    assert!(!binding.verify_memory(&signed).valid);
}

#[test]
fn edge_field_boundaries_do_not_collide() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let mut signed = binding
        .sign_memory(
            &identity.id,
            &NewMemory::new("ab", "c", MemoryMetadata::new(MemoryType::Task, 1), "cd"),
        )
        .unwrap();
    // Shift one character across the key/vault boundary.
    signed.key = "abc".into();
    signed.vault = "d".into();
    assert!(!binding.verify_memory(&signed).valid);
}

// ── Verification ─────────────────────────────────────────────────────────────

#[test]
fn edge_corrupted_signature_bytes() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let mut signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    signed.signature.signature = [0u8; 64];
    let result = binding.verify_memory(&signed);
    assert!(!result.valid);
    assert_eq!(result.error, Some(VerificationFailure::InvalidSignature));
    assert_eq!(
        result.error_message().as_deref(),
        Some("Invalid signature")
    );
}

#[test]
fn edge_swapped_public_key() {
    let binding = IdentityBinding::default();
    let a = binding.create_identity("a").unwrap();
    let b = binding.create_identity("b").unwrap();
    let mut signed = binding.sign_memory(&a.id, &memory("k")).unwrap();
    signed.signature.public_key = b.signing_public_key;
    assert_eq!(
        binding.verify_memory(&signed).error,
        Some(VerificationFailure::InvalidSignature)
    );
}

#[test]
fn edge_expiry_boundary_is_inclusive() {
    let (binding, clock) =
        clocked(IdentityBindingConfig::default().with_signature_expiry_hours(24));
    let identity = binding.create_identity("a").unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();

    clock.set_micros(START + 24 * HOUR);
    let at_limit = binding.verify_memory(&signed);
    assert!(at_limit.valid);
    assert_eq!(at_limit.signature_age, Some(24 * HOUR));

    clock.set_micros(START + 25 * HOUR);
    let expired = binding.verify_memory(&signed);
    assert!(!expired.valid);
    assert_eq!(expired.error, Some(VerificationFailure::ExpiredSignature));
    assert_eq!(expired.signature_age, Some(25 * HOUR));
    assert_eq!(
        expired.error_message().as_deref(),
        Some("Signature has expired")
    );
}

#[test]
fn edge_zero_expiry_never_expires() {
    let (binding, clock) = clocked(IdentityBindingConfig::default());
    let identity = binding.create_identity("a").unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    clock.advance_hours(24 * 365 * 10);
    assert!(binding.verify_memory(&signed).valid);
}

#[test]
fn edge_future_dated_signature_has_zero_age() {
    let (binding, clock) =
        clocked(IdentityBindingConfig::default().with_signature_expiry_hours(1));
    let identity = binding.create_identity("a").unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();

    clock.set_micros(START - 10 * HOUR);
    let result = binding.verify_memory(&signed);
    assert!(result.valid);
    assert_eq!(result.signature_age, Some(0));
    assert_eq!(result.signed_at, Some(START));
}

#[test]
fn edge_tampered_and_expired_reports_tampering() {
    let (binding, clock) =
        clocked(IdentityBindingConfig::default().with_signature_expiry_hours(1));
    let identity = binding.create_identity("a").unwrap();
    let mut signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    signed.content_size += 1;
    clock.advance_hours(5);
    assert_eq!(
        binding.verify_memory(&signed).error,
        Some(VerificationFailure::InvalidSignature)
    );
}

#[test]
fn edge_verification_needs_no_registry() {
    let signer = IdentityBinding::default();
    let identity = signer.create_identity("a").unwrap();
    let signed = signer.sign_memory(&identity.id, &memory("k")).unwrap();

    let stranger = IdentityBinding::default();
    let result = stranger.verify_memory(&signed);
    assert!(result.valid);
    assert_eq!(result.agent_id, Some(identity.id));
}

#[test]
fn edge_batch_verify_mixed() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let signed: Vec<_> = binding
        .batch_sign_memories(&identity.id, &[memory("a"), memory("b"), memory("c")])
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    let mut records = signed.clone();
    records[1].vault = "elsewhere".into();

    let results = binding.batch_verify_memories(&records);
    assert_eq!(results.len(), 3);
    assert!(results[0].valid);
    assert!(!results[1].valid);
    assert!(results[2].valid);
    assert!(binding.batch_verify_memories(&[]).is_empty());
}

#[test]
fn edge_batch_sign_reports_per_item() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let bad = NewMemory::new("bad", "c", MemoryMetadata::new(MemoryType::Task, 200), "v");
    let results = binding.batch_sign_memories(&identity.id, &[memory("ok"), bad, memory("ok2")]);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(IdentityError::InvalidMetadata(_))));
    assert!(results[2].is_ok());
}

// ── Codec ────────────────────────────────────────────────────────────────────

#[test]
fn edge_deserialize_garbage() {
    assert!(matches!(
        deserialize_signed_memory("not json"),
        Err(IdentityError::SerializationError(_))
    ));
    assert!(deserialize_signed_memory("{}").is_err());
}

#[test]
fn edge_deserialize_short_signature() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    let mut json: serde_json::Value =
        serde_json::from_str(&agentmemory_identity::serialize_signed_memory(&signed).unwrap())
            .unwrap();
    json["signature"]["signature"] = serde_json::Value::String("AAAA".into());
    assert!(deserialize_signed_memory(&json.to_string()).is_err());
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[test]
fn edge_duplicate_session_id() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    binding
        .init_cross_session(&identity.id, Some("s".into()))
        .unwrap();
    assert!(matches!(
        binding.init_cross_session(&identity.id, Some("s".into())),
        Err(IdentityError::SessionExists(_))
    ));
    assert_eq!(binding.session_count(), 1);
}

#[test]
fn edge_generated_session_ids_unique() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let a = binding.init_cross_session(&identity.id, None).unwrap();
    let b = binding.init_cross_session(&identity.id, None).unwrap();
    assert_ne!(a.session_id, b.session_id);
    assert!(a.session_id.starts_with("session_"));
}

#[test]
fn edge_threshold_one_and_sticky_trust() {
    let (binding, clock) = clocked(IdentityBindingConfig::default().with_trust_threshold(1));
    let identity = binding.create_identity("a").unwrap();
    let session = binding.init_cross_session(&identity.id, None).unwrap();
    assert_eq!(session.phase(), TrustPhase::Initialized);

    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    clock.advance_micros(5);
    assert!(binding
        .verify_in_session(&session.session_id, &signed)
        .unwrap()
        .valid);
    let state = binding.get_session_state(&session.session_id).unwrap();
    assert!(state.trust_established);
    assert_eq!(state.phase(), TrustPhase::Trusted);
    assert_eq!(state.last_verified_at, START + 5);

    // Failures after trust do not revoke it.
    let mut tampered = signed.clone();
    tampered.key = "other".into();
    assert!(!binding
        .verify_in_session(&session.session_id, &tampered)
        .unwrap()
        .valid);
    assert!(binding.is_trust_established(&session.session_id));
}

#[test]
fn edge_same_memory_counts_each_time() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let session = binding.init_cross_session(&identity.id, None).unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    for _ in 0..3 {
        binding.verify_in_session(&session.session_id, &signed).unwrap();
    }
    assert!(binding.is_trust_established(&session.session_id));
}

#[test]
fn edge_expired_memory_does_not_count_in_session() {
    let (binding, clock) =
        clocked(IdentityBindingConfig::default().with_signature_expiry_hours(1));
    let identity = binding.create_identity("a").unwrap();
    let session = binding.init_cross_session(&identity.id, None).unwrap();
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    clock.advance_hours(2);
    let result = binding
        .verify_in_session(&session.session_id, &signed)
        .unwrap();
    assert_eq!(result.error, Some(VerificationFailure::ExpiredSignature));
    let state = binding.get_session_state(&session.session_id).unwrap();
    assert_eq!(state.verified_memories, 0);
    assert_eq!(state.last_verified_at, START);
}

#[test]
fn edge_ended_session_is_gone() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let session = binding.init_cross_session(&identity.id, None).unwrap();
    assert!(binding.end_session(&session.session_id));
    assert!(!binding.end_session(&session.session_id));
    assert!(binding.get_session_state(&session.session_id).is_none());
    let signed = binding.sign_memory(&identity.id, &memory("k")).unwrap();
    assert!(matches!(
        binding.verify_in_session(&session.session_id, &signed),
        Err(IdentityError::SessionNotFound(_))
    ));
}

// ── Config ───────────────────────────────────────────────────────────────────

#[test]
fn edge_config_from_partial_json() {
    let config = IdentityBindingConfig::from_json(r#"{"trustThreshold": 5}"#).unwrap();
    assert_eq!(config.trust_threshold, 5);
    assert!(config.require_signatures);
    assert!(config.enable_cross_session);
    assert_eq!(config.signature_expiry_hours, 0);

    assert!(matches!(
        IdentityBindingConfig::from_json(r#"{"trustThreshold": 0}"#),
        Err(IdentityError::InvalidConfig(_))
    ));
}

// ── Quick content signatures ─────────────────────────────────────────────────

#[test]
fn edge_quick_signature_bound_to_timestamp() {
    let binding = IdentityBinding::default();
    let identity = binding.create_identity("a").unwrap();
    let export = binding.export_identity(&identity.id).unwrap();
    let secret = export.secret_key_bytes().unwrap();

    let sig = sign_memory_content(b"payload", &secret).unwrap();
    let public_key = identity.signing_public_key;
    assert!(verify_memory_content(b"payload", &sig.signature, &public_key, sig.timestamp));
    assert!(!verify_memory_content(b"payload", &sig.signature, &public_key, sig.timestamp + 1));
    assert!(!verify_memory_content(b"payloaD", &sig.signature, &public_key, sig.timestamp));
    assert!(!verify_memory_content(b"payload", "%%%", &public_key, sig.timestamp));
}
