//! Wire-exactness tests: byte layouts and account orders are the contract
//! the on-chain program parses positionally, so they are pinned here field
//! by field.

use sable_extension::{Extension, decode_extensions};
use sable_instruction::{
    AccountMeta, BATCH_ITEM_LEN, InstructionBuilder, InstructionKind, ProtocolConfig, RevealKind,
    SYSTEM_PROGRAM, SplitOutput, TransferItem, role_table,
};
use sable_notes::{Commitment, Note, NoteSecret, Nullifier, SealedNote};
use sable_pubkey::Pubkey;
use sable_stealth::{
    StealthKeypair, decrypt_payload, encrypt_payload, generate_stealth_address,
    recover_stealth_address,
};

const PROGRAM_ID: Pubkey = Pubkey::new([0xA0; 32]);
const TREASURY: Pubkey = Pubkey::new([0xB0; 32]);

fn builder() -> InstructionBuilder {
    InstructionBuilder::new(ProtocolConfig::new(PROGRAM_ID, TREASURY))
}

fn assert_matches_roles(accounts: &[AccountMeta], kind: InstructionKind) {
    let roles = role_table(kind);
    assert_eq!(accounts.len(), roles.len(), "{kind:?} account count");
    for (meta, role) in accounts.iter().zip(roles) {
        assert_eq!(meta.is_signer, role.is_signer, "{kind:?} role {}", role.name);
        assert_eq!(
            meta.is_writable, role.is_writable,
            "{kind:?} role {}",
            role.name
        );
    }
}

#[test]
fn nullifier_check_is_exactly_33_bytes() {
    let nullifier = Nullifier([0x11; 32]);
    let ix = builder().nullifier_check(Pubkey([1u8; 32]), &nullifier);

    assert_eq!(ix.data.len(), 33);
    assert_eq!(ix.data[0], InstructionKind::NullifierCheck.tag());
    assert_eq!(&ix.data[1..33], nullifier.as_bytes());
    assert_eq!(hex::encode(&ix.data), format!("02{}", "11".repeat(32)));
    assert_matches_roles(&ix.accounts, InstructionKind::NullifierCheck);
}

#[test]
fn nullifier_create_is_exactly_98_bytes_with_3_accounts() {
    let payer = Pubkey([1u8; 32]);
    let nullifier_address = Pubkey([2u8; 32]);
    let note_commit = Commitment([0x22; 32]);
    let nullifier = Nullifier([0x33; 32]);
    let secret_hash = [0x44; 32];

    let ix = builder().nullifier_create(
        payer,
        nullifier_address,
        &note_commit,
        &nullifier,
        &secret_hash,
        1,
    );

    // [tag][noteCommit:32][nullifier:32][secretHash:32][flags:1]
    assert_eq!(ix.data.len(), 98);
    assert_eq!(ix.data[0], InstructionKind::NullifierCreate.tag());
    assert_eq!(&ix.data[1..33], note_commit.as_bytes());
    assert_eq!(&ix.data[33..65], nullifier.as_bytes());
    assert_eq!(&ix.data[65..97], &secret_hash);
    assert_eq!(ix.data[97], 1);

    // payer signer-writable, derived address writable, system read-only
    assert_eq!(ix.accounts.len(), 3);
    assert_eq!(ix.accounts[0], AccountMeta::new(payer, true));
    assert_eq!(ix.accounts[1], AccountMeta::new(nullifier_address, false));
    assert_eq!(ix.accounts[2], AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
    assert_matches_roles(&ix.accounts, InstructionKind::NullifierCreate);
}

#[test]
fn note_create_carries_commitment_blob_and_extensions() {
    let commitment = Commitment([0x55; 32]);
    let sealed = SealedNote([0x66; 64]);
    let extensions = [
        Extension::Royalty {
            recipient: Pubkey([9u8; 32]),
            bps: 750,
        },
        Extension::Soulbound,
    ];

    let ix = builder()
        .note_create(
            Pubkey([1u8; 32]),
            Pubkey([2u8; 32]),
            &commitment,
            &sealed,
            &extensions,
        )
        .expect("valid note");

    assert_eq!(ix.data[0], InstructionKind::NoteCreate.tag());
    assert_eq!(&ix.data[1..33], commitment.as_bytes());
    assert_eq!(&ix.data[33..97], sealed.as_bytes());

    // Trailing TLV block decodes back to the caller's list, in order.
    let decoded = decode_extensions(&ix.data[97..]).expect("well-formed TLV");
    assert_eq!(decoded, extensions);
    assert_matches_roles(&ix.accounts, InstructionKind::NoteCreate);
}

#[test]
fn transfer_layout_and_fee_prefix() {
    let nullifier = Nullifier([0x11; 32]);
    let commitment = Commitment([0x22; 32]);
    let sealed = SealedNote([0x33; 64]);

    let ix = builder()
        .transfer(
            Pubkey([1u8; 32]),
            Pubkey([2u8; 32]),
            Pubkey([3u8; 32]),
            &nullifier,
            &commitment,
            &sealed,
            &[],
        )
        .expect("valid transfer");

    assert_eq!(ix.data[0], InstructionKind::Transfer.tag());
    assert_eq!(&ix.data[1..33], nullifier.as_bytes());
    assert_eq!(&ix.data[33..65], commitment.as_bytes());
    assert_eq!(&ix.data[65..129], sealed.as_bytes());
    assert_eq!(&ix.data[129..], &[0u8], "empty TLV block");

    // Shared fee prefix ahead of operation-specific accounts.
    assert_eq!(ix.accounts[0], AccountMeta::new(Pubkey([1u8; 32]), true));
    assert_eq!(ix.accounts[1], AccountMeta::new(TREASURY, false));
    assert_matches_roles(&ix.accounts, InstructionKind::Transfer);
}

#[test]
fn batch_of_ten_has_exact_predicted_size() {
    let items: Vec<_> = (0..10u8)
        .map(|i| TransferItem {
            nullifier: Nullifier([i; 32]),
            commitment: Commitment([i + 10; 32]),
            sealed: SealedNote([i + 20; 64]),
        })
        .collect();

    let ix = builder()
        .batch_transfer(Pubkey([1u8; 32]), &items)
        .expect("at the cap");

    // header (tag + count) + 10 × item
    assert_eq!(ix.data.len(), 2 + 10 * BATCH_ITEM_LEN);
    assert_eq!(ix.data[0], InstructionKind::BatchTransfer.tag());
    assert_eq!(ix.data[1], 10);

    // Spot-check the third item's offsets.
    let base = 2 + 2 * BATCH_ITEM_LEN;
    assert_eq!(&ix.data[base..base + 32], items[2].nullifier.as_bytes());
    assert_eq!(
        &ix.data[base + 32..base + 64],
        items[2].commitment.as_bytes()
    );
    assert_eq!(&ix.data[base + 64..base + 128], items[2].sealed.as_bytes());
    assert_matches_roles(&ix.accounts, InstructionKind::BatchTransfer);
}

#[test]
fn routed_transfer_layout() {
    let hops = [[1u8; 32], [2u8; 32], [3u8; 32]];
    let ix = builder()
        .routed_transfer(
            Pubkey([1u8; 32]),
            Pubkey([2u8; 32]),
            &[0x77; 32],
            &hops,
            b"layered",
        )
        .expect("valid route");

    assert_eq!(ix.data[0], InstructionKind::RoutedTransfer.tag());
    assert_eq!(ix.data[1], 3, "hop count");
    assert_eq!(&ix.data[2..34], &[0x77; 32]);
    assert_eq!(&ix.data[34..66], &hops[0]);
    assert_eq!(&ix.data[98..130], &hops[2]);
    assert_eq!(&ix.data[130..132], &7u16.to_le_bytes());
    assert_eq!(&ix.data[132..], b"layered");
    assert_matches_roles(&ix.accounts, InstructionKind::RoutedTransfer);
}

#[test]
fn split_lists_one_note_account_per_output() {
    let outputs = [
        SplitOutput {
            commitment: Commitment([1u8; 32]),
            sealed: SealedNote([2u8; 64]),
            share_bps: 2_500,
        },
        SplitOutput {
            commitment: Commitment([3u8; 32]),
            sealed: SealedNote([4u8; 64]),
            share_bps: 7_500,
        },
    ];
    let notes = [Pubkey([0xC1; 32]), Pubkey([0xC2; 32])];

    let ix = builder()
        .split(
            Pubkey([1u8; 32]),
            Pubkey([2u8; 32]),
            &notes,
            &Nullifier([5u8; 32]),
            &outputs,
        )
        .expect("shares sum to 10000");

    assert_eq!(ix.data[0], InstructionKind::Split.tag());
    assert_eq!(&ix.data[1..33], Nullifier([5u8; 32]).as_bytes());
    assert_eq!(ix.data[33], 2, "output count");
    // Second output's share sits after its commitment and sealed note.
    let second = 34 + 98 + 32 + 64;
    assert_eq!(&ix.data[second..second + 2], &7_500u16.to_le_bytes());

    // fee_payer, treasury, nullifier, note, note, system
    assert_eq!(ix.accounts.len(), 6);
    assert_eq!(ix.accounts[3].pubkey, notes[0]);
    assert_eq!(ix.accounts[4].pubkey, notes[1]);
    assert_eq!(ix.accounts[5], AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
}

#[test]
fn compliance_reveal_layout() {
    let ix = builder().compliance_reveal(
        Pubkey([1u8; 32]),
        Pubkey([2u8; 32]),
        RevealKind::AmountOnly,
        &[0x10; 32],
        &[0x20; 32],
    );

    assert_eq!(ix.data.len(), 66);
    assert_eq!(ix.data[0], InstructionKind::ComplianceReveal.tag());
    assert_eq!(ix.data[1], RevealKind::AmountOnly.code());
    assert_eq!(&ix.data[2..34], &[0x10; 32]);
    assert_eq!(&ix.data[34..66], &[0x20; 32]);
    assert_matches_roles(&ix.accounts, InstructionKind::ComplianceReveal);
}

#[test]
fn program_id_comes_from_injected_config() {
    let other = InstructionBuilder::new(ProtocolConfig::new(
        Pubkey([0xD0; 32]),
        Pubkey([0xD1; 32]),
    ));
    let ix = other.nullifier_check(Pubkey([1u8; 32]), &Nullifier([2u8; 32]));
    assert_eq!(ix.program_id, Pubkey([0xD0; 32]));
}

#[test]
fn stealth_payment_end_to_end() {
    let mut rng = rand::rngs::OsRng;

    // Sender side: fresh note for the recipient, one-time address, payload.
    let secret = NoteSecret::random(&mut rng);
    let note = Note::new(42_000, &mut rng);
    let commitment = note.commitment(&secret);
    let sealed = note.seal(&secret);

    let recipient = StealthKeypair::random();
    let ephemeral = StealthKeypair::random();
    let address = generate_stealth_address(&recipient.public_bytes(), &ephemeral)
        .expect("valid recipient key");
    let shared = ephemeral
        .diffie_hellman(&recipient.public_bytes())
        .expect("contributory");
    let payload = encrypt_payload(&shared, commitment.as_bytes()).expect("encrypt");

    let ix = builder()
        .stealth_transfer(
            Pubkey([1u8; 32]),
            Pubkey([2u8; 32]),
            &address,
            &ephemeral.public_bytes(),
            &payload,
        )
        .expect("valid payment");

    // Recipient side: read the ephemeral key back off the wire, recover the
    // address, confirm the payment is theirs, decrypt the payload.
    assert_eq!(ix.data[0], InstructionKind::StealthTransfer.tag());
    let wire_stealth: [u8; 32] = ix.data[1..33].try_into().unwrap();
    let wire_ephemeral: [u8; 32] = ix.data[33..65].try_into().unwrap();
    let wire_hint: [u8; 32] = ix.data[65..97].try_into().unwrap();
    let payload_len = u16::from_le_bytes(ix.data[97..99].try_into().unwrap()) as usize;
    let wire_payload = &ix.data[99..];
    assert_eq!(wire_payload.len(), payload_len);

    let recovered =
        recover_stealth_address(&recipient, &wire_ephemeral).expect("valid ephemeral key");
    assert_eq!(recovered.stealth_pubkey, wire_stealth);
    assert_eq!(recovered.scan_hint, wire_hint);

    let shared_rx = recipient
        .diffie_hellman(&wire_ephemeral)
        .expect("contributory");
    let plain = decrypt_payload(&shared_rx, wire_payload).expect("decrypt");
    assert_eq!(plain, commitment.as_bytes());

    // And the sealed blob opens back to the note for the secret holder.
    let reopened = sable_notes::open(&secret, &sealed);
    assert_eq!(reopened, note);
}

#[test]
fn spend_flow_binds_note_derivations() {
    let mut rng = rand::rngs::OsRng;
    let secret = NoteSecret::random(&mut rng);
    let note = Note::new(1_000, &mut rng);

    let commitment = note.commitment(&secret);
    let nullifier = note.nullifier(&secret);

    let ix = builder().nullifier_create(
        Pubkey([1u8; 32]),
        Pubkey([2u8; 32]),
        &commitment,
        &nullifier,
        &secret.hash(),
        0,
    );

    // The validator sees commitment, nullifier and secret hash but never
    // the secret, amount or nonce.
    assert_eq!(&ix.data[1..33], commitment.as_bytes());
    assert_eq!(&ix.data[33..65], nullifier.as_bytes());
    assert_eq!(&ix.data[65..97], &secret.hash());
    for window in ix.data.windows(32) {
        assert_ne!(window, secret.as_bytes());
        assert_ne!(window, &note.nonce);
    }
}
