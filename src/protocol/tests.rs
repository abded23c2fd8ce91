// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use bytes::Bytes;

use crate::core::adapters::RawValue;
use crate::protocol::envelope::{MessageCodec, Packet};
use crate::protocol::hash_or_number::HashOrNumber;
use crate::protocol::message::{Message, MessageKind, MessageRole};
use crate::protocol::packets::*;
use crate::protocol::version::ProtocolVersion;
use crate::types::*;

fn hash(byte: u8) -> Hash {
    Hash::new([byte; 32])
}

fn header(number: u64) -> BlockHeader {
    BlockHeader {
        parent_hash: hash(1),
        difficulty: U256::from(2u64),
        number: U256::from(number),
        gas_limit: 30_000_000,
        timestamp: 1_700_000_000,
        extra_data: Bytes::from_static(b"node"),
        ..Default::default()
    }
}

fn legacy_tx(nonce: u64) -> Transaction {
    Transaction::Legacy(LegacyTransaction {
        nonce,
        gas_price: U256::from(5_000_000_000u64),
        gas: 21_000,
        to: Some(Address::new([0x35; 20])),
        value: U256::from(1u64),
        v: U256::from(0x25u64),
        r: U256::from(7u64),
        s: U256::from(9u64),
        ..Default::default()
    })
}

fn body() -> BlockBody {
    BlockBody {
        transactions: vec![
            legacy_tx(1),
            Transaction::Typed {
                tx_type: 2,
                payload: Bytes::from_static(&[0xc2, 0x01, 0x02]),
            },
        ],
        uncles: vec![header(9)],
    }
}

fn receipt() -> Receipt {
    Receipt {
        tx_type: 0,
        status: ReceiptStatus::Success,
        cumulative_gas_used: 21_000,
        bloom: Bloom::ZERO,
        logs: vec![Log {
            address: Address::new([0x11; 20]),
            topics: vec![hash(0xaa)],
            data: Bytes::from_static(&[0x01]),
        }],
    }
}

/// One populated sample of every kind.
fn sample(kind: MessageKind) -> Message {
    match kind {
        MessageKind::Status => Status {
            protocol_version: 68,
            network_id: 56,
            total_difficulty: U256::from(1000u64),
            head: hash(3),
            genesis: hash(4),
            fork_id: ForkId {
                hash: ForkHash::new([1, 2, 3, 4]),
                next: 0,
            },
        }
        .into(),
        MessageKind::NewBlockHashes => NewBlockHashes::new(vec![BlockHashNumber {
            hash: hash(5),
            number: 100,
        }])
        .into(),
        MessageKind::Transactions => Transactions::new(vec![legacy_tx(3)]).into(),
        MessageKind::GetBlockHeaders => GetBlockHeaders {
            origin: HashOrNumber::Hash(hash(6)),
            amount: 192,
            skip: 0,
            reverse: true,
        }
        .into(),
        MessageKind::BlockHeaders => BlockHeaders::new(vec![header(10), header(11)]).into(),
        MessageKind::GetBlockBodies => GetBlockBodies::new(vec![hash(7), hash(8)]).into(),
        MessageKind::BlockBodies => BlockBodies::new(vec![body()]).into(),
        MessageKind::BlockBodiesRaw => {
            BlockBodiesRaw::new(vec![RawValue::from_encodable(&body()).unwrap()]).into()
        }
        MessageKind::NewBlock => NewBlock {
            block: Block {
                header: header(12),
                transactions: vec![legacy_tx(4)],
                uncles: Vec::new(),
            },
            total_difficulty: U256::from(12_345u64),
        }
        .into(),
        MessageKind::NewPooledTransactionHashes => {
            NewPooledTransactionHashes::new(vec![hash(9)]).into()
        }
        MessageKind::GetPooledTransactions => GetPooledTransactions::new(vec![hash(9)]).into(),
        MessageKind::PooledTransactions => PooledTransactions::new(vec![legacy_tx(5)]).into(),
        MessageKind::PooledTransactionsRaw => {
            PooledTransactionsRaw::new(vec![RawValue::from_encodable(&legacy_tx(5)).unwrap()])
                .into()
        }
        MessageKind::GetNodeData => GetNodeData::new(vec![hash(10)]).into(),
        MessageKind::NodeData => NodeData::new(vec![Bytes::from_static(&[0xde, 0xad])]).into(),
        MessageKind::GetReceipts => GetReceipts::new(vec![hash(11)]).into(),
        MessageKind::Receipts => Receipts::new(vec![vec![receipt()], Vec::new()]).into(),
        MessageKind::ReceiptsRaw => ReceiptsRaw::new(vec![
            RawValue::from_encodable(&vec![receipt()]).unwrap(),
            RawValue::from_encodable(&Vec::<Receipt>::new()).unwrap(),
        ])
        .into(),
        MessageKind::Votes => Votes {
            votes: vec![VoteEnvelope {
                vote_address: BlsPublicKey::new([0xb3; 48]),
                signature: BlsSignature::new([0x91; 96]),
                data: VoteData {
                    source_number: 1,
                    source_hash: hash(12),
                    target_number: 2,
                    target_hash: hash(13),
                },
            }],
        }
        .into(),
    }
}

fn packet_for(codec: &MessageCodec, message: Message) -> Packet {
    match codec.framing(message.kind()) {
        Some(crate::protocol::envelope::Framing::RequestId) => Packet::with_id(0x0457, message),
        _ => Packet::bare(message),
    }
}

#[test]
fn test_every_kind_roundtrips_in_every_version() {
    for version in ProtocolVersion::ALL {
        let codec = MessageCodec::new(version);
        for kind in MessageKind::ALL {
            if codec.framing(kind).is_none() {
                continue;
            }
            let packet = packet_for(&codec, sample(kind));
            let (code, bytes) = codec.encode(&packet).expect("sample should encode");
            assert_eq!(code, kind.code());

            let decoded = codec.decode_as(kind, &bytes).expect("sample should decode");
            assert_eq!(decoded, packet, "{kind} under {version}");
        }
    }
}

#[test]
fn test_raw_and_materialized_encode_identically() {
    let codec = MessageCodec::new(ProtocolVersion::Eth66);
    for kind in MessageKind::ALL.into_iter().filter(|k| k.is_raw()) {
        // =================== Materialized form ===================
        let materialized = packet_for(&codec, sample(kind.materialized()));
        let (code_a, bytes_a) = codec.encode(&materialized).unwrap();

        // =================== Raw form ===================
        let raw = packet_for(&codec, sample(kind));
        let (code_b, bytes_b) = codec.encode(&raw).unwrap();

        assert_eq!(code_a, code_b);
        assert_eq!(bytes_a, bytes_b, "{kind} differs from its materialized form");

        // Either form decodes from the same bytes.
        let as_raw = codec.decode_relay(code_a, &bytes_a).unwrap();
        assert_eq!(as_raw.kind(), kind);
        let as_materialized = codec.decode(code_b, &bytes_b).unwrap();
        assert_eq!(as_materialized, materialized);
    }
}

#[test]
fn test_notifications_never_wrapped() {
    for version in ProtocolVersion::ALL {
        let codec = MessageCodec::new(version);
        for kind in MessageKind::ALL {
            if kind.role() == MessageRole::Notification {
                if let Some(framing) = codec.framing(kind) {
                    assert_eq!(framing, crate::protocol::envelope::Framing::Bare);
                }
            }
        }
    }
}

#[test]
fn test_raw_items_materialize_later() {
    let codec = MessageCodec::new(ProtocolVersion::Eth68);
    let (code, bytes) = codec
        .encode(&packet_for(&codec, sample(MessageKind::Receipts)))
        .unwrap();
    let relayed = codec.decode_relay(code, &bytes).unwrap();
    let Message::ReceiptsRaw(raw) = relayed.message else {
        panic!("relay decode should keep receipts raw");
    };
    let first: Vec<Receipt> = raw[0].decode_as().unwrap();
    assert_eq!(first, vec![receipt()]);
    let second: Vec<Receipt> = raw[1].decode_as().unwrap();
    assert!(second.is_empty());
}
