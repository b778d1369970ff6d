//! Byte-level scenarios from the testable-properties table, exercised
//! through `#[derive(protospan::Message)]` rather than the runtime's own
//! unit tests (which cover the same scenarios at the primitive level).

use protospan::{deserialize, serialize, Message};

fn encode(value: &impl Message) -> Vec<u8> {
    let mut out = Vec::new();
    serialize(&mut out, value).unwrap();
    out
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct SignedMin {
    #[wire(sint64, tag = 1)]
    value: i64,
}

#[test]
fn scenario_1_signed_64_min_zigzag() {
    let msg = SignedMin { value: i64::MIN };
    let bytes = encode(&msg);
    assert_eq!(
        bytes,
        vec![0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
    );
    let decoded: SignedMin = deserialize(&bytes).unwrap();
    assert_eq!(decoded.value, i64::MIN);
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct HasBytes {
    #[wire(bytes, tag = 1)]
    payload: Vec<u8>,
}

#[test]
fn scenario_2_empty_bytes_field_is_absent() {
    let msg = HasBytes::default();
    let bytes = encode(&msg);
    assert!(bytes.is_empty());
    let decoded: HasBytes = deserialize(&bytes).unwrap();
    assert_eq!(decoded.payload, Vec::<u8>::new());
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct RepeatedInts {
    #[wire(int32, tag = 1, repeated, packed)]
    values: Vec<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct RepeatedIntsUnpacked {
    #[wire(int32, tag = 1, repeated)]
    values: Vec<i32>,
}

#[test]
fn scenario_5_packed_and_non_packed_decode_identically() {
    let packed = RepeatedInts { values: vec![1, 2, 3] };
    let packed_bytes = encode(&packed);

    let unpacked = RepeatedIntsUnpacked { values: vec![1, 2, 3] };
    let unpacked_bytes = encode(&unpacked);
    assert_ne!(packed_bytes, unpacked_bytes);

    let decoded_from_packed: RepeatedIntsUnpacked = deserialize(&packed_bytes).unwrap();
    let decoded_from_unpacked: RepeatedInts = deserialize(&unpacked_bytes).unwrap();
    assert_eq!(decoded_from_packed.values, vec![1, 2, 3]);
    assert_eq!(decoded_from_unpacked.values, vec![1, 2, 3]);
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct WithMap {
    #[wire(map, tag = 1, key = u32, value = u32)]
    entries: std::collections::HashMap<u32, u32>,
}

#[test]
fn scenario_6_map_entry_tolerates_value_before_key() {
    use protospan::writer::StreamWriter;
    use protospan::wire_type::WireType;

    // Hand-build a map entry with value (tag 2) before key (tag 1).
    let mut body = Vec::new();
    {
        let mut w = StreamWriter::new(&mut body);
        w.write_tag(2, WireType::Varint).unwrap();
        w.write_varint(99).unwrap();
        w.write_tag(1, WireType::Varint).unwrap();
        w.write_varint(7).unwrap();
        w.flush().unwrap();
    }
    let mut framed = Vec::new();
    {
        let mut w = StreamWriter::new(&mut framed);
        w.write_tag(1, WireType::LengthDelimited).unwrap();
        w.write_length_delimited_header(body.len()).unwrap();
        w.write_bytes(&body).unwrap();
        w.flush().unwrap();
    }

    let decoded: WithMap = deserialize(&framed).unwrap();
    assert_eq!(decoded.entries.get(&7), Some(&99));
}
