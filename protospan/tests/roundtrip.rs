//! End-to-end round trips through `#[derive(protospan::Message)]` across
//! every field family: scalars at each cardinality, `Mapping`, `Set`,
//! `Pair`, `Identifier`, and nested messages.

use std::collections::HashMap;

use protospan::{deserialize, encoded_len, serialize_to_vec, Identifier, Message, Pair};

fn encode(value: &impl Message) -> Vec<u8> {
    serialize_to_vec(value).unwrap()
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct Address {
    #[wire(string, tag = 1)]
    street: String,
    #[wire(uint32, tag = 2)]
    zip: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct Account {
    #[wire(int32, tag = 1)]
    id: i32,
    #[wire(string, tag = 2)]
    name: String,
    #[wire(sint64, tag = 3)]
    balance: i64,
    #[wire(bool, tag = 4)]
    active: bool,
    #[wire(double, tag = 5)]
    score: f64,
    #[wire(bytes, tag = 6)]
    token: Vec<u8>,
    #[wire(string, tag = 7, optional)]
    nickname: Option<String>,
    #[wire(uint32, tag = 8, repeated, packed)]
    favorite_numbers: Vec<u32>,
    #[wire(message, tag = 9, optional)]
    home: Option<Address>,
    #[wire(message, tag = 10, repeated)]
    other_addresses: Vec<Address>,
    #[wire(map, tag = 11, key = u32, value = string)]
    labels: HashMap<u32, String>,
    #[wire(set, tag = 12, element = u32)]
    tags: Vec<u32>,
    #[wire(pair, tag = 13, first = string, second = u32, optional)]
    coordinate: Option<Pair<String, u32>>,
    #[wire(identifier, tag = 14)]
    external_id: Identifier,
}

fn sample_account() -> Account {
    let mut labels = HashMap::new();
    labels.insert(1, "primary".to_string());
    labels.insert(2, "archived".to_string());

    Account {
        id: -7,
        name: "jane doe".to_string(),
        balance: -123_456_789,
        active: true,
        score: 98.6,
        token: vec![0xDE, 0xAD, 0xBE, 0xEF],
        nickname: Some("jd".to_string()),
        favorite_numbers: vec![3, 7, 42],
        home: Some(Address { street: "1 Main St".to_string(), zip: 90210 }),
        other_addresses: vec![
            Address { street: "2 Side St".to_string(), zip: 10001 },
            Address { street: "3 Back Ave".to_string(), zip: 20002 },
        ],
        labels,
        tags: vec![100, 200, 300],
        coordinate: Some(Pair::new("home".to_string(), 1)),
        external_id: Identifier([7u8; 16]),
    }
}

#[test]
fn full_message_round_trips() {
    let account = sample_account();
    let bytes = encode(&account);
    let decoded: Account = deserialize(&bytes).unwrap();
    assert_eq!(account, decoded);
}

#[test]
fn encoded_len_matches_actual_bytes() {
    let account = sample_account();
    let bytes = encode(&account);
    assert_eq!(encoded_len(&account), bytes.len());
}

#[test]
fn default_message_round_trips_to_empty_wire_form() {
    let account = Account::default();
    let bytes = encode(&account);
    // Every field is at its zero value: no field is present on the wire.
    assert!(bytes.is_empty());
    let decoded: Account = deserialize(&bytes).unwrap();
    assert_eq!(account, decoded);
}

#[test]
fn absent_optional_field_stays_none_after_round_trip() {
    let mut account = sample_account();
    account.nickname = None;
    account.home = None;
    let bytes = encode(&account);
    let decoded: Account = deserialize(&bytes).unwrap();
    assert_eq!(decoded.nickname, None);
    assert_eq!(decoded.home, None);
}

#[test]
fn unknown_fields_are_skipped_not_rejected() {
    // A message with extra tags the receiving schema doesn't know about
    // must still decode the fields it does recognize.
    #[derive(Clone, Debug, Default, PartialEq, Message)]
    struct Wide {
        #[wire(int32, tag = 1)]
        a: i32,
        #[wire(string, tag = 99)]
        future_field: String,
    }

    #[derive(Clone, Debug, Default, PartialEq, Message)]
    struct Narrow {
        #[wire(int32, tag = 1)]
        a: i32,
    }

    let wide = Wide { a: 5, future_field: "not yet known".to_string() };
    let bytes = encode(&wide);
    let narrow: Narrow = deserialize(&bytes).unwrap();
    assert_eq!(narrow.a, 5);
}
