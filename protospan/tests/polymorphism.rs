//! Polymorphism: the `derived(...)` discriminated-union mechanism standing
//! in for the reference implementation's class inheritance.

use protospan::{deserialize, serialize, Message};

#[derive(Clone, Debug, Default, PartialEq, Message)]
#[wire(derived(tag = 15, ty = B))]
struct A {
    #[wire(string, tag = 1)]
    base: String,
    #[wire(derived)]
    sub: Option<ADerived>,
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
#[wire(derived(tag = 16, ty = C))]
struct B {
    #[wire(string, tag = 1)]
    middle: String,
    #[wire(derived)]
    sub: Option<BDerived>,
}

#[derive(Clone, Debug, Default, PartialEq, Message)]
struct C {
    #[wire(string, tag = 1)]
    leaf: String,
}

fn encode(value: &impl Message) -> Vec<u8> {
    let mut out = Vec::new();
    serialize(&mut out, value).unwrap();
    out
}

#[test]
fn two_level_polymorphism_round_trips() {
    let mut value = A { base: "base".to_string(), sub: None };
    value.sub = Some(ADerived::B(Box::new(B { middle: "middle".to_string(), sub: None })));

    let bytes = encode(&value);
    let decoded: A = deserialize(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn three_level_polymorphism_chains_through_b_into_c() {
    // A <| B <| C: only the base (A) field is set; everything else comes
    // from the nested discriminators.
    let c = C { leaf: String::new() };
    let b = B { middle: String::new(), sub: Some(BDerived::C(Box::new(c.clone()))) };
    let a = A { base: "root".to_string(), sub: Some(ADerived::B(Box::new(b))) };

    let bytes = encode(&a);
    let decoded: A = deserialize(&bytes).unwrap();
    assert_eq!(decoded, a);

    match decoded.sub {
        Some(ADerived::B(boxed_b)) => match boxed_b.sub {
            Some(BDerived::C(boxed_c)) => assert_eq!(*boxed_c, c),
            None => panic!("expected B to carry a C discriminator"),
        },
        None => panic!("expected A to carry a B discriminator"),
    }
}

#[test]
fn discriminator_is_written_before_base_fields() {
    // §4.5/§9: the discriminator tag (15) must appear on the wire before
    // the struct's own field (tag 1), matching the reference
    // implementation's emission order.
    let value = A {
        base: "base".to_string(),
        sub: Some(ADerived::B(Box::new(B { middle: "middle".to_string(), sub: None }))),
    };
    let bytes = encode(&value);

    let mut reader = protospan::SpanReader::new(&bytes);
    let (first_tag, _) = reader.read_tag().unwrap().unwrap();
    assert_eq!(first_tag, 15, "discriminator tag should be written first");
}

#[test]
fn reader_tolerates_base_fields_before_discriminator() {
    // §9: readers MUST tolerate either order, even though writers always
    // emit the discriminator first.
    use protospan::wire_type::WireType;
    use protospan::writer::StreamWriter;

    let mut nested = Vec::new();
    {
        let mut w = StreamWriter::new(&mut nested);
        w.write_tag(1, WireType::LengthDelimited).unwrap();
        w.write_str("middle").unwrap();
        w.flush().unwrap();
    }

    let mut bytes = Vec::new();
    {
        let mut w = StreamWriter::new(&mut bytes);
        // Base field (tag 1) written first, discriminator (tag 15) second —
        // the opposite of what this crate's own writer emits.
        w.write_tag(1, WireType::LengthDelimited).unwrap();
        w.write_str("base").unwrap();
        w.write_tag(15, WireType::LengthDelimited).unwrap();
        w.write_length_delimited_header(nested.len()).unwrap();
        w.write_bytes(&nested).unwrap();
        w.flush().unwrap();
    }

    let decoded: A = deserialize(&bytes).unwrap();
    assert_eq!(decoded.base, "base");
    match decoded.sub {
        Some(ADerived::B(boxed)) => assert_eq!(boxed.middle, "middle"),
        None => panic!("expected the out-of-order discriminator to still decode"),
    }
}
