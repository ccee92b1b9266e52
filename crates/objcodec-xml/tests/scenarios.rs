//! End-to-end codec behaviour over real byte streams.

use std::io::{Cursor, Seek, SeekFrom};

use objcodec_xml::{
    CodecError, Encoding, ReaderSettings, WriterSettings, XmlCodec, XmlSerializer,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    name: String,
    age: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Invoice {
    number: String,
    paid: bool,
}

fn ada() -> Person {
    Person {
        name: "Ada".to_owned(),
        age: 36,
    }
}

/// Strip inter-element whitespace so indented and compact output compare equal.
fn compact(xml: &str) -> String {
    xml.lines().map(str::trim).collect()
}

#[test]
fn test_should_round_trip_through_seekable_stream() {
    let codec = XmlCodec::new();
    let mut stream = Cursor::new(Vec::new());

    codec.serialize(&mut stream, &ada()).expect("serialization should succeed");
    stream.seek(SeekFrom::Start(0)).expect("seek should succeed");
    let back: Person = codec.deserialize(&mut stream).expect("deserialization should succeed");

    assert_eq!(back, ada());
}

#[test]
fn test_should_append_after_existing_stream_content() {
    let codec = XmlCodec::from_encoding(Encoding::Utf8, false);
    let mut stream = b"prefix:".to_vec();
    codec.serialize(&mut stream, &ada()).expect("serialization should succeed");

    let back: Person = codec
        .from_slice(&stream[b"prefix:".len()..])
        .expect("deserialization should succeed");
    assert_eq!(back, ada());
}

#[test]
fn test_should_produce_identical_output_for_identical_configuration() {
    let first = XmlCodec::with_encoding("utf-8", true).expect("valid label");
    let second = XmlCodec::with_settings(WriterSettings::default(), ReaderSettings::default())
        .expect("valid settings");

    assert_eq!(first.encoding(), second.encoding());
    assert_eq!(first.indent(), second.indent());
    assert_eq!(first, second);
    assert_eq!(
        first.to_vec(&ada()).expect("serialization should succeed"),
        second.to_vec(&ada()).expect("serialization should succeed")
    );
}

#[test]
fn test_should_write_same_content_with_and_without_indent() {
    let indented = XmlCodec::from_encoding(Encoding::Utf8, true)
        .to_vec(&ada())
        .expect("serialization should succeed");
    let flat = XmlCodec::from_encoding(Encoding::Utf8, false)
        .to_vec(&ada())
        .expect("serialization should succeed");

    let indented = String::from_utf8(indented).expect("valid UTF-8");
    let flat = String::from_utf8(flat).expect("valid UTF-8");

    assert!(indented.contains('\n'));
    assert!(!flat.contains('\n'));
    assert_eq!(compact(&indented), flat);
}

#[test]
fn test_should_round_trip_every_encoding() {
    for encoding in [Encoding::Utf8, Encoding::Utf16Le, Encoding::Utf16Be] {
        let codec = XmlCodec::from_encoding(encoding, true);
        let person = Person {
            name: "Ada Lovelace ✓".to_owned(),
            age: 36,
        };
        let xml = codec.to_vec(&person).expect("serialization should succeed");
        assert!(xml.starts_with(encoding.bom()));

        let back: Person = codec.from_slice(&xml).expect("deserialization should succeed");
        assert_eq!(back, person, "round trip through {encoding:?}");
    }
}

#[test]
fn test_should_read_documents_written_by_other_codecs() {
    let writer = XmlCodec::from_encoding(Encoding::Utf16Be, false);
    let reader = XmlCodec::new();
    let xml = writer.to_vec(&ada()).expect("serialization should succeed");
    let back: Person = reader.from_slice(&xml).expect("deserialization should succeed");
    assert_eq!(back, ada());
}

#[test]
fn test_should_name_requested_type_on_mismatch() {
    let codec = XmlCodec::new();
    let xml = codec.to_vec(&ada()).expect("serialization should succeed");
    match codec.from_slice::<Invoice>(&xml) {
        Err(CodecError::Serialization(e)) => {
            assert!(e.type_name().ends_with("Invoice"));
            assert!(e.to_string().contains("Invoice"));
        }
        other => panic!("expected serialization error, got {other:?}"),
    }
}

#[test]
fn test_should_keep_malformed_and_mapping_failures_apart() {
    let codec = XmlCodec::new();
    assert!(matches!(
        codec.from_slice::<Person>(b"<Person><Name>Ada</Name>"),
        Err(CodecError::Malformed(_))
    ));
    assert!(matches!(
        codec.from_slice::<Person>(b"<Person><Name>Ada</Name></Person>"),
        Err(CodecError::Serialization(_))
    ));
}

#[test]
fn test_should_enforce_reader_limits_through_codec() {
    let reader = ReaderSettings::builder().max_document_bytes(32).build();
    let codec = XmlCodec::with_settings(WriterSettings::default(), reader)
        .expect("valid settings");
    let xml = codec.to_vec(&ada()).expect("serialization should succeed");
    assert!(xml.len() > 32);
    assert!(matches!(
        codec.from_slice::<Person>(&xml),
        Err(CodecError::Malformed(_))
    ));
}

#[test]
fn test_should_work_through_generic_serializer() {
    fn copy<S: XmlSerializer>(serializer: &S, person: &Person) -> Person {
        let mut buf = Vec::new();
        serializer
            .serialize(&mut buf, person)
            .expect("serialization should succeed");
        serializer
            .deserialize(&mut buf.as_slice())
            .expect("deserialization should succeed")
    }

    assert_eq!(copy(&XmlCodec::new(), &ada()), ada());
}
