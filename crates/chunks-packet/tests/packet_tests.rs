use chunks_packet::{Component, Data, Interest, Name, SegmentContent};

#[test]
fn data_for_interest_carries_commitment() {
    let prefix: Name = "/example/file/v=1".parse().unwrap();
    let interest = Interest::new(prefix.clone().append_segment(3)).must_be_fresh(true);

    let content = SegmentContent::new("segment three").with_commitment(vec![0xab; 32]);
    let data = Data::new(interest.name.clone(), content.encode())
        .final_block_id(Component::from_segment(7))
        .signature_value(vec![0x01; 32]);

    assert!(prefix.is_prefix_of(&data.name));
    assert_eq!(data.segment(), Some(3));
    assert_eq!(data.final_segment(), Some(7));

    let parsed = data.parse_content().unwrap();
    assert_eq!(parsed.payload.as_ref(), b"segment three");
    assert_eq!(hex::encode(parsed.commitment.unwrap()), "ab".repeat(32));
}

#[test]
fn opaque_content_is_not_segment_content() {
    let data = Data::new("/x/seg=0".parse().unwrap(), vec![0xff]);
    assert!(data.parse_content().is_err());
}

#[test]
fn signed_portion_starts_with_name() {
    let data = Data::new("/a/seg=0".parse().unwrap(), SegmentContent::new("p").encode());
    let signed = data.signed_portion();
    assert_eq!(hex::encode(&signed[..2]), "0706");
}
