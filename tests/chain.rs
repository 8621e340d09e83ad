use hex_literal::hex;
use pcapng_codec::*;

// minimal Section Header Block, no options
const SHB_MINIMAL: &[u8] = &hex!(
    "0a0d0d0a 1c000000 4d3c2b1a 01000000"
    "ffffffff ffffffff 1c000000"
);

// Section Header Block whose option region is a lone end-of-options entry
const SHB_TERMINATED: &[u8] = &hex!(
    "0a0d0d0a 20000000 4d3c2b1a 01000000"
    "ffffffff ffffffff 00000000 20000000"
);

// Interface Description Block with an if_name option ("eth" + 1 pad byte)
// followed by the end-of-options entry
const IDB_IF_NAME: &[u8] = &hex!(
    "01000000 20000000 01000000 ffff0000"
    "02000300 65746800 00000000 20000000"
);

// Enhanced Packet Block with a 5-byte payload (3 pad bytes)
const EPB_ODD_PAYLOAD: &[u8] = &hex!(
    "06000000 28000000 00000000 01000000"
    "02000000 05000000 05000000 aabbccdd"
    "ee000000 28000000"
);

// Simple Packet Block, 4 payload bytes
const SPB: &[u8] = &hex!("03000000 14000000 04000000 cafebabe 14000000");

// block of unknown type 0xFFFF0000
const UNKNOWN_BLOCK: &[u8] = &hex!(
    "0000ffff 18000000 00112233 44556677"
    "8899aabb 18000000"
);

// Custom Data Block, 6 payload bytes (2 pad bytes), terminated option region
const CDB: &[u8] = &hex!(
    "b5006bb1 24000000 06000000 00000000"
    "00000000 abcdef01 23450000 00000000"
    "24000000"
);

fn two_block_buffer() -> Vec<u8> {
    let mut v = SHB_MINIMAL.to_vec();
    v.extend_from_slice(IDB_IF_NAME);
    v
}

#[test]
fn test_minimal_shb() {
    let chain = parse_block_chain(SHB_MINIMAL).expect("chain parsing failed");
    assert_eq!(chain.len(), 1);
    match &chain.blocks[0] {
        Block::SectionHeader(shb) => {
            assert_eq!(shb.bom, BOM_MAGIC);
            assert!(!shb.big_endian());
            assert_eq!(shb.major_version, 1);
            assert_eq!(shb.minor_version, 0);
            assert_eq!(shb.section_len, -1);
            assert!(shb.options.is_empty());
        }
        other => panic!("expected a section header, got {:?}", other),
    }
    assert_eq!(chain.to_vec_raw().unwrap(), SHB_MINIMAL);
    assert!(validate_chain(&chain, SHB_MINIMAL).is_ok());
}

#[test]
fn test_shb_option_terminator_kept() {
    let chain = parse_block_chain(SHB_TERMINATED).expect("chain parsing failed");
    let options = chain.blocks[0].options();
    assert_eq!(options.len(), 1);
    assert!(options[0].is_terminator());
    assert_eq!(chain.to_vec_raw().unwrap(), SHB_TERMINATED);
}

#[test]
fn test_idb_with_if_name_option() {
    let (rem, idb) = parse_interfacedescriptionblock_le(IDB_IF_NAME).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(idb.linktype, Linktype::ETHERNET);
    assert_eq!(idb.snaplen, 65535);
    assert_eq!(idb.options.len(), 2);
    let if_name = &idb.options[0];
    assert_eq!(if_name.code, OptionCode(2));
    assert_eq!(if_name.len, 3);
    assert_eq!(if_name.as_bytes(), Some(&b"eth"[..]));
    // the stored value keeps its single zero pad byte
    assert_eq!(if_name.value(), b"eth\x00");
    assert!(idb.options[1].is_terminator());
    assert_eq!(idb.to_vec_raw().unwrap(), IDB_IF_NAME);
}

#[test]
fn test_epb_odd_payload_padding() {
    let (rem, epb) = parse_enhancedpacketblock_le(EPB_ODD_PAYLOAD).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(epb.caplen, 5);
    assert_eq!(epb.origlen, 5);
    assert!(!epb.truncated());
    // physical payload occupies 8 bytes, 3 of them zero padding
    assert_eq!(epb.data.len(), 8);
    assert_eq!(&epb.data[5..], &[0, 0, 0]);
    assert_eq!(epb.packet_data(), &hex!("aabbccddee"));
    assert_eq!(epb.to_vec_raw().unwrap(), EPB_ODD_PAYLOAD);
}

#[test]
fn test_spb_has_no_options() {
    let chain = parse_block_chain(SPB).expect("chain parsing failed");
    match &chain.blocks[0] {
        Block::SimplePacket(spb) => {
            assert_eq!(spb.origlen, 4);
            assert_eq!(spb.data, &hex!("cafebabe"));
        }
        other => panic!("expected a simple packet, got {:?}", other),
    }
    assert!(chain.blocks[0].options().is_empty());
    assert_eq!(chain.to_vec_raw().unwrap(), SPB);
}

#[test]
fn test_unknown_type_decodes_to_raw() {
    let chain = parse_block_chain(UNKNOWN_BLOCK).expect("chain parsing failed");
    match &chain.blocks[0] {
        Block::Raw(raw) => {
            assert_eq!(raw.block_type, 0xFFFF_0000);
            // full body copied verbatim, no option parsing
            assert_eq!(raw.data, &UNKNOWN_BLOCK[8..20]);
        }
        other => panic!("expected a raw block, got {:?}", other),
    }
    assert!(chain.blocks[0].options().is_empty());
    assert_eq!(chain.to_vec_raw().unwrap(), UNKNOWN_BLOCK);
}

#[test]
fn test_custom_data_block() {
    let chain = parse_block_chain(CDB).expect("chain parsing failed");
    match &chain.blocks[0] {
        Block::CustomData(cdb) => {
            assert_eq!(cdb.data_len, 6);
            assert_eq!(cdb.payload(), &hex!("abcdef012345"));
            assert_eq!(cdb.data.len(), 8);
            assert_eq!(cdb.options.len(), 1);
        }
        other => panic!("expected a custom data block, got {:?}", other),
    }
    assert_eq!(chain.to_vec_raw().unwrap(), CDB);
}

#[test]
fn test_two_block_chain_roundtrip_and_validate() {
    let buffer = two_block_buffer();
    let chain = parse_block_chain(&buffer).expect("chain parsing failed");
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.to_vec_raw().unwrap(), buffer);
    assert!(validate_chain(&chain, &buffer).is_ok());

    // decoding the re-encoded bytes yields an equal chain
    let encoded = chain.to_vec_raw().unwrap();
    let reparsed = parse_block_chain(&encoded).expect("reparse failed");
    assert_eq!(reparsed, chain);
}

#[test]
fn test_validate_reports_corrupted_block() {
    let buffer = two_block_buffer();
    let chain = parse_block_chain(&buffer).expect("chain parsing failed");

    // corrupt the first block's total length
    let mut corrupted = buffer.clone();
    corrupted[4] += 1;
    let err = validate_chain(&chain, &corrupted).unwrap_err();
    assert_eq!(err.block_index, 0);
    assert!(matches!(
        err.failure,
        ValidationFailure::HeaderMismatch { .. }
    ));

    // corrupt the second block's total length
    let mut corrupted = buffer.clone();
    corrupted[28 + 4] += 1;
    let err = validate_chain(&chain, &corrupted).unwrap_err();
    assert_eq!(err.block_index, 1);

    // corrupt a content byte of the second block
    let mut corrupted = buffer.clone();
    corrupted[28 + 12] ^= 0xFF;
    let err = validate_chain(&chain, &corrupted).unwrap_err();
    assert_eq!(err.block_index, 1);
    assert!(matches!(err.failure, ValidationFailure::ContentMismatch));
}

#[test]
fn test_validate_requires_both_sides_to_end() {
    let buffer = two_block_buffer();
    let chain = parse_block_chain(SHB_MINIMAL).expect("chain parsing failed");
    // reference continues past the chain
    let err = validate_chain(&chain, &buffer).unwrap_err();
    assert_eq!(err.block_index, 1);
    assert!(matches!(
        err.failure,
        ValidationFailure::TrailingReferenceData
    ));
    // chain continues past the reference
    let chain = parse_block_chain(&buffer).expect("chain parsing failed");
    let err = validate_chain(&chain, SHB_MINIMAL).unwrap_err();
    assert_eq!(err.block_index, 1);
    assert!(matches!(err.failure, ValidationFailure::ReferenceExhausted));
}

#[test]
fn test_short_buffer_yields_empty_chain() {
    let chain = parse_block_chain(&hex!("0a0d0d0a 1c0000")).expect("short buffer");
    assert!(chain.is_empty());
    assert!(parse_block_chain(b"").expect("empty buffer").is_empty());
}

#[test]
fn test_trailing_sub_block_bytes_are_ignored() {
    // fewer than 12 bytes after the last block are not another block
    let mut buffer = SHB_MINIMAL.to_vec();
    buffer.extend_from_slice(&hex!("deadbeef"));
    let chain = parse_block_chain(&buffer).expect("chain parsing failed");
    assert_eq!(chain.len(), 1);
    assert!(validate_chain(&chain, &buffer).is_ok());
}

#[test]
fn test_garbage_after_terminator_is_equivalent() {
    // same block, differing only in the padding bytes after the terminator
    let with_garbage: &[u8] = &hex!(
        "01000000 20000000 01000000 ffff0000"
        "00000000 deadbeef cafebabe 20000000"
    );
    let with_zeroes: &[u8] = &hex!(
        "01000000 20000000 01000000 ffff0000"
        "00000000 00000000 00000000 20000000"
    );
    let a = parse_block_chain(with_garbage).expect("chain parsing failed");
    let b = parse_block_chain(with_zeroes).expect("chain parsing failed");
    assert_eq!(a, b);
    assert_eq!(a.blocks[0].options().len(), 1);
}

#[test]
fn test_misaligned_total_length() {
    let buffer = &hex!("0a0d0d0a 1e000000 4d3c2b1a");
    assert_eq!(
        parse_block_chain(buffer).unwrap_err(),
        PcapNgError::MisalignedLength(30)
    );
}

#[test]
fn test_total_length_below_minimum() {
    let buffer = &hex!("0a0d0d0a 0c000000 4d3c2b1a");
    assert_eq!(
        parse_block_chain(buffer).unwrap_err(),
        PcapNgError::InvalidBlockLength(12)
    );
}

#[test]
fn test_header_trailer_length_mismatch() {
    let mut buffer = SHB_MINIMAL.to_vec();
    buffer[24] = 0x18;
    assert_eq!(
        parse_block_chain(&buffer).unwrap_err(),
        PcapNgError::LengthMismatch {
            header: 28,
            trailer: 24
        }
    );
}

#[test]
fn test_declared_length_exceeds_buffer() {
    let buffer = &hex!("0a0d0d0a 40000000 4d3c2b1a 01000000 ffffffff ffffffff 40000000");
    assert!(matches!(
        parse_block_chain(buffer).unwrap_err(),
        PcapNgError::TruncatedBuffer { .. }
    ));
}

#[test]
fn test_invalid_option_terminator() {
    // end-of-options entry declaring 4 value bytes
    let buffer = &hex!(
        "01000000 1c000000 01000000 ffff0000"
        "00000400 deadbeef 1c000000"
    );
    assert_eq!(
        parse_block_chain(buffer).unwrap_err(),
        PcapNgError::InvalidOptionTerminator(4)
    );
}

#[test]
fn test_describe_chain() {
    let buffer = two_block_buffer();
    let chain = parse_block_chain(&buffer).expect("chain parsing failed");
    let description = chain.to_string();
    let lines: Vec<&str> = description.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "block 0: type=0x0A0D0D0A length=28 options=0");
    assert_eq!(lines[1], "block 1: type=0x00000001 length=32 options=2");
}

#[test]
fn test_built_chain_encode_then_validate() {
    let packet = hex!("00112233 44556677 8899");
    let mut chain = BlockChain::from(vec![
        Block::SectionHeader(SectionHeaderBlock {
            block_type: 0,
            block_len1: 0,
            bom: 0,
            major_version: 0,
            minor_version: 0,
            section_len: -1,
            options: Vec::new(),
            block_len2: 0,
        }),
        Block::InterfaceDescription(InterfaceDescriptionBlock {
            block_type: 0,
            block_len1: 0,
            linktype: Linktype::ETHERNET,
            reserved: 0,
            snaplen: 65535,
            options: Vec::new(),
            block_len2: 0,
        }),
        Block::EnhancedPacket(EnhancedPacketBlock {
            block_type: 0,
            block_len1: 0,
            if_id: 0,
            ts_high: 0,
            ts_low: 0,
            caplen: packet.len() as u32,
            origlen: packet.len() as u32,
            data: &packet,
            options: Vec::new(),
            block_len2: 0,
        }),
    ]);
    let buffer = chain.to_vec().expect("chain serialization failed");
    // every emitted block stays 32-bit aligned
    assert_eq!(buffer.len() % 4, 0);
    let decoded = parse_block_chain(&buffer).expect("chain parsing failed");
    assert_eq!(decoded.len(), 3);
    assert!(validate_chain(&decoded, &buffer).is_ok());
    assert!(decoded.blocks[2].is_data_block());
}

#[test]
fn test_big_endian_shb_sniffing() {
    // the same minimal Section Header Block, encoded big-endian
    let be: &[u8] = &hex!(
        "0a0d0d0a 0000001c 1a2b3c4d 00010000"
        "ffffffff ffffffff 0000001c"
    );
    let (rem, shb) = parse_sectionheaderblock(be).expect("parsing failed");
    assert!(rem.is_empty());
    assert!(shb.big_endian());
    assert_eq!(shb.block_len1, 28);
    assert_eq!(shb.major_version, 1);
    assert_eq!(shb.minor_version, 0);
    assert_eq!(shb.section_len, -1);

    // little-endian input goes through the same entry point
    let (_, shb) = parse_sectionheaderblock(SHB_MINIMAL).expect("parsing failed");
    assert!(!shb.big_endian());

    // a byte-order magic matching neither endianness is rejected
    let mut bad = be.to_vec();
    bad[8..12].copy_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(
        parse_sectionheaderblock(&bad),
        Err(nom::Err::Error(PcapNgError::UnrecognizedByteOrder(0)))
    ));
}

#[test]
fn test_big_endian_enhanced_packet() {
    // EPB_ODD_PAYLOAD, encoded big-endian
    let be: &[u8] = &hex!(
        "00000006 00000028 00000000 00000001"
        "00000002 00000005 00000005 aabbccdd"
        "ee000000 00000028"
    );
    let (rem, epb) = parse_enhancedpacketblock_be(be).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(epb.ts_high, 1);
    assert_eq!(epb.ts_low, 2);
    assert_eq!(epb.caplen, 5);
    assert_eq!(epb.packet_data(), &hex!("aabbccddee"));

    // a big-endian block must not slip through the little-endian parser
    assert!(parse_enhancedpacketblock_le(be).is_err());
}
