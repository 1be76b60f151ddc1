use loralink::config::ModemConfig;
use loralink::packet::{self, CodecError, BROADCAST_ADDRESS, HEADER_LEN, MAX_PAYLOAD_LEN};
use loralink::radio::IrqFlags;

#[test]
fn test_encode_layout() {
    let frame = packet::encode(BROADCAST_ADDRESS, 0x11, 7, b"Hello World").unwrap();

    assert_eq!(frame[0], 0xFF); // dst
    assert_eq!(frame[1], 0x11); // src
    assert_eq!(frame[2], 7); // line count
    assert_eq!(frame[3], 11); // payload length
    assert_eq!(&frame[HEADER_LEN..], b"Hello World");
    assert_eq!(frame.len(), HEADER_LEN + 11);
}

#[test]
fn test_encode_empty_payload() {
    let frame = packet::encode(0x02, 0x01, 0, b"").unwrap();
    assert_eq!(frame.len(), HEADER_LEN);
    assert_eq!(frame[3], 0);
}

#[test]
fn test_round_trip() {
    let payload = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x7F];
    let frame = packet::encode(0x42, 0x17, 200, &payload).unwrap();
    let pkt = packet::decode(&frame).unwrap();

    assert_eq!(pkt.dst_address, 0x42);
    assert_eq!(pkt.src_address, 0x17);
    assert_eq!(pkt.src_line_count, 200);
    assert_eq!(pkt.pay_length(), payload.len() as u8);
    assert_eq!(pkt.msg(), &payload);
    assert_eq!(pkt.rssi, None);
    assert_eq!(pkt.snr, None);
}

#[test]
fn test_round_trip_max_payload() {
    let payload = [0xA5; MAX_PAYLOAD_LEN];
    let frame = packet::encode(0x01, 0x02, 3, &payload).unwrap();
    let pkt = packet::decode(&frame).unwrap();
    assert_eq!(pkt.msg(), &payload);
}

#[test]
fn test_encode_rejects_oversized_payload() {
    let payload = [0u8; MAX_PAYLOAD_LEN + 1];
    assert_eq!(
        packet::encode(0x01, 0x02, 0, &payload),
        Err(CodecError::PayloadTooLarge)
    );
}

#[test]
fn test_decode_rejects_truncated_frame() {
    assert_eq!(packet::decode(&[]), Err(CodecError::TruncatedFrame));
    assert_eq!(
        packet::decode(&[0xFF, 0x11, 0x01]),
        Err(CodecError::TruncatedFrame)
    );
}

#[test]
fn test_decode_rejects_length_mismatch() {
    // Declares 5 payload bytes, carries 2.
    assert_eq!(
        packet::decode(&[0xFF, 0x11, 0x01, 5, b'h', b'i']),
        Err(CodecError::LengthMismatch)
    );
    // Declares 1, carries 2: dropped, not truncated.
    assert_eq!(
        packet::decode(&[0xFF, 0x11, 0x01, 1, b'h', b'i']),
        Err(CodecError::LengthMismatch)
    );
}

#[test]
fn test_msg_txt() {
    let frame = packet::encode(0x01, 0x02, 1, "héllo".as_bytes()).unwrap();
    let pkt = packet::decode(&frame).unwrap();
    assert_eq!(pkt.msg_txt(), Ok("héllo"));
}

#[test]
fn test_msg_txt_rejects_invalid_utf8() {
    let frame = packet::encode(0x01, 0x02, 1, &[0xFF, 0xFE]).unwrap();
    let pkt = packet::decode(&frame).unwrap();
    assert_eq!(pkt.msg_txt(), Err(CodecError::InvalidText));
}

#[test]
fn test_irq_flags() {
    let flags = IrqFlags(0x48);
    assert!(flags.tx_done());
    assert!(flags.rx_done());
    assert!(!flags.crc_error());
    assert!(!flags.rx_timeout());

    let flags = IrqFlags(0xA0);
    assert!(flags.crc_error());
    assert!(flags.rx_timeout());
    assert!(!flags.rx_done());
}

#[test]
fn test_modem_config_defaults() {
    let config = ModemConfig::default();
    assert_eq!(config.frequency, 915_000_000);
    assert_eq!(config.spreading_factor, 7);
    assert_eq!(config.bandwidth, 125_000);
    assert_eq!(config.coding_rate, 5);
    assert_eq!(config.preamble_length, 8);
    assert_eq!(config.sync_word, 0x12);
    assert!(config.crc_on);
}
