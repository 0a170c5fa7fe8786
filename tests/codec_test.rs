//! Wire codec: bounded reads, frame envelope, compact arrays, tag buffers.

use brokerwire::protocol::{
    frame_payload, put_compact_array, put_compact_array_len, put_nullable_string,
    put_tag_buffer, read_frame, split_frame, WireReader,
};
use brokerwire::BrokerWireError;
use bytes::{BufMut, BytesMut};

#[test]
fn reader_decodes_big_endian_integers_of_every_width() {
    let mut buf = BytesMut::new();
    buf.put_i8(-2);
    buf.put_u8(0xAB);
    buf.put_i16(-300);
    buf.put_u16(0xBEEF);
    buf.put_i32(-70_000);
    buf.put_u32(0xDEAD_BEEF);
    buf.put_i64(i64::MIN + 1);
    buf.put_u64(u64::MAX - 1);

    let mut r = WireReader::new(&buf);
    assert_eq!(r.read_i8().unwrap(), -2);
    assert_eq!(r.read_u8().unwrap(), 0xAB);
    assert_eq!(r.read_i16().unwrap(), -300);
    assert_eq!(r.read_u16().unwrap(), 0xBEEF);
    assert_eq!(r.read_i32().unwrap(), -70_000);
    assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(r.read_i64().unwrap(), i64::MIN + 1);
    assert_eq!(r.read_u64().unwrap(), u64::MAX - 1);
    assert_eq!(r.remaining(), 0);
    assert_eq!(r.position(), buf.len());
}

#[test]
fn reader_is_network_byte_order() {
    let mut r = WireReader::new(&[0x00, 0x12, 0x00, 0x00, 0x00, 0x07]);
    assert_eq!(r.read_i16().unwrap(), 18);
    assert_eq!(r.read_i32().unwrap(), 7);
}

#[test]
fn read_past_end_is_truncated_frame_not_panic() {
    let mut r = WireReader::new(&[0x01, 0x02, 0x03]);
    let err = r.read_i32().unwrap_err();
    assert!(matches!(
        err,
        BrokerWireError::TruncatedFrame {
            needed: 4,
            available: 3
        }
    ));
    // A failed read consumes nothing.
    assert_eq!(r.remaining(), 3);
    assert_eq!(r.read_i16().unwrap(), 0x0102);
    assert!(r.read_u16().is_err());
    assert!(r.read_slice(2).is_err());
}

#[test]
fn nullable_string_reads_null_and_value() {
    let mut buf = BytesMut::new();
    put_nullable_string(&mut buf, Some("kafka-cli")).unwrap();
    put_nullable_string(&mut buf, None).unwrap();
    assert_eq!(&buf[..2], &[0x00, 0x09]);

    let mut r = WireReader::new(&buf);
    assert_eq!(r.read_nullable_string().unwrap(), Some("kafka-cli"));
    assert_eq!(r.read_nullable_string().unwrap(), None);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn nullable_string_rejects_short_and_invalid_bytes() {
    let mut r = WireReader::new(&[0x00, 0x05, b'a', b'b']);
    assert!(matches!(
        r.read_nullable_string(),
        Err(BrokerWireError::TruncatedFrame { .. })
    ));

    let mut r = WireReader::new(&[0x00, 0x02, 0xFF, 0xFE]);
    assert!(matches!(
        r.read_nullable_string(),
        Err(BrokerWireError::Protocol(_))
    ));
}

#[test]
fn compact_array_length_is_count_plus_one() {
    let mut buf = BytesMut::new();
    put_compact_array_len(&mut buf, None).unwrap();
    put_compact_array_len(&mut buf, Some(0)).unwrap();
    put_compact_array_len(&mut buf, Some(1)).unwrap();
    put_compact_array_len(&mut buf, Some(254)).unwrap();
    assert_eq!(&buf[..], &[0, 1, 2, 255]);

    let err = put_compact_array_len(&mut buf, Some(255)).unwrap_err();
    assert!(matches!(err, BrokerWireError::Protocol(_)));
}

#[test]
fn compact_array_writes_elements_after_length() {
    let mut buf = BytesMut::new();
    put_compact_array(&mut buf, &[7i16, -1i16], |dst, v| dst.put_i16(*v)).unwrap();
    put_tag_buffer(&mut buf);
    assert_eq!(&buf[..], &[0x03, 0x00, 0x07, 0xFF, 0xFF, 0x00]);
}

#[test]
fn frame_prefix_matches_payload_length() {
    let framed = frame_payload(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(&framed[..4], &[0, 0, 0, 5]);
    assert_eq!(&framed[4..], &[1, 2, 3, 4, 5]);
    assert_eq!(split_frame(&framed).unwrap(), &[1, 2, 3, 4, 5]);

    let empty = frame_payload(&[]).unwrap();
    assert_eq!(&empty[..], &[0, 0, 0, 0]);
    assert!(split_frame(&empty).unwrap().is_empty());
}

#[test]
fn split_frame_rejects_prefix_payload_mismatch() {
    assert!(matches!(
        split_frame(&[0, 0, 0, 4, 1, 2]),
        Err(BrokerWireError::TruncatedFrame {
            needed: 4,
            available: 2
        })
    ));
    assert!(matches!(
        split_frame(&[0, 0, 0, 1, 1, 2]),
        Err(BrokerWireError::Protocol(_))
    ));
    assert!(matches!(
        split_frame(&[0, 0]),
        Err(BrokerWireError::TruncatedFrame { .. })
    ));
}

#[tokio::test]
async fn read_frame_reads_consecutive_frames_then_clean_eof() {
    let mut wire = Vec::new();
    wire.extend_from_slice(&frame_payload(b"first").unwrap());
    wire.extend_from_slice(&frame_payload(b"second!").unwrap());
    let mut src: &[u8] = &wire;

    let a = read_frame(&mut src, 1024).await.unwrap().unwrap();
    assert_eq!(&a[..], b"first");
    let b = read_frame(&mut src, 1024).await.unwrap().unwrap();
    assert_eq!(&b[..], b"second!");
    assert!(read_frame(&mut src, 1024).await.unwrap().is_none());
}

#[tokio::test]
async fn read_frame_reports_truncation_inside_prefix_and_payload() {
    let mut src: &[u8] = &[0, 0];
    assert!(matches!(
        read_frame(&mut src, 1024).await,
        Err(BrokerWireError::TruncatedFrame {
            needed: 4,
            available: 2
        })
    ));

    let mut src: &[u8] = &[0, 0, 0, 12, 0, 18, 0, 4];
    assert!(matches!(
        read_frame(&mut src, 1024).await,
        Err(BrokerWireError::TruncatedFrame {
            needed: 12,
            available: 4
        })
    ));
}

#[tokio::test]
async fn read_frame_rejects_oversized_length_before_reading_payload() {
    let mut src: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
    let err = read_frame(&mut src, 1024).await.unwrap_err();
    assert!(matches!(
        err,
        BrokerWireError::FrameTooLarge {
            len: 0xFFFF_FFFF,
            max: 1024
        }
    ));
    assert!(err.is_framing());
}

#[tokio::test]
async fn read_frame_handles_split_delivery() {
    let (mut client, mut server) = tokio::io::duplex(64);
    let writer = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        for chunk in [&[0u8, 0][..], &[0, 3, b'a'][..], &[b'b', b'c'][..]] {
            client.write_all(chunk).await.unwrap();
            tokio::task::yield_now().await;
        }
    });
    let frame = read_frame(&mut server, 1024).await.unwrap().unwrap();
    assert_eq!(&frame[..], b"abc");
    writer.await.unwrap();
}

#[tokio::test]
async fn read_frame_stops_at_frame_boundary_across_growth_steps() {
    let big: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let mut wire = Vec::new();
    wire.extend_from_slice(&frame_payload(&big).unwrap());
    wire.extend_from_slice(&frame_payload(b"next").unwrap());
    let mut src: &[u8] = &wire;

    let first = read_frame(&mut src, 1024 * 1024).await.unwrap().unwrap();
    assert_eq!(&first[..], &big[..]);
    let second = read_frame(&mut src, 1024 * 1024).await.unwrap().unwrap();
    assert_eq!(&second[..], b"next");
    assert!(read_frame(&mut src, 1024 * 1024).await.unwrap().is_none());
}

#[tokio::test]
async fn large_claim_with_missing_payload_is_truncated_without_full_reservation() {
    // 100MB claimed, 10 bytes delivered.
    let mut wire = vec![0x06, 0x40, 0x00, 0x00];
    wire.extend_from_slice(&[7u8; 10]);
    let mut src: &[u8] = &wire;
    let err = read_frame(&mut src, 100 * 1024 * 1024).await.unwrap_err();
    assert!(matches!(
        err,
        BrokerWireError::TruncatedFrame {
            needed: 104_857_600,
            available: 10
        }
    ));
}
