//! Wire codec: big-endian primitives, frame envelope, compact arrays and tag buffers.
//!
//! Frame: int32 (BE) length + payload. All integers are fixed width, network order.
//! Writes go straight through `bytes::BufMut` (`put_i16`, `put_i32`, ...); reads go
//! through [`WireReader`], which never reads past the end of its buffer.

use crate::error::{BrokerWireError, Result};
use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of the frame length prefix.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Default upper bound on a frame payload (100MB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 100 * 1024 * 1024;

/// Payload buffer growth step in `read_frame`.
const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Empty tagged-field section.
const EMPTY_TAG_BUFFER: u8 = 0;

/// Largest element count a single-byte compact array length can carry.
pub const MAX_COMPACT_ARRAY_LEN: usize = u8::MAX as usize - 1;

/// Bounded big-endian reader over a borrowed byte slice.
///
/// Every read checks the remaining length first, so running off the end of the
/// buffer yields [`BrokerWireError::TruncatedFrame`] instead of a panic.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    position: usize,
}

macro_rules! read_be {
    ($name:ident, $ty:ty, $get:ident) => {
        pub fn $name(&mut self) -> Result<$ty> {
            self.ensure(std::mem::size_of::<$ty>())?;
            let mut src = &self.buf[self.position..];
            let v = src.$get();
            self.position += std::mem::size_of::<$ty>();
            Ok(v)
        }
    };
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    /// Unread tail of the buffer; borrows from the original slice.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.position..]
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(BrokerWireError::TruncatedFrame {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    read_be!(read_i8, i8, get_i8);
    read_be!(read_u8, u8, get_u8);
    read_be!(read_i16, i16, get_i16);
    read_be!(read_u16, u16, get_u16);
    read_be!(read_i32, i32, get_i32);
    read_be!(read_u32, u32, get_u32);
    read_be!(read_i64, i64, get_i64);
    read_be!(read_u64, u64, get_u64);

    /// Borrow exactly `n` bytes.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let out = &self.buf[self.position..self.position + n];
        self.position += n;
        Ok(out)
    }

    /// Read nullable Kafka string: int16 length (-1 = null), then utf8 bytes.
    pub fn read_nullable_string(&mut self) -> Result<Option<&'a str>> {
        let len = self.read_i16()?;
        if len < 0 {
            return Ok(None);
        }
        let bytes = self.read_slice(len as usize)?;
        std::str::from_utf8(bytes)
            .map(Some)
            .map_err(|e| BrokerWireError::Protocol(format!("invalid utf8 string: {}", e)))
    }
}

/// Write nullable Kafka string (int16 length, -1 for null).
pub fn put_nullable_string(dst: &mut BytesMut, s: Option<&str>) -> Result<()> {
    match s {
        None => dst.put_i16(-1),
        Some(s) => {
            let b = s.as_bytes();
            let len = i16::try_from(b.len())
                .map_err(|_| BrokerWireError::Protocol(format!("string too long: {}", b.len())))?;
            dst.put_i16(len);
            dst.extend_from_slice(b);
        }
    }
    Ok(())
}

/// Empty tagged fields: a single zero byte.
pub fn put_tag_buffer(dst: &mut BytesMut) {
    dst.put_u8(EMPTY_TAG_BUFFER);
}

/// Compact array length byte: count + 1, with 0 reserved for null.
pub fn put_compact_array_len(dst: &mut BytesMut, count: Option<usize>) -> Result<()> {
    match count {
        None => dst.put_u8(0),
        Some(n) if n <= MAX_COMPACT_ARRAY_LEN => dst.put_u8((n + 1) as u8),
        Some(n) => {
            return Err(BrokerWireError::Protocol(format!(
                "compact array of {} elements does not fit a single length byte",
                n
            )))
        }
    }
    Ok(())
}

/// Write a present compact array: length byte, then each element via `put`.
pub fn put_compact_array<T>(
    dst: &mut BytesMut,
    items: &[T],
    mut put: impl FnMut(&mut BytesMut, &T),
) -> Result<()> {
    put_compact_array_len(dst, Some(items.len()))?;
    for item in items {
        put(dst, item);
    }
    Ok(())
}

/// Prepend 4-byte frame length (BE) to a finished payload.
pub fn frame_payload(payload: &[u8]) -> Result<BytesMut> {
    let len = u32::try_from(payload.len()).map_err(|_| BrokerWireError::FrameTooLarge {
        len: payload.len(),
        max: u32::MAX as usize,
    })?;
    let mut out = BytesMut::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    out.put_u32(len);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Split an in-memory frame into its payload, checking the prefix matches exactly.
pub fn split_frame(frame: &[u8]) -> Result<&[u8]> {
    let mut reader = WireReader::new(frame);
    let len = reader.read_u32()? as usize;
    let payload = reader.read_slice(len)?;
    if reader.remaining() != 0 {
        return Err(BrokerWireError::Protocol(format!(
            "{} trailing bytes after {} byte frame",
            reader.remaining(),
            len
        )));
    }
    Ok(payload)
}

/// Read one length-prefixed frame from `src` and return its payload.
///
/// Returns `Ok(None)` when the peer closes cleanly before sending any prefix
/// byte. A close anywhere inside the prefix or payload is a truncated frame.
pub async fn read_frame<R>(src: &mut R, max_frame_bytes: usize) -> Result<Option<BytesMut>>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    let got = read_full(src, &mut prefix).await?;
    if got == 0 {
        return Ok(None);
    }
    if got < LENGTH_PREFIX_BYTES {
        return Err(BrokerWireError::TruncatedFrame {
            needed: LENGTH_PREFIX_BYTES,
            available: got,
        });
    }
    let len = u32::from_be_bytes(prefix) as usize;
    if len > max_frame_bytes {
        return Err(BrokerWireError::FrameTooLarge {
            len,
            max: max_frame_bytes,
        });
    }
    // Grow with the bytes that actually arrive; the prefix alone reserves nothing big.
    let mut payload = BytesMut::with_capacity(len.min(READ_CHUNK_BYTES));
    while payload.len() < len {
        let want = (len - payload.len()).min(READ_CHUNK_BYTES);
        payload.reserve(want);
        let n = (&mut *src).take(want as u64).read_buf(&mut payload).await?;
        if n == 0 {
            return Err(BrokerWireError::TruncatedFrame {
                needed: len,
                available: payload.len(),
            });
        }
    }
    Ok(Some(payload))
}

/// Like `read_exact`, but reports how many bytes arrived before EOF.
async fn read_full<R>(src: &mut R, buf: &mut [u8]) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = src.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
