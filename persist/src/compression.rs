//! zlib compression of saved streams.
//!
//! The compressed form is a plain zlib stream: a two-byte header, deflate
//! data and an Adler-32 footer. Nothing marks a file as compressed, so the
//! reader has to know which form it was written in.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::buffer::ByteBuffer;
use crate::error::{PersistError, PersistResult};

/// Level used by [`compress`].
pub const DEFAULT_LEVEL: u32 = 6;

/// Smallest possible zlib stream: header, one empty stored block, footer.
const MIN_STREAM_LEN: usize = 2 + 1 + 4;

/// Compress at [`DEFAULT_LEVEL`].
pub fn compress(bytes: &[u8]) -> PersistResult<ByteBuffer> {
    compress_with(bytes, DEFAULT_LEVEL)
}

/// Compress at `level`, clamped to `0..=9`.
pub fn compress_with(bytes: &[u8], level: u32) -> PersistResult<ByteBuffer> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(bytes.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder
        .write_all(bytes)
        .and_then(|()| encoder.finish())
        .map(ByteBuffer::from_vec)
        .map_err(|e| PersistError::Corrupt {
            what: "compression".into(),
            reason: e.to_string(),
        })
}

/// Inflate a zlib stream.
///
/// The header is checked before any inflating. A bad header, damaged data,
/// a checksum mismatch or a truncated stream all fail with `NotCompressed`.
pub fn decompress(bytes: &[u8]) -> PersistResult<ByteBuffer> {
    check_header(bytes).inspect_err(|e| log::warn!("File was not compressed: {e}"))?;

    inflate(bytes)
        .map(ByteBuffer::from_vec)
        .inspect_err(|e| log::warn!("File was not compressed: {e}"))
}

fn not_compressed(reason: impl Into<String>) -> PersistError {
    PersistError::NotCompressed {
        reason: reason.into(),
    }
}

fn check_header(bytes: &[u8]) -> PersistResult<()> {
    if bytes.len() < MIN_STREAM_LEN {
        return Err(not_compressed(format!("{} bytes is too short", bytes.len())));
    }
    let (cmf, flg) = (bytes[0], bytes[1]);
    if cmf & 0x0f != 8 {
        return Err(not_compressed(format!("compression method {}", cmf & 0x0f)));
    }
    if cmf >> 4 > 7 {
        return Err(not_compressed("window size out of range"));
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(not_compressed("header check bits mismatch"));
    }
    if flg & 0x20 != 0 {
        return Err(not_compressed("preset dictionaries are not supported"));
    }
    Ok(())
}

fn inflate(bytes: &[u8]) -> PersistResult<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(3).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let consumed_before = inflater.total_in();
        let produced_before = inflater.total_out();
        let input = &bytes[consumed_before as usize..];

        // Output may span several calls, so no `Finish` hint.
        let status = inflater
            .decompress_vec(input, &mut out, FlushDecompress::None)
            .map_err(|e| not_compressed(e.to_string()))?;

        if status == Status::StreamEnd {
            break;
        }
        if out.len() < out.capacity() {
            if inflater.total_in() as usize >= bytes.len() {
                return Err(not_compressed("stream is truncated"));
            }
            if inflater.total_in() == consumed_before && inflater.total_out() == produced_before {
                return Err(not_compressed("inflater made no progress"));
            }
        }
    }

    let trailing = bytes.len() - inflater.total_in() as usize;
    if trailing > 0 {
        log::debug!("Ignoring {trailing} bytes after the compressed stream");
    }
    Ok(out)
}
