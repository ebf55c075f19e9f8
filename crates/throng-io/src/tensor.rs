//! The compressed feature-tensor codec.
//!
//! One tensor per file: a little-endian binary header (magic, format
//! version, dimensions) followed by the channel-last `f32` payload, the
//! whole stream gzip-compressed. The format is intentionally simple:
//! no alignment padding, no self-describing schema.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use throng_core::GridDims;
use throng_raster::{FeatureImage, CHANNELS};

use crate::error::CodecError;

/// Magic bytes at the start of every tensor stream.
pub const MAGIC: &[u8; 4] = b"TRFI";

/// Current tensor format version.
pub const FORMAT_VERSION: u8 = 1;

fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_u32_le(r: &mut dyn Read) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write one feature image to a byte sink, compressed.
pub fn write_tensor<W: Write>(writer: W, image: &FeatureImage) -> Result<(), CodecError> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder.write_all(MAGIC)?;
    encoder.write_all(&[FORMAT_VERSION])?;
    write_u32_le(&mut encoder, image.dims().width)?;
    write_u32_le(&mut encoder, image.dims().height)?;
    write_u32_le(&mut encoder, CHANNELS as u32)?;
    for &v in image.data() {
        encoder.write_all(&v.to_le_bytes())?;
    }
    encoder.finish()?;
    Ok(())
}

/// Write one feature image to `path`, creating parent directories.
pub fn write_tensor_file(path: &Path, image: &FeatureImage) -> Result<(), CodecError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = BufWriter::new(File::create(path)?);
    write_tensor(file, image)
}

/// Read one feature image back from a byte source.
pub fn read_tensor<R: Read>(reader: R) -> Result<FeatureImage, CodecError> {
    let mut decoder = GzDecoder::new(reader);

    let mut magic = [0u8; 4];
    decoder.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(CodecError::InvalidMagic);
    }
    let mut version = [0u8; 1];
    decoder.read_exact(&mut version)?;
    if version[0] != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion { found: version[0] });
    }

    let width = read_u32_le(&mut decoder)?;
    let height = read_u32_le(&mut decoder)?;
    let channels = read_u32_le(&mut decoder)?;
    if channels as usize != CHANNELS {
        return Err(CodecError::DimensionMismatch {
            detail: format!("expected {CHANNELS} channels, found {channels}"),
        });
    }

    let dims = GridDims::new(width, height);
    let expected = dims.len() * CHANNELS;
    let mut data = Vec::with_capacity(expected);
    let mut buf = [0u8; 4];
    for _ in 0..expected {
        decoder.read_exact(&mut buf)?;
        data.push(f32::from_le_bytes(buf));
    }
    // The stream must end exactly at the payload boundary.
    if decoder.read(&mut buf)? != 0 {
        return Err(CodecError::DimensionMismatch {
            detail: "trailing bytes after payload".to_string(),
        });
    }

    FeatureImage::from_raw(dims, data).ok_or_else(|| CodecError::DimensionMismatch {
        detail: "payload length disagrees with header".to_string(),
    })
}

/// Read one feature image from `path`.
pub fn read_tensor_file(path: &Path) -> Result<FeatureImage, CodecError> {
    let file = BufReader::new(File::open(path)?);
    read_tensor(file)
}
