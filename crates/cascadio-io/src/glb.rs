//! GLB (binary glTF 2.0) container codec.
//!
//! This module works below any glTF object model: it parses and rebuilds the
//! 12-byte header plus JSON/BIN chunk layout directly, so callers can mutate
//! the JSON document and binary payload while keeping the container's
//! structural invariants (magic, chunk type tags, 4-byte alignment, exact
//! total length) intact.
//!
//! # Example
//!
//! ```ignore
//! use cascadio_io::glb::Glb;
//!
//! let mut glb = Glb::parse(&bytes)?;
//! glb.json["asset"]["generator"] = "cascadio".into();
//! let rebuilt = glb.to_bytes()?;
//! ```

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde_json::Value;
use thiserror::Error;

/// "glTF" in little-endian.
pub const GLB_MAGIC: u32 = 0x46546C67;
pub const GLB_VERSION: u32 = 2;
/// "JSON"
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A;
/// "BIN\0"
pub const GLB_CHUNK_BIN: u32 = 0x004E4942;

/// Errors that can occur while parsing or rebuilding a GLB container.
#[derive(Error, Debug)]
pub enum GlbError {
    #[error("buffer too small for GLB header")]
    TooShort,

    #[error("invalid GLB magic")]
    BadMagic,

    #[error("unsupported GLB version: {0}")]
    UnsupportedVersion(u32),

    #[error("truncated {0}")]
    Truncated(&'static str),

    #[error("first chunk is not JSON")]
    MissingJsonChunk,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlbError>;

/// A parsed GLB container: the JSON document plus the optional binary
/// payload. The BIN chunk is absent for scenes without buffer data.
#[derive(Debug, Clone, PartialEq)]
pub struct Glb {
    pub json: Value,
    pub bin: Option<Vec<u8>>,
}

impl Glb {
    /// Parse a GLB byte buffer.
    ///
    /// Fails on a short buffer, wrong magic, unsupported version, a
    /// truncated JSON chunk, a first chunk that is not JSON, or JSON content
    /// that does not parse. The BIN chunk is read opportunistically: a
    /// missing second chunk, a wrong type tag, or a truncated payload all
    /// mean "no binary payload" rather than an error.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 12 {
            return Err(GlbError::TooShort);
        }

        let mut header = Cursor::new(&data[..12]);
        let magic = header.read_u32::<LittleEndian>()?;
        let version = header.read_u32::<LittleEndian>()?;
        let _total_length = header.read_u32::<LittleEndian>()?;

        if magic != GLB_MAGIC {
            return Err(GlbError::BadMagic);
        }
        if version != GLB_VERSION {
            return Err(GlbError::UnsupportedVersion(version));
        }

        if data.len() < 20 {
            return Err(GlbError::Truncated("JSON chunk header"));
        }
        let mut chunk = Cursor::new(&data[12..20]);
        let json_length = chunk.read_u32::<LittleEndian>()? as usize;
        let json_type = chunk.read_u32::<LittleEndian>()?;
        if json_type != GLB_CHUNK_JSON {
            return Err(GlbError::MissingJsonChunk);
        }

        let json_start: usize = 20;
        let json_end = json_start
            .checked_add(json_length)
            .filter(|end| *end <= data.len())
            .ok_or(GlbError::Truncated("JSON chunk"))?;
        // JSON is space-padded to alignment; trailing whitespace is fine.
        let json: Value = serde_json::from_slice(&data[json_start..json_end])?;

        let mut bin = None;
        if data.len() >= json_end + 8 {
            let mut chunk = Cursor::new(&data[json_end..json_end + 8]);
            let bin_length = chunk.read_u32::<LittleEndian>()? as usize;
            let bin_type = chunk.read_u32::<LittleEndian>()?;
            let bin_start = json_end + 8;
            if bin_type == GLB_CHUNK_BIN && bin_start + bin_length <= data.len() {
                bin = Some(data[bin_start..bin_start + bin_length].to_vec());
            }
        }

        Ok(Self { json, bin })
    }

    /// Serialize back into GLB bytes.
    ///
    /// The JSON document is written compactly and right-padded with ASCII
    /// spaces to the next multiple of 4; the binary payload is zero-padded
    /// the same way. Callers that append data into an existing payload and
    /// record byte offsets are responsible for aligning before this call —
    /// an already-aligned payload is written unchanged. The BIN chunk is
    /// omitted entirely when there is no payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let json_text = serde_json::to_string(&self.json)?;
        let json_bytes = json_text.as_bytes();
        let json_padding = (4 - (json_bytes.len() % 4)) % 4;
        let padded_json_length = json_bytes.len() + json_padding;

        let bin_lengths = self.bin.as_ref().map(|bin| {
            let padding = (4 - (bin.len() % 4)) % 4;
            (bin.len() + padding, padding)
        });

        let total_length = 12
            + 8
            + padded_json_length
            + bin_lengths.map_or(0, |(padded, _)| 8 + padded);

        let mut out = Vec::with_capacity(total_length);

        out.write_u32::<LittleEndian>(GLB_MAGIC)?;
        out.write_u32::<LittleEndian>(GLB_VERSION)?;
        out.write_u32::<LittleEndian>(total_length as u32)?;

        out.write_u32::<LittleEndian>(padded_json_length as u32)?;
        out.write_u32::<LittleEndian>(GLB_CHUNK_JSON)?;
        out.extend_from_slice(json_bytes);
        out.resize(out.len() + json_padding, b' ');

        if let (Some(bin), Some((padded_bin_length, bin_padding))) = (&self.bin, bin_lengths) {
            out.write_u32::<LittleEndian>(padded_bin_length as u32)?;
            out.write_u32::<LittleEndian>(GLB_CHUNK_BIN)?;
            out.extend_from_slice(bin);
            out.resize(out.len() + bin_padding, 0);
        }

        Ok(out)
    }
}
