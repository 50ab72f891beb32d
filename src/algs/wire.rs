//! Fixed, little-endian wire records for replication messages.

use bytemuck::{Pod, Zeroable};

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Byte count announced ahead of a payload.
#[repr(transparent)]
#[derive(Copy, Clone, Pod, Zeroable, Debug)]
pub struct WireCount {
    n_le: u64,
}

impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u64).to_le(),
        }
    }

    pub fn get(&self) -> usize {
        u64::from_le(self.n_le) as usize
    }
}

/// Describes one rank's shard of a distributed vector.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Debug)]
pub struct WireShardHeader {
    pub version_le: u16,
    pub reserved_le: [u16; 3],
    pub global_len_le: u64,
    pub offset_le: u64,
    pub len_le: u64,
}

impl WireShardHeader {
    pub fn new(global_len: usize, offset: usize, len: usize) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            reserved_le: [0; 3],
            global_len_le: (global_len as u64).to_le(),
            offset_le: (offset as u64).to_le(),
            len_le: (len as u64).to_le(),
        }
    }

    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }

    pub fn global_len(&self) -> usize {
        u64::from_le(self.global_len_le) as usize
    }

    pub fn offset(&self) -> usize {
        u64::from_le(self.offset_le) as usize
    }

    pub fn len(&self) -> usize {
        u64::from_le(self.len_le) as usize
    }
}

/// Serializes a shard as header followed by little-endian `f64` bit patterns.
pub fn encode_shard(global_len: usize, offset: usize, values: &[f64]) -> Vec<u8> {
    let header = WireShardHeader::new(global_len, offset, values.len());
    let bits: Vec<u64> = values.iter().map(|v| v.to_bits().to_le()).collect();
    let mut out = Vec::with_capacity(size_of::<WireShardHeader>() + 8 * bits.len());
    out.extend_from_slice(cast_slice(std::slice::from_ref(&header)));
    out.extend_from_slice(cast_slice(&bits));
    out
}

/// Inverse of [`encode_shard`].
pub fn decode_shard(bytes: &[u8]) -> Result<(WireShardHeader, Vec<f64>), String> {
    let hdr_len = size_of::<WireShardHeader>();
    if bytes.len() < hdr_len {
        return Err(format!("expected at least {hdr_len} bytes, got {}", bytes.len()));
    }
    let header: WireShardHeader = bytemuck::pod_read_unaligned(&bytes[..hdr_len]);
    if header.version() != WIRE_VERSION {
        return Err(format!("unsupported wire version {}", header.version()));
    }
    let payload = &bytes[hdr_len..];
    let expected = header
        .len()
        .checked_mul(8)
        .ok_or_else(|| format!("shard length {} overflows the payload size", header.len()))?;
    if payload.len() != expected {
        return Err(format!("expected {expected} payload bytes, got {}", payload.len()));
    }
    let bits: Vec<u64> = bytemuck::pod_collect_to_vec(payload);
    let values = bits.into_iter().map(|b| f64::from_bits(u64::from_le(b))).collect();
    Ok((header, values))
}
