//! PDE solutions distributed by contiguous ownership ranges, and their
//! replicated (every-rank, full-length) form.
//!
//! A solver running on several ranks owns one contiguous slice of the global
//! solution per rank. Cells may sit on any node, so before scattering values
//! back into cell data every rank needs the whole vector:
//! [`DistributedVector::replicate`] gathers the shards and reassembles them
//! by offset, rejecting layouts with gaps or overlaps.

use crate::algs::communicator::{CommTag, Communicator};
use crate::algs::wire::{decode_shard, encode_shard};
use crate::pde_error::PdeError;
use std::ops::{Index, Range};

const REPLICATE_TAG: CommTag = CommTag::new(0x5E70);

/// One rank's view of a distributed solution vector.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributedVector {
    global_len: usize,
    offset: usize,
    local: Vec<f64>,
}

impl DistributedVector {
    /// A vector wholly owned by a single rank.
    pub fn serial(values: Vec<f64>) -> Self {
        Self {
            global_len: values.len(),
            offset: 0,
            local: values,
        }
    }

    /// A shard covering `offset..offset + local.len()` of a vector of
    /// `global_len` entries.
    pub fn from_local_shard(
        global_len: usize,
        offset: usize,
        local: Vec<f64>,
    ) -> Result<Self, PdeError> {
        match offset.checked_add(local.len()) {
            Some(end) if end <= global_len => Ok(Self {
                global_len,
                offset,
                local,
            }),
            _ => Err(PdeError::InvalidLayout(format!(
                "shard {offset}..{} does not fit in {global_len} entries",
                offset.saturating_add(local.len())
            ))),
        }
    }

    /// Takes this rank's share of `global` under a balanced block layout:
    /// the first `len % size` ranks own one extra entry.
    pub fn block_partition(global: &[f64], rank: usize, size: usize) -> Result<Self, PdeError> {
        if size == 0 || rank >= size {
            return Err(PdeError::InvalidLayout(format!(
                "rank {rank} is not part of a group of {size}"
            )));
        }
        let n = global.len();
        let (base, extra) = (n / size, n % size);
        let start = rank * base + rank.min(extra);
        let len = base + usize::from(rank < extra);
        Self::from_local_shard(n, start, global[start..start + len].to_vec())
    }

    #[inline]
    pub fn global_len(&self) -> usize {
        self.global_len
    }

    /// Global indices owned by this rank.
    #[inline]
    pub fn ownership_range(&self) -> Range<usize> {
        self.offset..self.offset + self.local.len()
    }

    #[inline]
    pub fn local_values(&self) -> &[f64] {
        &self.local
    }

    /// Collective: every rank of `comm` must call this with its own shard.
    /// All ranks receive the same full-length vector.
    pub fn replicate<C: Communicator>(&self, comm: &C) -> Result<ReplicatedVector, PdeError> {
        let payload = encode_shard(self.global_len, self.offset, &self.local);
        let gathered = comm.all_gather_bytes(REPLICATE_TAG, &payload)?;

        let mut shards = Vec::with_capacity(gathered.len());
        for (rank, bytes) in gathered.iter().enumerate() {
            let (header, values) = decode_shard(bytes).map_err(|reason| PdeError::CommError {
                neighbor: rank,
                reason,
            })?;
            if header.global_len() != self.global_len {
                return Err(PdeError::InvalidLayout(format!(
                    "rank {rank} reports {} entries, this rank {}",
                    header.global_len(),
                    self.global_len
                )));
            }
            shards.push((header.offset(), values));
        }
        shards.sort_by_key(|(offset, _)| *offset);

        let mut values = Vec::with_capacity(self.global_len);
        for (offset, shard) in shards {
            if offset != values.len() {
                return Err(PdeError::InvalidLayout(if offset > values.len() {
                    format!("entries {}..{offset} are owned by no rank", values.len())
                } else {
                    format!("entry {offset} is owned by more than one rank")
                }));
            }
            values.extend(shard);
        }
        if values.len() != self.global_len {
            return Err(PdeError::InvalidLayout(format!(
                "entries {}..{} are owned by no rank",
                values.len(),
                self.global_len
            )));
        }
        log::debug!(
            "rank {} replicated {} entries from {} shard(s)",
            comm.rank(),
            values.len(),
            comm.size()
        );
        Ok(ReplicatedVector { values })
    }
}

/// A full-length copy of a solution vector, indexed by global node index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplicatedVector {
    values: Vec<f64>,
}

impl ReplicatedVector {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for ReplicatedVector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl Index<usize> for ReplicatedVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
