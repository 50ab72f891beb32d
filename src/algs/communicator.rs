//! Thin façade over intra-process (Rayon) or inter-process (MPI) message passing.
//!
//! Messages are contiguous byte slices. Handles are waitable; callers must
//! `.wait()` before trusting that a receive buffer is filled.

use crate::algs::wire::{WireCount, cast_slice};
use crate::pde_error::PdeError;
use std::fmt;

/// Message tag. Collective helpers reserve `tag` and `tag + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommTag(u16);

impl CommTag {
    pub const fn new(tag: u16) -> Self {
        Self(tag)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn offset(self, by: u16) -> Self {
        Self(self.0.wrapping_add(by))
    }
}

impl fmt::Display for CommTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag {}", self.0)
    }
}

/// Non-blocking communication interface.
pub trait Communicator: Send + Sync + 'static {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle;
    /// Posts a receive of `buf.len()` bytes; the data is returned by `wait`.
    fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> Self::RecvHandle;

    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Every rank contributes `local`; every rank gets all contributions in
    /// rank order.
    ///
    /// The default implementation announces lengths on `tag` and ships the
    /// payloads on `tag + 1` with point-to-point messages.
    fn all_gather_bytes(&self, tag: CommTag, local: &[u8]) -> Result<Vec<Vec<u8>>, PdeError> {
        let (me, n) = (self.rank(), self.size());
        let peers: Vec<usize> = (0..n).filter(|&p| p != me).collect();

        // Stage 1: lengths
        let count_len = size_of::<WireCount>();
        let mut count_recvs = Vec::with_capacity(peers.len());
        for &p in &peers {
            let mut scratch = vec![0u8; count_len];
            count_recvs.push((p, self.irecv(p, tag.as_u16(), &mut scratch)));
        }
        let count = WireCount::new(local.len());
        let sends: Vec<_> = peers
            .iter()
            .map(|&p| self.isend(p, tag.as_u16(), cast_slice(std::slice::from_ref(&count))))
            .collect();

        let mut lens = vec![0usize; n];
        lens[me] = local.len();
        let mut first_err = None;
        for (p, h) in count_recvs {
            match h.wait() {
                Some(raw) if raw.len() == count_len => {
                    let c: WireCount = bytemuck::pod_read_unaligned(&raw);
                    lens[p] = c.get();
                }
                Some(raw) => {
                    first_err.get_or_insert(PdeError::CommError {
                        neighbor: p,
                        reason: format!("expected {count_len} length bytes, got {}", raw.len()),
                    });
                }
                None => {
                    first_err.get_or_insert(PdeError::CommError {
                        neighbor: p,
                        reason: format!("no length message on {tag}"),
                    });
                }
            }
        }
        for s in sends {
            let _ = s.wait();
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        // Stage 2: payloads
        let data_tag = tag.offset(1);
        let mut data_recvs = Vec::with_capacity(peers.len());
        for &p in &peers {
            let mut scratch = vec![0u8; lens[p]];
            data_recvs.push((p, self.irecv(p, data_tag.as_u16(), &mut scratch)));
        }
        let sends: Vec<_> = peers
            .iter()
            .map(|&p| self.isend(p, data_tag.as_u16(), local))
            .collect();

        let mut out = vec![Vec::new(); n];
        out[me] = local.to_vec();
        for (p, h) in data_recvs {
            match h.wait() {
                Some(raw) if raw.len() == lens[p] => out[p] = raw,
                Some(raw) => {
                    first_err.get_or_insert(PdeError::CommError {
                        neighbor: p,
                        reason: format!("expected {} payload bytes, got {}", lens[p], raw.len()),
                    });
                }
                None => {
                    first_err.get_or_insert(PdeError::CommError {
                        neighbor: p,
                        reason: format!("no payload on {data_tag}"),
                    });
                }
            }
        }
        for s in sends {
            let _ = s.wait();
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(out),
        }
    }
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

/// Single-process communicator: rank 0 of 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoComm;

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn isend(&self, _peer: usize, _tag: u16, _buf: &[u8]) {}
    fn irecv(&self, _peer: usize, _tag: u16, _buf: &mut [u8]) {}

    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }
}

// --- RayonComm: intra-process / multi-thread ---
#[cfg(feature = "rayon")]
mod rayon_backend {
    use super::*;
    use bytes::Bytes;
    use dashmap::DashMap;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    type Key = (usize, usize, u16); // (src, dst, tag)
    type Mailbox = Arc<DashMap<Key, VecDeque<Bytes>>>;

    const RECV_TIMEOUT: Duration = Duration::from_secs(30);

    /// One rank of an in-process group. Ranks of the same group share a
    /// mailbox; messages between a pair of ranks on one tag arrive in order.
    #[derive(Clone)]
    pub struct RayonComm {
        rank: usize,
        size: usize,
        mailbox: Mailbox,
    }

    impl fmt::Debug for RayonComm {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("RayonComm")
                .field("rank", &self.rank)
                .field("size", &self.size)
                .finish_non_exhaustive()
        }
    }

    impl RayonComm {
        /// Creates `size` connected ranks.
        pub fn group(size: usize) -> Vec<RayonComm> {
            let mailbox: Mailbox = Arc::new(DashMap::new());
            (0..size)
                .map(|rank| RayonComm {
                    rank,
                    size,
                    mailbox: Arc::clone(&mailbox),
                })
                .collect()
        }

        /// Runs `f` once per rank, each on its own pool thread, and returns
        /// the results in rank order.
        pub fn run<R, F>(size: usize, f: F) -> Result<Vec<R>, PdeError>
        where
            R: Send,
            F: Fn(&RayonComm) -> R + Sync,
        {
            let comms = Self::group(size);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(size.max(1))
                .build()
                .map_err(|e| PdeError::CommError {
                    neighbor: 0,
                    reason: e.to_string(),
                })?;
            Ok(pool
                .broadcast(|ctx| comms.get(ctx.index()).map(&f))
                .into_iter()
                .flatten()
                .collect())
        }
    }

    pub struct LocalHandle {
        mailbox: Mailbox,
        key: Key,
    }

    impl Wait for LocalHandle {
        fn wait(self) -> Option<Vec<u8>> {
            let deadline = Instant::now() + RECV_TIMEOUT;
            loop {
                let next = self.mailbox.get_mut(&self.key).and_then(|mut q| q.pop_front());
                if let Some(bytes) = next {
                    return Some(bytes.to_vec());
                }
                if Instant::now() >= deadline {
                    log::warn!(
                        "rank {} gave up waiting for rank {} on tag {}",
                        self.key.1,
                        self.key.0,
                        self.key.2
                    );
                    return None;
                }
                std::thread::yield_now();
            }
        }
    }

    impl Communicator for RayonComm {
        type SendHandle = ();
        type RecvHandle = LocalHandle;

        fn isend(&self, peer: usize, tag: u16, buf: &[u8]) {
            self.mailbox
                .entry((self.rank, peer, tag))
                .or_default()
                .push_back(Bytes::copy_from_slice(buf));
        }

        fn irecv(&self, peer: usize, tag: u16, _buf: &mut [u8]) -> LocalHandle {
            LocalHandle {
                mailbox: Arc::clone(&self.mailbox),
                key: (peer, self.rank, tag),
            }
        }

        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }
    }
}

#[cfg(feature = "rayon")]
pub use rayon_backend::RayonComm;

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::*;
    use mpi::Count;
    use mpi::datatype::PartitionMut;
    use mpi::environment::Universe;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::{Communicator as MpiCommunicator, CommunicatorCollectives, Destination, Source};
    use std::sync::Arc;

    /// `MPI_COMM_WORLD`. Point-to-point sends are standard-mode and complete
    /// before `isend` returns; receives are deferred to `wait`. Gathers use
    /// the native collective.
    pub struct MpiComm {
        world: Arc<SimpleCommunicator>,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    // The universe is only touched again on drop (MPI_Finalize), which
    // happens on the owning thread.
    unsafe impl Send for MpiComm {}
    unsafe impl Sync for MpiComm {}

    impl MpiComm {
        pub fn new() -> Result<Self, PdeError> {
            let universe = mpi::initialize().ok_or_else(|| PdeError::CommError {
                neighbor: 0,
                reason: "MPI was already initialized".into(),
            })?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world: Arc::new(world),
                rank,
                size,
                _universe: universe,
            })
        }
    }

    pub struct MpiRecv {
        world: Arc<SimpleCommunicator>,
        peer: usize,
        tag: u16,
    }

    impl Wait for MpiRecv {
        fn wait(self) -> Option<Vec<u8>> {
            let (data, _status) = self
                .world
                .process_at_rank(self.peer as i32)
                .receive_vec_with_tag::<u8>(self.tag as i32);
            Some(data)
        }
    }

    impl Communicator for MpiComm {
        type SendHandle = ();
        type RecvHandle = MpiRecv;

        fn isend(&self, peer: usize, tag: u16, buf: &[u8]) {
            self.world
                .process_at_rank(peer as i32)
                .send_with_tag(buf, tag as i32);
        }

        fn irecv(&self, peer: usize, tag: u16, _buf: &mut [u8]) -> MpiRecv {
            MpiRecv {
                world: Arc::clone(&self.world),
                peer,
                tag,
            }
        }

        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn all_gather_bytes(&self, _tag: CommTag, local: &[u8]) -> Result<Vec<Vec<u8>>, PdeError> {
            let my_len = Count::try_from(local.len()).map_err(|_| PdeError::CommError {
                neighbor: self.rank,
                reason: format!("{} bytes exceed the MPI count range", local.len()),
            })?;
            let mut counts: Vec<Count> = vec![0; self.size];
            self.world.all_gather_into(&my_len, &mut counts[..]);
            let displs: Vec<Count> = counts
                .iter()
                .scan(0, |acc, &c| {
                    let d = *acc;
                    *acc += c;
                    Some(d)
                })
                .collect();
            let total: usize = counts.iter().map(|&c| c as usize).sum();
            let mut buf = vec![0u8; total];
            {
                let mut partition = PartitionMut::new(&mut buf[..], &counts[..], &displs[..]);
                self.world.all_gather_varcount_into(local, &mut partition);
            }
            Ok(counts
                .iter()
                .zip(&displs)
                .map(|(&c, &d)| buf[d as usize..(d + c) as usize].to_vec())
                .collect())
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_comm_gathers_only_itself() {
        let out = NoComm.all_gather_bytes(CommTag::new(5), &[1, 2, 3]).unwrap();
        assert_eq!(out, vec![vec![1, 2, 3]]);
        assert_eq!((NoComm.rank(), NoComm.size()), (0, 1));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn rayon_roundtrip_two_ranks() {
        let comms = RayonComm::group(2);
        let mut recv_buf = [0u8; 4];
        let recv = comms[1].irecv(0, 7, &mut recv_buf);
        comms[0].isend(1, 7, &[1, 2, 3, 4]).wait();
        let data = recv.wait().expect("rank 0 sent four bytes");
        recv_buf.copy_from_slice(&data);
        assert_eq!(recv_buf, [1, 2, 3, 4]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn same_tag_messages_keep_order() {
        let comms = RayonComm::group(2);
        comms[0].isend(1, 1, b"first");
        comms[0].isend(1, 1, b"second");
        assert_eq!(comms[1].irecv(0, 1, &mut []).wait().unwrap(), b"first");
        assert_eq!(comms[1].irecv(0, 1, &mut []).wait().unwrap(), b"second");
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn gather_over_three_threads() {
        let results = RayonComm::run(3, |comm| {
            let mine = vec![comm.rank() as u8; comm.rank() + 1];
            comm.all_gather_bytes(CommTag::new(40), &mine).unwrap()
        })
        .unwrap();
        assert_eq!(results.len(), 3);
        for gathered in results {
            assert_eq!(gathered, vec![vec![0], vec![1, 1], vec![2, 2, 2]]);
        }
    }
}
