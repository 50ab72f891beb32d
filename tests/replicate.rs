#![cfg(feature = "rayon")]

use cell_pde_mesh::algs::communicator::{CommTag, Communicator, RayonComm, Wait};
use cell_pde_mesh::prelude::*;

#[test]
fn rayon_fifo_order() {
    let comms = RayonComm::group(2);
    for i in 0..10u8 {
        comms[0].isend(1, 0x1001, &[i]);
    }
    let got: Vec<u8> = (0..10)
        .map(|_| {
            let mut b = [0u8; 1];
            comms[1].irecv(0, 0x1001, &mut b).wait().unwrap()[0]
        })
        .collect();
    assert_eq!(got, (0..10).collect::<Vec<u8>>());
}

#[test]
fn gather_handles_empty_contributions() {
    let results = RayonComm::run(3, |comm| {
        let mine: Vec<u8> = if comm.rank() == 1 { vec![] } else { vec![7; 4] };
        comm.all_gather_bytes(CommTag::new(0x2000), &mine)
    })
    .unwrap();
    for gathered in results {
        assert_eq!(gathered.unwrap(), vec![vec![7; 4], vec![], vec![7; 4]]);
    }
}

#[test]
fn every_rank_sees_the_same_vector() {
    let global: Vec<f64> = (0..17).map(|i| (i as f64).sqrt()).collect();
    for size in [1, 2, 3, 5] {
        let results = RayonComm::run(size, |comm| {
            DistributedVector::block_partition(&global, comm.rank(), comm.size())?.replicate(comm)
        })
        .unwrap();
        assert_eq!(results.len(), size);
        for r in results {
            assert_eq!(r.unwrap().as_slice(), global.as_slice(), "size {size}");
        }
    }
}

#[test]
fn more_ranks_than_entries() {
    let global = vec![1.0, 2.0];
    let results = RayonComm::run(4, |comm| {
        DistributedVector::block_partition(&global, comm.rank(), comm.size())?.replicate(comm)
    })
    .unwrap();
    for r in results {
        assert_eq!(r.unwrap().into_vec(), global);
    }
}

#[test]
fn gap_between_shards_is_rejected() {
    let results = RayonComm::run(2, |comm| {
        let shard = if comm.rank() == 0 {
            DistributedVector::from_local_shard(5, 0, vec![1.0, 2.0])
        } else {
            DistributedVector::from_local_shard(5, 3, vec![4.0, 5.0])
        };
        shard?.replicate(comm)
    })
    .unwrap();
    for r in results {
        assert!(matches!(r, Err(PdeError::InvalidLayout(_))));
    }
}

#[test]
fn disagreeing_lengths_are_rejected() {
    let results = RayonComm::run(2, |comm| {
        let global_len = 2 + comm.rank();
        DistributedVector::from_local_shard(global_len, comm.rank(), vec![0.0])?.replicate(comm)
    })
    .unwrap();
    for r in results {
        assert!(matches!(r, Err(PdeError::InvalidLayout(_))));
    }
}
