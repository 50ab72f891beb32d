mod util;

use cell_pde_mesh::prelude::*;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use util::*;

fn cloud() -> impl Strategy<Value = Vec<[f64; 2]>> {
    vec((-50.0f64..50.0, -50.0f64..50.0).prop_map(|(x, y)| [x, y]), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn node_cloud_mesh_matches_cells(points in cloud()) {
        let pop = node_population(&points);
        let first = build_fe_mesh(&pop).unwrap();
        prop_assert!(first.is_owned());
        prop_assert_eq!(first.num_nodes(), pop.num_real_cells());
        let second = build_fe_mesh(&pop).unwrap();
        prop_assert_eq!(first.nodes(), second.nodes());
    }

    #[test]
    fn automaton_scatter_is_a_bijection(
        sites in btree_set(0usize..400, 0..30),
        seed in any::<u64>(),
    ) {
        let lattice = Lattice::new([20, 20], 1.0).unwrap();
        let mut order: Vec<usize> = sites.into_iter().collect();
        // iteration order must not depend on site order
        let shift = (seed as usize) % order.len().max(1);
        order.rotate_left(shift);
        let cells = order.iter().enumerate().map(|(i, &s)| (Cell::new(i as u64), s)).collect();
        let mut pop: CellPopulation<2> = SiteBasedCellPopulation::new(lattice, cells).unwrap().into();

        let mesh = build_fe_mesh(&pop).unwrap();
        prop_assert_eq!(mesh.num_nodes(), order.len());
        let indices = tet_node_indices(&pop);
        prop_assert_eq!(&indices, &(0..order.len()).collect::<Vec<_>>());

        let solution: Vec<f64> = (0..order.len()).map(|i| i as f64 + 0.5).collect();
        scatter_to_cells(&mut pop, &solution.clone().into(), "u").unwrap();
        for (site, value) in pop.sites().zip(cell_values(&pop, "u")) {
            prop_assert_eq!(value, Some(solution[site.ordinal]));
            prop_assert_eq!(*mesh.node(site.ordinal).unwrap().location(), site.centre);
        }
    }

    #[test]
    fn node_indices_stay_contiguous_under_death(
        points in vec((0.0f64..1.0, 0.0f64..1.0).prop_map(|(x, y)| [x, y]), 1..30),
        deaths in vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut pop = NodeBasedCellPopulation::new(
            points.iter().enumerate().map(|(i, p)| (Cell::new(i as u64), *p)).collect(),
        ).unwrap();
        for d in deaths {
            if pop.num_real_cells() == 0 {
                break;
            }
            pop.remove_cell(d.index(pop.num_real_cells()));
        }
        for (i, node) in pop.nodes().iter().enumerate() {
            prop_assert_eq!(node.index(), i);
        }
        let pop: CellPopulation<2> = pop.into();
        let mesh = build_fe_mesh(&pop).unwrap();
        prop_assert_eq!(mesh.num_nodes(), pop.num_real_cells());
    }
}
