mod common;
use common::SimulationBuilder;

use blops_lib::model::spatial_hash::SpatialIndex;
use blops_lib::model::{Blop, SpeciesId};
use proptest::prelude::*;

prop_compose! {
    fn arb_blop(width: f64, height: f64)(
        x in 15.0f64..width - 15.0,
        y in 15.0f64..height - 15.0,
        vx in -500.0f64..500.0,
        vy in -500.0f64..500.0,
        species in 0u16..3
    ) -> Blop {
        Blop::new(x, y, SpeciesId(species)).with_velocity(vx, vy)
    }
}

prop_compose! {
    fn arb_relations()(
        values in prop::collection::vec(-1.0f64..=1.0, 9)
    ) -> Vec<Vec<f64>> {
        values.chunks(3).map(<[f64]>::to_vec).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_speed_and_containment_hold_after_every_tick(
        blops in prop::collection::vec(arb_blop(800.0, 600.0), 1..60),
        relations in arb_relations(),
        dt in 0.0f64..0.25,
        seed in any::<u64>(),
    ) {
        let mut sim = SimulationBuilder::new()
            .with_relations(relations)
            .with_bounds(800.0, 600.0)
            .with_seed(seed)
            .with_blops(blops)
            .build();

        for _ in 0..5 {
            sim.advance(dt);
            for b in sim.blops() {
                prop_assert!(b.velocity.speed_sq() <= 110.0 * 110.0 * (1.0 + 1e-12),
                    "speed {} over cap", b.velocity.speed());
                prop_assert!(sim.bounds().contains(&b.position, 15.0),
                    "position {:?} outside margin", b.position);
                prop_assert!(b.position.x.is_finite() && b.position.y.is_finite());
            }
        }
    }

    #[test]
    fn test_population_and_species_are_conserved(
        blops in prop::collection::vec(arb_blop(1000.0, 1000.0), 0..40),
        relations in arb_relations(),
    ) {
        let species_before: Vec<SpeciesId> = blops.iter().map(|b| b.species).collect();
        let mut sim = SimulationBuilder::new()
            .with_relations(relations)
            .with_blops(blops)
            .build();

        for _ in 0..3 {
            sim.advance(1.0 / 60.0);
        }
        let species_after: Vec<SpeciesId> = sim.blops().iter().map(|b| b.species).collect();
        prop_assert_eq!(species_before, species_after);
    }

    #[test]
    fn test_every_indexed_blop_is_in_its_own_cell(
        blops in prop::collection::vec(arb_blop(1920.0, 1080.0), 1..100),
        cell_size in 20.0f64..400.0,
    ) {
        let mut index = SpatialIndex::new(cell_size);
        index.rebuild(&blops);

        prop_assert_eq!(index.len(), blops.len());
        for (i, b) in blops.iter().enumerate() {
            let (cx, cy) = index.cell_of_position(&b.position).unwrap();
            prop_assert!(index.cell(cx, cy).contains(&i));
            prop_assert!(index.neighbors_of(cx, cy).any(|j| j == i));
        }
        let stored: usize = index.occupied_cells().map(|(_, v)| v.len()).sum();
        prop_assert_eq!(stored, blops.len());
    }
}
