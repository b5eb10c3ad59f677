use blops_lib::model::spatial_hash::SpatialIndex;
use blops_lib::model::{Blop, SpeciesId};

fn blop(x: f64, y: f64) -> Blop {
    Blop::new(x, y, SpeciesId(0))
}

#[test]
fn test_spatial_index_overflow_protection() {
    let index = SpatialIndex::new(5.0);

    let huge = i32::MAX as f64 * 10.0;
    assert!(
        index.cell_of(huge, huge).is_none(),
        "Should return None for overflow coordinates"
    );
    assert!(
        index.cell_of(-huge, -huge).is_none(),
        "Should return None for negative overflow coordinates"
    );
}

#[test]
fn test_spatial_index_non_finite_safety() {
    let index = SpatialIndex::new(200.0);

    assert!(index.cell_of(f64::NAN, 50.0).is_none());
    assert!(index.cell_of(50.0, f64::NAN).is_none());
    assert!(index.cell_of(f64::INFINITY, 50.0).is_none());
    assert!(index.cell_of(50.0, f64::NEG_INFINITY).is_none());
}

#[test]
fn test_unindexable_blops_are_skipped() {
    let mut index = SpatialIndex::new(200.0);
    index.rebuild(&[blop(10.0, 10.0), blop(f64::NAN, 10.0), blop(30.0, 30.0)]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.cell(0, 0), &[0, 2]);
}

#[test]
fn test_neighbor_query_is_mutual_across_adjacent_cells() {
    // (210, 100) and (460, 100) fall in cells (1, 0) and (2, 0)
    let mut index = SpatialIndex::new(200.0);
    index.rebuild(&[blop(210.0, 100.0), blop(460.0, 100.0)]);

    let (cx, cy) = index.cell_of(210.0, 100.0).unwrap();
    let found: Vec<usize> = index.neighbors_of(cx, cy).collect();
    assert!(found.contains(&0));
    assert!(found.contains(&1), "adjacent cell must be visible: {found:?}");

    let (cx, cy) = index.cell_of(460.0, 100.0).unwrap();
    assert_eq!((cx, cy), (2, 0));
    let back: Vec<usize> = index.neighbors_of(cx, cy).collect();
    assert!(back.contains(&0), "query must see back across the edge: {back:?}");
    assert!(back.contains(&1));
}

#[test]
fn test_neighbor_query_excludes_distant_cells() {
    let mut index = SpatialIndex::new(200.0);
    index.rebuild(&[blop(10.0, 10.0), blop(650.0, 10.0), blop(10.0, 650.0)]);

    let found: Vec<usize> = index.neighbors_of(0, 0).collect();
    assert_eq!(found, vec![0]);
}

#[test]
fn test_negative_coordinates_floor() {
    let index = SpatialIndex::new(200.0);
    assert_eq!(index.cell_of(-0.5, -0.5), Some((-1, -1)));
    assert_eq!(index.cell_of(-200.0, 199.9), Some((-1, 0)));
}

#[test]
fn test_query_at_extreme_cell_does_not_overflow() {
    let mut index = SpatialIndex::new(1.0);
    index.rebuild(&[blop(0.0, 0.0)]);

    assert_eq!(index.neighbors_of(i32::MAX, i32::MIN).count(), 0);
    assert_eq!(index.count_nearby(i32::MIN, i32::MAX), 0);
}

#[test]
fn test_rebuild_is_idempotent() {
    let blops: Vec<Blop> = (0..50)
        .map(|i| blop((i * 37 % 1000) as f64, (i * 91 % 700) as f64))
        .collect();

    let mut first = SpatialIndex::new(200.0);
    first.rebuild(&blops);
    let mut second = SpatialIndex::new(200.0);
    second.rebuild(&blops);
    second.rebuild(&blops);

    let mut a: Vec<_> = first.occupied_cells().map(|(c, v)| (c, v.to_vec())).collect();
    let mut b: Vec<_> = second.occupied_cells().map(|(c, v)| (c, v.to_vec())).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
    assert_eq!(first.len(), second.len());
}

#[test]
fn test_rebuild_drops_stale_entries() {
    let mut index = SpatialIndex::new(200.0);
    index.rebuild(&[blop(10.0, 10.0), blop(500.0, 500.0)]);
    index.rebuild(&[blop(900.0, 900.0)]);

    assert_eq!(index.len(), 1);
    assert!(index.cell(0, 0).is_empty());
    assert!(index.cell(2, 2).is_empty());
    assert_eq!(index.cell(4, 4), &[0]);
    assert_eq!(index.occupied_cell_count(), 1);
}
