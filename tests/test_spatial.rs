use std::collections::HashSet;

use collide_o_scope::core::spatial::{CellKey, GridError, UniformGrid};

fn collect_nearby(grid: &mut UniformGrid, x: f32, y: f32, radius: i32) -> Vec<u32> {
    let mut seen = Vec::new();
    grid.for_each_nearby(x, y, radius, |id| seen.push(id));
    seen
}

#[test]
fn test_constructor_fail_fast() {
    assert!(matches!(
        UniformGrid::new(0.0, 100.0, 10.0),
        Err(GridError::BadDimensions(_, _))
    ));
    assert!(matches!(
        UniformGrid::new(100.0, -5.0, 10.0),
        Err(GridError::BadDimensions(_, _))
    ));
    assert!(matches!(
        UniformGrid::new(100.0, 100.0, 0.0),
        Err(GridError::BadCellSize(_))
    ));
    assert!(matches!(
        UniformGrid::new(100.0, 100.0, f32::NAN),
        Err(GridError::BadCellSize(_))
    ));
    assert!(UniformGrid::new(100.0, 100.0, 10.0).is_ok());
}

#[test]
fn test_derived_dimensions() {
    let grid = UniformGrid::new(100.0, 100.0, 20.0).unwrap();
    assert_eq!(grid.cols(), 5);
    assert_eq!(grid.rows(), 5);

    // Ceil, not floor
    let grid = UniformGrid::new(101.0, 99.0, 20.0).unwrap();
    assert_eq!(grid.cols(), 6);
    assert_eq!(grid.rows(), 5);
}

#[test]
fn test_cell_key_floor_semantics() {
    let grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();

    // Half-open cell boundaries
    assert_eq!(grid.cell_key(9.999, 0.0).col(), 0);
    assert_eq!(grid.cell_key(10.0, 0.0).col(), 1);

    // Negative coordinates floor toward negative infinity, not zero
    assert_eq!(grid.cell_key(-0.001, 0.0).col(), -1);
    assert_eq!(grid.cell_key(-10.001, 0.0).col(), -2);
    assert_eq!(grid.cell_key(0.0, -0.001).row(), -1);
}

#[test]
fn test_cell_key_determinism_and_value_equality() {
    let grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();

    assert_eq!(grid.cell_key(35.0, 45.0), grid.cell_key(35.0, 45.0));
    assert_eq!(grid.cell_key(35.0, 45.0), CellKey::new(3, 4));
    assert_eq!(grid.cell_key(35.0, 45.0), grid.cell_key(39.9, 40.0));
    assert_ne!(grid.cell_key(35.0, 45.0), grid.cell_key(45.0, 35.0));

    // Packing round-trips through accessors, including negatives
    let key = CellKey::new(-7, 123);
    assert_eq!(key.col(), -7);
    assert_eq!(key.row(), 123);
}

#[test]
fn test_insertion_query_completeness() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(0, 5.0, 5.0);
    grid.insert(1, 5.0, 15.0);
    grid.insert(2, 25.0, 25.0);

    // Radius 1 catches the adjacent cell but not two cells away
    let seen = collect_nearby(&mut grid, 5.0, 5.0, 1);
    assert!(seen.contains(&1));
    assert!(!seen.contains(&2));

    // Radius 2 catches all three
    let seen = collect_nearby(&mut grid, 5.0, 5.0, 2);
    assert!(seen.contains(&0) && seen.contains(&1) && seen.contains(&2));
}

#[test]
fn test_self_inclusion() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(7, 42.0, 42.0);

    // Radius 0 searches only the entity's own cell and still reports the
    // querying entity itself; callers self-exclude by id if undesired.
    let seen = collect_nearby(&mut grid, 42.0, 42.0, 0);
    assert_eq!(seen, vec![7]);
}

#[test]
fn test_rebuild_isolation() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(0, 5.0, 5.0);
    grid.insert(1, 5.0, 15.0);

    grid.clear();
    assert!(collect_nearby(&mut grid, 5.0, 5.0, 2).is_empty());
    assert_eq!(grid.occupied_cells(), 0);

    // Repopulation after clear works normally
    grid.insert(9, 5.0, 5.0);
    assert_eq!(collect_nearby(&mut grid, 5.0, 5.0, 0), vec![9]);
}

#[test]
fn test_out_of_bounds_insertion() {
    // Insertion is defined for any finite coordinate, including positions
    // outside the nominal bounds.
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(0, -5.0, -5.0);
    grid.insert(1, 250.0, 300.0);

    assert_eq!(collect_nearby(&mut grid, -1.0, -1.0, 0), vec![0]);
    assert_eq!(collect_nearby(&mut grid, 255.0, 305.0, 1), vec![1]);
}

#[test]
fn test_huge_coordinates_saturate() {
    // A finite but enormous coordinate pins the cell index at the i32
    // edge; neighbor offsets from there must neither overflow nor lose
    // the entity.
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(0, 3.0e38, 3.0e38);
    grid.insert(1, -3.0e38, -3.0e38);

    assert_eq!(grid.cell_key(3.0e38, 3.0e38).col(), i32::MAX);
    assert_eq!(grid.cell_key(-3.0e38, -3.0e38).col(), i32::MIN);

    let seen = collect_nearby(&mut grid, 3.0e38, 3.0e38, 1);
    assert!(seen.contains(&0));
    assert!(!seen.contains(&1));

    let seen = collect_nearby(&mut grid, -3.0e38, -3.0e38, 1);
    assert!(seen.contains(&1));
    assert!(!seen.contains(&0));
}

#[test]
fn test_bucket_insertion_order() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(3, 5.0, 5.0);
    grid.insert(1, 6.0, 6.0);
    grid.insert(2, 7.0, 7.0);

    // Within a bucket, visit order is insertion order; no dedup either
    grid.insert(3, 5.0, 5.0);
    assert_eq!(collect_nearby(&mut grid, 5.0, 5.0, 0), vec![3, 1, 2, 3]);
}

#[test]
fn test_clustered_scenario() {
    // 5x5 grid; three particles share one cell, one sits far away.
    let mut grid = UniformGrid::new(100.0, 100.0, 20.0).unwrap();
    grid.insert(0, 10.0, 10.0);
    grid.insert(1, 12.0, 11.0);
    grid.insert(2, 15.0, 15.0);
    grid.insert(3, 90.0, 90.0);

    let mut seen = collect_nearby(&mut grid, 10.0, 10.0, 1);
    seen.retain(|&id| id != 0); // caller-side self exclusion
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_searched_cell_trace() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap().with_trace();
    grid.insert(0, 55.0, 55.0);

    grid.for_each_nearby(55.0, 55.0, 1, |_| {});
    let searched: HashSet<CellKey> = grid.searched_cells().collect();
    assert_eq!(searched.len(), 9);
    assert!(searched.contains(&CellKey::new(5, 5)));
    assert!(searched.contains(&CellKey::new(4, 4)));
    assert!(searched.contains(&CellKey::new(6, 6)));
    assert_eq!(grid.searched_cell_count(), 9);

    // Trace resets with the frame
    grid.clear();
    assert_eq!(grid.searched_cell_count(), 0);
}

#[test]
fn test_trace_disabled_by_default() {
    let mut grid = UniformGrid::new(100.0, 100.0, 10.0).unwrap();
    grid.insert(0, 5.0, 5.0);
    grid.for_each_nearby(5.0, 5.0, 2, |_| {});

    assert_eq!(grid.searched_cell_count(), 0);
    assert_eq!(grid.searched_cells().count(), 0);
}
