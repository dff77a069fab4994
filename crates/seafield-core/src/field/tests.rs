use super::*;
use crate::grid::CellState;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

const INF: f64 = f64::INFINITY;

fn grid_from(rows: usize, cols: usize, mask: &[u8]) -> Grid {
    Grid::from_mask(rows, cols, mask).unwrap()
}

fn random_grid(rng: &mut ChaCha12Rng, rows: usize, cols: usize, land_fraction: f64) -> Grid {
    let mask: Vec<u8> = (0..rows * cols)
        .map(|_| u8::from(rng.random::<f64>() < land_fraction))
        .collect();
    grid_from(rows, cols, &mask)
}

fn first_sea(grid: &Grid) -> Option<Cell> {
    grid.as_slice()
        .iter()
        .position(|s| s.is_sea())
        .map(|i| grid.cell_at(i))
}

/// Repeated relaxation until nothing changes; slow but obviously correct.
fn relaxed_hops(grid: &Grid, source: Cell) -> Vec<Option<usize>> {
    let (rows, cols) = grid.shape();
    let mut hops = vec![None; rows * cols];
    hops[grid.index_of(source).unwrap()] = Some(0usize);
    loop {
        let mut changed = false;
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                if !grid.as_slice()[i].is_sea() {
                    continue;
                }
                let mut best = hops[i];
                let neighbors = [
                    (r > 0).then(|| i - cols),
                    (r + 1 < rows).then(|| i + cols),
                    (c > 0).then(|| i - 1),
                    (c + 1 < cols).then(|| i + 1),
                ];
                for n in neighbors.into_iter().flatten() {
                    if let Some(h) = hops[n] {
                        if best.map_or(true, |b| h + 1 < b) {
                            best = Some(h + 1);
                        }
                    }
                }
                if best != hops[i] {
                    hops[i] = best;
                    changed = true;
                }
            }
        }
        if !changed {
            return hops;
        }
    }
}

#[test]
fn open_three_by_three_from_center() {
    let grid = grid_from(3, 3, &[0; 9]);
    let field = compute_distance_field(&grid, Cell::new(1, 1)).unwrap();
    let expected: Vec<f64> = [2.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 2.0]
        .iter()
        .map(|h| h / DEFAULT_SCALE)
        .collect();
    assert_eq!(field.values().as_slice(), expected.as_slice());
    assert_eq!(field.source(), Cell::new(1, 1));
    assert_eq!(field.scale(), 300.0);
}

#[test]
fn land_blocks_the_only_corridor() {
    let grid = grid_from(1, 5, &[0, 1, 0, 0, 0]);
    let field = compute_distance_field(&grid, Cell::new(0, 0)).unwrap();
    assert_eq!(field.values().as_slice(), &[0.0, INF, INF, INF, INF]);
    assert_eq!(field.reachable_count(), 1);
    assert!(!field.is_reachable(Cell::new(0, 2)));
}

#[test]
fn detour_around_land_counts_every_hop() {
    #[rustfmt::skip]
    let grid = grid_from(3, 3, &[
        0, 1, 0,
        0, 1, 0,
        0, 0, 0,
    ]);
    let field = compute_distance_field(&grid, Cell::new(0, 0)).unwrap();
    assert_eq!(field.hops(Cell::new(0, 2)), Some(6));
    assert_eq!(field.hops(Cell::new(2, 1)), Some(3));
    assert_eq!(field.hops(Cell::new(0, 1)), None);
    assert_eq!(field.max_finite(), Some(6.0 / DEFAULT_SCALE));
}

#[test]
fn land_start_is_rejected() {
    let grid = grid_from(1, 3, &[1, 0, 0]);
    assert_eq!(
        compute_distance_field(&grid, Cell::new(0, 0)),
        Err(FieldError::InvalidStart {
            cell: Cell::new(0, 0)
        })
    );
}

#[test]
fn out_of_range_start_is_rejected() {
    let grid = grid_from(2, 2, &[0; 4]);
    let err = compute_distance_field(&grid, Cell::new(2, 0)).unwrap_err();
    assert!(matches!(err, FieldError::InvalidStart { .. }));
    let err = compute_distance_field(&grid, Cell::new(0, 7)).unwrap_err();
    assert!(matches!(err, FieldError::InvalidStart { .. }));
}

#[test]
fn scale_must_be_finite_and_positive() {
    let grid = grid_from(1, 2, &[0, 0]);
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = compute_distance_field_scaled(&grid, Cell::new(0, 0), scale).unwrap_err();
        assert!(matches!(err, FieldError::InvalidScale { .. }));
    }
}

#[test]
fn tiny_scale_that_overflows_is_rejected() {
    let grid = grid_from(1, 3, &[0; 3]);
    assert_eq!(
        compute_distance_field_scaled(&grid, Cell::new(0, 0), 1e-310),
        Err(FieldError::InvalidScale { scale: 1e-310 })
    );

    // No hops to divide, so nothing can overflow.
    let single = grid_from(1, 1, &[0]);
    let field = compute_distance_field_scaled(&single, Cell::new(0, 0), 1e-310).unwrap();
    assert_eq!(field.values().as_slice(), &[0.0]);
}

#[test]
fn custom_scale_divides_hop_counts() {
    let grid = grid_from(1, 4, &[0; 4]);
    let field = compute_distance_field_scaled(&grid, Cell::new(0, 0), 2.0).unwrap();
    assert_eq!(field.values().as_slice(), &[0.0, 0.5, 1.0, 1.5]);
    assert_eq!(field.hops(Cell::new(0, 3)), Some(3));
}

#[test]
fn single_cell_grid() {
    let grid = grid_from(1, 1, &[0]);
    let field = compute_distance_field(&grid, Cell::new(0, 0)).unwrap();
    assert_eq!(field.values().as_slice(), &[0.0]);
}

#[test]
fn matches_relaxation_on_random_grids() {
    let mut rng = ChaCha12Rng::seed_from_u64(7);
    for _ in 0..25 {
        let rows = rng.random_range(1..20);
        let cols = rng.random_range(1..20);
        let grid = random_grid(&mut rng, rows, cols, 0.35);
        let Some(source) = first_sea(&grid) else {
            continue;
        };
        let field = compute_distance_field(&grid, source).unwrap();
        let expected = relaxed_hops(&grid, source);
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(field.hops(grid.cell_at(i)), *want, "cell {}", grid.cell_at(i));
        }
    }
}

#[test]
fn land_is_always_infinite_and_source_zero() {
    let mut rng = ChaCha12Rng::seed_from_u64(42);
    let grid = random_grid(&mut rng, 40, 60, 0.3);
    let source = first_sea(&grid).unwrap();
    let field = compute_distance_field(&grid, source).unwrap();
    assert_eq!(field.get(source), Some(0.0));
    for (state, value) in grid.as_slice().iter().zip(field.values().as_slice()) {
        if *state == CellState::Land {
            assert_eq!(*value, INF);
        } else {
            assert!(*value >= 0.0);
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let mut rng = ChaCha12Rng::seed_from_u64(3);
    let grid = random_grid(&mut rng, 64, 64, 0.25);
    let source = first_sea(&grid).unwrap();
    let a = compute_distance_field(&grid, source).unwrap();
    let b = compute_distance_field(&grid, source).unwrap();
    let bits = |f: &DistanceField| -> Vec<u64> {
        f.values().as_slice().iter().map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn f32_narrowing_keeps_infinity() {
    let grid = grid_from(1, 3, &[0, 1, 0]);
    let field = compute_distance_field(&grid, Cell::new(0, 0)).unwrap();
    let narrow = field.to_f32();
    assert_eq!(narrow.as_slice(), &[0.0, f32::INFINITY, f32::INFINITY]);
}

#[test]
fn crop_of_field_is_centered_on_target() {
    let grid = grid_from(5, 5, &[0; 25]);
    let field = compute_distance_field(&grid, Cell::new(0, 0)).unwrap();
    let crop = field.crop(Cell::new(2, 2), Window::new(3, 3));
    assert_eq!(crop.shape(), (3, 3));
    assert_eq!(crop.get(crop.center_offset()), Some(&(4.0 / DEFAULT_SCALE)));
}

#[test]
fn batch_keeps_source_order_and_isolates_errors() {
    #[rustfmt::skip]
    let grid = grid_from(2, 3, &[
        0, 0, 1,
        0, 0, 0,
    ]);
    let sources = [Cell::new(0, 0), Cell::new(0, 2), Cell::new(1, 2)];
    let results = compute_distance_fields(&grid, &sources, DEFAULT_SCALE);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().source(), Cell::new(0, 0));
    assert!(matches!(
        results[1],
        Err(FieldError::InvalidStart { .. })
    ));
    let last = results[2].as_ref().unwrap();
    assert_eq!(last.hops(Cell::new(0, 0)), Some(3));
    assert_eq!(
        last,
        &compute_distance_field(&grid, Cell::new(1, 2)).unwrap()
    );
}
