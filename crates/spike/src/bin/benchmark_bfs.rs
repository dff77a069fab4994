use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use seafield_core::{
    compute_distance_field, compute_distance_fields, crop_centered, Cell, Grid, Window,
    DEFAULT_SCALE,
};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Time distance-field and crop passes over synthetic land/sea masks")]
struct Args {
    #[arg(long, default_value_t = 120)]
    rows: usize,
    #[arg(long, default_value_t = 210)]
    cols: usize,
    /// Probability that a cell is land.
    #[arg(long, default_value_t = 0.3)]
    land_fraction: f64,
    /// Number of source cells per run.
    #[arg(long, default_value_t = 64)]
    sources: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn create_mask(args: &Args, rng: &mut ChaCha12Rng) -> Result<Grid> {
    let mask: Vec<u8> = (0..args.rows * args.cols)
        .map(|_| u8::from(rng.random::<f64>() < args.land_fraction))
        .collect();
    Grid::from_mask(args.rows, args.cols, &mask).context("building synthetic mask")
}

fn pick_sea_cells(grid: &Grid, count: usize, rng: &mut ChaCha12Rng) -> Vec<Cell> {
    let sea: Vec<usize> = grid
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_sea())
        .map(|(i, _)| i)
        .collect();
    (0..count)
        .map(|_| grid.cell_at(sea[rng.random_range(0..sea.len())]))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !(0.0..1.0).contains(&args.land_fraction) {
        bail!("land_fraction must be in [0, 1)");
    }
    if args.sources == 0 {
        bail!("need at least one source");
    }
    let mut rng = ChaCha12Rng::seed_from_u64(args.seed);
    let grid = create_mask(&args, &mut rng)?;
    if grid.sea_count() == 0 {
        bail!("synthetic mask has no sea cells; lower --land-fraction");
    }
    let sources = pick_sea_cells(&grid, args.sources, &mut rng);
    println!(
        "Benchmarking {}x{} mask ({} sea cells), {} sources",
        args.rows,
        args.cols,
        grid.sea_count(),
        sources.len()
    );

    // Serial
    let start = Instant::now();
    let mut serial = Vec::with_capacity(sources.len());
    for &source in &sources {
        serial.push(compute_distance_field(&grid, source)?);
    }
    let serial_time = start.elapsed();
    println!(
        "Serial:   {:?} total, {:?} per field",
        serial_time,
        serial_time / sources.len() as u32
    );

    // Parallel batch
    let start = Instant::now();
    let batch = compute_distance_fields(&grid, &sources, DEFAULT_SCALE);
    let batch_time = start.elapsed();
    println!(
        "Parallel: {:?} total, {:?} per field",
        batch_time,
        batch_time / sources.len() as u32
    );

    for (a, b) in serial.iter().zip(batch) {
        if *a != b? {
            bail!("parallel field for {} differs from serial", a.source());
        }
    }

    // Crops around random targets, reference window size
    let window = Window::new(12, 21);
    let targets = pick_sea_cells(&grid, sources.len(), &mut rng);
    let start = Instant::now();
    let clipped = serial
        .iter()
        .zip(&targets)
        .filter(|(field, target)| field.crop(**target, window).is_clipped(window))
        .count();
    let crop_time = start.elapsed();
    println!(
        "Crops:    {:?} total, {} of {} clipped",
        crop_time,
        clipped,
        targets.len()
    );

    let first = &serial[0];
    let oversized = Window::new(args.rows * 2, args.cols * 2);
    let whole = crop_centered(first.values(), first.source(), oversized);
    println!("Oversized crop shape: {:?}", whole.shape());
    Ok(())
}
