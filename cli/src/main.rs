use anyhow::{ensure, Context, Result};
use bucketmap::HashTable;
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{Duration, Instant};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

#[derive(Parser)]
#[command(
    version,
    about = "Stress and correctness drivers for the bucketmap hash table"
)]
struct Args {
    /// More log output; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// No log output at all
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert, look up and erase many random keys, timing each phase
    Bench {
        /// Number of random pairs to insert
        #[arg(long, default_value_t = 1_000_000)]
        count: usize,

        /// Seed for the pair generator
        #[arg(long, default_value_t = 2)]
        seed: u64,

        /// Result slots offered to each lookup
        #[arg(long, default_value_t = 10)]
        results: usize,

        /// Expected capacity to size the table for, if not `count`
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Insert random pairs and verify lookups and erases against them
    Check {
        /// Number of random pairs to insert
        #[arg(long, default_value_t = 20)]
        count: usize,

        /// Seed for the pair generator
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

#[derive(Debug, Clone, Copy, Display, EnumCount, EnumIter)]
enum Phase {
    Put,
    Get,
    Erase,
}

fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .module(module_path!())
        .module("bucketmap")
        .quiet(args.quiet)
        .verbosity(usize::from(args.verbose) + 1)
        .init()
        .context("installing logger")?;

    match args.command {
        Command::Bench {
            count,
            seed,
            results,
            capacity,
        } => bench(count, seed, results, capacity.unwrap_or(count)),
        Command::Check { count, seed } => check(count, seed),
    }
}

fn random_pairs(count: usize, seed: u64) -> Vec<(i32, i32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| (rng.gen(), rng.gen())).collect()
}

fn bench(count: usize, seed: u64, results: usize, capacity: usize) -> Result<()> {
    let pairs = random_pairs(count, seed);
    let mut table = HashTable::new(capacity).context("allocating table")?;
    log::info!(
        "Performing stress test. Inserting, getting, and erasing {} keys in {} buckets",
        count,
        table.bucket_count()
    );

    let mut timings = [Duration::ZERO; Phase::COUNT];

    let start = Instant::now();
    for &(key, value) in &pairs {
        table.put(key, value)?;
    }
    timings[Phase::Put as usize] = start.elapsed();
    log::info!(
        "Finished put, load factor {:.2}, longest bucket {}",
        table.load_factor(),
        table.max_bucket_len()
    );

    let mut vals = vec![0; results];
    let mut matches = 0;
    let start = Instant::now();
    for &(key, _) in &pairs {
        matches += table.get(key, &mut vals);
    }
    timings[Phase::Get as usize] = start.elapsed();
    log::info!("Finished get, {} matches", matches);

    let start = Instant::now();
    for &(key, _) in &pairs {
        table.erase(key);
    }
    timings[Phase::Erase as usize] = start.elapsed();

    ensure!(
        table.is_empty(),
        "{} entries left after erasing every key",
        table.size()
    );
    table.free();

    for phase in Phase::iter() {
        println!("{:>6}: {:?}", phase, timings[phase as usize]);
    }
    println!("Took {:?}", timings.iter().sum::<Duration>());
    Ok(())
}

fn check(count: usize, seed: u64) -> Result<()> {
    let pairs = random_pairs(count, seed);
    let mut table = HashTable::new(count).context("allocating table")?;

    log::info!("Inserting {} key-value pairs", count);
    for &(key, value) in &pairs {
        table.put(key, value)?;
        log::debug!("\t({} -> {})", key, value);
    }
    ensure!(
        table.size() == count,
        "table reports {} entries after {} inserts",
        table.size(),
        count
    );

    let mut results = vec![0; 1];
    for &(key, value) in &pairs {
        let mut found = table.get(key, &mut results);
        if found > results.len() {
            results.resize(found, 0);
            found = table.get(key, &mut results);
        }
        ensure!(
            results[..found].contains(&value),
            "key {} returned {:?}, expected it to include {}",
            key,
            &results[..found],
            value
        );
    }
    println!("Passed tests for putting and getting.");

    for &(key, _) in &pairs {
        table.erase(key);
        let found = table.get(key, &mut results);
        ensure!(
            found == 0,
            "key {} still has {} matches after erase",
            key,
            found
        );
    }
    ensure!(
        table.is_empty(),
        "{} entries left after erasing every key",
        table.size()
    );
    println!("Passed tests for erasing.");
    Ok(())
}
