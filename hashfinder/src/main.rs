use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use hashfinder::chained::analysis::ChainStats;
use hashfinder::logger::initialize_logger;
use hashfinder::probing::analysis::ClusterStats;
use hashfinder::trace::ComparisonTrace;
use hashfinder::workload::{self, Workload};
use hashfinder::{ChainedTable, LookupTable, ProbingTable, Search, TableConfig};
use log::{info, warn};
use serde::Serialize;

/// A prime well above the default entry count keeps the probing load factor
/// under 0.1.
const DEFAULT_PROBING_CAPACITY: usize = 1_299_709;
const DEFAULT_CHAINING_CAPACITY: usize = 100_003;
/// Keys below `workload::KEY_RANGE`, all guaranteed misses.
const MISS_SAMPLE: std::ops::Range<i64> = 1..1_001;

#[derive(Parser)]
#[command(name = "hashfinder")]
#[command(version)]
#[command(about = "Compare linear probing and chaining on the same workload", long_about = None)]
struct Cli {
    /// Number of (key, phone) pairs to generate
    #[arg(long, default_value_t = workload::DEFAULT_COUNT)]
    count: usize,

    /// Slot count of the linear-probing table
    #[arg(long, default_value_t = DEFAULT_PROBING_CAPACITY)]
    probing_capacity: usize,

    /// Bucket count of the chained table
    #[arg(long, default_value_t = DEFAULT_CHAINING_CAPACITY)]
    chaining_capacity: usize,

    /// Workload seed
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Write the workload as `key value` lines to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Read keys from stdin after the report (0 or EOF to quit)
    #[arg(long)]
    interactive: bool,
}

#[derive(Debug, Serialize)]
struct LookupReport {
    key: i64,
    found: bool,
    value: Option<String>,
    comparisons: usize,
}

impl LookupReport {
    fn new(key: i64, search: Search<'_>) -> Self {
        Self {
            key,
            found: search.is_found(),
            value: search.value().map(str::to_string),
            comparisons: search.comparisons(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TableReport<S> {
    name: &'static str,
    config: TableConfig,
    len: usize,
    load_factor: f64,
    rejected: usize,
    load_ms: f64,
    hit: Option<LookupReport>,
    miss: LookupReport,
    hit_trace: ComparisonTrace,
    miss_trace: ComparisonTrace,
    stats: S,
}

#[derive(Debug, Serialize)]
struct Report {
    count: usize,
    seed: u64,
    probing: TableReport<ClusterStats>,
    chained: TableReport<ChainStats>,
}

/// Replays the workload in order. Returns the number of rejected inserts and
/// the elapsed wall time in milliseconds.
fn load<T: LookupTable>(name: &str, table: &mut T, workload: &Workload) -> (usize, f64) {
    let start = Instant::now();
    let mut rejected = 0usize;
    for (key, value) in &workload.pairs {
        if table.insert(*key, value.clone()).is_err() {
            rejected += 1;
        }
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

    if rejected > 0 {
        warn!("{name}: {rejected} inserts rejected, table capacity {}", table.capacity());
    }
    info!(
        "{name}: loaded {} keys in {elapsed_ms:.3} ms (load factor {:.4})",
        table.len(),
        table.load_factor()
    );
    (rejected, elapsed_ms)
}

fn table_report<T: LookupTable, S>(
    name: &'static str,
    table: &T,
    config: TableConfig,
    (rejected, load_ms): (usize, f64),
    workload: &Workload,
    stats: S,
) -> TableReport<S> {
    TableReport {
        name,
        config,
        len: table.len(),
        load_factor: table.load_factor(),
        rejected,
        load_ms,
        hit: workload
            .hit_key()
            .map(|key| LookupReport::new(key, table.search(key))),
        miss: LookupReport::new(workload::MISS_KEY, table.search(workload::MISS_KEY)),
        hit_trace: ComparisonTrace::record(table, &workload.keys().collect::<Vec<_>>()),
        miss_trace: ComparisonTrace::record(table, &MISS_SAMPLE.collect::<Vec<_>>()),
        stats,
    }
}

fn dump_workload(path: &Path, workload: &Workload) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (key, value) in &workload.pairs {
        writeln!(out, "{key} {value}")?;
    }
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} pairs to {}", workload.len(), path.display());
    Ok(())
}

fn print_lookup(label: &str, lookup: &LookupReport) {
    match &lookup.value {
        Some(value) => println!(
            "  {label}: key {} -> {value} ({} comparisons)",
            lookup.key, lookup.comparisons
        ),
        None => println!(
            "  {label}: key {} not found ({} comparisons)",
            lookup.key, lookup.comparisons
        ),
    }
}

fn print_table<S>(report: &TableReport<S>) {
    println!("=== {} (capacity {}) ===", report.name, report.config.capacity);
    println!(
        "  loaded {} keys in {:.3} ms, load factor {:.4}, rejected {}",
        report.len, report.load_ms, report.load_factor, report.rejected
    );
    if let Some(hit) = &report.hit {
        print_lookup("hit", hit);
    }
    print_lookup("miss", &report.miss);
    println!(
        "  mean comparisons: hit {:.4} (max {}), miss {:.4} (max {})",
        report.hit_trace.mean_hit_comparisons(),
        report.hit_trace.max_comparisons,
        report.miss_trace.mean_miss_comparisons(),
        report.miss_trace.max_comparisons
    );
}

fn print_report(report: &Report) {
    print_table(&report.probing);
    let clusters = &report.probing.stats;
    println!(
        "  clusters {}, longest {}, mean displacement {:.4}, max displacement {}",
        clusters.clusters,
        clusters.longest_cluster,
        clusters.mean_displacement(),
        clusters.max_displacement
    );
    println!();

    print_table(&report.chained);
    let chains = &report.chained.stats;
    println!(
        "  empty buckets {}, longest chain {}, mean non-empty chain {:.4}",
        chains.empty_buckets,
        chains.longest_chain,
        chains.mean_nonempty_chain()
    );
}

fn interactive(probing: &ProbingTable, chained: &ChainedTable) -> Result<()> {
    let stdin = io::stdin();
    print!("key (0 to quit): ");
    io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key: i64 = match trimmed.parse() {
            Ok(key) => key,
            Err(e) => {
                warn!("ignoring {trimmed:?}: {e}");
                continue;
            }
        };
        if key == 0 {
            break;
        }

        print_lookup("linear probing", &LookupReport::new(key, probing.search(key)));
        print_lookup("chaining", &LookupReport::new(key, chained.search(key)));
        print!("key (0 to quit): ");
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    initialize_logger();
    let cli = Cli::parse();

    info!("generating {} pairs (seed {:#x})", cli.count, cli.seed);
    let workload = Workload::generate(cli.count, cli.seed);

    if let Some(path) = &cli.dump {
        // The comparison does not need the file; report and carry on.
        if let Err(e) = dump_workload(path, &workload) {
            warn!("dump failed: {e:#}");
        }
    }

    let probing_config = TableConfig::new(cli.probing_capacity);
    let chaining_config = TableConfig::new(cli.chaining_capacity);
    let mut probing = ProbingTable::new(probing_config).context("building probing table")?;
    let mut chained = ChainedTable::new(chaining_config).context("building chained table")?;

    let probing_load = load("linear probing", &mut probing, &workload);
    let chained_load = load("chaining", &mut chained, &workload);

    let report = Report {
        count: workload.len(),
        seed: workload.seed,
        probing: table_report(
            "linear probing",
            &probing,
            probing_config,
            probing_load,
            &workload,
            probing.cluster_stats(),
        ),
        chained: table_report(
            "chaining",
            &chained,
            chaining_config,
            chained_load,
            &workload,
            chained.chain_stats(),
        ),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if cli.interactive {
        interactive(&probing, &chained)?;
    }

    Ok(())
}
