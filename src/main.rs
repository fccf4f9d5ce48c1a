use clap::{Parser, ValueEnum};

use boot_split_distances::distances::MIN_SHARED_TAXA;
use boot_split_distances::io::load_tree_dir;
use boot_split_distances::matrix::{
    DistanceKind, build_bsd_matrix, build_rf_matrix, write_matrix_csv,
};
use boot_split_distances::namespace::TaxonNamespace;
use boot_split_distances::splits::SplitSet;
use std::path::PathBuf;
use std::time::Instant;

/// Compute pairwise weighted Robinson-Foulds and Boot-Split distances for a
/// directory of bootstrapped trees and write labeled distance matrices (CSV).
#[derive(Parser, Debug)]
#[command(
    name = "boot-split-distances",
    version,
    about = "Pairwise RF and Boot-Split distance matrices for bootstrapped trees"
)]
struct Args {
    /// Directory containing one Newick tree per .treefile
    tree_dir: PathBuf,

    /// Directory the matrix files are written into
    #[arg(short = 'o', long = "outdir", default_value = ".")]
    outdir: PathBuf,

    /// Distance matrix to produce: rf | bsd | both
    #[arg(long = "metric", value_enum, default_value_t = MetricArg::Both)]
    metric: MetricArg,

    /// Quiet mode: suppresses progress messages on stdout
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MetricArg {
    Rf,
    Bsd,
    Both,
}

fn main() {
    let args = Args::parse();

    let t0 = Instant::now();
    let named_trees = match load_tree_dir(&args.tree_dir) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if named_trees.is_empty() {
        eprintln!("No .treefile trees found in {:?}.", args.tree_dir);
        std::process::exit(2);
    }
    let read_s = t0.elapsed().as_secs_f64();
    log_if(!args.quiet, format!("Reading tree files {read_s:.3}s"));

    let (labels, trees): (Vec<String>, Vec<_>) = named_trees.into_iter().unzip();

    // One namespace across all trees so split bitmasks are comparable.
    let t1 = Instant::now();
    let namespace = match TaxonNamespace::from_trees(&trees) {
        Ok(ns) => ns,
        Err(e) => {
            eprintln!("Failed to build taxon namespace: {e}");
            std::process::exit(3);
        }
    };
    if namespace.len() < MIN_SHARED_TAXA {
        eprintln!(
            "Only {} taxa across all trees; BSD needs at least {MIN_SHARED_TAXA}.",
            namespace.len()
        );
        std::process::exit(3);
    }

    let sets = match trees
        .iter()
        .map(|t| SplitSet::from_tree(t, &namespace))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to extract splits: {e}");
            std::process::exit(3);
        }
    };
    let split_s = t1.elapsed().as_secs_f64();
    log_if(
        !args.quiet,
        format!(
            "Encoded splits for {} trees over {} taxa {split_s:.3}s",
            sets.len(),
            namespace.len()
        ),
    );

    let pair_count = labels.len() * (labels.len() - 1) / 2;
    let kinds: &[DistanceKind] = match args.metric {
        MetricArg::Rf => &[DistanceKind::Rf],
        MetricArg::Bsd => &[DistanceKind::Bsd],
        MetricArg::Both => &[DistanceKind::Rf, DistanceKind::Bsd],
    };

    for &kind in kinds {
        let t2 = Instant::now();
        let (matrix, name) = match kind {
            DistanceKind::Rf => (build_rf_matrix(&labels, &sets), "RF"),
            DistanceKind::Bsd => (build_bsd_matrix(&labels, &sets), "BSD"),
        };
        let comp_s = t2.elapsed().as_secs_f64();
        log_if(
            !args.quiet,
            format!("Determining distances using {name} for {pair_count} combinations {comp_s:.3}s"),
        );

        let t3 = Instant::now();
        let out_path = args.outdir.join(kind.file_name());
        if let Err(e) = write_matrix_csv(&out_path, &matrix) {
            eprintln!("Failed to write output {out_path:?}: {e}");
            std::process::exit(4);
        }
        let write_s = t3.elapsed().as_secs_f64();
        log_if(
            !args.quiet,
            format!("Writing {out_path:?} {write_s:.3}s"),
        );
    }
}

fn log_if(show: bool, msg: String) {
    if show {
        println!("{}", msg);
    }
}
