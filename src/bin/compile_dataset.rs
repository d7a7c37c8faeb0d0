/// compile_dataset: assemble the seizure/interictal train/test matrices from
/// a directory of feature MAT-files and write them to a safetensors file.
///
/// Output keys:
///   x_train   [N_train, F]   f64  shuffled training rows
///   y_train   [N_train]      f64
///   x_test    [N_test, F]    f64  stacking order (seizure rows, then interictal)
///   y_test    [N_test]       f64
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use eegset::{compile_dataset, io::write_dataset, CompileConfig, StatePolicy, WindowSize};

#[derive(Parser, Debug)]
#[command(name = "compile_dataset", about = "Compile EEG seizure feature datasets")]
struct Args {
    /// Directory holding the <PT>19_EEG_*.mat and 6P19_EEG_*.mat files.
    #[arg(long)]
    data_dir: PathBuf,

    /// Output safetensors path.
    #[arg(long)]
    output: PathBuf,

    /// Feature type in the file names.
    #[arg(long, default_value = "gmi")]
    gmi_type: String,

    /// Window size selector: 10 or 2 (seconds).
    #[arg(long, default_value = "10")]
    win_size: WindowSize,

    /// Labelling threshold in the file names (th=<threshold>).
    #[arg(long, default_value_t = 1)]
    threshold: i32,

    /// State policy: s1, s2 or s1s2.
    #[arg(long, default_value = "s1")]
    policy: StatePolicy,

    /// Fraction of interictal rows sent to the test set.
    #[arg(long, default_value_t = 0.25)]
    inter_test_size: f64,

    /// Longest run of same-seizure windows kept by the s2 policy.
    #[arg(long, default_value_t = 1)]
    max_windows: usize,

    /// RNG seed; omit for a different split every run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = CompileConfig {
        gmi_type: args.gmi_type,
        window_size: args.win_size,
        threshold: args.threshold,
        policy: args.policy,
        inter_test_size: args.inter_test_size,
        max_windows: args.max_windows,
        seed: args.seed,
        ..CompileConfig::default()
    };

    let ds = compile_dataset(&args.data_dir, &cfg)
        .with_context(|| format!("compiling dataset from {}", args.data_dir.display()))?;
    println!("train {} × {}   test {} × {}",
        ds.x_train.nrows(), ds.x_train.ncols(), ds.x_test.nrows(), ds.x_test.ncols());

    write_dataset(&ds, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Written → {}", args.output.display());
    Ok(())
}
