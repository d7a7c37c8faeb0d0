/// full_seizure: the inference/export path for unsegmented seizure files.
///
///   full_seizure extract --input DV_full.mat --output DV_fv.safetensors
///       writes `fv` [W, F] and `wind` (window markers) for the classifier.
///
///   full_seizure save --input DV_full.mat --classes DV_classes.safetensors \
///                     --output DV_detect.mat
///       writes the detection-result MAT-file (`data.fv`, `data.wind`,
///       `data.classes`) from the classifier's `classes` tensor.
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use eegset::full::{extract, save_detection};
use eegset::io::{read_tensors, take_vector, StWriter};

#[derive(Parser, Debug)]
#[command(name = "full_seizure", about = "Full-seizure feature export and detection results")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Export the feature matrix and window markers of a full-seizure file.
    Extract {
        /// Full-seizure MAT-file.
        #[arg(long)]
        input: PathBuf,

        /// Output safetensors path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Write a detection-result MAT-file.
    Save {
        /// Full-seizure MAT-file the classes were predicted for.
        #[arg(long)]
        input: PathBuf,

        /// safetensors file with one class per window.
        #[arg(long)]
        classes: PathBuf,

        /// Tensor key inside `--classes`.
        #[arg(long, default_value = "classes")]
        key: String,

        /// Output MAT-file (overwritten).
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    match Args::parse().cmd {
        Cmd::Extract { input, output } => {
            let sz = extract(&input).with_context(|| format!("reading {}", input.display()))?;
            let mut w = StWriter::new();
            w.add_f64_arr2("fv", &sz.features);
            w.add_f64_arr2("wind", &sz.markers);
            w.write(&output)?;
            println!("{} windows × {} features → {}",
                sz.features.nrows(), sz.features.ncols(), output.display());
        }
        Cmd::Save { input, classes, key, output } => {
            let sz = extract(&input).with_context(|| format!("reading {}", input.display()))?;
            let mut tensors = read_tensors(&classes)
                .with_context(|| format!("reading {}", classes.display()))?;
            let classes = take_vector(&mut tensors, &key)?;
            if classes.len() != sz.features.nrows() {
                bail!("{} classes for {} windows", classes.len(), sz.features.nrows());
            }
            save_detection(&output, sz.features.view(), classes.view(), sz.markers.view())?;
            println!("Written → {}", output.display());
        }
    }
    Ok(())
}
