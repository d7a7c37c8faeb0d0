/// mat_info: print the variable / field tree of a MAT-file.
///
/// Useful for checking that a feature file carries the `data` struct with the
/// fields the loaders expect (`fv`, `label`, `Seizure`, `wind`).
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use eegset::mat::{read_mat, MatArray, MatData};

#[derive(Parser, Debug)]
#[command(name = "mat_info")]
struct Args {
    /// MAT-file to inspect.
    input: PathBuf,

    /// How many struct elements / cells to expand per array.
    #[arg(long, default_value_t = 1)]
    expand: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mat = read_mat(&args.input)?;
    println!("{}", mat.header_text);
    println!("byte order: {:?}", mat.endian);
    for (name, arr) in &mat.variables {
        print_array(name, arr, 0, args.expand);
    }
    Ok(())
}

fn print_array(name: &str, arr: &MatArray, depth: usize, expand: usize) {
    let indent = "  ".repeat(depth);
    let dims: Vec<String> = arr.dims.iter().map(usize::to_string).collect();
    print!("{indent}{name}: {} {}", dims.join("×"), arr.class_name());
    match &arr.data {
        MatData::Char(s) => println!(" {s:?}"),
        MatData::Numeric { real, .. } if real.len() <= 4 => println!(" {real:?}"),
        MatData::Numeric { .. } => println!(),
        MatData::Cell(cells) => {
            println!();
            for (i, c) in cells.iter().take(expand).enumerate() {
                print_array(&format!("{{{i}}}"), c, depth + 1, expand);
            }
        }
        MatData::Struct { fields, elements } => {
            println!(" fields {fields:?}");
            for (i, el) in elements.iter().take(expand).enumerate() {
                println!("{indent}  ({i})");
                for (f, v) in fields.iter().zip(el) {
                    print_array(f, v, depth + 2, expand);
                }
            }
        }
    }
}
