//! Wraps a file-processing function, calls it twice and prints its metadata.
//!
//! Run with `cargo run -p pathrole-effects --example process_file`.

use std::fs;
use std::io;

use anyhow::Result;
use pathrole_effects::{Arguments, BoundArguments, EffectConfig, ModelBuilder, TypeTag};

fn process_file(args: &BoundArguments) -> io::Result<()> {
    let input = args.path("input_path").ok_or_else(|| io::Error::other("input_path unbound"))?;
    let output = args.path("output_path").ok_or_else(|| io::Error::other("output_path unbound"))?;
    let text = fs::read_to_string(input)?;
    fs::write(output, text.to_uppercase())
}

fn main() -> Result<()> {
    let config = EffectConfig::default();
    config.init_logging()?;
    let registry = config.build_registry();

    let model = ModelBuilder::new("process_file", &registry)
        .param("input_path", TypeTag::ExistingPath)
        .param("output_path", TypeTag::NewPath)
        .build(process_file)?;

    let workdir = tempfile::tempdir()?;
    let input = workdir.path().join("existing_input.txt");
    let output = workdir.path().join("new_output.txt");
    fs::write(&input, "hello from the demo\n")?;

    for attempt in 1..=2 {
        let args = Arguments::new()
            .kwarg("input_path", input.as_path())
            .kwarg("output_path", output.as_path());
        match model.call(args) {
            Ok(()) => println!("attempt {attempt}: file processed successfully"),
            Err(err) => println!("attempt {attempt}: effect check failed: {err}"),
        }
    }

    println!("\n{}", model.describe());
    Ok(())
}
