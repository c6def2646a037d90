use std::{fs, path::PathBuf};

use clap::Parser;
use ts_type_strip::{StripOptions, strip};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Create or validate fixture files", long_about = None)]
struct Args {
    /// Write fixtures instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory (defaults to "./fixtures")
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

/// Fixtures opt into non-default options by name.
fn options_for(filename: &str) -> StripOptions {
    StripOptions {
        remove_comments: filename == "comments.ts",
        path_rewriting: filename == "path-rewriting.ts",
        file_name: filename.to_string(),
        ..StripOptions::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    let args = Args::parse();

    let mut input_files = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "ts") {
            input_files.push(path);
        }
    }
    input_files.sort();

    println!(
        "{} fixtures...",
        if args.write { "Creating" } else { "Validating" }
    );
    let mut mismatches = Vec::new();

    for input_path in &input_files {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        let basename = filename
            .strip_suffix(".ts")
            .ok_or("filename missing extension")?;

        let source = fs::read_to_string(input_path)?;
        let code = strip(&source, &options_for(filename))?;
        let out_path = args.dir.join(format!("{basename}.out.js"));

        if args.write {
            fs::write(&out_path, &code)?;
            println!("  Created {}", out_path.display());
            continue;
        }

        match fs::read(&out_path) {
            Ok(expected) if expected == code.as_bytes() => println!("  ✓ {filename}"),
            Ok(_) => mismatches.push(format!("{filename}: code mismatch")),
            Err(_) => mismatches.push(format!(
                "{filename}: missing output file {}",
                out_path.display()
            )),
        }
    }

    if !mismatches.is_empty() {
        eprintln!("\nValidation failed:");
        for mismatch in &mismatches {
            eprintln!("  ✗ {mismatch}");
        }
        return Err(format!("{} validation error(s)", mismatches.len()).into());
    }

    println!("\nDone: {} fixtures.", input_files.len());
    Ok(())
}
