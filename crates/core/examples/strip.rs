use std::{fs, path::PathBuf};

use clap::Parser;
use indexmap::IndexMap;
use ts_type_strip::{RemapConfig, StripOptions, strip, strip_with_sourcemap};

#[derive(Parser, Debug)]
#[command(name = "strip")]
#[command(about = "Strip TypeScript type syntax while preserving line/col as much as possible", long_about = None)]
struct Args {
    /// Path to the .ts/.mts/.cts file to transform
    input: PathBuf,

    /// Output path for stripped source (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Output path for the sourcemap (defaults to <out>.map if --out is provided)
    #[arg(long)]
    out_sourcemap: Option<PathBuf>,

    /// Remove comments as well as types
    #[arg(long)]
    remove_comments: bool,

    /// Decode \uXXXX escapes and halve four-space indentation (no sourcemap)
    #[arg(long)]
    pretty_print: bool,

    /// Rewrite .ts/.mts/.cts specifiers to .js/.mjs/.cjs
    #[arg(long)]
    path_rewriting: bool,

    /// Remap an aliased specifier prefix, e.g. `$lib/=./src/lib/`; first match wins
    #[arg(long = "remap", value_name = "ALIAS=PATH", value_parser = parse_remap)]
    remaps: Vec<(String, String)>,

    /// Path of the input relative to the remap root (defaults to the input path)
    #[arg(long)]
    remap_file_path: Option<String>,
}

fn parse_remap(value: &str) -> Result<(String, String), String> {
    let (alias, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ALIAS=PATH, got {value:?}"))?;
    if alias.is_empty() {
        return Err("remap alias must not be empty".to_string());
    }
    Ok((alias.to_string(), path.to_string()))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;
    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("input file must have a valid filename")?
        .to_string();

    let remap_specifiers = if args.remaps.is_empty() {
        None
    } else {
        Some(RemapConfig {
            file_path: args
                .remap_file_path
                .clone()
                .unwrap_or_else(|| args.input.to_string_lossy().into_owned()),
            imports: args.remaps.iter().cloned().collect::<IndexMap<_, _>>(),
        })
    };

    let options = StripOptions {
        remove_comments: args.remove_comments,
        file_name,
        pretty_print: args.pretty_print,
        path_rewriting: args.path_rewriting,
        remap_specifiers,
    };

    let out_map_path = args.out_sourcemap.clone().or_else(|| {
        args.out
            .as_ref()
            .filter(|_| !args.pretty_print)
            .map(|out| PathBuf::from(format!("{}.map", out.display())))
    });

    let out_code = if let Some(out_map_path) = out_map_path {
        let res = strip_with_sourcemap(&source, &options)?;
        fs::write(out_map_path, res.sourcemap)?;

        res.code
    } else {
        strip(&source, &options)?
    };

    match &args.out {
        None => {
            print!("{out_code}");
        }
        Some(out) => {
            fs::write(out, out_code)?;
        }
    }

    Ok(())
}
