//! revflow CLI - streaming FASTA reverse-complement
//!
//! Reads FASTA from a file or stdin, writes the per-record reverse
//! complement to stdout or a file, re-wrapped at 60 columns. Gzip input
//! and output are selected by the `.gz` extension.
//!
//! # Usage
//!
//! ```bash
//! revflow input.fa > output.fa
//! revflow -o output.fa.gz input.fa.gz
//! cat input.fa | revflow > output.fa
//! ```

use revflow::io::sink::OutputSink;
use revflow::io::source::open_input;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut input_file: Option<&str> = None;
    let mut output_file: Option<&str> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    output_file = Some(args[i + 1].as_str());
                    i += 2;
                } else {
                    eprintln!("Error: --output requires a value");
                    process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--version" | "-V" => {
                println!("revflow {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            arg if !arg.starts_with('-') => {
                if input_file.is_none() {
                    input_file = Some(arg);
                    i += 1;
                } else {
                    eprintln!("Error: Multiple input files specified");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                eprintln!("Run 'revflow --help' for usage.");
                process::exit(1);
            }
        }
    }

    let source = match open_input(input_file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error opening input: {}", e);
            process::exit(1);
        }
    };

    let mut sink = match OutputSink::create(output_file) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Error creating output: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = revflow::transform(source.as_ref(), &mut sink) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = sink.finish() {
        eprintln!("Error finishing output: {}", e);
        process::exit(1);
    }
}

fn print_help() {
    println!("revflow {} - streaming FASTA reverse-complement", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    revflow [OPTIONS] [INPUT]");
    println!();
    println!("OPTIONS:");
    println!("    --output FILE, -o  Output file (default: stdout; .gz compresses)");
    println!("    --help, -h         Show this help message");
    println!("    --version, -V      Show version information");
    println!();
    println!("INPUT:");
    println!("    FASTA file path (.gz accepted), or stdin if not specified");
    println!();
    println!("EXAMPLES:");
    println!("    revflow sequences.fa");
    println!("    revflow -o output.fa.gz input.fa.gz");
    println!("    cat input.fa | revflow > output.fa");
}
