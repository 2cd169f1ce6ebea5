//! # procd
//!
//! Runs a host script against the simulated kernel and prints the transcript.

use procd::{parse_args, usage, CliAction, HostRuntime};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("procd");

    let config = match parse_args(&args) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help) => {
            eprintln!("{}", usage(program));
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    runtime.run();
    for line in runtime.transcript() {
        println!("{}", line);
    }

    if runtime.failures() > 0 {
        process::exit(1);
    }
}
