//! Minimal CLI front-end for `blockqr::factorize`
//!
//! Reads a whitespace-separated matrix, factors it in place with the
//! blocked Householder scheduler, and writes the factored matrix (and,
//! optionally, the Householder scalar pairs) back out in the same format.

use std::env;
use std::path::Path;

use blockqr::{factorize, io, Config};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "True" | "TRUE" | "yes" | "y")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let input = parse_flag(&args, "--input")
        .ok_or_else(|| anyhow::anyhow!("--input <path> is required"))?;
    let output = parse_flag(&args, "--output");
    let reflectors_output = parse_flag(&args, "--reflectors-output");

    let mut cfg = Config::default();
    if let Some(v) = parse_flag(&args, "--alpha").and_then(|s| s.parse().ok()) {
        cfg.alpha = v;
    }
    if let Some(v) = parse_flag(&args, "--beta").and_then(|s| s.parse().ok()) {
        cfg.beta = v;
    }
    if let Some(v) = parse_flag(&args, "--workers").and_then(|s| s.parse().ok()) {
        cfg.num_workers = v;
    }
    if let Some(v) = parse_flag(&args, "--priority") {
        cfg.use_priority_queue = parse_bool(&v);
    }
    cfg.validate()?;

    eprintln!(
        "loading matrix from {} (alpha={}, beta={}, workers={}, priority={})",
        input, cfg.alpha, cfg.beta, cfg.num_workers, cfg.use_priority_queue
    );
    let mut mat = io::load(Path::new(&input)).map_err(|e| anyhow::anyhow!("loading {input}: {e}"))?;
    eprintln!("loaded {}x{} matrix", mat.rows(), mat.cols());

    let (up, b) = factorize(&mut mat, &cfg).map_err(|e| anyhow::anyhow!("factorization failed: {e}"))?;
    eprintln!("factorization complete");

    if let Some(path) = output {
        io::save(Path::new(&path), &mat).map_err(|e| anyhow::anyhow!("writing {path}: {e}"))?;
        eprintln!("wrote factored matrix to {path}");
    }

    if let Some(path) = reflectors_output {
        io::save_reflectors(Path::new(&path), &up, &b).map_err(|e| anyhow::anyhow!("writing {path}: {e}"))?;
        eprintln!("wrote reflector scalars to {path}");
    }

    Ok(())
}
