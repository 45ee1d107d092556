// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the cfgtree crate.
//!
//! This example demonstrates:
//! - Declaring defaults as a configuration tree
//! - Registering deprecated and renamed keys
//! - Layering a config file and command-line overrides over the defaults
//! - Freezing the result and reading values back
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage -- SOLVER.BASE_LR 0.01 INPUT.SIZE "(320, 320)"
//!
//! # With a config file
//! cargo run --example basic_usage -- --config-file exp.yaml MODEL.DEPTH 101
//! ```

use cfgtree::prelude::*;
use clap::Parser;
use std::sync::Arc;

/// Train a model with a layered configuration
#[derive(Parser, Debug)]
#[command(name = "basic_usage")]
struct Cli {
    #[command(flatten)]
    overrides: OverrideArgs,
}

fn defaults() -> Result<CfgNode> {
    let mut cfg = CfgNode::new()
        .with(
            "MODEL",
            CfgNode::new()
                .with("NAME", "resnet")
                .with("DEPTH", 50)
                .with("WEIGHTS", ""),
        )
        .with(
            "SOLVER",
            CfgNode::new()
                .with("BASE_LR", 0.1)
                .with("MAX_ITER", 90_000)
                .with("STEPS", ConfigValue::tuple([60_000, 80_000])),
        )
        .with("INPUT", CfgNode::new().with("SIZE", ConfigValue::tuple([224, 224])))
        .with("OUTPUT_DIR", "./output");

    cfg.register_deprecated_key("SOLVER.WARMUP_ITERS")?;
    cfg.register_renamed_key(
        "MODEL.BACKBONE",
        "MODEL.NAME",
        Some("Backbone names now live under MODEL.NAME"),
    )?;
    Ok(cfg)
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== cfgtree: Basic Usage ===\n");

    let cli = Cli::parse();
    let sink = Arc::new(CollectingSink::new());

    let cfg = cli
        .overrides
        .to_loader(defaults()?)
        .with_diagnostic_sink(sink.clone())
        .frozen(true)
        .load()?;

    println!("--- Resolved configuration ---");
    print!("{}", cfg.dump()?);

    println!("\n--- Typed access ---");
    let lr = cfg.lookup("SOLVER.BASE_LR")?.as_f64("SOLVER.BASE_LR")?;
    let depth = cfg.lookup("MODEL.DEPTH")?.as_i64("MODEL.DEPTH")?;
    println!("Base learning rate: {}", lr);
    println!("Model depth: {}", depth);
    println!("Input size: {}", cfg.lookup("INPUT.SIZE")?);

    for event in sink.events() {
        println!("Ignored: {:?}", event);
    }

    // The loaded tree is frozen
    if let Err(e) = cfg.clone().set("OUTPUT_DIR", "/tmp") {
        println!("\n✓ Write rejected: {}", e);
    }

    Ok(())
}
