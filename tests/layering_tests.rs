// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layering tests for the configuration loader.
//!
//! These tests verify the order in which defaults, files, inline text, trees
//! and command-line overrides are applied, and that a failed load never
//! touches the defaults.

mod common;

use cfgtree::adapters::{CollectingSink, OverrideArgs};
use cfgtree::domain::{CfgNode, ConfigError, ConfigValue};
use cfgtree::service::ConfigLoader;
use clap::Parser;
use common::{default_config, write_temp_yaml};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "train")]
struct TrainCli {
    #[command(flatten)]
    overrides: OverrideArgs,
}

#[test]
fn test_precedence_defaults_file_text_overrides() {
    let file = write_temp_yaml("SOLVER:\n  BASE_LR: 0.2\n  MAX_ITER: 1000\nSEED: 1\n");

    let cfg = ConfigLoader::new(default_config())
        .with_file(file.path())
        .with_yaml_str("SOLVER:\n  MAX_ITER: 2000\n")
        .with_overrides(["SEED", "3"])
        .load()
        .unwrap();

    // file only
    assert_eq!(cfg.lookup("SOLVER.BASE_LR").unwrap(), &ConfigValue::Float(0.2));
    // file, then text
    assert_eq!(cfg.lookup("SOLVER.MAX_ITER").unwrap(), &ConfigValue::Int(2000));
    // file, then overrides
    assert_eq!(cfg["SEED"], ConfigValue::Int(3));
    // defaults
    assert_eq!(cfg.lookup("MODEL.DEPTH").unwrap(), &ConfigValue::Int(50));
}

#[test]
fn test_layer_order_is_insertion_order() {
    let first = ConfigLoader::new(default_config())
        .with_overrides(["SEED", "1"])
        .with_tree(CfgNode::new().with("SEED", 2))
        .load()
        .unwrap();
    let second = ConfigLoader::new(default_config())
        .with_tree(CfgNode::new().with("SEED", 2))
        .with_overrides(["SEED", "1"])
        .load()
        .unwrap();

    assert_eq!(first["SEED"], ConfigValue::Int(2));
    assert_eq!(second["SEED"], ConfigValue::Int(1));
}

#[test]
fn test_failing_layer_returns_error_and_keeps_defaults() {
    let defaults = default_config();
    let loader = ConfigLoader::new(defaults.clone())
        .with_overrides(["MODEL.DEPTH", "18"])
        .with_yaml_str("MODEL:\n  WIDTH: 2\n");

    match loader.load().unwrap_err() {
        ConfigError::UnknownKey { key } => assert_eq!(key, "MODEL.WIDTH"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(defaults, default_config());
}

#[test]
fn test_key_policies_on_defaults_apply_to_layers() {
    let sink = Arc::new(CollectingSink::new());
    let mut defaults = default_config();
    defaults.register_deprecated_key("MODEL.FREEZE_AT").unwrap();
    defaults
        .register_renamed_key("SOLVER.LR", "SOLVER.BASE_LR", None)
        .unwrap();

    let loader = ConfigLoader::new(defaults.clone())
        .with_diagnostic_sink(sink.clone())
        .with_yaml_str("MODEL:\n  FREEZE_AT: 2\n");
    loader.load().unwrap();
    assert_eq!(sink.len(), 1);

    let result = ConfigLoader::new(defaults)
        .with_overrides(["SOLVER.LR", "0.1"])
        .load();
    assert!(matches!(result, Err(ConfigError::KeyRenamed { .. })));
}

#[test]
fn test_frozen_result() {
    let mut cfg = ConfigLoader::new(default_config())
        .frozen(true)
        .load()
        .unwrap();
    assert!(cfg.is_frozen());
    assert!(cfg.node("SOLVER").unwrap().is_frozen());
    assert!(cfg.set("SEED", 1).is_err());
}

#[test]
fn test_cli_arguments_drive_loader() {
    let file = write_temp_yaml("MODEL:\n  NAME: vgg\n  DEPTH: 16\n");
    let path = file.path().to_string_lossy().into_owned();

    let cli = TrainCli::try_parse_from([
        "train",
        "--config-file",
        path.as_str(),
        "MODEL.DEPTH",
        "19",
        "INPUT.SIZE",
        "[320, 320]",
    ])
    .unwrap();

    let cfg = cli.overrides.to_loader(default_config()).load().unwrap();
    assert_eq!(cfg.lookup("MODEL.NAME").unwrap(), &ConfigValue::from("vgg"));
    assert_eq!(cfg.lookup("MODEL.DEPTH").unwrap(), &ConfigValue::Int(19));
    assert_eq!(
        cfg.lookup("INPUT.SIZE").unwrap(),
        &ConfigValue::tuple([320, 320])
    );

    let mut direct = default_config();
    cli.overrides.apply(&mut direct).unwrap();
    assert_eq!(direct, cfg);
}

#[test]
fn test_cli_negative_values_are_not_flags() {
    let cli = TrainCli::try_parse_from(["train", "SEED", "-7"]).unwrap();
    let cfg = cli.overrides.to_loader(default_config()).load().unwrap();
    assert_eq!(cfg["SEED"], ConfigValue::Int(-7));
}
