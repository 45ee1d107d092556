// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use cfgtree::domain::{CfgNode, ConfigValue};
use std::io::Write;
use tempfile::NamedTempFile;

/// A small default tree shaped like a training configuration.
#[allow(dead_code)]
pub fn default_config() -> CfgNode {
    CfgNode::new()
        .with(
            "MODEL",
            CfgNode::new()
                .with("NAME", "resnet")
                .with("DEPTH", 50)
                .with("PRETRAINED", true)
                .with("WEIGHTS", ConfigValue::Null),
        )
        .with(
            "SOLVER",
            CfgNode::new()
                .with("BASE_LR", 0.1)
                .with("MAX_ITER", 90_000)
                .with("STEPS", ConfigValue::tuple([60_000, 80_000]))
                .with("OPTIMIZER", "sgd"),
        )
        .with(
            "INPUT",
            CfgNode::new()
                .with("SIZE", ConfigValue::tuple([224, 224]))
                .with("MEAN", ConfigValue::list([0.485, 0.456, 0.406])),
        )
        .with("OUTPUT_DIR", "./output")
        .with("SEED", -1)
}

/// Writes `content` to a fresh temporary file kept alive by the returned handle.
#[allow(dead_code)]
pub fn write_temp_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
