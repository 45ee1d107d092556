// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line override adapter.
//!
//! This module provides `OverrideArgs`, a set of `clap` arguments to flatten
//! into an application's parser. It accepts an optional config file and a
//! trailing list of dotted `KEY VALUE` overrides, the shape
//! [`CfgNode::merge_from_list`] consumes.

use crate::domain::{CfgNode, Result};
use crate::service::ConfigLoader;
use clap::Args;
use std::path::PathBuf;

/// Config file and override arguments.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::OverrideArgs;
/// use cfgtree::domain::{CfgNode, ConfigValue};
/// use clap::Parser;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     overrides: OverrideArgs,
/// }
///
/// let cli = Cli::parse_from(["train", "SOLVER.BASE_LR", "0.01"]);
///
/// let mut cfg = CfgNode::new().with("SOLVER", CfgNode::new().with("BASE_LR", 0.1));
/// cli.overrides.apply(&mut cfg).unwrap();
/// assert_eq!(cfg.lookup("SOLVER.BASE_LR").unwrap(), &ConfigValue::Float(0.01));
/// ```
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideArgs {
    /// YAML file merged over the defaults
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Dotted KEY VALUE pairs merged after the config file
    #[arg(
        value_name = "KEY VALUE",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub opts: Vec<String>,
}

impl OverrideArgs {
    /// Merges the config file, then the overrides, into `cfg`.
    ///
    /// The list is validated before the file is read, so an odd number of
    /// override tokens leaves `cfg` untouched.
    pub fn apply(&self, cfg: &mut CfgNode) -> Result<()> {
        if self.opts.len() % 2 != 0 {
            return Err(crate::domain::ConfigError::InvalidOverrideList {
                len: self.opts.len(),
            });
        }
        if let Some(path) = &self.config_file {
            cfg.merge_from_file(path)?;
        }
        cfg.merge_from_list(&self.opts)
    }

    /// Builds a loader applying these arguments on top of `defaults`.
    pub fn to_loader(&self, defaults: CfgNode) -> ConfigLoader {
        let mut loader = ConfigLoader::new(defaults);
        if let Some(path) = &self.config_file {
            loader = loader.with_file(path);
        }
        loader.with_overrides(self.opts.iter().cloned())
    }
}
