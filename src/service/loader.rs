// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! A [`ConfigLoader`] starts from a tree of defaults and applies an ordered
//! list of layers (files, YAML text, trees, override lists) on top of a copy
//! of it. Later layers win.

use crate::domain::{CfgNode, ConfigError, Result};
use crate::ports::{ConfigParser, DiagnosticSink};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// One source merged by a [`ConfigLoader`].
#[derive(Debug, Clone)]
enum Layer {
    File(PathBuf),
    Text(String),
    Tree(CfgNode),
    Overrides(Vec<String>),
}

impl Layer {
    fn describe(&self) -> String {
        match self {
            Layer::File(path) => format!("file '{}'", path.display()),
            Layer::Text(_) => "inline text".to_string(),
            Layer::Tree(_) => "tree".to_string(),
            Layer::Overrides(opts) => format!("{} override(s)", opts.len() / 2),
        }
    }
}

/// Builder that produces a configuration tree from defaults plus layers.
///
/// The defaults are cloned on every [`load`](ConfigLoader::load), so a failing
/// layer never leaves a half-merged tree behind: the caller either gets the
/// fully merged result or an error.
///
/// # Examples
///
/// ```rust
/// use cfgtree::domain::{CfgNode, ConfigValue};
/// use cfgtree::service::ConfigLoader;
///
/// # fn main() -> cfgtree::domain::Result<()> {
/// let defaults = CfgNode::new()
///     .with("MODEL", CfgNode::new().with("DEPTH", 50))
///     .with("SEED", 0);
///
/// let cfg = ConfigLoader::new(defaults)
///     .with_yaml_str("MODEL:\n  DEPTH: 101\n")
///     .with_overrides(["SEED", "42"])
///     .frozen(true)
///     .load()?;
///
/// assert_eq!(cfg.lookup("MODEL.DEPTH")?, &ConfigValue::Int(101));
/// assert_eq!(cfg["SEED"], ConfigValue::Int(42));
/// assert!(cfg.is_frozen());
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    defaults: CfgNode,
    layers: Vec<Layer>,
    parser: Option<Box<dyn ConfigParser>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    freeze: bool,
}

impl ConfigLoader {
    /// Creates a loader over `defaults`.
    ///
    /// With the `yaml` feature the loader parses files and text as YAML
    /// unless another parser is set with [`with_parser`](Self::with_parser).
    pub fn new(defaults: CfgNode) -> Self {
        Self {
            defaults,
            layers: Vec::new(),
            parser: default_parser(),
            sink: None,
            freeze: false,
        }
    }

    /// Adds a config file layer.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::File(path.into()));
        self
    }

    /// Adds a layer parsed from configuration text.
    pub fn with_yaml_str(mut self, content: impl Into<String>) -> Self {
        self.layers.push(Layer::Text(content.into()));
        self
    }

    /// Adds an already built tree as a layer.
    pub fn with_tree(mut self, tree: CfgNode) -> Self {
        self.layers.push(Layer::Tree(tree));
        self
    }

    /// Adds a flat `KEY VALUE ...` override list as a layer.
    ///
    /// The list is validated when the loader runs; an odd length fails the
    /// load with [`ConfigError::InvalidOverrideList`].
    pub fn with_overrides<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers
            .push(Layer::Overrides(opts.into_iter().map(Into::into).collect()));
        self
    }

    /// Replaces the parser used for file and text layers.
    pub fn with_parser(mut self, parser: Box<dyn ConfigParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the sink notified of ignored deprecated keys.
    pub fn with_diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Freezes the loaded tree when `freeze` is true.
    pub fn frozen(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }

    /// Returns the number of layers added so far.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Builds the configuration tree.
    ///
    /// The defaults are cloned and defrosted, each layer is merged in the
    /// order it was added, and the result is frozen if requested. The loader
    /// itself is left untouched and can be run again.
    pub fn load(&self) -> Result<CfgNode> {
        let mut cfg = self.defaults.clone();
        cfg.defrost();
        if let Some(sink) = &self.sink {
            cfg.set_diagnostic_sink(Arc::clone(sink));
        }

        for layer in &self.layers {
            tracing::debug!("Applying config layer: {}", layer.describe());
            self.apply(&mut cfg, layer)?;
        }

        if self.freeze {
            cfg.freeze();
        }
        tracing::debug!(
            "Loaded configuration with {} layer(s), {} top-level key(s)",
            self.layers.len(),
            cfg.len()
        );
        Ok(cfg)
    }

    fn apply(&self, cfg: &mut CfgNode, layer: &Layer) -> Result<()> {
        match layer {
            Layer::File(path) => cfg.merge_from_file_with(path, self.parser()?),
            Layer::Text(content) => {
                let overlay = self.parser()?.parse(content)?;
                cfg.merge_from_other(&overlay)
            }
            Layer::Tree(tree) => cfg.merge_from_other(tree),
            Layer::Overrides(opts) => cfg.merge_from_list(opts),
        }
    }

    fn parser(&self) -> Result<&dyn ConfigParser> {
        self.parser
            .as_deref()
            .ok_or_else(|| ConfigError::ParseError {
                message: "no configuration parser available for file or text layers"
                    .to_string(),
                source: None,
            })
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("defaults", &self.defaults)
            .field("layers", &self.layers)
            .field("parser", &self.parser.is_some())
            .field("sink", &self.sink)
            .field("freeze", &self.freeze)
            .finish()
    }
}

#[cfg(feature = "yaml")]
fn default_parser() -> Option<Box<dyn ConfigParser>> {
    Some(Box::new(crate::adapters::YamlParser::new()))
}

#[cfg(not(feature = "yaml"))]
fn default_parser() -> Option<Box<dyn ConfigParser>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;

    // Parses "KEY=VALUE" lines into a flat tree.
    struct EqualsParser;

    impl ConfigParser for EqualsParser {
        fn parse(&self, content: &str) -> Result<CfgNode> {
            Ok(content
                .lines()
                .filter_map(|line| line.split_once('='))
                .map(|(k, v)| (k.trim(), v.trim()))
                .collect())
        }

        fn render(&self, node: &CfgNode) -> Result<String> {
            Ok(node.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect())
        }

        fn supported_extensions(&self) -> &[&str] {
            &["env"]
        }
    }

    fn defaults() -> CfgNode {
        CfgNode::new()
            .with("SEED", 0)
            .with("NAME", "base")
            .with("SOLVER", CfgNode::new().with("BASE_LR", 0.1))
    }

    #[test]
    fn test_load_without_layers_returns_copy() {
        let cfg = ConfigLoader::new(defaults()).load().unwrap();
        assert_eq!(cfg, defaults());
        assert!(!cfg.is_frozen());
    }

    #[test]
    fn test_later_layers_win() {
        let cfg = ConfigLoader::new(defaults())
            .with_tree(CfgNode::new().with("SEED", 1).with("NAME", "tree"))
            .with_overrides(["SEED", "2"])
            .load()
            .unwrap();
        assert_eq!(cfg["SEED"], ConfigValue::Int(2));
        assert_eq!(cfg["NAME"], ConfigValue::from("tree"));
    }

    #[test]
    fn test_failed_load_keeps_defaults() {
        let base = defaults();
        let loader = ConfigLoader::new(base.clone())
            .with_overrides(["SEED", "5"])
            .with_overrides(["MISSING", "1"]);
        assert!(matches!(
            loader.load(),
            Err(ConfigError::UnknownKey { .. })
        ));
        assert_eq!(base, defaults());
    }

    #[test]
    fn test_frozen_defaults_are_defrosted_for_merging() {
        let mut base = defaults();
        base.freeze();
        let cfg = ConfigLoader::new(base)
            .with_overrides(["SEED", "3"])
            .load()
            .unwrap();
        assert_eq!(cfg["SEED"], ConfigValue::Int(3));
        assert!(!cfg.is_frozen());
    }

    #[test]
    fn test_custom_parser() {
        let cfg = ConfigLoader::new(defaults())
            .with_parser(Box::new(EqualsParser))
            .with_yaml_str("SEED = 9\nNAME = custom")
            .load()
            .unwrap();
        assert_eq!(cfg["SEED"], ConfigValue::Int(9));
        assert_eq!(cfg["NAME"], ConfigValue::from("custom"));
    }

    #[test]
    fn test_odd_override_list_fails_load() {
        let result = ConfigLoader::new(defaults())
            .with_overrides(["SEED"])
            .load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverrideList { len: 1 })
        ));
    }

    #[test]
    fn test_loader_is_reusable() {
        let loader = ConfigLoader::new(defaults()).with_overrides(["SOLVER.BASE_LR", "0.5"]);
        assert_eq!(loader.layer_count(), 1);
        assert_eq!(loader.load().unwrap(), loader.load().unwrap());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConfigLoader::new(defaults())
            .with_file("/nonexistent/cfgtree/exp.yaml")
            .load();
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_oversized_file_is_refused_like_direct_merge() {
        use crate::domain::file_source::MAX_CONFIG_FILE_SIZE;

        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_CONFIG_FILE_SIZE + 1).unwrap();

        let result = ConfigLoader::new(defaults()).with_file(file.path()).load();
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));

        let mut cfg = defaults();
        assert!(matches!(
            cfg.merge_from_file(file.path()),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn test_text_layer_without_parser_fails() {
        let result = ConfigLoader::new(defaults()).with_yaml_str("SEED: 1").load();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
