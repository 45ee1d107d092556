// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML configuration adapter.
//!
//! This module provides the YAML implementation of [`ConfigParser`], an adapter
//! that loads YAML files into configuration trees, and the YAML conveniences on
//! [`CfgNode`] (`load_yaml`, `dump`, `merge_from_str`, `merge_from_file`).

use crate::domain::file_source::read_config_file;
use crate::domain::{CfgNode, ConfigError, ConfigValue, Result};
use crate::ports::ConfigParser;
use std::path::{Path, PathBuf};

/// YAML parser implementation.
///
/// Mappings become nested [`CfgNode`]s, sequences become lists and scalars keep
/// their YAML type. Rendering writes tuples and arrays as plain sequences.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::YamlParser;
/// use cfgtree::domain::ConfigValue;
/// use cfgtree::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let tree = parser.parse("MODEL:\n  DEPTH: 50\n  NAME: resnet").unwrap();
/// assert_eq!(tree.lookup("MODEL.DEPTH").unwrap(), &ConfigValue::Int(50));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Converts a parsed YAML document into a configuration value.
    fn convert(value: serde_yaml::Value) -> Result<ConfigValue> {
        let converted = match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Int(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigValue::Str(s),
            serde_yaml::Value::Sequence(seq) => ConfigValue::List(
                seq.into_iter()
                    .map(Self::convert)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut node = CfgNode::new();
                for (key, val) in map {
                    node.insert(Self::mapping_key(key)?, Self::convert(val)?);
                }
                ConfigValue::Node(node)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value)?,
        };
        Ok(converted)
    }

    /// Scalar keys are used by their string form; others are rejected.
    fn mapping_key(key: serde_yaml::Value) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            other => Err(ConfigError::ParseError {
                message: format!("Unsupported YAML mapping key: {:?}", other),
                source: None,
            }),
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<CfgNode> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match Self::convert(value)? {
            ConfigValue::Node(node) => Ok(node),
            ConfigValue::Null => Ok(CfgNode::new()),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "Expected a YAML mapping at the top level, found {}",
                    other.kind()
                ),
                source: None,
            }),
        }
    }

    fn render(&self, node: &CfgNode) -> Result<String> {
        serde_yaml::to_string(node).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to render YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration adapter for YAML files.
///
/// Reads a YAML file into a configuration tree that can then be merged over a
/// tree of defaults.
///
/// # Examples
///
/// ```rust,no_run
/// use cfgtree::adapters::YamlFileAdapter;
/// use cfgtree::domain::CfgNode;
///
/// let mut cfg = CfgNode::new().with("SEED", 0);
/// let adapter = YamlFileAdapter::from_file("/path/to/experiment.yaml").unwrap();
/// cfg.merge_from_other(adapter.tree()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// Parsed configuration tree
    tree: CfgNode,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Reads and parses the YAML file at `path`.
    ///
    /// I/O errors are returned unchanged; files over 10MB are refused with
    /// [`ConfigError::SourceError`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let parser = YamlParser::new();
        let tree = parser.parse(&read_config_file(&file_path)?)?;

        Ok(Self {
            file_path,
            tree,
            parser,
        })
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the parsed tree.
    pub fn tree(&self) -> &CfgNode {
        &self.tree
    }

    /// Consumes the adapter, returning the parsed tree.
    pub fn into_tree(self) -> CfgNode {
        self.tree
    }

    /// Re-reads the file, replacing the parsed tree.
    pub fn reload(&mut self) -> Result<()> {
        self.tree = self.parser.parse(&read_config_file(&self.file_path)?)?;
        Ok(())
    }
}

impl CfgNode {
    /// Parses YAML text into a new tree.
    pub fn load_yaml(content: &str) -> Result<CfgNode> {
        YamlParser::new().parse(content)
    }

    /// Renders this tree as YAML.
    pub fn dump(&self) -> Result<String> {
        YamlParser::new().render(self)
    }

    /// Parses YAML text and merges it into this tree.
    pub fn merge_from_str(&mut self, content: &str) -> Result<()> {
        let overlay = Self::load_yaml(content)?;
        self.merge_from_other(&overlay)
    }

    /// Loads a YAML file and merges it into this tree.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfgtree::domain::CfgNode;
    ///
    /// let mut cfg = CfgNode::new().with("SOLVER", CfgNode::new().with("BASE_LR", 0.1));
    /// cfg.merge_from_file("configs/fast.yaml").unwrap();
    /// ```
    pub fn merge_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let adapter = YamlFileAdapter::from_file(path)?;
        tracing::debug!("Merging config file {}", adapter.file_path().display());
        self.merge_from_other(adapter.tree())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_parser_simple() {
        let parser = YamlParser::new();
        let result = parser.parse("key: value").unwrap();

        assert_eq!(result.get("key"), Some(&ConfigValue::from("value")));
    }

    #[test]
    fn test_yaml_parser_nested() {
        let parser = YamlParser::new();
        let yaml = r#"
database:
  host: localhost
  port: 5432
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(
            result.lookup("database.host").unwrap(),
            &ConfigValue::from("localhost")
        );
        assert_eq!(
            result.lookup("database.port").unwrap(),
            &ConfigValue::Int(5432)
        );
    }

    #[test]
    fn test_yaml_parser_sequences() {
        let parser = YamlParser::new();
        let yaml = r#"
servers:
  - server1
  - server2
stages:
  - width: 64
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(
            result.get("servers"),
            Some(&ConfigValue::list(["server1", "server2"]))
        );
        let stages = result.get("stages").unwrap().as_sequence("stages").unwrap();
        assert_eq!(
            stages[0].as_node("stages").unwrap().get("width"),
            Some(&ConfigValue::Int(64))
        );
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let parser = YamlParser::new();
        let yaml = r#"
string_value: hello
number_value: 42
float_value: 0.5
bool_value: true
null_value: null
quoted_number: "42"
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(result["string_value"], ConfigValue::from("hello"));
        assert_eq!(result["number_value"], ConfigValue::Int(42));
        assert_eq!(result["float_value"], ConfigValue::Float(0.5));
        assert_eq!(result["bool_value"], ConfigValue::Bool(true));
        assert_eq!(result["null_value"], ConfigValue::Null);
        assert_eq!(result["quoted_number"], ConfigValue::from("42"));
    }

    #[test]
    fn test_yaml_parser_non_string_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("1: one\ntrue: yes").unwrap();
        assert!(result.contains_key("1"));
        assert!(result.contains_key("true"));
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        let parser = YamlParser::new();
        assert!(parser.parse("").unwrap().is_empty());
    }

    #[test]
    fn test_yaml_parser_rejects_top_level_sequence() {
        let parser = YamlParser::new();
        assert!(matches!(
            parser.parse("- a\n- b"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        let result = parser.parse("invalid: yaml: content:");

        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_render_writes_tuples_as_sequences() {
        let tree = CfgNode::new().with("SIZE", ConfigValue::tuple([1, 2]));
        let text = YamlParser::new().render(&tree).unwrap();
        let back = YamlParser::new().parse(&text).unwrap();
        assert_eq!(back["SIZE"], ConfigValue::list([1, 2]));
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::default();
        let extensions = parser.supported_extensions();

        assert_eq!(extensions.len(), 2);
        assert!(extensions.contains(&"yaml"));
        assert!(extensions.contains(&"yml"));
    }

    #[test]
    fn test_yaml_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "database:\n  host: localhost\n  port: 5432").unwrap();

        let adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();

        assert_eq!(adapter.file_path(), temp_file.path());
        assert_eq!(
            adapter.tree().lookup("database.host").unwrap(),
            &ConfigValue::from("localhost")
        );
    }

    #[test]
    fn test_yaml_adapter_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        fs::write(&path, "key: initial_value\n").unwrap();
        let mut adapter = YamlFileAdapter::from_file(&path).unwrap();
        assert_eq!(adapter.tree()["key"], ConfigValue::from("initial_value"));

        fs::write(&path, "key: updated_value\n").unwrap();
        adapter.reload().unwrap();

        assert_eq!(
            adapter.into_tree()["key"],
            ConfigValue::from("updated_value")
        );
    }

    #[test]
    fn test_yaml_adapter_nonexistent_file_is_io_error() {
        let result = YamlFileAdapter::from_file("/nonexistent/path/to/config.yaml");
        match result {
            Err(ConfigError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected I/O error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_node_dump_and_load() {
        let tree = CfgNode::new()
            .with("NAME", "resnet")
            .with("MODEL", CfgNode::new().with("DEPTH", 50));
        let text = tree.dump().unwrap();
        assert_eq!(CfgNode::load_yaml(&text).unwrap(), tree);
    }

    #[test]
    fn test_node_merge_from_str() {
        let mut tree = CfgNode::new().with("MODEL", CfgNode::new().with("DEPTH", 50));
        tree.merge_from_str("MODEL:\n  DEPTH: 101\n").unwrap();
        assert_eq!(tree.lookup("MODEL.DEPTH").unwrap(), &ConfigValue::Int(101));
    }
}
