// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, the boundary between the
//! configuration tree and a text format (YAML, JSON, TOML, ...).

use crate::domain::{CfgNode, Result};

/// A trait for reading and writing configuration text.
///
/// A parser turns text into a tree of nested [`CfgNode`]s and renders a tree
/// back to text. Parsing the rendered text of a tree must rebuild an equal tree,
/// up to the sequence representation the format uses (tuples may come back as
/// lists).
///
/// Values are not decoded here: a quoted `"0.5"` stays a string until a merge
/// decodes it.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::ConfigParser;
/// use cfgtree::domain::{CfgNode, Result};
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &str) -> Result<CfgNode> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim(), v.trim()))
///             .collect())
///     }
///
///     fn render(&self, node: &CfgNode) -> Result<String> {
///         Ok(node.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["properties"]
///     }
/// }
///
/// let tree = KeyValueParser.parse("NAME = resnet").unwrap();
/// assert_eq!(tree.get("NAME").unwrap().to_string(), "resnet");
/// ```
pub trait ConfigParser {
    /// Parses configuration text into a tree.
    ///
    /// # Returns
    ///
    /// * `Ok(CfgNode)` - The root of the parsed tree
    /// * `Err(ConfigError::ParseError)` - The text is malformed
    fn parse(&self, content: &str) -> Result<CfgNode>;

    /// Renders a tree as configuration text.
    fn render(&self, node: &CfgNode) -> Result<String>;

    /// Returns the file extensions (without the leading dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;

    // Test implementation of ConfigParser for testing purposes
    struct TestParser;

    impl ConfigParser for TestParser {
        fn parse(&self, _content: &str) -> Result<CfgNode> {
            Ok(CfgNode::new().with("test", CfgNode::new().with("key", "test.value")))
        }

        fn render(&self, node: &CfgNode) -> Result<String> {
            Ok(format!("{}", ConfigValue::from(node.clone())))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_parse() {
        let parser = TestParser;
        let result = parser.parse("dummy content").unwrap();
        assert_eq!(
            result.lookup("test.key").unwrap(),
            &ConfigValue::from("test.value")
        );
    }

    #[test]
    fn test_parser_render() {
        let parser = TestParser;
        let tree = CfgNode::new().with("A", 1);
        assert_eq!(parser.render(&tree).unwrap(), "{'A': 1}");
    }

    #[test]
    fn test_parser_supported_extensions() {
        let parser = TestParser;
        let extensions = parser.supported_extensions();
        assert_eq!(extensions, &["test", "tst"]);
    }

    #[test]
    fn test_parser_as_trait_object() {
        let parser: Box<dyn ConfigParser> = Box::new(TestParser);
        assert_eq!(parser.parse("").unwrap().len(), 1);
    }
}
