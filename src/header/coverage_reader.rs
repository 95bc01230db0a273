use crate::config::HeaderConfig;
use crate::error::{CloudFilterError, Result};
use roxmltree::{Document, Node, ParsingOptions};
use std::fs;
use std::path::Path;

/// Reads the cloud coverage out of a scene header.
///
/// The coverage lives at a fixed element path below the document root, e.g.
/// `Variable_Header/Specific_Product_Header/Product_Information/Cloud_Percentage`,
/// with every element in the configured namespace.
pub struct CoverageReader {
    namespace: Option<String>,
    element_path: Vec<String>,
}

impl CoverageReader {
    pub fn new(config: &HeaderConfig) -> Self {
        let namespace = if config.namespace.is_empty() {
            None
        } else {
            Some(config.namespace.clone())
        };

        Self {
            namespace,
            element_path: config.coverage_path.clone(),
        }
    }

    pub fn read_coverage<P: AsRef<Path>>(&self, header_path: P) -> Result<i64> {
        let header_path = header_path.as_ref();
        let content = fs::read_to_string(header_path)?;
        self.parse_coverage(&content, header_path)
    }

    pub fn parse_coverage(&self, xml: &str, header_path: &Path) -> Result<i64> {
        let display_path = header_path.display().to_string();

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(xml, options).map_err(|e| {
            CloudFilterError::MalformedHeader {
                path: display_path.clone(),
                message: e.to_string(),
            }
        })?;

        let mut node = document.root_element();
        for name in &self.element_path {
            node = self
                .find_child(node, name)
                .ok_or_else(|| CloudFilterError::MissingElement {
                    path: display_path.clone(),
                    element: name.clone(),
                })?;
        }

        let text = node.text().unwrap_or("");
        text.trim()
            .parse::<i64>()
            .map_err(|_| CloudFilterError::InvalidCoverage {
                path: display_path,
                value: text.to_string(),
            })
    }

    fn find_child<'a, 'input>(
        &self,
        parent: Node<'a, 'input>,
        name: &str,
    ) -> Option<Node<'a, 'input>> {
        parent.children().find(|child| {
            child.is_element()
                && child.tag_name().name() == name
                && child.tag_name().namespace() == self.namespace.as_deref()
        })
    }
}

impl Default for CoverageReader {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}
