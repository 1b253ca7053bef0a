use crate::dom::element::ElementNode;
use crate::dom::selector_map::{ElementSelector, SelectorMap};
use crate::error::Result;
use log::warn;
use serde_json::Value;

/// A rendered view of the quote form
#[derive(Debug, Clone)]
pub struct DomTree {
    pub root: ElementNode,

    /// Map of indices to element selectors
    pub selector_map: SelectorMap,
}

impl DomTree {
    /// Wrap a rendered root and index its interactive elements
    pub fn new(root: ElementNode) -> Self {
        let mut tree = Self {
            root,
            selector_map: SelectorMap::new(),
        };
        tree.build_selector_map();
        tree
    }

    /// Rebuild the selector map by traversing the tree
    pub fn build_selector_map(&mut self) {
        self.selector_map.clear();
        Self::traverse_and_index(&mut self.root, "form", true, &mut self.selector_map);
    }

    fn traverse_and_index(node: &mut ElementNode, css_path: &str, parent_visible: bool, selector_map: &mut SelectorMap) {
        node.compute_visibility(parent_visible);
        node.compute_interactivity();
        node.index = None;

        if node.is_interactive && node.is_visible {
            let selector = Self::build_selector(node, css_path);
            node.index = Some(selector_map.register(selector));
        }

        let visible = node.is_visible;
        for (i, child) in node.children.iter_mut().enumerate() {
            let child_path = format!("{} > {}:nth-child({})", css_path, child.tag_name, i + 1);
            Self::traverse_and_index(child, &child_path, visible, selector_map);
        }
    }

    fn build_selector(node: &ElementNode, css_path: &str) -> ElementSelector {
        let css_selector = match node.id() {
            Some(id) => format!("#{}", id),
            None => css_path.to_string(),
        };

        let mut selector = ElementSelector::new(css_selector, &node.tag_name);

        if let Some(id) = node.id() {
            selector = selector.with_id(id);
        }

        if let Some(handler) = node.get_attribute("data-handler") {
            let args = node
                .get_attribute("data-args")
                .map(|raw| {
                    serde_json::from_str::<Value>(raw).unwrap_or_else(|e| {
                        warn!("Ignoring malformed data-args on {}: {}", handler, e);
                        Value::Object(Default::default())
                    })
                })
                .unwrap_or_else(|| Value::Object(Default::default()));
            selector = selector.with_handler(handler, args);
        }

        if let Some(key) = node.get_attribute("data-value-key") {
            selector = selector.with_value_key(key);
        }

        if let Some(value) = node.get_attribute("value") {
            selector = selector.with_value(value);
        }

        selector
    }

    /// Convert the tree to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Serialize the tree as HTML
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn get_selector(&self, index: usize) -> Option<&ElementSelector> {
        self.selector_map.get(index)
    }

    pub fn interactive_indices(&self) -> Vec<usize> {
        self.selector_map.indices().copied().collect()
    }

    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }

    pub fn count_interactive(&self) -> usize {
        self.selector_map.len()
    }

    /// Find element node by index (traverse the tree)
    pub fn find_node_by_index(&self, index: usize) -> Option<&ElementNode> {
        Self::find_node_by_index_recursive(&self.root, index)
    }

    fn find_node_by_index_recursive(node: &ElementNode, target_index: usize) -> Option<&ElementNode> {
        if node.index == Some(target_index) {
            return Some(node);
        }

        node.children
            .iter()
            .find_map(|child| Self::find_node_by_index_recursive(child, target_index))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ElementNode> {
        self.root.find_by_id(id)
    }

    /// Index of the interactive element with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.selector_map.find_by_id(id)
    }
}
