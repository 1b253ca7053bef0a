use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tags a user can operate directly
const INTERACTIVE_TAGS: [&str; 4] = ["button", "input", "select", "textarea"];

/// A rendered form element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "select", "input", "optgroup")
    pub tag_name: String,

    /// Attributes in render order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,

    /// Index assigned to this element (interactive and visible only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// False when the element carries `hidden` or `display: none`
    #[serde(default)]
    pub is_visible: bool,

    #[serde(default)]
    pub is_interactive: bool,
}

impl ElementNode {
    /// Create a new visible element
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            text_content: None,
            children: Vec::new(),
            index: None,
            is_visible: true,
            is_interactive: false,
        }
    }

    /// Builder method: set one attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set a boolean attribute when `on`
    pub fn flag(mut self, key: &str, on: bool) -> Self {
        if on {
            self.add_attribute(key, "");
        }
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: append one child
    pub fn child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder method: append children
    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Builder method: mark hidden (`hidden` attribute)
    pub fn hidden(mut self, hidden: bool) -> Self {
        if hidden {
            self.add_attribute("hidden", "");
            self.is_visible = false;
        }
        self
    }

    /// Builder method: bind a handler
    ///
    /// `args` are the fixed parameters; `value_key` names the parameter the
    /// element's current value is sent under.
    pub fn bind(mut self, handler: &str, args: serde_json::Value, value_key: Option<&str>) -> Self {
        self.add_attribute("data-handler", handler);
        self.add_attribute("data-args", args.to_string());
        if let Some(key) = value_key {
            self.add_attribute("data-value-key", key);
        }
        self
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
    }

    /// Determine if this element should be considered interactive
    pub fn compute_interactivity(&mut self) {
        let tag_is_interactive = INTERACTIVE_TAGS.iter().any(|&tag| self.is_tag(tag));
        let is_hidden_input = self.is_tag("input") && self.get_attribute("type").is_some_and(|t| t == "hidden");

        self.is_interactive = tag_is_interactive && !is_hidden_input && !self.is_disabled();
    }

    /// Display style of the element, from its inline `style`
    pub fn display(&self) -> Option<&str> {
        self.get_attribute("style")?
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .find(|(prop, _)| prop.trim() == "display")
            .map(|(_, value)| value.trim())
    }

    /// Apply `hidden` and `display: none` to the visibility flag
    pub fn compute_visibility(&mut self, parent_visible: bool) {
        self.is_visible = parent_visible && !self.has_attribute("hidden") && self.display() != Some("none");
    }

    /// Depth-first search by `id`
    pub fn find_by_id(&self, id: &str) -> Option<&ElementNode> {
        if self.id().is_some_and(|own| own == id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    /// All descendants (and self) with the given tag, document order
    pub fn descendants_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a ElementNode>) {
        if self.is_tag(tag) {
            out.push(self);
        }
        for child in &self.children {
            child.descendants_by_tag(tag, out);
        }
    }

    /// Serialize as indented HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.tag_name);
        for (key, value) in &self.attributes {
            if value.is_empty() && is_boolean_attribute(key) {
                out.push_str(&format!(" {}", key));
            } else {
                out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
            }
        }
        if let Some(index) = self.index {
            out.push_str(&format!(" data-index=\"{}\"", index));
        }
        out.push('>');

        if is_void(&self.tag_name) {
            out.push('\n');
            return;
        }

        let text = self.text_content.as_deref().map(escape);
        if self.children.is_empty() {
            out.push_str(text.as_deref().unwrap_or_default());
        } else {
            out.push('\n');
            if let Some(text) = text {
                out.push_str(&format!("{}  {}\n", indent, text));
            }
            for child in &self.children {
                child.write_html(out, depth + 1);
            }
            out.push_str(&indent);
        }
        out.push_str(&format!("</{}>\n", self.tag_name));
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br")
}

fn is_boolean_attribute(key: &str) -> bool {
    matches!(key, "hidden" | "disabled" | "required" | "selected" | "checked")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
