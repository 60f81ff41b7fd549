//! DOM Node
//!
//! Nodes link to each other through [`NodeId`] handles rather than pointers;
//! the sentinel [`NodeId::NONE`] stands for a missing link.

use crate::NodeId;
use crate::style::InlineStyle;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or document)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(data: ElementData) -> Self {
        Self::with_data(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(TextData { content: content.into() }))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-cased local name
    pub local_name: String,
    /// Attributes in source order
    attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    id: Option<String>,
    /// Cached class list
    classes: Vec<String>,
    /// Parsed `style` attribute
    style: InlineStyle,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            style: InlineStyle::new(),
        }
    }

    /// Raw `id` attribute value
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Class list, in attribute order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Get an attribute value (names are ASCII case-insensitive)
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping the id/class/style caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_ascii_whitespace().map(str::to_string).collect();
            }
            "style" => self.style = InlineStyle::parse(value),
            _ => {}
        }
        // Check if attribute already exists
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute { name, value: value.to_string() });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        let attr = self.attrs.remove(pos);
        match attr.name.as_str() {
            "id" => self.id = None,
            "class" => self.classes.clear(),
            "style" => self.style = InlineStyle::new(),
            _ => {}
        }
        Some(attr.value)
    }

    /// Parsed inline style
    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    /// Set one inline style property and rewrite the `style` attribute
    pub fn set_style_property(&mut self, name: &str, value: &str, important: bool) {
        self.style.set_property(name, value, important);
        self.sync_style_attr();
    }

    /// Remove one inline style property and rewrite the `style` attribute
    pub fn remove_style_property(&mut self, name: &str) -> Option<String> {
        let old = self.style.remove_property(name);
        self.sync_style_attr();
        old
    }

    fn sync_style_attr(&mut self) {
        let text = self.style.to_css_text();
        let existing = self.attrs.iter().position(|a| a.name == "style");
        match (existing, text.is_empty()) {
            (Some(pos), true) => {
                self.attrs.remove(pos);
            }
            (Some(pos), false) => self.attrs[pos].value = text,
            (None, true) => {}
            (None, false) => self.attrs.push(Attribute { name: "style".into(), value: text }),
        }
    }
}

/// Text node data
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
