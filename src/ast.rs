//! SVG Abstract Syntax Tree

/// A parsed SVG document.
///
/// Only the root element is kept: the XML declaration, DOCTYPE and anything
/// else outside the root have no meaning once an icon is merged into a sprite.
#[derive(Debug, Clone)]
pub struct Document {
    /// The root SVG element
    pub root: Element,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "svg:rect")
    pub name: QName,
    /// Attributes on this element, in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes
    pub children: Vec<Node>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (e.g., "svg", "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        if let Some((prefix, local)) = s.split_once(':') {
            Self::with_prefix(prefix, local)
        } else {
            Self::new(s)
        }
    }

    /// Compare against a name written as "prefix:local" or "local".
    pub fn matches(&self, name: &str) -> bool {
        match (&self.prefix, name.split_once(':')) {
            (Some(p), Some((prefix, local))) => p == prefix && self.local == local,
            (None, None) => self.local == name,
            _ => false,
        }
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QName::parse(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node
    Comment(String),
    /// A CDATA section
    CData(String),
    /// A processing instruction (e.g., `<?xml-stylesheet ... ?>`)
    ProcessingInstruction { target: String, content: Option<String> },
}

impl Node {
    /// True for text nodes holding nothing but whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: QName::parse(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by its full name ("id", "xlink:href").
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value. An existing attribute keeps its position.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.matches(name)) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by its full name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|a| !a.name.matches(name));
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    pub fn append_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn prepend_child(&mut self, node: Node) {
        self.children.insert(0, node);
    }

    /// True when the element has no content other than whitespace.
    pub fn is_blank(&self) -> bool {
        self.children.iter().all(Node::is_whitespace)
    }

    /// Detach every descendant element with the given local name.
    ///
    /// Matches are returned in document order. A match is removed together
    /// with its subtree, so nested matches are not reported separately.
    pub fn take_descendants(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        take_matching(self, &|e: &Element| e.is(name), &mut taken, usize::MAX);
        taken
    }

    /// Detach the first descendant element with the given local name.
    pub fn take_first_descendant(&mut self, name: &str) -> Option<Element> {
        let mut taken = Vec::new();
        take_matching(self, &|e: &Element| e.is(name), &mut taken, 1);
        taken.pop()
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Recursively visit this element and all of its descendants mutably.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.child_elements_mut() {
            child.for_each_element_mut(f);
        }
    }
}

fn take_matching(
    elem: &mut Element,
    pred: &impl Fn(&Element) -> bool,
    taken: &mut Vec<Element>,
    limit: usize,
) {
    let mut kept = Vec::with_capacity(elem.children.len());
    for child in std::mem::take(&mut elem.children) {
        match child {
            Node::Element(e) if taken.len() < limit && pred(&e) => taken.push(e),
            Node::Element(mut e) => {
                if taken.len() < limit {
                    take_matching(&mut e, pred, taken, limit);
                }
                kept.push(Node::Element(e));
            }
            other => kept.push(other),
        }
    }
    elem.children = kept;
}

impl Document {
    /// Recursively visit all elements mutably.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        self.root.for_each_element_mut(&mut f);
    }
}
