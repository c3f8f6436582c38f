//! # Attributes Document
//!
//! A small owned element tree for the attributes XML dialect. Reading is done with
//! `roxmltree`; the tree is kept so that rewrites preserve content this crate does not
//! model: unknown elements, extra attributes, namespace prefixes and declarations, comments,
//! processing instructions and the XML declaration. Serialization is compact:
//!
//! ```text
//! <Attributes><ProductAttribute ID="12"><ProductAttributeValue><Value>34</Value></ProductAttributeValue></ProductAttribute></Attributes>
//! ```
//!
//! Element lookups follow the `//A/B/C` XPath shape used by the platform: an element
//! matches when its name and the names of its closest ancestors equal the path, wherever
//! it sits in the tree, in document order.
//!
//! Documents nested deeper than [`MAX_DEPTH`] elements are rejected when parsed.

use crate::error::{CatalogError, CatalogErrorExt};

pub(crate) const ATTRIBUTES: &str = "Attributes";
pub(crate) const PRODUCT_ATTRIBUTE: &str = "ProductAttribute";
pub(crate) const PRODUCT_ATTRIBUTE_VALUE: &str = "ProductAttributeValue";
pub(crate) const VALUE: &str = "Value";
pub(crate) const ID: &str = "ID";
pub(crate) const GIFT_CARD_INFO: &str = "GiftCardInfo";

/// Deepest element nesting accepted by [`AttributesDocument::parse`]. The root element is
/// at depth 1.
pub(crate) const MAX_DEPTH: usize = 256;

const XMLNS: &str = "xmlns";
const XML_PREFIX: &str = "xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Instruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new(), children: Vec::new() }
    }

    /// A text-leaf element. Empty text still gets an explicit end tag: `<Value></Value>`.
    pub(crate) fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    #[must_use]
    pub(crate) fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub(crate) fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub(crate) fn push(&mut self, child: Self) -> &mut Self {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!("an element was pushed just above"),
        }
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) | Node::Comment(_) | Node::Instruction { .. } => None,
        })
    }

    /// Concatenated text of all descendants.
    pub(crate) fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
                Node::Comment(_) | Node::Instruction { .. } => {},
            }
        }
    }

    /// Integer value of the `ID` attribute, trimmed. `None` when absent or unparsable.
    pub(crate) fn mapping_id(&self) -> Option<i32> {
        self.attribute(ID).and_then(|raw| raw.trim().parse().ok())
    }

    /// All elements matching `path` in document order, this element included.
    pub(crate) fn select(&self, path: &[&str]) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_matching(&mut Vec::new(), path, &mut found);
        found
    }

    /// First element matching `path` in document order.
    pub(crate) fn select_first(&self, path: &[&str]) -> Option<&Self> {
        self.find_path(|ancestors, element| matches_path(ancestors, element, path))
            .and_then(|p| self.at_path(&p))
    }

    /// Child-index path to the first element satisfying `predicate`.
    pub(crate) fn find_path(
        &self,
        mut predicate: impl FnMut(&[&str], &Self) -> bool,
    ) -> Option<Vec<usize>> {
        let mut ancestors = Vec::new();
        let mut position = Vec::new();
        self.locate(&mut ancestors, &mut position, &mut predicate).then_some(position)
    }

    pub(crate) fn at_path(&self, path: &[usize]) -> Option<&Self> {
        path.iter().try_fold(self, |element, &index| match element.children.get(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        })
    }

    pub(crate) fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        path.iter().try_fold(self, |element, &index| match element.children.get_mut(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        })
    }

    fn collect_matching<'a>(
        &'a self,
        ancestors: &mut Vec<&'a str>,
        path: &[&str],
        found: &mut Vec<&'a Self>,
    ) {
        if matches_path(ancestors, self, path) {
            found.push(self);
        }
        ancestors.push(&self.name);
        for child in self.elements() {
            child.collect_matching(ancestors, path, found);
        }
        ancestors.pop();
    }

    fn locate<'a>(
        &'a self,
        ancestors: &mut Vec<&'a str>,
        position: &mut Vec<usize>,
        predicate: &mut impl FnMut(&[&str], &Self) -> bool,
    ) -> bool {
        if predicate(ancestors, self) {
            return true;
        }
        ancestors.push(&self.name);
        for (index, child) in self.children.iter().enumerate() {
            let Node::Element(child) = child else { continue };
            position.push(index);
            if child.locate(ancestors, position, predicate) {
                ancestors.pop();
                return true;
            }
            position.pop();
        }
        ancestors.pop();
        false
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, out, true);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Copies a parsed element. Element and attribute names keep their source prefixes and
    /// the namespaces first declared on this element come back as `xmlns` attributes.
    fn from_xml(node: roxmltree::Node<'_, '_>, input: &str) -> Self {
        let mut element = Self::new(qualified_name(node, input));
        element.attributes = declared_namespaces(node)
            .chain(node.attributes().map(|a| {
                let name = input.get(a.range_qname()).unwrap_or_else(|| a.name());
                (name.to_owned(), a.value().to_owned())
            }))
            .collect();

        for child in node.children() {
            if child.is_element() {
                element.children.push(Node::Element(Self::from_xml(child, input)));
            } else if let Some(content) = Node::from_xml(child) {
                element.children.push(content);
            }
        }

        // `<Value></Value>` keeps its end tag on rewrite; `<Value />` stays self-closed.
        let self_closed = input.get(node.range()).is_some_and(|source| source.ends_with("/>"));
        if element.children.is_empty() && !self_closed {
            element.children.push(Node::Text(String::new()));
        }
        element
    }
}

impl Node {
    /// Non-element content. Insignificant whitespace between elements is dropped.
    fn from_xml(node: roxmltree::Node<'_, '_>) -> Option<Self> {
        if node.is_text() {
            node.text().filter(|text| !text.trim().is_empty()).map(|text| Self::Text(text.to_owned()))
        } else if node.is_comment() {
            node.text().map(|text| Self::Comment(text.to_owned()))
        } else {
            node.pi().map(|pi| Self::Instruction {
                target: pi.target.to_owned(),
                value: pi.value.map(str::to_owned),
            })
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::Element(e) => e.write(out),
            Self::Text(t) => escape_into(t, out, false),
            Self::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            },
            Self::Instruction { target, value } => {
                out.push_str("<?");
                out.push_str(target);
                if let Some(value) = value {
                    out.push(' ');
                    out.push_str(value);
                }
                out.push_str("?>");
            },
        }
    }
}

/// Element name as written in the source, prefix included.
fn qualified_name(node: roxmltree::Node<'_, '_>, input: &str) -> String {
    let start = node.range().start + 1;
    input
        .get(start..)
        .and_then(|rest| rest.split(|c: char| c.is_whitespace() || c == '/' || c == '>').next())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| node.tag_name().name())
        .to_owned()
}

/// Namespaces in scope on `node` that its parent element does not already have.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> impl Iterator<Item = (String, String)> {
    let parent = node.parent_element();
    node.namespaces()
        .filter(|ns| ns.name() != Some(XML_PREFIX))
        .filter(move |ns| parent.is_none_or(|p| !p.namespaces().any(|inherited| inherited == *ns)))
        .map(|ns| {
            let name = ns.name().map_or_else(|| XMLNS.to_owned(), |prefix| format!("{XMLNS}:{prefix}"));
            (name, ns.uri().to_owned())
        })
}

fn matches_path(ancestors: &[&str], element: &Element, path: &[&str]) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };
    element.name == *last && ancestors.ends_with(parents)
}

fn escape_into(raw: &str, out: &mut String, attribute: bool) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' if attribute => out.push_str("&#x9;"),
            _ => out.push(ch),
        }
    }
}

/// An attributes document held in memory between parse and serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributesDocument {
    /// `<?xml ...?>` text of the source, when it had one.
    declaration: Option<String>,
    /// Comments and processing instructions before the root element.
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Default for AttributesDocument {
    fn default() -> Self {
        Self::from_root(Element::new(ATTRIBUTES))
    }
}

impl AttributesDocument {
    /// # Errors
    /// [`CatalogError::Xml`] for malformed text, [`CatalogError::NestingTooDeep`] past
    /// [`MAX_DEPTH`].
    pub(crate) fn parse(xml: &str) -> Result<Self, CatalogError> {
        let doc = roxmltree::Document::parse(xml).context("Parsing attributes XML")?;

        // `ancestors` yields the node itself and the document node too.
        if doc.descendants().any(|n| n.is_element() && n.ancestors().nth(MAX_DEPTH + 1).is_some()) {
            return Err(CatalogError::NestingTooDeep { limit: MAX_DEPTH, context: None });
        }

        let root = doc.root_element();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        for node in doc.root().children() {
            if node == root {
                continue;
            }
            let target = if node.range().start < root.range().start { &mut prolog } else { &mut epilog };
            target.extend(Node::from_xml(node));
        }

        Ok(Self { declaration: declaration(xml), prolog, root: Element::from_xml(root, xml), epilog })
    }

    pub(crate) const fn from_root(root: Element) -> Self {
        Self { declaration: None, prolog: Vec::new(), root, epilog: Vec::new() }
    }

    /// Empty text starts a fresh `<Attributes />` document.
    pub(crate) fn parse_or_new(xml: &str) -> Result<Self, CatalogError> {
        if xml.is_empty() { Ok(Self::default()) } else { Self::parse(xml) }
    }

    pub(crate) const fn root(&self) -> &Element {
        &self.root
    }

    /// The `ProductAttribute` blocks, document order.
    pub(crate) fn product_attributes(&self) -> Vec<&Element> {
        self.root.select(&[ATTRIBUTES, PRODUCT_ATTRIBUTE])
    }

    /// First element matching `path`, created under the `Attributes` element when absent.
    pub(crate) fn find_or_append(
        &mut self,
        path: &[&str],
        create: impl FnOnce() -> Element,
    ) -> Result<&mut Element, CatalogError> {
        if let Some(position) = self.root.find_path(|a, e| matches_path(a, e, path)) {
            return self.element_mut(&position);
        }
        Ok(self.attributes_root_mut()?.push(create()))
    }

    /// Appends one `ProductAttributeValue/Value` to the block of `mapping_id`.
    pub(crate) fn append_value(&mut self, mapping_id: i32, value: &str) -> Result<(), CatalogError> {
        let position = self.root.find_path(|ancestors, element| {
            matches_path(ancestors, element, &[ATTRIBUTES, PRODUCT_ATTRIBUTE])
                && element.mapping_id() == Some(mapping_id)
        });
        let block = match position {
            Some(position) => self.element_mut(&position)?,
            None => {
                let root = self.attributes_root_mut()?;
                root.push(Element::new(PRODUCT_ATTRIBUTE).with_attribute(ID, mapping_id.to_string()))
            },
        };
        block.push(Element::new(PRODUCT_ATTRIBUTE_VALUE).with_child(Element::with_text(VALUE, value)));
        Ok(())
    }

    fn attributes_root_mut(&mut self) -> Result<&mut Element, CatalogError> {
        let position = self.root.find_path(|_, e| e.name == ATTRIBUTES).ok_or_else(|| {
            CatalogError::MissingRoot {
                message: format!("document root is <{}>", self.root.name).into(),
                context: None,
            }
        })?;
        self.element_mut(&position)
    }

    fn element_mut(&mut self, position: &[usize]) -> Result<&mut Element, CatalogError> {
        self.root
            .at_path_mut(position)
            .ok_or_else(|| CatalogError::from("element path no longer resolves"))
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut out = self.declaration.clone().unwrap_or_default();
        for node in &self.prolog {
            node.write(&mut out);
        }
        self.root.write(&mut out);
        for node in &self.epilog {
            node.write(&mut out);
        }
        out
    }
}

/// The leading `<?xml ...?>` declaration, which `roxmltree` does not keep as a node.
fn declaration(xml: &str) -> Option<String> {
    let rest = xml.strip_prefix("<?xml")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    let end = xml.find("?>")? + 2;
    xml.get(..end).map(str::to_owned)
}
