use crate::{
    ast::{FragmentNode, IncludeNode, PropertyNode, TextNode},
    context::Context,
    error::Result,
};

/// One attribute of a mapper element, already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Construction half of the node contract.
///
/// A front end creates the node, hands it the element's attributes, then
/// attaches the already-built children.
pub trait Element {
    fn scan(&mut self, attributes: &[Attribute]) -> Result<()>;

    fn add_children(&mut self, children: Vec<Node>) -> Result<()>;
}

/// Resolution half of the node contract, shared by every node that can
/// produce SQL, including statement kinds defined outside this crate.
pub trait Resolve {
    fn resolve(&self, ctx: &mut Context) -> Result<String>;
}

/// Every node kind the mapper front end builds.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Character data between elements
    Text(TextNode),

    /// `<property>` override
    Property(PropertyNode),

    /// `<include refid>` reference
    Include(IncludeNode),

    /// Named statement container (`<sql>`, `<select>`, ...)
    Fragment(FragmentNode),
}

impl Element for Node {
    fn scan(&mut self, attributes: &[Attribute]) -> Result<()> {
        match self {
            Node::Text(_) => Ok(()),
            Node::Property(node) => node.scan(attributes),
            Node::Include(node) => node.scan(attributes),
            Node::Fragment(node) => node.scan(attributes),
        }
    }

    fn add_children(&mut self, children: Vec<Node>) -> Result<()> {
        match self {
            Node::Text(_) => Ok(()),
            Node::Property(node) => node.add_children(children),
            Node::Include(node) => node.add_children(children),
            Node::Fragment(node) => node.add_children(children),
        }
    }
}

impl Resolve for Node {
    fn resolve(&self, ctx: &mut Context) -> Result<String> {
        match self {
            Node::Text(node) => node.resolve(ctx),
            Node::Property(node) => node.resolve(ctx),
            Node::Include(node) => node.resolve(ctx),
            Node::Fragment(node) => node.resolve(ctx),
        }
    }
}
