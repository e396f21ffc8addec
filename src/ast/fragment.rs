use crate::{
    ast::{Attribute, Element, Node, Resolve},
    context::Context,
    error::Result,
};

/// A named statement: `<sql>`, `<select>`, `<insert>`, `<update>` or
/// `<delete>`. Resolves to the concatenation of its children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentNode {
    /// Element name the fragment was declared with
    pub kind: String,
    pub id: String,
    pub children: Vec<Node>,
}

impl FragmentNode {
    pub fn new(kind: impl Into<String>) -> Self {
        FragmentNode {
            kind: kind.into(),
            ..FragmentNode::default()
        }
    }
}

impl Element for FragmentNode {
    fn scan(&mut self, attributes: &[Attribute]) -> Result<()> {
        if let Some(attr) = attributes.iter().find(|attr| attr.name == "id") {
            self.id = attr.value.clone();
        }
        Ok(())
    }

    fn add_children(&mut self, children: Vec<Node>) -> Result<()> {
        self.children.extend(children);
        Ok(())
    }
}

impl Resolve for FragmentNode {
    fn resolve(&self, ctx: &mut Context) -> Result<String> {
        let mut sql = String::new();
        for child in &self.children {
            sql.push_str(&child.resolve(ctx)?);
        }
        Ok(sql)
    }
}
