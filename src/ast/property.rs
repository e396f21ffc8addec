use crate::{
    ast::{Attribute, Element, Node, Resolve},
    context::Context,
    error::Result,
};

/// `<property name="..." value="..."/>`
///
/// A binding carried by its owning include. Contributes no SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyNode {
    pub name: String,
    pub value: String,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        PropertyNode {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Element for PropertyNode {
    fn scan(&mut self, attributes: &[Attribute]) -> Result<()> {
        for attr in attributes {
            match attr.name.as_str() {
                "name" => self.name = attr.value.clone(),
                "value" => self.value = attr.value.clone(),
                _ => {}
            }
        }
        Ok(())
    }

    fn add_children(&mut self, _children: Vec<Node>) -> Result<()> {
        Ok(())
    }
}

impl Resolve for PropertyNode {
    fn resolve(&self, _ctx: &mut Context) -> Result<String> {
        Ok(String::new())
    }
}
