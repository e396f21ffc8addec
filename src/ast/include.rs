use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{Attribute, Element, Node, PropertyNode, Resolve, Token},
    context::{Context, qualify},
    error::{Error, Result},
    lexer::Lexer,
};

/// What an include points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Fragment id, qualified with the include's namespace when bare
    ///
    /// ```text
    /// <include refid="base"/>
    /// <include refid="users.columns"/>
    /// ```
    Literal(String),

    /// Context variable holding the qualified fragment name
    ///
    /// ```text
    /// <include refid="${source}"/>
    /// ```
    Variable(String),
}

/// `<include refid="...">` with optional `<property>` overrides.
///
/// The namespace is fixed when the node is built, so a bare `refid` always
/// points into the mapper that declared it, whichever context later
/// resolves it.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    pub reference: Option<Reference>,
    pub properties: HashMap<String, PropertyNode>,
    namespace: String,
}

impl IncludeNode {
    pub fn new(namespace: impl Into<String>) -> Self {
        IncludeNode {
            reference: None,
            properties: HashMap::new(),
            namespace: namespace.into(),
        }
    }

    /// Builds an include that belongs to `ctx`'s current namespace.
    pub fn from_context(ctx: &Context) -> Self {
        IncludeNode::new(ctx.namespace.clone())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Computes the registry key this include points at.
    pub fn qualified_name(&self, ctx: &Context) -> Result<String> {
        match &self.reference {
            Some(Reference::Literal(id)) => Ok(qualify(&self.namespace, id)),
            Some(Reference::Variable(name)) => ctx
                .get_variable(name)
                .map(str::to_string)
                .ok_or_else(|| Error::UndefinedVariable(name.clone())),
            None => Err(Error::MissingReference),
        }
    }

    fn resolve_bound(&self, ctx: &mut Context) -> Result<String> {
        for property in self.properties.values() {
            ctx.set_variable(&property.name, &property.value);
        }

        let qualified = self.qualified_name(ctx)?;
        debug!(
            fragment = %qualified,
            properties = self.properties.len(),
            "expanding include"
        );
        ctx.resolve_fragment(&qualified)
    }
}

impl Element for IncludeNode {
    fn scan(&mut self, attributes: &[Attribute]) -> Result<()> {
        for attr in attributes.iter().filter(|attr| attr.name == "refid") {
            let tokens = Lexer::new(&attr.value).tokenize()?;
            let reference = match tokens.as_slice() {
                [Token::Literal(id)] => Reference::Literal(id.clone()),
                [Token::Variable(name)] => Reference::Variable(name.clone()),
                _ => return Err(Error::InvalidReference(attr.value.clone())),
            };
            if self.reference.is_none() {
                self.reference = Some(reference);
            }
        }
        Ok(())
    }

    fn add_children(&mut self, children: Vec<Node>) -> Result<()> {
        for child in children {
            if let Node::Property(property) = child {
                if self.properties.contains_key(&property.name) {
                    return Err(Error::DuplicateProperty(property.name));
                }
                self.properties.insert(property.name.clone(), property);
            }
        }
        Ok(())
    }
}

impl Resolve for IncludeNode {
    /// Applies the property bindings, then resolves the referenced
    /// fragment against the same context.
    ///
    /// Bindings are written before the reference is looked at, so they
    /// stay in the context even when the lookup fails. With
    /// [`ContextOptions::scoped_bindings`](crate::ContextOptions) they are
    /// undone once this call returns, whatever the outcome.
    fn resolve(&self, ctx: &mut Context) -> Result<String> {
        if !ctx.options().scoped_bindings {
            return self.resolve_bound(ctx);
        }

        ctx.push_frame();
        let result = self.resolve_bound(ctx);
        ctx.pop_frame();
        result
    }
}
