//! Loads `<mapper>` documents into fragment nodes.
//!
//! Only the elements the include machinery needs are understood inside a
//! statement: character data, `<include>` and `<property>`. Mapper-level
//! elements that are not statements (`<resultMap>`, `<cache>`, ...) are
//! skipped whole.

use std::{collections::BTreeMap, rc::Rc};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{Attribute, Element, FragmentNode, IncludeNode, Node, PropertyNode, TextNode},
    context::{Context, qualify},
    error::Error,
};

const STATEMENT_KINDS: [&str; 5] = ["sql", "select", "insert", "update", "delete"];

/// Errors that can occur while loading a mapper document.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("malformed mapper XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("mapper text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Node(#[from] Error),

    #[error("document has no <mapper> root element")]
    MissingMapper,

    #[error("<mapper> element has no namespace")]
    MissingNamespace,

    #[error("<{0}> element has no id")]
    MissingId(String),

    #[error("statement id {0} is declared twice")]
    DuplicateId(String),

    #[error("unsupported element <{0}> inside a statement")]
    UnsupportedElement(String),
}

/// The statements declared by one `<mapper>` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapper {
    pub namespace: String,
    /// Statements keyed by their unqualified id
    pub fragments: BTreeMap<String, FragmentNode>,
}

impl Mapper {
    /// Parses a mapper document.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapper_sql::{Context, Mapper};
    ///
    /// let mapper = Mapper::parse(
    ///     r#"<mapper namespace="orders">
    ///          <sql id="base">SELECT * FROM orders</sql>
    ///          <select id="all"><include refid="base"/></select>
    ///        </mapper>"#,
    /// )
    /// .unwrap();
    ///
    /// let mut ctx = Context::with_namespace("orders");
    /// mapper.register(&mut ctx);
    /// assert_eq!(ctx.resolve_statement("all").unwrap(), "SELECT * FROM orders");
    /// ```
    pub fn parse(xml: &str) -> Result<Self, MapperError> {
        let mut reader = Reader::from_str(xml);
        let mut mapper: Option<Mapper> = None;
        // Open elements below the statement level, each with its children so far
        let mut stack: Vec<(Node, Vec<Node>)> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => match mapper.as_mut() {
                    None => mapper = Some(open_mapper(&e)?),
                    Some(current) => {
                        if stack.is_empty() && !is_statement(&e) {
                            reader.read_to_end(e.to_end().name())?;
                            continue;
                        }
                        let node = open_node(&e, &current.namespace, stack.is_empty())?;
                        stack.push((node, Vec::new()));
                    }
                },
                Event::Empty(e) => match mapper.as_mut() {
                    None => mapper = Some(open_mapper(&e)?),
                    Some(current) => {
                        if stack.is_empty() && !is_statement(&e) {
                            continue;
                        }
                        let node = open_node(&e, &current.namespace, stack.is_empty())?;
                        close_node(node, Vec::new(), &mut stack, current)?;
                    }
                },
                Event::End(_) => match (stack.pop(), mapper.as_mut()) {
                    (Some((node, children)), Some(current)) => {
                        close_node(node, children, &mut stack, current)?;
                    }
                    // </mapper>
                    _ => {}
                },
                Event::Text(e) => {
                    if let Some((_, children)) = stack.last_mut() {
                        children.push(Node::Text(TextNode::parse(&e.unescape()?)?));
                    }
                }
                Event::CData(e) => {
                    if let Some((_, children)) = stack.last_mut() {
                        children.push(Node::Text(TextNode::parse(std::str::from_utf8(&e)?)?));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let mapper = mapper.ok_or(MapperError::MissingMapper)?;
        debug!(
            namespace = %mapper.namespace,
            fragments = mapper.fragments.len(),
            "loaded mapper"
        );
        Ok(mapper)
    }

    pub fn fragment(&self, id: &str) -> Option<&FragmentNode> {
        self.fragments.get(id)
    }

    /// Qualified names of every statement, in id order.
    pub fn qualified_names(&self) -> Vec<String> {
        self.fragments
            .keys()
            .map(|id| qualify(&self.namespace, id))
            .collect()
    }

    /// Installs every statement into `ctx` under `namespace.id`.
    ///
    /// A fragment already registered under the same qualified name is
    /// replaced; the replaced names are returned in id order.
    pub fn register(&self, ctx: &mut Context) -> Vec<String> {
        let mut replaced = Vec::new();
        for (id, fragment) in &self.fragments {
            let qualified = qualify(&self.namespace, id);
            if ctx
                .register(qualified.clone(), Rc::new(fragment.clone()))
                .is_some()
            {
                replaced.push(qualified);
            }
        }
        replaced
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn is_statement(e: &BytesStart<'_>) -> bool {
    STATEMENT_KINDS.contains(&element_name(e).as_str())
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<Attribute>, MapperError> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        attributes.push(Attribute::new(
            String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
            attr.unescape_value()?.into_owned(),
        ));
    }
    Ok(attributes)
}

fn open_mapper(e: &BytesStart<'_>) -> Result<Mapper, MapperError> {
    if element_name(e) != "mapper" {
        return Err(MapperError::MissingMapper);
    }
    let namespace = attributes(e)?
        .into_iter()
        .find(|attr| attr.name == "namespace")
        .map(|attr| attr.value)
        .filter(|namespace| !namespace.is_empty())
        .ok_or(MapperError::MissingNamespace)?;

    Ok(Mapper {
        namespace,
        fragments: BTreeMap::new(),
    })
}

fn open_node(
    e: &BytesStart<'_>,
    namespace: &str,
    top_level: bool,
) -> Result<Node, MapperError> {
    let name = element_name(e);
    let mut node = match name.as_str() {
        kind if top_level && STATEMENT_KINDS.contains(&kind) => {
            Node::Fragment(FragmentNode::new(kind))
        }
        "include" if !top_level => Node::Include(IncludeNode::new(namespace)),
        "property" if !top_level => Node::Property(PropertyNode::default()),
        _ => return Err(MapperError::UnsupportedElement(name)),
    };
    node.scan(&attributes(e)?)?;
    Ok(node)
}

fn close_node(
    mut node: Node,
    children: Vec<Node>,
    stack: &mut [(Node, Vec<Node>)],
    mapper: &mut Mapper,
) -> Result<(), MapperError> {
    node.add_children(children)?;

    if let Some((_, siblings)) = stack.last_mut() {
        siblings.push(node);
        return Ok(());
    }

    let Node::Fragment(fragment) = node else {
        return Ok(());
    };
    if fragment.id.is_empty() {
        return Err(MapperError::MissingId(fragment.kind));
    }
    if mapper.fragments.contains_key(&fragment.id) {
        return Err(MapperError::DuplicateId(fragment.id));
    }
    mapper.fragments.insert(fragment.id.clone(), fragment);
    Ok(())
}
