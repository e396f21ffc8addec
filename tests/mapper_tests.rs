use mapper_sql::{
    Context, ContextOptions, Error, Mapper, MapperError, Node, Reference, format::normalize_whitespace,
};
use pretty_assertions::assert_eq;

const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE mapper PUBLIC "-//mybatis.org//DTD Mapper 3.0//EN" "http://mybatis.org/dtd/mybatis-3-mapper.dtd">
<mapper namespace="orders">
  <!-- column list shared by every select -->
  <sql id="columns">id, customer_id, total</sql>

  <resultMap id="orderMap" type="Order">
    <id property="id" column="id"/>
  </resultMap>

  <sql id="base">
    SELECT <include refid="columns"/> FROM ${table}
  </sql>

  <select id="recent">
    <include refid="base">
      <property name="table" value="orders"/>
    </include>
    WHERE created_at &gt; #{since}
  </select>

  <select id="archived">
    <include refid="base">
      <property name="table" value="orders_archive"/>
    </include>
    <![CDATA[ WHERE total < 100 ]]>
  </select>

  <select id="byCustomer">
    SELECT <include refid="customers.columns"/> FROM customers
  </select>
</mapper>
"#;

const CUSTOMERS: &str = r#"
<mapper namespace="customers">
  <sql id="columns">id, name, email</sql>
</mapper>
"#;

fn context(xmls: &[&str]) -> Context {
    let mappers: Vec<Mapper> = xmls.iter().map(|xml| Mapper::parse(xml).unwrap()).collect();
    let mut ctx = Context::with_namespace(mappers[0].namespace.clone());
    for mapper in &mappers {
        mapper.register(&mut ctx);
    }
    ctx
}

fn resolve(ctx: &mut Context, id: &str) -> String {
    normalize_whitespace(&ctx.resolve_statement(id).unwrap())
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_statements_are_indexed_by_id() {
    let mapper = Mapper::parse(ORDERS).unwrap();
    assert_eq!(mapper.namespace, "orders");
    assert_eq!(
        mapper.qualified_names(),
        vec![
            "orders.archived",
            "orders.base",
            "orders.byCustomer",
            "orders.columns",
            "orders.recent",
        ]
    );
    assert_eq!(mapper.fragment("recent").unwrap().kind, "select");
    assert!(mapper.fragment("orderMap").is_none());
}

#[test]
fn test_include_is_built_with_properties() {
    let mapper = Mapper::parse(ORDERS).unwrap();
    let recent = mapper.fragment("recent").unwrap();

    let include = recent
        .children
        .iter()
        .find_map(|child| match child {
            Node::Include(node) => Some(node),
            _ => None,
        })
        .unwrap();

    assert_eq!(include.namespace(), "orders");
    assert_eq!(include.reference, Some(Reference::Literal("base".to_string())));
    assert_eq!(include.properties["table"].value, "orders");
}

#[test]
fn test_register_installs_qualified_names() {
    let ctx = context(&[ORDERS, CUSTOMERS]);
    assert!(ctx.get_sql("orders.base").is_some());
    assert!(ctx.get_sql("customers.columns").is_some());
    assert!(ctx.get_sql("base").is_none());
}

#[test]
fn test_register_reports_replaced_fragments() {
    let mut ctx = Context::with_namespace("customers");
    let first = Mapper::parse(CUSTOMERS).unwrap();
    assert!(first.register(&mut ctx).is_empty());

    let second = Mapper::parse(
        r#"<mapper namespace="customers">
  <sql id="columns">id</sql>
  <sql id="extra">email</sql>
</mapper>"#,
    )
    .unwrap();
    assert_eq!(second.register(&mut ctx), vec!["customers.columns"]);
    assert_eq!(ctx.resolve_statement("columns").unwrap(), "id");
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolve_nested_includes() {
    let mut ctx = context(&[ORDERS]);
    assert_eq!(
        resolve(&mut ctx, "recent"),
        "SELECT id, customer_id, total FROM orders WHERE created_at > #{since}"
    );
}

#[test]
fn test_resolve_cdata_section() {
    let mut ctx = context(&[ORDERS]);
    assert_eq!(
        resolve(&mut ctx, "archived"),
        "SELECT id, customer_id, total FROM orders_archive WHERE total < 100"
    );
}

#[test]
fn test_resolve_cross_namespace_include() {
    let mut ctx = context(&[ORDERS, CUSTOMERS]);
    assert_eq!(
        resolve(&mut ctx, "byCustomer"),
        "SELECT id, name, email FROM customers"
    );
    assert_eq!(
        resolve(&mut ctx, "customers.columns"),
        "id, name, email"
    );
}

#[test]
fn test_cross_namespace_include_without_target_mapper() {
    let mut ctx = context(&[ORDERS]);
    assert_eq!(
        ctx.resolve_statement("byCustomer"),
        Err(Error::FragmentNotFound("customers.columns".to_string()))
    );
}

#[test]
fn test_base_without_binding_is_undefined() {
    let mut ctx = context(&[ORDERS]);
    assert_eq!(
        ctx.resolve_statement("base"),
        Err(Error::UndefinedVariable("table".to_string()))
    );
}

#[test]
fn test_sibling_statements_share_bindings_by_default() {
    let mut ctx = context(&[ORDERS]);
    resolve(&mut ctx, "archived");
    assert_eq!(ctx.get_variable("table"), Some("orders_archive"));
    assert_eq!(
        resolve(&mut ctx, "base"),
        "SELECT id, customer_id, total FROM orders_archive"
    );
}

#[test]
fn test_scoped_context_forgets_bindings() {
    let mapper = Mapper::parse(ORDERS).unwrap();
    let mut ctx = Context::with_namespace("orders")
        .with_options(ContextOptions::default().scoped_bindings(true));
    mapper.register(&mut ctx);

    resolve(&mut ctx, "archived");
    assert_eq!(ctx.get_variable("table"), None);
}

#[test]
fn test_variable_refid_from_markup() {
    let xml = r#"
<mapper namespace="reports">
  <sql id="daily">SELECT day, SUM(total) FROM orders GROUP BY day</sql>
  <sql id="monthly">SELECT month, SUM(total) FROM orders GROUP BY month</sql>
  <select id="report"><include refid="${granularity}"/></select>
</mapper>"#;
    let mut ctx = context(&[xml]);
    ctx.set_variable("granularity", "reports.monthly");
    assert_eq!(
        resolve(&mut ctx, "report"),
        "SELECT month, SUM(total) FROM orders GROUP BY month"
    );
}

#[test]
fn test_cycle_in_markup() {
    let xml = r#"
<mapper namespace="cyc">
  <sql id="a">A <include refid="b"/></sql>
  <sql id="b">B <include refid="a"/></sql>
</mapper>"#;
    let mut ctx = context(&[xml]);
    assert_eq!(
        ctx.resolve_statement("b"),
        Err(Error::CyclicReference(vec![
            "cyc.b".to_string(),
            "cyc.a".to_string(),
            "cyc.b".to_string(),
        ]))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_namespace() {
    let result = Mapper::parse(r#"<mapper><sql id="a">x</sql></mapper>"#);
    assert!(matches!(result, Err(MapperError::MissingNamespace)));
}

#[test]
fn test_missing_mapper_root() {
    let result = Mapper::parse(r#"<configuration></configuration>"#);
    assert!(matches!(result, Err(MapperError::MissingMapper)));

    let result = Mapper::parse("");
    assert!(matches!(result, Err(MapperError::MissingMapper)));
}

#[test]
fn test_missing_id() {
    let result = Mapper::parse(r#"<mapper namespace="m"><select>x</select></mapper>"#);
    assert!(matches!(result, Err(MapperError::MissingId(kind)) if kind == "select"));
}

#[test]
fn test_duplicate_id() {
    let result = Mapper::parse(
        r#"<mapper namespace="m"><sql id="a">x</sql><select id="a">y</select></mapper>"#,
    );
    assert!(matches!(result, Err(MapperError::DuplicateId(id)) if id == "a"));
}

#[test]
fn test_unsupported_element() {
    let result = Mapper::parse(
        r#"<mapper namespace="m"><select id="a">x <if test="y">z</if></select></mapper>"#,
    );
    assert!(matches!(result, Err(MapperError::UnsupportedElement(name)) if name == "if"));
}

#[test]
fn test_duplicate_property_in_markup() {
    let result = Mapper::parse(
        r#"<mapper namespace="m">
  <select id="a">
    <include refid="b">
      <property name="t" value="1"/>
      <property name="t" value="2"/>
    </include>
  </select>
</mapper>"#,
    );
    assert!(matches!(
        result,
        Err(MapperError::Node(Error::DuplicateProperty(name))) if name == "t"
    ));
}

#[test]
fn test_invalid_refid_in_markup() {
    let result = Mapper::parse(
        r#"<mapper namespace="m"><select id="a"><include refid="x${y}"/></select></mapper>"#,
    );
    assert!(matches!(
        result,
        Err(MapperError::Node(Error::InvalidReference(refid))) if refid == "x${y}"
    ));
}

#[test]
fn test_malformed_xml() {
    let result = Mapper::parse(r#"<mapper namespace="m"><sql id="a">x</select></mapper>"#);
    assert!(matches!(result, Err(MapperError::Xml(_))));
}
