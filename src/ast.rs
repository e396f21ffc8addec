//! # Mapper SQL - Abstract Syntax Tree
//!
//! Node types built from mapper markup, and the two traits every node
//! implements.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Tokens produced from attribute values and text
//! - **[node]** - The [`Element`] / [`Resolve`] contract and the [`Node`] enum
//! - **[include]** - `<include>` references to other fragments
//! - **[property]** - `<property>` overrides carried by an include
//! - **[text]** - Character data with `${var}` substitution
//! - **[fragment]** - Named statements that concatenate their children
//!
//! ## Quick Start
//!
//! ```text
//! <mapper namespace="orders">
//!   <sql id="base">SELECT * FROM ${table}</sql>
//!   <select id="archived">
//!     <include refid="base">
//!       <property name="table" value="orders_archive"/>
//!     </include>
//!   </select>
//! </mapper>
//! ```
//!
//! Resolving `orders.archived` binds `table`, looks up `orders.base` and
//! returns `SELECT * FROM orders_archive`.
//!
//! ## Core Concepts
//!
//! ### Two-Phase Nodes
//!
//! Nodes are built with [`Element::scan`] (attributes) and
//! [`Element::add_children`] (already-built children), then turned into SQL
//! with [`Resolve::resolve`] against a shared
//! [`Context`](crate::Context).
//!
//! ### Reference Qualification
//!
//! - `refid="base"` → `<namespace of the include>.base`
//! - `refid="users.columns"` → `users.columns`, verbatim
//! - `refid="${source}"` → the current value of `source`, verbatim
//!
//! ### Binding Visibility
//!
//! Property bindings are written into the context and stay there, so a
//! nested include sees everything its ancestors bound. Sibling includes
//! see each other's bindings too unless scoped bindings are enabled.
pub mod fragment;
pub mod include;
pub mod node;
pub mod property;
pub mod text;
pub mod tokens;

pub use fragment::FragmentNode;
pub use include::{IncludeNode, Reference};
pub use node::{Attribute, Element, Node, Resolve};
pub use property::PropertyNode;
pub use text::TextNode;
pub use tokens::Token;
