pub mod ast;
pub mod cli;
pub mod context;
pub mod error;
pub mod format;
pub mod lexer;
pub mod mapper;

pub use ast::{
    Attribute, Element, FragmentNode, IncludeNode, Node, PropertyNode, Reference, Resolve,
    TextNode, Token,
};
pub use context::{Context, ContextOptions};
pub use error::{Error, LexError, Result};
pub use lexer::Lexer;
pub use mapper::{Mapper, MapperError};
