use crate::{
    ast::{Resolve, Token},
    context::Context,
    error::{Error, Result},
    lexer::Lexer,
};

/// Character data inside a statement, tokenized once at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub tokens: Vec<Token>,
}

impl TextNode {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(TextNode {
            tokens: Lexer::new(text).tokenize()?,
        })
    }
}

impl Resolve for TextNode {
    /// `${name}` is replaced by the bound value; `#{expr}` is emitted as
    /// written for the executor to bind.
    fn resolve(&self, ctx: &mut Context) -> Result<String> {
        let mut sql = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => sql.push_str(text),
                Token::Variable(name) => {
                    let value = ctx
                        .get_variable(name)
                        .ok_or_else(|| Error::UndefinedVariable(name.clone()))?;
                    sql.push_str(value);
                }
                Token::Param(expr) => {
                    sql.push_str("#{");
                    sql.push_str(expr);
                    sql.push('}');
                }
                Token::Eof => {}
            }
        }
        Ok(sql)
    }
}
