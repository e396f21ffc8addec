use crate::{ast::Token, error::LexError};

/// Splits mapper text into literal runs and placeholders.
///
/// Used for both `refid` attribute values and the character data of
/// statement bodies.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn at_placeholder(&self) -> bool {
        match (self.current_char(), self.peek_char(1)) {
            (Some('$'), Some('{')) | (Some('#'), Some('{')) => true,
            (Some('$'), Some(c)) => c.is_alphabetic() || c == '_',
            _ => false,
        }
    }

    /// Reads a dotted variable name. A `.` only joins the name when another
    /// name character follows it, so `$table.` leaves the period as text.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            let joins = ch == '.' && self.peek_char(1).is_some_and(is_name_char);
            if is_name_char(ch) || joins {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `X{ ... }` starting at the sigil and returns the trimmed body.
    fn read_braced(&mut self) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // sigil
        self.advance(); // {

        let mut body = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '}' {
                self.advance();
                let body = body.trim();
                if body.is_empty() {
                    return Err(LexError::EmptyPlaceholder { position: start });
                }
                return Ok(body.to_string());
            }
            body.push(ch);
            self.advance();
        }

        Err(LexError::Unterminated { position: start })
    }

    fn read_literal(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if self.at_placeholder() {
                break;
            }
            result.push(ch);
            self.advance();
        }
        result
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match (self.current_char(), self.peek_char(1)) {
            (None, _) => Ok(Token::Eof),
            (Some('$'), Some('{')) => {
                let position = self.position;
                let name = self.read_braced()?;
                if !is_variable_name(&name) {
                    return Err(LexError::InvalidName { name, position });
                }
                Ok(Token::Variable(name))
            }
            (Some('#'), Some('{')) => self.read_braced().map(Token::Param),
            (Some('$'), Some(c)) if c.is_alphabetic() || c == '_' => {
                self.advance();
                Ok(Token::Variable(self.read_identifier()))
            }
            _ => Ok(Token::Literal(self.read_literal())),
        }
    }

    /// Consumes the lexer and returns every token up to, not including, `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => break,
                token => tokens.push(token),
            }
        }
        tracing::trace!(count = tokens.len(), "tokenized mapper text");
        Ok(tokens)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Letter or `_`, then name characters, with single dots between segments.
fn is_variable_name(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|first| first.is_alphabetic() || first == '_')
            && chars.all(is_name_char)
    })
}

#[test]
fn test_literal_run() {
    let mut lexer = Lexer::new("orders.base");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Literal("orders.base".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_mixed_text() {
    let tokens = Lexer::new("SELECT * FROM ${table} WHERE id = #{id}")
        .tokenize()
        .unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Literal("SELECT * FROM ".to_string()),
            Token::Variable("table".to_string()),
            Token::Literal(" WHERE id = ".to_string()),
            Token::Param("id".to_string()),
        ]
    );
}

#[test]
fn test_lone_dollar_is_literal() {
    let tokens = Lexer::new("price $ 5").tokenize().unwrap();
    assert_eq!(tokens, vec![Token::Literal("price $ 5".to_string())]);
}
