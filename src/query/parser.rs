// src/query/parser.rs

//! Recursive-descent parser for filter expressions

use super::lexer::{Token, TokenKind, tokenize};
use super::{FieldCondition, PackageCondition, Query, QueryParseError, Relation};
use regex::Regex;

/// Deepest run of nested groups and negations accepted
const MAX_DEPTH: usize = 256;

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, QueryParseError> {
        if input.trim().is_empty() {
            return Err(QueryParseError::new(0, "empty filter expression"));
        }
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            depth: 0,
        })
    }

    pub fn parse(mut self) -> Result<Query, QueryParseError> {
        let query = self.parse_or()?;
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            return Err(self.unexpected(token.clone()));
        }
        Ok(query)
    }

    fn peek(&self) -> &Token {
        // tokenize always appends Eof, and advance never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, token: Token) -> QueryParseError {
        QueryParseError::new(
            token.position,
            format!("unexpected {}", token.kind.describe()),
        )
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, QueryParseError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(QueryParseError::new(
                token.position,
                format!(
                    "expected {}, found {}",
                    kind.describe(),
                    token.kind.describe()
                ),
            ))
        }
    }

    fn descend(&mut self, position: usize) -> Result<(), QueryParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(QueryParseError::new(
                position,
                format!("expression nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Query, QueryParseError> {
        let mut left = self.parse_and()?;
        while self.peek().kind == TokenKind::Or {
            self.advance();
            let right = self.parse_and()?;
            left = Query::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Query, QueryParseError> {
        let mut left = self.parse_not()?;
        while self.peek().kind == TokenKind::And {
            self.advance();
            let right = self.parse_not()?;
            left = Query::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Query, QueryParseError> {
        if self.peek().kind == TokenKind::Not {
            let token = self.advance();
            self.descend(token.position)?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Query::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Query, QueryParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::LeftParen => {
                self.descend(token.position)?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RightParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Word(word) => self.parse_condition(word, token.position),
            _ => Err(self.unexpected(token)),
        }
    }

    fn parse_condition(&mut self, word: String, position: usize) -> Result<Query, QueryParseError> {
        if word.is_empty() {
            return Err(QueryParseError::new(position, "empty field or package name"));
        }

        let (relation, operand) = if self.peek().kind == TokenKind::LeftParen {
            self.advance();
            let clause = self.parse_value_clause()?;
            (clause.0, Some(clause.1))
        } else {
            (Relation::Equal, None)
        };

        let architecture = if self.peek().kind == TokenKind::LeftBrace {
            let brace = self.advance();
            let arch = match self.advance() {
                Token {
                    kind: TokenKind::Word(arch),
                    ..
                } if !arch.is_empty() => arch,
                other => return Err(self.unexpected(other)),
            };
            self.expect(TokenKind::RightBrace)?;
            Some((arch, brace.position))
        } else {
            None
        };

        let is_field = word.starts_with('$') || word.starts_with(|c: char| c.is_ascii_uppercase());
        if is_field {
            if let Some((_, brace_position)) = architecture {
                return Err(QueryParseError::new(
                    brace_position,
                    format!("architecture restriction not allowed on field {word}"),
                ));
            }
            return Ok(Query::Field(FieldCondition {
                field: word,
                relation,
                value: operand,
            }));
        }

        Ok(Query::Package(PackageCondition {
            name: word,
            relation,
            version: operand,
            architecture: architecture.map(|(arch, _)| arch),
        }))
    }

    /// Parse `[operator] value ')'` after an opening parenthesis
    fn parse_value_clause(&mut self) -> Result<(Relation, String), QueryParseError> {
        let relation = match self.peek().kind.clone() {
            TokenKind::Operator(op) => {
                let token = self.advance();
                Relation::from_operator(&op).ok_or_else(|| {
                    QueryParseError::new(token.position, format!("unknown operator '{op}'"))
                })?
            }
            _ => Relation::Equal,
        };

        let token = self.advance();
        let value = match token.kind {
            TokenKind::Word(value) if !value.is_empty() => value,
            TokenKind::RightParen => {
                return Err(QueryParseError::new(token.position, "expected value"));
            }
            _ => return Err(self.unexpected(token)),
        };

        if relation == Relation::Regex {
            if let Err(e) = Regex::new(&value) {
                return Err(QueryParseError::new(
                    token.position,
                    format!("invalid regular expression: {e}"),
                ));
            }
        }

        self.expect(TokenKind::RightParen)?;
        Ok((relation, value))
    }
}
