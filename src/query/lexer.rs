// src/query/lexer.rs

//! Tokenizer for filter expressions

use super::QueryParseError;

/// A lexical token with its byte offset in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TokenKind {
    Or,
    And,
    Not,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    /// Relation operator inside a value clause: `=`, `<<`, `<=`, `<`, `>>`, `>=`, `>`, `%`, `~`
    Operator(String),
    /// Bare word or quoted string
    Word(String),
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Or => "'|'".to_string(),
            TokenKind::And => "','".to_string(),
            TokenKind::Not => "'!'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::Operator(op) => format!("operator '{op}'"),
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(c, '|' | ',' | '!' | '(' | ')' | '{' | '}' | '"' | '\'')
}

fn is_operator_start(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '%' | '~')
}

/// Split `input` into tokens, always ending with `Eof`
pub(super) fn tokenize(input: &str) -> Result<Vec<Token>, QueryParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let single = match c {
            '|' => Some(TokenKind::Or),
            ',' => Some(TokenKind::And),
            '!' => Some(TokenKind::Not),
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            tokens.push(Token { kind, position });
            continue;
        }

        if c == '"' || c == '\'' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                match ch {
                    '\\' => match chars.next() {
                        Some((_, escaped)) => value.push(escaped),
                        None => break,
                    },
                    ch if ch == c => {
                        closed = true;
                        break;
                    }
                    ch => value.push(ch),
                }
            }
            if !closed {
                return Err(QueryParseError::new(position, "unterminated quoted string"));
            }
            tokens.push(Token {
                kind: TokenKind::Word(value),
                position,
            });
            continue;
        }

        if is_operator_start(c) {
            chars.next();
            let mut op = c.to_string();
            if let Some(&(_, next)) = chars.peek() {
                let doubled = matches!((c, next), ('<', '<') | ('<', '=') | ('>', '>') | ('>', '='));
                if doubled {
                    op.push(next);
                    chars.next();
                }
            }
            tokens.push(Token {
                kind: TokenKind::Operator(op),
                position,
            });
            continue;
        }

        let mut word = String::new();
        while let Some(&(_, ch)) = chars.peek() {
            if ch.is_whitespace() || is_special(ch) {
                break;
            }
            word.push(ch);
            chars.next();
        }
        tokens.push(Token {
            kind: TokenKind::Word(word),
            position,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: input.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_field_condition_tokens() {
        assert_eq!(
            kinds("Name (nginx)"),
            vec![
                TokenKind::Word("Name".into()),
                TokenKind::LeftParen,
                TokenKind::Word("nginx".into()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("(>= 1.0) (<<2) (% a*) (~ ^x)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Operator(">=".into()),
                TokenKind::Word("1.0".into()),
                TokenKind::RightParen,
                TokenKind::LeftParen,
                TokenKind::Operator("<<".into()),
                TokenKind::Word("2".into()),
                TokenKind::RightParen,
                TokenKind::LeftParen,
                TokenKind::Operator("%".into()),
                TokenKind::Word("a*".into()),
                TokenKind::RightParen,
                TokenKind::LeftParen,
                TokenKind::Operator("~".into()),
                TokenKind::Word("^x".into()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_string_with_escape() {
        assert_eq!(
            kinds(r#"Description ("a \"b\" c")"#),
            vec![
                TokenKind::Word("Description".into()),
                TokenKind::LeftParen,
                TokenKind::Word("a \"b\" c".into()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("Name ('nginx)").unwrap_err();
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_word_keeps_version_characters() {
        assert_eq!(
            kinds("libc6_2.36-9+deb12u4_amd64"),
            vec![TokenKind::Word("libc6_2.36-9+deb12u4_amd64".into()), TokenKind::Eof]
        );
    }
}
