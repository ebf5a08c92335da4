//! Lexer for LS-8 program text
//!
//! A program is written one byte per line as a binary literal. Everything after
//! a `#` is a comment, and blank lines are skipped:
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```
//!
//! Literals may carry a `0b` prefix and `_` separators (`0b1000_0010`).

use std::num::IntErrorKind;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("line {line}: invalid binary literal '{literal}'")]
    InvalidLiteral { line: usize, literal: String },

    #[error("line {line}: '{literal}' does not fit in 8 bits")]
    Overflow { line: usize, literal: String },
}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// 1-based source line.
    pub line: usize,
    pub literal: String,
    pub value: u8,
}

#[derive(Debug, Clone)]
pub struct Lexer<'l> {
    pub src: &'l str,
}

impl<'l> Lexer<'l> {
    pub fn new(src: &'l str) -> Self {
        Lexer { src }
    }

    /// Strip the comment and surrounding whitespace from a line.
    fn code(line: &str) -> &str {
        line.split('#').next().unwrap_or("").trim()
    }

    fn parse_literal(line: usize, literal: &str) -> LexResult<u8> {
        let digits: String = literal
            .strip_prefix("0b")
            .unwrap_or(literal)
            .chars()
            .filter(|&c| c != '_')
            .collect();

        let invalid = || LexError::InvalidLiteral {
            line,
            literal: literal.to_string(),
        };

        if digits.is_empty() || !digits.chars().all(|c| c == '0' || c == '1') {
            return Err(invalid());
        }

        u8::from_str_radix(&digits, 2).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => LexError::Overflow {
                line,
                literal: literal.to_string(),
            },
            _ => invalid(),
        })
    }

    pub fn lex(&mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();

        for (i, raw) in self.src.lines().enumerate() {
            let literal = Self::code(raw);
            if literal.is_empty() {
                continue;
            }

            let line = i + 1;
            tokens.push(Token {
                line,
                literal: literal.to_string(),
                value: Self::parse_literal(line, literal)?,
            });
        }

        Ok(tokens)
    }
}

/// Parse program text into the bytes of a program image.
pub fn parse_program(src: &str) -> LexResult<Vec<u8>> {
    let tokens = Lexer::new(src).lex()?;
    Ok(tokens.into_iter().map(|t| t.value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines() {
        let src = "# print8.ls8\n\n10000010 # LDI R0,8\n00000000\n00001000\n   \n01000111\n00000000\n00000001 # HLT\n";
        assert_eq!(
            parse_program(src).unwrap(),
            vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]
        );
    }

    #[test]
    fn test_token_lines() {
        let mut lexer = Lexer::new("\n# header\n00000001\n");
        let tokens = lexer.lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token {
                line: 3,
                literal: "00000001".to_string(),
                value: 1
            }]
        );
    }

    #[test]
    fn test_prefix_and_separators() {
        assert_eq!(
            parse_program("0b1000_0010\n1010_0010").unwrap(),
            vec![0b1000_0010, 0b1010_0010]
        );
    }

    #[test]
    fn test_short_literals() {
        assert_eq!(parse_program("1\n101").unwrap(), vec![1, 5]);
    }

    #[test]
    fn test_invalid_literal() {
        let err = parse_program("00000001\n0000002\n").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidLiteral {
                line: 2,
                literal: "0000002".to_string()
            }
        );
        assert_eq!(err.to_string(), "line 2: invalid binary literal '0000002'");

        assert!(parse_program("0b").is_err());
        assert!(parse_program("LDI").is_err());
    }

    #[test]
    fn test_overflow() {
        let err = parse_program("100000000").unwrap_err();
        assert_eq!(
            err,
            LexError::Overflow {
                line: 1,
                literal: "100000000".to_string()
            }
        );
    }
}
