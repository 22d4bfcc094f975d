use std::fmt;
use std::str::FromStr;

use crate::sql::parser::Keyword;

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A character no lexing rule matched.
    Illegal,
    /// End of input. Repeated calls past the end keep yielding this.
    Eof,

    Ident,
    Int,
    Str,
    Keyword(Keyword),

    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Comma,
    Semicolon,
    LParen,
    RParen,
    Asterisk,
    Dot,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::Keyword(kw) => return write!(f, "{kw}"),
            TokenKind::Eq => "=",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Asterisk => "*",
            TokenKind::Dot => ".",
        };
        write!(f, "{s}")
    }
}

/// A token with its source text and 1-based position, used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub literal: &'src str,
    pub line: u32,
    pub column: u32,
}

/// Hand-written SQL lexer with one character of lookahead.
///
/// The lexer never fails: unexpected characters come back as
/// [`TokenKind::Illegal`] tokens and unterminated strings truncate at the
/// end of input.
pub struct Lexer<'src> {
    input: &'src str,
    /// Byte offset of the current character
    position: usize,
    /// Byte offset just past the current character
    read_position: usize,
    ch: Option<char>,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: None,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;
        let start = self.position;

        let Some(ch) = self.ch else {
            return Token {
                kind: TokenKind::Eof,
                literal: "",
                line,
                column,
            };
        };

        let kind = match ch {
            '=' => TokenKind::Eq,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '*' => TokenKind::Asterisk,
            '.' => TokenKind::Dot,
            '<' => match self.peek_char() {
                Some('=') => {
                    self.read_char();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.read_char();
                    TokenKind::NotEq
                }
                _ => TokenKind::Lt,
            },
            '>' => match self.peek_char() {
                Some('=') => {
                    self.read_char();
                    TokenKind::GtEq
                }
                _ => TokenKind::Gt,
            },
            '!' => match self.peek_char() {
                Some('=') => {
                    self.read_char();
                    TokenKind::NotEq
                }
                _ => TokenKind::Illegal,
            },
            '\'' | '"' => {
                let literal = self.read_string(ch);
                return Token {
                    kind: TokenKind::Str,
                    literal,
                    line,
                    column,
                };
            }
            c if c.is_ascii_digit() => {
                let literal = self.read_number();
                return Token {
                    kind: TokenKind::Int,
                    literal,
                    line,
                    column,
                };
            }
            c if c.is_ascii_alphabetic() => {
                let literal = self.read_identifier();
                let kind = Keyword::from_str(literal)
                    .map(TokenKind::Keyword)
                    .unwrap_or(TokenKind::Ident);
                return Token {
                    kind,
                    literal,
                    line,
                    column,
                };
            }
            _ => TokenKind::Illegal,
        };

        self.read_char();
        Token {
            kind,
            literal: &self.input[start..self.position],
            line,
            column,
        }
    }

    fn read_char(&mut self) {
        if self.read_position >= self.input.len() {
            if self.ch.is_some() {
                self.column += 1;
            }
            self.ch = None;
            self.position = self.input.len();
            return;
        }

        let Some(c) = self.input[self.read_position..].chars().next() else {
            self.ch = None;
            self.position = self.input.len();
            return;
        };

        self.position = self.read_position;
        self.read_position += c.len_utf8();
        self.column += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        }
        self.ch = Some(c);
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.read_position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> &'src str {
        let start = self.position;
        while matches!(self.ch, Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.read_char();
        }
        &self.input[start..self.position]
    }

    fn read_number(&mut self) -> &'src str {
        let start = self.position;
        while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
            self.read_char();
        }
        &self.input[start..self.position]
    }

    /// Reads a quoted string, returning the contents without the quotes.
    /// An unterminated string truncates at end of input.
    fn read_string(&mut self, quote: char) -> &'src str {
        let start = self.read_position;
        loop {
            self.read_char();
            match self.ch {
                Some(c) if c == quote => break,
                None => break,
                _ => {}
            }
        }

        let literal = &self.input[start..self.position];
        if self.ch.is_some() {
            // step over the closing quote
            self.read_char();
        }
        literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token();
            let kind = token.kind;
            kinds.push(kind);
            if kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn test_select_with_where() {
        let mut lexer = Lexer::new("SELECT id, name FROM users WHERE id = 5");

        let expected = [
            (TokenKind::Keyword(Keyword::Select), "SELECT"),
            (TokenKind::Ident, "id"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "name"),
            (TokenKind::Keyword(Keyword::From), "FROM"),
            (TokenKind::Ident, "users"),
            (TokenKind::Keyword(Keyword::Where), "WHERE"),
            (TokenKind::Ident, "id"),
            (TokenKind::Eq, "="),
            (TokenKind::Int, "5"),
            (TokenKind::Eof, ""),
        ];

        for (kind, literal) in expected {
            let token = lexer.next_token();
            assert_eq!(token.kind, kind);
            assert_eq!(token.literal, literal);
        }
    }

    #[test]
    fn test_multi_char_operators() {
        assert_eq!(
            lex_kinds("<= >= <> != < >"),
            vec![
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            lex_kinds("select FROM Where jOiN"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Keyword(Keyword::Join),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new("'Alice' \"Bob\"");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.literal, "Alice");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.literal, "Bob");
    }

    #[test]
    fn test_unterminated_string_truncates() {
        let mut lexer = Lexer::new("'unfinished");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.literal, "unfinished");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_illegal_character() {
        let mut lexer = Lexer::new("id @ 5");

        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Illegal);
        assert_eq!(token.literal, "@");
        assert_eq!(lexer.next_token().kind, TokenKind::Int);
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("id");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut lexer = Lexer::new("SELECT id\nFROM users");

        let token = lexer.next_token();
        assert_eq!((token.line, token.column), (1, 1));

        let token = lexer.next_token();
        assert_eq!(token.literal, "id");
        assert_eq!((token.line, token.column), (1, 8));

        let token = lexer.next_token();
        assert_eq!(token.literal, "FROM");
        assert_eq!((token.line, token.column), (2, 1));
    }

    #[test]
    fn test_qualified_star() {
        assert_eq!(
            lex_kinds("users.*"),
            vec![
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Asterisk,
                TokenKind::Eof,
            ]
        );
    }
}
