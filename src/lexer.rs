// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the BCL language.
// Converts source code text into a stream of tokens for parsing.
//
// Supports:
// - Type keywords: boolean, int, double, string, void
// - Keywords: struct, if, elseif, else, for, return, printf, new, break, null
// - Identifiers, numbers, and string literals (quotes are kept in the token text)
// - Operators: +, -, *, /, %, =, ==, !=, <, >, <=, >=, &&, ||, !
// - Punctuation: ( ) { } ; , .

use crate::errors::SourceLocation;
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Token categories. Identifiers, numbers, booleans and quoted strings all
/// fall under `Literal`; everything else has a dedicated label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLabel {
    // Type keywords
    Boolean,
    Int,
    Double,
    Str,
    Void,
    // Keywords
    Struct,
    If,
    Elseif,
    Else,
    For,
    Return,
    Printf,
    New,
    Break,
    Null,
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,
    Assign,
    // Arithmetic operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Relational operators
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    // Logical operators
    And,
    Or,
    Not,
    // Identifiers, numbers, booleans, quoted strings
    Literal,
}

impl TokenLabel {
    /// Tokens that may name a type in a declaration position.
    pub fn is_type_token(self) -> bool {
        matches!(
            self,
            TokenLabel::Boolean
                | TokenLabel::Int
                | TokenLabel::Double
                | TokenLabel::Str
                | TokenLabel::Void
                | TokenLabel::Literal
        )
    }

    /// Tokens that may appear inside an arithmetic expression window.
    pub fn is_expression_token(self) -> bool {
        matches!(
            self,
            TokenLabel::LParen
                | TokenLabel::RParen
                | TokenLabel::Comma
                | TokenLabel::Dot
                | TokenLabel::New
                | TokenLabel::Null
                | TokenLabel::Add
                | TokenLabel::Sub
                | TokenLabel::Mul
                | TokenLabel::Div
                | TokenLabel::Mod
                | TokenLabel::Literal
        )
    }

    /// Tokens that may appear inside a boolean expression window.
    pub fn is_comp_expression_token(self) -> bool {
        self.is_expression_token()
            || matches!(
                self,
                TokenLabel::Eq
                    | TokenLabel::Ne
                    | TokenLabel::Lt
                    | TokenLabel::Gt
                    | TokenLabel::Le
                    | TokenLabel::Ge
                    | TokenLabel::And
                    | TokenLabel::Or
                    | TokenLabel::Not
            )
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub label: TokenLabel,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    /// True when the token can serve as a name: a `Literal` that is neither a
    /// number nor a quoted string.
    pub fn is_identifier(&self) -> bool {
        self.label == TokenLabel::Literal
            && !self.text.starts_with(|c: char| c.is_ascii_digit() || c == '"')
    }
}

static KEYWORDS: Lazy<AHashMap<&'static str, TokenLabel>> = Lazy::new(|| {
    let mut map = AHashMap::new();
    map.insert("boolean", TokenLabel::Boolean);
    map.insert("int", TokenLabel::Int);
    map.insert("double", TokenLabel::Double);
    map.insert("string", TokenLabel::Str);
    map.insert("void", TokenLabel::Void);
    map.insert("struct", TokenLabel::Struct);
    map.insert("if", TokenLabel::If);
    map.insert("elseif", TokenLabel::Elseif);
    map.insert("else", TokenLabel::Else);
    map.insert("for", TokenLabel::For);
    map.insert("return", TokenLabel::Return);
    map.insert("printf", TokenLabel::Printf);
    map.insert("new", TokenLabel::New);
    map.insert("break", TokenLabel::Break);
    map.insert("null", TokenLabel::Null);
    map
});

fn label_of(text: &str) -> TokenLabel {
    KEYWORDS.get(text).copied().unwrap_or(TokenLabel::Literal)
}

/// Tokenizes BCL source code into a vector of tokens.
///
/// Processes the input character by character, recognizing keywords,
/// identifiers, numbers, strings, operators, and punctuation. Line and column
/// numbers are 1-based and point at the first character of each token.
/// String literals keep their surrounding quotes in the token text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut col = 1;

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
                col += 1;
            }
            '\n' => {
                chars.next();
                line += 1;
                col = 1;
            }
            '"' => {
                let start_line = line;
                let start_col = col;
                let mut text = String::from('"');
                chars.next();
                col += 1;
                let mut escaped = false;
                while let Some(&ch) = chars.peek() {
                    chars.next();
                    if ch == '\n' {
                        line += 1;
                        col = 1;
                    } else {
                        col += 1;
                    }
                    text.push(ch);
                    if ch == '"' && !escaped {
                        break;
                    }
                    escaped = ch == '\\' && !escaped;
                }
                tokens.push(Token {
                    label: TokenLabel::Literal,
                    text,
                    line: start_line,
                    column: start_col,
                });
            }
            '0'..='9' => {
                let start_col = col;
                let mut num = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        num.push(ch);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    label: TokenLabel::Literal,
                    text: num,
                    line,
                    column: start_col,
                });
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start_col = col;
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    label: label_of(&ident),
                    text: ident,
                    line,
                    column: start_col,
                });
            }
            '=' | '!' | '<' | '>' => {
                let start_col = col;
                let op = c;
                chars.next();
                col += 1;
                let (label, text) = if chars.peek() == Some(&'=') {
                    chars.next();
                    col += 1;
                    match op {
                        '=' => (TokenLabel::Eq, "=="),
                        '!' => (TokenLabel::Ne, "!="),
                        '<' => (TokenLabel::Le, "<="),
                        _ => (TokenLabel::Ge, ">="),
                    }
                } else {
                    match op {
                        '=' => (TokenLabel::Assign, "="),
                        '!' => (TokenLabel::Not, "!"),
                        '<' => (TokenLabel::Lt, "<"),
                        _ => (TokenLabel::Gt, ">"),
                    }
                };
                tokens.push(Token {
                    label,
                    text: text.to_string(),
                    line,
                    column: start_col,
                });
            }
            '&' | '|' => {
                let start_col = col;
                chars.next();
                col += 1;
                if chars.peek() == Some(&c) {
                    chars.next();
                    col += 1;
                    let (label, text) = if c == '&' {
                        (TokenLabel::And, "&&")
                    } else {
                        (TokenLabel::Or, "||")
                    };
                    tokens.push(Token {
                        label,
                        text: text.to_string(),
                        line,
                        column: start_col,
                    });
                } else {
                    // Lone '&' or '|' survives as a literal; the parser rejects it.
                    tokens.push(Token {
                        label: TokenLabel::Literal,
                        text: c.to_string(),
                        line,
                        column: start_col,
                    });
                }
            }
            '+' | '-' | '*' | '/' | '%' | '(' | ')' | '{' | '}' | ';' | ',' | '.' => {
                let label = match c {
                    '+' => TokenLabel::Add,
                    '-' => TokenLabel::Sub,
                    '*' => TokenLabel::Mul,
                    '/' => TokenLabel::Div,
                    '%' => TokenLabel::Mod,
                    '(' => TokenLabel::LParen,
                    ')' => TokenLabel::RParen,
                    '{' => TokenLabel::LBrace,
                    '}' => TokenLabel::RBrace,
                    ';' => TokenLabel::Semicolon,
                    ',' => TokenLabel::Comma,
                    _ => TokenLabel::Dot,
                };
                tokens.push(Token {
                    label,
                    text: c.to_string(),
                    line,
                    column: col,
                });
                chars.next();
                col += 1;
            }
            _ => {
                chars.next();
                col += 1;
            }
        }
    }

    tokens
}
