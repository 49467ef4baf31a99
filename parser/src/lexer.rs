use std::{fmt::Display, vec::IntoIter};

use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum LexerError {
    #[error("{0}: The character '{1}' could not be represented")]
    UnknownCharacter(Loc, char),
    #[error("{0}: Could not convert the number \"{1}\" to a number.")]
    InvalidNumber(Loc, String),
    #[error("{0}: Identifiers can not start with numbers.")]
    IdentifierStartedWithNumber(Loc),
    #[error("{0}: Block comment is never closed.")]
    UnterminatedBlockComment(Loc),
    #[error("{0}: asm block is missing its closing '`'.")]
    UnterminatedAsmBlock(Loc),
}

impl LexerError {
    pub fn loc(&self) -> Loc {
        match self {
            LexerError::UnknownCharacter(loc, _)
            | LexerError::InvalidNumber(loc, _)
            | LexerError::IdentifierStartedWithNumber(loc)
            | LexerError::UnterminatedBlockComment(loc)
            | LexerError::UnterminatedAsmBlock(loc) => *loc,
        }
    }
}

/// Source position. `line` and `column` start at 1, `offset` is the byte offset from the start.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Loc {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TokenKind {
    Eof,
    Identifier(String),
    HexLiteral(String),
    DecimalLiteral(String),
    /// Everything between the backticks of an `asm` block.
    AsmBody(String),

    OpenBrace,    // {
    CloseBrace,   // }
    OpenBracket,  // [
    CloseBracket, // ]
    OpenParen,    // (
    CloseParen,   // )
    At,           // @
    Assign,       // =
    Exclamation,  // !
    Colon,        // :
    Comma,        // ,

    // Binary operators
    Plus,                 // +
    PlusWithCarry,        // +c
    Minus,                // -
    MinusWithCarry,       // -c
    BitwiseAnd,           // &
    BitwiseOr,            // |
    Xor,                  // ^
    ShiftLeft,            // <<
    ShiftLeftArithmetic,  // <<a
    ShiftRight,           // >>
    ShiftRightArithmetic, // >>a
    RotateLeft,           // <<<
    RotateRight,          // >>>

    // Comparison operators
    Equal,          // ==
    NotEqual,       // !=
    LessThan,       // <
    GreaterThan,    // >
    LessOrEqual,    // <=
    GreaterOrEqual, // >=

    // Keywords
    KWVar,
    KWLoop,
    KWIf,
    KWBreak,
    KWContinue,
    KWMacro,
    KWAsm,

    // Builtin instructions
    KWHalt,
    KWNop,
    KWInput,
    KWOutput,
    KWSetCarryFlag,
    KWResetCarryFlag,

    // Registers
    KWAcc,
    KWIx,

    // Flag conditions
    KWZero,
    KWNotZero,
    KWNegative,
    KWPositive,
    KWCarry,
    KWNotCarry,
    KWOverflow,
    KWZeroOrPositive,
    KWZeroOrNegative,
    KWGte,
    KWLt,
    KWGt,
    KWLte,
    KWNoInput,
    KWNoOutput,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Loc,
}

impl TokenKind {
    pub fn from_string(string: &str) -> Self {
        match string {
            "var" => Self::KWVar,
            "loop" => Self::KWLoop,
            "if" => Self::KWIf,
            "break" => Self::KWBreak,
            "continue" => Self::KWContinue,
            "macro" => Self::KWMacro,
            "asm" => Self::KWAsm,
            "halt" => Self::KWHalt,
            "nop" => Self::KWNop,
            "input" => Self::KWInput,
            "output" => Self::KWOutput,
            "set_carry_flag" => Self::KWSetCarryFlag,
            "reset_carry_flag" => Self::KWResetCarryFlag,
            "ACC" => Self::KWAcc,
            "IX" => Self::KWIx,
            "ZERO" => Self::KWZero,
            "NOT_ZERO" => Self::KWNotZero,
            "NEGATIVE" => Self::KWNegative,
            "POSITIVE" => Self::KWPositive,
            "CARRY" => Self::KWCarry,
            "NOT_CARRY" => Self::KWNotCarry,
            "OVERFLOW" => Self::KWOverflow,
            "ZERO_OR_POSITIVE" => Self::KWZeroOrPositive,
            "ZERO_OR_NEGATIVE" => Self::KWZeroOrNegative,
            "GTE" => Self::KWGte,
            "LT" => Self::KWLt,
            "GT" => Self::KWGt,
            "LTE" => Self::KWLte,
            "NO_INPUT" => Self::KWNoInput,
            "NO_OUTPUT" => Self::KWNoOutput,
            _ => Self::Identifier(string.to_owned()),
        }
    }

    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::PlusWithCarry
                | TokenKind::Minus
                | TokenKind::MinusWithCarry
                | TokenKind::BitwiseAnd
                | TokenKind::BitwiseOr
                | TokenKind::Xor
                | TokenKind::ShiftLeft
                | TokenKind::ShiftLeftArithmetic
                | TokenKind::ShiftRight
                | TokenKind::ShiftRightArithmetic
                | TokenKind::RotateLeft
                | TokenKind::RotateRight
        )
    }

    pub fn is_comparison_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::LessThan
                | TokenKind::GreaterThan
                | TokenKind::LessOrEqual
                | TokenKind::GreaterOrEqual
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::HexLiteral(_) | TokenKind::DecimalLiteral(_))
    }

    pub fn is_register(&self) -> bool {
        matches!(self, TokenKind::KWAcc | TokenKind::KWIx)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            TokenKind::KWHalt
                | TokenKind::KWNop
                | TokenKind::KWInput
                | TokenKind::KWOutput
                | TokenKind::KWSetCarryFlag
                | TokenKind::KWResetCarryFlag
        )
    }

    pub fn is_flag_condition(&self) -> bool {
        matches!(
            self,
            TokenKind::KWZero
                | TokenKind::KWNotZero
                | TokenKind::KWNegative
                | TokenKind::KWPositive
                | TokenKind::KWCarry
                | TokenKind::KWNotCarry
                | TokenKind::KWOverflow
                | TokenKind::KWZeroOrPositive
                | TokenKind::KWZeroOrNegative
                | TokenKind::KWGte
                | TokenKind::KWLt
                | TokenKind::KWGt
                | TokenKind::KWLte
                | TokenKind::KWNoInput
                | TokenKind::KWNoOutput
        )
    }

    /// Keywords that open a statement without any lookahead.
    pub fn is_statement_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::KWVar
                | TokenKind::KWLoop
                | TokenKind::KWIf
                | TokenKind::KWBreak
                | TokenKind::KWContinue
                | TokenKind::KWMacro
                | TokenKind::KWAsm
        ) || self.is_builtin()
    }

    /// Tokens that may begin a value (operand, rvalue or lvalue).
    pub fn starts_value(&self) -> bool {
        matches!(self, TokenKind::Identifier(_)) || self.is_literal() || self.is_register()
    }

    pub fn starts_statement(&self) -> bool {
        self.starts_value() || self.is_statement_keyword()
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let image = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Identifier(ident) => ident,
            TokenKind::HexLiteral(raw) | TokenKind::DecimalLiteral(raw) => raw,
            TokenKind::AsmBody(body) => return write!(f, "`{body}`"),
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::At => "@",
            TokenKind::Assign => "=",
            TokenKind::Exclamation => "!",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Plus => "+",
            TokenKind::PlusWithCarry => "+c",
            TokenKind::Minus => "-",
            TokenKind::MinusWithCarry => "-c",
            TokenKind::BitwiseAnd => "&",
            TokenKind::BitwiseOr => "|",
            TokenKind::Xor => "^",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftLeftArithmetic => "<<a",
            TokenKind::ShiftRight => ">>",
            TokenKind::ShiftRightArithmetic => ">>a",
            TokenKind::RotateLeft => "<<<",
            TokenKind::RotateRight => ">>>",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::LessOrEqual => "<=",
            TokenKind::GreaterOrEqual => ">=",
            TokenKind::KWVar => "var",
            TokenKind::KWLoop => "loop",
            TokenKind::KWIf => "if",
            TokenKind::KWBreak => "break",
            TokenKind::KWContinue => "continue",
            TokenKind::KWMacro => "macro",
            TokenKind::KWAsm => "asm",
            TokenKind::KWHalt => "halt",
            TokenKind::KWNop => "nop",
            TokenKind::KWInput => "input",
            TokenKind::KWOutput => "output",
            TokenKind::KWSetCarryFlag => "set_carry_flag",
            TokenKind::KWResetCarryFlag => "reset_carry_flag",
            TokenKind::KWAcc => "ACC",
            TokenKind::KWIx => "IX",
            TokenKind::KWZero => "ZERO",
            TokenKind::KWNotZero => "NOT_ZERO",
            TokenKind::KWNegative => "NEGATIVE",
            TokenKind::KWPositive => "POSITIVE",
            TokenKind::KWCarry => "CARRY",
            TokenKind::KWNotCarry => "NOT_CARRY",
            TokenKind::KWOverflow => "OVERFLOW",
            TokenKind::KWZeroOrPositive => "ZERO_OR_POSITIVE",
            TokenKind::KWZeroOrNegative => "ZERO_OR_NEGATIVE",
            TokenKind::KWGte => "GTE",
            TokenKind::KWLt => "LT",
            TokenKind::KWGt => "GT",
            TokenKind::KWLte => "LTE",
            TokenKind::KWNoInput => "NO_INPUT",
            TokenKind::KWNoOutput => "NO_OUTPUT",
        };
        write!(f, "{image}")
    }
}

#[derive(Debug)]
pub struct Lexer {
    chars: IntoIter<char>,
    loc: Loc,

    ch: char,
    peek_ch: char,
    peek2_ch: char,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            chars: input.chars().collect::<Vec<_>>().into_iter(),
            ch: '\0',
            peek_ch: '\0',
            peek2_ch: '\0',

            loc: Loc {
                line: 1,
                column: 0,
                offset: 0,
            },
        };

        lexer.peek_ch = lexer.chars.next().unwrap_or('\0');
        lexer.peek2_ch = lexer.chars.next().unwrap_or('\0');
        lexer.read_char();
        // read_char accounts the first character as consumed input, the cursor sits on it.
        lexer.loc.offset = 0;
        lexer
    }

    /// Lexes the whole input. Malformed input is skipped and reported, so every error of the
    /// source is returned at once. The token list always ends with [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = vec![];
        let mut errors = vec![];

        loop {
            match self.next_token() {
                Ok(token) => {
                    let is_eof = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                Err(err) => errors.push(err),
            }
        }

        (tokens, errors)
    }

    fn peek_char(&self) -> char {
        self.peek_ch
    }

    fn is_digit(&self) -> bool {
        self.ch.is_ascii_digit()
    }

    fn is_valid_identifier_char(&self) -> bool {
        match self.ch {
            'a'..='z' => true,
            'A'..='Z' => true,
            '_' => true,
            _ => self.is_digit(),
        }
    }

    fn at_end(&self) -> bool {
        // A literal NUL in the source is reported as an unknown character by next_token.
        self.ch == '\0' && self.peek_ch == '\0' && self.peek2_ch == '\0' && self.chars.len() == 0
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexerError> {
        loop {
            match (self.ch, self.peek_char()) {
                (' ' | '\n' | '\r' | '\t', _) => self.read_char(),
                ('/', '/') => {
                    while self.ch != '\n' && !self.at_end() {
                        self.read_char();
                    }
                }
                ('/', '*') => {
                    let start = self.loc;
                    self.read_char();
                    self.read_char();
                    while !(self.ch == '*' && self.peek_char() == '/') {
                        if self.at_end() {
                            return Err(LexerError::UnterminatedBlockComment(start));
                        }
                        self.read_char();
                    }
                    self.read_char();
                    self.read_char();
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.loc.column = 0;
            self.loc.line += 1;
        }
        self.loc.offset += self.ch.len_utf8();
        self.ch = self.peek_ch;
        self.peek_ch = self.peek2_ch;
        self.peek2_ch = self.chars.next().unwrap_or('\0');
        self.loc.column += 1;
    }

    fn read_number(&mut self) -> Result<Token, LexerError> {
        let old_loc = self.loc;
        let mut string = String::new();

        let is_hex = self.ch == '0' && matches!(self.peek_char(), 'x' | 'X');
        if is_hex && self.peek2_ch.is_ascii_hexdigit() {
            string.push(self.ch);
            self.read_char();
            string.push(self.ch);
            self.read_char();
            while self.ch.is_ascii_hexdigit() {
                string.push(self.ch);
                self.read_char();
            }
        } else {
            while self.is_digit() {
                string.push(self.ch);
                self.read_char();
            }
        }

        if self.is_valid_identifier_char() {
            while self.is_valid_identifier_char() {
                self.read_char();
            }
            return Err(LexerError::IdentifierStartedWithNumber(old_loc));
        }

        let kind = if let Some(digits) = string
            .strip_prefix("0x")
            .or_else(|| string.strip_prefix("0X"))
        {
            u32::from_str_radix(digits, 16)
                .map_err(|_| LexerError::InvalidNumber(old_loc, string.clone()))?;
            TokenKind::HexLiteral(string)
        } else {
            string
                .parse::<u32>()
                .map_err(|_| LexerError::InvalidNumber(old_loc, string.clone()))?;
            TokenKind::DecimalLiteral(string)
        };

        Ok(Token {
            kind,
            loc: old_loc,
        })
    }

    fn read_identifier(&mut self) -> Token {
        let old_loc = self.loc;
        let mut string = String::new();

        while self.is_valid_identifier_char() {
            string.push(self.ch);
            self.read_char();
        }
        Token {
            kind: TokenKind::from_string(&string),
            loc: old_loc,
        }
    }

    fn read_asm_body(&mut self) -> Result<Token, LexerError> {
        let old_loc = self.loc;
        let mut body = String::new();

        // Opening backtick
        self.read_char();
        while self.ch != '`' {
            if self.at_end() {
                return Err(LexerError::UnterminatedAsmBlock(old_loc));
            }
            body.push(self.ch);
            self.read_char();
        }
        // Closing backtick
        self.read_char();

        Ok(Token {
            kind: TokenKind::AsmBody(body),
            loc: old_loc,
        })
    }

    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments()?;

        let old_loc = self.loc;

        if self.at_end() {
            return Ok(Token {
                kind: TokenKind::Eof,
                loc: old_loc,
            });
        }

        let result = match self.ch {
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '@' => TokenKind::At,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '&' => TokenKind::BitwiseAnd,
            '|' => TokenKind::BitwiseOr,
            '^' => TokenKind::Xor,
            '+' => match self.peek_char() {
                'c' => {
                    self.read_char();
                    TokenKind::PlusWithCarry
                }
                _ => TokenKind::Plus,
            },
            '-' => match self.peek_char() {
                'c' => {
                    self.read_char();
                    TokenKind::MinusWithCarry
                }
                _ => TokenKind::Minus,
            },
            '=' => match self.peek_char() {
                '=' => {
                    self.read_char();
                    TokenKind::Equal
                }
                _ => TokenKind::Assign,
            },
            '!' => match self.peek_char() {
                '=' => {
                    self.read_char();
                    TokenKind::NotEqual
                }
                _ => TokenKind::Exclamation,
            },
            '<' => match self.peek_char() {
                '<' => {
                    self.read_char();
                    match self.peek_char() {
                        '<' => {
                            self.read_char();
                            TokenKind::RotateLeft
                        }
                        'a' => {
                            self.read_char();
                            TokenKind::ShiftLeftArithmetic
                        }
                        _ => TokenKind::ShiftLeft,
                    }
                }
                '=' => {
                    self.read_char();
                    TokenKind::LessOrEqual
                }
                _ => TokenKind::LessThan,
            },
            '>' => match self.peek_char() {
                '>' => {
                    self.read_char();
                    match self.peek_char() {
                        '>' => {
                            self.read_char();
                            TokenKind::RotateRight
                        }
                        'a' => {
                            self.read_char();
                            TokenKind::ShiftRightArithmetic
                        }
                        _ => TokenKind::ShiftRight,
                    }
                }
                '=' => {
                    self.read_char();
                    TokenKind::GreaterOrEqual
                }
                _ => TokenKind::GreaterThan,
            },
            '`' => return self.read_asm_body(),
            _ => {
                if self.is_digit() {
                    return self.read_number();
                } else if self.is_valid_identifier_char() {
                    return Ok(self.read_identifier());
                }

                let ch = self.ch;
                self.read_char();
                return Err(LexerError::UnknownCharacter(old_loc, ch));
            }
        };

        self.read_char();
        Ok(Token {
            kind: result,
            loc: old_loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(input).tokenize();
        assert_eq!(errors, vec![], "unexpected lexer errors");
        tokens.into_iter().map(|tok| tok.kind).collect()
    }

    #[test]
    fn test_next_token() {
        let input = r"
            var counter @ 0x180
            loop {
                counter = counter + 1
            }
            ";
        let expected: Vec<_> = vec![
            TokenKind::KWVar,
            TokenKind::Identifier("counter".to_owned()),
            TokenKind::At,
            TokenKind::HexLiteral("0x180".to_owned()),
            TokenKind::KWLoop,
            TokenKind::OpenBrace,
            TokenKind::Identifier("counter".to_owned()),
            TokenKind::Assign,
            TokenKind::Identifier("counter".to_owned()),
            TokenKind::Plus,
            TokenKind::DecimalLiteral("1".to_owned()),
            TokenKind::CloseBrace,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn test_all_operators_longest_match() {
        let input = "<<< >>> <<a >>a << >> == != <= >= < > +c + -c - & | ^ = !";

        let expected: Vec<_> = vec![
            TokenKind::RotateLeft,
            TokenKind::RotateRight,
            TokenKind::ShiftLeftArithmetic,
            TokenKind::ShiftRightArithmetic,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::Equal,
            TokenKind::NotEqual,
            TokenKind::LessOrEqual,
            TokenKind::GreaterOrEqual,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::PlusWithCarry,
            TokenKind::Plus,
            TokenKind::MinusWithCarry,
            TokenKind::Minus,
            TokenKind::BitwiseAnd,
            TokenKind::BitwiseOr,
            TokenKind::Xor,
            TokenKind::Assign,
            TokenKind::Exclamation,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn test_keywords_need_exact_match() {
        assert_eq!(
            kinds("loops ZERO_OR_POSITIVE ACCU IX halt"),
            vec![
                TokenKind::Identifier("loops".to_owned()),
                TokenKind::KWZeroOrPositive,
                TokenKind::Identifier("ACCU".to_owned()),
                TokenKind::KWIx,
                TokenKind::KWHalt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "// line comment\nhalt /* block\n comment */ nop";
        assert_eq!(
            kinds(input),
            vec![TokenKind::KWHalt, TokenKind::KWNop, TokenKind::Eof]
        );
    }

    #[test]
    fn test_macro_call_and_subscript() {
        assert_eq!(
            kinds("inc! arr[i]"),
            vec![
                TokenKind::Identifier("inc".to_owned()),
                TokenKind::Exclamation,
                TokenKind::Identifier("arr".to_owned()),
                TokenKind::OpenBracket,
                TokenKind::Identifier("i".to_owned()),
                TokenKind::CloseBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_asm_body_keeps_whitespace() {
        let input = "asm `\n    LD ACC, (80H)\n    NOP\n`";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::KWAsm,
                TokenKind::AsmBody("\n    LD ACC, (80H)\n    NOP\n".to_owned()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_locations() {
        let (tokens, _) = Lexer::new("halt\n  x = 1").tokenize();

        assert_eq!(
            tokens[0].loc,
            Loc {
                line: 1,
                column: 1,
                offset: 0
            }
        );
        assert_eq!(
            tokens[1].loc,
            Loc {
                line: 2,
                column: 3,
                offset: 7
            }
        );
        assert_eq!(tokens[3].loc.offset, 11);
    }

    #[test]
    fn test_errors_are_collected() {
        let (tokens, errors) = Lexer::new("halt $ nop # 12abc").tokenize();

        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], LexerError::UnknownCharacter(_, '$')));
        assert!(matches!(errors[1], LexerError::UnknownCharacter(_, '#')));
        assert!(matches!(
            errors[2],
            LexerError::IdentifierStartedWithNumber(_)
        ));
        assert_eq!(
            tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::KWHalt, TokenKind::KWNop, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_asm_block() {
        let (_, errors) = Lexer::new("asm `NOP").tokenize();
        assert!(matches!(errors[..], [LexerError::UnterminatedAsmBlock(_)]));
    }

    #[test]
    fn test_number_out_of_range() {
        let (_, errors) = Lexer::new("x = 99999999999").tokenize();
        assert!(matches!(errors[..], [LexerError::InvalidNumber(_, _)]));
    }

    proptest! {
        #[test]
        fn token_stream_ends_with_one_eof(input in "\\PC{0,200}") {
            let (tokens, _) = Lexer::new(&input).tokenize();

            prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
            prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
            prop_assert!(tokens.windows(2).all(|w| w[0].loc.offset <= w[1].loc.offset));
        }
    }
}
