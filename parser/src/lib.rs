pub mod ast;
pub mod builder;
pub mod cst;
pub mod lexer;
pub mod lookahead;

use std::mem;

use thiserror::Error;

use crate::{
    cst::{BlockCst, ProgramCst, StatementCst, SubscriptCst, ValueCst, VariableDeclarationCst},
    lexer::{Lexer, LexerError, Loc, Token, TokenKind},
};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParserError {
    #[error("{}: Unexpected token \"{}\", expected {expected}", .actual.loc, .actual.kind)]
    UnexpectedToken { expected: String, actual: Token },
    #[error("{}: \"{}\" does not start a valid statement", .0.loc, .0.kind)]
    NoViableStatement(Token),
}

impl ParserError {
    pub fn loc(&self) -> Loc {
        match self {
            ParserError::UnexpectedToken { actual, .. } => actual.loc,
            ParserError::NoViableStatement(token) => token.loc,
        }
    }
}

#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Returned for reads past the end of `tokens`.
    eof: Token,
    errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            loc: tokens.last().map(|tok| tok.loc).unwrap_or_default(),
        };

        Self {
            tokens,
            pos: 0,
            eof,
            errors: vec![],
        }
    }

    /// Tokenizes `input` and creates a parser over the result.
    pub fn try_build(input: &str) -> Result<Self, Vec<LexerError>> {
        let (tokens, errors) = Lexer::new(input).tokenize();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::new(tokens))
    }

    fn cur_token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_token(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    /// Tokens from the current one to the end.
    fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    /// Consumes the current token and returns it.
    fn next_token(&mut self) -> Token {
        let token = self.cur_token().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn cur_token_is(&self, token: TokenKind) -> bool {
        mem::discriminant(&self.cur_token().kind) == mem::discriminant(&token)
    }

    fn peek_token_is(&self, token: TokenKind) -> bool {
        mem::discriminant(&self.peek_token().kind) == mem::discriminant(&token)
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParserError {
        ParserError::UnexpectedToken {
            expected: expected.into(),
            actual: self.cur_token().clone(),
        }
    }

    /// Consumes the current token if it has the same kind as `expected`. Payloads are ignored.
    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        if self.cur_token_is(expected.clone()) {
            Ok(self.next_token())
        } else {
            Err(self.unexpected(format!("\"{expected}\"")))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token, ParserError> {
        match self.cur_token().kind {
            TokenKind::Identifier(_) => Ok(self.next_token()),
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Skips the token that caused an error and everything up to the next keyword, identifier or
    /// register, a `}` or the end of input. Literals are skipped too, a statement rarely starts
    /// with one.
    fn synchronize(&mut self) {
        if !self.cur_token_is(TokenKind::CloseBrace) && !self.cur_token_is(TokenKind::Eof) {
            self.next_token();
        }
        loop {
            let kind = &self.cur_token().kind;
            let resumes = kind.is_statement_keyword()
                || kind.is_register()
                || matches!(
                    kind,
                    TokenKind::Identifier(_) | TokenKind::CloseBrace | TokenKind::Eof
                );
            if resumes {
                break;
            }
            self.next_token();
        }
    }

    /// Parses the whole token stream. Statement errors are recovered from, so every error found is
    /// returned.
    pub fn parse_program(&mut self) -> Result<ProgramCst, Vec<ParserError>> {
        let mut variables = vec![];
        let mut statements = vec![];

        while self.cur_token_is(TokenKind::KWVar) {
            match self.parse_variable_declaration() {
                Ok(decl) => variables.push(decl),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        while !self.cur_token_is(TokenKind::Eof) {
            if self.cur_token_is(TokenKind::CloseBrace) {
                // Stray }
                let err = self.unexpected("a statement");
                self.errors.push(err);
                self.next_token();
                continue;
            }

            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(ProgramCst {
                variables,
                statements,
            })
        } else {
            Err(mem::take(&mut self.errors))
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<VariableDeclarationCst, ParserError> {
        self.expect(TokenKind::KWVar)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::At)?;
        if !self.cur_token().kind.is_literal() {
            return Err(self.unexpected("an address"));
        }
        let address = self.next_token();

        Ok(VariableDeclarationCst { name, address })
    }

    fn parse_block(&mut self) -> Result<BlockCst, ParserError> {
        self.expect(TokenKind::OpenBrace)?;

        let mut statements = vec![];
        while !self.cur_token_is(TokenKind::CloseBrace) && !self.cur_token_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(BlockCst { statements })
    }

    // Statements

    fn parse_statement(&mut self) -> Result<StatementCst, ParserError> {
        let kind = self.cur_token().kind.clone();
        match kind {
            TokenKind::KWLoop => self.parse_loop_statement(),
            TokenKind::KWIf => self.parse_if_statement(),
            TokenKind::KWBreak => Ok(StatementCst::Break(self.next_token())),
            TokenKind::KWContinue => Ok(StatementCst::Continue(self.next_token())),
            TokenKind::KWMacro => self.parse_macro_declaration(),
            TokenKind::KWAsm => self.parse_raw_assembly(),
            TokenKind::Identifier(_) if self.peek_token_is(TokenKind::Exclamation) => {
                self.parse_macro_call()
            }
            _ if lookahead::is_comparison_ahead(self.remaining()) => self.parse_comparison(),
            _ if lookahead::is_binary_operation_ahead(self.remaining()) => {
                self.parse_binary_operation()
            }
            TokenKind::Identifier(_) | TokenKind::KWAcc | TokenKind::KWIx => {
                self.parse_assignment()
            }
            kind if kind.is_builtin() => Ok(StatementCst::Builtin(self.next_token())),
            _ => Err(ParserError::NoViableStatement(self.cur_token().clone())),
        }
    }

    fn parse_loop_statement(&mut self) -> Result<StatementCst, ParserError> {
        let keyword = self.expect(TokenKind::KWLoop)?;
        let body = self.parse_block()?;
        Ok(StatementCst::Loop { keyword, body })
    }

    fn parse_if_statement(&mut self) -> Result<StatementCst, ParserError> {
        self.expect(TokenKind::KWIf)?;
        if !self.cur_token().kind.is_flag_condition() {
            return Err(self.unexpected("a flag condition"));
        }
        let condition = self.next_token();
        let body = self.parse_block()?;
        Ok(StatementCst::If { condition, body })
    }

    fn parse_macro_declaration(&mut self) -> Result<StatementCst, ParserError> {
        self.expect(TokenKind::KWMacro)?;
        let name = self.expect_identifier()?;
        let body = self.parse_block()?;
        Ok(StatementCst::MacroDeclaration { name, body })
    }

    fn parse_macro_call(&mut self) -> Result<StatementCst, ParserError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Exclamation)?;
        Ok(StatementCst::MacroCall { name })
    }

    fn parse_raw_assembly(&mut self) -> Result<StatementCst, ParserError> {
        self.expect(TokenKind::KWAsm)?;
        match self.cur_token().kind {
            TokenKind::AsmBody(_) => Ok(StatementCst::RawAssembly {
                body: self.next_token(),
            }),
            _ => Err(self.unexpected("a `...` assembly block")),
        }
    }

    fn parse_comparison(&mut self) -> Result<StatementCst, ParserError> {
        let left = self.parse_value()?;
        if !self.cur_token().kind.is_comparison_operator() {
            return Err(self.unexpected("a comparison operator"));
        }
        let operator = self.next_token();
        let right = self.parse_value()?;
        Ok(StatementCst::Comparison {
            left,
            operator,
            right,
        })
    }

    fn parse_binary_operation(&mut self) -> Result<StatementCst, ParserError> {
        let target = self.parse_lvalue()?;
        self.expect(TokenKind::Assign)?;
        let left = self.parse_value()?;
        if !self.cur_token().kind.is_binary_operator() {
            return Err(self.unexpected("a binary operator"));
        }
        let operator = self.next_token();
        let right = self.parse_value()?;
        Ok(StatementCst::BinaryOperation {
            target,
            left,
            operator,
            right,
        })
    }

    fn parse_assignment(&mut self) -> Result<StatementCst, ParserError> {
        let target = self.parse_lvalue()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_value()?;
        Ok(StatementCst::Assignment { target, value })
    }

    // Values

    fn parse_lvalue(&mut self) -> Result<ValueCst, ParserError> {
        match self.cur_token().kind {
            TokenKind::Identifier(_) => {
                let head = self.next_token();
                let subscript = self.parse_optional_subscript()?;
                Ok(ValueCst { head, subscript })
            }
            TokenKind::KWAcc | TokenKind::KWIx => Ok(ValueCst {
                head: self.next_token(),
                subscript: None,
            }),
            _ => Err(self.unexpected("a variable, an array element or a register")),
        }
    }

    fn parse_value(&mut self) -> Result<ValueCst, ParserError> {
        let kind = &self.cur_token().kind;
        if kind.is_literal() || kind.is_register() {
            return Ok(ValueCst {
                head: self.next_token(),
                subscript: None,
            });
        }
        if matches!(kind, TokenKind::Identifier(_)) {
            let head = self.next_token();
            let subscript = self.parse_optional_subscript()?;
            return Ok(ValueCst { head, subscript });
        }

        Err(self.unexpected("a value"))
    }

    fn parse_optional_subscript(&mut self) -> Result<Option<SubscriptCst>, ParserError> {
        if !self.cur_token_is(TokenKind::OpenBracket) {
            return Ok(None);
        }
        self.next_token();

        let kind = &self.cur_token().kind;
        if !matches!(kind, TokenKind::Identifier(_)) && !kind.is_literal() {
            return Err(self.unexpected("an identifier or a number as index"));
        }
        let index = self.next_token();
        self.expect(TokenKind::CloseBracket)?;

        Ok(Some(SubscriptCst { index }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ProgramCst {
        let mut parser = Parser::try_build(input).expect("input should tokenize");
        parser.parse_program().expect("should successfully parse")
    }

    fn parse_errors(input: &str) -> Vec<ParserError> {
        let mut parser = Parser::try_build(input).expect("input should tokenize");
        parser
            .parse_program()
            .expect_err("parsing should have failed")
    }

    fn kind(stmt: &StatementCst) -> &'static str {
        match stmt {
            StatementCst::Loop { .. } => "loop",
            StatementCst::If { .. } => "if",
            StatementCst::Break(_) => "break",
            StatementCst::Continue(_) => "continue",
            StatementCst::MacroDeclaration { .. } => "macro",
            StatementCst::MacroCall { .. } => "call",
            StatementCst::RawAssembly { .. } => "asm",
            StatementCst::Comparison { .. } => "comparison",
            StatementCst::BinaryOperation { .. } => "binary",
            StatementCst::Assignment { .. } => "assignment",
            StatementCst::Builtin(_) => "builtin",
        }
    }

    fn kinds(program: &ProgramCst) -> Vec<&'static str> {
        program.statements.iter().map(kind).collect()
    }

    #[test]
    fn test_variable_declarations() {
        let program = parse("var x @ 0x80\nvar arr @ 384");

        assert_eq!(program.variables.len(), 2);
        assert_eq!(
            program.variables[0].name.kind,
            TokenKind::Identifier("x".to_owned())
        );
        assert_eq!(
            program.variables[1].address.kind,
            TokenKind::DecimalLiteral("384".to_owned())
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_statement_dispatch() {
        let program = parse(
            r"
            x = 1
            x = y + 1
            x == 1
            arr[i] == 0
            arr[i] = src[j]
            ACC = ACC >>a 1
            inc!
            halt
            asm `NOP`
            ",
        );

        assert_eq!(
            kinds(&program),
            vec![
                "assignment",
                "binary",
                "comparison",
                "comparison",
                "assignment",
                "binary",
                "call",
                "builtin",
                "asm"
            ]
        );
    }

    #[test]
    fn test_comparison_does_not_look_into_next_statement() {
        let program = parse("x = y\na == b");
        assert_eq!(kinds(&program), vec!["assignment", "comparison"]);

        let program = parse("x = y\na = b + c");
        assert_eq!(kinds(&program), vec!["assignment", "binary"]);
    }

    #[test]
    fn test_subscripts() {
        let program = parse("dst[i] = src[0x2]");

        assert_eq!(
            program.statements[0],
            StatementCst::Assignment {
                target: ValueCst {
                    head: Token {
                        kind: TokenKind::Identifier("dst".to_owned()),
                        loc: Loc {
                            line: 1,
                            column: 1,
                            offset: 0
                        }
                    },
                    subscript: Some(SubscriptCst {
                        index: Token {
                            kind: TokenKind::Identifier("i".to_owned()),
                            loc: Loc {
                                line: 1,
                                column: 5,
                                offset: 4
                            }
                        }
                    }),
                },
                value: ValueCst {
                    head: Token {
                        kind: TokenKind::Identifier("src".to_owned()),
                        loc: Loc {
                            line: 1,
                            column: 10,
                            offset: 9
                        }
                    },
                    subscript: Some(SubscriptCst {
                        index: Token {
                            kind: TokenKind::HexLiteral("0x2".to_owned()),
                            loc: Loc {
                                line: 1,
                                column: 14,
                                offset: 13
                            }
                        }
                    }),
                },
            }
        );
    }

    #[test]
    fn test_nested_blocks() {
        let program = parse(
            r"
            macro body { break }
            loop {
                if ZERO {
                    loop { continue }
                }
                body!
            }
            ",
        );

        assert_eq!(kinds(&program), vec!["macro", "loop"]);
        let StatementCst::Loop { body, .. } = &program.statements[1] else {
            panic!("expected a loop");
        };
        assert_eq!(
            body.statements.iter().map(kind).collect::<Vec<_>>(),
            vec!["if", "call"]
        );
    }

    #[test]
    fn test_no_viable_statement() {
        let errors = parse_errors("halt\n  @ nop");

        assert_eq!(errors.len(), 1);
        let ParserError::NoViableStatement(token) = &errors[0] else {
            panic!("expected NoViableStatement, got {:?}", errors[0]);
        };
        assert_eq!(token.kind, TokenKind::At);
        assert_eq!((token.loc.line, token.loc.column), (2, 3));
    }

    #[test]
    fn test_errors_are_recovered_from() {
        let errors = parse_errors(
            r"
            x = = 1
            halt
            y = ]
            loop { z = }
            ",
        );

        assert_eq!(errors.len(), 3);
        assert!(matches!(
            &errors[0],
            ParserError::UnexpectedToken { expected, .. } if expected == "a value"
        ));
        assert_eq!(errors[1].loc().line, 4);
        assert_eq!(errors[2].loc().line, 5);
    }

    #[test]
    fn test_unknown_flag_condition() {
        let errors = parse_errors("if FOO halt");

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ParserError::UnexpectedToken { expected, actual }
                if expected == "a flag condition"
                    && actual.kind == TokenKind::Identifier("FOO".to_owned())
        ));
    }

    #[test]
    fn test_missing_close_brace() {
        let errors = parse_errors("loop { halt");
        assert!(matches!(
            &errors[..],
            [ParserError::UnexpectedToken { actual: Token { kind: TokenKind::Eof, .. }, .. }]
        ));
    }

    #[test]
    fn test_error_message_has_position() {
        let errors = parse_errors("x = ");
        assert_eq!(
            errors[0].to_string(),
            "1:5: Unexpected token \"end of input\", expected a value"
        );
    }
}
