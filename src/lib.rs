pub mod driver;

use kuec_parser::{
    ast,
    builder::{self, BuildError},
    lexer::{Lexer, LexerError, Token},
    Parser, ParserError,
};
use thiserror::Error;

#[cfg(feature = "codegen")]
use kuec_asm::emit::EmitAsm;
#[cfg(feature = "codegen")]
use kuec_codegen::CodegenError;

/// Failure of one stage. Tokenizer and parser errors are collected, later stages stop at the
/// first error.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{} error(s) while tokenizing", .0.len())]
    Lex(Vec<LexerError>),
    #[error("{} error(s) while parsing", .0.len())]
    Parse(Vec<ParserError>),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[cfg(feature = "codegen")]
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// One message per underlying error.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            CompileError::Lex(errors) => errors.iter().map(ToString::to_string).collect(),
            CompileError::Parse(errors) => errors.iter().map(ToString::to_string).collect(),
            CompileError::Build(err) => vec![err.to_string()],
            #[cfg(feature = "codegen")]
            CompileError::Codegen(err) => vec![err.to_string()],
        }
    }
}

pub fn lex(source: &str) -> Result<Vec<Token>, CompileError> {
    let (tokens, errors) = Lexer::new(source).tokenize();
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "tokenized");

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(CompileError::Lex(errors))
    }
}

/// Tokenizes, parses and builds the semantic tree.
pub fn parse(source: &str) -> Result<ast::Program, CompileError> {
    let tokens = lex(source)?;
    let cst = Parser::new(tokens)
        .parse_program()
        .map_err(CompileError::Parse)?;
    let program = builder::build_program(cst)?;
    tracing::debug!(
        variables = program.variables.len(),
        statements = program.body.len(),
        "parsed"
    );

    Ok(program)
}

#[cfg(feature = "codegen")]
pub fn generate(source: &str) -> Result<kuec_asm::Program, CompileError> {
    let program = parse(source)?;
    Ok(kuec_codegen::code_generation(&program)?)
}

/// Translates a KUE-DSL program into KUE-CHIP2 assembly text.
#[cfg(feature = "codegen")]
pub fn compile(source: &str) -> Result<String, CompileError> {
    Ok(generate(source)?.emit())
}
