//! Concrete syntax tree. Nodes keep the tokens they were parsed from, the tree builder turns
//! them into [`crate::ast`] nodes.

use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCst {
    pub variables: Vec<VariableDeclarationCst>,
    pub statements: Vec<StatementCst>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarationCst {
    pub name: Token,
    pub address: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCst {
    pub statements: Vec<StatementCst>,
}

/// `[ index ]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptCst {
    pub index: Token,
}

/// Operand, rvalue or lvalue. `head` is an identifier, a literal or a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCst {
    pub head: Token,
    pub subscript: Option<SubscriptCst>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementCst {
    Loop {
        keyword: Token,
        body: BlockCst,
    },
    If {
        condition: Token,
        body: BlockCst,
    },
    Break(Token),
    Continue(Token),
    MacroDeclaration {
        name: Token,
        body: BlockCst,
    },
    MacroCall {
        name: Token,
    },
    RawAssembly {
        body: Token,
    },
    Comparison {
        left: ValueCst,
        operator: Token,
        right: ValueCst,
    },
    BinaryOperation {
        target: ValueCst,
        left: ValueCst,
        operator: Token,
        right: ValueCst,
    },
    Assignment {
        target: ValueCst,
        value: ValueCst,
    },
    Builtin(Token),
}
