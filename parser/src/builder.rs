//! Turns the concrete syntax tree into the semantic tree of [`crate::ast`].

use kuec_utils::ResultOkMap;
use thiserror::Error;

use crate::{
    ast::{
        self, BinaryOperator, BuiltinInstruction, ComparisonOperator, FlagCondition, Index,
        LValue, Literal, Register, Statement, Value,
    },
    cst::{BlockCst, ProgramCst, StatementCst, SubscriptCst, ValueCst, VariableDeclarationCst},
    lexer::{Token, TokenKind},
};

/// Only raised for trees the grammar can not produce.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum BuildError {
    #[error("{}: \"{}\" is not a {expected}", .token.loc, .token.kind)]
    UnexpectedToken {
        expected: &'static str,
        token: Token,
    },
    #[error("{}: literal \"{}\" does not fit into a word", .0.loc, .0.kind)]
    LiteralOutOfRange(Token),
}

fn unexpected(expected: &'static str, token: &Token) -> BuildError {
    BuildError::UnexpectedToken {
        expected,
        token: token.clone(),
    }
}

pub fn build_program(program: ProgramCst) -> Result<ast::Program, BuildError> {
    let variables = program
        .variables
        .into_iter()
        .map(build_variable_declaration)
        .collect::<Result<Vec<_>, _>>()?;
    let body = build_statements(program.statements)?;

    Ok(ast::Program { variables, body })
}

fn build_variable_declaration(
    decl: VariableDeclarationCst,
) -> Result<ast::VariableDeclaration, BuildError> {
    Ok(ast::VariableDeclaration {
        name: build_identifier(&decl.name)?,
        address: build_literal(&decl.address)?.value,
        loc: decl.name.loc,
    })
}

fn build_statements(statements: Vec<StatementCst>) -> Result<Vec<Statement>, BuildError> {
    statements.into_iter().map(build_statement).collect()
}

fn build_block(block: BlockCst) -> Result<Vec<Statement>, BuildError> {
    build_statements(block.statements)
}

fn build_statement(statement: StatementCst) -> Result<Statement, BuildError> {
    Ok(match statement {
        StatementCst::Loop { body, .. } => Statement::Loop {
            body: build_block(body)?,
        },
        StatementCst::If { condition, body } => Statement::If {
            condition: build_flag_condition(&condition)?,
            body: build_block(body)?,
        },
        StatementCst::Break(_) => Statement::Break,
        StatementCst::Continue(_) => Statement::Continue,
        StatementCst::MacroDeclaration { name, body } => Statement::MacroDeclaration {
            name: build_identifier(&name)?,
            body: build_block(body)?,
        },
        StatementCst::MacroCall { name } => Statement::MacroCall(build_identifier(&name)?),
        StatementCst::RawAssembly { body } => match body.kind {
            TokenKind::AsmBody(text) => Statement::RawAssembly(text),
            _ => return Err(unexpected("assembly block", &body)),
        },
        StatementCst::Comparison {
            left,
            operator,
            right,
        } => Statement::Comparison {
            left: build_value(left)?,
            operator: build_comparison_operator(&operator)?,
            right: build_value(right)?,
        },
        StatementCst::BinaryOperation {
            target,
            left,
            operator,
            right,
        } => Statement::BinaryOperation {
            target: build_lvalue(target)?,
            left: build_value(left)?,
            operator: build_binary_operator(&operator)?,
            right: build_value(right)?,
        },
        StatementCst::Assignment { target, value } => Statement::Assignment {
            target: build_lvalue(target)?,
            value: build_value(value)?,
        },
        StatementCst::Builtin(token) => Statement::Builtin(build_builtin(&token)?),
    })
}

fn build_identifier(token: &Token) -> Result<ast::Identifier, BuildError> {
    match &token.kind {
        TokenKind::Identifier(name) => Ok(name.clone()),
        _ => Err(unexpected("identifier", token)),
    }
}

/// Resolves the literal text. `0x`/`0X` is base 16, everything else base 10.
pub fn build_literal(token: &Token) -> Result<Literal, BuildError> {
    let (raw, value) = match &token.kind {
        TokenKind::HexLiteral(raw) => {
            let digits = raw
                .strip_prefix("0x")
                .or_else(|| raw.strip_prefix("0X"))
                .unwrap_or(raw);
            (raw, u32::from_str_radix(digits, 16))
        }
        TokenKind::DecimalLiteral(raw) => (raw, raw.parse::<u32>()),
        _ => return Err(unexpected("number", token)),
    };

    let value = value.map_err(|_| BuildError::LiteralOutOfRange(token.clone()))?;
    Ok(Literal {
        value,
        raw: raw.clone(),
    })
}

fn build_register(token: &Token) -> Option<Register> {
    match token.kind {
        TokenKind::KWAcc => Some(Register::Acc),
        TokenKind::KWIx => Some(Register::Ix),
        _ => None,
    }
}

fn build_index(subscript: SubscriptCst) -> Result<Index, BuildError> {
    match &subscript.index.kind {
        TokenKind::Identifier(name) => Ok(Index::Variable(name.clone())),
        _ => Ok(Index::Literal(build_literal(&subscript.index)?)),
    }
}

fn build_value(value: ValueCst) -> Result<Value, BuildError> {
    let index = value.subscript.ok_map(build_index)?;

    if let Some(reg) = build_register(&value.head) {
        return match index {
            None => Ok(Value::Register(reg)),
            Some(_) => Err(unexpected("array", &value.head)),
        };
    }

    match (&value.head.kind, index) {
        (TokenKind::Identifier(name), None) => Ok(Value::Variable(name.clone())),
        (TokenKind::Identifier(name), Some(index)) => Ok(Value::ArrayAccess {
            array: name.clone(),
            index,
        }),
        (_, None) => Ok(Value::Literal(build_literal(&value.head)?)),
        (_, Some(_)) => Err(unexpected("array", &value.head)),
    }
}

fn build_lvalue(value: ValueCst) -> Result<LValue, BuildError> {
    let head = value.head.clone();
    match build_value(value)? {
        Value::Variable(name) => Ok(LValue::Variable(name)),
        Value::ArrayAccess { array, index } => Ok(LValue::ArrayAccess { array, index }),
        Value::Register(reg) => Ok(LValue::Register(reg)),
        Value::Literal(_) => Err(unexpected("assignable value", &head)),
    }
}

fn build_binary_operator(token: &Token) -> Result<BinaryOperator, BuildError> {
    Ok(match token.kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::PlusWithCarry => BinaryOperator::AddWithCarry,
        TokenKind::Minus => BinaryOperator::Subtract,
        TokenKind::MinusWithCarry => BinaryOperator::SubtractWithCarry,
        TokenKind::BitwiseAnd => BinaryOperator::BitwiseAnd,
        TokenKind::BitwiseOr => BinaryOperator::BitwiseOr,
        TokenKind::Xor => BinaryOperator::Xor,
        TokenKind::ShiftLeft => BinaryOperator::ShiftLeft,
        TokenKind::ShiftLeftArithmetic => BinaryOperator::ShiftLeftArithmetic,
        TokenKind::ShiftRight => BinaryOperator::ShiftRight,
        TokenKind::ShiftRightArithmetic => BinaryOperator::ShiftRightArithmetic,
        TokenKind::RotateLeft => BinaryOperator::RotateLeft,
        TokenKind::RotateRight => BinaryOperator::RotateRight,
        _ => return Err(unexpected("binary operator", token)),
    })
}

fn build_comparison_operator(token: &Token) -> Result<ComparisonOperator, BuildError> {
    Ok(match token.kind {
        TokenKind::Equal => ComparisonOperator::Equal,
        TokenKind::NotEqual => ComparisonOperator::NotEqual,
        TokenKind::LessThan => ComparisonOperator::LessThan,
        TokenKind::GreaterThan => ComparisonOperator::GreaterThan,
        TokenKind::LessOrEqual => ComparisonOperator::LessOrEqual,
        TokenKind::GreaterOrEqual => ComparisonOperator::GreaterOrEqual,
        _ => return Err(unexpected("comparison operator", token)),
    })
}

fn build_flag_condition(token: &Token) -> Result<FlagCondition, BuildError> {
    Ok(match token.kind {
        TokenKind::KWZero => FlagCondition::Zero,
        TokenKind::KWNotZero => FlagCondition::NotZero,
        TokenKind::KWNegative => FlagCondition::Negative,
        TokenKind::KWPositive => FlagCondition::Positive,
        TokenKind::KWZeroOrPositive => FlagCondition::ZeroOrPositive,
        TokenKind::KWZeroOrNegative => FlagCondition::ZeroOrNegative,
        TokenKind::KWCarry => FlagCondition::Carry,
        TokenKind::KWNotCarry => FlagCondition::NotCarry,
        TokenKind::KWOverflow => FlagCondition::Overflow,
        TokenKind::KWGte => FlagCondition::Gte,
        TokenKind::KWLt => FlagCondition::Lt,
        TokenKind::KWGt => FlagCondition::Gt,
        TokenKind::KWLte => FlagCondition::Lte,
        TokenKind::KWNoInput => FlagCondition::NoInput,
        TokenKind::KWNoOutput => FlagCondition::NoOutput,
        _ => return Err(unexpected("flag condition", token)),
    })
}

fn build_builtin(token: &Token) -> Result<BuiltinInstruction, BuildError> {
    Ok(match token.kind {
        TokenKind::KWHalt => BuiltinInstruction::Halt,
        TokenKind::KWNop => BuiltinInstruction::Nop,
        TokenKind::KWInput => BuiltinInstruction::Input,
        TokenKind::KWOutput => BuiltinInstruction::Output,
        TokenKind::KWSetCarryFlag => BuiltinInstruction::SetCarryFlag,
        TokenKind::KWResetCarryFlag => BuiltinInstruction::ResetCarryFlag,
        _ => return Err(unexpected("builtin instruction", token)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Loc, Parser};

    fn build(input: &str) -> ast::Program {
        let mut parser = Parser::try_build(input).expect("input should tokenize");
        let cst = parser.parse_program().expect("should successfully parse");
        build_program(cst).expect("should build")
    }

    fn literal(value: u32, raw: &str) -> Literal {
        Literal {
            value,
            raw: raw.to_owned(),
        }
    }

    #[test]
    fn test_variable_addresses() {
        let program = build("var x @ 256\nvar arr @ 0x180");

        assert_eq!(
            program.variables,
            vec![
                ast::VariableDeclaration {
                    name: "x".to_owned(),
                    address: 256,
                    loc: Loc {
                        line: 1,
                        column: 5,
                        offset: 4
                    },
                },
                ast::VariableDeclaration {
                    name: "arr".to_owned(),
                    address: 0x180,
                    loc: Loc {
                        line: 2,
                        column: 5,
                        offset: 16
                    },
                },
            ]
        );
    }

    #[test]
    fn test_statements() {
        let program = build(
            r"
            result = arr[5]
            dst[i] = src[j]
            ACC = x +c 0x10
            IX == 3
            if NOT_CARRY { output }
            ",
        );

        assert_eq!(
            program.body,
            vec![
                Statement::Assignment {
                    target: LValue::Variable("result".to_owned()),
                    value: Value::ArrayAccess {
                        array: "arr".to_owned(),
                        index: Index::Literal(literal(5, "5")),
                    },
                },
                Statement::Assignment {
                    target: LValue::ArrayAccess {
                        array: "dst".to_owned(),
                        index: Index::Variable("i".to_owned()),
                    },
                    value: Value::ArrayAccess {
                        array: "src".to_owned(),
                        index: Index::Variable("j".to_owned()),
                    },
                },
                Statement::BinaryOperation {
                    target: LValue::Register(Register::Acc),
                    left: Value::Variable("x".to_owned()),
                    operator: BinaryOperator::AddWithCarry,
                    right: Value::Literal(literal(16, "0x10")),
                },
                Statement::Comparison {
                    left: Value::Register(Register::Ix),
                    operator: ComparisonOperator::Equal,
                    right: Value::Literal(literal(3, "3")),
                },
                Statement::If {
                    condition: FlagCondition::NotCarry,
                    body: vec![Statement::Builtin(BuiltinInstruction::Output)],
                },
            ]
        );
    }

    #[test]
    fn test_macros_and_raw_assembly() {
        let program = build("macro twice { nop nop }\ntwice!\nasm `  LD ACC, 1`");

        assert_eq!(
            program.body,
            vec![
                Statement::MacroDeclaration {
                    name: "twice".to_owned(),
                    body: vec![
                        Statement::Builtin(BuiltinInstruction::Nop),
                        Statement::Builtin(BuiltinInstruction::Nop),
                    ],
                },
                Statement::MacroCall("twice".to_owned()),
                Statement::RawAssembly("  LD ACC, 1".to_owned()),
            ]
        );
    }

    #[test]
    fn test_hex_literal_uppercase_prefix() {
        let token = Token {
            kind: TokenKind::HexLiteral("0XfF".to_owned()),
            loc: Loc::default(),
        };
        assert_eq!(build_literal(&token), Ok(literal(255, "0XfF")));
    }

    #[test]
    fn test_impossible_trees_are_rejected() {
        let token = Token {
            kind: TokenKind::KWHalt,
            loc: Loc::default(),
        };
        let cst = ProgramCst {
            variables: vec![],
            statements: vec![StatementCst::Assignment {
                target: ValueCst {
                    head: token.clone(),
                    subscript: None,
                },
                value: ValueCst {
                    head: token.clone(),
                    subscript: None,
                },
            }],
        };

        assert_eq!(
            build_program(cst),
            Err(BuildError::UnexpectedToken {
                expected: "number",
                token,
            })
        );
    }
}
