use crate::lexer::Loc;

pub type Identifier = String;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Program {
    pub variables: Vec<VariableDeclaration>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub address: u32,
    pub loc: Loc,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Statement {
    Assignment {
        target: LValue,
        value: Value,
    },
    Comparison {
        left: Value,
        operator: ComparisonOperator,
        right: Value,
    },
    BinaryOperation {
        target: LValue,
        left: Value,
        operator: BinaryOperator,
        right: Value,
    },
    If {
        condition: FlagCondition,
        body: Vec<Statement>,
    },
    Loop {
        body: Vec<Statement>,
    },
    Break,
    Continue,
    Builtin(BuiltinInstruction),
    MacroCall(Identifier),
    MacroDeclaration {
        name: Identifier,
        body: Vec<Statement>,
    },
    RawAssembly(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    Variable(Identifier),
    ArrayAccess { array: Identifier, index: Index },
    Literal(Literal),
    Register(Register),
}

/// Assignment target. Same as [`Value`] without literals.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LValue {
    Variable(Identifier),
    ArrayAccess { array: Identifier, index: Index },
    Register(Register),
}

impl From<LValue> for Value {
    fn from(value: LValue) -> Self {
        match value {
            LValue::Variable(name) => Value::Variable(name),
            LValue::ArrayAccess { array, index } => Value::ArrayAccess { array, index },
            LValue::Register(reg) => Value::Register(reg),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Index {
    Variable(Identifier),
    Literal(Literal),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Literal {
    pub value: u32,
    /// Spelling in the source, `0x10` and `16` have the same value.
    pub raw: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Register {
    Acc,
    Ix,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BinaryOperator {
    Add,
    AddWithCarry,
    Subtract,
    SubtractWithCarry,
    BitwiseAnd,
    BitwiseOr,
    Xor,
    ShiftLeft,
    ShiftLeftArithmetic,
    ShiftRight,
    ShiftRightArithmetic,
    RotateLeft,
    RotateRight,
}

impl BinaryOperator {
    pub fn is_shift(&self) -> bool {
        matches!(
            self,
            Self::ShiftLeft
                | Self::ShiftLeftArithmetic
                | Self::ShiftRight
                | Self::ShiftRightArithmetic
                | Self::RotateLeft
                | Self::RotateRight
        )
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FlagCondition {
    Zero,
    NotZero,
    Negative,
    Positive,
    ZeroOrPositive,
    ZeroOrNegative,
    Carry,
    NotCarry,
    Overflow,
    Gte,
    Lt,
    Gt,
    Lte,
    NoInput,
    NoOutput,
}

impl FlagCondition {
    pub const ALL: [FlagCondition; 15] = [
        Self::Zero,
        Self::NotZero,
        Self::Negative,
        Self::Positive,
        Self::ZeroOrPositive,
        Self::ZeroOrNegative,
        Self::Carry,
        Self::NotCarry,
        Self::Overflow,
        Self::Gte,
        Self::Lt,
        Self::Gt,
        Self::Lte,
        Self::NoInput,
        Self::NoOutput,
    ];
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BuiltinInstruction {
    Halt,
    Nop,
    Input,
    Output,
    SetCarryFlag,
    ResetCarryFlag,
}
