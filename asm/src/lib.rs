//! KUE-CHIP2 instruction set, as far as the translator emits it.

pub mod emit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Acc,
    Ix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Imm(u32),
    Register(Register),
    /// `(XXXH)`
    Direct(u32),
    /// `(IX+XXXH)`, the base address plus the index register.
    Indexed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Or,
    Eor,
}

/// One bit shifts and rotations, they take no operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Sll,
    Sla,
    Srl,
    Sra,
    Rll,
    Rrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Always
    Ba,
    Bz,
    Bnz,
    Bn,
    Bp,
    Bzp,
    Bzn,
    Bc,
    Bnc,
    Bo,
    Bno,
    Bge,
    Blt,
    Bgt,
    Ble,
    Bin,
    Bnin,
    Bout,
    Bnout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Ld {
        dst: Register,
        src: Operand,
    },
    St {
        src: Register,
        dst: Operand,
    },
    Alu {
        op: AluOp,
        reg: Register,
        operand: Operand,
    },
    Shift {
        op: ShiftOp,
        reg: Register,
    },
    Cmp {
        reg: Register,
        operand: Operand,
    },
    Branch {
        branch: Branch,
        label: String,
    },
    Label(String),
    Comment(String),
    /// Emitted as is.
    Raw(String),
    Hlt,
    Nop,
    In,
    Out,
    Scf,
    Rcf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSymbol {
    pub name: String,
    pub address: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub variables: Vec<DataSymbol>,
    pub instructions: Vec<Instruction>,
}
