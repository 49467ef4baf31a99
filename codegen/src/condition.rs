//! Flag condition to branch instruction tables.

use kuec_asm::Branch;
use kuec_parser::ast::FlagCondition;

/// Branch taken when `condition` holds.
pub fn affirmative(condition: FlagCondition) -> Branch {
    match condition {
        FlagCondition::Zero => Branch::Bz,
        FlagCondition::NotZero => Branch::Bnz,
        FlagCondition::Negative => Branch::Bn,
        FlagCondition::Positive => Branch::Bp,
        FlagCondition::ZeroOrPositive => Branch::Bzp,
        FlagCondition::ZeroOrNegative => Branch::Bzn,
        FlagCondition::Carry => Branch::Bc,
        FlagCondition::NotCarry => Branch::Bnc,
        FlagCondition::Overflow => Branch::Bo,
        FlagCondition::Gte => Branch::Bge,
        FlagCondition::Lt => Branch::Blt,
        FlagCondition::Gt => Branch::Bgt,
        FlagCondition::Lte => Branch::Ble,
        FlagCondition::NoInput => Branch::Bnin,
        FlagCondition::NoOutput => Branch::Bnout,
    }
}

/// Branch taken exactly when `condition` does not hold.
pub fn negated(condition: FlagCondition) -> Branch {
    match condition {
        FlagCondition::Zero => Branch::Bnz,
        FlagCondition::NotZero => Branch::Bz,
        FlagCondition::Negative => Branch::Bzp,
        FlagCondition::Positive => Branch::Bzn,
        FlagCondition::ZeroOrPositive => Branch::Bn,
        FlagCondition::ZeroOrNegative => Branch::Bp,
        FlagCondition::Carry => Branch::Bnc,
        FlagCondition::NotCarry => Branch::Bc,
        FlagCondition::Overflow => Branch::Bno,
        FlagCondition::Gte => Branch::Blt,
        FlagCondition::Lt => Branch::Bge,
        FlagCondition::Gt => Branch::Ble,
        FlagCondition::Lte => Branch::Bgt,
        FlagCondition::NoInput => Branch::Bin,
        FlagCondition::NoOutput => Branch::Bout,
    }
}

pub fn branch_for(condition: FlagCondition, negate: bool) -> Branch {
    if negate {
        negated(condition)
    } else {
        affirmative(condition)
    }
}
