//! Loads, stores and operands.
//!
//! Array elements with a constant index are folded to a direct address. A variable index is
//! loaded into IX first and the element is addressed as `(IX+BASEH)`, which means every access
//! with a variable index clobbers IX.

use kuec_asm::{Instruction, Operand, Register};
use kuec_parser::ast::{self, Index, LValue, Value};

use crate::{CodegenError, Generator};

pub fn register(reg: ast::Register) -> Register {
    match reg {
        ast::Register::Acc => Register::Acc,
        ast::Register::Ix => Register::Ix,
    }
}

impl Generator<'_> {
    /// Base address plus a constant index.
    fn element_address(&self, array: &str, index: u32) -> Result<u32, CodegenError> {
        self.symbols
            .address(array)?
            .checked_add(index)
            .ok_or_else(|| CodegenError::AddressOverflow {
                array: array.to_owned(),
                index,
            })
    }

    /// `LD IX, (i)`, returns the operand addressing `array[i]`.
    fn load_index(&mut self, array: &str, index: &str) -> Result<Operand, CodegenError> {
        let base = self.symbols.address(array)?;
        let index = self.symbols.address(index)?;
        self.push(Instruction::Ld {
            dst: Register::Ix,
            src: Operand::Direct(index),
        });
        Ok(Operand::Indexed(base))
    }

    /// Array elements always land in ACC.
    pub(crate) fn load_element(&mut self, array: &str, index: &Index) -> Result<(), CodegenError> {
        let src = match index {
            Index::Literal(lit) => Operand::Direct(self.element_address(array, lit.value)?),
            Index::Variable(name) => self.load_index(array, name)?,
        };
        self.push(Instruction::Ld {
            dst: Register::Acc,
            src,
        });
        Ok(())
    }

    pub(crate) fn store_element(&mut self, array: &str, index: &Index) -> Result<(), CodegenError> {
        let dst = match index {
            Index::Literal(lit) => Operand::Direct(self.element_address(array, lit.value)?),
            Index::Variable(name) => self.load_index(array, name)?,
        };
        self.push(Instruction::St {
            src: Register::Acc,
            dst,
        });
        Ok(())
    }

    /// Loads `value` into `reg`. Returns false and emits nothing if `value` already is `reg`.
    pub(crate) fn load(&mut self, value: &Value, reg: Register) -> Result<bool, CodegenError> {
        let src = match value {
            Value::Literal(lit) => Operand::Imm(lit.value),
            Value::Variable(name) => Operand::Direct(self.symbols.address(name)?),
            Value::ArrayAccess { array, index } => {
                self.load_element(array, index)?;
                if reg == Register::Acc {
                    return Ok(true);
                }
                Operand::Register(Register::Acc)
            }
            Value::Register(src) => {
                let src = register(*src);
                if src == reg {
                    return Ok(false);
                }
                Operand::Register(src)
            }
        };

        self.push(Instruction::Ld { dst: reg, src });
        Ok(true)
    }

    /// Stores ACC into `target`. Registers can not be the target of ST and have to be handled by
    /// the caller.
    pub(crate) fn store(&mut self, target: &LValue) -> Result<(), CodegenError> {
        match target {
            LValue::Variable(name) => {
                let address = self.symbols.address(name)?;
                self.push(Instruction::St {
                    src: Register::Acc,
                    dst: Operand::Direct(address),
                });
                Ok(())
            }
            LValue::ArrayAccess { array, index } => self.store_element(array, index),
            LValue::Register(reg) => Err(CodegenError::RegisterStore(register(*reg))),
        }
    }

    /// Operand of an ALU or CMP instruction.
    pub(crate) fn operand(&self, value: &Value) -> Result<Operand, CodegenError> {
        match value {
            Value::Literal(lit) => Ok(Operand::Imm(lit.value)),
            Value::Variable(name) => Ok(Operand::Direct(self.symbols.address(name)?)),
            Value::ArrayAccess {
                array,
                index: Index::Literal(lit),
            } => Ok(Operand::Direct(self.element_address(array, lit.value)?)),
            Value::ArrayAccess {
                array,
                index: Index::Variable(_),
            } => Err(CodegenError::IndexedOperand(array.clone())),
            Value::Register(reg) => Ok(Operand::Register(register(*reg))),
        }
    }
}
