use kuec_asm::{emit::EmitAsm, AluOp, Branch, Instruction, Register, ShiftOp};
use kuec_parser::ast::{
    BinaryOperator, BuiltinInstruction, FlagCondition, Index, LValue, Statement, Value,
};

use crate::{condition::branch_for, values::register, CodegenError, Generator, LoopLabels};

enum Operation {
    Alu(AluOp),
    Shift(ShiftOp),
}

fn operation(op: BinaryOperator) -> Operation {
    match op {
        BinaryOperator::Add => Operation::Alu(AluOp::Add),
        BinaryOperator::AddWithCarry => Operation::Alu(AluOp::Adc),
        BinaryOperator::Subtract => Operation::Alu(AluOp::Sub),
        BinaryOperator::SubtractWithCarry => Operation::Alu(AluOp::Sbc),
        BinaryOperator::BitwiseAnd => Operation::Alu(AluOp::And),
        BinaryOperator::BitwiseOr => Operation::Alu(AluOp::Or),
        BinaryOperator::Xor => Operation::Alu(AluOp::Eor),
        BinaryOperator::ShiftLeft => Operation::Shift(ShiftOp::Sll),
        BinaryOperator::ShiftLeftArithmetic => Operation::Shift(ShiftOp::Sla),
        BinaryOperator::ShiftRight => Operation::Shift(ShiftOp::Srl),
        BinaryOperator::ShiftRightArithmetic => Operation::Shift(ShiftOp::Sra),
        BinaryOperator::RotateLeft => Operation::Shift(ShiftOp::Rll),
        BinaryOperator::RotateRight => Operation::Shift(ShiftOp::Rrl),
    }
}

fn builtin(instruction: BuiltinInstruction) -> Instruction {
    match instruction {
        BuiltinInstruction::Halt => Instruction::Hlt,
        BuiltinInstruction::Nop => Instruction::Nop,
        BuiltinInstruction::Input => Instruction::In,
        BuiltinInstruction::Output => Instruction::Out,
        BuiltinInstruction::SetCarryFlag => Instruction::Scf,
        BuiltinInstruction::ResetCarryFlag => Instruction::Rcf,
    }
}

fn no_operation(reg: Register) -> Instruction {
    let name = reg.emit();
    Instruction::Comment(format!("{name} = {name} (no operation)"))
}

impl<'a> Generator<'a> {
    pub(crate) fn generate_statement(&mut self, statement: &'a Statement) -> Result<(), CodegenError> {
        match statement {
            Statement::Assignment { target, value } => self.generate_assignment(target, value),
            Statement::Comparison { left, right, .. } => self.generate_comparison(left, right),
            Statement::BinaryOperation {
                target,
                left,
                operator,
                right,
            } => self.generate_binary_operation(target, left, *operator, right),
            Statement::If { condition, body } => self.generate_if(*condition, body),
            Statement::Loop { body } => self.generate_loop(body),
            Statement::Break => {
                let labels = self.loops.last().ok_or(CodegenError::BreakOutsideLoop)?;
                let label = labels.end.clone();
                self.push(Instruction::Branch {
                    branch: Branch::Ba,
                    label,
                });
                Ok(())
            }
            Statement::Continue => {
                let labels = self.loops.last().ok_or(CodegenError::ContinueOutsideLoop)?;
                let label = labels.start.clone();
                self.push(Instruction::Branch {
                    branch: Branch::Ba,
                    label,
                });
                Ok(())
            }
            Statement::Builtin(instruction) => {
                self.push(builtin(*instruction));
                Ok(())
            }
            Statement::MacroCall(name) => self.generate_macro_call(name),
            Statement::MacroDeclaration { name, .. } => {
                tracing::warn!(
                    "macro {name} is declared inside a block, only top level macros can be called"
                );
                Ok(())
            }
            Statement::RawAssembly(text) => {
                if !text.is_empty() {
                    self.push(Instruction::Raw(text.clone()));
                }
                Ok(())
            }
        }
    }

    fn generate_block(&mut self, body: &'a [Statement]) -> Result<(), CodegenError> {
        for statement in body {
            self.generate_statement(statement)?;
        }
        Ok(())
    }

    fn generate_assignment(&mut self, target: &LValue, value: &Value) -> Result<(), CodegenError> {
        match (target, value) {
            (LValue::Register(reg), value) => {
                let reg = register(*reg);
                if !self.load(value, reg)? {
                    self.push(no_operation(reg));
                }
                Ok(())
            }
            (
                LValue::ArrayAccess {
                    array: dst,
                    index: dst_index @ Index::Variable(_),
                },
                Value::ArrayAccess {
                    array: src,
                    index: src_index @ Index::Variable(_),
                },
            ) => {
                // Both sides need IX. It has to hold the source index until the element is in
                // ACC, only then can it be reloaded with the destination index.
                self.load_element(src, src_index)?;
                self.store_element(dst, dst_index)
            }
            (target, value) => {
                self.load(value, Register::Acc)?;
                self.store(target)
            }
        }
    }

    fn generate_comparison(&mut self, left: &Value, right: &Value) -> Result<(), CodegenError> {
        if !self.load(left, Register::Acc)? {
            self.push(no_operation(Register::Acc));
        }
        let operand = self.operand(right)?;
        self.push(Instruction::Cmp {
            reg: Register::Acc,
            operand,
        });
        Ok(())
    }

    /// Emits `reg = reg <op> right`.
    fn generate_operation(
        &mut self,
        reg: Register,
        operator: BinaryOperator,
        right: &Value,
    ) -> Result<(), CodegenError> {
        // Shifts move by one bit, the right operand is still resolved so undefined names fail.
        let operand = self.operand(right)?;
        let instruction = match operation(operator) {
            Operation::Alu(op) => Instruction::Alu { op, reg, operand },
            Operation::Shift(op) => Instruction::Shift { op, reg },
        };
        self.push(instruction);
        Ok(())
    }

    fn generate_binary_operation(
        &mut self,
        target: &LValue,
        left: &Value,
        operator: BinaryOperator,
        right: &Value,
    ) -> Result<(), CodegenError> {
        if let LValue::Register(reg) = target {
            // Computed in place, no store needed.
            let reg = register(*reg);
            self.load(left, reg)?;
            return self.generate_operation(reg, operator, right);
        }

        self.load(left, Register::Acc)?;
        self.generate_operation(Register::Acc, operator, right)?;
        self.store(target)
    }

    fn generate_if(
        &mut self,
        condition: FlagCondition,
        body: &'a [Statement],
    ) -> Result<(), CodegenError> {
        let end = self.new_label("END_IF");

        self.push(Instruction::Branch {
            branch: branch_for(condition, true),
            label: end.clone(),
        });
        self.generate_block(body)?;
        self.push(Instruction::Label(end));
        Ok(())
    }

    fn generate_loop(&mut self, body: &'a [Statement]) -> Result<(), CodegenError> {
        let start = self.new_label("LOOP_START");
        let end = self.new_label("LOOP_END");

        self.loops.push(LoopLabels {
            start: start.clone(),
            end: end.clone(),
        });
        self.push(Instruction::Label(start.clone()));
        self.generate_block(body)?;
        self.push(Instruction::Branch {
            branch: Branch::Ba,
            label: start,
        });
        self.push(Instruction::Label(end));
        self.loops.pop();

        Ok(())
    }

    fn generate_macro_call(&mut self, name: &str) -> Result<(), CodegenError> {
        let body = self.macros.body(name)?;
        tracing::debug!(macro_name = name, loop_depth = self.loops.len(), "expanding macro");
        self.generate_block(body)
    }
}
