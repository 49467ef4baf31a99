use crate::{AluOp, Branch, DataSymbol, Instruction, Operand, Program, Register, ShiftOp};

/// A Structure that implements this trait, can emit assembly text using the provided function.
/// Instructions emit a single line without a trailing newline, the [`Program`] joins them.
pub trait EmitAsm {
    fn emit(&self) -> String;
}

impl EmitAsm for Register {
    fn emit(&self) -> String {
        match self {
            Register::Acc => "ACC",
            Register::Ix => "IX",
        }
        .to_owned()
    }
}

impl EmitAsm for Operand {
    fn emit(&self) -> String {
        match self {
            Operand::Imm(val) => val.to_string(),
            Operand::Register(reg) => reg.emit(),
            Operand::Direct(address) => format!("({:X}H)", address),
            Operand::Indexed(base) => format!("(IX+{:X}H)", base),
        }
    }
}

impl EmitAsm for AluOp {
    fn emit(&self) -> String {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbc => "SBC",
            AluOp::And => "AND",
            AluOp::Or => "OR",
            AluOp::Eor => "EOR",
        }
        .to_owned()
    }
}

impl EmitAsm for ShiftOp {
    fn emit(&self) -> String {
        match self {
            ShiftOp::Sll => "SLL",
            ShiftOp::Sla => "SLA",
            ShiftOp::Srl => "SRL",
            ShiftOp::Sra => "SRA",
            ShiftOp::Rll => "RLL",
            ShiftOp::Rrl => "RRL",
        }
        .to_owned()
    }
}

impl EmitAsm for Branch {
    fn emit(&self) -> String {
        match self {
            Branch::Ba => "BA",
            Branch::Bz => "BZ",
            Branch::Bnz => "BNZ",
            Branch::Bn => "BN",
            Branch::Bp => "BP",
            Branch::Bzp => "BZP",
            Branch::Bzn => "BZN",
            Branch::Bc => "BC",
            Branch::Bnc => "BNC",
            Branch::Bo => "BO",
            Branch::Bno => "BNO",
            Branch::Bge => "BGE",
            Branch::Blt => "BLT",
            Branch::Bgt => "BGT",
            Branch::Ble => "BLE",
            Branch::Bin => "BIN",
            Branch::Bnin => "BNIN",
            Branch::Bout => "BOUT",
            Branch::Bnout => "BNOUT",
        }
        .to_owned()
    }
}

impl EmitAsm for Instruction {
    fn emit(&self) -> String {
        match self {
            Instruction::Ld { dst, src } => format!("LD {}, {}", dst.emit(), src.emit()),
            Instruction::St { src, dst } => format!("ST {}, {}", src.emit(), dst.emit()),
            Instruction::Alu { op, reg, operand } => {
                format!("{} {}, {}", op.emit(), reg.emit(), operand.emit())
            }
            Instruction::Shift { op, reg } => format!("{} {}", op.emit(), reg.emit()),
            Instruction::Cmp { reg, operand } => {
                format!("CMP {}, {}", reg.emit(), operand.emit())
            }
            Instruction::Branch { branch, label } => format!("{} {}", branch.emit(), label),
            Instruction::Label(label) => format!("{}:", label),
            Instruction::Comment(text) => format!("* {}", text),
            Instruction::Raw(text) => text.clone(),
            Instruction::Hlt => "HLT".to_owned(),
            Instruction::Nop => "NOP".to_owned(),
            Instruction::In => "IN".to_owned(),
            Instruction::Out => "OUT".to_owned(),
            Instruction::Scf => "SCF".to_owned(),
            Instruction::Rcf => "RCF".to_owned(),
        }
    }
}

impl EmitAsm for DataSymbol {
    fn emit(&self) -> String {
        format!("* var {} @ 0x{:03X}", self.name, self.address)
    }
}

impl EmitAsm for Program {
    /// One comment line per variable, a blank line if there were any, then the instructions.
    fn emit(&self) -> String {
        let mut lines: Vec<String> = self.variables.iter().map(EmitAsm::emit).collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(self.instructions.iter().map(EmitAsm::emit));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operands() {
        assert_eq!(Operand::Imm(42).emit(), "42");
        assert_eq!(Operand::Direct(0x80).emit(), "(80H)");
        assert_eq!(Operand::Direct(0x1ab).emit(), "(1ABH)");
        assert_eq!(Operand::Indexed(0x180).emit(), "(IX+180H)");
        assert_eq!(Operand::Register(Register::Ix).emit(), "IX");
    }

    #[test]
    fn test_instructions() {
        let instructions = vec![
            Instruction::Ld {
                dst: Register::Ix,
                src: Operand::Register(Register::Acc),
            },
            Instruction::St {
                src: Register::Acc,
                dst: Operand::Indexed(0x180),
            },
            Instruction::Alu {
                op: AluOp::Eor,
                reg: Register::Acc,
                operand: Operand::Imm(255),
            },
            Instruction::Shift {
                op: ShiftOp::Rrl,
                reg: Register::Ix,
            },
            Instruction::Cmp {
                reg: Register::Acc,
                operand: Operand::Direct(0x81),
            },
            Instruction::Branch {
                branch: Branch::Bnz,
                label: "END_IF_0".to_owned(),
            },
            Instruction::Label("END_IF_0".to_owned()),
            Instruction::Comment("ACC = ACC (no operation)".to_owned()),
            Instruction::Scf,
        ];

        assert_eq!(
            instructions.iter().map(EmitAsm::emit).collect::<Vec<_>>(),
            vec![
                "LD IX, ACC",
                "ST ACC, (IX+180H)",
                "EOR ACC, 255",
                "RRL IX",
                "CMP ACC, (81H)",
                "BNZ END_IF_0",
                "END_IF_0:",
                "* ACC = ACC (no operation)",
                "SCF",
            ]
        );
    }

    #[test]
    fn test_program_layout() {
        let program = Program {
            variables: vec![
                DataSymbol {
                    name: "x".to_owned(),
                    address: 256,
                },
                DataSymbol {
                    name: "y".to_owned(),
                    address: 0x8,
                },
            ],
            instructions: vec![Instruction::Raw("  NOP\n  HLT".to_owned())],
        };

        assert_eq!(
            program.emit(),
            "* var x @ 0x100\n* var y @ 0x008\n\n  NOP\n  HLT"
        );
    }

    #[test]
    fn test_variables_only() {
        let program = Program {
            variables: vec![DataSymbol {
                name: "x".to_owned(),
                address: 0xab,
            }],
            instructions: vec![],
        };

        assert_eq!(program.emit(), "* var x @ 0x0AB\n");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(Program::default().emit(), "");
    }
}
