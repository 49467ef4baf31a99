pub mod condition;
pub mod statements;
pub mod symbols;
pub mod values;

use kuec_asm::{emit::EmitAsm, DataSymbol, Instruction, Register};
use kuec_parser::ast::{self, Statement};
use kuec_utils::unique_id::LabelGenerator;
use symbols::{MacroTable, SymbolTable};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Undefined macro: {0}")]
    UndefinedMacro(String),
    #[error("break statement outside of loop")]
    BreakOutsideLoop,
    #[error("continue statement outside of loop")]
    ContinueOutsideLoop,
    #[error("Cannot use ST to store to register {}, registers are written with LD or ALU instructions", .0.emit())]
    RegisterStore(Register),
    #[error("{0}[...] with a variable index can not be used as a direct operand")]
    IndexedOperand(String),
    #[error("Address of {array}[{index}] does not fit into a word")]
    AddressOverflow { array: String, index: u32 },
}

#[derive(Debug, Clone)]
struct LoopLabels {
    start: String,
    end: String,
}

/// State of one code generation run. Create a new one per program.
#[derive(Debug)]
pub struct Generator<'a> {
    program: &'a ast::Program,
    symbols: SymbolTable,
    macros: MacroTable<'a>,
    labels: LabelGenerator,
    loops: Vec<LoopLabels>,
    instructions: Vec<Instruction>,
}

impl<'a> Generator<'a> {
    pub fn new(program: &'a ast::Program) -> Self {
        Self {
            program,
            symbols: SymbolTable::build(&program.variables),
            macros: MacroTable::build(&program.body),
            labels: LabelGenerator::new(),
            loops: vec![],
            instructions: vec![],
        }
    }

    pub fn generate(mut self) -> Result<kuec_asm::Program, CodegenError> {
        let program = self.program;
        for statement in &program.body {
            // Top level declarations are already in the macro table.
            if let Statement::MacroDeclaration { .. } = statement {
                continue;
            }
            self.generate_statement(statement)?;
        }

        tracing::debug!(
            instructions = self.instructions.len(),
            labels = self.labels.issued(),
            "code generation finished"
        );

        Ok(kuec_asm::Program {
            variables: program
                .variables
                .iter()
                .map(|var| DataSymbol {
                    name: var.name.clone(),
                    address: var.address,
                })
                .collect(),
            instructions: self.instructions,
        })
    }

    fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn new_label(&mut self, prefix: &str) -> String {
        let label = self.labels.temp_label_name(prefix);
        tracing::trace!(%label, "allocated label");
        label
    }
}

pub fn code_generation(program: &ast::Program) -> Result<kuec_asm::Program, CodegenError> {
    Generator::new(program).generate()
}
