use std::collections::HashMap;

use kuec_parser::ast::{Statement, VariableDeclaration};

use crate::CodegenError;

/// Variable name to data address. Later declarations overwrite earlier ones.
#[derive(Debug, Default)]
pub struct SymbolTable(HashMap<String, u32>);

impl SymbolTable {
    pub fn build(variables: &[VariableDeclaration]) -> Self {
        Self(
            variables
                .iter()
                .map(|var| (var.name.clone(), var.address))
                .collect(),
        )
    }

    pub fn address(&self, name: &str) -> Result<u32, CodegenError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UndefinedVariable(name.to_owned()))
    }
}

/// Macro name to body, collected from the top level statements only.
#[derive(Debug, Default)]
pub struct MacroTable<'a>(HashMap<&'a str, &'a [Statement]>);

impl<'a> MacroTable<'a> {
    pub fn build(statements: &'a [Statement]) -> Self {
        Self(
            statements
                .iter()
                .filter_map(|stmt| match stmt {
                    Statement::MacroDeclaration { name, body } => {
                        Some((name.as_str(), body.as_slice()))
                    }
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn body(&self, name: &str) -> Result<&'a [Statement], CodegenError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UndefinedMacro(name.to_owned()))
    }
}
