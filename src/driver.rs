use std::{fs, io::Write, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use kuec_parser::{ast, lexer::Token};
use tracing::Level;

use crate::CompileError;

#[derive(Parser, Debug)]
#[command(
    name = "kuec",
    version,
    about = "Translates KUE-DSL programs into KUE-CHIP2 assembly"
)]
pub struct Cli {
    /// KUE-DSL source file
    pub input: PathBuf,

    /// Write the assembly here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after tokenizing and print the tokens
    #[arg(long, group = "stage")]
    pub lex: bool,

    /// Stop after parsing and print the tree
    #[arg(long, group = "stage")]
    pub parse: bool,

    /// Stop after code generation and print the instructions
    #[arg(long, group = "stage")]
    pub codegen: bool,

    /// More logging, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Compile,
    Lex,
    Parse,
    Codegen,
}

impl Cli {
    pub fn stage(&self) -> Stage {
        if self.lex {
            Stage::Lex
        } else if self.parse {
            Stage::Parse
        } else if self.codegen {
            Stage::Codegen
        } else {
            Stage::Compile
        }
    }
}

pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Logs go to stderr so they never mix with assembly on stdout.
pub fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(std::io::stderr)
        .init();
}

pub struct Options {
    stage: Stage,
    input_file: PathBuf,
    output_file: Option<PathBuf>,
    source: String,
}

impl Options {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let source = fs::read_to_string(&cli.input)
            .with_context(|| format!("could not read {}", cli.input.display()))?;

        Ok(Self {
            stage: cli.stage(),
            input_file: cli.input.clone(),
            output_file: cli.output.clone(),
            source,
        })
    }

    pub fn run_lexer(&self) -> Result<Vec<Token>, CompileError> {
        let tokens = crate::lex(&self.source)?;

        if let Stage::Lex = self.stage {
            for tok in &tokens {
                println!("{}: {:?}", tok.loc, tok.kind);
            }
        }

        Ok(tokens)
    }

    pub fn run_parser(&self) -> Result<ast::Program, CompileError> {
        let program = crate::parse(&self.source)?;

        if let Stage::Parse = self.stage {
            println!("{:#?}", program);
        }

        Ok(program)
    }

    #[cfg(feature = "codegen")]
    pub fn run_code_gen(&self, program: &ast::Program) -> Result<kuec_asm::Program, CompileError> {
        let program = kuec_codegen::code_generation(program)?;

        if let Stage::Codegen = self.stage {
            println!("{:#?}", program);
        }

        Ok(program)
    }

    #[cfg(feature = "codegen")]
    pub fn run_assembly_emission(&self, program: &kuec_asm::Program) -> anyhow::Result<()> {
        use kuec_asm::emit::EmitAsm;

        let mut text = program.emit();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        match &self.output_file {
            Some(path) => fs::write(path, text)
                .with_context(|| format!("could not write {}", path.display()))?,
            None => std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("could not write to stdout")?,
        }

        Ok(())
    }

    fn run_stages(&self) -> anyhow::Result<()> {
        if let Stage::Lex = self.stage {
            self.run_lexer()?;
            return Ok(());
        }

        let program = self.run_parser()?;

        if let Stage::Parse = self.stage {
            return Ok(());
        }

        #[cfg(feature = "codegen")]
        {
            let program = self.run_code_gen(&program)?;

            if let Stage::Codegen = self.stage {
                return Ok(());
            }

            self.run_assembly_emission(&program)
        }

        #[cfg(not(feature = "codegen"))]
        {
            let _ = program;
            bail!("kuec was built without the codegen feature")
        }
    }
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let opts = Options::from_cli(cli)?;
    tracing::info!(input = %opts.input_file.display(), stage = ?opts.stage, "compiling");

    match opts.run_stages() {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<CompileError>() {
            Some(compile_err) => {
                for diagnostic in compile_err.diagnostics() {
                    eprintln!("{}: {}", opts.input_file.display(), diagnostic);
                }
                bail!("could not compile {}", opts.input_file.display())
            }
            None => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stage_flags() {
        let cli = Cli::try_parse_from(["kuec", "prog.kue"]).expect("should parse");
        assert_eq!(cli.stage(), Stage::Compile);
        assert_eq!(cli.output, None);

        let cli = Cli::try_parse_from(["kuec", "prog.kue", "--parse", "-o", "out.asm"])
            .expect("should parse");
        assert_eq!(cli.stage(), Stage::Parse);
        assert_eq!(cli.output, Some(PathBuf::from("out.asm")));
    }

    #[test]
    fn test_stage_flags_conflict() {
        assert!(Cli::try_parse_from(["kuec", "prog.kue", "--lex", "--codegen"]).is_err());
        assert!(Cli::try_parse_from(["kuec"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["kuec", "prog.kue", "-vv"]).expect("should parse");
        assert_eq!(log_level(cli.verbose), Level::DEBUG);
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(9), Level::TRACE);
    }

    #[cfg(feature = "codegen")]
    #[test]
    fn test_run_writes_output_file() {
        let dir = std::env::temp_dir().join(format!("kuec-driver-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("should create dir");
        let input = dir.join("prog.kue");
        let output = dir.join("prog.asm");
        fs::write(&input, "var x @ 0x80\nx = 1\nhalt\n").expect("should write");

        let cli = Cli::try_parse_from([
            OsStr::new("kuec"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .expect("should parse");
        run(&cli).expect("should compile");

        assert_eq!(
            fs::read_to_string(&output).expect("should read"),
            "* var x @ 0x080\n\nLD ACC, 1\nST ACC, (80H)\nHLT\n"
        );
        fs::remove_dir_all(&dir).expect("should clean up");
    }

    #[test]
    fn test_run_reports_compile_errors() {
        let dir = std::env::temp_dir().join(format!("kuec-driver-err-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("should create dir");
        let input = dir.join("bad.kue");
        fs::write(&input, "x = \n").expect("should write");

        let cli = Cli::try_parse_from([OsStr::new("kuec"), input.as_os_str(), OsStr::new("--parse")])
            .expect("should parse");
        let err = run(&cli).expect_err("should fail");
        assert!(err.to_string().starts_with("could not compile"));
        fs::remove_dir_all(&dir).expect("should clean up");
    }
}
