//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use godiff::{BinaryOp, CommandToolchain, GeneratorConfig, ValueKind};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid configuration.
pub const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(name = "godiff")]
#[command(about = "Differential tester for Go toolchains - runs random programs through two compilers")]
#[command(version)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate programs and compare two toolchains on each
    Run {
        #[command(flatten)]
        generator: GeneratorArgs,

        #[command(flatten)]
        binaries: BinaryArgs,

        /// Number of comparison cycles
        #[arg(short = 'n', long, default_value = "10")]
        iterations: usize,

        /// Seed for the program generator (defaults to the system clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Left-hand toolchain
        #[arg(long, value_enum, default_value = "go")]
        left: ToolchainArg,

        /// Right-hand toolchain
        #[arg(long, value_enum, default_value = "gccgo")]
        right: ToolchainArg,

        /// Timeout per build or run step in seconds
        #[arg(short, long, default_value = "30")]
        timeout: u64,

        /// Number of parallel cycles (0 = auto)
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Check programs against the grammar instead of invoking toolchains
        #[arg(long)]
        dry_run: bool,

        /// Exit with status 1 if any cycle mismatched
        #[arg(long)]
        fail_on_mismatch: bool,

        /// Print every program, not only mismatching ones
        #[arg(long)]
        show_program: bool,

        /// Directory to create per-cycle scratch directories in
        #[arg(long, value_name = "DIR")]
        scratch_dir: Option<PathBuf>,
    },

    /// Print generated programs to stdout
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Seed for the program generator (defaults to the system clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of programs to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Report which toolchain binaries are available
    Toolchains {
        #[command(flatten)]
        binaries: BinaryArgs,
    },
}

/// Shape of generated programs.
#[derive(Args, Clone, Debug)]
pub struct GeneratorArgs {
    /// Minimum statements per program
    #[arg(long, default_value = "5")]
    pub min_statements: usize,

    /// Maximum statements per program
    #[arg(long, default_value = "20")]
    pub max_statements: usize,

    /// Value kinds to draw from (int, float, string)
    #[arg(long, value_delimiter = ',', default_value = "int,float,string")]
    pub kinds: Vec<ValueKind>,

    /// Operators to draw from (add, sub, mul, div or + - * /)
    #[arg(long, value_delimiter = ',', default_value = "add,sub,mul,div")]
    pub operators: Vec<BinaryOp>,
}

impl From<&GeneratorArgs> for GeneratorConfig {
    fn from(args: &GeneratorArgs) -> Self {
        Self::default()
            .with_statements(args.min_statements, args.max_statements)
            .with_kinds(args.kinds.clone())
            .with_operators(args.operators.clone())
    }
}

/// Toolchain binary overrides.
#[derive(Args, Clone, Debug)]
pub struct BinaryArgs {
    /// Path or name of the go binary
    #[arg(long, default_value = "go")]
    pub go_bin: String,

    /// Path or name of the gccgo binary
    #[arg(long, default_value = "gccgo")]
    pub gccgo_bin: String,
}

/// Toolchain preset argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToolchainArg {
    /// `go run`
    Go,
    /// `gccgo` build, then run the binary
    Gccgo,
}

impl ToolchainArg {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Gccgo => "gccgo",
        }
    }

    /// Build the preset with binaries taken from `binaries`.
    pub fn toolchain(self, binaries: &BinaryArgs) -> CommandToolchain {
        match self {
            Self::Go => CommandToolchain::go(&binaries.go_bin),
            Self::Gccgo => CommandToolchain::gccgo(&binaries.gccgo_bin),
        }
    }

    /// Binary this preset invokes.
    pub fn binary(self, binaries: &BinaryArgs) -> &str {
        match self {
            Self::Go => &binaries.go_bin,
            Self::Gccgo => &binaries.gccgo_bin,
        }
    }
}
