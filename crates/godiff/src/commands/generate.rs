//! Generate command.

use godiff::{GeneratorConfig, ProgramGenerator};
use tracing::error;

use crate::cli::{EXIT_SUCCESS, EXIT_USAGE, GeneratorArgs};

/// Print `count` programs, separated by a comment line naming the seed.
pub fn cmd_generate(args: &GeneratorArgs, seed: u64, count: usize) -> i32 {
    let mut generator = match ProgramGenerator::seeded(GeneratorConfig::from(args), seed) {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "invalid generator configuration");
            return EXIT_USAGE;
        }
    };

    for i in 0..count {
        let program = generator.generate_program();
        println!("// seed {seed}, program {}/{count}", i + 1);
        print!("{program}");
    }
    EXIT_SUCCESS
}
