//! Per-cycle working directory.

use std::fs;
use std::path::{Path, PathBuf};

use godiff_gen::Program;
use tempfile::TempDir;

/// Name of the generated source file.
pub const SOURCE_NAME: &str = "main.go";

/// Name of the compiled artifact for ahead-of-time toolchains.
pub const ARTIFACT_NAME: &str = "output";

/// A fresh directory holding one cycle's source file and build artifacts.
///
/// Removed when dropped, on every exit path. Each cycle gets its own
/// directory, so concurrent cycles never share a source or artifact path.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
    source: PathBuf,
}

impl ScratchDir {
    /// Create a directory under `root` (or the system temp dir) and write
    /// the program's source into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the source file cannot be created.
    pub fn create(root: Option<&Path>, program: &Program) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("godiff-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let source = dir.path().join(SOURCE_NAME);
        fs::write(&source, program.source())?;
        Ok(Self { dir, source })
    }

    /// The directory itself.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.path().join(ARTIFACT_NAME)
    }

    /// Remove the directory, reporting failures that `Drop` would swallow.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory could not be removed.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use godiff_gen::{GeneratorConfig, ProgramGenerator};

    fn program() -> Program {
        ProgramGenerator::seeded(GeneratorConfig::default(), 21)
            .unwrap()
            .generate_program()
    }

    #[test]
    fn test_source_written() {
        let program = program();
        let scratch = ScratchDir::create(None, &program).unwrap();
        assert_eq!(
            fs::read_to_string(scratch.source_path()).unwrap(),
            program.source()
        );
        assert!(scratch.artifact_path().starts_with(scratch.path()));
    }

    #[test]
    fn test_removed_on_drop_and_close() {
        let root = tempfile::tempdir().unwrap();
        let program = program();

        let scratch = ScratchDir::create(Some(root.path()), &program).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.starts_with(root.path()));
        drop(scratch);
        assert!(!path.exists());

        let scratch = ScratchDir::create(Some(root.path()), &program).unwrap();
        let path = scratch.path().to_path_buf();
        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_distinct_dirs() {
        let program = program();
        let a = ScratchDir::create(None, &program).unwrap();
        let b = ScratchDir::create(None, &program).unwrap();
        assert_ne!(a.source_path(), b.source_path());
        assert_ne!(a.artifact_path(), b.artifact_path());
    }

    #[test]
    fn test_missing_root_fails() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("absent");
        assert!(ScratchDir::create(Some(&missing), &program()).is_err());
    }
}
