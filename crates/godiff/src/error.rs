use thiserror::Error;

/// Top-level godiff errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid generator configuration: {0}")]
    Generator(#[from] godiff_gen::GeneratorError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
