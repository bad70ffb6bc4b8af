//! The `utils` module provides shared definitions used across `notihub`:
//! the error types and the logging bootstrap.

pub mod error;
pub mod logging;

/// Loads environment variables from `.env` when available.
///
/// A missing file is not an error.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests;
