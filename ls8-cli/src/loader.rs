//! Reads LS-8 program files into memory images.

use std::fs;
use std::path::{Path, PathBuf};

use ls8_core::MEMORY_SIZE;
use thiserror::Error;

use crate::lexer::{self, LexError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: LexError },

    #[error("{}: program is {len} bytes, memory holds {capacity}", .path.display())]
    TooLarge {
        path: PathBuf,
        len: usize,
        capacity: usize,
    },
}

/// Parse program text, checking the image fits in memory.
pub fn load_str(path: &Path, src: &str) -> Result<Vec<u8>, LoadError> {
    let program = lexer::parse_program(src).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if program.len() > MEMORY_SIZE {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            len: program.len(),
            capacity: MEMORY_SIZE,
        });
    }

    log::debug!("{}: {} byte image", path.display(), program.len());
    Ok(program)
}

/// Read and parse the program file at `path`.
pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let src = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_str(path, &src)
}
