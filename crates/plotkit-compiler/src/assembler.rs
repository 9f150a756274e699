//! Final program writing.
//!
//! The assembler owns the only code that writes to a caller-visible
//! destination. Output goes through a temporary file in the destination
//! directory that is atomically persisted, so a failed compilation never
//! leaves a half-written program behind.

use crate::error::{CompileError, CompileResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write a compiled program to `dest`, newline-terminated.
pub fn write_program(dest: &Path, program: &str) -> CompileResult<()> {
    let mut scratch = scratch_file(dest)?;
    scratch.write_all(program.as_bytes())?;
    if !program.ends_with('\n') {
        scratch.write_all(b"\n")?;
    }
    persist(scratch, dest)
}

/// Concatenate chunk part files, strictly in the given order, into
/// `dest`. Every part must exist: a missing part halts assembly and the
/// destination is left untouched.
pub fn assemble(parts: &[PathBuf], dest: &Path) -> CompileResult<()> {
    let mut scratch = scratch_file(dest)?;
    for (index, part) in parts.iter().enumerate() {
        if !part.exists() {
            return Err(CompileError::Assembly {
                index,
                path: part.clone(),
            });
        }
        let mut file = File::open(part)?;
        io::copy(&mut file, &mut scratch)?;
    }
    persist(scratch, dest)
}

fn scratch_file(dest: &Path) -> CompileResult<NamedTempFile> {
    let dir = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(NamedTempFile::new_in(dir)?)
}

fn persist(scratch: NamedTempFile, dest: &Path) -> CompileResult<()> {
    scratch
        .persist(dest)
        .map_err(|persist_error| CompileError::Io(persist_error.error))?;
    debug!(path = %dest.display(), "program written");
    Ok(())
}
