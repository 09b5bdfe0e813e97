//! Whitespace-separated matrix load/save
//!
//! The on-disk format is the simplest thing that could work for an
//! external collaborator to hand-edit: one row per line, columns separated
//! by any run of ASCII whitespace, no header. This is the format the
//! `qr_factor` CLI binary reads and writes on its `--input` / `--output`
//! paths.

use std::io::Write;
use std::path::Path;

use crate::error::MatrixIoError;
use crate::matrix::MatrixView;

/// Load a matrix from a whitespace-separated text file.
///
/// Every non-blank line becomes one row; blank lines are skipped entirely
/// (not counted, not required to be trailing). The first non-blank row
/// establishes the column count; any later row with a different token
/// count is rejected as [`MatrixIoError::RaggedRow`].
pub fn load(path: &Path) -> Result<MatrixView, MatrixIoError> {
    let text = std::fs::read_to_string(path)?;
    let mut data = Vec::new();
    let mut cols = None;
    let mut rows = 0usize;

    for (row, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let expected = *cols.get_or_insert(tokens.len());
        if tokens.len() != expected {
            return Err(MatrixIoError::RaggedRow { row, expected, found: tokens.len() });
        }
        for (col, token) in tokens.iter().enumerate() {
            let value = token.parse::<f64>().map_err(|_| MatrixIoError::InvalidNumber {
                row,
                col,
                token: (*token).to_string(),
            })?;
            data.push(value);
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(MatrixIoError::Empty);
    }
    let cols = cols.unwrap();
    Ok(MatrixView::from_vec(data, rows, cols))
}

/// Write a matrix as whitespace-separated text, one row per line, columns
/// separated by a single space.
pub fn save(path: &Path, mat: &MatrixView) -> Result<(), MatrixIoError> {
    let mut out = String::with_capacity(mat.rows() * mat.cols() * 12);
    for r in 0..mat.rows() {
        for c in 0..mat.cols() {
            if c > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{:.17e}", mat.get(r, c)));
        }
        out.push('\n');
    }
    let mut file = std::fs::File::create(path)?;
    file.write_all(out.as_bytes())?;
    Ok(())
}

/// Write the `(up, b)` reflector scalar pairs, one row per pivot, two
/// columns (`up` then `b`), in the same whitespace-separated format.
pub fn save_reflectors(path: &Path, up: &[f64], b: &[f64]) -> Result<(), MatrixIoError> {
    debug_assert_eq!(up.len(), b.len());
    let mut out = String::with_capacity(up.len() * 24);
    for (u, bb) in up.iter().zip(b.iter()) {
        out.push_str(&format!("{:.17e} {:.17e}\n", u, bb));
    }
    let mut file = std::fs::File::create(path)?;
    file.write_all(out.as_bytes())?;
    Ok(())
}
