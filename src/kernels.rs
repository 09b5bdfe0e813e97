//! Numeric kernels: `panel_factor` and `panel_update`
//!
//! These are the only two routines that touch matrix cells. Both operate on
//! a half-open row range `[row_start, row_end)` of pivots; `panel_factor`
//! additionally produces the Householder scalar pair for each pivot and
//! applies it to its own column-block in the same pass, while
//! `panel_update` only applies already-computed reflectors to a distinct,
//! trailing column-block.
//!
//! The reflector for pivot `p` lives below the diagonal in **column** `p`
//! (rows `p+1..N`), which is where the column-norm pivot check and the
//! per-column dot products below read it from; it is never overwritten by
//! later tasks since every update touches columns strictly to the right of
//! its own panel.
//!
//! A degenerate pivot (`cl <= 0`, i.e. a zero column) or a reflector that
//! would not reduce the matrix (`b >= 0`) is not an error: the reflector
//! slot is left at its initial zero and later updates for that row become
//! no-ops (`sm == 0`), per the design notes in `SPEC_FULL.md` §4.5/§7.

use crate::matrix::MatrixView;
use crate::reflectors::ReflectorStore;

/// Compute reflectors for pivots `[row_start, row_end)` and apply them to
/// this panel's own column-block `[col_start, col_end)`.
///
/// `n` is the matrix's column count; the pivot-norm scan and reflector
/// application both walk rows `p+1..n`, matching the reference design's
/// explicit `i < N` inner loop (see the `M == N` assumption documented on
/// [`crate::driver::factorize`]).
pub fn panel_factor(
    mat: &MatrixView,
    reflectors: &ReflectorStore,
    row_start: usize,
    row_end: usize,
    col_end: usize,
    n: usize,
) {
    let row_start = if row_start == 1 { 0 } else { row_start };
    for p in row_start.max(0)..row_end {
        // Column-norm scan: the pivot column's sub-diagonal entries live at
        // (row k, col p) for k in p+1..n.
        let mut cl = mat.get(p, p).abs();
        let mut sm1 = 0.0;
        for k in (p + 1)..n {
            let v = mat.get(k, p);
            cl = cl.max(v.abs());
            sm1 += v * v;
        }

        if cl <= 0.0 {
            // Degenerate (all-zero sub-column): skip this pivot entirely.
            continue;
        }

        let clinv = 1.0 / cl;
        let d = mat.get(p, p) * clinv;
        let sm = d * d + sm1 * clinv * clinv;
        let mut cl_signed = cl * sm.sqrt();
        if mat.get(p, p) > 0.0 {
            cl_signed = -cl_signed;
        }

        let up = mat.get(p, p) - cl_signed;
        mat.set(p, p, cl_signed);
        let mut b = up * mat.get(p, p);

        if b >= 0.0 {
            // Reflector would not reduce the sub-column; leave the slot
            // zeroed so later updates for this row are no-ops.
            continue;
        }
        b = 1.0 / b;
        reflectors.set(p, up, b);

        // Step 6: apply to the remainder of this panel's own column-block.
        apply_reflector(mat, p, up, b, p + 1, col_end, n);
    }
}

/// Apply already-computed reflectors for pivots `[row_start, row_end)` to a
/// trailing column-block `[col_start, col_end)` belonging to a different
/// panel than the one that produced them.
pub fn panel_update(
    mat: &MatrixView,
    reflectors: &ReflectorStore,
    row_start: usize,
    row_end: usize,
    col_start: usize,
    col_end: usize,
    n: usize,
) {
    let row_start = if row_start == 1 { 0 } else { row_start };
    let col_start = if col_start == 1 { 0 } else { col_start };
    for p in row_start.max(0)..row_end {
        let (up, b) = reflectors.get(p);
        apply_reflector(mat, p, up, b, col_start.max(0), col_end, n);
    }
}

/// Shared per-column dot-product-and-subtract loop (step 6 of
/// `panel_factor` / the body of `panel_update`): apply pivot `p`'s
/// reflector `(up, b)` to every column `j` in `[col_lo, col_hi)`, reading
/// the reflector's tail from column `p`, rows `p+1..n`.
///
/// A `b == 0.0` reflector (the zeroed, never-set slot left by a skipped
/// pivot) is an explicit no-op rather than relying on `sm == 0` to happen to
/// hold for every column.
#[inline]
fn apply_reflector(mat: &MatrixView, p: usize, up: f64, b: f64, col_lo: usize, col_hi: usize, n: usize) {
    if b == 0.0 {
        return;
    }
    for j in col_lo..col_hi {
        let mut sm = mat.get(p, j) * up;
        for i in (p + 1)..n {
            sm += mat.get(i, j) * mat.get(i, p);
        }
        if sm == 0.0 {
            continue;
        }
        sm *= b;
        mat.set(p, j, mat.get(p, j) + sm * up);
        for i in (p + 1)..n {
            mat.set(i, j, mat.get(i, j) + sm * mat.get(i, p));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat_from_rows(rows: &[Vec<f64>]) -> MatrixView {
        let n = rows[0].len();
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        MatrixView::from_vec(data, rows.len(), n)
    }

    fn reconstruct_qr_error(original: &[Vec<f64>], factored: &MatrixView, up: &[f64], b: &[f64]) -> f64 {
        // Rebuild Q (as a product of Householder reflectors, right-applied)
        // and compare Q*R against the original matrix.
        let n = original.len();
        let mut r = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                r[i][j] = factored.get(i, j);
            }
        }
        // Q = H_0 * H_1 * ... ; build by applying each reflector to columns
        // of the identity, in reverse pivot order, matching how they'd be
        // undone to reconstruct Q from R.
        let mut q = vec![vec![0.0; n]; n];
        for i in 0..n {
            q[i][i] = 1.0;
        }
        for p in (0..n).rev() {
            if b[p] == 0.0 {
                continue;
            }
            // v = [up at row p, factored.get(row>p, col p) for the tail]
            let mut v = vec![0.0; n];
            v[p] = up[p];
            for row in (p + 1)..n {
                v[row] = factored.get(row, p);
            }
            for col in 0..n {
                let mut proj = 0.0;
                for row in p..n {
                    proj += v[row] * q[row][col];
                }
                proj *= b[p];
                for row in p..n {
                    q[row][col] += proj * v[row];
                }
            }
        }
        let mut max_err = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let mut qr = 0.0;
                for k in 0..n {
                    qr += q[k][i] * r[k][j];
                }
                max_err = max_err.max((qr - original[i][j]).abs());
            }
        }
        max_err
    }

    #[test]
    fn identity_matrix_is_unchanged_up_to_sign() {
        // Scenario 1 from the design notes.
        let m = mat_from_rows(&[
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ]);
        let reflectors = ReflectorStore::zeros(4);
        panel_factor(&m, &reflectors, 0, 2, 2, 4);
        panel_factor(&m, &reflectors, 2, 4, 4, 4);

        for r in 0..4 {
            for c in 0..4 {
                if r == c {
                    assert_eq!(m.get(r, c).abs(), 1.0);
                } else {
                    assert_eq!(m.get(r, c), 0.0);
                }
            }
        }
        let (up, b) = reflectors.to_vecs();
        assert!(up.iter().all(|&v| v == 0.0));
        assert!(b.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn all_ones_first_pivot_matches_reference_norm() {
        // Scenario 3 from the design notes: M=N=8, all-ones, first pivot.
        let rows: Vec<Vec<f64>> = (0..8).map(|_| vec![1.0; 8]).collect();
        let m = mat_from_rows(&rows);
        let reflectors = ReflectorStore::zeros(8);
        panel_factor(&m, &reflectors, 0, 1, 2, 8);

        assert!((m.get(0, 0).abs() - 8.0f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn degenerate_zero_column_pivot_is_skipped() {
        // Scenario 6: column 3 all zeros below (and at) the diagonal.
        let mut rows: Vec<Vec<f64>> = (0..10)
            .map(|r| (0..10).map(|c| 1.0 / ((r + c + 1) as f64)).collect())
            .collect();
        for row in rows.iter_mut() {
            row[3] = 0.0;
        }
        let m = mat_from_rows(&rows);
        let reflectors = ReflectorStore::zeros(10);
        panel_factor(&m, &reflectors, 2, 4, 4, 10);

        let (up, _b) = reflectors.to_vecs();
        assert_eq!(up[3], 0.0);
    }

    #[test]
    fn panel_update_is_noop_for_zero_reflector() {
        let m = mat_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        let reflectors = ReflectorStore::zeros(2);
        let before = m.to_vec();
        panel_update(&m, &reflectors, 0, 1, 1, 2, 2);
        assert_eq!(m.to_vec(), before);
    }

    #[test]
    fn full_factorization_reconstructs_hilbert_like_matrix() {
        // Scenario 2 from the design notes (single-threaded, ALPHA=BETA=2 so
        // every task is a factor task; exercises the kernels directly).
        let n = 6;
        let rows: Vec<Vec<f64>> =
            (0..n).map(|i| (0..n).map(|j| 1.0 / ((i + j + 1) as f64)).collect()).collect();
        let m = mat_from_rows(&rows);
        let reflectors = ReflectorStore::zeros(n);
        for start in (0..n).step_by(2) {
            let end = (start + 2).min(n);
            panel_factor(&m, &reflectors, start, end, n, n);
        }
        let (up, b) = reflectors.to_vecs();
        let err = reconstruct_qr_error(&rows, &m, &up, &b);
        assert!(err < 1e-8, "reconstruction error too large: {err}");
    }
}
