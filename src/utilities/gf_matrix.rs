//! Small dense linear algebra over the prime field GF(N).

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{KlptError, Result};
use crate::utilities::arithmetic::inverse_mod;

/// Put `m` in reduced row echelon form modulo the prime `n` in place and
/// return the pivot columns.
pub fn row_reduce(m: &mut [Vec<BigInt>], n: &BigInt) -> Result<Vec<usize>> {
    let n_rows = m.len();
    let n_cols = m.first().map_or(0, |row| row.len());
    for row in m.iter_mut() {
        for x in row.iter_mut() {
            *x = x.mod_floor(n);
        }
    }

    let mut pivots = Vec::new();
    let mut pivot_row = 0;
    for col in 0..n_cols {
        if pivot_row == n_rows {
            break;
        }
        let Some(found) = (pivot_row..n_rows).find(|&r| !m[r][col].is_zero()) else {
            continue;
        };
        m.swap(pivot_row, found);

        let inv = inverse_mod(&m[pivot_row][col], n).ok_or_else(|| KlptError::InvalidInput {
            reason: format!("{} is not invertible modulo {n}", m[pivot_row][col]),
        })?;
        for x in m[pivot_row].iter_mut() {
            *x = (&*x * &inv).mod_floor(n);
        }

        for r in 0..n_rows {
            if r == pivot_row || m[r][col].is_zero() {
                continue;
            }
            let factor = m[r][col].clone();
            for c in 0..n_cols {
                let delta = &factor * &m[pivot_row][c];
                m[r][c] = (&m[r][c] - delta).mod_floor(n);
            }
        }

        pivots.push(col);
        pivot_row += 1;
    }

    Ok(pivots)
}

/// Return a basis of the left null space {v : v * A = 0} of the r x c matrix
/// A (given by rows) over GF(n).
pub fn left_kernel(rows: &[Vec<BigInt>], n: &BigInt) -> Result<Vec<Vec<BigInt>>> {
    let n_rows = rows.len();
    if n_rows == 0 {
        return Ok(Vec::new());
    }
    let n_cols = rows[0].len();
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(KlptError::InvalidInput {
            reason: "matrix rows have different lengths".to_string(),
        });
    }

    // v * A = 0 is A^T * v^T = 0
    let mut transposed: Vec<Vec<BigInt>> = (0..n_cols)
        .map(|c| rows.iter().map(|row| row[c].clone()).collect())
        .collect();
    let pivots = row_reduce(&mut transposed, n)?;

    let mut kernel = Vec::new();
    for free in (0..n_rows).filter(|c| !pivots.contains(c)) {
        let mut v = vec![BigInt::zero(); n_rows];
        v[free] = BigInt::one();
        for (r, &pivot_col) in pivots.iter().enumerate() {
            v[pivot_col] = (-&transposed[r][free]).mod_floor(n);
        }
        kernel.push(v);
    }

    Ok(kernel)
}

/// Vector-matrix product v * A over GF(n).
pub fn vector_matrix_product(v: &[BigInt], rows: &[Vec<BigInt>], n: &BigInt) -> Vec<BigInt> {
    let n_cols = rows.first().map_or(0, |row| row.len());
    (0..n_cols)
        .map(|c| {
            v.iter()
                .zip(rows.iter())
                .fold(BigInt::zero(), |acc, (vi, row)| acc + vi * &row[c])
                .mod_floor(n)
        })
        .collect()
}
