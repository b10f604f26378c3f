//! Rank-4 lattices of quaternions: canonical bases through the Hermite
//! normal form, coordinates, membership and LLL reduction for the
//! reduced-norm form.

use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::algebra::{Quaternion, QuaternionAlgebra};

/// Row-style Hermite normal form of an integer matrix.
///
/// The returned rows span the same Z-module as the input. They are in echelon
/// form with positive pivots, every entry above a pivot is reduced into
/// [0, pivot), and zero rows are dropped. Two generating sets of the same
/// lattice give the same output.
pub fn hermite_normal_form(mut rows: Vec<Vec<BigInt>>) -> Vec<Vec<BigInt>> {
    let n_cols = rows.first().map_or(0, |r| r.len());
    let mut pivot_row = 0;

    for col in 0..n_cols {
        if pivot_row == rows.len() {
            break;
        }

        // Euclid on the column until a single nonzero entry remains.
        loop {
            let smallest = (pivot_row..rows.len())
                .filter(|&r| !rows[r][col].is_zero())
                .min_by(|&r, &s| rows[r][col].abs().cmp(&rows[s][col].abs()));
            let Some(smallest) = smallest else {
                break;
            };
            rows.swap(pivot_row, smallest);

            let mut done = true;
            for r in (pivot_row + 1)..rows.len() {
                if rows[r][col].is_zero() {
                    continue;
                }
                let q = rows[r][col].div_floor(&rows[pivot_row][col]);
                for c in col..n_cols {
                    let delta = &q * &rows[pivot_row][c];
                    rows[r][c] -= delta;
                }
                if !rows[r][col].is_zero() {
                    done = false;
                }
            }
            if done {
                break;
            }
        }

        if rows[pivot_row][col].is_zero() {
            continue;
        }
        if rows[pivot_row][col].is_negative() {
            for x in rows[pivot_row].iter_mut() {
                *x = -&*x;
            }
        }

        for r in 0..pivot_row {
            let q = rows[r][col].div_floor(&rows[pivot_row][col]);
            if q.is_zero() {
                continue;
            }
            for c in col..n_cols {
                let delta = &q * &rows[pivot_row][c];
                rows[r][c] -= delta;
            }
        }

        pivot_row += 1;
    }

    rows.truncate(pivot_row);
    rows
}

/// The canonical basis of the Z-module spanned by `gens`.
///
/// The rational coefficient matrix is scaled to an integer one by the lcm of
/// all denominators, put in Hermite normal form and scaled back. The result is
/// empty or has as many elements as the rank of the module.
pub fn canonical_basis(algebra: &Arc<QuaternionAlgebra>, gens: &[Quaternion]) -> Vec<Quaternion> {
    let den = gens
        .iter()
        .fold(BigInt::one(), |acc, g| acc.lcm(&g.denominator()));
    let den_q = BigRational::from_integer(den.clone());

    let rows: Vec<Vec<BigInt>> = gens
        .iter()
        .map(|g| {
            g.coeffs()
                .iter()
                .map(|c| (c * &den_q).to_integer())
                .collect()
        })
        .collect();

    hermite_normal_form(rows)
        .into_iter()
        .map(|row| {
            let coeffs = [0, 1, 2, 3].map(|i| BigRational::new(row[i].clone(), den.clone()));
            Quaternion::new(algebra, coeffs)
        })
        .collect()
}

/// Coordinates of x in a basis of four linearly independent quaternions, by
/// exact Gaussian elimination. Returns `None` for a degenerate basis.
pub fn coordinates(basis: &[Quaternion], x: &Quaternion) -> Option<[BigRational; 4]> {
    if basis.len() != 4 {
        return None;
    }

    // Augmented system: column j of the matrix is basis[j].
    let mut m: Vec<Vec<BigRational>> = (0..4)
        .map(|r| {
            let mut row: Vec<BigRational> = basis.iter().map(|b| b.coeffs()[r].clone()).collect();
            row.push(x.coeffs()[r].clone());
            row
        })
        .collect();

    for col in 0..4 {
        let pivot = (col..4).find(|&r| !m[r][col].is_zero())?;
        m.swap(col, pivot);
        let inv = m[col][col].recip();
        for c in col..5 {
            m[col][c] *= &inv;
        }
        for r in 0..4 {
            if r == col || m[r][col].is_zero() {
                continue;
            }
            let factor = m[r][col].clone();
            for c in col..5 {
                let delta = &factor * &m[col][c];
                m[r][c] -= delta;
            }
        }
    }

    Some([0, 1, 2, 3].map(|r| m[r][4].clone()))
}

/// Whether x lies in the Z-span of the four elements of `basis`.
pub fn lattice_contains(basis: &[Quaternion], x: &Quaternion) -> bool {
    coordinates(basis, x).is_some_and(|c| c.iter().all(|ci| ci.is_integer()))
}

/// Whether the lattice spanned by `inner` is contained in the one spanned by
/// `outer`.
pub fn lattice_contains_all(outer: &[Quaternion], inner: &[Quaternion]) -> bool {
    inner.iter().all(|x| lattice_contains(outer, x))
}

/// Integer combination sum(c_i * b_i).
pub fn combination(basis: &[Quaternion], coeffs: &[BigInt]) -> Option<Quaternion> {
    let mut terms = basis.iter().zip(coeffs.iter());
    let (b0, c0) = terms.next()?;
    let mut acc = b0.scale_int(c0);
    for (b, c) in terms {
        acc += &b.scale_int(c);
    }
    Some(acc)
}

/// The bilinear form of the reduced norm, with <x, x> = N(x).
fn inner_product(x: &Quaternion, y: &Quaternion) -> BigRational {
    x.norm_pairing(y) / BigRational::from_integer(BigInt::from(2))
}

/// Gram-Schmidt orthogonalisation for the reduced-norm form. Returns the
/// squared lengths of the orthogonal vectors and the mu coefficients.
fn gram_schmidt(basis: &[Quaternion]) -> (Vec<BigRational>, Vec<Vec<BigRational>>) {
    let n = basis.len();
    let mut ortho: Vec<Quaternion> = Vec::with_capacity(n);
    let mut lengths: Vec<BigRational> = Vec::with_capacity(n);
    let mut mu = vec![vec![BigRational::zero(); n]; n];

    for i in 0..n {
        let mut v = basis[i].clone();
        for j in 0..i {
            if lengths[j].is_zero() {
                continue;
            }
            mu[i][j] = inner_product(&basis[i], &ortho[j]) / &lengths[j];
            v -= &ortho[j].scale(&mu[i][j]);
        }
        lengths.push(inner_product(&v, &v));
        ortho.push(v);
    }

    (lengths, mu)
}

/// LLL reduction (delta = 3/4) of a basis with respect to the reduced norm.
///
/// The reduced-norm form must be positive definite, which is the case for a
/// definite algebra such as (-1, -p). For an indefinite form the basis is
/// returned unchanged.
pub fn lll_reduce(basis: &[Quaternion]) -> Vec<Quaternion> {
    let mut b = basis.to_vec();
    let n = b.len();
    if n < 2 {
        return b;
    }

    let delta = BigRational::new(BigInt::from(3), BigInt::from(4));
    let (lengths, _) = gram_schmidt(&b);
    if lengths.iter().any(|l| !l.is_positive()) {
        return b;
    }

    let mut k = 1;
    while k < n {
        // Size reduction of b_k against b_{k-1}, ..., b_0.
        for j in (0..k).rev() {
            let (_, mu) = gram_schmidt(&b);
            let c = mu[k][j].round();
            if !c.is_zero() {
                let shift = b[j].scale(&c);
                b[k] -= &shift;
            }
        }

        let (lengths, mu) = gram_schmidt(&b);
        let bound = (&delta - &mu[k][k - 1] * &mu[k][k - 1]) * &lengths[k - 1];
        if lengths[k] >= bound {
            k += 1;
        } else {
            b.swap(k, k - 1);
            k = usize::max(k - 1, 1);
        }
    }

    b
}

/// Heuristic short-basis check: no vector is longer (in reduced norm) than
/// the sum of all the others.
pub fn is_minkowski_basis(basis: &[Quaternion]) -> bool {
    (0..basis.len()).all(|i| {
        let others: Vec<Quaternion> = basis
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, b)| b.clone())
            .collect();
        match others.split_first() {
            None => true,
            Some((first, rest)) => {
                let sum = rest.iter().fold(first.clone(), |acc, x| &acc + x);
                basis[i].reduced_norm() <= sum.reduced_norm()
            }
        }
    })
}
