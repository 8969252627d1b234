// Copyright (C) 2023-2024 StorSwift Inc.
// This file is part of the Randbeacon library.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at:
// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Secret-sharing polynomials and Lagrange interpolation in G1/G2.

use super::{try_random_scalar, G1Projective, G2Projective, Scalar};
use rand::RngCore;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PolyError {
    #[error("empty evaluation point set")]
    Empty,
    #[error("duplicate evaluation point at positions {0} and {1}")]
    DuplicateAbscissa(usize, usize),
    #[error("evaluation point at position {0} is zero")]
    ZeroAbscissa(usize),
    #[error("{points} points against {abscissas} evaluation points")]
    LengthMismatch { points: usize, abscissas: usize },
}

/// Polynomial over `Fq`, coefficients in ascending degree order.
#[derive(Clone)]
pub struct Poly {
    coeffs: Vec<Scalar>,
}

impl Poly {
    /// Fresh polynomial of the given degree with the chosen constant term;
    /// all other coefficients are sampled uniformly.
    pub fn random<R: RngCore>(
        degree: u32,
        const_term: Scalar,
        rng: &mut R,
    ) -> Result<Self, rand::Error> {
        let mut coeffs = Vec::with_capacity(degree as usize + 1);
        coeffs.push(const_term);
        for _ in 0..degree {
            coeffs.push(try_random_scalar(rng)?);
        }
        Ok(Self { coeffs })
    }

    /// Horner evaluation at `x`.
    pub fn eval(&self, x: &Scalar) -> Scalar {
        self.coeffs
            .iter()
            .rev()
            .fold(Scalar::zero(), |acc, c| acc * x + c)
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }
}

/// Lagrange coefficients for interpolating at zero over the given abscissas:
/// `λ_i = Π_{j≠i} (-x_j) / (x_i - x_j)`.
///
/// The caller selects the subset; every supplied abscissa is used. Duplicate
/// or zero abscissas are rejected, they would make a divisor vanish.
pub fn lagrange_coeffs(xs: &[Scalar]) -> Result<Vec<Scalar>, PolyError> {
    if xs.is_empty() {
        return Err(PolyError::Empty);
    }
    for (i, x) in xs.iter().enumerate() {
        if *x == Scalar::zero() {
            return Err(PolyError::ZeroAbscissa(i));
        }
        if let Some(j) = xs[..i].iter().position(|y| y == x) {
            return Err(PolyError::DuplicateAbscissa(j, i));
        }
    }

    let mut coeffs = Vec::with_capacity(xs.len());
    for (i, xi) in xs.iter().enumerate() {
        let mut num = Scalar::one();
        let mut den = Scalar::one();
        for (j, xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            num *= -xj;
            den *= xi - xj;
        }
        // Invertible: abscissas are pairwise distinct.
        let den_inv = den.invert().unwrap();
        coeffs.push(num * den_inv);
    }
    Ok(coeffs)
}

/// Interpolates `Σ λ_i · points[i]` in G1 at zero.
pub fn lagrange_g1(points: &[G1Projective], xs: &[Scalar]) -> Result<G1Projective, PolyError> {
    if points.len() != xs.len() {
        return Err(PolyError::LengthMismatch {
            points: points.len(),
            abscissas: xs.len(),
        });
    }
    let coeffs = lagrange_coeffs(xs)?;
    Ok(points.iter().zip(coeffs.iter()).map(|(p, c)| p * c).sum())
}

/// Interpolates `Σ λ_i · points[i]` in G2 at zero.
pub fn lagrange_g2(points: &[G2Projective], xs: &[Scalar]) -> Result<G2Projective, PolyError> {
    if points.len() != xs.len() {
        return Err(PolyError::LengthMismatch {
            points: points.len(),
            abscissas: xs.len(),
        });
    }
    let coeffs = lagrange_coeffs(xs)?;
    Ok(points.iter().zip(coeffs.iter()).map(|(p, c)| p * c).sum())
}
