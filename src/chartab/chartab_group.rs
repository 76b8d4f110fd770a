//! Construction of irrep and co-representation character tables for little groups.

use itertools::Itertools;
use log;
use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::IrrepError;
use crate::chartab::chartab_symbols::{CorepSymbol, IrrepSymbol};
use crate::chartab::{CorepCharacterTable, CorepKind, CorepRow, IrrepCharacterTable};
use crate::group::class::ClassStructure;
use crate::group::little_group::{FactorSystem, LittleGroup, TwistedCayleyTable};

#[cfg(test)]
#[path = "chartab_construction_tests.rs"]
mod chartab_construction_tests;

type C128 = Complex<f64>;

/// The number of random centralised matrices tried before giving up.
const MAX_ATTEMPTS: u64 = 8;

/// The seed of the first attempt. Later attempts use consecutive seeds.
const BASE_SEED: u64 = 0x5eed_1ab5;

/// Relative gap below which two eigenvalues of the centralised matrix are considered equal.
const CLUSTER_THRESHOLD: f64 = 1e-7;

// =================
// Trait definitions
// =================

/// A trait for constructing character tables.
pub trait CharacterProperties {
    /// Constructs the table of irreducible $`\omega`$-representations of the unitary half.
    ///
    /// # Arguments
    ///
    /// * `factor_system` - The factor system of the representations.
    /// * `thresh` - The threshold on orthogonality and completeness residuals.
    fn construct_irrep_character_table(
        &self,
        factor_system: &FactorSystem,
        thresh: f64,
    ) -> Result<IrrepCharacterTable, IrrepError>;

    /// Constructs the table of irreducible co-representations from a unitary table.
    fn construct_corep_character_table(
        &self,
        factor_system: &FactorSystem,
        unitary_table: IrrepCharacterTable,
        thresh: f64,
    ) -> Result<CorepCharacterTable, IrrepError>;
}

// =====================
// Trait implementations
// =====================

impl CharacterProperties for LittleGroup {
    /// Computes the irreducible $`\omega`$-characters of $`L_u`$ numerically.
    ///
    /// The $`\omega`$-twisted left regular representation $`\mathcal{L}(g)e_h = \omega(g, h)
    /// e_{gh}`$ contains every irreducible $`\omega`$-representation $`D^{(\alpha)}`$ exactly
    /// $`d_\alpha`$ times. A random Hermitian matrix averaged over $`\mathcal{L}`$ commutes with
    /// $`\mathcal{L}`$ and acts on each isotypic component as $`I_{d_\alpha} \otimes X_\alpha`$
    /// with generic $`X_\alpha`$, so each of its eigenspaces carries exactly one copy of one
    /// irrep, whose character is read off as $`\mathrm{Tr}(V^\dagger \mathcal{L}(g) V)`$.
    fn construct_irrep_character_table(
        &self,
        factor_system: &FactorSystem,
        thresh: f64,
    ) -> Result<IrrepCharacterTable, IrrepError> {
        log::debug!("==============================================");
        log::debug!("Construction of irrep character table begins.");
        log::debug!("   *** Twisted regular representation ***    ");
        log::debug!("==============================================");
        let table = self.unitary_twisted_table(factor_system);
        let classes = ClassStructure::new(&table, thresh);
        let mut failure = String::new();
        for attempt in 0..MAX_ATTEMPTS {
            match twisted_regular_characters(&table, &classes, thresh, BASE_SEED + attempt) {
                Ok(chars) => {
                    log::debug!(
                        "Found {} irreps of dimensions [{}] on attempt {}.",
                        chars.len(),
                        chars.iter().map(|(d, _)| d).join(", "),
                        attempt + 1
                    );
                    let n = table.order();
                    let irreps = chars
                        .iter()
                        .enumerate()
                        .map(|(i, (d, _))| IrrepSymbol::generic(i, *d))
                        .collect_vec();
                    let characters =
                        Array2::from_shape_fn((chars.len(), n), |(i, g)| chars[i].1[g]);
                    log::debug!("============================================");
                    log::debug!("Construction of irrep character table ends.");
                    log::debug!("============================================");
                    return Ok(IrrepCharacterTable::new(
                        &format!("L_u of {}", self.kpoint().label(self.threshold())),
                        irreps,
                        characters,
                        classes.transversal(),
                        (0..classes.class_number())
                            .map(|c| classes.class_label(c))
                            .collect(),
                    ));
                }
                Err(msg) => {
                    log::debug!("Attempt {} failed: {msg}", attempt + 1);
                    failure = msg;
                }
            }
        }
        Err(IrrepError::numerical_unsoundness(format!(
            "no consistent irrep character table after {MAX_ATTEMPTS} attempts: {failure}"
        )))
    }

    /// Applies the Wigner--Dimmock analysis to each unitary irrep.
    fn construct_corep_character_table(
        &self,
        factor_system: &FactorSystem,
        unitary_table: IrrepCharacterTable,
        thresh: f64,
    ) -> Result<CorepCharacterTable, IrrepError> {
        log::debug!("================================================");
        log::debug!("Construction of ircorep character table begins.");
        log::debug!("================================================");
        let lu = self.unitary_indices();
        let la = self.antiunitary_indices();
        let nu = lu.len();
        let n = self.order();
        let chars_u = unitary_table.characters();
        let irreps = unitary_table.irreps().to_vec();
        let name = format!("L of {}", self.kpoint().label(self.threshold()));

        if la.is_empty() {
            log::debug!("No antiunitary operations: co-representations are the unitary irreps.");
            let rows = irreps
                .iter()
                .enumerate()
                .map(|(i, irrep)| CorepRow {
                    symbol: CorepSymbol::from_inducing_irreps(&[irrep.clone()]),
                    kind: CorepKind::A,
                    inducing_irreps: vec![i],
                })
                .collect_vec();
            let characters = chars_u.clone();
            return Ok(CorepCharacterTable::new(
                &name,
                unitary_table,
                rows,
                characters,
                lu.to_vec(),
                vec![],
            ));
        }

        let mut position = vec![usize::MAX; n];
        lu.iter().enumerate().for_each(|(p, &i)| position[i] = p);
        let mtab = self.multiplication_table();
        let a0 = la[0];
        let a0_inv = mtab.inverse(a0);
        log::debug!("Antiunitary coset representative: operation {}.", a0 + 1);

        // g' = a0⁻¹ g a0 and c(g) with D(g) D(a0) = c(g) D(a0) D(g')*.
        let conjugation = lu
            .iter()
            .map(|&g| {
                let ga0 = mtab.product(g, a0).index;
                let g_dash = mtab.product(a0_inv, ga0).index;
                let c = factor_system.omega(g, a0) / factor_system.omega(a0, g_dash);
                (position[g_dash], c)
            })
            .collect_vec();
        let squares = la
            .iter()
            .map(|&b| (factor_system.omega(b, b), position[mtab.product(b, b).index]))
            .collect_vec();

        let mut consumed = vec![false; irreps.len()];
        let mut rows = vec![];
        for (alpha, irrep) in irreps.iter().enumerate() {
            if consumed[alpha] {
                continue;
            }
            consumed[alpha] = true;
            log::debug!("Considering irrep {irrep} of the unitary subgroup...");
            let conj_chars = conjugation
                .iter()
                .map(|(p_dash, c)| c * chars_u[(alpha, *p_dash)].conj())
                .collect_vec();
            let indicator = squares
                .iter()
                .map(|(w, p)| w * chars_u[(alpha, *p)])
                .sum::<C128>()
                / (nu as f64);
            log::debug!("  Dimmock--Wheeler indicator for {irrep}: {indicator:+.6}");

            let self_conjugate = (0..nu).all(|p| (conj_chars[p] - chars_u[(alpha, p)]).norm() <= thresh);
            if self_conjugate {
                let kind = if (indicator - C128::new(1.0, 0.0)).norm() <= thresh {
                    log::debug!(
                        "  Ircorep induced by {irrep} is of type (a) with intertwining number 1."
                    );
                    CorepKind::A
                } else if (indicator + C128::new(1.0, 0.0)).norm() <= thresh {
                    log::debug!(
                        "  Ircorep induced by {irrep} is of type (b) with intertwining number 4."
                    );
                    CorepKind::B
                } else {
                    return Err(IrrepError::numerical_unsoundness(format!(
                        "irrep {irrep} is self-conjugate but its indicator {indicator:.6} is not ±1"
                    )));
                };
                let inducing = if kind == CorepKind::A {
                    vec![alpha]
                } else {
                    vec![alpha, alpha]
                };
                rows.push(CorepRow {
                    symbol: CorepSymbol::from_inducing_irreps(
                        &inducing.iter().map(|&i| irreps[i].clone()).collect_vec(),
                    ),
                    kind,
                    inducing_irreps: inducing,
                });
            } else {
                let partner = (0..irreps.len())
                    .filter(|&beta| !consumed[beta])
                    .find(|&beta| {
                        (0..nu).all(|p| (conj_chars[p] - chars_u[(beta, p)]).norm() <= thresh)
                    })
                    .ok_or_else(|| {
                        IrrepError::numerical_unsoundness(format!(
                            "the antiunitary conjugate of irrep {irrep} matches no other irrep"
                        ))
                    })?;
                if indicator.norm() > thresh {
                    return Err(IrrepError::numerical_unsoundness(format!(
                        "irrep {irrep} pairs with {} but its indicator {indicator:.6} is not 0",
                        irreps[partner]
                    )));
                }
                consumed[partner] = true;
                log::debug!("  The Wigner-conjugate irrep of {irrep} is {}.", irreps[partner]);
                log::debug!(
                    "  Ircorep induced by {irrep} and {} is of type (c) with intertwining number 2.",
                    irreps[partner]
                );
                rows.push(CorepRow {
                    symbol: CorepSymbol::from_inducing_irreps(&[
                        irrep.clone(),
                        irreps[partner].clone(),
                    ]),
                    kind: CorepKind::C,
                    inducing_irreps: vec![alpha, partner],
                });
            }
        }

        let characters = Array2::from_shape_fn((rows.len(), n), |(r, i)| {
            let row = &rows[r];
            if position[i] != usize::MAX {
                row.inducing_irreps
                    .iter()
                    .map(|&alpha| chars_u[(alpha, position[i])])
                    .sum()
            } else if row.kind == CorepKind::A {
                let alpha = row.inducing_irreps[0];
                let square = mtab.product(i, i).index;
                (factor_system.omega(i, i) * chars_u[(alpha, position[square])]).sqrt()
            } else {
                C128::new(0.0, 0.0)
            }
        });
        log::debug!("==============================================");
        log::debug!("Construction of ircorep character table ends.");
        log::debug!("==============================================");

        Ok(CorepCharacterTable::new(
            &name,
            unitary_table,
            rows,
            characters,
            lu.to_vec(),
            la.to_vec(),
        ))
    }
}

// =========
// Functions
// =========

/// Extracts the distinct irreducible characters from the eigenspaces of one randomly centralised
/// Hermitian matrix.
///
/// # Returns
///
/// The pairs $`(d_\alpha, \chi_\alpha)`$ sorted deterministically, or a message describing why
/// this attempt has to be repeated with another seed.
fn twisted_regular_characters(
    table: &TwistedCayleyTable,
    classes: &ClassStructure,
    thresh: f64,
    seed: u64,
) -> Result<Vec<(usize, Vec<C128>)>, String> {
    let n = table.order();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = DMatrix::<C128>::zeros(n, n);
    for i in 0..n {
        m[(i, i)] = C128::new(rng.gen_range(-1.0..1.0), 0.0);
        for j in (i + 1)..n {
            let z = C128::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            m[(i, j)] = z;
            m[(j, i)] = z.conj();
        }
    }

    // H = (1/n) Σ_x L(x) M L(x)†, with L(x) monomial.
    let mut h = DMatrix::<C128>::zeros(n, n);
    for x in 0..n {
        for i in 0..n {
            let pi = table.product(x, i);
            let phi_i = table.omega(x, i);
            for j in 0..n {
                let pj = table.product(x, j);
                h[(pi, pj)] += phi_i * m[(i, j)] * table.omega(x, j).conj();
            }
        }
    }
    h /= C128::new(n as f64, 0.0);

    let eig = h.symmetric_eigen();
    let order = (0..n)
        .sorted_by_key(|&i| OrderedFloat(eig.eigenvalues[i]))
        .collect_vec();
    let scale = 1.0 + eig.eigenvalues.amax();
    let mut clusters: Vec<Vec<usize>> = vec![];
    for &i in order.iter() {
        match clusters.last_mut() {
            Some(cluster)
                if (eig.eigenvalues[i] - eig.eigenvalues[cluster[cluster.len() - 1]]).abs()
                    <= CLUSTER_THRESHOLD * scale =>
            {
                cluster.push(i)
            }
            _ => clusters.push(vec![i]),
        }
    }
    log::debug!("Centralised matrix has {} distinct eigenvalues.", clusters.len());

    let v = &eig.eigenvectors;
    let mut irreps: Vec<(usize, Vec<C128>, usize)> = vec![];
    for cluster in clusters.iter() {
        let chars = (0..n)
            .map(|g| {
                cluster
                    .iter()
                    .map(|&c| {
                        (0..n)
                            .map(|hh| v[(table.product(g, hh), c)].conj() * table.omega(g, hh) * v[(hh, c)])
                            .sum::<C128>()
                    })
                    .sum::<C128>()
            })
            .map(snap)
            .collect_vec();
        let norm = chars.iter().map(|z| z.norm_sqr()).sum::<f64>() / n as f64;
        if (norm - 1.0).abs() > thresh {
            return Err(format!(
                "an eigenspace of dimension {} carries a reducible representation (norm {norm:.6})",
                cluster.len()
            ));
        }
        match irreps.iter_mut().find(|(_, existing, _)| {
            existing
                .iter()
                .zip(chars.iter())
                .all(|(a, b)| (a - b).norm() <= thresh)
        }) {
            Some((_, _, copies)) => *copies += 1,
            None => irreps.push((cluster.len(), chars, 1)),
        }
    }

    if let Some((d, _, copies)) = irreps.iter().find(|(d, _, copies)| d != copies) {
        return Err(format!(
            "an irrep of dimension {d} was found {copies} times in the regular representation"
        ));
    }
    let dim_sum = irreps.iter().map(|(d, _, _)| d * d).sum::<usize>();
    if dim_sum != n {
        return Err(format!("the squared dimensions add up to {dim_sum}, not {n}"));
    }
    if irreps.len() != classes.regular_class_number() {
        return Err(format!(
            "found {} irreps but {} regular classes",
            irreps.len(),
            classes.regular_class_number()
        ));
    }
    for (a, (_, chars_a, _)) in irreps.iter().enumerate() {
        for (b, (_, chars_b, _)) in irreps.iter().enumerate() {
            let overlap = chars_a
                .iter()
                .zip(chars_b.iter())
                .map(|(x, y)| x.conj() * y)
                .sum::<C128>()
                / (n as f64);
            let expected = if a == b { 1.0 } else { 0.0 };
            if (overlap - C128::new(expected, 0.0)).norm() > thresh {
                return Err(format!(
                    "characters of irreps {a} and {b} have overlap {overlap:.6}"
                ));
            }
        }
    }

    Ok(irreps
        .into_iter()
        .map(|(d, chars, _)| (d, chars))
        .sorted_by_key(|(d, chars)| {
            (
                *d,
                chars
                    .iter()
                    .map(|z| (OrderedFloat(-round6(z.re)), OrderedFloat(-round6(z.im))))
                    .collect_vec(),
            )
        })
        .collect())
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6 + 0.0
}

fn snap(z: C128) -> C128 {
    let re = if z.re.abs() < 1e-10 { 0.0 } else { z.re };
    let im = if z.im.abs() < 1e-10 { 0.0 } else { z.im };
    C128::new(re, im)
}
