use nalgebra::Vector3;
use ndarray::{array, Array1};
use num_complex::Complex;

use crate::symmetry::kpoint::KPoint;
use crate::target::bloch::{BlochStates, PlaneWaveBasis};

type C128 = Complex<f64>;

fn c(re: f64) -> C128 {
    C128::new(re, 0.0)
}

/// Three p-like scalar states at Γ built from the six shortest cubic G-vectors, transforming as
/// $`T_{1u}`$ of $`O_h`$.
pub(crate) fn t1u_states() -> BlochStates {
    let basis = PlaneWaveBasis::new(vec![
        Vector3::new(1, 0, 0),
        Vector3::new(-1, 0, 0),
        Vector3::new(0, 1, 0),
        Vector3::new(0, -1, 0),
        Vector3::new(0, 0, 1),
        Vector3::new(0, 0, -1),
    ])
    .expect("Unable to construct the cubic plane-wave basis.");
    let s = 0.5f64.sqrt();
    let z = c(0.0);
    let coefficients = array![
        [c(s), c(-s), z, z, z, z],
        [z, z, c(s), c(-s), z, z],
        [z, z, z, z, c(s), c(-s)],
    ];
    BlochStates::scalar(
        KPoint::new(0.0, 0.0, 0.0),
        basis,
        Array1::from_elem(3, 1.0),
        coefficients,
    )
    .expect("Unable to construct T1u states.")
}

/// A Kramers pair at Γ: $`e^{2\pi i x}\lvert\uparrow\rangle`$ and its time-reversal partner
/// $`-e^{-2\pi i x}\lvert\downarrow\rangle`$.
pub(crate) fn kramers_pair_states() -> BlochStates {
    let basis = PlaneWaveBasis::new(vec![Vector3::new(1, 0, 0), Vector3::new(-1, 0, 0)])
        .expect("Unable to construct the plane-wave basis.");
    let z = c(0.0);
    let coefficients = array![[c(1.0), z], [z, z], [z, z], [z, c(-1.0)]];
    BlochStates::from_spin_blocks(
        KPoint::new(0.0, 0.0, 0.0),
        basis,
        array![0.5, 0.5],
        &coefficients,
    )
    .expect("Unable to construct a Kramers pair.")
}
