use nalgebra::{Matrix2, Matrix3, Vector3};
use num_complex::Complex;

use crate::group::little_group::LittleGroup;
use crate::group::SpaceSpinGroup;
use crate::symmetry::kpoint::KPoint;
use crate::symmetry::space_spin_operation::{lift_so3_to_su2, SpaceSpinOperation};

type C128 = Complex<f64>;

/// Builds an operation whose spin rotation is the proper part of its Cartesian rotation, as in
/// an ordinary space group with spin-orbit coupling.
pub(crate) fn spin_orbit_operation(
    rotation: Matrix3<i32>,
    lattice: &Matrix3<f64>,
    translation: Vector3<f64>,
) -> SpaceSpinOperation {
    let lattice_inv = lattice
        .try_inverse()
        .expect("Lattice matrix is not invertible.");
    let cart = lattice * rotation.map(f64::from) * lattice_inv;
    let so3 = cart * cart.determinant().signum();
    SpaceSpinOperation::builder()
        .rotation(rotation)
        .translation(translation)
        .so3(so3)
        .su2(lift_so3_to_su2(&so3))
        .build()
        .expect("Unable to construct a spin-orbit operation.")
}

pub(crate) fn hexagonal_lattice() -> Matrix3<f64> {
    Matrix3::new(
        1.0,
        -0.5,
        0.0,
        0.0,
        3.0f64.sqrt() / 2.0,
        0.0,
        0.0,
        0.0,
        1.6,
    )
}

/// Pm-3m with point group Oh.
pub(crate) fn oh_group() -> SpaceSpinGroup {
    let cubic = Matrix3::identity();
    let generators = [
        spin_orbit_operation(
            Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1),
            &cubic,
            Vector3::zeros(),
        ),
        spin_orbit_operation(
            Matrix3::new(0, 0, 1, 1, 0, 0, 0, 1, 0),
            &cubic,
            Vector3::zeros(),
        ),
        spin_orbit_operation(-Matrix3::identity(), &cubic, Vector3::zeros()),
    ];
    SpaceSpinGroup::generate("Pm-3m", &generators, 1e-6).expect("Unable to generate Pm-3m.")
}

/// P6/mmm with point group D6h.
pub(crate) fn d6h_group() -> SpaceSpinGroup {
    let hex = hexagonal_lattice();
    let generators = [
        spin_orbit_operation(
            Matrix3::new(1, -1, 0, 1, 0, 0, 0, 0, 1),
            &hex,
            Vector3::zeros(),
        ),
        spin_orbit_operation(
            Matrix3::new(1, -1, 0, 0, -1, 0, 0, 0, -1),
            &hex,
            Vector3::zeros(),
        ),
        spin_orbit_operation(-Matrix3::identity(), &hex, Vector3::zeros()),
    ];
    SpaceSpinGroup::generate("P6/mmm", &generators, 1e-6).expect("Unable to generate P6/mmm.")
}

/// P2₁ with the screw axis along b.
pub(crate) fn p21_group() -> SpaceSpinGroup {
    let generators = [spin_orbit_operation(
        Matrix3::new(-1, 0, 0, 0, 1, 0, 0, 0, -1),
        &Matrix3::identity(),
        Vector3::new(0.0, 0.5, 0.0),
    )];
    SpaceSpinGroup::generate("P2_1", &generators, 1e-6).expect("Unable to generate P2_1.")
}

pub(crate) fn trivial_group() -> SpaceSpinGroup {
    SpaceSpinGroup::new("P1", vec![SpaceSpinOperation::identity()], 1e-6)
        .expect("Unable to construct P1.")
}

/// The grey group {E, θ} with θ² = -1 as the little group of `kpoint`.
pub(crate) fn time_reversal_little_group(kpoint: &KPoint) -> LittleGroup {
    let theta = SpaceSpinOperation::builder()
        .rotation(Matrix3::identity())
        .su2(Matrix2::new(
            C128::new(0.0, 0.0),
            C128::new(1.0, 0.0),
            C128::new(-1.0, 0.0),
            C128::new(0.0, 0.0),
        ))
        .antiunitary(true)
        .build()
        .expect("Unable to construct time reversal.");
    LittleGroup::from_operations(
        vec![SpaceSpinOperation::identity(), theta],
        1,
        kpoint,
        1e-6,
    )
    .expect("Unable to construct the grey little group.")
}

/// P-1 with time reversal for spinors.
pub(crate) fn grey_p_1_group() -> SpaceSpinGroup {
    SpaceSpinGroup::generate(
        "P-1",
        &[spin_orbit_operation(
            -Matrix3::identity(),
            &Matrix3::identity(),
            Vector3::zeros(),
        )],
        1e-6,
    )
    .and_then(|group| group.with_time_reversal(true))
    .expect("Unable to generate P-11'.")
}
