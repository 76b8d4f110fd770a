//! Conjugacy classes of unitary groups under a factor system.

use itertools::Itertools;
use log;
use num_complex::Complex;

use crate::group::little_group::TwistedCayleyTable;

#[cfg(test)]
#[path = "class_tests.rs"]
mod class_tests;

type C128 = Complex<f64>;

/// A structure for the conjugacy-class structure of a unitary group whose projective
/// representations carry a factor system $`\omega`$.
///
/// A class is $`\omega`$-regular if every element $`h`$ commuting with a class member $`g`$ also
/// satisfies $`\hat{O}_h\hat{O}_g\hat{O}_h^{-1} = \hat{O}_g`$. Characters of irreducible
/// $`\omega`$-representations vanish on classes that are not regular, and there are exactly as
/// many inequivalent irreducible $`\omega`$-representations as there are regular classes.
#[derive(Clone, Debug)]
pub struct ClassStructure {
    /// The conjugacy classes, each a sorted list of element positions. Classes are ordered by
    /// their smallest member, so the identity class comes first.
    conjugacy_classes: Vec<Vec<usize>>,

    /// The class index of each element.
    element_to_conjugacy_classes: Vec<usize>,

    /// For each element $`x`$ in the class of representative $`r`$, the phase $`\psi_x`$ with
    /// $`\chi(x) = \psi_x \chi(r)`$ for every $`\omega`$-character $`\chi`$.
    representative_phases: Vec<C128>,

    /// Whether each class is $`\omega`$-regular.
    regular: Vec<bool>,

    /// The index of the class containing the inverses of each class.
    inverse_conjugacy_classes: Vec<usize>,
}

impl ClassStructure {
    /// Computes the class structure of the group described by `table`.
    ///
    /// # Arguments
    ///
    /// * `table` - The twisted multiplication table of the group.
    /// * `thresh` - The threshold for deciding if a conjugation phase equals one.
    pub fn new(table: &TwistedCayleyTable, thresh: f64) -> Self {
        let n = table.order();
        let mut element_to_conjugacy_classes = vec![usize::MAX; n];
        let mut representative_phases = vec![C128::new(1.0, 0.0); n];
        let mut conjugacy_classes: Vec<Vec<usize>> = vec![];
        let mut regular = vec![];
        for g in 0..n {
            if element_to_conjugacy_classes[g] != usize::MAX {
                continue;
            }
            let class_index = conjugacy_classes.len();
            let mut is_regular = true;
            let mut members = vec![];
            for h in 0..n {
                let (x, phase) = table.conjugate(h, g);
                if x == g && (phase - C128::new(1.0, 0.0)).norm() > thresh {
                    is_regular = false;
                }
                if element_to_conjugacy_classes[x] == usize::MAX {
                    element_to_conjugacy_classes[x] = class_index;
                    representative_phases[x] = phase.inv();
                    members.push(x);
                }
            }
            members.sort_unstable();
            conjugacy_classes.push(members);
            regular.push(is_regular);
        }

        let inverse_conjugacy_classes = conjugacy_classes
            .iter()
            .map(|class| element_to_conjugacy_classes[table.inverse(class[0])])
            .collect_vec();
        log::debug!(
            "Found {} conjugacy classes, {} of which are regular under the factor system.",
            conjugacy_classes.len(),
            regular.iter().filter(|r| **r).count()
        );

        Self {
            conjugacy_classes,
            element_to_conjugacy_classes,
            representative_phases,
            regular,
            inverse_conjugacy_classes,
        }
    }

    pub fn class_number(&self) -> usize {
        self.conjugacy_classes.len()
    }

    /// The number of $`\omega`$-regular classes, which equals the number of inequivalent
    /// irreducible $`\omega`$-representations.
    pub fn regular_class_number(&self) -> usize {
        self.regular.iter().filter(|r| **r).count()
    }

    pub fn conjugacy_classes(&self) -> &[Vec<usize>] {
        &self.conjugacy_classes
    }

    pub fn class_of(&self, element: usize) -> usize {
        self.element_to_conjugacy_classes[element]
    }

    /// The representative (smallest member) of each class.
    pub fn transversal(&self) -> Vec<usize> {
        self.conjugacy_classes.iter().map(|class| class[0]).collect()
    }

    pub fn representative_phase(&self, element: usize) -> C128 {
        self.representative_phases[element]
    }

    pub fn is_regular(&self, class_index: usize) -> bool {
        self.regular[class_index]
    }

    pub fn inverse_class(&self, class_index: usize) -> usize {
        self.inverse_conjugacy_classes[class_index]
    }

    /// A short label for a class, showing its size and its position.
    pub fn class_label(&self, class_index: usize) -> String {
        format!(
            "{}|K{}|",
            self.conjugacy_classes[class_index].len(),
            class_index + 1
        )
    }
}
