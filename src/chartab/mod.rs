//! Character tables of little groups: irreducible $`\omega`$-representations of the unitary
//! half and irreducible co-representations of the full magnetic little group.

use std::fmt;

use itertools::Itertools;
use ndarray::{Array1, Array2};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::chartab::chartab_symbols::{CorepSymbol, IrrepSymbol, LinearSpaceSymbol};
use crate::io::format::write_subtitle;

pub mod chartab_group;
pub mod chartab_symbols;
pub mod provided;

type C128 = Complex<f64>;

// ================
// Enum definitions
// ================

/// An enumerated type for the three Wigner--Dimmock cases of an irreducible co-representation
/// induced from a unitary irrep $`D`$.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorepKind {
    /// $`D`$ is equivalent to its antiunitary conjugate with $`N N^* = +\omega\, D(a_0^2)`$.
    A,

    /// $`D`$ is equivalent to its antiunitary conjugate with $`N N^* = -\omega\, D(a_0^2)`$;
    /// the co-representation is $`D \oplus D`$.
    B,

    /// $`D`$ is inequivalent to its antiunitary conjugate $`\bar{D}`$; the co-representation is
    /// $`D \oplus \bar{D}`$.
    C,
}

impl CorepKind {
    /// The discriminant $`+1`$, $`-1`$ or $`0`$.
    pub fn discriminant(&self) -> i8 {
        match self {
            CorepKind::A => 1,
            CorepKind::B => -1,
            CorepKind::C => 0,
        }
    }

    /// The intertwining number $`\frac{1}{|L_u|}\sum_{g \in L_u} |\chi(g)|^2`$ of the
    /// co-representation restricted to the unitary half.
    pub fn intertwining_number(&self) -> usize {
        match self {
            CorepKind::A => 1,
            CorepKind::B => 4,
            CorepKind::C => 2,
        }
    }

    /// Boolean indicating if antiunitary symmetry doubles the dimension relative to the
    /// inducing irrep.
    pub fn is_doubled(&self) -> bool {
        !matches!(self, CorepKind::A)
    }
}

impl fmt::Display for CorepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorepKind::A => write!(f, "(a)"),
            CorepKind::B => write!(f, "(b)"),
            CorepKind::C => write!(f, "(c)"),
        }
    }
}

// ==================
// Struct definitions
// ==================

/// A structure for the character table of the irreducible $`\omega`$-representations of the
/// unitary half $`L_u`$ of a little group. Columns follow the order of
/// [`crate::group::little_group::LittleGroup::unitary_indices`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrrepCharacterTable {
    /// The name of this table.
    pub name: String,

    irreps: Vec<IrrepSymbol>,

    characters: Array2<C128>,

    /// Representatives of the conjugacy classes (as positions in $`L_u`$).
    class_transversal: Vec<usize>,

    /// Labels of the conjugacy classes.
    class_labels: Vec<String>,
}

impl IrrepCharacterTable {
    pub(crate) fn new(
        name: &str,
        irreps: Vec<IrrepSymbol>,
        characters: Array2<C128>,
        class_transversal: Vec<usize>,
        class_labels: Vec<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            irreps,
            characters,
            class_transversal,
            class_labels,
        }
    }

    pub fn irreps(&self) -> &[IrrepSymbol] {
        &self.irreps
    }

    /// The number of inequivalent irreps.
    pub fn irrep_number(&self) -> usize {
        self.irreps.len()
    }

    /// The characters with shape $`r_u \times |L_u|`$.
    pub fn characters(&self) -> &Array2<C128> {
        &self.characters
    }

    /// The order $`|L_u|`$.
    pub fn group_order(&self) -> usize {
        self.characters.ncols()
    }

    pub(crate) fn class_transversal(&self) -> &[usize] {
        &self.class_transversal
    }

    pub(crate) fn class_labels(&self) -> &[String] {
        &self.class_labels
    }
}

impl fmt::Display for IrrepCharacterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, &format!("Unitary irreps: {}", self.name))?;
        write_character_rows(
            f,
            &self.class_labels,
            self.irreps.iter().enumerate().map(|(i, irrep)| {
                (
                    irrep.label().to_string(),
                    irrep.dimensionality(),
                    String::new(),
                    self.class_transversal
                        .iter()
                        .map(|&p| self.characters[(i, p)])
                        .collect_vec(),
                )
            }),
        )
    }
}

/// A structure for one row of a co-representation table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorepRow {
    /// The symbol of the co-representation.
    pub symbol: CorepSymbol,

    /// The Wigner--Dimmock case.
    pub kind: CorepKind,

    /// The indices of the inducing unitary irreps in the unitary table.
    pub inducing_irreps: Vec<usize>,
}

/// A structure for the table of irreducible co-representations of a little group. Columns follow
/// the order of the little-group operations. Characters on the antiunitary coset are zero for
/// doubled rows; for case (a) rows they hold the principal square root of
/// $`\omega(a, a)\chi(a^2)`$, which depends on the phase convention of the co-representation
/// and is kept for display only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorepCharacterTable {
    /// The name of this table.
    pub name: String,

    unitary_table: IrrepCharacterTable,

    rows: Vec<CorepRow>,

    characters: Array2<C128>,

    unitary_columns: Vec<usize>,

    antiunitary_columns: Vec<usize>,
}

impl CorepCharacterTable {
    pub(crate) fn new(
        name: &str,
        unitary_table: IrrepCharacterTable,
        rows: Vec<CorepRow>,
        characters: Array2<C128>,
        unitary_columns: Vec<usize>,
        antiunitary_columns: Vec<usize>,
    ) -> Self {
        Self {
            name: name.to_string(),
            unitary_table,
            rows,
            characters,
            unitary_columns,
            antiunitary_columns,
        }
    }

    pub fn unitary_table(&self) -> &IrrepCharacterTable {
        &self.unitary_table
    }

    pub fn rows(&self) -> &[CorepRow] {
        &self.rows
    }

    /// The number of irreducible co-representations.
    pub fn corep_number(&self) -> usize {
        self.rows.len()
    }

    /// The characters with shape $`r_{\mathrm{co}} \times |L|`$.
    pub fn characters(&self) -> &Array2<C128> {
        &self.characters
    }

    /// The discriminants of all rows.
    pub fn discriminants(&self) -> Vec<i8> {
        self.rows.iter().map(|row| row.kind.discriminant()).collect()
    }

    /// The little-group positions of the unitary operations, in column order of the unitary
    /// table.
    pub fn unitary_columns(&self) -> &[usize] {
        &self.unitary_columns
    }

    pub fn antiunitary_columns(&self) -> &[usize] {
        &self.antiunitary_columns
    }

    /// The characters of a row restricted to $`L_u`$, in unitary-table column order.
    pub fn unitary_characters(&self, row: usize) -> Array1<C128> {
        self.unitary_columns
            .iter()
            .map(|&i| self.characters[(row, i)])
            .collect()
    }

    /// Replaces the symbols of the rows and reorders them. `order[i]` is the current index of the
    /// row that should come at position `i`.
    pub(crate) fn reorder_and_relabel(&mut self, order: &[usize], labels: &[Option<String>]) {
        let rows = order
            .iter()
            .zip(labels.iter())
            .map(|(&i, label)| {
                let mut row = self.rows[i].clone();
                if let Some(label) = label {
                    row.symbol = row.symbol.relabelled(label);
                }
                row
            })
            .collect_vec();
        let characters = Array2::from_shape_fn((order.len(), self.characters.ncols()), |(r, c)| {
            self.characters[(order[r], c)]
        });
        self.rows = rows;
        self.characters = characters;
    }
}

impl fmt::Display for CorepCharacterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unitary_table)?;
        writeln!(f)?;
        write_subtitle(f, &format!("Co-representations: {}", self.name))?;
        let unitary_labels = self.unitary_table.class_labels();
        write_character_rows(
            f,
            unitary_labels,
            self.rows.iter().enumerate().map(|(i, row)| {
                (
                    row.symbol.label().to_string(),
                    row.symbol.dimensionality(),
                    format!("{} {:+}", row.kind, row.kind.discriminant()),
                    self.unitary_table
                        .class_transversal()
                        .iter()
                        .map(|&p| self.characters[(i, self.unitary_columns[p])])
                        .collect_vec(),
                )
            }),
        )?;
        writeln!(f)?;
        writeln!(f, "Unitary irreps inducing each co-representation:")?;
        for row in self.rows.iter() {
            writeln!(
                f,
                "  {} ← {}",
                row.symbol,
                row.symbol.inducing_irreps().iter().join(" ⊕ ")
            )?;
        }
        Ok(())
    }
}

fn write_character_rows<I>(f: &mut fmt::Formatter<'_>, class_labels: &[String], rows: I) -> fmt::Result
where
    I: Iterator<Item = (String, usize, String, Vec<C128>)>,
{
    let rows = rows.collect_vec();
    let label_width = rows
        .iter()
        .map(|(label, _, _, _)| label.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let col_width = 15;
    let header = format!(
        "{:<label_width$} {:>3} {:>6}  {}",
        "Irrep",
        "dim",
        "type",
        class_labels
            .iter()
            .map(|label| format!("{label:>col_width$}"))
            .join(" ")
    );
    let width = header.chars().count();
    writeln!(f, "{}", "┈".repeat(width))?;
    writeln!(f, "{header}")?;
    writeln!(f, "{}", "┈".repeat(width))?;
    for (label, dim, kind, chars) in rows.iter() {
        writeln!(
            f,
            "{label:<label_width$} {dim:>3} {kind:>6}  {}",
            chars
                .iter()
                .map(|c| format!("{:>col_width$}", format_character(c)))
                .join(" ")
        )?;
    }
    writeln!(f, "{}", "┈".repeat(width))?;
    Ok(())
}

fn format_character(c: &C128) -> String {
    let re = if c.re.abs() < 5e-4 { 0.0 } else { c.re };
    let im = if c.im.abs() < 5e-4 { 0.0 } else { c.im };
    if im == 0.0 {
        format!("{re:+.3}")
    } else if re == 0.0 {
        format!("{im:+.3}i")
    } else {
        format!("{re:+.3}{im:+.3}i")
    }
}
