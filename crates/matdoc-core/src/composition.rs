// crates/matdoc-core/src/composition.rs
//
// Element amounts and the formula strings derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::Element;

const AMOUNT_TOLERANCE: f64 = 1e-8;

/// Reduced formulas that are conventionally written as molecular units.
const SPECIAL_FORMULAS: &[(&str, &str)] = &[
    ("LiO", "Li2O2"),
    ("NaO", "Na2O2"),
    ("KO", "K2O2"),
    ("HO", "H2O2"),
    ("CsO", "Cs2O2"),
    ("RbO", "Rb2O2"),
    ("O", "O2"),
    ("N", "N2"),
    ("F", "F2"),
    ("Cl", "Cl2"),
    ("H", "H2"),
];

/// Mapping of element to (possibly fractional) amount, ordered by atomic number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition(BTreeMap<Element, f64>);

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one unit per occurrence of each species.
    pub fn from_species(species: impl IntoIterator<Item = Element>) -> Self {
        let mut comp = Self::new();
        for el in species {
            comp.add(el, 1.0);
        }
        comp
    }

    pub fn add(&mut self, element: Element, amount: f64) {
        *self.0.entry(element).or_insert(0.0) += amount;
    }

    pub fn amount(&self, element: Element) -> f64 {
        self.0.get(&element).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elements in atomic-number order.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.0.iter().map(|(el, amt)| (*el, *amt))
    }

    pub fn num_atoms(&self) -> f64 {
        self.0.values().sum()
    }

    /// Total mass in atomic mass units.
    pub fn weight(&self) -> f64 {
        self.iter().map(|(el, amt)| el.atomic_mass() * amt).sum()
    }

    /// Divide every amount by the greatest common divisor when all amounts
    /// are integral. Fractional compositions are returned unchanged.
    pub fn reduced(&self) -> Composition {
        let factor = self.reduction_factor();
        Composition(self.0.iter().map(|(el, amt)| (*el, amt / factor)).collect())
    }

    fn reduction_factor(&self) -> f64 {
        let mut divisor = 0u64;
        for amt in self.0.values() {
            if !is_integral(*amt) || *amt < 0.5 {
                return 1.0;
            }
            divisor = gcd(divisor, amt.round() as u64);
        }
        if divisor == 0 {
            1.0
        } else {
            divisor as f64
        }
    }

    /// Formula with elements in electronegativity order, using the amounts as given.
    pub fn formula(&self) -> String {
        let mut elements: Vec<Element> = self.elements().collect();
        elements.sort_by(Element::formula_order);
        elements
            .iter()
            .map(|el| format!("{}{}", el, format_amount(self.amount(*el))))
            .collect()
    }

    /// Reduced formula, e.g. `Fe2O3` or `Si`; diatomic elements and
    /// peroxides keep their molecular form (`O2`, `Li2O2`).
    pub fn reduced_formula(&self) -> String {
        let formula = self.reduced().formula();
        SPECIAL_FORMULAS
            .iter()
            .find(|(reduced, _)| *reduced == formula)
            .map(|(_, special)| special.to_string())
            .unwrap_or(formula)
    }

    /// Prototype formula with anonymized species, e.g. `A2B3` for Fe2O3.
    pub fn anonymous_formula(&self) -> String {
        let reduced = self.reduced();
        let mut amounts: Vec<f64> = reduced.0.values().copied().collect();
        amounts.sort_by(f64::total_cmp);
        amounts
            .iter()
            .enumerate()
            .map(|(i, amt)| format!("{}{}", anonymous_label(i), format_amount(*amt)))
            .collect()
    }

    /// Alphabetically sorted element symbols joined by `-`, e.g. `Fe-O`.
    pub fn chemical_system(&self) -> String {
        let mut symbols: Vec<&str> = self.elements().map(|el| el.symbol()).collect();
        symbols.sort_unstable();
        symbols.join("-")
    }
}

impl FromIterator<(Element, f64)> for Composition {
    fn from_iter<T: IntoIterator<Item = (Element, f64)>>(iter: T) -> Self {
        let mut comp = Composition::new();
        for (el, amt) in iter {
            comp.add(el, amt);
        }
        comp
    }
}

fn is_integral(x: f64) -> bool {
    (x - x.round()).abs() < AMOUNT_TOLERANCE
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Amount suffix in a formula: omitted for 1, integer text when integral,
/// otherwise at most eight decimals with trailing zeros trimmed.
fn format_amount(amt: f64) -> String {
    if is_integral(amt) {
        let n = amt.round() as i64;
        if n == 1 {
            String::new()
        } else {
            n.to_string()
        }
    } else {
        let text = format!("{:.8}", amt);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A, B, ..., Z, then AA, AB, ...
fn anonymous_label(index: usize) -> String {
    let letters = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if index < letters.len() {
        (letters[index] as char).to_string()
    } else {
        format!(
            "{}{}",
            anonymous_label(index / letters.len() - 1),
            letters[index % letters.len()] as char
        )
    }
}
