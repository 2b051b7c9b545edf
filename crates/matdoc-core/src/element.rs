// crates/matdoc-core/src/element.rs
//
// Periodic table: the chemical species a site can carry.
//
// Each element knows its symbol, standard atomic mass (amu), and Pauling
// electronegativity. Formula ordering and density derivation depend on these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(pub String);

macro_rules! periodic_table {
    ($($sym:ident = $z:literal, $mass:expr, $x:expr;)*) => {
        /// A chemical element, ordered by atomic number.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Element {
            $($sym = $z,)*
        }

        impl Element {
            /// Every element in atomic-number order.
            pub const ALL: &'static [Element] = &[$(Element::$sym,)*];

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(Element::$sym => stringify!($sym),)*
                }
            }

            /// Standard atomic mass in atomic mass units.
            pub fn atomic_mass(&self) -> f64 {
                match self {
                    $(Element::$sym => $mass,)*
                }
            }

            /// Pauling electronegativity, if one is tabulated.
            pub fn electronegativity(&self) -> Option<f64> {
                match self {
                    $(Element::$sym => $x,)*
                }
            }
        }

        impl FromStr for Element {
            type Err = ParseElementError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $(stringify!($sym) => Ok(Element::$sym),)*
                    _ => Err(ParseElementError(s.to_string())),
                }
            }
        }
    };
}

periodic_table! {
    H  =   1, 1.008, Some(2.20);
    He =   2, 4.0026, None;
    Li =   3, 6.94, Some(0.98);
    Be =   4, 9.0122, Some(1.57);
    B  =   5, 10.81, Some(2.04);
    C  =   6, 12.011, Some(2.55);
    N  =   7, 14.007, Some(3.04);
    O  =   8, 15.999, Some(3.44);
    F  =   9, 18.998, Some(3.98);
    Ne =  10, 20.18, None;
    Na =  11, 22.99, Some(0.93);
    Mg =  12, 24.305, Some(1.31);
    Al =  13, 26.982, Some(1.61);
    Si =  14, 28.085, Some(1.90);
    P  =  15, 30.974, Some(2.19);
    S  =  16, 32.06, Some(2.58);
    Cl =  17, 35.45, Some(3.16);
    Ar =  18, 39.948, None;
    K  =  19, 39.098, Some(0.82);
    Ca =  20, 40.078, Some(1.00);
    Sc =  21, 44.956, Some(1.36);
    Ti =  22, 47.867, Some(1.54);
    V  =  23, 50.942, Some(1.63);
    Cr =  24, 51.996, Some(1.66);
    Mn =  25, 54.938, Some(1.55);
    Fe =  26, 55.845, Some(1.83);
    Co =  27, 58.933, Some(1.88);
    Ni =  28, 58.693, Some(1.91);
    Cu =  29, 63.546, Some(1.90);
    Zn =  30, 65.38, Some(1.65);
    Ga =  31, 69.723, Some(1.81);
    Ge =  32, 72.63, Some(2.01);
    As =  33, 74.922, Some(2.18);
    Se =  34, 78.971, Some(2.55);
    Br =  35, 79.904, Some(2.96);
    Kr =  36, 83.798, Some(3.00);
    Rb =  37, 85.468, Some(0.82);
    Sr =  38, 87.62, Some(0.95);
    Y  =  39, 88.906, Some(1.22);
    Zr =  40, 91.224, Some(1.33);
    Nb =  41, 92.906, Some(1.6);
    Mo =  42, 95.96, Some(2.16);
    Tc =  43, 98.0, Some(1.9);
    Ru =  44, 101.07, Some(2.2);
    Rh =  45, 102.91, Some(2.28);
    Pd =  46, 106.42, Some(2.20);
    Ag =  47, 107.87, Some(1.93);
    Cd =  48, 112.41, Some(1.69);
    In =  49, 114.82, Some(1.78);
    Sn =  50, 118.71, Some(1.96);
    Sb =  51, 121.76, Some(2.05);
    Te =  52, 127.6, Some(2.1);
    I  =  53, 126.9, Some(2.66);
    Xe =  54, 131.29, Some(2.6);
    Cs =  55, 132.91, Some(0.79);
    Ba =  56, 137.33, Some(0.89);
    La =  57, 138.91, Some(1.10);
    Ce =  58, 140.12, Some(1.12);
    Pr =  59, 140.91, Some(1.13);
    Nd =  60, 144.24, Some(1.14);
    Pm =  61, 145.0, Some(1.13);
    Sm =  62, 150.36, Some(1.17);
    Eu =  63, 151.96, Some(1.2);
    Gd =  64, 157.25, Some(1.2);
    Tb =  65, 158.93, Some(1.1);
    Dy =  66, 162.5, Some(1.22);
    Ho =  67, 164.93, Some(1.23);
    Er =  68, 167.26, Some(1.24);
    Tm =  69, 168.93, Some(1.25);
    Yb =  70, 173.05, Some(1.1);
    Lu =  71, 174.97, Some(1.27);
    Hf =  72, 178.49, Some(1.3);
    Ta =  73, 180.95, Some(1.5);
    W  =  74, 183.84, Some(2.36);
    Re =  75, 186.21, Some(1.9);
    Os =  76, 190.23, Some(2.2);
    Ir =  77, 192.22, Some(2.20);
    Pt =  78, 195.08, Some(2.28);
    Au =  79, 196.97, Some(2.54);
    Hg =  80, 200.59, Some(2.00);
    Tl =  81, 204.38, Some(1.62);
    Pb =  82, 207.2, Some(2.33);
    Bi =  83, 208.98, Some(2.02);
    Po =  84, 209.0, Some(2.0);
    At =  85, 210.0, Some(2.2);
    Rn =  86, 222.0, Some(2.2);
    Fr =  87, 223.0, Some(0.7);
    Ra =  88, 226.0, Some(0.9);
    Ac =  89, 227.0, Some(1.1);
    Th =  90, 232.04, Some(1.3);
    Pa =  91, 231.04, Some(1.5);
    U  =  92, 238.03, Some(1.38);
    Np =  93, 237.0, Some(1.36);
    Pu =  94, 244.0, Some(1.28);
    Am =  95, 243.0, Some(1.13);
    Cm =  96, 247.0, Some(1.28);
    Bk =  97, 247.0, Some(1.3);
    Cf =  98, 251.0, Some(1.3);
    Es =  99, 252.0, Some(1.3);
    Fm = 100, 257.0, Some(1.3);
    Md = 101, 258.0, Some(1.3);
    No = 102, 259.0, Some(1.3);
    Lr = 103, 262.0, Some(1.3);
    Rf = 104, 267.0, None;
    Db = 105, 270.0, None;
    Sg = 106, 271.0, None;
    Bh = 107, 270.0, None;
    Hs = 108, 277.0, None;
    Mt = 109, 276.0, None;
    Ds = 110, 281.0, None;
    Rg = 111, 280.0, None;
    Cn = 112, 285.0, None;
    Nh = 113, 284.0, None;
    Fl = 114, 289.0, None;
    Mc = 115, 288.0, None;
    Lv = 116, 293.0, None;
    Ts = 117, 294.0, None;
    Og = 118, 294.0, None;
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Sort key used for formula ordering: electronegativity first, then symbol.
    ///
    /// Elements without a tabulated value sort after every element that has one.
    pub(crate) fn formula_order(a: &Element, b: &Element) -> std::cmp::Ordering {
        let xa = a.electronegativity().unwrap_or(f64::INFINITY);
        let xb = b.electronegativity().unwrap_or(f64::INFINITY);
        xa.total_cmp(&xb).then_with(|| a.symbol().cmp(b.symbol()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}
