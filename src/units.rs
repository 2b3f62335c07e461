#![allow(missing_docs)]

//! This module defines the unit types used by the model and the arithmetic allowed between them.
//!
//! Only dimensionally valid operations are implemented, so mixing e.g. £/kg with £/litre is a
//! compile error. Conversions between scales (MWh to kWh, MW to kW) are explicit.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};

/// Represents a dimensionless quantity (fractions, rates, ratios).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Neg,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 / rhs.0)
    }
}

impl Dimensionless {
    pub fn new(val: f64) -> Self {
        Self(val)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

impl ApproxEq for Dimensionless {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Neg,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN.
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 / rhs.0)
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Year);
unit_struct!(Kilowatts);

// Derived quantities
unit_struct!(MoneyPerYear);
unit_struct!(MoneyPerKg);
unit_struct!(MoneyPerKw);
unit_struct!(MoneyPerMWh);
unit_struct!(MoneyPerLitre);
unit_struct!(MoneyPerTonne);
unit_struct!(KilogramsPerYear);
unit_struct!(LitresPerYear);
unit_struct!(TonnesPerYear);
unit_struct!(KilowattHoursPerKg);

// Division rules
impl_div!(Money, Year, MoneyPerYear);
impl_div!(Money, MoneyPerYear, Year);
impl_div!(MoneyPerYear, KilogramsPerYear, MoneyPerKg);
impl_div!(MoneyPerYear, LitresPerYear, MoneyPerLitre);

// Multiplication rules
impl_mul!(MoneyPerYear, Year, Money);
impl_mul!(MoneyPerKw, Kilowatts, Money);
impl_mul!(MoneyPerKg, KilogramsPerYear, MoneyPerYear);
impl_mul!(MoneyPerLitre, LitresPerYear, MoneyPerYear);
impl_mul!(MoneyPerTonne, TonnesPerYear, MoneyPerYear);

/// Electricity cost per kg of hydrogen. Prices are quoted per MWh, consumption per kWh.
impl std::ops::Mul<MoneyPerMWh> for KilowattHoursPerKg {
    type Output = MoneyPerKg;
    fn mul(self, rhs: MoneyPerMWh) -> MoneyPerKg {
        MoneyPerKg(self.0 * rhs.0 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_electricity_cost_per_kg() {
        let cost = KilowattHoursPerKg(55.0) * MoneyPerMWh(57.0);
        assert_approx_eq!(MoneyPerKg, cost, MoneyPerKg(3.135), epsilon = 1e-12);
    }

    #[test]
    fn test_ratio_of_like_units() {
        assert_eq!(Money(50.0) / Money(20.0), Dimensionless(2.5));
    }

    #[test]
    fn test_payback_units() {
        assert_eq!(Money(100.0) / MoneyPerYear(25.0), Year(4.0));
    }

    #[test]
    fn test_deserialise_transparent() {
        #[derive(Deserialize)]
        struct Row {
            price: MoneyPerLitre,
        }

        let row: Row = toml::from_str("price = 1.4").unwrap();
        assert_eq!(row.price, MoneyPerLitre(1.4));
    }
}
