use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const GHS_CURRENCY_CODE: &str = "GHS";

//--------------------------------------       Cedis       -----------------------------------------------------------
/// An amount of Ghanaian cedi, stored as a whole number of pesewas (GHS × 100).
///
/// Pesewas are the smallest currency unit and the unit the payment gateway charges in, so all arithmetic is
/// exact integer arithmetic. Use [`Cedis::from_ghs`] at the system boundary to convert decimal GHS amounts.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cedis(i64);

op!(binary Cedis, Add, add);
op!(binary Cedis, Sub, sub);
op!(inplace Cedis, AddAssign, add_assign);

impl Mul<i64> for Cedis {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Cedis {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in pesewas: {0}")]
pub struct CedisConversionError(String);

impl From<i64> for Cedis {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Cedis {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Cedis {}

impl TryFrom<u64> for Cedis {
    type Error = CedisConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(CedisConversionError(format!("Value {} is too large to convert to Cedis", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Cedis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ghs = self.0 as f64 / 100.0;
        write!(f, "GH₵{ghs:0.2}")
    }
}

impl Cedis {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_pesewas(pesewas: i64) -> Self {
        Self(pesewas)
    }

    /// Converts a decimal GHS amount to pesewas, rounding to the nearest pesewa.
    /// Negative and non-finite amounts are rejected.
    pub fn from_ghs(ghs: f64) -> Result<Self, CedisConversionError> {
        if !ghs.is_finite() {
            return Err(CedisConversionError(format!("{ghs} is not a finite amount")));
        }
        if ghs < 0.0 {
            return Err(CedisConversionError(format!("{ghs} is negative")));
        }
        let pesewas = (ghs * 100.0).round();
        if pesewas > i64::MAX as f64 {
            return Err(CedisConversionError(format!("{ghs} is too large to convert to Cedis")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(pesewas as i64))
    }

    pub fn to_ghs(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}
