//! Weight types for the weighted traversal strategies.

use core::fmt::Debug;
use core::ops::{Add, Sub};

/// A measure of path length that the weighted strategies can sum up and
/// compare.
///
/// A weight has a designated `zero` (the distance of a start vertex from
/// itself) and a designated `infinity` (larger than every distance that can
/// occur in a traversal). Gears use these as defaults and may replace
/// `infinity` by a smaller guard value, e.g. for fixed-width integers
/// (see [`WeightedGear::infinity`](crate::gear::WeightedGear::infinity)).
/// Any computed distance that reaches the gear's infinity is treated as an
/// overflow.
pub trait Weight:
    Debug + Clone + PartialOrd + Add<Self, Output = Self> + Sub<Self, Output = Self>
{
    /// The additive neutral element.
    fn zero() -> Self;

    /// A value larger than every regular distance.
    fn infinity() -> Self;
}

macro_rules! impl_weight_float(
    ( $( $t:ident ),* ) => {
        $(
            impl Weight for $t {
                fn zero() -> Self {
                    0.0
                }

                fn infinity() -> Self {
                    $t::INFINITY
                }
            }
        )*
    }
);

impl_weight_float!(f32, f64);

macro_rules! impl_weight_integer(
    ( $( $t:ident ),* ) => {
        $(
            impl Weight for $t {
                fn zero() -> Self {
                    0
                }

                fn infinity() -> Self {
                    $t::MAX
                }
            }
        )*
    }
);

impl_weight_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
