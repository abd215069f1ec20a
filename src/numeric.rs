//! Numeric element types accepted by the statistics engines
//!
//! Every algorithm in the crate is written once against [`Sample`]. Arithmetic
//! that needs a common scale (sums, means, rank positions) happens in `f64`;
//! order statistics stay in the native element type and use the total order
//! of [`Sample::sample_cmp`].

use num_traits::AsPrimitive;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// A homogeneous numeric sample element
///
/// Implemented for `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`,
/// `f32` and `f64`.
pub trait Sample:
    Copy + PartialOrd + Send + Sync + Debug + Display + AsPrimitive<f64> + 'static
{
    /// Value emitted for a pixel with no usable samples
    const NO_DATA: Self;

    /// Narrowing conversion with `as` semantics: integers truncate toward zero
    /// and saturate at their bounds, NaN becomes 0.
    fn from_f64(value: f64) -> Self;

    /// Widen to `f64`
    #[inline]
    fn to_f64(self) -> f64 {
        self.as_()
    }

    /// `false` for NaN and infinite floats; always `true` for integers
    fn is_finite_sample(self) -> bool;

    /// Total order: `Ord::cmp` for integers, `total_cmp` for floats (NaN above
    /// `+inf`, negative NaN below `-inf`)
    fn sample_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const NO_DATA: Self = 0;

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value.as_()
                }

                #[inline]
                fn is_finite_sample(self) -> bool {
                    true
                }

                #[inline]
                fn sample_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const NO_DATA: Self = <$t>::NAN;

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value.as_()
                }

                #[inline]
                fn is_finite_sample(self) -> bool {
                    self.is_finite()
                }

                #[inline]
                fn sample_cmp(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }
            }
        )*
    };
}

impl_integer_sample!(i8, u8, i16, u16, i32, u32, i64, u64);
impl_float_sample!(f32, f64);

/// Name of the element type, for log events
pub fn type_name<T: Sample>() -> &'static str {
    std::any::type_name::<T>()
}
