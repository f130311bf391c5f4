// Integer generation functions.
// This module contains the primitive decoders that turn raw bits into
// bounded integers, and the integer generators built on them.
//
// Biased decoding works in two steps: first a bit width `w` in
// `[0, bitlen(max)]` is drawn uniformly, then `w` raw bits. Zeroed bits give
// a zero width and so the value zero, and every shorter width only reaches
// smaller values, so rewriting bits towards zero shrinks the result.

use crate::data::{bitmask, discard_unless, Draw, DrawError, Source};
use crate::distributions::weighted;
use crate::generator::{ConfigError, Generator};

use std::fmt;
use std::marker::PhantomData;

/// Attempts allowed for a rejection-sampled integer before the trial fails.
/// Each attempt succeeds with probability at least one half.
pub const BOUNDED_TRIES: usize = 64;

const BOUNDED_LABEL: &str = "bounded";
const BIASED_UINT_LABEL: &str = "biaseduint";
const FAILED_TO_GEN_BOUNDED: &str = "failed to generate bounded integer";

/// Number of significant bits in `value`.
pub fn bit_len(value: u64) -> u32 {
    64 - value.leading_zeros()
}

/// Uniform integer in `[0, max]`.
pub fn bounded_int(source: &mut dyn Source, max: u64) -> Draw<u64> {
    let bitlength = bit_len(max);
    if bitlength == 0 {
        return Ok(0);
    }
    if max == bitmask(bitlength) {
        return source.draw_bits(bitlength);
    }
    for _ in 0..BOUNDED_TRIES {
        let (probe, ok) = discard_unless(
            source,
            BOUNDED_LABEL,
            |s| s.draw_bits(bitlength),
            |&probe| probe <= max,
        )?;
        if ok {
            return Ok(probe);
        }
    }
    Err(DrawError::exhausted(FAILED_TO_GEN_BOUNDED, BOUNDED_TRIES))
}

/// Integer in `[0, max]`, shrinking towards zero when `biased`.
pub fn gen_uint_n(source: &mut dyn Source, max: u64, biased: bool) -> Draw<u64> {
    gen_uint_n_width(source, max, biased).map(|(value, _)| value)
}

/// Like [`gen_uint_n`], also returning how many significant bits were drawn
/// for the value.
pub fn gen_uint_n_width(source: &mut dyn Source, max: u64, biased: bool) -> Draw<(u64, u32)> {
    if max == 0 {
        return Ok((0, 0));
    }
    let bitlength = bit_len(max);
    if !biased {
        return Ok((bounded_int(source, max)?, bitlength));
    }

    for _ in 0..BOUNDED_TRIES {
        let (drawn, ok) = discard_unless(
            source,
            BIASED_UINT_LABEL,
            |s| {
                let width = bounded_int(s, u64::from(bitlength))? as u32;
                Ok((s.draw_bits(width)?, width))
            },
            |&(value, _)| value <= max,
        )?;
        if ok {
            return Ok(drawn);
        }
    }
    Err(DrawError::exhausted(FAILED_TO_GEN_BOUNDED, BOUNDED_TRIES))
}

/// Integer in `[min, max]`, shrinking towards `min` when `biased`.
pub fn gen_uint_range(source: &mut dyn Source, min: u64, max: u64, biased: bool) -> Draw<u64> {
    if min > max {
        ConfigError::InvertedRange {
            min: min.to_string(),
            max: max.to_string(),
        }
        .fail();
    }
    Ok(min + gen_uint_n(source, max - min, biased)?)
}

/// Signed integer in `[min, max]`, shrinking towards the in-range value
/// closest to zero when `biased`.
///
/// `min < max` is required; anything else is a caller bug and panics.
pub fn gen_int_range(source: &mut dyn Source, min: i64, max: i64, biased: bool) -> Draw<i64> {
    if min >= max {
        ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
        .fail();
    }

    let neg_limit = min.unsigned_abs();
    let (pos_min, neg_min, p_neg) = if min >= 0 {
        (min as u64, 0, 0.0)
    } else if max <= 0 {
        (0, max.unsigned_abs(), 1.0)
    } else {
        let pos = max as f64 + 1.0;
        let neg = neg_limit as f64;
        let p_neg = if biased { 0.5 } else { neg / (pos + neg) };
        (0, 1, p_neg)
    };

    if weighted(source, p_neg)? {
        let magnitude = gen_uint_range(source, neg_min, neg_limit, biased)?;
        Ok((-(magnitude as i128)) as i64)
    } else {
        Ok(gen_uint_range(source, pos_min, max as u64, biased)? as i64)
    }
}

/// Primitive integer types that integer generators can produce.
pub trait Integer: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;
    const NAME: &'static str;

    fn to_i128(self) -> i128;
    fn from_i128(value: i128) -> Self;
}

macro_rules! integer_impl {
    ($($t:ident),*) => {
        $(
            impl Integer for $t {
                const MIN: Self = $t::MIN;
                const MAX: Self = $t::MAX;
                const NAME: &'static str = stringify!($t);

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Self {
                    value as $t
                }
            }
        )*
    };
}

integer_impl!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Integers of type `T` in `[min, max]`, biased towards the in-range value
/// closest to zero.
#[derive(Debug, Clone, Copy)]
pub struct IntGen<T> {
    min: T,
    max: T,
    full_range: bool,
    _marker: PhantomData<fn() -> T>,
}

/// Any value of the integer type `T`.
pub fn ints<T: Integer>() -> IntGen<T> {
    IntGen {
        min: T::MIN,
        max: T::MAX,
        full_range: true,
        _marker: PhantomData,
    }
}

/// Integers in `[min, max]`. Panics unless `min < max`.
pub fn int_range<T: Integer>(min: T, max: T) -> IntGen<T> {
    try_int_range(min, max).unwrap_or_else(|err| err.fail())
}

pub fn try_int_range<T: Integer>(min: T, max: T) -> Result<IntGen<T>, ConfigError> {
    if min >= max {
        return Err(ConfigError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(IntGen {
        min,
        max,
        full_range: false,
        _marker: PhantomData,
    })
}

impl<T: Integer> Generator for IntGen<T> {
    type Value = T;

    fn value(&self, source: &mut dyn Source) -> Draw<T> {
        let (min, max) = (self.min.to_i128(), self.max.to_i128());
        let value = if min >= 0 {
            i128::from(gen_uint_range(source, min as u64, max as u64, true)?)
        } else {
            i128::from(gen_int_range(source, min as i64, max as i64, true)?)
        };
        Ok(T::from_i128(value))
    }

    fn describe(&self) -> String {
        if self.full_range {
            format!("ints::<{}>()", T::NAME)
        } else {
            format!("int_range({}, {})", self.min, self.max)
        }
    }
}
