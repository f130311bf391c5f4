// IEEE 754 floating point generation.
// A float is drawn as separate exponent and significand fields, each in its
// own group, so that a shrinker can simplify them independently. Zeroed
// bits decode to 1.0; exponents near zero and short fractional parts are what
// simpler bit patterns produce. Zero, subnormals and the extremes come from a
// separate special-value draw.

use crate::data::{bitmask, discard_unless, in_group, Draw, DrawError, Source};
use crate::distributions::{satisfy, weighted};
use crate::generator::{ConfigError, Generator};
use crate::ints::{bounded_int, gen_int_range, gen_uint_n, gen_uint_n_width};

use std::fmt;
use std::marker::PhantomData;

pub const FLOAT_EXP_LABEL: &str = "floatexp";
pub const FLOAT_SIGNIF_LABEL: &str = "floatsignif";
pub const FLOAT_SPECIAL_LABEL: &str = "floatspecial";

/// Attempts the float generator makes to satisfy its inf/NaN policy.
pub const FLOAT_GEN_TRIES: usize = 100;
/// Attempts at a significand that lands inside the requested range.
pub const SIGNIFICAND_TRIES: usize = 1000;

const FAILED_TO_GEN_FLOAT: &str = "failed to generate suitable floating-point number";
const FAILED_TO_GEN_SIGNIFICAND: &str = "failed to generate significand within range";

// Chance of drawing a special value (zero, boundary magnitudes and any allowed
// infinity or NaN) outright.
const SPECIAL_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Width32,
    Width64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::Width32 => 32,
            FloatWidth::Width64 => 64,
        }
    }

    pub fn exponent_bits(self) -> u32 {
        match self {
            FloatWidth::Width32 => 8,
            FloatWidth::Width64 => 11,
        }
    }

    pub fn mantissa_bits(self) -> u32 {
        match self {
            FloatWidth::Width32 => 23,
            FloatWidth::Width64 => 52,
        }
    }

    pub fn bias(self) -> i32 {
        match self {
            FloatWidth::Width32 => 127,
            FloatWidth::Width64 => 1023,
        }
    }

    pub fn max_exponent(self) -> u32 {
        (1 << self.exponent_bits()) - 1
    }

    /// Largest finite value of the width.
    pub fn max_value(self) -> f64 {
        match self {
            FloatWidth::Width32 => f64::from(f32::MAX),
            FloatWidth::Width64 => f64::MAX,
        }
    }
}

/// Raw bit pattern of `value` in the given width.
pub fn float_to_int(value: f64, width: FloatWidth) -> u64 {
    match width {
        FloatWidth::Width32 => u64::from((value as f32).to_bits()),
        FloatWidth::Width64 => value.to_bits(),
    }
}

/// Reinterpret a bit pattern of the given width as a float.
pub fn int_to_float(value: u64, width: FloatWidth) -> f64 {
    match width {
        FloatWidth::Width32 => f64::from(f32::from_bits(value as u32)),
        FloatWidth::Width64 => f64::from_bits(value),
    }
}

/// Unbiased exponent of a non-negative `value`. Zero and subnormals report
/// `-bias`.
pub fn ufloat_exp(value: f64, width: FloatWidth) -> i32 {
    let raw = float_to_int(value, width) >> width.mantissa_bits();
    (raw & u64::from(width.max_exponent())) as i32 - width.bias()
}

/// Non-negative float in `[min, max]` with the significand width of `width`.
///
/// The exponent is drawn first, biased towards the admissible exponent
/// closest to zero (magnitudes near 1). The significand is then split into an
/// integer part (drawn uniformly) and a fractional part (drawn biased, placed
/// at the top of the fractional field), and redrawn until the assembled value
/// lies in range.
///
/// `0 <= min < max` is required; anything else is a caller bug and panics.
pub fn gen_ufloat_range(source: &mut dyn Source, min: f64, max: f64, width: FloatWidth) -> Draw<f64> {
    if !(min >= 0.0 && min < max) {
        ConfigError::InvalidFloatRange {
            min: min.to_string(),
            max: max.to_string(),
        }
        .fail();
    }
    let signif_bits = width.mantissa_bits();

    let min_exp = ufloat_exp(min, width);
    let max_exp = ufloat_exp(max, width);
    let e = in_group(source, FLOAT_EXP_LABEL, false, |s| {
        if min_exp == max_exp {
            return Ok(min_exp);
        }
        let e = gen_int_range(s, i64::from(min_exp), i64::from(max_exp), true)?;
        Ok(e as i32)
    })?;

    let frac_bits = if e <= 0 {
        signif_bits
    } else if (e as u32) < signif_bits {
        signif_bits - e as u32
    } else {
        0
    };
    let exp_field = ((e + width.bias()) as u64) << signif_bits;

    for attempt in 1..=SIGNIFICAND_TRIES {
        let (f, ok) = discard_unless(
            source,
            FLOAT_SIGNIF_LABEL,
            |s| {
                let int_part = gen_uint_n(s, bitmask(signif_bits - frac_bits), false)?;
                let (frac, frac_width) = gen_uint_n_width(s, bitmask(frac_bits), true)?;
                let significand = int_part << frac_bits | frac << (frac_bits - frac_width);
                Ok(int_to_float(exp_field | significand, width))
            },
            |&f| f >= min && f <= max,
        )?;
        if ok {
            return Ok(f);
        }
        log::trace!("significand attempt {} gave {} outside [{}, {}]", attempt, f, min, max);
    }
    Err(DrawError::exhausted(FAILED_TO_GEN_SIGNIFICAND, SIGNIFICAND_TRIES))
}

/// Float types the float generator can produce.
pub trait FloatKind: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    const WIDTH: FloatWidth;
    const NAME: &'static str;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl FloatKind for f32 {
    const WIDTH: FloatWidth = FloatWidth::Width32;
    const NAME: &'static str = "float32s";

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl FloatKind for f64 {
    const WIDTH: FloatWidth = FloatWidth::Width64;
    const NAME: &'static str = "float64s";

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Floats spanning the whole finite range of `T`, plus infinities and NaN
/// when allowed.
#[derive(Debug, Clone, Copy)]
pub struct FloatGen<T> {
    allow_inf: bool,
    allow_nan: bool,
    tries: usize,
    _marker: PhantomData<fn() -> T>,
}

/// Finite `f32` values.
pub fn float32s() -> FloatGen<f32> {
    float32s_ex(false, false)
}

/// Finite `f64` values.
pub fn float64s() -> FloatGen<f64> {
    float64s_ex(false, false)
}

pub fn float32s_ex(allow_inf: bool, allow_nan: bool) -> FloatGen<f32> {
    FloatGen::new(allow_inf, allow_nan)
}

pub fn float64s_ex(allow_inf: bool, allow_nan: bool) -> FloatGen<f64> {
    FloatGen::new(allow_inf, allow_nan)
}

impl<T: FloatKind> FloatGen<T> {
    pub fn new(allow_inf: bool, allow_nan: bool) -> Self {
        FloatGen {
            allow_inf,
            allow_nan,
            tries: FLOAT_GEN_TRIES,
            _marker: PhantomData,
        }
    }

    /// Override the attempt budget of the inf/NaN check.
    pub fn tries(mut self, tries: usize) -> Self {
        self.tries = tries;
        self
    }

    fn admissible(&self, value: T) -> bool {
        let f = value.to_f64();
        let max = T::WIDTH.max_value();
        if !self.allow_inf && (f < -max || f > max) {
            return false;
        }
        if !self.allow_nan && f.is_nan() {
            return false;
        }
        true
    }

    fn specials(&self) -> Vec<f64> {
        let width = T::WIDTH;
        let mut specials = vec![
            0.0,
            int_to_float(1, width),
            int_to_float(1 << width.mantissa_bits(), width),
            width.max_value(),
        ];
        if self.allow_inf {
            specials.push(f64::INFINITY);
            specials.push(f64::NEG_INFINITY);
        }
        if self.allow_nan {
            specials.push(f64::NAN);
        }
        specials
    }

    fn special(&self, source: &mut dyn Source) -> Draw<Option<f64>> {
        let specials = self.specials();
        in_group(source, FLOAT_SPECIAL_LABEL, false, |s| {
            if !weighted(s, SPECIAL_PROBABILITY)? {
                return Ok(None);
            }
            let i = bounded_int(s, specials.len() as u64 - 1)? as usize;
            Ok(Some(specials[i]))
        })
    }

    fn value_once(&self, source: &mut dyn Source) -> Draw<T> {
        let mut f = match self.special(source)? {
            Some(special) if !special.is_finite() => return Ok(T::from_f64(special)),
            Some(special) => special,
            None => gen_ufloat_range(source, 0.0, T::WIDTH.max_value(), T::WIDTH)?,
        };
        if source.draw_bits(1)? == 1 {
            f = -f;
        }
        Ok(T::from_f64(f))
    }
}

impl<T: FloatKind> Generator for FloatGen<T> {
    type Value = T;

    fn value(&self, source: &mut dyn Source) -> Draw<T> {
        satisfy(
            |&v| self.admissible(v),
            |s| self.value_once(s),
            source,
            self.tries,
            FAILED_TO_GEN_FLOAT,
        )
    }

    fn describe(&self) -> String {
        if !self.allow_inf && !self.allow_nan {
            format!("{}()", T::NAME)
        } else {
            format!(
                "{}_ex(allow_inf={}, allow_nan={})",
                T::NAME,
                self.allow_inf,
                self.allow_nan
            )
        }
    }
}

#[cfg(test)]
mod tests;
