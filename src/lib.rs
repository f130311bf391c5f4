//! # conjecture-gen
//!
//! The generation core of a property-based testing library: generators turn
//! a stream of raw bits into structured values, deterministically, while
//! marking labeled groups over the bits so that an external shrinker can
//! rewrite the stream into a simpler failing input.
//!
//! Data flows one way: a [`Source`] supplies bits, the decoders in [`ints`]
//! and the [`satisfy`] helper turn them into numbers, the [`floats`] module
//! builds IEEE 754 values from those, and [`Generator`]s and their
//! [`combinators`] wrap everything into reusable, describable recipes.

pub mod combinators;
pub mod config;
pub mod data;
pub mod distributions;
pub mod floats;
pub mod generator;
pub mod ints;
pub mod trace;

// Re-export core types for easy access
pub use combinators::{
    booleans, custom, just, one_of, ptrs, sampled_from, try_one_of, try_sampled_from, Booleans,
    Custom, Filter, Just, Map, OneOf, Ptrs, SampledFrom, FILTER_TRIES,
};
pub use config::SourceConfig;
pub use data::{in_group, DataSource, Draw, DrawError, GroupId, Source};
pub use distributions::{satisfy, weighted};
pub use floats::{
    float32s, float32s_ex, float64s, float64s_ex, gen_ufloat_range, FloatGen, FloatKind,
    FloatWidth, FLOAT_GEN_TRIES,
};
pub use generator::{BoxedGenerator, ConfigError, Generator};
pub use ints::{
    gen_int_range, gen_uint_n, gen_uint_n_width, gen_uint_range, int_range, ints, try_int_range,
    IntGen, Integer,
};
pub use trace::{GroupSpan, Trace, TraceEvent};
