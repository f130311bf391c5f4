// Generator combinators.
// Each combinator wraps other generators or plain values and holds no state
// between invocations; every call is a fresh traversal of the source.

use crate::data::{in_group, Draw, Source};
use crate::distributions::{satisfy, weighted};
use crate::generator::{BoxedGenerator, ConfigError, Generator};
use crate::ints::bounded_int;

use std::any::type_name;
use std::fmt;

/// Attempts a [`Filter`] makes before failing the trial.
pub const FILTER_TRIES: usize = 100;

const FAILED_TO_SATISFY_FILTER: &str = "failed to generate value satisfying filter";
const ONE_OF_LABEL: &str = "oneof";
const SAMPLED_LABEL: &str = "sampled";
const PTR_LABEL: &str = "ptr";

/// Generator backed by a user function. See [`custom`].
pub struct Custom<F> {
    f: F,
}

/// Wrap `f` as a generator. `f` is expected to be deterministic in the bits
/// it is given; this is not checked.
pub fn custom<T, F>(f: F) -> Custom<F>
where
    F: Fn(&mut dyn Source) -> Draw<T>,
{
    Custom { f }
}

impl<T, F> Generator for Custom<F>
where
    F: Fn(&mut dyn Source) -> Draw<T>,
{
    type Value = T;

    fn value(&self, source: &mut dyn Source) -> Draw<T> {
        (self.f)(source)
    }

    fn describe(&self) -> String {
        format!("custom(<fn> -> {})", type_name::<T>())
    }
}

impl<F> fmt::Debug for Custom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").finish_non_exhaustive()
    }
}

/// See [`Generator::map`].
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<G, F> Map<G, F> {
    pub(crate) fn new(inner: G, f: F) -> Self {
        Map { inner, f }
    }
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Value) -> U,
{
    type Value = U;

    fn value(&self, source: &mut dyn Source) -> Draw<U> {
        self.inner.value(source).map(&self.f)
    }

    fn describe(&self) -> String {
        format!("{}.map(<fn> -> {})", self.inner.describe(), type_name::<U>())
    }
}

/// See [`Generator::filter`].
pub struct Filter<G, P> {
    inner: G,
    predicate: P,
    tries: usize,
}

impl<G, P> Filter<G, P> {
    pub(crate) fn new(inner: G, predicate: P, tries: usize) -> Self {
        Filter {
            inner,
            predicate,
            tries,
        }
    }
}

impl<G, P> Generator for Filter<G, P>
where
    G: Generator,
    P: Fn(&G::Value) -> bool,
{
    type Value = G::Value;

    fn value(&self, source: &mut dyn Source) -> Draw<G::Value> {
        satisfy(
            |v| (self.predicate)(v),
            |s| self.inner.value(s),
            source,
            self.tries,
            FAILED_TO_SATISFY_FILTER,
        )
    }

    fn describe(&self) -> String {
        format!("{}.filter(<fn>)", self.inner.describe())
    }
}

/// Uniform choice between generators of the same value type.
pub struct OneOf<T> {
    branches: Vec<BoxedGenerator<T>>,
}

/// Panics if `branches` is empty.
pub fn one_of<T>(branches: Vec<BoxedGenerator<T>>) -> OneOf<T> {
    try_one_of(branches).unwrap_or_else(|err| err.fail())
}

pub fn try_one_of<T>(branches: Vec<BoxedGenerator<T>>) -> Result<OneOf<T>, ConfigError> {
    if branches.is_empty() {
        return Err(ConfigError::Empty("one_of"));
    }
    Ok(OneOf { branches })
}

impl<T> Generator for OneOf<T> {
    type Value = T;

    fn value(&self, source: &mut dyn Source) -> Draw<T> {
        let last = self.branches.len() as u64 - 1;
        let i = in_group(source, ONE_OF_LABEL, false, |s| bounded_int(s, last))? as usize;
        self.branches[i].value(source)
    }

    fn describe(&self) -> String {
        let branches: Vec<String> = self.branches.iter().map(|g| g.describe()).collect();
        format!("one_of({})", branches.join(", "))
    }
}

/// Always the same value; draws no bits.
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

pub fn just<T: Clone + fmt::Debug>(value: T) -> Just<T> {
    Just { value }
}

impl<T: Clone + fmt::Debug> Generator for Just<T> {
    type Value = T;

    fn value(&self, _source: &mut dyn Source) -> Draw<T> {
        Ok(self.value.clone())
    }

    fn describe(&self) -> String {
        format!("just({:?})", self.value)
    }
}

/// Uniform choice from a fixed set of values.
#[derive(Debug, Clone)]
pub struct SampledFrom<T> {
    values: Vec<T>,
}

/// Panics if `values` is empty.
pub fn sampled_from<T: Clone>(values: Vec<T>) -> SampledFrom<T> {
    try_sampled_from(values).unwrap_or_else(|err| err.fail())
}

pub fn try_sampled_from<T: Clone>(values: Vec<T>) -> Result<SampledFrom<T>, ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::Empty("sampled_from"));
    }
    Ok(SampledFrom { values })
}

impl<T: Clone> Generator for SampledFrom<T> {
    type Value = T;

    fn value(&self, source: &mut dyn Source) -> Draw<T> {
        let last = self.values.len() as u64 - 1;
        let i = in_group(source, SAMPLED_LABEL, false, |s| bounded_int(s, last))? as usize;
        Ok(self.values[i].clone())
    }

    fn describe(&self) -> String {
        format!("sampled_from({} {})", self.values.len(), type_name::<T>())
    }
}

/// Optional boxed values. See [`ptrs`].
#[derive(Debug, Clone)]
pub struct Ptrs<G> {
    inner: G,
    allow_nil: bool,
}

/// Boxed values of `inner`. When `allow_nil` is set, a fair coin decides
/// whether the result is `None`; otherwise it is always `Some`.
pub fn ptrs<G: Generator>(inner: G, allow_nil: bool) -> Ptrs<G> {
    Ptrs { inner, allow_nil }
}

impl<G: Generator> Generator for Ptrs<G> {
    type Value = Option<Box<G::Value>>;

    fn value(&self, source: &mut dyn Source) -> Draw<Self::Value> {
        if self.allow_nil {
            let present = in_group(source, PTR_LABEL, false, |s| weighted(s, 0.5))?;
            if !present {
                return Ok(None);
            }
        }
        Ok(Some(Box::new(self.inner.value(source)?)))
    }

    fn describe(&self) -> String {
        format!("ptrs({}, allow_nil={})", self.inner.describe(), self.allow_nil)
    }
}

/// Fair booleans, shrinking towards `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Booleans;

pub fn booleans() -> Booleans {
    Booleans
}

impl Generator for Booleans {
    type Value = bool;

    fn value(&self, source: &mut dyn Source) -> Draw<bool> {
        weighted(source, 0.5)
    }

    fn describe(&self) -> String {
        "booleans()".to_string()
    }
}
