//! The generator abstraction.
//!
//! A generator is an immutable recipe that turns bits from a [`Source`] into a
//! value and can describe itself. Generators are built once and invoked once
//! per trial with a fresh source; they may be shared read-only between
//! threads running independent trials.

use crate::combinators::{Filter, Map, FILTER_TRIES};
use crate::data::{in_group, Draw, Source};

use std::sync::Arc;

/// Configuration mistake detected while building a generator.
///
/// These never depend on drawn data. Panicking constructors abort with this
/// error's message; the `try_*` constructors return it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not construct a valid generator: range [{min}, {max}] requires min < max")]
    InvalidRange { min: String, max: String },

    #[error("could not construct a valid generator: range [{min}, {max}] requires min <= max")]
    InvertedRange { min: String, max: String },

    #[error("could not construct a valid generator: float range [{min}, {max}] requires 0 <= min < max")]
    InvalidFloatRange { min: String, max: String },

    #[error("could not construct a valid generator: {0} requires at least one element")]
    Empty(&'static str),
}

impl ConfigError {
    pub(crate) fn fail(self) -> ! {
        panic!("{}", self)
    }
}

pub type BoxedGenerator<T> = Box<dyn Generator<Value = T> + Send + Sync>;

pub trait Generator {
    type Value;

    /// Produce one value from `source`.
    ///
    /// Given identical source behavior this must return an identical value,
    /// and every group it opens must be closed before it returns.
    fn value(&self, source: &mut dyn Source) -> Draw<Self::Value>;

    /// Stable, human-readable description of this generator's configuration.
    fn describe(&self) -> String;

    /// Produce a value inside a group labeled with [`describe`](Self::describe).
    /// `label` names the drawn value in logs.
    fn draw(&self, source: &mut dyn Source, label: &str) -> Draw<Self::Value> {
        let description = self.describe();
        let result = in_group(source, &description, true, |s| self.value(s));
        match &result {
            Ok(_) => log::trace!("{}: drew from {}", label, description),
            Err(err) => log::debug!("{}: {} failed: {}", label, description, err),
        }
        result
    }

    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Value) -> U,
    {
        Map::new(self, f)
    }

    /// Keep only values accepted by `predicate`, retrying up to
    /// [`FILTER_TRIES`] times.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Value) -> bool,
    {
        Filter::new(self, predicate, FILTER_TRIES)
    }

    fn filter_tries<P>(self, predicate: P, tries: usize) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Value) -> bool,
    {
        Filter::new(self, predicate, tries)
    }

    fn boxed(self) -> BoxedGenerator<Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    type Value = G::Value;

    fn value(&self, source: &mut dyn Source) -> Draw<G::Value> {
        (**self).value(source)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<G: Generator + ?Sized> Generator for Arc<G> {
    type Value = G::Value;

    fn value(&self, source: &mut dyn Source) -> Draw<G::Value> {
        (**self).value(source)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
