// General distribution functions and utilities.
// This module contains the biased coin and the bounded rejection-sampling
// loop that the numeric generators and combinators build on.

use crate::data::{discard_unless, Draw, DrawError, Source};

/// Label of the group wrapping each rejection-sampling attempt.
pub const TRY_LABEL: &str = "try";

/// Flip a coin that comes up `true` with the given probability.
///
/// An all-zero draw always yields `false`, so shrinking pushes towards it.
pub fn weighted(source: &mut dyn Source, probability: f64) -> Draw<bool> {
    if probability <= 0.0 {
        return Ok(false);
    }
    if probability >= 1.0 {
        return Ok(true);
    }
    let probe = source.draw_bits(64)?;
    let unit = (probe >> 11) as f64 / (1u64 << 53) as f64;
    Ok(unit >= 1.0 - probability)
}

/// Call `produce_once` until `predicate` accepts its result, at most
/// `max_tries` times.
///
/// Every attempt runs in its own `try` group; rejected attempts are closed
/// with the discard flag so a shrinker can drop them. Their bits stay
/// consumed. Running out of attempts fails the trial with
/// [`DrawError::Exhausted`] carrying `failure_message`.
pub fn satisfy<T, P, F>(
    predicate: P,
    produce_once: F,
    source: &mut dyn Source,
    max_tries: usize,
    failure_message: &str,
) -> Draw<T>
where
    P: Fn(&T) -> bool,
    F: Fn(&mut dyn Source) -> Draw<T>,
{
    for attempt in 1..=max_tries {
        let (value, ok) = discard_unless(source, TRY_LABEL, |s| produce_once(s), |v| predicate(v))?;
        if ok {
            return Ok(value);
        }
        log::trace!("attempt {}/{} rejected", attempt, max_tries);
    }
    log::debug!("{} after {} attempts", failure_message, max_tries);
    Err(DrawError::exhausted(failure_message, max_tries))
}
