// Bit sources and the group protocol.
// A source hands out raw bits in order and records labeled, nested groups
// over the draws so that a shrinker can later rewrite or delete spans of
// the recording. Everything a generator does is a pure function of the
// values a source returns.

use crate::config::SourceConfig;
use crate::trace::{Trace, TraceEvent};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of any operation that consumes bits from a [`Source`].
pub type Draw<T> = Result<T, DrawError>;

/// Recoverable, trial-level generation failure.
///
/// Either error aborts the current trial only; the driver decides whether to
/// retry with a fresh source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    /// A bounded retry loop ran out of attempts.
    #[error("could not produce a value satisfying constraints after {tries} attempts: {message}")]
    Exhausted { message: String, tries: usize },

    /// The source has no more bits to give (replay buffer consumed or draw
    /// budget spent).
    #[error("source overrun: no more data available")]
    Overrun,
}

impl DrawError {
    pub fn exhausted(message: &str, tries: usize) -> DrawError {
        DrawError::Exhausted {
            message: message.to_string(),
            tries,
        }
    }
}

/// Handle returned by [`Source::begin_group`], passed back to
/// [`Source::end_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub usize);

/// Supplier of raw bits plus the group-nesting protocol.
///
/// Implementations only need to deliver bits faithfully and in order;
/// distribution concerns belong to the decoders built on top.
pub trait Source {
    /// Draw `n` bits (`n <= 64`) as an unsigned integer in `[0, 2^n)`.
    fn draw_bits(&mut self, n: u32) -> Draw<u64>;

    /// Open a labeled group. `forced` marks the content as mandatory.
    fn begin_group(&mut self, label: &str, forced: bool) -> GroupId;

    /// Close the innermost open group. `discard` marks the span as an
    /// abandoned attempt that a shrinker may remove.
    ///
    /// Closing anything other than the innermost open group is a caller bug
    /// and panics.
    fn end_group(&mut self, id: GroupId, discard: bool);
}

/// Run `f` inside a group. The group is discarded if `f` fails.
pub fn in_group<T, F>(source: &mut dyn Source, label: &str, forced: bool, f: F) -> Draw<T>
where
    F: FnOnce(&mut dyn Source) -> Draw<T>,
{
    let id = source.begin_group(label, forced);
    let result = f(&mut *source);
    source.end_group(id, result.is_err());
    result
}

/// Run `f` inside a group and close it with `discard = !keep(value)`.
///
/// Returns the value together with whether it was kept.
pub fn discard_unless<T, F, K>(source: &mut dyn Source, label: &str, f: F, keep: K) -> Draw<(T, bool)>
where
    F: FnOnce(&mut dyn Source) -> Draw<T>,
    K: FnOnce(&T) -> bool,
{
    let id = source.begin_group(label, false);
    match f(&mut *source) {
        Ok(value) => {
            let ok = keep(&value);
            source.end_group(id, !ok);
            Ok((value, ok))
        }
        Err(err) => {
            source.end_group(id, true);
            Err(err)
        }
    }
}

#[inline]
pub(crate) fn bitmask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[derive(Debug)]
enum Backing {
    Random(ChaCha8Rng),
    Replay { buffer: Vec<u64>, index: usize },
}

#[derive(Debug)]
struct Frame {
    id: GroupId,
    label: String,
}

/// The concrete source: random or replayed bits, an explicit group stack,
/// and a full recording of the generation.
#[derive(Debug)]
pub struct DataSource {
    backing: Backing,
    frames: Vec<Frame>,
    next_group: usize,
    draws: usize,
    max_draws: usize,
    record: Trace,
}

impl DataSource {
    /// Random source seeded from `seed`.
    pub fn from_seed(seed: u64) -> DataSource {
        DataSource::with_config(&SourceConfig {
            seed: Some(seed),
            ..SourceConfig::default()
        })
    }

    pub fn with_config(config: &SourceConfig) -> DataSource {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        DataSource::new(Backing::Random(rng), config.max_draws)
    }

    /// Replay a raw sequence of draw values. Each value is truncated to the
    /// width requested by the draw that consumes it.
    pub fn from_vec(buffer: Vec<u64>) -> DataSource {
        DataSource::new(
            Backing::Replay { buffer, index: 0 },
            SourceConfig::default().max_draws,
        )
    }

    /// Replay the draws of a previously recorded trace.
    pub fn replay(trace: &Trace) -> DataSource {
        DataSource::from_vec(trace.draws().collect())
    }

    fn new(backing: Backing, max_draws: usize) -> DataSource {
        DataSource {
            backing,
            frames: Vec::new(),
            next_group: 0,
            draws: 0,
            max_draws,
            record: Trace::default(),
        }
    }

    /// Recording of everything drawn so far.
    pub fn trace(&self) -> &Trace {
        &self.record
    }

    pub fn into_trace(self) -> Trace {
        self.record
    }

    /// Number of groups currently open.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_replay(&self) -> bool {
        matches!(self.backing, Backing::Replay { .. })
    }
}

impl Source for DataSource {
    fn draw_bits(&mut self, n: u32) -> Draw<u64> {
        assert!(n <= 64, "cannot draw {} bits at once", n);
        if n == 0 {
            return Ok(0);
        }
        if self.draws >= self.max_draws {
            log::debug!("draw budget of {} exhausted", self.max_draws);
            return Err(DrawError::Overrun);
        }
        let raw = match &mut self.backing {
            Backing::Random(rng) => rng.next_u64(),
            Backing::Replay { buffer, index } => match buffer.get(*index) {
                Some(&v) => {
                    *index += 1;
                    v
                }
                None => {
                    log::debug!("replay overrun after {} draws", index);
                    return Err(DrawError::Overrun);
                }
            },
        };
        let value = raw & bitmask(n);
        self.draws += 1;
        self.record.events.push(TraceEvent::Draw { bits: n, value });
        Ok(value)
    }

    fn begin_group(&mut self, label: &str, forced: bool) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.frames.push(Frame {
            id,
            label: label.to_string(),
        });
        self.record.events.push(TraceEvent::Begin {
            label: label.to_string(),
            forced,
        });
        id
    }

    fn end_group(&mut self, id: GroupId, discard: bool) {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => panic!("end_group({:?}) called with no open group", id),
        };
        assert!(
            frame.id == id,
            "end_group({:?}) does not match innermost open group {:?} ({:?})",
            id,
            frame.id,
            frame.label
        );
        if discard {
            log::trace!("discarding group {:?}", frame.label);
        }
        self.record.events.push(TraceEvent::End { discard });
    }
}
