// Recorded generation traces.
// A trace is the ordered list of draws and group open/close events produced
// by one generation. Its draws alone are enough to replay the generation;
// the group events are what a shrinker uses to decide which spans it may
// rewrite or delete.

use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    Draw { bits: u32, value: u64 },
    Begin { label: String, forced: bool },
    End { discard: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
}

/// A closed group, located by the indices of the draws it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpan {
    pub label: String,
    pub forced: bool,
    pub discard: bool,
    /// Number of groups enclosing this one.
    pub depth: usize,
    pub draws: Range<usize>,
}

impl Trace {
    /// Raw values of every draw, in order.
    pub fn draws(&self) -> impl Iterator<Item = u64> + '_ {
        self.events.iter().filter_map(|event| match event {
            TraceEvent::Draw { value, .. } => Some(*value),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// Total number of bits consumed.
    pub fn bit_count(&self) -> u64 {
        self.events
            .iter()
            .map(|event| match event {
                TraceEvent::Draw { bits, .. } => u64::from(*bits),
                _ => 0,
            })
            .sum()
    }

    /// Every open is matched by exactly one close, in stack order.
    pub fn is_well_nested(&self) -> bool {
        let mut depth = 0usize;
        for event in &self.events {
            match event {
                TraceEvent::Begin { .. } => depth += 1,
                TraceEvent::End { .. } => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TraceEvent::Draw { .. } => {}
            }
        }
        depth == 0
    }

    /// Closed groups in the order they were opened. Groups still open at the
    /// end of the trace are omitted.
    pub fn groups(&self) -> Vec<GroupSpan> {
        let mut spans: Vec<Option<GroupSpan>> = Vec::new();
        let mut open: Vec<(usize, &str, bool, usize)> = Vec::new();
        let mut draw_index = 0;

        for event in &self.events {
            match event {
                TraceEvent::Draw { .. } => draw_index += 1,
                TraceEvent::Begin { label, forced } => {
                    open.push((spans.len(), label.as_str(), *forced, draw_index));
                    spans.push(None);
                }
                TraceEvent::End { discard } => {
                    if let Some((slot, label, forced, start)) = open.pop() {
                        spans[slot] = Some(GroupSpan {
                            label: label.to_string(),
                            forced,
                            discard: *discard,
                            depth: open.len(),
                            draws: start..draw_index,
                        });
                    }
                }
            }
        }

        spans.into_iter().flatten().collect()
    }

    /// Groups a shrinker may delete outright.
    pub fn discarded_groups(&self) -> Vec<GroupSpan> {
        self.groups().into_iter().filter(|g| g.discard).collect()
    }
}
