//! Mode segmentation and version/ECL selection
//!
//! The minimal segmentation is a shortest path over states
//! `(mode, phase)`, where `phase` is the position of the next character
//! inside its numeric triple or alphanumeric pair. Tracking the phase makes
//! every path cost equal to the exact serialized length of its segments.

use tracing::{debug, trace};

use crate::encoder::config;
use crate::encoder::modes::Mode;
use crate::encoder::tables::capacity_bits;
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Version};

/// Per-character mode assignment and its total bit cost (headers included)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Strategy {
    pub steps: Vec<Mode>,
    pub cost: usize,
}

/// Resolved search range for [`optimal_strategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_version: Version,
    pub max_version: Version,
    pub min_ecl: ECLevel,
    pub max_ecl: ECLevel,
}

impl Bounds {
    pub fn new(
        min_version: Version,
        max_version: Version,
        min_ecl: ECLevel,
        max_ecl: ECLevel,
    ) -> Result<Self> {
        if min_version > max_version {
            return Err(QrError::InvalidOptions(format!(
                "min version {min_version} above max version {max_version}"
            )));
        }
        if min_ecl > max_ecl {
            return Err(QrError::InvalidOptions(format!(
                "min ecl {min_ecl:?} above max ecl {max_ecl:?}"
            )));
        }
        Ok(Self {
            min_version,
            max_version,
            min_ecl,
            max_ecl,
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            min_ecl: ECLevel::L,
            max_ecl: ECLevel::H,
        }
    }
}

/// Chosen symbol parameters for an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub version: Version,
    pub ecl: ECLevel,
    pub strategy: Strategy,
}

// State index = slot * 3 + phase. Slot 0 is the empty prefix.
const NUM_STATES: usize = 12;
const NEW_SEGMENT_ORDER: [Mode; 3] = [Mode::Byte, Mode::Numeric, Mode::Alphanumeric];

fn slot(mode: Mode) -> usize {
    match mode {
        Mode::Byte => 1,
        Mode::Numeric => 2,
        Mode::Alphanumeric => 3,
    }
}

fn slot_mode(slot: usize) -> Option<Mode> {
    match slot {
        1 => Some(Mode::Byte),
        2 => Some(Mode::Numeric),
        3 => Some(Mode::Alphanumeric),
        _ => None,
    }
}

/// Cost of appending `c` after a path ending in `prev` (`None` = empty
/// path). Returns the added bits and the phase after `c`.
fn transition(
    prev: Option<(Mode, usize)>,
    mode: Mode,
    c: char,
    version: Version,
) -> Option<(usize, usize)> {
    let (phase, header) = match prev {
        Some((prev_mode, phase)) if prev_mode == mode => (phase, 0),
        _ => (0, mode.header_bits(version)),
    };
    let bits = mode.marginal_bits(c, phase)?;
    Some(((header + bits) as usize, (phase + 1) % mode.group_size()))
}

/// Cheapest per-character mode assignment of `text` at `version`.
///
/// Ties resolve deterministically: states are relaxed in index order
/// (byte, numeric, alphanumeric), extending the current segment before
/// opening a new one, and only a strictly lower cost replaces a recorded
/// one.
pub fn find_minimal_segmentation(text: &str, version: Version) -> Strategy {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();

    let mut cost = vec![[usize::MAX; NUM_STATES]; n + 1];
    let mut back = vec![[0usize; NUM_STATES]; n + 1];
    cost[0][0] = 0;

    for (i, &c) in chars.iter().enumerate() {
        for state in 0..NUM_STATES {
            let base = cost[i][state];
            if base == usize::MAX {
                continue;
            }
            let current = slot_mode(state / 3).map(|mode| (mode, state % 3));
            let current_mode = current.map(|(mode, _)| mode);
            let candidates = current_mode.into_iter().chain(
                NEW_SEGMENT_ORDER
                    .into_iter()
                    .filter(|&mode| Some(mode) != current_mode),
            );
            for mode in candidates {
                let Some((bits, phase)) = transition(current, mode, c, version) else {
                    continue;
                };
                let next = slot(mode) * 3 + phase;
                if base + bits < cost[i + 1][next] {
                    cost[i + 1][next] = base + bits;
                    back[i + 1][next] = state;
                }
            }
        }
    }

    let mut best = 0;
    for state in 0..NUM_STATES {
        if cost[n][state] < cost[n][best] {
            best = state;
        }
    }

    let mut steps = Vec::with_capacity(n);
    let mut state = best;
    for i in (1..=n).rev() {
        if let Some(mode) = slot_mode(state / 3) {
            steps.push(mode);
        }
        state = back[i][state];
    }
    steps.reverse();

    Strategy {
        steps,
        cost: cost[n][best],
    }
}

/// Smallest version, then the highest ECL, that hold `text` within `bounds`.
pub fn optimal_strategy(text: &str, bounds: &Bounds) -> Result<Plan> {
    let n = text.chars().count();
    let max_capacity = capacity_bits(bounds.max_version, bounds.min_ecl);
    // Even all-numeric cannot fit
    if 10 * n > 3 * max_capacity {
        return Err(QrError::DataTooLong {
            needed_bits: (10 * n).div_ceil(3),
            capacity_bits: max_capacity,
        });
    }

    let mut strategy = Strategy::default();
    let mut tier = None;
    let mut chosen = None;
    for version in bounds.min_version.range_to(bounds.max_version) {
        if tier != Some(version.tier()) {
            strategy = find_minimal_segmentation(text, version);
            tier = Some(version.tier());
            debug!(version = %version, cost = strategy.cost, "recomputed segmentation");
        }
        let capacity = capacity_bits(version, bounds.min_ecl);
        trace!(version = %version, capacity, cost = strategy.cost, "trying version");
        if strategy.cost <= capacity {
            chosen = Some(version);
            break;
        }
    }
    let Some(version) = chosen else {
        return Err(QrError::DataTooLong {
            needed_bits: strategy.cost,
            capacity_bits: max_capacity,
        });
    };

    let mut ecl = bounds.min_ecl;
    while let Some(next) = ecl.next() {
        if next > bounds.max_ecl || strategy.cost > capacity_bits(version, next) {
            break;
        }
        ecl = next;
    }

    debug!(version = %version, ecl = ?ecl, cost = strategy.cost, "selected symbol parameters");
    Ok(Plan {
        version,
        ecl,
        strategy,
    })
}

#[derive(Debug, Clone, Copy)]
struct Step {
    mode: Mode,
    phase: usize,
    cost: usize,
}

const CHOICE_ORDER: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

/// Lazy depth-first enumeration of every per-character mode assignment
/// whose cost fits a capacity.
///
/// At each character a path either extends its current mode or switches to
/// another one. A branch is cut once `cost + remaining * prune_bits` exceeds
/// the capacity; since numeric characters can cost as little as 3 bits, the
/// default bound of 10/3 may drop a few paths that would have fit exactly.
#[derive(Debug, Clone)]
pub struct Strategies {
    chars: Vec<char>,
    version: Version,
    capacity: usize,
    prune_bits: f64,
    path: Vec<Step>,
    cursors: Vec<usize>,
    done: bool,
}

impl Strategies {
    pub fn new(text: &str, version: Version, capacity: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            version,
            capacity,
            prune_bits: config::strategy_prune_bits_per_char(),
            path: Vec::new(),
            cursors: vec![0],
            done: false,
        }
    }

    /// Override the per-character pruning bound
    pub fn with_prune_bits(mut self, prune_bits: f64) -> Self {
        self.prune_bits = prune_bits;
        self
    }

    fn exceeds(&self, cost: usize, remaining: usize) -> bool {
        cost as f64 + remaining as f64 * self.prune_bits > self.capacity as f64
    }
}

impl Iterator for Strategies {
    type Item = Strategy;

    fn next(&mut self) -> Option<Strategy> {
        while !self.done {
            let depth = self.path.len();
            if depth == self.chars.len() {
                let strategy = Strategy {
                    steps: self.path.iter().map(|s| s.mode).collect(),
                    cost: self.path.last().map_or(0, |s| s.cost),
                };
                self.path.pop();
                self.cursors.pop();
                if self.cursors.is_empty() {
                    self.done = true;
                }
                return Some(strategy);
            }

            let choice = self.cursors[depth];
            if choice >= CHOICE_ORDER.len() {
                if depth == 0 {
                    self.done = true;
                } else {
                    self.path.pop();
                    self.cursors.pop();
                }
                continue;
            }
            self.cursors[depth] += 1;

            let mode = CHOICE_ORDER[choice];
            let prev = self.path.last().map(|s| (s.mode, s.phase));
            let base = self.path.last().map_or(0, |s| s.cost);
            let Some((bits, phase)) = transition(prev, mode, self.chars[depth], self.version)
            else {
                continue;
            };
            let cost = base + bits;
            if self.exceeds(cost, self.chars.len() - depth - 1) {
                continue;
            }
            self.path.push(Step { mode, phase, cost });
            self.cursors.push(0);
        }
        None
    }
}

/// Every strategy for `text` that fits in `version` at `ecl`
pub fn all_strategies(text: &str, version: Version, ecl: ECLevel) -> Strategies {
    Strategies::new(text, version, capacity_bits(version, ecl))
}
