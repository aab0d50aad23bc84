//! Turn a planned route into short movement directives.

use crate::{config::GuidanceConfig, planner::Plan, search::Path};
use itertools::Itertools;
use parse_display::{Display, FromStr};

/// A movement instruction derived from consecutive cells of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
#[display(style = "kebab-case")]
pub enum Directive {
    Straight,
    SlightLeft,
    SlightRight,
    HardLeft,
    HardRight,
    Stop,
    NoWay,
}

impl Directive {
    /// Classify one step by how far it moves sideways.
    ///
    /// Columns increase to the right, so a negative delta is a move to the left.
    pub fn from_column_delta(delta: isize) -> Directive {
        match delta {
            0 => Directive::Straight,
            -1 => Directive::SlightLeft,
            1 => Directive::SlightRight,
            d if d < 0 => Directive::HardLeft,
            _ => Directive::HardRight,
        }
    }
}

/// One directive per step between consecutive columns, then [`Directive::Stop`].
pub fn column_directives(columns: &[usize]) -> Vec<Directive> {
    columns
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| Directive::from_column_delta(to as isize - from as isize))
        .chain(std::iter::once(Directive::Stop))
        .collect()
}

pub fn directives(path: &Path) -> Vec<Directive> {
    column_directives(&path.columns().collect::<Vec<_>>())
}

/// Suppresses a directive that was just given, until it has been held back often enough.
#[derive(Debug, Clone)]
pub struct Announcer {
    repeat_after: u32,
    previous: Option<Directive>,
    repeats: u32,
}

impl Announcer {
    pub fn new(config: &GuidanceConfig) -> Announcer {
        Announcer {
            repeat_after: config.repeat_after,
            previous: None,
            repeats: 0,
        }
    }

    /// Forget everything announced so far.
    pub fn reset(&mut self) {
        self.previous = None;
        self.repeats = 0;
    }

    /// Feed a directive in; get it back if it should be spoken now.
    pub fn offer(&mut self, directive: Directive) -> Option<Directive> {
        let repeated = self.previous == Some(directive);
        self.previous = Some(directive);
        if repeated && self.repeats < self.repeat_after {
            self.repeats += 1;
            None
        } else {
            self.repeats = 0;
            Some(directive)
        }
    }

    /// The directive to speak for this plan, if any.
    ///
    /// Without a route the agent is told there is no way, and the history is cleared
    /// so that the next route is always announced.
    pub fn announce(&mut self, plan: &Plan) -> Option<Directive> {
        let directive = match plan.outcome.path() {
            None => {
                self.reset();
                log::debug!("announcing {}", Directive::NoWay);
                return Some(Directive::NoWay);
            }
            Some(_) if plan.facing_wall => Directive::Stop,
            Some(path) => directives(path)[0],
        };
        let emitted = self.offer(directive);
        match emitted {
            Some(directive) => log::debug!("announcing {directive}"),
            None => log::trace!("holding back repeated {directive}"),
        }
        emitted
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Announcer::new(&GuidanceConfig::default())
    }
}
