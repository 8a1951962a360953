//! SlidingWindowAverager — average error over every hour window.
//!
//! Windows are numbered from hour 1; hour 0 is aggregated into the series but
//! never falls inside a window. When the series is longer than the window
//! (`max_hour > window`) every window position `[i, i + window - 1]` for
//! `i in 1..=max_hour - window + 1` is produced by sliding one running
//! [`HourAggregate`]: the entering hour is added, the leaving hour removed.
//! Total work is O(max_hour) regardless of window length.
//!
//! Otherwise a single result covering `[1, window]` is produced from every
//! available hour `1..=max_hour`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{AverageError, Hour, HourAggregate};
use crate::error::EngineError;
use crate::series::ErrorSeries;

/// Window length in hours. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Window(u64);

impl Window {
    pub fn new(hours: i64) -> Result<Self, EngineError> {
        if hours <= 0 {
            return Err(EngineError::InvalidWindow(format!(
                "window must be a positive number of hours, got {hours}"
            )));
        }
        Ok(Self(hours as u64))
    }

    pub fn hours(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for Window {
    type Error = EngineError;

    fn try_from(hours: i64) -> Result<Self, Self::Error> {
        Window::new(hours)
    }
}

impl From<Window> for u64 {
    fn from(window: Window) -> u64 {
        window.0
    }
}

/// Parses the window file body: one integer, surrounding whitespace ignored.
impl FromStr for Window {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let hours: i64 = text
            .parse()
            .map_err(|_| EngineError::InvalidWindow(format!("'{text}' is not an integer")))?;
        Window::new(hours)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two averaging regimes a series/window pair falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// At least one full window fits after hour 0: one result per position.
    Sliding,
    /// Not enough hours: one result `[1, window]` over whatever is available.
    Partial,
}

impl Regime {
    pub fn select(max_hour: Hour, window: Window) -> Self {
        if max_hour > window.hours() {
            Regime::Sliding
        } else {
            Regime::Partial
        }
    }
}

/// Average error for one window position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResult {
    pub window_start: Hour,
    pub window_end: Hour,
    pub average_error: AverageError,
}

#[derive(Debug)]
enum State {
    Sliding {
        next_start: Hour,
        last_start: Hour,
        running: HourAggregate,
    },
    Partial(Option<WindowResult>),
}

/// Lazy iterator over [`WindowResult`]s. Nothing is buffered; each position
/// is computed when requested.
#[derive(Debug)]
pub struct WindowAverages<'a> {
    hours: &'a [HourAggregate],
    window: Window,
    state: State,
}

impl<'a> WindowAverages<'a> {
    pub fn new(series: &'a ErrorSeries, window: Window) -> Self {
        let hours = series.as_slice();
        let max_hour = series.max_hour();
        let len = window.hours();

        let state = match Regime::select(max_hour, window) {
            Regime::Sliding => {
                // Prime with hours [1, window - 1]; the first step adds hour `window`.
                let running: HourAggregate = hours[1..len as usize].iter().sum();
                State::Sliding {
                    next_start: 1,
                    last_start: max_hour - len + 1,
                    running,
                }
            }
            Regime::Partial => {
                let total: HourAggregate = hours.iter().skip(1).sum();
                State::Partial(Some(WindowResult {
                    window_start: 1,
                    window_end: len,
                    average_error: total.average(),
                }))
            }
        };

        Self {
            hours,
            window,
            state,
        }
    }

    pub fn regime(&self) -> Regime {
        match self.state {
            State::Sliding { .. } => Regime::Sliding,
            State::Partial(_) => Regime::Partial,
        }
    }
}

impl Iterator for WindowAverages<'_> {
    type Item = WindowResult;

    fn next(&mut self) -> Option<WindowResult> {
        match &mut self.state {
            State::Sliding {
                next_start,
                last_start,
                running,
            } => {
                if *next_start > *last_start {
                    return None;
                }
                let start = *next_start;
                let end = start + self.window.hours() - 1;

                running.add(&self.hours[end as usize]);
                let result = WindowResult {
                    window_start: start,
                    window_end: end,
                    average_error: running.average(),
                };
                running.remove(&self.hours[start as usize]);
                *next_start += 1;

                Some(result)
            }
            State::Partial(pending) => pending.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            State::Sliding {
                next_start,
                last_start,
                ..
            } => (last_start + 1).saturating_sub(*next_start) as usize,
            State::Partial(pending) => usize::from(pending.is_some()),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowAverages<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(hours: &[(u64, u64)]) -> ErrorSeries {
        ErrorSeries::from_aggregates(
            hours
                .iter()
                .map(|&(count, error_sum)| HourAggregate::new(count, u128::from(error_sum)))
                .collect(),
        )
    }

    fn rendered(series: &ErrorSeries, window: i64) -> Vec<String> {
        WindowAverages::new(series, Window::new(window).unwrap())
            .map(|r| format!("{}|{}|{}", r.window_start, r.window_end, r.average_error))
            .collect()
    }

    #[test]
    fn window_rejects_non_positive() {
        assert!(matches!(Window::new(0), Err(EngineError::InvalidWindow(_))));
        assert!(matches!(Window::new(-3), Err(EngineError::InvalidWindow(_))));
        assert_eq!(Window::new(4).unwrap().hours(), 4);
    }

    #[test]
    fn window_from_str_trims() {
        assert_eq!("  2\n".parse::<Window>().unwrap().hours(), 2);
        assert!(matches!("2.5".parse::<Window>(), Err(EngineError::InvalidWindow(_))));
        assert!(matches!("".parse::<Window>(), Err(EngineError::InvalidWindow(_))));
        assert!(matches!("0".parse::<Window>(), Err(EngineError::InvalidWindow(_))));
    }

    #[test]
    fn regime_boundary() {
        let w = Window::new(3).unwrap();
        assert_eq!(Regime::select(4, w), Regime::Sliding);
        assert_eq!(Regime::select(3, w), Regime::Partial);
        assert_eq!(Regime::select(0, w), Regime::Partial);
    }

    #[test]
    fn sliding_window_of_one() {
        let s = series(&[(0, 0), (1, 50), (1, 50)]);
        assert_eq!(rendered(&s, 1), vec!["1|1|0.50", "2|2|0.50"]);
    }

    #[test]
    fn sliding_window_positions_and_sums() {
        // hours 0..=5
        let s = series(&[(9, 900), (1, 100), (1, 300), (0, 0), (2, 100), (1, 0)]);
        assert_eq!(
            rendered(&s, 2),
            vec![
                "1|2|2.00", // (100 + 300) / 2
                "2|3|3.00", // 300 / 1
                "3|4|0.50", // 100 / 2
                "4|5|0.33", // 100 / 3
            ]
        );
    }

    #[test]
    fn hour_zero_never_inside_a_window() {
        let s = series(&[(5, 5000), (1, 10), (1, 10), (1, 10)]);
        for r in WindowAverages::new(&s, Window::new(2).unwrap()) {
            assert!(r.window_start >= 1);
            assert_eq!(r.average_error.to_string(), "0.10");
        }
    }

    #[test]
    fn sliding_window_with_no_matches_is_na() {
        let s = series(&[(0, 0), (1, 10), (0, 0), (0, 0), (1, 20)]);
        assert_eq!(rendered(&s, 2), vec!["1|2|0.10", "2|3|NA", "3|4|0.20"]);
    }

    #[test]
    fn partial_when_max_hour_equals_window() {
        let s = series(&[(0, 0), (1, 10), (1, 30)]);
        assert_eq!(rendered(&s, 2), vec!["1|2|0.20"]);
    }

    #[test]
    fn partial_reports_requested_window_bounds() {
        let s = series(&[(0, 0), (1, 0)]);
        assert_eq!(rendered(&s, 5), vec!["1|5|0.00"]);
    }

    #[test]
    fn partial_without_matches_is_na() {
        let s = series(&[(0, 0), (0, 0)]);
        assert_eq!(rendered(&s, 3), vec!["1|3|NA"]);
    }

    #[test]
    fn no_data_at_all_is_single_na() {
        let s = series(&[]);
        assert_eq!(rendered(&s, 4), vec!["1|4|NA"]);
    }

    #[test]
    fn boundary_single_sliding_position_equals_direct_sum() {
        // max_hour = window + 1 = 4
        let s = series(&[(0, 0), (1, 11), (2, 7), (1, 3), (3, 40)]);
        let results: Vec<_> = WindowAverages::new(&s, Window::new(3).unwrap()).collect();
        assert_eq!(results.len(), 2);
        let direct: HourAggregate = s.as_slice()[1..=3].iter().sum();
        assert_eq!(results[0].average_error, direct.average());
    }

    #[test]
    fn exact_size_matches_yielded_count() {
        let s = series(&[(0, 0); 20]);
        let mut it = WindowAverages::new(&s, Window::new(5).unwrap());
        assert_eq!(it.regime(), Regime::Sliding);
        assert_eq!(it.len(), 15);
        it.next();
        assert_eq!(it.len(), 14);
        assert_eq!(it.count(), 14);
    }

    #[test]
    fn window_serde_rejects_zero() {
        assert!(serde_json::from_str::<Window>("0").is_err());
        let w: Window = serde_json::from_str("6").unwrap();
        assert_eq!(w.hours(), 6);
        assert_eq!(serde_json::to_string(&w).unwrap(), "6");
    }
}
