//! Naive reference averager.
//!
//! Recomputes every window from scratch: O(max_hour × window). Slow on
//! purpose; it is the oracle the incremental [`WindowAverages`] is checked
//! against and the baseline it is benchmarked against.
//!
//! [`WindowAverages`]: crate::window::WindowAverages

use crate::domain::HourAggregate;
use crate::series::ErrorSeries;
use crate::window::{Regime, Window, WindowResult};

pub fn naive_window_averages(series: &ErrorSeries, window: Window) -> Vec<WindowResult> {
    let hours = series.as_slice();
    let max_hour = series.max_hour();
    let len = window.hours();

    match Regime::select(max_hour, window) {
        Regime::Sliding => (1..=max_hour - len + 1)
            .map(|start| {
                let end = start + len - 1;
                let sum: HourAggregate = hours[start as usize..=end as usize].iter().sum();
                WindowResult {
                    window_start: start,
                    window_end: end,
                    average_error: sum.average(),
                }
            })
            .collect(),
        Regime::Partial => {
            let sum: HourAggregate = hours[1..].iter().sum();
            vec![WindowResult {
                window_start: 1,
                window_end: len,
                average_error: sum.average(),
            }]
        }
    }
}
