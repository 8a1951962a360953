//! In-memory pipeline: predicted lines → index → error series → windows.

use crate::domain::Hour;
use crate::error::EngineError;
use crate::index::PredictionIndex;
use crate::parse::ParseOptions;
use crate::series::ErrorSeries;
use crate::window::{Regime, Window, WindowAverages};

/// Everything needed to produce window results for one run.
///
/// The prediction index is dropped once the series is built; only its
/// size is kept.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub series: ErrorSeries,
    pub window: Window,
    pub predicted_pairs: usize,
}

impl Evaluation {
    pub fn new(series: ErrorSeries, window: Window, predicted_pairs: usize) -> Self {
        Self {
            series,
            window,
            predicted_pairs,
        }
    }

    pub fn max_hour(&self) -> Hour {
        self.series.max_hour()
    }

    pub fn regime(&self) -> Regime {
        Regime::select(self.max_hour(), self.window)
    }

    /// Lazily computed window results.
    pub fn windows(&self) -> WindowAverages<'_> {
        WindowAverages::new(&self.series, self.window)
    }
}

/// Run the whole engine over in-memory streams.
///
/// `actual` must be in non-decreasing hour order.
pub fn evaluate<P, A, SP, SA>(
    predicted: P,
    actual: A,
    window: Window,
    opts: &ParseOptions,
) -> Result<Evaluation, EngineError>
where
    P: IntoIterator<Item = SP>,
    SP: AsRef<str>,
    A: IntoIterator<Item = SA>,
    SA: AsRef<str>,
{
    let index = PredictionIndex::build(predicted, opts)?;
    let series = ErrorSeries::build(actual, &index, opts)?;
    Ok(Evaluation::new(series, window, index.len()))
}
