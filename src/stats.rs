use dnotation_roll::{BaseRoller, EvaluationError, Expression, ExpressionEvaluate};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;

/// Widest result range written as a dense array.
pub const MAX_SPAN: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("results span {span} values, more than the {limit} a histogram can hold")]
    SpanTooWide { span: u128, limit: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// How often each result came up over repeated evaluations of one expression.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<i64, i64>,
}

impl Histogram {
    pub fn sample(
        roller: &BaseRoller,
        expression: &Expression,
        samples: u32,
    ) -> Result<Histogram, EvaluationError> {
        let mut histogram = Histogram::default();
        for _ in 0..samples {
            let result = expression.evaluate(roller)?;
            *histogram.counts.entry(result.value).or_insert(0) += 1;
        }
        log::debug!(
            "sampled {} rolls of {} into {} buckets",
            samples,
            expression,
            histogram.counts.len()
        );
        Ok(histogram)
    }

    /// Element 0 holds the smallest result, followed by the count of every
    /// result from there up to the largest one.
    pub fn to_dense(&self) -> Result<Vec<i64>, HistogramError> {
        let (min, max) = match (self.counts.keys().next(), self.counts.keys().next_back()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => return Ok(Vec::new()),
        };
        let span = (i128::from(max) - i128::from(min) + 1) as u128;
        if span > u128::from(MAX_SPAN) {
            return Err(HistogramError::SpanTooWide {
                span,
                limit: MAX_SPAN,
            });
        }
        let mut dense = vec![min];
        dense.extend((min..=max).map(|value| self.counts.get(&value).copied().unwrap_or(0)));
        Ok(dense)
    }

    pub fn write_npy(&self, path: &Path) -> Result<(), HistogramError> {
        npy::to_file(path, self.to_dense()?)?;
        Ok(())
    }
}
