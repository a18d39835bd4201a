//! Comparison report structures.

use std::fmt;

use kairos_arima::{Order, SeasonalOrder};
use serde::Serialize;

use crate::error::EvaluateError;

const HEADERS: [&str; 6] = [
    "Model",
    "Order",
    "Seasonal_Order",
    "AIC (Train)",
    "RMSE (Test)",
    "MAPE % (Test)",
];

/// Scores of one model family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    /// `"ARIMA"` or `"SARIMA"`.
    pub label: String,
    /// Non-seasonal `(p, d, q)` of the selected model.
    pub order: Order,
    /// Seasonal `(P, D, Q, m)`, `None` for the ARIMA row.
    pub seasonal_order: Option<SeasonalOrder>,
    /// AIC of the selected model on the training data.
    pub aic: f64,
    /// RMSE on the test data.
    pub rmse: f64,
    /// MAPE (percent) on the test data.
    pub mape: f64,
}

impl ScoreRow {
    fn cells(&self) -> [String; 6] {
        [
            self.label.clone(),
            self.order.to_string(),
            self.seasonal_order
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
            format!("{:.6}", self.aic),
            format!("{:.6}", self.rmse),
            format!("{:.6}", self.mape),
        ]
    }
}

/// Read-only table of [`ScoreRow`]s.
///
/// `Display` renders a fixed-width, right-aligned text table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    rows: Vec<ScoreRow>,
}

impl ComparisonTable {
    /// Builds a table from rows in display order.
    pub fn new(rows: Vec<ScoreRow>) -> Self {
        Self { rows }
    }

    /// Returns the rows in display order.
    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    /// Returns the row with the given label.
    pub fn row(&self, label: &str) -> Option<&ScoreRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Serialize the table to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, EvaluateError> {
        serde_json::to_string_pretty(self).map_err(|e| EvaluateError::Serialization {
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 6]> = self.rows.iter().map(ScoreRow::cells).collect();
        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, row: &[&str]| -> fmt::Result {
            for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
                if i > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{cell:>width$}")?;
            }
            writeln!(f)
        };

        line(f, &HEADERS)?;
        for row in &cells {
            let refs: Vec<&str> = row.iter().map(String::as_str).collect();
            line(f, &refs)?;
        }
        Ok(())
    }
}
