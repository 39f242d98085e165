use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::evaluation::RocCurve;

/// Logical drawing area for the ROC chart. Units are whatever the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Maps ROC samples onto the canvas, one point per sample, in the order given.
///
/// The y axis is inverted so `tpr = 1` lands near the top edge.
/// No smoothing or re-sorting: callers supply samples ordered by `fpr`.
pub fn project(curve: &RocCurve, canvas: &Canvas) -> Result<Vec<PlotPoint>, EngineError> {
    if curve.fpr.len() != curve.tpr.len() {
        return Err(EngineError::MalformedBundle(format!(
            "roc curve has {} fpr samples but {} tpr samples",
            curve.fpr.len(),
            curve.tpr.len()
        )));
    }

    let span_x = canvas.width - 2.0 * canvas.padding;
    let span_y = canvas.height - 2.0 * canvas.padding;

    Ok(curve
        .fpr
        .iter()
        .zip(&curve.tpr)
        .map(|(fpr, tpr)| PlotPoint {
            x: canvas.padding + fpr * span_x,
            y: canvas.height - canvas.padding - tpr * span_y,
        })
        .collect())
}

/// SVG path data for a polyline through `points` (`M x y L x y ...`).
pub fn path_data(points: &[PlotPoint]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        // writing into a String cannot fail
        let _ = write!(d, "{cmd} {} {}", p.x, p.y);
    }
    d
}

/// The chance diagonal from `(0, 0)` to `(1, 1)`.
pub fn diagonal(canvas: &Canvas) -> [PlotPoint; 2] {
    [
        PlotPoint {
            x: canvas.padding,
            y: canvas.height - canvas.padding,
        },
        PlotPoint {
            x: canvas.width - canvas.padding,
            y: canvas.padding,
        },
    ]
}
