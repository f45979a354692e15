use crate::model::{Grid, ParamError, WeightParams, GRID_SIZE, PALETTE_LEN};
use log::{debug, trace, warn};
use rand::Rng;

pub(crate) type Weights = [f64; PALETTE_LEN];

/// Every weight vector spreads exactly this much over the palette.
pub(crate) const WEIGHT_TOTAL: f64 = 100.0;

/// Validate `x`/`y`, then repaint the whole grid. Bad input leaves the grid as it was.
pub(crate) fn recolor<R: Rng + ?Sized>(
    grid: &mut Grid,
    x: f64,
    y: f64,
    rng: &mut R,
) -> Result<WeightParams, ParamError> {
    let params = WeightParams::new(x, y)?;
    color_grid(grid, params, rng);
    Ok(params)
}

/// Same as [`recolor`] for raw edit-box text.
pub(crate) fn recolor_from_text<R: Rng + ?Sized>(
    grid: &mut Grid,
    x: &str,
    y: &str,
    rng: &mut R,
) -> Result<WeightParams, ParamError> {
    let params = WeightParams::parse(x, y)?;
    color_grid(grid, params, rng);
    Ok(params)
}

/// Row-major pass: each tile is drawn after its up and left neighbors,
/// whose colors bias the draw.
pub(crate) fn color_grid<R: Rng + ?Sized>(grid: &mut Grid, params: WeightParams, rng: &mut R) {
    if params.yields_negative_weights() {
        warn!(
            "x={} y={} produce negative tile weights, colors will be skewed",
            params.x(),
            params.y()
        );
    }

    for row in 1..=GRID_SIZE {
        for col in 1..=GRID_SIZE {
            let color = if row == 1 && col == 1 {
                rng.gen_range(0..PALETTE_LEN)
            } else {
                let left = if col > 1 { grid.color_at(row, col - 1) } else { None };
                let up = if row > 1 { grid.color_at(row - 1, col) } else { None };
                let weights = neighbor_weights(left, up, params);
                debug_assert!(
                    (weights.iter().sum::<f64>() - WEIGHT_TOTAL).abs() <= sum_tolerance(params),
                    "weights {weights:?} do not sum to {WEIGHT_TOTAL}"
                );
                let roll = rng.gen_range(1..=100);
                let picked = pick_weighted(&weights, roll);
                trace!("({row},{col}) weights={weights:?} roll={roll} -> {picked}");
                picked
            };
            grid.set_color(row, col, color);
        }
    }

    debug!("colored grid with x={} y={}", params.x(), params.y());
}

/// Weight vector for one tile given the palette indices of its left and up neighbors.
///
/// A neighbor color earns `x`; when both neighbors agree their shared color
/// gets `y` in total. Whatever is left of 100 is split evenly among the
/// colors no neighbor has.
pub(crate) fn neighbor_weights(
    left: Option<usize>,
    up: Option<usize>,
    params: WeightParams,
) -> Weights {
    let (x, y) = (params.x(), params.y());
    let mut weights = [0.0; PALETTE_LEN];

    if let Some(li) = left {
        weights[li] += x;
    }
    if let Some(ui) = up {
        weights[ui] += x;
    }

    let fill = match (left, up) {
        (None, None) => WEIGHT_TOTAL / PALETTE_LEN as f64,
        (Some(li), Some(ui)) if li == ui => {
            weights[li] += y - 2.0 * x;
            (WEIGHT_TOTAL - y) / 4.0
        }
        (Some(_), Some(_)) => (WEIGHT_TOTAL - 2.0 * x) / 3.0,
        _ => (WEIGHT_TOTAL - x) / 4.0,
    };

    for (i, w) in weights.iter_mut().enumerate() {
        if Some(i) != left && Some(i) != up {
            *w = fill;
        }
    }
    weights
}

/// Rounding slack for a weight sum; grows with the largest operand since
/// terms of size `x` or `y` cancel down to the total.
fn sum_tolerance(params: WeightParams) -> f64 {
    1e-9 * WEIGHT_TOTAL.max(4.0 * params.x().max(params.y()))
}

/// Cumulative walk: the first index whose running total reaches `roll` wins.
///
/// If rounding leaves the total short of `roll`, the last index with a
/// positive weight takes the remainder.
pub(crate) fn pick_weighted(weights: &Weights, roll: u32) -> usize {
    let roll = f64::from(roll);
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if roll <= cumulative {
            return i;
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(PALETTE_LEN - 1)
}
