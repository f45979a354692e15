use quick_error::quick_error;

pub(crate) const GRID_SIZE: usize = 10;
pub(crate) const PALETTE_LEN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Tile colors, addressed everywhere by their index in this table.
pub(crate) const PALETTE: [Rgb; PALETTE_LEN] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 255),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    row: usize,
    col: usize,
    pub(crate) color: Option<usize>,
}

impl Cell {
    pub(crate) fn row(&self) -> usize {
        self.row
    }
    pub(crate) fn col(&self) -> usize {
        self.col
    }
    pub(crate) fn rgb(&self) -> Option<Rgb> {
        self.color.map(|i| PALETTE[i])
    }
}

/// Fixed 10x10 board. Rows and columns are 1-based, storage is row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new() -> Self {
        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for row in 1..=GRID_SIZE {
            for col in 1..=GRID_SIZE {
                cells.push(Cell {
                    row,
                    col,
                    color: None,
                });
            }
        }
        Self { cells }
    }

    pub(crate) fn idx(row: usize, col: usize) -> Option<usize> {
        if (1..=GRID_SIZE).contains(&row) && (1..=GRID_SIZE).contains(&col) {
            Some((row - 1) * GRID_SIZE + (col - 1))
        } else {
            None
        }
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        Self::idx(row, col).map(|i| &self.cells[i])
    }

    pub(crate) fn color_at(&self, row: usize, col: usize) -> Option<usize> {
        self.get(row, col).and_then(|c| c.color)
    }

    pub(crate) fn set_color(&mut self, row: usize, col: usize, color: usize) {
        debug_assert!(color < PALETTE_LEN, "palette index {color} out of range");
        if let Some(i) = Self::idx(row, col) {
            self.cells[i].color = Some(color);
        }
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn is_fully_colored(&self) -> bool {
        self.cells.iter().all(|c| c.color.is_some())
    }
}

quick_error! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum ParamError {
        NotANumber(field: char, text: String) {
            display("{field} is not a number: {text:?}")
        }
        NotFinite(field: char) {
            display("{field} must be finite")
        }
        Negative(field: char, value: f64) {
            display("{field} must not be negative (got {value})")
        }
    }
}

/// Per-pass weighting inputs. Only constructible from non-negative finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WeightParams {
    x: f64,
    y: f64,
}

impl WeightParams {
    pub(crate) fn new(x: f64, y: f64) -> Result<Self, ParamError> {
        Ok(Self {
            x: check('x', x)?,
            y: check('y', y)?,
        })
    }

    pub(crate) fn parse(x: &str, y: &str) -> Result<Self, ParamError> {
        Self::new(parse_field('x', x)?, parse_field('y', y)?)
    }

    pub(crate) fn x(&self) -> f64 {
        self.x
    }
    pub(crate) fn y(&self) -> f64 {
        self.y
    }

    /// Past these bounds some fill values go negative and the draw gets lopsided.
    pub(crate) fn yields_negative_weights(&self) -> bool {
        self.x > 50.0 || self.y > 100.0
    }
}

fn parse_field(field: char, text: &str) -> Result<f64, ParamError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ParamError::NotANumber(field, text.to_string()))
}

fn check(field: char, v: f64) -> Result<f64, ParamError> {
    if v.is_nan() {
        return Err(ParamError::NotANumber(field, v.to_string()));
    }
    if !v.is_finite() {
        return Err(ParamError::NotFinite(field));
    }
    if v < 0.0 {
        return Err(ParamError::Negative(field, v));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_every_position_once() {
        let g = Grid::new();
        assert_eq!(g.cells().len(), GRID_SIZE * GRID_SIZE);
        for (i, c) in g.cells().iter().enumerate() {
            assert_eq!(Grid::idx(c.row(), c.col()), Some(i));
            assert_eq!(c.color, None);
        }
        assert!(!g.is_fully_colored());
    }

    #[test]
    fn out_of_range_positions() {
        assert_eq!(Grid::idx(0, 1), None);
        assert_eq!(Grid::idx(1, 11), None);
        assert_eq!(Grid::idx(10, 10), Some(99));
        assert!(Grid::new().get(11, 1).is_none());
    }

    #[test]
    fn set_color_resolves_to_palette() {
        let mut g = Grid::new();
        g.set_color(3, 4, 2);
        assert_eq!(g.color_at(3, 4), Some(2));
        assert_eq!(g.get(3, 4).and_then(|c| c.rgb()), Some(Rgb::new(0, 0, 255)));
        g.set_color(10, 10, PALETTE_LEN - 1);
        assert_eq!(g.color_at(10, 10), Some(PALETTE_LEN - 1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "palette index 5 out of range")]
    fn set_color_rejects_unknown_palette_index() {
        Grid::new().set_color(1, 1, PALETTE_LEN);
    }

    #[test]
    fn palette_colors_are_distinct() {
        for i in 0..PALETTE_LEN {
            for j in (i + 1)..PALETTE_LEN {
                assert_ne!(PALETTE[i], PALETTE[j]);
            }
        }
    }

    #[test]
    fn params_reject_bad_input() {
        assert!(WeightParams::parse(" 30 ", "60").is_ok());
        assert_eq!(
            WeightParams::parse("abc", "1"),
            Err(ParamError::NotANumber('x', "abc".to_string()))
        );
        assert_eq!(
            WeightParams::parse("1", "-2"),
            Err(ParamError::Negative('y', -2.0))
        );
        assert!(matches!(
            WeightParams::new(f64::NAN, 1.0),
            Err(ParamError::NotANumber('x', _))
        ));
        assert_eq!(
            WeightParams::new(1.0, f64::INFINITY),
            Err(ParamError::NotFinite('y'))
        );
        assert!(WeightParams::parse("", "1").is_err());
    }

    #[test]
    fn negative_weight_bounds() {
        assert!(!WeightParams::new(50.0, 100.0).unwrap().yields_negative_weights());
        assert!(WeightParams::new(50.5, 0.0).unwrap().yields_negative_weights());
        assert!(WeightParams::new(0.0, 101.0).unwrap().yields_negative_weights());
    }
}
