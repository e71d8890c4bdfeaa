use super::state::{Position, Snake};

/// What a single grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Snake,
    Food,
}

/// Row-major projection of the snake and food onto the board.
///
/// Never stored as authoritative state; rebuild it with [`Grid::render`]
/// whenever the snake or food changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn render(rows: usize, cols: usize, snake: &Snake, food: Position) -> Self {
        let mut grid = Self::empty(rows, cols);

        for segment in snake.segments() {
            grid.set(*segment, Cell::Snake);
        }

        // Food goes last so it shows through a head that is about to eat it
        grid.set(food, Cell::Food);

        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols.max(1))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        pos.is_within(self.rows, self.cols)
            .then(|| pos.row as usize * self.cols + pos.col as usize)
    }
}
