//! Fixed-size cell storage for the map.

use no_room_core::{CellCoord, GroundKind, PlacementError, Rect, MENU_COLUMNS};

use crate::actors::PlacedEntity;

/// Number of columns right of the wall column that form the safe zone.
const SAFE_ZONE_COLUMNS: u32 = 2;

/// Offset of the base wall column from the right edge of the grid.
const BASE_WALL_OFFSET: u32 = 3;

/// Single map square.
#[derive(Debug)]
pub(crate) struct Cell {
    pub(crate) ground: GroundKind,
    pub(crate) occupant: Option<PlacedEntity>,
}

/// Dense row-major grid. Cells are allocated once and never move.
#[derive(Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cell_length: f64,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates the grid and applies the initial ground layout.
    pub(crate) fn new(columns: u32, rows: u32, cell_length: f64) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for index in 0..capacity {
            let column = column_of(index, columns);
            cells.push(Cell {
                ground: initial_ground(column, columns),
                occupant: None,
            });
        }

        Self {
            columns,
            rows,
            cell_length,
            cells,
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn cell_length(&self) -> f64 {
        self.cell_length
    }

    pub(crate) fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (coord_at(index, columns), cell))
    }

    /// Occupied cells in row-major order.
    pub(crate) fn occupants_mut(
        &mut self,
    ) -> impl Iterator<Item = (CellCoord, &mut PlacedEntity)> + '_ {
        let columns = self.columns;
        self.cells
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, cell)| {
                cell.occupant
                    .as_mut()
                    .map(|entity| (coord_at(index, columns), entity))
            })
    }

    /// Collider covering the provided cell in logical units.
    pub(crate) fn collider(&self, coord: CellCoord) -> Rect {
        Rect::new(
            f64::from(coord.column()) * self.cell_length,
            f64::from(coord.row()) * self.cell_length,
            self.cell_length,
            self.cell_length,
        )
    }

    /// Collider of the base wall column enemies must not reach.
    pub(crate) fn breach_boundary(&self) -> Rect {
        let column = self.columns.saturating_sub(BASE_WALL_OFFSET);
        Rect::new(
            f64::from(column) * self.cell_length,
            0.0,
            self.cell_length,
            f64::from(self.rows) * self.cell_length,
        )
    }

    /// Verifies that the cell can receive a new occupant.
    pub(crate) fn check_placement(&self, coord: CellCoord) -> Result<(), PlacementError> {
        let cell = self.cell(coord).ok_or(PlacementError::OutOfBounds)?;
        if cell.ground == GroundKind::Wall {
            return Err(PlacementError::WallCell);
        }
        if cell.occupant.is_some() {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }

    /// Stores the entity in a cell previously accepted by [`Grid::check_placement`].
    pub(crate) fn occupy(&mut self, coord: CellCoord, entity: PlacedEntity) {
        if let Some(index) = self.index(coord) {
            if let Some(cell) = self.cells.get_mut(index) {
                cell.occupant = Some(entity);
            }
        }
    }

    /// Destroys the occupant of the cell. Empty cells are left untouched.
    pub(crate) fn remove(&mut self, coord: CellCoord) -> Option<PlacedEntity> {
        let index = self.index(coord)?;
        self.cells.get_mut(index)?.occupant.take()
    }

    /// Converts the first remaining safe zone into a parking lot.
    ///
    /// Cells are scanned column by column, top to bottom within each column.
    /// Returns `None` once no safe zone is left.
    pub(crate) fn convert_next_safe_zone(&mut self) -> Option<CellCoord> {
        for column in 0..self.columns {
            for row in 0..self.rows {
                let coord = CellCoord::new(column, row);
                let Some(index) = self.index(coord) else {
                    continue;
                };
                let cell = &mut self.cells[index];
                if cell.ground == GroundKind::SafeZone {
                    cell.ground = GroundKind::ParkingLot;
                    return Some(coord);
                }
            }
        }
        None
    }

    pub(crate) fn safe_zones_remaining(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.ground == GroundKind::SafeZone)
            .count()
    }

    #[cfg(test)]
    pub(crate) fn set_ground(&mut self, coord: CellCoord, ground: GroundKind) {
        if let Some(index) = self.index(coord) {
            self.cells[index].ground = ground;
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn initial_ground(column: u32, columns: u32) -> GroundKind {
    if column < MENU_COLUMNS {
        return GroundKind::Wall;
    }
    if column + SAFE_ZONE_COLUMNS >= columns {
        return GroundKind::SafeZone;
    }
    if column + BASE_WALL_OFFSET == columns {
        return GroundKind::Wall;
    }
    GroundKind::Default
}

fn column_of(index: usize, columns: u32) -> u32 {
    let width = columns.max(1) as usize;
    (index % width) as u32
}

fn coord_at(index: usize, columns: u32) -> CellCoord {
    let width = columns.max(1) as usize;
    CellCoord::new((index % width) as u32, (index / width) as u32)
}
