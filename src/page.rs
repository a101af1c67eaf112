//! Page grid: cell placement, bottom-hole repair and height normalization.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::RngExt;

use crate::cell::{content_rect, Cell, CellId, Occupant};
use crate::column::{Column, ColumnId};
use crate::layout_types::{
    CellGeometry, ColumnGeometry, LayoutError, LayoutResult, PageGeometry, Rect,
};
use crate::photo::Photo;

/// The shared arena behind [`PageBuilder`] and [`Page`].
///
/// Columns and cells live in index arenas; `order` is the left-to-right
/// column sequence. Removing an empty column only drops it from `order`,
/// so handles held by cells never dangle. Extents are not arena entries:
/// they are `Occupant::Extent` slots carrying their origin's id.
#[derive(Debug, Clone)]
struct Grid {
    target_ratio: f64,
    order: Vec<ColumnId>,
    columns: Vec<Column>,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(total_width: f64, target_ratio: f64, column_count: usize) -> Self {
        let column_count = column_count.max(1);
        let column_width = total_width / column_count as f64;
        Grid {
            target_ratio,
            order: (0..column_count).map(ColumnId).collect(),
            columns: (0..column_count).map(|_| Column::new(column_width)).collect(),
            cells: Vec::new(),
        }
    }

    fn width(&self) -> f64 {
        self.order.iter().map(|&id| self.columns[id.0].width).sum()
    }

    fn height(&self) -> f64 {
        self.order
            .iter()
            .map(|&id| self.column_height(id))
            .fold(0.0, f64::max)
    }

    // Column geometry, all derived on read.

    fn column_x(&self, col: ColumnId) -> f64 {
        self.order
            .iter()
            .take_while(|&&id| id != col)
            .map(|&id| self.columns[id.0].width)
            .sum()
    }

    fn column_height(&self, col: ColumnId) -> f64 {
        let occupants = &self.columns[col.0].occupants;
        if occupants.is_empty() {
            return 0.0;
        }
        let last = occupants.len() - 1;
        self.occupant_y(col, last) + self.occupant_height(col, last)
    }

    fn order_position(&self, col: ColumnId) -> usize {
        self.order
            .iter()
            .position(|&id| id == col)
            .expect("column missing from page ordering")
    }

    fn left_neighbor(&self, col: ColumnId) -> Option<ColumnId> {
        let position = self.order_position(col);
        (position > 0).then(|| self.order[position - 1])
    }

    fn right_neighbor(&self, col: ColumnId) -> Option<ColumnId> {
        let position = self.order_position(col);
        self.order.get(position + 1).copied()
    }

    // Occupant geometry. An extent's y is its origin's y in the origin's
    // own column, so these walks can cross columns; they only ever recurse
    // leftward and terminate.

    fn occupant_height(&self, col: ColumnId, index: usize) -> f64 {
        self.cells[self.columns[col.0].occupants[index].cell_id().0].height
    }

    fn occupant_y(&self, col: ColumnId, index: usize) -> f64 {
        match self.columns[col.0].occupants[index] {
            Occupant::Extent(origin) => self.cell_y(origin),
            Occupant::Cell(_) => {
                if index == 0 {
                    0.0
                } else {
                    self.occupant_y(col, index - 1) + self.occupant_height(col, index - 1)
                }
            }
        }
    }

    fn cell_y(&self, id: CellId) -> f64 {
        let col = self.cells[id.0].parents.0;
        let index = self
            .position_in_column(col, Occupant::Cell(id))
            .expect("cell missing from its parent column");
        self.occupant_y(col, index)
    }

    fn cell_x(&self, id: CellId) -> f64 {
        self.column_x(self.cells[id.0].parents.0)
    }

    fn cell_width(&self, id: CellId) -> f64 {
        let (first, second) = self.cells[id.0].parents;
        let mut width = self.columns[first.0].width;
        if let Some(second) = second {
            width += self.columns[second.0].width;
        }
        width
    }

    fn cell_frame(&self, id: CellId) -> Rect {
        Rect::new(
            self.cell_x(id),
            self.cell_y(id),
            self.cell_width(id),
            self.cells[id.0].height,
        )
    }

    fn position_in_column(&self, col: ColumnId, occupant: Occupant) -> Option<usize> {
        self.columns[col.0]
            .occupants
            .iter()
            .position(|&o| o == occupant)
    }

    /// Occupant directly below `id` in its first parent column.
    fn cell_bottom_neighbor(&self, id: CellId) -> Option<Occupant> {
        let col = self.cells[id.0].parents.0;
        let index = self.position_in_column(col, Occupant::Cell(id))?;
        self.columns[col.0].occupants.get(index + 1).copied()
    }

    /// Occupant directly below `origin`'s extent in the second parent column.
    fn extent_bottom_neighbor(&self, origin: CellId) -> Option<Occupant> {
        let col = self.cells[origin.0].parents.1?;
        let index = self.position_in_column(col, Occupant::Extent(origin))?;
        self.columns[col.0].occupants.get(index + 1).copied()
    }

    /// Occupant directly above `origin`'s extent in the second parent column.
    fn extent_top_neighbor(&self, origin: CellId) -> Option<Occupant> {
        let col = self.cells[origin.0].parents.1?;
        let index = self.position_in_column(col, Occupant::Extent(origin))?;
        (index > 0).then(|| self.columns[col.0].occupants[index - 1])
    }

    // Placement.

    /// The column with the lowest current height; exact ties are broken
    /// uniformly at random.
    fn next_free_column(&self, rng: &mut impl Rng) -> ColumnId {
        let minimum = self
            .order
            .iter()
            .map(|&id| self.column_height(id))
            .fold(f64::INFINITY, f64::min);
        let candidates: Vec<ColumnId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.column_height(id) == minimum)
            .collect();
        *candidates.choose(rng).expect("page has no columns")
    }

    fn add_cell_single(&mut self, col: ColumnId, photo: Photo) {
        let height = self.columns[col.0].width * photo.ratio();
        let id = CellId(self.cells.len());
        self.cells.push(Cell {
            height,
            parents: (col, None),
            photo,
        });
        self.columns[col.0].occupants.push(Occupant::Cell(id));
    }

    fn add_cell_multi(&mut self, first: ColumnId, second: ColumnId, photo: Photo) {
        let width = self.columns[first.0].width + self.columns[second.0].width;
        let height = width * photo.ratio();
        let id = CellId(self.cells.len());
        self.cells.push(Cell {
            height,
            parents: (first, Some(second)),
            photo,
        });
        self.columns[first.0].occupants.push(Occupant::Cell(id));
        self.columns[second.0].occupants.push(Occupant::Extent(id));
    }

    /// Places a photo in the best computed spot, merging into a two-column
    /// cell when a neighbor's height is close enough and the random gate
    /// (biased toward landscape photos) allows it.
    fn add_cell(&mut self, photo: Photo, rng: &mut impl Rng) {
        let col = self.next_free_column(rng);
        let col_height = self.column_height(col);
        let col_width = self.columns[col.0].width;
        if 2.0 * rng.random::<f64>() > photo.ratio() {
            if let Some(left) = self.left_neighbor(col) {
                if (col_height - self.column_height(left)).abs() < 0.5 * col_width {
                    return self.add_cell_multi(left, col, photo);
                }
            }
            if let Some(right) = self.right_neighbor(col) {
                if (col_height - self.column_height(right)).abs() < 0.5 * col_width {
                    return self.add_cell_multi(col, right, photo);
                }
            }
        }
        self.add_cell_single(col, photo);
    }

    // Adjustment passes.

    fn remove_empty_columns(&mut self) {
        let columns = &self.columns;
        self.order.retain(|&id| !columns[id.0].occupants.is_empty());
    }

    fn remove_occupant(&mut self, col: ColumnId, occupant: Occupant) {
        if let Some(index) = self.position_in_column(col, occupant) {
            self.columns[col.0].occupants.remove(index);
        }
    }

    /// Repairs bottom misalignments left behind by two-column cells.
    ///
    /// One pass over the columns, left to right, at most one case per
    /// column; residual holes on pathological height distributions are a
    /// preserved limitation of the algorithm, not iterated to a fixpoint.
    fn remove_bottom_holes(&mut self) {
        for col in self.order.clone() {
            let occupants = &self.columns[col.0].occupants;
            if occupants.len() < 2 {
                continue;
            }
            let bottom = occupants[occupants.len() - 1];
            let above = occupants[occupants.len() - 2];

            match bottom {
                // Case A: a plain cell sits at the bottom of a hole.
                Occupant::Cell(cell) if !self.cells[cell.0].is_extended() => match above {
                    // A1: the cell above is extended and nothing hangs
                    // under its extent; grow the bottom cell rightward to
                    // fill the hole.
                    Occupant::Cell(top)
                        if self.cells[top.0].is_extended()
                            && self.extent_bottom_neighbor(top).is_none() =>
                    {
                        if let Some(right) = self.right_neighbor(col) {
                            self.columns[right.0].occupants.push(Occupant::Extent(cell));
                            self.cells[cell.0].parents = (col, Some(right));
                            debug!("extended bottom cell of column {} rightward", col.0);
                        }
                    }
                    // A2: the cell sits under an extent whose origin has
                    // nothing below it; move the cell leftward under the
                    // origin and leave an extent in its place.
                    Occupant::Extent(origin) if self.cell_bottom_neighbor(origin).is_none() => {
                        if let Some(left) = self.left_neighbor(col) {
                            self.columns[col.0].occupants.pop();
                            self.columns[left.0].occupants.push(Occupant::Cell(cell));
                            self.columns[col.0].occupants.push(Occupant::Extent(cell));
                            self.cells[cell.0].parents = (left, Some(col));
                            debug!("extended bottom cell of column {} leftward", col.0);
                        }
                    }
                    _ => {}
                },
                // Case B: an extended cell sits at the bottom and its
                // extent hangs free; slide the whole cell under the
                // neighboring extended cell.
                Occupant::Cell(cell)
                    if self.cells[cell.0].is_extended()
                        && self.extent_bottom_neighbor(cell).is_none() =>
                {
                    let extent_col = self.cells[cell.0].parents.1.expect("extended cell");
                    let above_extent = self.extent_top_neighbor(cell);
                    let slides_right = matches!(
                        above_extent,
                        Some(Occupant::Cell(top))
                            if self.cells[top.0].is_extended()
                                && self.extent_bottom_neighbor(top).is_none()
                    );
                    if slides_right {
                        // B1: move one column to the right.
                        if let Some(far_right) = self.right_neighbor(extent_col) {
                            self.columns[col.0].occupants.pop();
                            self.remove_occupant(extent_col, Occupant::Extent(cell));
                            self.columns[extent_col.0].occupants.push(Occupant::Cell(cell));
                            self.columns[far_right.0].occupants.push(Occupant::Extent(cell));
                            self.cells[cell.0].parents = (extent_col, Some(far_right));
                            debug!("moved bottom cell of column {} rightward", col.0);
                        }
                    } else if let Occupant::Extent(origin) = above {
                        // B2: mirror of B1, one column to the left.
                        if self.cell_bottom_neighbor(origin).is_none() {
                            if let Some(left) = self.left_neighbor(col) {
                                self.columns[col.0].occupants.pop();
                                self.remove_occupant(extent_col, Occupant::Extent(cell));
                                self.columns[left.0].occupants.push(Occupant::Cell(cell));
                                self.columns[col.0].occupants.push(Occupant::Extent(cell));
                                self.cells[cell.0].parents = (left, Some(col));
                                debug!("moved bottom cell of column {} leftward", col.0);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Normalizes every column to `page width × target ratio` by scaling
    /// the resizable runs between extent anchors.
    fn adjust_column_heights(&mut self) -> LayoutResult<()> {
        let target = self.width() * self.target_ratio;
        for (position, col) in self.order.clone().into_iter().enumerate() {
            let groups = self.columns[col.0]
                .height_groups(target, |origin| {
                    (self.cell_y(origin), self.cells[origin.0].height)
                });
            for group in groups {
                if group.members.is_empty() {
                    continue;
                }
                let total: f64 = group.members.iter().map(|id| self.cells[id.0].height).sum();
                if total == 0.0 {
                    return Err(LayoutError::DegenerateGroup { column: position });
                }
                let alpha = group.span / total;
                for id in group.members {
                    self.cells[id.0].height *= alpha;
                }
            }
        }
        Ok(())
    }

    // Whole-page operations.

    fn scale(&mut self, alpha: f64) {
        for index in 0..self.order.len() {
            let col = self.order[index];
            self.columns[col.0].scale(alpha, &mut self.cells);
        }
    }

    fn scale_to_fit(&mut self, max_width: f64, max_height: Option<f64>) {
        let (width, height) = (self.width(), self.height());
        match max_height {
            Some(max_height) if width * max_height <= height * max_width => {
                self.scale(max_height / height)
            }
            _ => self.scale(max_width / width),
        }
    }

    fn get_cell_at_position(&self, x: f64, y: f64) -> Option<CellId> {
        for &col in &self.order {
            let column_x = self.column_x(col);
            let column_width = self.columns[col.0].width;
            if x >= column_x && x < column_x + column_width {
                for index in 0..self.columns[col.0].occupants.len() {
                    let occupant_y = self.occupant_y(col, index);
                    let occupant_height = self.occupant_height(col, index);
                    if y >= occupant_y && y < occupant_y + occupant_height {
                        return Some(self.columns[col.0].occupants[index].cell_id());
                    }
                }
            }
        }
        None
    }

    fn swap_photos(&mut self, a: CellId, b: CellId) {
        if a == b {
            return;
        }
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.cells.split_at_mut(high);
        std::mem::swap(&mut head[low].photo, &mut tail[0].photo);
    }

    /// Real cells (extents excluded) in render order: per column, top to
    /// bottom.
    fn cells_in_order(&self) -> Vec<CellId> {
        let mut ids = Vec::with_capacity(self.cells.len());
        for &col in &self.order {
            for occupant in &self.columns[col.0].occupants {
                if !occupant.is_extension() {
                    ids.push(occupant.cell_id());
                }
            }
        }
        ids
    }

    fn geometry(&self) -> PageGeometry {
        let columns = self
            .order
            .iter()
            .map(|&id| ColumnGeometry {
                x: self.column_x(id),
                width: self.columns[id.0].width,
                height: self.column_height(id),
            })
            .collect();
        let cells = self
            .cells_in_order()
            .into_iter()
            .map(|id| {
                let frame = self.cell_frame(id);
                CellGeometry {
                    frame,
                    content: content_rect(frame, self.cells[id.0].wanted_ratio()),
                    photo_path: self.cells[id.0].photo.path.clone(),
                    extended: self.cells[id.0].is_extended(),
                }
            })
            .collect();
        PageGeometry {
            width: self.width(),
            height: self.height(),
            columns,
            cells,
        }
    }
}

/// A page being filled with cells, one photo at a time.
///
/// Consuming [`PageBuilder::adjust`] performs cleanup and height
/// normalization and yields the read-only [`Page`]; hit-testing and
/// scaling only exist there, on fully adjusted geometry.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    grid: Grid,
}

impl PageBuilder {
    /// A page of `column_count` equal-width columns (at least one) summing
    /// to `total_width`.
    pub fn new(total_width: f64, target_ratio: f64, column_count: usize) -> Self {
        PageBuilder {
            grid: Grid::new(total_width, target_ratio, column_count),
        }
    }

    pub fn column_count(&self) -> usize {
        self.grid.order.len()
    }

    /// Adds one photo to the page; `rng` drives the min-height tie-break
    /// and the two-column merge decision.
    pub fn add_cell(&mut self, photo: Photo, rng: &mut impl Rng) {
        self.grid.add_cell(photo, rng);
    }

    /// Removes empty columns, repairs bottom holes and normalizes all
    /// column heights to the target ratio.
    pub fn adjust(mut self) -> LayoutResult<Page> {
        self.grid.remove_empty_columns();
        self.grid.remove_bottom_holes();
        self.grid.adjust_column_heights()?;
        Ok(Page { grid: self.grid })
    }
}

/// An adjusted, renderable page.
///
/// Geometry is read-only; the only mutations left are uniform scaling and
/// photo swaps, neither of which disturbs the layout structure.
#[derive(Debug, Clone)]
pub struct Page {
    grid: Grid,
}

impl Page {
    pub fn width(&self) -> f64 {
        self.grid.width()
    }

    pub fn height(&self) -> f64 {
        self.grid.height()
    }

    pub fn ratio(&self) -> f64 {
        self.grid.height() / self.grid.width()
    }

    pub fn column_count(&self) -> usize {
        self.grid.order.len()
    }

    pub fn cell_count(&self) -> usize {
        self.grid.cells.len()
    }

    /// Real cells in render order (extents resolve to their origin and are
    /// not listed separately).
    pub fn cells(&self) -> Vec<CellId> {
        self.grid.cells_in_order()
    }

    pub fn cell_frame(&self, id: CellId) -> Rect {
        self.grid.cell_frame(id)
    }

    /// Crop rectangle of the cell's photo; covers the frame, overflowing
    /// it on at most one axis.
    pub fn cell_content(&self, id: CellId) -> Rect {
        let frame = self.grid.cell_frame(id);
        content_rect(frame, self.grid.cells[id.0].wanted_ratio())
    }

    pub fn photo(&self, id: CellId) -> &Photo {
        &self.grid.cells[id.0].photo
    }

    /// The cell under (x, y), if any; a hit on an extent yields its origin
    /// cell so callers always manipulate real cells.
    pub fn get_cell_at_position(&self, x: f64, y: f64) -> Option<CellId> {
        self.grid.get_cell_at_position(x, y)
    }

    /// Exchanges the photo payloads of two cells without touching geometry.
    pub fn swap_photos(&mut self, a: CellId, b: CellId) {
        self.grid.swap_photos(a, b);
    }

    /// Uniformly scales the whole page.
    pub fn scale(&mut self, alpha: f64) {
        self.grid.scale(alpha);
    }

    /// Scales the page to fit inside the given bounds, preserving its
    /// ratio; without `max_height` the width alone decides the factor.
    pub fn scale_to_fit(&mut self, max_width: f64, max_height: Option<f64>) {
        self.grid.scale_to_fit(max_width, max_height);
    }

    pub fn geometry(&self) -> PageGeometry {
        self.grid.geometry()
    }
}
