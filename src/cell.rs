use crate::column::ColumnId;
use crate::layout_types::Rect;
use crate::photo::Photo;

/// Stable handle to a cell in a page's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

/// A rectangular slot holding one photo, spanning one or two adjacent
/// columns.
///
/// Width is never stored; it is always recomputed from the current parent
/// widths, so a global page rescale moves width and height together and the
/// cell's displayed ratio is preserved.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) height: f64,
    /// Parent columns, left to right. A second parent means the cell is
    /// extended: exactly one `Occupant::Extent` referencing it lives there.
    pub(crate) parents: (ColumnId, Option<ColumnId>),
    pub(crate) photo: Photo,
}

impl Cell {
    pub(crate) fn scale(&mut self, alpha: f64) {
        self.height *= alpha;
    }

    pub(crate) fn is_extended(&self) -> bool {
        self.parents.1.is_some()
    }

    /// Ratio the photograph wants, as opposed to the ratio the cell has.
    pub(crate) fn wanted_ratio(&self) -> f64 {
        self.photo.ratio()
    }
}

/// One slot in a column's top-to-bottom occupant list.
///
/// An `Extent` mirrors a two-column cell into its second column; its height
/// and y always read through to the origin cell. Extents are not resizable
/// and never merge into further multi-column cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Cell(CellId),
    Extent(CellId),
}

impl Occupant {
    /// The real cell behind this occupant (an extent resolves to its origin).
    pub(crate) fn cell_id(self) -> CellId {
        match self {
            Occupant::Cell(id) | Occupant::Extent(id) => id,
        }
    }

    pub(crate) fn is_extension(self) -> bool {
        matches!(self, Occupant::Extent(_))
    }
}

/// Crop rectangle for a photo of ratio `wanted_ratio` shown inside `frame`.
///
/// The content area always covers the frame so no blank space shows: a
/// photo too thick to fill the height keeps the frame height and widens,
/// centered horizontally; a photo too tall keeps the frame width and
/// heightens, centered vertically.
pub(crate) fn content_rect(frame: Rect, wanted_ratio: f64) -> Rect {
    let actual_ratio = frame.height / frame.width;
    if wanted_ratio < actual_ratio {
        let width = frame.height / wanted_ratio;
        Rect::new(
            frame.x - (width - frame.width) / 2.0,
            frame.y,
            width,
            frame.height,
        )
    } else if wanted_ratio > actual_ratio {
        let height = frame.width * wanted_ratio;
        Rect::new(
            frame.x,
            frame.y - (height - frame.height) / 2.0,
            frame.width,
            height,
        )
    } else {
        frame
    }
}
