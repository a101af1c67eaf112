use crate::cell::{Cell, CellId, Occupant};

/// Stable handle to a column in a page's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub(crate) usize);

/// An ordered vertical stack of occupants sharing a fixed width.
///
/// No y coordinate is stored anywhere; vertical geometry is always derived
/// by walking the occupant list from the top.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) width: f64,
    pub(crate) occupants: Vec<Occupant>,
}

impl Column {
    pub(crate) fn new(width: f64) -> Self {
        Column {
            width,
            occupants: Vec::new(),
        }
    }

    /// Scales the column width and every cell anchored here. Extents are
    /// left alone: their origin is scaled in its own column.
    pub(crate) fn scale(&mut self, alpha: f64, cells: &mut [Cell]) {
        self.width *= alpha;
        for occupant in &self.occupants {
            if let Occupant::Cell(id) = occupant {
                cells[id.0].scale(alpha);
            }
        }
    }

    /// Partitions the occupant list into maximal runs of freely resizable
    /// cells separated by extents.
    ///
    /// A run spans from its start y (0, or just below the previous extent)
    /// to the next extent's y; the final run ends at `target_height`.
    /// `extent_geometry` resolves an extent's origin to its (y, height) in
    /// the origin's own column, which is what pins the run boundaries.
    pub(crate) fn height_groups(
        &self,
        target_height: f64,
        extent_geometry: impl Fn(CellId) -> (f64, f64),
    ) -> Vec<HeightGroup> {
        let mut groups = Vec::new();
        let mut current = HeightGroup::starting_at(0.0);
        for occupant in &self.occupants {
            match *occupant {
                Occupant::Cell(id) => current.members.push(id),
                Occupant::Extent(origin) => {
                    let (y, height) = extent_geometry(origin);
                    current.span = y - current.start;
                    groups.push(std::mem::replace(
                        &mut current,
                        HeightGroup::starting_at(y + height),
                    ));
                }
            }
        }
        current.span = target_height - current.start;
        groups.push(current);
        groups
    }
}

/// A maximal run of resizable cells between two extent anchors.
#[derive(Debug)]
pub(crate) struct HeightGroup {
    pub(crate) start: f64,
    pub(crate) span: f64,
    pub(crate) members: Vec<CellId>,
}

impl HeightGroup {
    fn starting_at(start: f64) -> Self {
        HeightGroup {
            start,
            span: 0.0,
            members: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_groups_without_extents() {
        let column = Column {
            width: 1.0,
            occupants: vec![
                Occupant::Cell(CellId(0)),
                Occupant::Cell(CellId(1)),
                Occupant::Cell(CellId(2)),
            ],
        };
        let groups = column.height_groups(9.0, |_| unreachable!("no extents"));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start, 0.0);
        assert_eq!(groups[0].span, 9.0);
        assert_eq!(groups[0].members, vec![CellId(0), CellId(1), CellId(2)]);
    }

    #[test]
    fn test_height_groups_split_by_extent() {
        // [cell, extent(y=2,h=3), cell, cell] with target 10:
        // run one spans 0..2, run two spans 5..10.
        let column = Column {
            width: 1.0,
            occupants: vec![
                Occupant::Cell(CellId(0)),
                Occupant::Extent(CellId(9)),
                Occupant::Cell(CellId(1)),
                Occupant::Cell(CellId(2)),
            ],
        };
        let groups = column.height_groups(10.0, |origin| {
            assert_eq!(origin, CellId(9));
            (2.0, 3.0)
        });
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].span, 2.0);
        assert_eq!(groups[0].members, vec![CellId(0)]);
        assert_eq!(groups[1].start, 5.0);
        assert_eq!(groups[1].span, 5.0);
        assert_eq!(groups[1].members, vec![CellId(1), CellId(2)]);
    }

    #[test]
    fn test_height_groups_trailing_extent_leaves_empty_run() {
        let column = Column {
            width: 1.0,
            occupants: vec![Occupant::Cell(CellId(0)), Occupant::Extent(CellId(1))],
        };
        let groups = column.height_groups(8.0, |_| (4.0, 4.0));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].span, 4.0);
        assert!(groups[1].members.is_empty());
        assert_eq!(groups[1].start, 8.0);
        assert_eq!(groups[1].span, 0.0);
    }

    #[test]
    fn test_height_groups_adjacent_extents() {
        // An extent directly following another produces an empty run that
        // callers must skip.
        let column = Column {
            width: 1.0,
            occupants: vec![
                Occupant::Extent(CellId(0)),
                Occupant::Extent(CellId(1)),
                Occupant::Cell(CellId(2)),
            ],
        };
        let groups = column.height_groups(12.0, |origin| match origin {
            CellId(0) => (0.0, 3.0),
            _ => (3.0, 4.0),
        });
        assert_eq!(groups.len(), 3);
        assert!(groups[0].members.is_empty());
        assert!(groups[1].members.is_empty());
        assert_eq!(groups[2].start, 7.0);
        assert_eq!(groups[2].span, 5.0);
        assert_eq!(groups[2].members, vec![CellId(2)]);
    }
}
