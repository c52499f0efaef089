use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Construction errors for [`UniformGrid`]. The grid is defined only for
/// positive, finite dimensions; anything else is rejected up front rather
/// than producing a degenerate zero-cell grid.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be positive and finite (width={0}, height={1})")]
    BadDimensions(f32, f32),

    #[error("cell size must be positive and finite (got {0})")]
    BadCellSize(f32),
}

/// Identifies one grid cell by its `(col, row)` coordinates packed into a
/// single integer, so it can serve as a cheap hash-map key. Packing is
/// injective over the full `i32` range, so cells at negative coordinates
/// (positions outside the nominal bounds) key correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey(u64);

impl CellKey {
    pub fn new(col: i32, row: i32) -> Self {
        Self((u64::from(col as u32) << 32) | u64::from(row as u32))
    }

    pub fn col(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub fn row(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// Uniform grid spatial index over fixed-size square cells.
///
/// Holds no notion of entity movement or removal: the owning frame loop
/// calls [`UniformGrid::clear`] then re-inserts every live entity, once per
/// step. Entities are referenced by caller-assigned `u32` ids (typically
/// indices into the caller's particle storage).
///
/// `cols`/`rows` are informational; insertion is defined for any finite
/// coordinate, including positions outside `[0,width) x [0,height)`.
pub struct UniformGrid {
    width: f32,
    height: f32,
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: HashMap<CellKey, Vec<u32>>,
    trace: Option<HashSet<CellKey>>,
}

impl UniformGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Result<Self, GridError> {
        // `>` written this way so NaN fails the check too.
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(GridError::BadDimensions(width, height));
        }
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(GridError::BadCellSize(cell_size));
        }

        Ok(Self {
            width,
            height,
            cell_size,
            cols: (width / cell_size).ceil() as usize,
            rows: (height / cell_size).ceil() as usize,
            cells: HashMap::new(),
            trace: None,
        })
    }

    /// Enables the searched-cell trace, a diagnostic record of every cell
    /// key visited by [`UniformGrid::for_each_nearby`] since the last
    /// [`UniformGrid::clear`]. Off by default: it is a visualization aid,
    /// not part of the query algorithm.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(HashSet::new());
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Computes the cell key for a position. Floor semantics: negative
    /// coordinates round toward negative infinity, so `-0.001` lands in
    /// column `-1`, not column `0`.
    #[inline]
    pub fn cell_key(&self, x: f32, y: f32) -> CellKey {
        CellKey::new(
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Empties every bucket and the searched-cell trace. Bucket allocations
    /// are retained, so a steady-state frame loop reaches a fixed set of
    /// allocations and stops touching the heap.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        if let Some(trace) = &mut self.trace {
            trace.clear();
        }
    }

    /// Appends `id` to the bucket of the cell containing `(x, y)`. No
    /// dedup, no bounds check; bucket order is insertion order.
    pub fn insert(&mut self, id: u32, x: f32, y: f32) {
        let key = self.cell_key(x, y);
        self.cells.entry(key).or_default().push(id);
    }

    /// Invokes `visit` for every entity within `cell_radius` cells of the
    /// cell containing `(x, y)`, scanning the `(2r+1)²` cell square
    /// inclusive. A radius of 0 scans only the center cell.
    ///
    /// The querying entity itself is visited too if it was inserted at a
    /// position sharing a scanned cell; callers wanting self-exclusion must
    /// filter by id.
    pub fn for_each_nearby<F: FnMut(u32)>(
        &mut self,
        x: f32,
        y: f32,
        cell_radius: i32,
        mut visit: F,
    ) {
        let center = self.cell_key(x, y);

        for dy in -cell_radius..=cell_radius {
            for dx in -cell_radius..=cell_radius {
                // Saturating: huge coordinates pin the cell index at the
                // i32 edge, and offsets from there must not overflow.
                let key = CellKey::new(
                    center.col().saturating_add(dx),
                    center.row().saturating_add(dy),
                );

                if let Some(trace) = &mut self.trace {
                    trace.insert(key);
                }

                if let Some(bucket) = self.cells.get(&key) {
                    for &id in bucket {
                        visit(id);
                    }
                }
            }
        }
    }

    /// Cell keys visited by queries since the last clear. Empty when the
    /// trace was never enabled via [`UniformGrid::with_trace`].
    pub fn searched_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.trace.iter().flat_map(|t| t.iter().copied())
    }

    pub fn searched_cell_count(&self) -> usize {
        self.trace.as_ref().map_or(0, HashSet::len)
    }

    /// Number of cells currently holding at least one entity.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }
}
