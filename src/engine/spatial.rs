//! Grid-bucketed index of live creatures for proximity and occupancy queries.
//!
//! Divides the world into square buckets and tracks which creatures are in
//! each one, so a radius query only scans the buckets its bounding box touches.
//! A move can overshoot the border, so positions outside the grid clamp into
//! the edge buckets.

use super::config::SPATIAL_CELL_SIZE;
use super::creature::Rival;

/// A grid-based spatial index. Each bucket holds the creatures inside it.
pub struct SpatialGrid {
    /// Number of buckets in X direction.
    pub cols: usize,
    /// Number of buckets in Y direction.
    pub rows: usize,
    /// Flat array of buckets, indexed by row * cols + col.
    cells: Vec<Vec<Rival>>,
}

impl SpatialGrid {
    /// Create an index covering a `width` x `height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        let cols = bucket_count(width);
        let rows = bucket_count(height);
        SpatialGrid {
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    pub fn insert(&mut self, entry: Rival) {
        let idx = self.bucket_index(entry.x, entry.y);
        self.cells[idx].push(entry);
    }

    /// Remove the entry with `entry.id` from the bucket at `entry`'s position.
    /// Returns false if it was not there.
    pub fn remove(&mut self, entry: &Rival) -> bool {
        let idx = self.bucket_index(entry.x, entry.y);
        let bucket = &mut self.cells[idx];
        match bucket.iter().position(|e| e.id == entry.id) {
            Some(pos) => {
                bucket.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// All entries in buckets touching the square of half-side `radius`
    /// around (x, y). Callers apply the exact distance test themselves.
    pub fn query_radius(&self, x: i32, y: i32, radius: i32) -> Vec<Rival> {
        let radius = radius.max(0);
        let (min_col, min_row) = self.cell_coords(x.saturating_sub(radius), y.saturating_sub(radius));
        let (max_col, max_row) = self.cell_coords(x.saturating_add(radius), y.saturating_add(radius));

        let mut results = Vec::new();
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                results.extend_from_slice(&self.cells[row * self.cols + col]);
            }
        }
        // Bucket order is arbitrary after swap_remove; keep results stable.
        results.sort_by_key(|e| e.id);
        results
    }

    /// Returns true if any indexed creature sits exactly on (x, y).
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cells[self.bucket_index(x, y)]
            .iter()
            .any(|e| e.x == x && e.y == y)
    }

    fn bucket_index(&self, x: i32, y: i32) -> usize {
        let (col, row) = self.cell_coords(x, y);
        row * self.cols + col
    }

    /// Convert grid coordinates to bucket coordinates, clamped to the index bounds.
    fn cell_coords(&self, x: i32, y: i32) -> (usize, usize) {
        let col = x.div_euclid(SPATIAL_CELL_SIZE).clamp(0, self.cols as i32 - 1) as usize;
        let row = y.div_euclid(SPATIAL_CELL_SIZE).clamp(0, self.rows as i32 - 1) as usize;
        (col, row)
    }
}

/// Buckets needed to cover `side` cells; at least one.
fn bucket_count(side: i32) -> usize {
    ((side.max(1) - 1) / SPATIAL_CELL_SIZE + 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, x: i32, y: i32) -> Rival {
        Rival {
            id,
            x,
            y,
            speed: 1,
            size: 1,
        }
    }

    #[test]
    fn test_new_grid() {
        let grid = SpatialGrid::new(40, 20);
        // 40 / 8 = 5 cols, 20 / 8 rounds up to 3 rows
        assert_eq!(grid.cols, 5);
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.cells.len(), 15);
        assert!(grid.cells.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_tiny_grid_has_one_bucket() {
        let grid = SpatialGrid::new(1, 1);
        assert_eq!(grid.cols, 1);
        assert_eq!(grid.rows, 1);
    }

    #[test]
    fn test_insert_and_query() {
        let mut grid = SpatialGrid::new(40, 40);
        grid.insert(entry(1, 2, 2)); // bucket (0,0)
        grid.insert(entry(2, 9, 2)); // bucket (1,0)
        grid.insert(entry(3, 35, 35)); // far corner

        let near = grid.query_radius(3, 3, 6);
        let ids: Vec<u32> = near.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_query_radius_is_coarse_superset() {
        let mut grid = SpatialGrid::new(40, 40);
        grid.insert(entry(1, 7, 7));
        // Same bucket, but well outside radius 1: still returned.
        let hits = grid.query_radius(0, 0, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut grid = SpatialGrid::new(40, 40);
        let a = entry(1, 5, 5);
        let b = entry(2, 6, 5);
        grid.insert(a);
        grid.insert(b);
        assert!(grid.remove(&a));
        assert!(!grid.remove(&a));
        assert_eq!(grid.query_radius(5, 5, 8).len(), 1);
        assert!(!grid.is_occupied(5, 5));
        assert!(grid.is_occupied(6, 5));
    }

    #[test]
    fn test_is_occupied_exact_cell() {
        let mut grid = SpatialGrid::new(40, 40);
        grid.insert(entry(1, 10, 12));
        assert!(grid.is_occupied(10, 12));
        assert!(!grid.is_occupied(10, 13));
        assert!(!grid.is_occupied(11, 12));
    }

    #[test]
    fn test_bucket_count() {
        assert_eq!(bucket_count(16), 2);
        assert_eq!(bucket_count(17), 3);
        assert_eq!(bucket_count(0), 1);
        // No overflow at the top of the range.
        assert_eq!(
            bucket_count(i32::MAX),
            (i32::MAX as usize - 1) / SPATIAL_CELL_SIZE as usize + 1
        );
    }

    #[test]
    fn test_cell_coords_clamping() {
        let grid = SpatialGrid::new(40, 40);
        // Negative coords clamp to (0,0)
        assert_eq!(grid.cell_coords(-3, -100), (0, 0));
        // Very large coords clamp to the last bucket
        assert_eq!(grid.cell_coords(999, 999), (grid.cols - 1, grid.rows - 1));
    }

    #[test]
    fn test_out_of_bounds_entries_are_found() {
        let mut grid = SpatialGrid::new(40, 40);
        // A creature that overshot past the right border.
        grid.insert(entry(7, 43, 20));
        assert!(grid.is_occupied(43, 20));
        let hits = grid.query_radius(39, 20, 4);
        assert_eq!(hits.len(), 1);
        assert!(grid.remove(&entry(7, 43, 20)));
    }
}
