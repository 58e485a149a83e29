//! Barnes-Hut quadtree for O(n log n) force approximation.
//!
//! The quadtree recursively subdivides space and computes center of mass
//! for each cell. Distant cells can be approximated as single points,
//! reducing the O(n²) pairwise force calculation to O(n log n).

/// A cell of the quadtree.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Center of mass
    pub center_x: f64,
    pub center_y: f64,
    /// Number of points in this cell
    pub mass: f64,
    /// Cell width (for the Barnes-Hut theta criterion)
    pub width: f64,
    /// Child cells in NW, NE, SW, SE order
    pub children: [Option<usize>; 4],
    /// Point indices held directly by a leaf
    pub points: Vec<usize>,
}

impl Cell {
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A Barnes-Hut quadtree for 2D spatial partitioning.
#[derive(Debug)]
pub struct QuadTree {
    /// Flattened cells; the root is at index 0
    cells: Vec<Cell>,
}

impl QuadTree {
    /// Build a quadtree from point positions.
    ///
    /// # Arguments
    /// * `positions` - Slice of `(x, y)` positions
    /// * `max_depth` - Maximum tree depth; deeper points share a leaf
    pub fn build(positions: &[(f64, f64)], max_depth: usize) -> Self {
        if positions.is_empty() {
            return Self {
                cells: vec![Cell::default()],
            };
        }

        // Find bounding box with some padding
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let padding = ((max_x - min_x).max(max_y - min_y) * 0.1).max(1.0);
        min_x -= padding;
        min_y -= padding;
        max_x += padding;
        max_y += padding;

        // Make it square
        let width = (max_x - min_x).max(max_y - min_y);
        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;

        let mut cells = Vec::with_capacity(positions.len() * 2);
        let mut builder = TreeBuilder {
            positions,
            cells: &mut cells,
            max_depth,
        };

        let indices: Vec<usize> = (0..positions.len()).collect();
        builder.build_cell(
            &indices,
            center_x - width / 2.0,
            center_y - width / 2.0,
            width,
            0,
        );

        Self { cells }
    }

    pub fn root(&self) -> &Cell {
        &self.cells[0]
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

struct TreeBuilder<'a> {
    positions: &'a [(f64, f64)],
    cells: &'a mut Vec<Cell>,
    max_depth: usize,
}

impl TreeBuilder<'_> {
    fn build_cell(&mut self, indices: &[usize], x: f64, y: f64, width: f64, depth: usize) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let cell_idx = self.cells.len();
        self.cells.push(Cell::default());

        let mass = indices.len() as f64;
        let (mut com_x, mut com_y) = (0.0, 0.0);
        for &i in indices {
            com_x += self.positions[i].0;
            com_y += self.positions[i].1;
        }
        com_x /= mass;
        com_y /= mass;

        if indices.len() == 1 || depth >= self.max_depth {
            self.cells[cell_idx] = Cell {
                center_x: com_x,
                center_y: com_y,
                mass,
                width,
                children: [None; 4],
                points: indices.to_vec(),
            };
            return Some(cell_idx);
        }

        // Subdivide into quadrants
        let half_width = width / 2.0;
        let mid_x = x + half_width;
        let mid_y = y + half_width;

        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for &i in indices {
            let (px, py) = self.positions[i];
            let quadrant = match (px < mid_x, py < mid_y) {
                (true, false) => 0,  // NW
                (false, false) => 1, // NE
                (true, true) => 2,   // SW
                (false, true) => 3,  // SE
            };
            quadrants[quadrant].push(i);
        }

        let children = [
            self.build_cell(&quadrants[0], x, mid_y, half_width, depth + 1),
            self.build_cell(&quadrants[1], mid_x, mid_y, half_width, depth + 1),
            self.build_cell(&quadrants[2], x, y, half_width, depth + 1),
            self.build_cell(&quadrants[3], mid_x, y, half_width, depth + 1),
        ];

        self.cells[cell_idx] = Cell {
            center_x: com_x,
            center_y: com_y,
            mass,
            width,
            children,
            points: Vec::new(),
        };

        Some(cell_idx)
    }
}
