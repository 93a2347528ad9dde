use std::collections::HashMap;

use log::debug;
use static_aabb2d_index::AABB;

use crate::{
    core::traits::{ControlFlow, Real},
    error::{GeometryError, Result},
};

use super::{polygon::bounds_overlap, Polygon};

/// Ceiling on the cell nesting depth, reached only for regions spanning many orders of magnitude
/// relative to the minimum cell size.
const MAX_DEPTH: usize = 64;

/// Quadtree over a fixed region holding references to polygons.
///
/// Each polygon is stored in every cell its bounding box reaches, at the level where the cell is
/// either covered by the box or cannot be split further. Cells split on demand along each axis
/// whose width exceeds the minimum cell size and whose midpoint is representable strictly between
/// its bounds, so degenerate regions are accepted and simply not divided along that axis.
///
/// Polygons are identified by reference, inserting two equal polygons at different addresses
/// stores both.
#[derive(Debug)]
pub struct GridIndex<'a, T = f64>
where
    T: Real,
{
    root: Cell<T>,
    min_cell_size: T,
    slots: Vec<Option<&'a Polygon<T>>>,
    free_slots: Vec<usize>,
    /// Slot of each indexed polygon keyed by its address.
    lookup: HashMap<usize, usize>,
}

#[derive(Debug)]
struct Cell<T> {
    bounds: AABB<T>,
    items: Vec<usize>,
    children: Vec<Cell<T>>,
}

impl<T> Cell<T>
where
    T: Real,
{
    fn new(bounds: AABB<T>) -> Self {
        Cell {
            bounds,
            items: Vec::new(),
            children: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty() && self.children.is_empty()
    }

    /// Child bounds if this cell can be divided, split along each dividable axis.
    fn split_bounds(&self, min_cell_size: T) -> Option<Vec<AABB<T>>> {
        let b = self.bounds;
        let mid_x = (b.min_x + b.max_x) / T::two();
        let mid_y = (b.min_y + b.max_y) / T::two();
        let split_x = b.max_x - b.min_x > min_cell_size && b.min_x < mid_x && mid_x < b.max_x;
        let split_y = b.max_y - b.min_y > min_cell_size && b.min_y < mid_y && mid_y < b.max_y;

        let xs: &[(T, T)] = if split_x {
            &[(b.min_x, mid_x), (mid_x, b.max_x)]
        } else {
            &[(b.min_x, b.max_x)]
        };
        let ys: &[(T, T)] = if split_y {
            &[(b.min_y, mid_y), (mid_y, b.max_y)]
        } else {
            &[(b.min_y, b.max_y)]
        };

        if !split_x && !split_y {
            return None;
        }

        let mut result = Vec::with_capacity(4);
        for &(min_y, max_y) in ys {
            for &(min_x, max_x) in xs {
                result.push(AABB::new(min_x, min_y, max_x, max_y));
            }
        }
        Some(result)
    }
}

#[inline]
fn covers<T>(outer: &AABB<T>, inner: &AABB<T>) -> bool
where
    T: Real,
{
    outer.min_x <= inner.min_x
        && outer.min_y <= inner.min_y
        && outer.max_x >= inner.max_x
        && outer.max_y >= inner.max_y
}

impl<'a, T> GridIndex<'a, T>
where
    T: Real,
{
    /// Create an empty index over `region`.
    ///
    /// Fails with [GeometryError::InvalidArgument] if the region is not finite, inverted, or
    /// `min_cell_size` is not positive.
    pub fn new(region: AABB<T>, min_cell_size: T) -> Result<Self> {
        let coords = [region.min_x, region.min_y, region.max_x, region.max_y];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(GeometryError::invalid("index region is not finite"));
        }

        if region.min_x > region.max_x || region.min_y > region.max_y {
            return Err(GeometryError::invalid(format!(
                "index region is inverted: ({}, {}) to ({}, {})",
                region.min_x, region.min_y, region.max_x, region.max_y
            )));
        }

        if !(min_cell_size.is_finite() && min_cell_size > T::zero()) {
            return Err(GeometryError::invalid(format!(
                "minimum cell size must be positive and finite, got {}",
                min_cell_size
            )));
        }

        let root = Cell::new(region);
        if root.split_bounds(min_cell_size).is_none() {
            debug!("index region cannot be subdivided, using a single cell");
        }

        Ok(GridIndex {
            root,
            min_cell_size,
            slots: Vec::new(),
            free_slots: Vec::new(),
            lookup: HashMap::new(),
        })
    }

    #[inline]
    pub fn region(&self) -> AABB<T> {
        self.root.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// `true` if this exact polygon (by reference) is indexed.
    pub fn contains(&self, polygon: &Polygon<T>) -> bool {
        self.lookup.contains_key(&address(polygon))
    }

    /// Iterate all indexed polygons.
    pub fn iter(&self) -> impl Iterator<Item = &'a Polygon<T>> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    pub fn clear(&mut self) {
        self.root = Cell::new(self.root.bounds);
        self.slots.clear();
        self.free_slots.clear();
        self.lookup.clear();
    }

    /// Add `polygon`, returns `false` if it is already indexed or its bounding box is not within
    /// the region.
    ///
    /// Containment is exact, a box reaching one unit of floating point precision outside the
    /// region is rejected.
    pub fn insert(&mut self, polygon: &'a Polygon<T>) -> bool {
        let key = address(polygon);
        if self.lookup.contains_key(&key) {
            return false;
        }

        let bounds = polygon.bounds();
        if !covers(&self.root.bounds, &bounds) {
            return false;
        }

        let id = match self.free_slots.pop() {
            Some(id) => {
                self.slots[id] = Some(polygon);
                id
            }
            None => {
                self.slots.push(Some(polygon));
                self.slots.len() - 1
            }
        };
        self.lookup.insert(key, id);

        let min_cell_size = self.min_cell_size;
        let mut stack = vec![(&mut self.root, 0usize)];
        while let Some((cell, depth)) = stack.pop() {
            if covers(&bounds, &cell.bounds) || depth >= MAX_DEPTH {
                cell.items.push(id);
                continue;
            }

            if cell.children.is_empty() {
                match cell.split_bounds(min_cell_size) {
                    Some(child_bounds) => {
                        cell.children = child_bounds.into_iter().map(Cell::new).collect();
                    }
                    None => {
                        cell.items.push(id);
                        continue;
                    }
                }
            }

            for child in cell.children.iter_mut() {
                if bounds_overlap(&child.bounds, &bounds, T::zero()) {
                    stack.push((child, depth + 1));
                }
            }
        }

        true
    }

    /// Remove `polygon`, returns `false` if it was not indexed.
    pub fn remove(&mut self, polygon: &Polygon<T>) -> bool {
        let id = match self.lookup.remove(&address(polygon)) {
            Some(id) => id,
            None => return false,
        };

        self.slots[id] = None;
        self.free_slots.push(id);
        remove_from_cell(&mut self.root, id, &polygon.bounds());
        true
    }

    /// Polygons whose bounding box overlaps `bounds` (inclusive), in insertion slot order.
    pub fn query_bounds(&self, bounds: &AABB<T>) -> Vec<&'a Polygon<T>> {
        self.candidate_ids(bounds)
            .into_iter()
            .filter_map(|id| self.slots[id])
            .collect()
    }

    /// Indexed polygons for which [Polygon::intersects] with `polygon` holds.
    pub fn query_intersecting(&self, polygon: &Polygon<T>) -> Vec<&'a Polygon<T>> {
        let mut result = Vec::new();
        self.visit_intersecting(polygon, |p| {
            result.push(p);
        });
        result
    }

    /// Visit indexed polygons intersecting `polygon` until the visitor breaks.
    pub fn visit_intersecting<C, F>(&self, polygon: &Polygon<T>, mut visitor: F) -> C
    where
        C: ControlFlow,
        F: FnMut(&'a Polygon<T>) -> C,
    {
        for candidate in self.query_bounds(&polygon.bounds()) {
            if candidate.intersects(polygon) {
                let cf = visitor(candidate);
                if cf.should_break() {
                    return cf;
                }
            }
        }

        C::continuing()
    }

    /// Sorted ids of polygons in cells reaching `bounds` whose box overlaps `bounds`.
    fn candidate_ids(&self, bounds: &AABB<T>) -> Vec<usize> {
        let mut ids = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(cell) = stack.pop() {
            if !bounds_overlap(&cell.bounds, bounds, T::zero()) {
                continue;
            }
            ids.extend(cell.items.iter().copied().filter(|&id| {
                self.slots[id]
                    .map(|p| bounds_overlap(&p.bounds(), bounds, T::zero()))
                    .unwrap_or(false)
            }));
            stack.extend(cell.children.iter());
        }

        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Remove `id` from all cells reaching `bounds`, pruning children that became empty. Returns
/// `true` if `cell` is empty afterwards.
fn remove_from_cell<T>(cell: &mut Cell<T>, id: usize, bounds: &AABB<T>) -> bool
where
    T: Real,
{
    if !bounds_overlap(&cell.bounds, bounds, T::zero()) {
        return cell.is_empty();
    }

    cell.items.retain(|&i| i != id);
    let mut all_children_empty = true;
    for child in cell.children.iter_mut() {
        if !remove_from_cell(child, id, bounds) {
            all_children_empty = false;
        }
    }
    if all_children_empty {
        cell.children.clear();
    }

    cell.is_empty()
}

#[inline]
fn address<T>(polygon: &Polygon<T>) -> usize {
    polygon as *const Polygon<T> as usize
}
