//! Uniform spatial grid on the ground plane

use dino_core::Vec3;
use std::collections::HashMap;

/// Bucketed positions for radius queries
///
/// Query results come back in insertion order, so callers that insert in
/// their canonical iteration order see the same sequence a linear scan over
/// all entries would produce.
#[derive(Debug, Clone)]
pub struct SpatialGrid<K> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    entries: Vec<(K, Vec3)>,
}

impl<K: Copy> SpatialGrid<K> {
    /// Create an empty grid; non-positive sizes fall back to 1
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn cell_of(&self, position: Vec3) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, key: K, position: Vec3) {
        let index = self.entries.len();
        self.entries.push((key, position));
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Rebuild from scratch
    pub fn rebuild<I: IntoIterator<Item = (K, Vec3)>>(&mut self, items: I) {
        self.clear();
        for (key, position) in items {
            self.insert(key, position);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    /// Entries within `radius` (3D distance) of `center`, in insertion order
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<(K, Vec3)> {
        if radius < 0.0 || !radius.is_finite() {
            return Vec::new();
        }
        let (min_x, min_z) = self.cell_of(center - Vec3::ground(radius, radius));
        let (max_x, max_z) = self.cell_of(center + Vec3::ground(radius, radius));

        // Wide queries over a sparse grid scan the entries directly
        let span = (i64::from(max_x) - i64::from(min_x) + 1) * (i64::from(max_z) - i64::from(min_z) + 1);
        if span > self.cells.len() as i64 {
            return self
                .entries
                .iter()
                .filter(|(_, position)| position.distance(center) <= radius)
                .copied()
                .collect();
        }

        let mut hits = Vec::new();
        for cx in min_x..=max_x {
            for cz in min_z..=max_z {
                if let Some(bucket) = self.cells.get(&(cx, cz)) {
                    for &index in bucket {
                        if self.entries[index].1.distance(center) <= radius {
                            hits.push(index);
                        }
                    }
                }
            }
        }
        hits.sort_unstable();
        hits.into_iter().map(|i| self.entries[i]).collect()
    }

    /// Number of entries within `radius` of `center`
    pub fn count_within(&self, center: Vec3, radius: f32) -> usize {
        self.query_radius(center, radius).len()
    }

    /// Every entry in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(K, Vec3)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}
