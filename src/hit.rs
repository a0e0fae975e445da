use crate::types::Region;
use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};

// Bounding box of one region, pointing back into the collection
struct RegionEnvelope {
    position: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Resolves a map coordinate to the region drawn there.
pub struct HitIndex {
    tree: RTree<RegionEnvelope>,
}

impl HitIndex {
    pub fn build(regions: &[Region]) -> Self {
        let items: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .filter_map(|(position, region)| {
                let rect = region.bounds()?;
                Some(RegionEnvelope {
                    position,
                    aabb: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
                })
            })
            .collect();

        Self { tree: RTree::bulk_load(items) }
    }

    /// Position of the first region (in collection order) whose polygon contains the point.
    pub fn locate(&self, regions: &[Region], lon: f64, lat: f64) -> Option<usize> {
        let point = Point::new(lon, lat);
        let envelope = AABB::from_point([lon, lat]);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|candidate| candidate.position)
            .filter(|&position| {
                regions
                    .get(position)
                    .and_then(|r| r.geometry.as_ref())
                    .is_some_and(|g| g.contains(&point))
            })
            .min()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }
}
