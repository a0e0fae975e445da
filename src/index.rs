use crate::data::DatasetStore;
use crate::types::Region;
use geo::Rect;
use std::collections::HashMap;
use tracing::warn;

/// Name lookup over a loaded [`DatasetStore`].
///
/// Views produced from the index borrow regions from the store; nothing is
/// copied or reordered in place.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    store: DatasetStore,
    by_name: HashMap<String, usize>,
    bounds: Option<Rect<f64>>,
}

impl RegionIndex {
    pub fn new(store: DatasetStore) -> Self {
        let mut by_name = HashMap::with_capacity(store.regions().len());
        let mut bounds: Option<Rect<f64>> = None;

        for (i, region) in store.regions().iter().enumerate() {
            if by_name.contains_key(&region.name) {
                warn!(name = %region.name, "Duplicate region name, keeping the first");
            } else {
                by_name.insert(region.name.clone(), i);
            }

            if let Some(rect) = region.bounds() {
                bounds = Some(match bounds {
                    Some(acc) => union(acc, rect),
                    None => rect,
                });
            }
        }

        Self { store, by_name, bounds }
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|&i| &self.store.regions()[i])
    }

    pub fn regions(&self) -> &[Region] {
        self.store.regions()
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Extent of every region with geometry; used to frame the map after load.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn looks_up_regions_by_exact_name() {
        let index = RegionIndex::new(fixtures::store());
        assert_eq!(index.get("Mombasa").unwrap().stats.households, Some(378422.0));
        assert!(index.get("mombasa").is_none());
        assert!(index.get("Kisumu").is_none());
    }

    #[test]
    fn bounds_cover_every_region() {
        let index = RegionIndex::new(fixtures::store());
        let bounds = index.bounds().unwrap();
        assert_eq!(bounds.min().x, 34.0);
        assert_eq!(bounds.min().y, -4.15);
        assert_eq!(bounds.max().x, 39.8);
        assert_eq!(bounds.max().y, 5.0);
    }

    #[test]
    fn duplicate_names_resolve_to_the_first_feature() {
        let doc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"adm1_name":"Embu","households":1}},
            {"type":"Feature","geometry":null,"properties":{"adm1_name":"Embu","households":2}}
        ]}"#;
        let store = DatasetStore::from_geojson(doc.parse().unwrap(), "adm1_name").unwrap();
        let index = RegionIndex::new(store);
        assert_eq!(index.get("Embu").unwrap().stats.households, Some(1.0));
        assert_eq!(index.regions().len(), 2);
        assert!(index.bounds().is_none());
    }
}
