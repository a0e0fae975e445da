use crate::config::AppConfig;
use crate::types::{Demographics, Region};
use anyhow::{Context, Result, anyhow};
use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson, JsonObject};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// The region collection as loaded at startup. Read-only afterwards.
///
/// Keeps the parsed feature collection alongside the extracted regions so the
/// data service can hand out the document exactly as it was read.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    collection: FeatureCollection,
    regions: Vec<Region>,
}

impl DatasetStore {
    pub fn empty() -> Self {
        Self {
            collection: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            regions: Vec::new(),
        }
    }

    pub fn load(config: &AppConfig) -> Result<Self> {
        Self::load_from_path(&config.input.geojson, &config.input.name_property)
    }

    pub fn load_from_path(path: &Path, name_property: &str) -> Result<Self> {
        info!(path = ?path, "Loading GeoJSON");
        let file = File::open(path)
            .with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
        let reader = BufReader::new(file);

        let geojson = GeoJson::from_reader(reader).context("Failed to parse GeoJSON")?;
        let store = Self::from_geojson(geojson, name_property)?;

        info!(regions = store.regions.len(), "Loaded region collection");
        Ok(store)
    }

    pub fn from_geojson(geojson: GeoJson, name_property: &str) -> Result<Self> {
        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
        };

        let mut regions = Vec::with_capacity(collection.features.len());

        for (position, feature) in collection.features.iter().enumerate() {
            let Some(props) = feature.properties.as_ref() else {
                warn!(position, "Skipping feature without properties");
                continue;
            };

            let name = match props.get(name_property) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => {
                    warn!(position, name_property, "Skipping feature without a name");
                    continue;
                }
            };

            let geometry = match &feature.geometry {
                Some(g) => {
                    let converted: geo::Geometry<f64> = g.value.clone().try_into()
                        .map_err(|e| anyhow!("Failed to convert geometry of {}: {:?}", name, e))?;

                    match converted {
                        geo::Geometry::MultiPolygon(mp) => Some(mp),
                        geo::Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p])),
                        _ => None, // Points and lines cannot be shaded
                    }
                }
                None => None,
            };

            regions.push(Region {
                name,
                geometry,
                stats: demographics(props),
            });
        }

        Ok(Self { collection, regions })
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn demographics(props: &JsonObject) -> Demographics {
    Demographics {
        area_sqkm: number(props, "area_sqkm"),
        total_population19: number(props, "total_population19"),
        population_in_2009: number(props, "population_in_2009"),
        pop_change: number(props, "pop_change"),
        male_population_2019: number(props, "male_population_2019"),
        female_population_2019: number(props, "female_population_2019"),
        households: number(props, "households"),
        population_density: number(props, "population_density"),
    }
}

// Numbers sometimes arrive as strings in exported datasets.
fn number(props: &JsonObject, key: &str) -> Option<f64> {
    let value = match props.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v: &f64| v.is_finite())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_regions_in_document_order() {
        let store = fixtures::store();
        let names: Vec<&str> = store.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Nairobi", "Mombasa", "Turkana"]);
        assert_eq!(store.collection().features.len(), 3);
    }

    #[test]
    fn non_finite_strings_count_as_absent() {
        let doc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,
             "properties":{"adm1_name":"Odd","total_population19":"NaN","area_sqkm":"inf",
                           "population_density":"-Infinity","households":" 12 "}}
        ]}"#;
        let store = DatasetStore::from_geojson(doc.parse().unwrap(), "adm1_name").unwrap();
        let stats = &store.regions()[0].stats;
        assert_eq!(stats.total_population19, None);
        assert_eq!(stats.area_sqkm, None);
        assert_eq!(stats.population_density, None);
        assert_eq!(stats.households, Some(12.0));
    }

    #[test]
    fn reads_numeric_strings_and_keeps_nulls_absent() {
        let store = fixtures::store();
        assert_eq!(store.regions()[1].stats.area_sqkm, Some(219.9));
        assert_eq!(store.regions()[2].stats.population_density, None);
        assert_eq!(store.regions()[2].stats.density(), 0.0);
    }

    #[test]
    fn polygons_and_multipolygons_both_have_bounds() {
        let store = fixtures::store();
        let nairobi = store.regions()[0].bounds().unwrap();
        assert_eq!(nairobi.min().x, 36.6);
        assert_eq!(nairobi.max().y, -1.15);
        assert!(store.regions()[2].bounds().is_some());
    }

    #[test]
    fn skips_features_without_a_name() {
        let doc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"area_sqkm":10}},
            {"type":"Feature","geometry":null,"properties":{"adm1_name":"Lamu"}}
        ]}"#;
        let store = DatasetStore::from_geojson(doc.parse().unwrap(), "adm1_name").unwrap();
        assert_eq!(store.regions().len(), 1);
        assert_eq!(store.regions()[0].name, "Lamu");
        assert!(store.regions()[0].geometry.is_none());
        // The served document is untouched
        assert_eq!(store.collection().features.len(), 2);
    }

    #[test]
    fn rejects_documents_that_are_not_collections() {
        let doc = r#"{"type":"Point","coordinates":[1.0,2.0]}"#;
        let err = DatasetStore::from_geojson(doc.parse().unwrap(), "adm1_name").unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = DatasetStore::load_from_path(Path::new("/nonexistent.geojson"), "adm1_name")
            .unwrap_err();
        assert!(err.to_string().contains("nonexistent.geojson"));
    }
}
