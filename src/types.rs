use clap::ValueEnum;
use geo::{BoundingRect, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

/// Census attributes carried in each feature's properties object.
/// Any of them may be missing from the source dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub area_sqkm: Option<f64>,
    pub total_population19: Option<f64>,
    pub population_in_2009: Option<f64>,
    pub pop_change: Option<f64>,
    pub male_population_2019: Option<f64>,
    pub female_population_2019: Option<f64>,
    pub households: Option<f64>,
    pub population_density: Option<f64>,
}

impl Demographics {
    pub fn population(&self) -> f64 {
        self.total_population19.unwrap_or(0.0)
    }

    pub fn area(&self) -> f64 {
        self.area_sqkm.unwrap_or(0.0)
    }

    pub fn density(&self) -> f64 {
        self.population_density.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    // None when the feature has no polygonal geometry
    pub geometry: Option<MultiPolygon<f64>>,
    pub stats: Demographics,
}

impl Region {
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.as_ref().and_then(|g| g.bounding_rect())
    }
}

/// Attribute driving the choropleth fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Area,
    Population,
    Density,
}

impl ColorMode {
    pub fn value(self, stats: &Demographics) -> f64 {
        match self {
            ColorMode::Area => stats.area(),
            ColorMode::Population => stats.population(),
            ColorMode::Density => stats.density(),
        }
    }
}

/// Column the rankings drawer is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Population,
    Area,
    Density,
}

impl SortKey {
    pub fn value(self, stats: &Demographics) -> f64 {
        match self {
            SortKey::Population => stats.population(),
            SortKey::Area => stats.area(),
            SortKey::Density => stats.density(),
        }
    }
}
