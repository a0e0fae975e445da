use crate::display::display_value;
use crate::types::{Region, SortKey};
use serde::Serialize;

/// Regions ordered by `key`, largest first. Missing values count as zero and
/// equal keys keep their collection order.
pub fn rank(regions: &[Region], key: SortKey) -> Vec<&Region> {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| key.value(&b.stats).total_cmp(&key.value(&a.stats)));
    sorted
}

/// Case-insensitive substring match on region names, in collection order.
/// A blank query matches nothing.
pub fn search<'a>(regions: &'a [Region], query: &str) -> Vec<&'a Region> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    regions
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub total_population: f64,
    pub region_count: usize,
    pub most_populous: Option<String>,
    pub least_populous: Option<String>,
    pub densest: Option<String>,
}

pub fn compute_stats(regions: &[Region]) -> RegionStats {
    let mut total_population = 0.0;
    let mut most: Option<&Region> = None;
    let mut least: Option<&Region> = None;
    let mut densest: Option<&Region> = None;

    // Strict comparisons so the first of several equal regions is kept.
    for region in regions {
        let population = region.stats.population();
        total_population += population;

        if most.map_or(true, |m| population > m.stats.population()) {
            most = Some(region);
        }
        if least.map_or(true, |m| population < m.stats.population()) {
            least = Some(region);
        }
        if densest.map_or(true, |m| region.stats.density() > m.stats.density()) {
            densest = Some(region);
        }
    }

    RegionStats {
        total_population,
        region_count: regions.len(),
        most_populous: most.map(|r| r.name.clone()),
        least_populous: least.map(|r| r.name.clone()),
        densest: densest.map(|r| r.name.clone()),
    }
}

/// One line of the rankings drawer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub name: String,
    pub population: String,
    pub area: String,
    pub density: String,
}

pub fn ranking_rows(regions: &[Region], key: SortKey) -> Vec<RankingRow> {
    rank(regions, key)
        .into_iter()
        .enumerate()
        .map(|(i, region)| RankingRow {
            rank: i + 1,
            name: region.name.clone(),
            population: display_value(region.stats.total_population19),
            area: display_value(region.stats.area_sqkm),
            density: display_value(region.stats.population_density),
        })
        .collect()
}
