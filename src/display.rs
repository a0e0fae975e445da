//! Human-facing figures derived from a region's attributes.
//!
//! The sidebar and both sides of the comparison view are built from the same
//! [`RegionSummary`], so a county reads identically wherever it is shown.

use crate::types::{Demographics, Region};
use serde::Serialize;

pub const NOT_AVAILABLE: &str = "N/A";

/// Format with thousands separators and at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();
    // Past 2^53 thousandths no longer fit exactly
    let (whole, fraction) = if abs < 9e12 {
        let millis = (abs * 1000.0).round() as u64;
        ((millis / 1000).to_string(), millis % 1000)
    } else {
        (format!("{:.0}", abs.round()), 0)
    };
    let sign = if value < 0.0 && (whole != "0" || fraction > 0) { "-" } else { "" };
    let whole = group_thousands(&whole);

    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{fraction:03}");
        format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Missing and zero values both read as "N/A".
pub fn display_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format_number(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `part` in `total` as a percentage with one decimal.
/// `None` when the total is zero.
pub fn percent_of(part: f64, total: f64) -> Option<f64> {
    (total != 0.0).then(|| round1(part / total * 100.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationChange {
    pub people: f64,
    pub population_2009: f64,
    pub population_2019: f64,
    /// Growth relative to 2009, one decimal. `None` without a 2009 baseline.
    pub percent: Option<f64>,
    pub is_positive: bool,
}

impl PopulationChange {
    pub fn of(stats: &Demographics) -> Self {
        let people = stats.pop_change.unwrap_or(0.0);
        let population_2009 = stats.population_in_2009.unwrap_or(0.0);
        let population_2019 = stats.total_population19.unwrap_or(0.0);
        let percent = (population_2009 > 0.0)
            .then(|| round1((population_2019 - population_2009) / population_2009 * 100.0));

        Self {
            people,
            population_2009,
            population_2019,
            percent,
            is_positive: people >= 0.0,
        }
    }

    pub fn arrow(&self) -> &'static str {
        if self.is_positive { "▲" } else { "▼" }
    }

    pub fn people_label(&self) -> String {
        format!("{} people", format_number(self.people.abs()))
    }

    pub fn percent_label(&self) -> String {
        match self.percent {
            Some(pct) => {
                let sign = if self.is_positive { "+" } else { "-" };
                format!("{sign}{}% growth", pct.abs())
            }
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn span_label(&self) -> String {
        format!(
            "2009: {} → 2019: {}",
            format_number(self.population_2009),
            format_number(self.population_2019)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub name: String,
    pub area: String,
    pub total_population: String,
    pub male_population: String,
    pub female_population: String,
    pub households: String,
    pub density: String,
    pub population_2009: String,
    pub change: PopulationChange,
}

impl RegionSummary {
    pub fn of(region: &Region) -> Self {
        let stats = &region.stats;
        Self {
            name: region.name.clone(),
            area: display_value(stats.area_sqkm),
            total_population: display_value(stats.total_population19),
            male_population: display_value(stats.male_population_2019),
            female_population: display_value(stats.female_population_2019),
            households: display_value(stats.households),
            density: display_value(stats.population_density),
            population_2009: display_value(stats.population_in_2009),
            change: PopulationChange::of(stats),
        }
    }

    /// Labelled rows for the sidebar.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Area", format!("{} km²", self.area)),
            ("Total Population", self.total_population.clone()),
            ("Male Population", self.male_population.clone()),
            ("Female Population", self.female_population.clone()),
            ("Households", self.households.clone()),
            ("Population Density", format!("{} /km²", self.density)),
        ]
    }

    /// Sidebar rows plus the 2009 baseline, as shown on a comparison card.
    pub fn card_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = self.detail_rows();
        rows.push(("2009 Population", self.population_2009.clone()));
        rows
    }
}

/// Male/female split handed to the charting capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderChart {
    pub title: &'static str,
    pub labels: [&'static str; 2],
    pub colors: [&'static str; 2],
    pub values: [f64; 2],
}

impl GenderChart {
    pub fn of(stats: &Demographics) -> Self {
        Self {
            title: "Population by Gender",
            labels: ["Male", "Female"],
            colors: ["#495DCC", "#a8b4f0"],
            values: [
                stats.male_population_2019.unwrap_or(0.0),
                stats.female_population_2019.unwrap_or(0.0),
            ],
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn tooltip_label(&self, raw: f64) -> String {
        let share = percent_of(raw, self.total())
            .map_or_else(|| NOT_AVAILABLE.to_string(), |pct| format!("{pct:.1}%"));
        format!(" {} ({share})", format_number(raw))
    }
}
