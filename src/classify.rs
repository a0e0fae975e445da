use crate::types::{ColorMode, Region};

/// Fill colors from darkest (highest values) to lightest.
pub const PALETTE: [&str; 8] = [
    "#050E70", "#07149C", "#0919C8", "#0B1FF4", "#2738F5", "#8F98FA", "#BBC0FC", "#E7E9FE",
];

const POPULATION_BREAKS: [f64; 7] = [3e6, 2e6, 1e6, 5e5, 3e5, 2e5, 1e5];
const DENSITY_BREAKS: [f64; 7] = [1000.0, 500.0, 200.0, 100.0, 50.0, 20.0, 10.0];
const AREA_BREAKS: [f64; 7] = [80000.0, 60000.0, 40000.0, 20000.0, 10000.0, 5000.0, 1000.0];

/// Lower bounds (exclusive) for each palette entry except the last, descending.
pub fn breaks(mode: ColorMode) -> &'static [f64; 7] {
    match mode {
        ColorMode::Population => &POPULATION_BREAKS,
        ColorMode::Density => &DENSITY_BREAKS,
        ColorMode::Area => &AREA_BREAKS,
    }
}

pub fn classify(value: f64, mode: ColorMode) -> &'static str {
    breaks(mode)
        .iter()
        .position(|&bound| value > bound)
        .map_or(PALETTE[PALETTE.len() - 1], |i| PALETTE[i])
}

pub fn fill_color(region: &Region, mode: ColorMode) -> &'static str {
    classify(mode.value(&region.stats), mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHTEST: &str = "#E7E9FE";
    const DARKEST: &str = "#050E70";
    const MODES: [ColorMode; 3] = [ColorMode::Area, ColorMode::Population, ColorMode::Density];

    #[test]
    fn values_at_or_below_the_lowest_break_are_lightest() {
        for mode in MODES {
            let lowest = breaks(mode)[6];
            assert_eq!(classify(0.0, mode), LIGHTEST);
            assert_eq!(classify(lowest, mode), LIGHTEST);
            assert_eq!(classify(-5.0, mode), LIGHTEST);
        }
    }

    #[test]
    fn values_above_the_highest_break_are_darkest() {
        for mode in MODES {
            let highest = breaks(mode)[0];
            assert_eq!(classify(highest + 1.0, mode), DARKEST);
            assert_eq!(classify(f64::MAX, mode), DARKEST);
        }
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(classify(1_000_000.0, ColorMode::Population), "#0B1FF4");
        assert_eq!(classify(1_000_001.0, ColorMode::Population), "#0919C8");
        assert_eq!(classify(50.0, ColorMode::Density), "#8F98FA");
        assert_eq!(classify(50.5, ColorMode::Density), "#2738F5");
        assert_eq!(classify(5000.0, ColorMode::Area), "#BBC0FC");
    }

    #[test]
    fn fill_color_treats_missing_values_as_zero() {
        let region = Region {
            name: "Lamu".into(),
            geometry: None,
            stats: Default::default(),
        };
        assert_eq!(fill_color(&region, ColorMode::Density), LIGHTEST);
    }
}
