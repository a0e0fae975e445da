use crate::classify::fill_color;
use crate::config::MapConfig;
use crate::display::{GenderChart, RegionSummary};
use crate::index::RegionIndex;
use crate::ranking::{RankingRow, RegionStats};
use crate::types::{ColorMode, Region, SortKey};
use geo::Rect;
use serde::Serialize;
use tracing::{debug, warn};

/// Label of the compare trigger when no comparison is pending.
pub const COMPARE_LABEL: &str = "⚖ Compare with another county";
/// Label of the compare trigger while waiting for the second county.
pub const COMPARE_AWAITING_LABEL: &str = "🗺 Now click another county on the map...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: u8,
    pub opacity: f64,
    pub fill_opacity: f64,
}

pub fn base_style(region: &Region, mode: ColorMode) -> PathStyle {
    PathStyle {
        fill_color: fill_color(region, mode),
        color: "white",
        weight: 2,
        opacity: 1.0,
        fill_opacity: 0.7,
    }
}

/// Hover outline; keeps whatever fill the region already has.
pub fn hover_style(region: &Region, mode: ColorMode) -> PathStyle {
    PathStyle {
        color: "#1A50FF",
        weight: 5,
        fill_opacity: 0.9,
        ..base_style(region, mode)
    }
}

pub const SELECTED_STYLE: PathStyle = PathStyle {
    fill_color: "#e63946",
    color: "white",
    weight: 3,
    opacity: 1.0,
    fill_opacity: 0.85,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitOptions {
    pub padding: [u32; 2],
    pub max_zoom: Option<u8>,
    pub animate: bool,
    pub duration_secs: f64,
}

/// A single instruction for the map, chart or panel capabilities.
///
/// Transitions only ever produce effects; applying them is the renderer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)draw every region with the base style for the mode.
    RenderLayer(ColorMode),
    ResetStyle(String),
    Hover(String),
    Emphasize(String),
    FitBounds(Rect<f64>),
    ResetViewport,
    OpenSidebar,
    HideSidebar,
    ShowDetail(RegionSummary),
    RenderChart(GenderChart),
    ShowCompareTrigger,
    SetCompareLabel(&'static str),
    ShowComparison {
        left: RegionSummary,
        right: RegionSummary,
    },
    HideComparison,
    ShowStats(RegionStats),
    RenderRankings {
        sort: SortKey,
        rows: Vec<RankingRow>,
    },
    CloseRankings,
    ShowSuggestions(Vec<String>),
    HideSuggestions,
}

/// Polygon layer and viewport capability.
pub trait MapSurface {
    fn set_style(&mut self, region: &str, style: PathStyle);
    fn fit_bounds(&mut self, bounds: Rect<f64>, options: FitOptions);
    fn set_view(&mut self, center: [f64; 2], zoom: u8, options: FitOptions);
}

/// Sidebar, chart, comparison modal, rankings drawer and search box.
pub trait PanelSurface {
    fn sidebar(&mut self, open: bool);
    fn detail(&mut self, summary: &RegionSummary);
    fn chart(&mut self, chart: &GenderChart);
    fn compare_trigger(&mut self, visible: bool, label: &str);
    fn comparison(&mut self, cards: Option<(&RegionSummary, &RegionSummary)>);
    fn stats(&mut self, stats: &RegionStats);
    fn rankings(&mut self, sort: SortKey, rows: &[RankingRow]);
    fn close_rankings(&mut self);
    fn suggestions(&mut self, names: &[String]);
}

/// Translates effects into capability calls.
///
/// Tracks the active color mode so resets restore the right fill.
pub struct Renderer {
    view: MapConfig,
    mode: ColorMode,
    compare_label: &'static str,
}

impl Renderer {
    pub fn new(view: MapConfig) -> Self {
        Self {
            view,
            mode: ColorMode::default(),
            compare_label: COMPARE_LABEL,
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    fn fit_options(&self) -> FitOptions {
        FitOptions {
            padding: [self.view.fit_padding; 2],
            max_zoom: Some(self.view.fit_max_zoom),
            animate: true,
            duration_secs: self.view.animation_secs,
        }
    }

    pub fn apply<M, P>(&mut self, index: &RegionIndex, effects: &[Effect], map: &mut M, panels: &mut P)
    where
        M: MapSurface,
        P: PanelSurface,
    {
        for effect in effects {
            debug!(?effect, "Applying effect");
            match effect {
                Effect::RenderLayer(mode) => {
                    self.mode = *mode;
                    for region in index.regions() {
                        map.set_style(&region.name, base_style(region, self.mode));
                    }
                }
                Effect::ResetStyle(name) => match index.get(name) {
                    Some(region) => map.set_style(name, base_style(region, self.mode)),
                    None => warn!(%name, "Cannot reset style of unknown region"),
                },
                Effect::Hover(name) => match index.get(name) {
                    Some(region) => map.set_style(name, hover_style(region, self.mode)),
                    None => warn!(%name, "Cannot hover unknown region"),
                },
                Effect::Emphasize(name) => map.set_style(name, SELECTED_STYLE),
                Effect::FitBounds(bounds) => map.fit_bounds(*bounds, self.fit_options()),
                Effect::ResetViewport => map.set_view(self.view.center, self.view.zoom, self.fit_options()),
                Effect::OpenSidebar => panels.sidebar(true),
                Effect::HideSidebar => panels.sidebar(false),
                Effect::ShowDetail(summary) => panels.detail(summary),
                Effect::RenderChart(chart) => panels.chart(chart),
                Effect::ShowCompareTrigger => panels.compare_trigger(true, self.compare_label),
                Effect::SetCompareLabel(label) => {
                    self.compare_label = *label;
                    panels.compare_trigger(true, label);
                }
                Effect::ShowComparison { left, right } => panels.comparison(Some((left, right))),
                Effect::HideComparison => panels.comparison(None),
                Effect::ShowStats(stats) => panels.stats(stats),
                Effect::RenderRankings { sort, rows } => panels.rankings(*sort, rows),
                Effect::CloseRankings => panels.close_rankings(),
                Effect::ShowSuggestions(names) => panels.suggestions(names),
                Effect::HideSuggestions => panels.suggestions(&[]),
            }
        }
    }
}

/// Terminal rendition used by the CLI: panels print to stdout, map calls are logged.
#[derive(Default)]
pub struct ConsoleSurface;

impl MapSurface for ConsoleSurface {
    fn set_style(&mut self, region: &str, style: PathStyle) {
        debug!(region, fill = style.fill_color, weight = style.weight, "set_style");
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, options: FitOptions) {
        debug!(?bounds, ?options, "fit_bounds");
    }

    fn set_view(&mut self, center: [f64; 2], zoom: u8, _options: FitOptions) {
        debug!(?center, zoom, "set_view");
    }
}

impl ConsoleSurface {
    fn print_card(summary: &RegionSummary, rows: &[(&'static str, String)]) {
        println!("{}", summary.name);
        println!("{}", "-".repeat(summary.name.chars().count().max(24)));
        for (label, value) in rows {
            println!("  {label:<20} {value}");
        }
        let change = &summary.change;
        println!("  Population Change Since 2009");
        println!("    {} {}", change.arrow(), change.people_label());
        println!("    {}", change.percent_label());
    }
}

impl PanelSurface for ConsoleSurface {
    fn sidebar(&mut self, open: bool) {
        debug!(open, "sidebar");
    }

    fn detail(&mut self, summary: &RegionSummary) {
        Self::print_card(summary, &summary.detail_rows());
        println!("    {}", summary.change.span_label());
    }

    fn chart(&mut self, chart: &GenderChart) {
        println!("  {}", chart.title);
        for (label, value) in chart.labels.iter().zip(chart.values) {
            println!("    {label:<8}{}", chart.tooltip_label(value));
        }
    }

    fn compare_trigger(&mut self, visible: bool, label: &str) {
        debug!(visible, label, "compare trigger");
    }

    fn comparison(&mut self, cards: Option<(&RegionSummary, &RegionSummary)>) {
        if let Some((left, right)) = cards {
            Self::print_card(left, &left.card_rows());
            println!();
            Self::print_card(right, &right.card_rows());
        }
    }

    fn stats(&mut self, stats: &RegionStats) {
        debug!(?stats, "stats");
    }

    fn rankings(&mut self, sort: SortKey, rows: &[RankingRow]) {
        debug!(?sort, rows = rows.len(), "rankings");
    }

    fn close_rankings(&mut self) {
        debug!("close rankings");
    }

    fn suggestions(&mut self, names: &[String]) {
        debug!(?names, "suggestions");
    }
}
