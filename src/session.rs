use crate::data::DatasetStore;
use crate::hit::HitIndex;
use crate::index::RegionIndex;
use crate::ranking::{compute_stats, rank, ranking_rows, search};
use crate::render::Effect;
use crate::selection::{self, Selection, SelectionEvent};
use crate::types::{ColorMode, Region, SortKey};
use tracing::{debug, info, warn};

/// Everything the user can do to the map page.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    RegionClicked(String),
    /// Raw map click, resolved through the hit index.
    MapClicked { lon: f64, lat: f64 },
    RegionHovered(String),
    RegionUnhovered(String),
    SidebarToggled,
    SidebarClosed,
    CompareRequested,
    ComparisonClosed,
    ColorModeChanged(ColorMode),
    RankingsSorted(SortKey),
    RankingPicked(String),
    SearchTyped(String),
    SuggestionPicked(String),
}

/// One browsing session over the loaded dataset.
///
/// Holds no data until [`Session::load`] is called; interactions before that
/// produce no effects and queries return empty results.
#[derive(Default)]
pub struct Session {
    loaded: Option<Loaded>,
    selection: Selection,
    color_mode: ColorMode,
    sort: SortKey,
}

struct Loaded {
    index: RegionIndex,
    hits: HitIndex,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the dataset. Only the first successful load is kept.
    pub fn load(&mut self, store: DatasetStore) -> Vec<Effect> {
        if self.loaded.is_some() {
            warn!("Dataset already loaded, ignoring reload");
            return Vec::new();
        }

        let index = RegionIndex::new(store);
        let hits = HitIndex::build(index.regions());
        info!(regions = index.regions().len(), "Session dataset ready");

        let mut effects = vec![
            Effect::ShowStats(compute_stats(index.regions())),
            Effect::RenderRankings {
                sort: self.sort,
                rows: ranking_rows(index.regions(), self.sort),
            },
            Effect::RenderLayer(self.color_mode),
        ];
        if let Some(bounds) = index.bounds() {
            effects.push(Effect::FitBounds(bounds));
        }

        self.loaded = Some(Loaded { index, hits });
        effects
    }

    pub fn index(&self) -> Option<&RegionIndex> {
        self.loaded.as_ref().map(|l| &l.index)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    fn regions(&self) -> &[Region] {
        match self.index() {
            Some(index) => index.regions(),
            None => &[],
        }
    }

    pub fn rank(&self, key: SortKey) -> Vec<&Region> {
        rank(self.regions(), key)
    }

    pub fn search(&self, query: &str) -> Vec<&Region> {
        search(self.regions(), query)
    }

    pub fn dispatch(&mut self, interaction: Interaction) -> Vec<Effect> {
        debug!(?interaction, "Dispatching interaction");
        let Some(loaded) = self.loaded.as_ref() else {
            debug!("No dataset yet, interaction dropped");
            return Vec::new();
        };

        match interaction {
            Interaction::RegionClicked(name) => self.step(SelectionEvent::RegionClicked(name)),
            Interaction::MapClicked { lon, lat } => {
                let regions = loaded.index.regions();
                match loaded.hits.locate(regions, lon, lat) {
                    Some(position) => {
                        let name = regions[position].name.clone();
                        self.step(SelectionEvent::RegionClicked(name))
                    }
                    None => Vec::new(),
                }
            }
            Interaction::RegionHovered(name) => vec![Effect::Hover(name)],
            Interaction::RegionUnhovered(name) => {
                let keep_emphasis = self.selection.highlighted() == Some(name.as_str());
                let mut effects = vec![Effect::ResetStyle(name.clone())];
                if keep_emphasis {
                    effects.push(Effect::Emphasize(name));
                }
                effects
            }
            Interaction::SidebarToggled => vec![Effect::OpenSidebar],
            Interaction::SidebarClosed => self.step(SelectionEvent::SidebarClosed),
            Interaction::CompareRequested => self.step(SelectionEvent::CompareRequested),
            Interaction::ComparisonClosed => self.step(SelectionEvent::ComparisonClosed),
            Interaction::ColorModeChanged(mode) => {
                self.color_mode = mode;
                vec![Effect::RenderLayer(mode)]
            }
            Interaction::RankingsSorted(sort) => {
                self.sort = sort;
                vec![Effect::RenderRankings {
                    sort,
                    rows: ranking_rows(loaded.index.regions(), sort),
                }]
            }
            Interaction::RankingPicked(name) => {
                let mut effects = self.pick(name);
                effects.push(Effect::CloseRankings);
                effects
            }
            Interaction::SearchTyped(query) => {
                let names: Vec<String> = search(loaded.index.regions(), &query)
                    .into_iter()
                    .map(|r| r.name.clone())
                    .collect();
                if names.is_empty() {
                    vec![Effect::HideSuggestions]
                } else {
                    vec![Effect::ShowSuggestions(names)]
                }
            }
            Interaction::SuggestionPicked(name) => {
                let mut effects = vec![Effect::HideSuggestions];
                effects.extend(self.pick(name));
                effects
            }
        }
    }

    /// Select a region by name from a list, framing it whatever the selection state.
    fn pick(&mut self, name: String) -> Vec<Effect> {
        let bounds = self
            .index()
            .and_then(|index| index.get(&name))
            .and_then(|region| region.bounds());
        let mut effects = self.step(SelectionEvent::RegionClicked(name));
        let framed = effects.iter().any(|e| matches!(e, Effect::FitBounds(_)));
        if let (Some(bounds), false) = (bounds, framed) {
            effects.insert(0, Effect::FitBounds(bounds));
        }
        effects
    }

    fn step(&mut self, event: SelectionEvent) -> Vec<Effect> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Vec::new();
        };
        let state = std::mem::take(&mut self.selection);
        let (next, effects) = selection::transition(state, &event, &loaded.index);
        self.selection = next;
        effects
    }
}
