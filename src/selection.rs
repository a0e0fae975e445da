//! Region selection and two-county comparison.
//!
//! [`Selection`] is a plain value: every transition takes the current value and
//! returns the next one together with the [`Effect`]s the renderer should
//! apply. Nothing here touches a map or a panel directly.

use crate::display::{GenderChart, RegionSummary};
use crate::index::RegionIndex;
use crate::render::{COMPARE_AWAITING_LABEL, COMPARE_LABEL, Effect};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    RegionSelected {
        highlighted: String,
    },
    /// Sidebar closed, the next region click completes the comparison.
    AwaitingComparisonTarget {
        anchor: String,
    },
    /// The comparison view is open. The target keeps the selection emphasis.
    ComparisonShown {
        anchor: String,
        target: String,
    },
}

impl Selection {
    pub fn highlighted(&self) -> Option<&str> {
        match self {
            Selection::RegionSelected { highlighted } => Some(highlighted),
            Selection::ComparisonShown { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn comparison_anchor(&self) -> Option<&str> {
        match self {
            Selection::AwaitingComparisonTarget { anchor }
            | Selection::ComparisonShown { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    pub fn comparing(&self) -> bool {
        matches!(self, Selection::AwaitingComparisonTarget { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    RegionClicked(String),
    CompareRequested,
    SidebarClosed,
    ComparisonClosed,
}

pub type Transition = (Selection, Vec<Effect>);

pub fn transition(state: Selection, event: &SelectionEvent, index: &RegionIndex) -> Transition {
    match event {
        SelectionEvent::RegionClicked(name) => region_clicked(state, name, index),
        SelectionEvent::CompareRequested => compare_requested(state),
        SelectionEvent::SidebarClosed => sidebar_closed(state),
        SelectionEvent::ComparisonClosed => comparison_closed(state),
    }
}

fn region_clicked(state: Selection, name: &str, index: &RegionIndex) -> Transition {
    let Some(region) = index.get(name) else {
        warn!(%name, "Click on unknown region ignored");
        return (state, Vec::new());
    };

    match state {
        Selection::AwaitingComparisonTarget { anchor } => {
            let Some(left) = index.get(&anchor) else {
                warn!(%anchor, "Comparison anchor vanished, dropping comparison");
                return (Selection::Idle, vec![Effect::SetCompareLabel(COMPARE_LABEL)]);
            };
            let effects = vec![
                Effect::Emphasize(name.to_string()),
                Effect::ShowComparison {
                    left: RegionSummary::of(left),
                    right: RegionSummary::of(region),
                },
            ];
            let next = Selection::ComparisonShown {
                anchor,
                target: name.to_string(),
            };
            (next, effects)
        }
        Selection::ComparisonShown { .. } => {
            debug!(%name, "Comparison view is open, click ignored");
            (state, Vec::new())
        }
        Selection::Idle | Selection::RegionSelected { .. } => {
            let mut effects = Vec::with_capacity(7);
            if let Some(previous) = state.highlighted() {
                effects.push(Effect::ResetStyle(previous.to_string()));
            }
            effects.push(Effect::Emphasize(name.to_string()));
            if let Some(bounds) = region.bounds() {
                effects.push(Effect::FitBounds(bounds));
            }
            effects.push(Effect::ShowDetail(RegionSummary::of(region)));
            effects.push(Effect::RenderChart(GenderChart::of(&region.stats)));
            effects.push(Effect::ShowCompareTrigger);
            effects.push(Effect::OpenSidebar);

            let next = Selection::RegionSelected {
                highlighted: name.to_string(),
            };
            (next, effects)
        }
    }
}

fn compare_requested(state: Selection) -> Transition {
    match state {
        Selection::RegionSelected { highlighted } => {
            let effects = vec![
                Effect::SetCompareLabel(COMPARE_AWAITING_LABEL),
                Effect::ResetStyle(highlighted.clone()),
                Effect::HideSidebar,
                Effect::ResetViewport,
            ];
            (Selection::AwaitingComparisonTarget { anchor: highlighted }, effects)
        }
        other => (other, Vec::new()),
    }
}

fn sidebar_closed(state: Selection) -> Transition {
    match state {
        Selection::RegionSelected { highlighted } => {
            let effects = vec![
                Effect::ResetStyle(highlighted),
                Effect::HideSidebar,
                Effect::ResetViewport,
            ];
            (Selection::Idle, effects)
        }
        Selection::ComparisonShown { .. } => (state, Vec::new()),
        other => (other, vec![Effect::HideSidebar, Effect::ResetViewport]),
    }
}

fn comparison_closed(state: Selection) -> Transition {
    match state {
        Selection::ComparisonShown { target, .. } => {
            let effects = vec![
                Effect::HideComparison,
                Effect::SetCompareLabel(COMPARE_LABEL),
                Effect::ResetStyle(target),
            ];
            (Selection::Idle, effects)
        }
        // Closing while still waiting for a target cancels the comparison.
        Selection::AwaitingComparisonTarget { .. } => (
            Selection::Idle,
            vec![Effect::HideComparison, Effect::SetCompareLabel(COMPARE_LABEL)],
        ),
        other => (other, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn index() -> RegionIndex {
        RegionIndex::new(fixtures::store())
    }

    fn click(name: &str) -> SelectionEvent {
        SelectionEvent::RegionClicked(name.to_string())
    }

    fn run(index: &RegionIndex, events: &[SelectionEvent]) -> Transition {
        let mut state = Selection::Idle;
        let mut effects = Vec::new();
        for event in events {
            let (next, produced) = transition(state, event, index);
            state = next;
            effects = produced;
        }
        (state, effects)
    }

    #[test]
    fn click_selects_and_opens_the_sidebar() {
        let index = index();
        let (state, effects) = run(&index, &[click("Nairobi")]);
        assert_eq!(state.highlighted(), Some("Nairobi"));
        assert!(!state.comparing());
        assert_eq!(effects[0], Effect::Emphasize("Nairobi".into()));
        assert!(matches!(effects[1], Effect::FitBounds(_)));
        assert!(matches!(&effects[2], Effect::ShowDetail(s) if s.name == "Nairobi"));
        assert!(effects.contains(&Effect::OpenSidebar));
        assert!(effects.contains(&Effect::ShowCompareTrigger));
    }

    #[test]
    fn new_click_clears_the_previous_highlight_first() {
        let index = index();
        let (state, effects) = run(&index, &[click("Nairobi"), click("Mombasa")]);
        assert_eq!(state.highlighted(), Some("Mombasa"));
        assert_eq!(effects[0], Effect::ResetStyle("Nairobi".into()));
        assert_eq!(effects[1], Effect::Emphasize("Mombasa".into()));
    }

    #[test]
    fn same_region_can_be_selected_twice() {
        let index = index();
        let (state, effects) = run(&index, &[click("Turkana"), click("Turkana")]);
        assert_eq!(state, Selection::RegionSelected { highlighted: "Turkana".into() });
        assert_eq!(effects[0], Effect::ResetStyle("Turkana".into()));
    }

    #[test]
    fn compare_then_click_shows_both_cards() {
        let index = index();
        let (state, _) = run(&index, &[click("Nairobi"), SelectionEvent::CompareRequested]);
        assert_eq!(state, Selection::AwaitingComparisonTarget { anchor: "Nairobi".into() });
        assert!(state.comparing());
        assert_eq!(state.comparison_anchor(), Some("Nairobi"));
        assert_eq!(state.highlighted(), None);

        let (state, effects) = transition(state, &click("Mombasa"), &index);
        assert_eq!(
            state,
            Selection::ComparisonShown { anchor: "Nairobi".into(), target: "Mombasa".into() }
        );
        assert!(!state.comparing());
        assert_eq!(state.highlighted(), Some("Mombasa"));
        match &effects[1] {
            Effect::ShowComparison { left, right } => {
                assert_eq!(left.name, "Nairobi");
                assert_eq!(right.name, "Mombasa");
            }
            other => panic!("unexpected effect {other:?}"),
        }
        // The comparison click never opens the sidebar
        assert!(!effects.contains(&Effect::OpenSidebar));
        assert!(!effects.iter().any(|e| matches!(e, Effect::ShowDetail(_))));
    }

    #[test]
    fn compare_resets_the_label_viewport_and_sidebar() {
        let index = index();
        let (_, effects) = run(&index, &[click("Nairobi"), SelectionEvent::CompareRequested]);
        assert_eq!(
            effects,
            [
                Effect::SetCompareLabel(COMPARE_AWAITING_LABEL),
                Effect::ResetStyle("Nairobi".into()),
                Effect::HideSidebar,
                Effect::ResetViewport,
            ]
        );
    }

    #[test]
    fn closing_the_comparison_returns_to_idle() {
        let index = index();
        let (state, effects) = run(
            &index,
            &[
                click("Nairobi"),
                SelectionEvent::CompareRequested,
                click("Turkana"),
                SelectionEvent::ComparisonClosed,
            ],
        );
        assert_eq!(state, Selection::Idle);
        assert_eq!(state.comparison_anchor(), None);
        assert!(effects.contains(&Effect::SetCompareLabel(COMPARE_LABEL)));
        assert!(effects.contains(&Effect::HideComparison));
    }

    #[test]
    fn closing_the_sidebar_clears_the_highlight() {
        let index = index();
        let (state, effects) = run(&index, &[click("Mombasa"), SelectionEvent::SidebarClosed]);
        assert_eq!(state, Selection::Idle);
        assert_eq!(
            effects,
            [Effect::ResetStyle("Mombasa".into()), Effect::HideSidebar, Effect::ResetViewport]
        );
    }

    #[test]
    fn compare_without_a_selection_does_nothing() {
        let index = index();
        let (state, effects) = run(&index, &[SelectionEvent::CompareRequested]);
        assert_eq!(state, Selection::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn clicks_on_unknown_regions_are_ignored() {
        let index = index();
        let (state, effects) = run(&index, &[click("Nairobi"), click("Atlantis")]);
        assert_eq!(state.highlighted(), Some("Nairobi"));
        assert!(effects.is_empty());
    }

    #[test]
    fn clicks_while_the_comparison_is_open_are_ignored() {
        let index = index();
        let (state, effects) = run(
            &index,
            &[click("Nairobi"), SelectionEvent::CompareRequested, click("Mombasa"), click("Turkana")],
        );
        assert_eq!(state.highlighted(), Some("Mombasa"));
        assert!(effects.is_empty());
    }

    #[test]
    fn comparing_always_has_an_anchor() {
        let index = index();
        let alphabet = [
            click("Nairobi"),
            click("Mombasa"),
            click("Atlantis"),
            SelectionEvent::CompareRequested,
            SelectionEvent::SidebarClosed,
            SelectionEvent::ComparisonClosed,
        ];

        // Every event sequence up to length four
        let mut frontier = vec![Selection::Idle];
        for _ in 0..4 {
            let mut next = Vec::new();
            for state in &frontier {
                for event in &alphabet {
                    let (after, _) = transition(state.clone(), event, &index);
                    assert!(!after.comparing() || after.comparison_anchor().is_some());
                    next.push(after);
                }
            }
            frontier = next;
        }
    }
}
