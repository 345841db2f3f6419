use iocraft::prelude::*;

use crate::summary::IssueSummary;
use crate::theme::Palette;
use crate::types::IssueState;

// ---------------------------------------------------------------------------
// SummaryBar component: state toggle, headline, top repositories
// ---------------------------------------------------------------------------

/// Show at most this many repositories in the bar.
const MAX_REPOS: usize = 5;

pub struct StateTab {
    pub label: String,
    pub is_active: bool,
    pub color: Color,
}

pub struct RenderedSummary {
    pub states: Vec<StateTab>,
    pub headline: String,
    pub repos: String,
    pub text_fg: Color,
    pub faint_fg: Color,
}

impl RenderedSummary {
    pub fn build(summary: &IssueSummary, palette: &Palette) -> Self {
        let states = [IssueState::Open, IssueState::Closed]
            .into_iter()
            .map(|state| StateTab {
                label: match state {
                    IssueState::Open => "[o] Open".to_owned(),
                    IssueState::Closed => "[c] Closed".to_owned(),
                },
                is_active: state == summary.state,
                color: palette.state_color(state),
            })
            .collect();

        let mut repos: Vec<String> = summary
            .repos
            .iter()
            .take(MAX_REPOS)
            .map(|(name, count)| format!("{name} ({count})"))
            .collect();
        if summary.repos.len() > MAX_REPOS {
            repos.push(format!("+{} more", summary.repos.len() - MAX_REPOS));
        }

        Self {
            states,
            headline: summary.headline(),
            repos: repos.join("  "),
            text_fg: palette.text,
            faint_fg: palette.faint,
        }
    }
}

#[derive(Default, Props)]
pub struct SummaryBarProps {
    pub summary: Option<RenderedSummary>,
}

#[component]
pub fn SummaryBar(props: &mut SummaryBarProps) -> impl Into<AnyElement<'static>> {
    let Some(s) = props.summary.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Single,
            border_edges: Edges::Bottom,
            border_color: s.faint_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View {
                #(s.states.into_iter().enumerate().map(|(i, tab)| {
                    let (fg, bg, weight) = if tab.is_active {
                        (Color::Black, tab.color, Weight::Bold)
                    } else {
                        (tab.color, Color::Reset, Weight::Normal)
                    };
                    element! {
                        View(key: i, margin_right: 1, background_color: bg) {
                            Text(content: format!(" {} ", tab.label), color: fg, weight, wrap: TextWrap::NoWrap)
                        }
                    }
                }))
                View(flex_grow: 1.0, padding_left: 1) {
                    Text(content: s.headline, color: s.text_fg, wrap: TextWrap::NoWrap)
                }
            }
            Text(content: s.repos, color: s.faint_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSpec;

    #[test]
    fn marks_active_state_and_truncates_repos() {
        let mut summary = IssueSummary::build(&[], &FilterSpec::default());
        summary.repos = (0..7).map(|i| (format!("org/r{i}"), 7 - i)).collect();
        let rendered = RenderedSummary::build(&summary, &Palette::default());
        assert!(rendered.states[0].is_active);
        assert!(!rendered.states[1].is_active);
        assert!(rendered.repos.starts_with("org/r0 (7)"));
        assert!(rendered.repos.ends_with("+2 more"));
    }
}
