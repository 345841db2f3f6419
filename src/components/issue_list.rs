use iocraft::prelude::*;

use crate::color::Color as AppColor;
use crate::theme::Palette;
use crate::types::Issue;
use crate::util::{expand_emoji, format_date};

// ---------------------------------------------------------------------------
// Pre-rendered issue rows (all owned)
// ---------------------------------------------------------------------------

pub struct LabelChip {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

pub struct RenderedIssueRow {
    pub key: u64,
    pub number: String,
    pub repo: String,
    pub title: String,
    pub labels: Vec<LabelChip>,
    pub meta: String,
    pub selected: bool,
}

/// What the list body shows in place of rows.
pub enum ListStatus {
    Loading,
    Failed(String),
    Empty,
    Rows(Vec<RenderedIssueRow>),
}

pub struct RenderedIssueList {
    pub status: ListStatus,
    pub number_fg: Color,
    pub repo_fg: Color,
    pub text_fg: Color,
    pub faint_fg: Color,
    pub error_fg: Color,
    pub selected_bg: Color,
}

pub struct IssueListBuildConfig<'a> {
    /// `None` while the first response for the current filters is pending.
    pub issues: Option<&'a [&'a Issue]>,
    pub error: Option<&'a str>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,
    pub date_format: &'a str,
    pub palette: &'a Palette,
}

impl RenderedIssueList {
    pub fn build(cfg: &IssueListBuildConfig<'_>) -> Self {
        let palette = cfg.palette;
        let status = match (cfg.error, cfg.issues) {
            (Some(err), _) => ListStatus::Failed(err.to_owned()),
            (None, None) => ListStatus::Loading,
            (None, Some([])) => ListStatus::Empty,
            (None, Some(issues)) => ListStatus::Rows(
                issues
                    .iter()
                    .enumerate()
                    .skip(window_start(cfg.scroll_offset, issues.len(), cfg.visible_rows))
                    .take(cfg.visible_rows)
                    .map(|(idx, issue)| build_row(issue, idx == cfg.cursor, cfg.date_format, palette))
                    .collect(),
            ),
        };
        Self {
            status,
            number_fg: palette.accent,
            repo_fg: palette.faint,
            text_fg: palette.text,
            faint_fg: palette.faint,
            error_fg: palette.error,
            selected_bg: palette.selected_bg,
        }
    }
}

/// First row to draw. A window that would start past the end of a shorter
/// list is pulled back so the last rows stay on screen.
fn window_start(scroll_offset: usize, len: usize, visible_rows: usize) -> usize {
    scroll_offset.min(len.saturating_sub(visible_rows.max(1)))
}

fn build_row(issue: &Issue, selected: bool, date_format: &str, palette: &Palette) -> RenderedIssueRow {
    let labels = issue
        .labels
        .iter()
        .map(|label| label_chip(&label.name, &label.color, palette))
        .collect();
    let mut meta = format_date(issue.updated_at.as_ref(), date_format);
    if issue.comment_count > 0 {
        meta.push_str(&format!("  {} comments", issue.comment_count));
    }
    if let Some(author) = &issue.author {
        meta.push_str(&format!("  @{author}"));
    }
    RenderedIssueRow {
        key: issue.number,
        number: format!("#{}", issue.number),
        repo: issue
            .repo
            .as_ref()
            .map(crate::types::RepoRef::full_name)
            .unwrap_or_default(),
        title: expand_emoji(&issue.title).into_owned(),
        labels,
        meta,
        selected,
    }
}

/// Chip colored like the label on GitHub; falls back to the faint theme
/// color when the label has no usable color.
pub fn label_chip(name: &str, hex: &str, palette: &Palette) -> LabelChip {
    match AppColor::from_label_hex(hex) {
        Some(color) => LabelChip {
            text: format!(" {name} "),
            fg: color.contrasting_text(),
            bg: color.to_crossterm_color(palette.depth),
        },
        None => LabelChip {
            text: format!(" {name} "),
            fg: palette.text,
            bg: palette.faint,
        },
    }
}

// ---------------------------------------------------------------------------
// IssueList component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct IssueListProps {
    pub list: Option<RenderedIssueList>,
}

#[component]
pub fn IssueList(props: &mut IssueListProps) -> impl Into<AnyElement<'static>> {
    let Some(list) = props.list.take() else {
        return element! { View }.into_any();
    };

    let rows = match list.status {
        ListStatus::Loading => {
            return element! {
                View(padding_left: 1) {
                    Text(content: "Loading...", color: list.faint_fg)
                }
            }
            .into_any();
        }
        ListStatus::Failed(detail) => {
            return element! {
                View(flex_direction: FlexDirection::Column, padding_left: 1) {
                    Text(content: "failed to load", color: list.error_fg, weight: Weight::Bold)
                    Text(content: detail, color: list.faint_fg)
                }
            }
            .into_any();
        }
        ListStatus::Empty => {
            return element! {
                View(padding_left: 1) {
                    Text(content: "No issues match the current filters.", color: list.faint_fg)
                }
            }
            .into_any();
        }
        ListStatus::Rows(rows) => rows,
    };

    element! {
        View(flex_direction: FlexDirection::Column, flex_grow: 1.0) {
            #(rows.into_iter().map(|row| {
                let bg = if row.selected { list.selected_bg } else { Color::Reset };
                let weight = if row.selected { Weight::Bold } else { Weight::Normal };
                element! {
                    View(key: row.key, flex_direction: FlexDirection::Column, background_color: bg, padding_left: 1, padding_right: 1) {
                        View {
                            Text(content: format!("{:<7}", row.number), color: list.number_fg, wrap: TextWrap::NoWrap)
                            View(flex_grow: 1.0) {
                                Text(content: row.title, color: list.text_fg, weight, wrap: TextWrap::NoWrap)
                            }
                            Text(content: row.repo, color: list.repo_fg, wrap: TextWrap::NoWrap)
                        }
                        View(padding_left: 6) {
                            #(row.labels.into_iter().enumerate().map(|(i, chip)| element! {
                                View(key: i, margin_right: 1, background_color: chip.bg) {
                                    Text(content: chip.text, color: chip.fg, wrap: TextWrap::NoWrap)
                                }
                            }))
                            Text(content: format!("  {}", row.meta), color: list.faint_fg, wrap: TextWrap::NoWrap)
                        }
                    }
                }
            }))
        }
    }
    .into_any()
}
