use iocraft::prelude::*;

use crate::filter::FilterSpec;
use crate::theme::Palette;
use crate::types::Label;

use super::issue_list::{LabelChip, label_chip};

// ---------------------------------------------------------------------------
// Label picker: toggle filter labels from the selected issue
// ---------------------------------------------------------------------------

/// One pickable label and whether it is currently required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChoice {
    pub name: String,
    pub color: String,
    pub selected: bool,
}

/// Labels offered by the picker: the filter's required labels first (in
/// selection order), then the selected issue's remaining labels.
pub fn label_choices(spec: &FilterSpec, issue_labels: &[Label]) -> Vec<LabelChoice> {
    let color_of = |name: &str| {
        issue_labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.color.clone())
            .unwrap_or_default()
    };
    let mut choices: Vec<LabelChoice> = spec
        .labels
        .iter()
        .map(|name| LabelChoice {
            name: name.clone(),
            color: color_of(name),
            selected: true,
        })
        .collect();
    for label in issue_labels {
        if !choices.iter().any(|c| c.name == label.name) {
            choices.push(LabelChoice {
                name: label.name.clone(),
                color: label.color.clone(),
                selected: false,
            });
        }
    }
    choices
}

pub struct PickerRow {
    pub marker: &'static str,
    pub chip: LabelChip,
    pub is_cursor: bool,
}

pub struct RenderedLabelPicker {
    pub title: String,
    pub rows: Vec<PickerRow>,
    pub hint: String,
    pub border_fg: Color,
    pub text_fg: Color,
    pub faint_fg: Color,
    pub cursor_bg: Color,
}

impl RenderedLabelPicker {
    pub fn build(choices: &[LabelChoice], cursor: usize, palette: &Palette) -> Self {
        let rows = choices
            .iter()
            .enumerate()
            .map(|(i, c)| PickerRow {
                marker: if c.selected { "[x]" } else { "[ ]" },
                chip: label_chip(&c.name, &c.color, palette),
                is_cursor: i == cursor,
            })
            .collect();
        Self {
            title: "Required labels".to_owned(),
            rows,
            hint: "j/k move  space toggle  esc close".to_owned(),
            border_fg: palette.accent,
            text_fg: palette.text,
            faint_fg: palette.faint,
            cursor_bg: palette.selected_bg,
        }
    }
}

#[derive(Default, Props)]
pub struct LabelPickerProps {
    pub picker: Option<RenderedLabelPicker>,
}

#[component]
pub fn LabelPicker(props: &mut LabelPickerProps) -> impl Into<AnyElement<'static>> {
    let Some(p) = props.picker.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: p.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: p.title, color: p.text_fg, weight: Weight::Bold)
            #(p.rows.into_iter().enumerate().map(|(i, row)| {
                let bg = if row.is_cursor { p.cursor_bg } else { Color::Reset };
                element! {
                    View(key: i, background_color: bg) {
                        Text(content: format!("{} ", row.marker), color: p.text_fg, wrap: TextWrap::NoWrap)
                        View(background_color: row.chip.bg) {
                            Text(content: row.chip.text, color: row.chip.fg, wrap: TextWrap::NoWrap)
                        }
                    }
                }
            }))
            Text(content: p.hint, color: p.faint_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
