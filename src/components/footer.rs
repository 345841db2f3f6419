use std::time::Instant;

use iocraft::prelude::*;

use crate::theme::Palette;
use crate::types::RateLimitInfo;

// ---------------------------------------------------------------------------
// Footer component: source, freshness, rate limit and key hints
// ---------------------------------------------------------------------------

pub struct RenderedFooter {
    pub source_label: String,
    pub updated_text: String,
    pub rate_limit_text: String,
    pub help_hint: String,
    pub text_fg: Color,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(
        source_label: String,
        updated_text: String,
        rate_limit_text: String,
        palette: &Palette,
    ) -> Self {
        Self {
            source_label,
            updated_text,
            rate_limit_text,
            help_hint: "j/k move  o/c state  l labels  r repo  a all  R refresh  q quit".to_owned(),
            text_fg: palette.faint,
            border_fg: palette.faint,
        }
    }
}

/// `"API 4990/5000"`, with the cost of the last query when it was known.
pub fn format_rate_limit(info: Option<&RateLimitInfo>) -> String {
    let Some(rl) = info else {
        return String::new();
    };
    let mut text = format!("API {}/{}", rl.remaining, rl.limit);
    if rl.cost > 0 {
        text.push_str(&format!(" (cost {})", rl.cost));
    }
    text
}

/// How long ago the displayed data arrived, in the coarsest whole unit.
pub fn format_updated_ago(last_fetch: Option<Instant>) -> String {
    last_fetch.map_or_else(String::new, |t| {
        let secs = t.elapsed().as_secs();
        let ago = match secs {
            0..60 => format!("{secs}s"),
            60..3600 => format!("{}m", secs / 60),
            _ => format!("{}h", secs / 3600),
        };
        format!("fetched {ago} ago")
    })
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let context = [&f.source_label, &f.updated_text, &f.rate_limit_text]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("  \u{2022}  ");

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_grow: 1.0) {
                Text(content: context, color: f.text_fg, wrap: TextWrap::NoWrap)
            }
            Text(content: " \u{2502} ", color: f.border_fg, wrap: TextWrap::NoWrap)
            Text(content: f.help_hint, color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
