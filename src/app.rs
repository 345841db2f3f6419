use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::components::footer::{Footer, RenderedFooter, format_rate_limit, format_updated_ago};
use crate::components::issue_list::{IssueList, IssueListBuildConfig, RenderedIssueList};
use crate::components::label_picker::{LabelPicker, RenderedLabelPicker, label_choices};
use crate::components::summary_bar::{RenderedSummary, SummaryBar};
use crate::config::types::AppConfig;
use crate::engine::{EngineHandle, Event, Request};
use crate::filter::FilterSpec;
use crate::query::{Endpoint, to_query_string};
use crate::summary::IssueSummary;
use crate::theme::Palette;
use crate::types::{Issue, IssueState, Label, RateLimitInfo};

/// Lines taken by everything except the issue rows.
const CHROME_HEIGHT: u16 = 10;
/// Each issue row spans a title line and a label line.
const ROW_HEIGHT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    LabelPicker,
}

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub config: Option<&'a AppConfig>,
    pub engine: Option<&'a EngineHandle>,
    pub palette: Option<&'a Palette>,
    pub initial_filters: Option<&'a FilterSpec>,
    /// Where issues come from, shown in the footer.
    pub source_label: Option<&'a str>,
}

#[component]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let mut should_exit = hooks.use_state(|| false);

    let palette = props.palette.copied().unwrap_or_default();
    let date_format = props
        .config
        .map_or("relative", |c| c.defaults.date_format.as_str())
        .to_owned();
    let refetch_minutes = props.config.map_or(0, |c| c.defaults.refetch_interval_minutes);

    let seed = props.initial_filters.cloned().unwrap_or_default();
    let filters = hooks.use_state(move || seed);
    let mut issues = hooks.use_state(|| Option::<Vec<Issue>>::None);
    let mut fetch_error = hooks.use_state(|| Option::<String>::None);
    let mut rate_limit = hooks.use_state(|| Option::<RateLimitInfo>::None);
    let mut last_fetch = hooks.use_state(|| Option::<Instant>::None);
    // Key of the last request sent; a different key means the filters moved.
    let mut requested_key = hooks.use_state(|| Option::<String>::None);
    // Set by `R` and the refetch timer; consumed by the fetch trigger below.
    let mut force_refresh = hooks.use_state(|| false);

    let mut cursor = hooks.use_state(|| 0usize);
    let mut scroll_offset = hooks.use_state(|| 0usize);
    let mut input_mode = hooks.use_state(|| InputMode::Normal);
    let mut picker_labels = hooks.use_state(Vec::<Label>::new);
    let mut picker_cursor = hooks.use_state(|| 0usize);

    if should_exit.get() {
        system.exit();
    }

    // Event channel: engine pushes replies back to the UI.
    let event_channel = hooks.use_state(|| {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        (tx, Arc::new(Mutex::new(rx)))
    });
    let (event_tx, event_rx_arc) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    // Fetch trigger: send a request whenever the filters map to a new
    // request, or a refresh was asked for.
    let spec = filters.read().clone();
    let endpoint = Endpoint::for_filters(&spec);
    let key = format!("{}?{}", endpoint.path(), to_query_string(&spec));
    let key_changed = requested_key.read().as_deref() != Some(key.as_str());
    if key_changed || force_refresh.get() {
        let force = force_refresh.get();
        if force {
            force_refresh.set(false);
        }
        if key_changed {
            issues.set(None);
            fetch_error.set(None);
        }
        tracing::debug!(key = %key, force, "requesting issues");
        requested_key.set(Some(key));
        if let Some(ref eng) = engine {
            eng.send(Request::FetchIssues {
                endpoint,
                filters: spec.clone(),
                force,
                reply_tx: event_tx.clone(),
            });
        }
    }

    // Periodic refetch.
    hooks.use_future(async move {
        if refetch_minutes == 0 {
            return;
        }
        let interval = Duration::from_secs(u64::from(refetch_minutes) * 60);
        loop {
            smol::Timer::after(interval).await;
            force_refresh.set(true);
        }
    });

    // Event polling: drain replies from the engine.
    {
        let rx_for_poll = event_rx_arc.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(Duration::from_millis(100)).await;
                let events: Vec<Event> = match rx_for_poll.lock() {
                    Ok(rx) => rx.try_iter().collect(),
                    Err(_) => return,
                };
                for evt in events {
                    match evt {
                        Event::IssuesFetched {
                            issues: fetched,
                            rate_limit: rl,
                            ..
                        } => {
                            if rl.is_some() {
                                rate_limit.set(rl);
                            }
                            let count = filters.read().apply(&fetched).len();
                            let (c, offset) = clamp_position(cursor.get(), scroll_offset.get(), count);
                            cursor.set(c);
                            scroll_offset.set(offset);
                            issues.set(Some(fetched));
                            fetch_error.set(None);
                            last_fetch.set(Some(Instant::now()));
                        }
                        Event::FetchError { context, message } => {
                            tracing::warn!(%context, %message, "fetch failed");
                            fetch_error.set(Some(message));
                            last_fetch.set(Some(Instant::now()));
                        }
                    }
                }
            }
        });
    }

    let visible_rows = usize::from((height.saturating_sub(CHROME_HEIGHT) / ROW_HEIGHT).max(1));

    // Keyboard handling.
    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match input_mode.get() {
                    InputMode::Normal => {
                        let selected = selected_issue(&filters.read(), issues.read().as_deref(), cursor.get());
                        let count = issues
                            .read()
                            .as_deref()
                            .map_or(0, |all| filters.read().apply(all).len());
                        match code {
                            KeyCode::Char('q') => should_exit.set(true),
                            KeyCode::Char('j') | KeyCode::Down => {
                                let next = (cursor.get() + 1).min(count.saturating_sub(1));
                                cursor.set(next);
                                if next >= scroll_offset.get() + visible_rows {
                                    scroll_offset.set(next + 1 - visible_rows);
                                }
                            }
                            KeyCode::Char('k') | KeyCode::Up => {
                                let next = cursor.get().saturating_sub(1);
                                cursor.set(next);
                                if next < scroll_offset.get() {
                                    scroll_offset.set(next);
                                }
                            }
                            KeyCode::Char('o') => {
                                let next = filters.read().toggle_issue_state(IssueState::Open);
                                set_filters(filters, cursor, scroll_offset, next);
                            }
                            KeyCode::Char('c') => {
                                let next = filters.read().toggle_issue_state(IssueState::Closed);
                                set_filters(filters, cursor, scroll_offset, next);
                            }
                            KeyCode::Char('r') => {
                                if let Some(repo) = selected.and_then(|i| i.repo) {
                                    let next = filters.read().toggle_repo(&repo.name, &repo.owner);
                                    set_filters(filters, cursor, scroll_offset, next);
                                }
                            }
                            KeyCode::Char('a') | KeyCode::Esc => {
                                let next = filters.read().clear_repo();
                                set_filters(filters, cursor, scroll_offset, next);
                            }
                            KeyCode::Char('R') => force_refresh.set(true),
                            KeyCode::Char('l') => {
                                if let Some(issue) = selected {
                                    picker_labels.set(issue.labels);
                                    picker_cursor.set(0);
                                    input_mode.set(InputMode::LabelPicker);
                                }
                            }
                            _ => {}
                        }
                    }
                    InputMode::LabelPicker => {
                        let choices = label_choices(&filters.read(), &picker_labels.read());
                        match code {
                            KeyCode::Char('j') | KeyCode::Down => {
                                let last = choices.len().saturating_sub(1);
                                picker_cursor.set((picker_cursor.get() + 1).min(last));
                            }
                            KeyCode::Char('k') | KeyCode::Up => {
                                picker_cursor.set(picker_cursor.get().saturating_sub(1));
                            }
                            KeyCode::Char(' ') | KeyCode::Enter => {
                                if let Some(choice) = choices.get(picker_cursor.get()) {
                                    let next = filters.read().toggle_label(&choice.name);
                                    set_filters(filters, cursor, scroll_offset, next);
                                }
                            }
                            KeyCode::Esc | KeyCode::Char('l' | 'q') => {
                                input_mode.set(InputMode::Normal);
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
    });

    // --- Rendering ---

    let issues_ref = issues.read();
    let error = fetch_error.read().clone();
    let (visible, rendered_summary) = match board_view(&spec, issues_ref.as_deref(), error.as_deref()) {
        BoardView::Failed => (None, None),
        BoardView::Data(visible) => {
            let summary = IssueSummary::build(visible.as_deref().unwrap_or_default(), &spec);
            (visible, Some(RenderedSummary::build(&summary, &palette)))
        }
    };
    let description = if error.is_some() {
        Vec::new()
    } else {
        description_lines(&spec)
    };

    let rendered_list = RenderedIssueList::build(&IssueListBuildConfig {
        issues: visible.as_deref(),
        error: error.as_deref(),
        cursor: cursor.get(),
        scroll_offset: scroll_offset.get(),
        visible_rows,
        date_format: &date_format,
        palette: &palette,
    });

    let rendered_picker = (input_mode.get() == InputMode::LabelPicker && error.is_none()).then(|| {
        let choices = label_choices(&spec, &picker_labels.read());
        RenderedLabelPicker::build(&choices, picker_cursor.get(), &palette)
    });

    let rendered_footer = RenderedFooter::build(
        props.source_label.unwrap_or_default().to_owned(),
        format_updated_ago(last_fetch.get()),
        format_rate_limit(rate_limit.read().as_ref()),
        &palette,
    );

    element! {
        View(width, height, flex_direction: FlexDirection::Column) {
            View(flex_direction: FlexDirection::Column, padding_left: 1, padding_right: 1) {
                #(description.into_iter().enumerate().map(|(i, line)| element! {
                    Text(key: i, content: line, color: palette.faint, wrap: TextWrap::NoWrap)
                }))
            }
            SummaryBar(summary: rendered_summary)
            View(flex_grow: 1.0, flex_direction: FlexDirection::Column) {
                IssueList(list: rendered_list)
                LabelPicker(picker: rendered_picker)
            }
            Footer(footer: rendered_footer)
        }
    }
}

/// Replace the filters and reset the list position when they change.
fn set_filters(
    mut filters: State<FilterSpec>,
    mut cursor: State<usize>,
    mut scroll_offset: State<usize>,
    next: FilterSpec,
) {
    if *filters.read() == next {
        return;
    }
    filters.set(next);
    cursor.set(0);
    scroll_offset.set(0);
}

/// What the board body shows.
#[derive(Debug)]
enum BoardView<'a> {
    /// A failed fetch replaces everything, including rows kept from an
    /// earlier success.
    Failed,
    /// Issues that pass the filters; `None` while the first reply is pending.
    Data(Option<Vec<&'a Issue>>),
}

fn board_view<'a>(spec: &FilterSpec, all: Option<&'a [Issue]>, error: Option<&str>) -> BoardView<'a> {
    if error.is_some() {
        return BoardView::Failed;
    }
    BoardView::Data(all.map(|all| spec.apply(all)))
}

/// Keep the cursor on an existing row and the window from starting below it.
fn clamp_position(cursor: usize, scroll_offset: usize, count: usize) -> (usize, usize) {
    let cursor = cursor.min(count.saturating_sub(1));
    (cursor, scroll_offset.min(cursor))
}

/// The issue under the cursor, among those that pass `spec`.
fn selected_issue(spec: &FilterSpec, all: Option<&[Issue]>, cursor: usize) -> Option<Issue> {
    all.and_then(|all| spec.apply(all).get(cursor).map(|i| (*i).clone()))
}

fn description_lines(spec: &FilterSpec) -> Vec<String> {
    let labels = spec.labels.iter().cloned().collect::<Vec<_>>().join(", ");
    let label_hint = if labels.is_empty() {
        "Showing issues with any labels.".to_owned()
    } else {
        format!("Issues labeled [{labels}] that include a replay of the bug.")
    };
    vec![
        label_hint,
        "\u{1f7e9} Contribute by investigating open issues (o).  \u{1f440} Learn by reviewing closed ones (c).".to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoRef;

    fn make_issue(number: u64, repo: &str, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: String::new(),
            url: String::new(),
            labels: labels
                .iter()
                .map(|name| Label {
                    name: (*name).to_owned(),
                    color: String::new(),
                })
                .collect(),
            state: IssueState::Open,
            repo: RepoRef::from_full_name(repo),
            updated_at: None,
            comment_count: 0,
            author: None,
        }
    }

    #[test]
    fn selected_issue_indexes_filtered_list() {
        let all = vec![
            make_issue(1, "a/x", &["bug"]),
            make_issue(2, "a/y", &["has-replay"]),
            make_issue(3, "b/z", &["has-replay"]),
        ];
        let spec = FilterSpec::default();
        assert_eq!(selected_issue(&spec, Some(&all), 0).map(|i| i.number), Some(2));
        assert_eq!(selected_issue(&spec, Some(&all), 1).map(|i| i.number), Some(3));
        assert!(selected_issue(&spec, Some(&all), 2).is_none());
        assert!(selected_issue(&spec, None, 0).is_none());
    }

    #[test]
    fn failure_hides_rows_kept_from_earlier_fetch() {
        let all = vec![make_issue(1, "a/x", &["has-replay"])];
        let spec = FilterSpec::default();
        assert!(matches!(
            board_view(&spec, Some(&all), Some("boom")),
            BoardView::Failed
        ));
        assert!(matches!(board_view(&spec, None, Some("boom")), BoardView::Failed));
        match board_view(&spec, Some(&all), None) {
            BoardView::Data(Some(rows)) => assert_eq!(rows.len(), 1),
            other => panic!("expected rows, got {other:?}"),
        }
        assert!(matches!(board_view(&spec, None, None), BoardView::Data(None)));
    }

    #[test]
    fn position_is_clamped_to_shorter_list() {
        assert_eq!(clamp_position(9, 8, 3), (2, 2));
        assert_eq!(clamp_position(4, 1, 10), (4, 1));
        assert_eq!(clamp_position(5, 5, 0), (0, 0));
    }

    #[test]
    fn description_names_required_labels() {
        let lines = description_lines(&FilterSpec::default().toggle_label("bug"));
        assert!(lines[0].contains("[has-replay, bug]"));
        let none = description_lines(&FilterSpec::default().toggle_label("has-replay"));
        assert!(none[0].starts_with("Showing issues with any labels"));
    }
}
