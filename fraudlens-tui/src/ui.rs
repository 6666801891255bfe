//! UI rendering for the TUI.

use fraudlens_core::console::{HourDrillDown, Overlay, Section, SeriesState};
use fraudlens_core::format::{
    clock_part, date_part, relative_from_str, short_timestamp, spaced_timestamp, thousands,
};
use fraudlens_core::{ChatRole, LikesSeries, UserDetail};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, BorderType, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph,
        Row, Table, TableState, Wrap,
    },
    Frame,
};

use crate::app::{App, Focus};

// ========== Palette ==========

/// Accent for titles and the active tab
const ACCENT: Color = Color::Rgb(0, 180, 180);
/// Scores above the highlight threshold and bot flags
const ALERT: Color = Color::Rgb(230, 80, 80);
/// Anomaly labels other than "Normal"
const WARN: Color = Color::Rgb(230, 180, 60);
/// Secondary text
const DIM: Color = Color::Rgb(128, 128, 128);
/// Label color for detail attributes
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Chart line
const SERIES_COLOR: Color = Color::Rgb(80, 160, 220);
/// Agent chat messages
const AGENT_COLOR: Color = Color::Rgb(80, 200, 120);

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.hit_areas = Default::default();

    // Layout: tab header, body, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(8),    // Body
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_tab_header(frame, app.state.section(), chunks[0]);

    let body = Layout::horizontal([Constraint::Min(40), Constraint::Length(44)]).split(chunks[1]);
    match app.state.section() {
        Section::Videos => render_videos_section(frame, app, body[0]),
        Section::Accounts => render_accounts_section(frame, app, body[0]),
    }
    render_chat(frame, app, body[1]);
    render_footer(frame, app, chunks[2]);

    render_overlay(frame, app, area);

    if let Some(notice) = app.state.notice() {
        render_notice(frame, &notice.message, area);
    }
}

/// Render the tab bar header with Videos and Accounts tabs.
fn render_tab_header(frame: &mut Frame, active: Section, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(12), // App name
        Constraint::Min(1),     // Tabs
    ])
    .split(area);

    let app_name = Paragraph::new(" fraudlens").style(Style::default().fg(ACCENT).bold());
    frame.render_widget(app_name, chunks[0]);

    let active_style = Style::default()
        .fg(ACCENT)
        .bold()
        .add_modifier(Modifier::UNDERLINED);
    let inactive_style = Style::default().fg(Color::DarkGray);
    let (videos_style, accounts_style) = match active {
        Section::Videos => (active_style, inactive_style),
        Section::Accounts => (inactive_style, active_style),
    };

    let tabs = Line::from(vec![
        Span::styled(" Videos ", videos_style),
        Span::raw("  "),
        Span::styled(" Accounts ", accounts_style),
    ]);
    frame.render_widget(
        Paragraph::new(tabs).block(Block::default().borders(Borders::BOTTOM)),
        chunks[1],
    );
}

// ========== Videos ==========

fn render_videos_section(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Length(34), Constraint::Min(20)]).split(area);
    render_video_list(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
}

/// Video list, marking the session default and the current selection.
fn render_video_list(frame: &mut Frame, app: &App, area: Rect) {
    let drill = app.state.drill();
    let default_id = app.state.settings().default_video_id;
    let selected = drill.selected_id();

    let rows = drill.videos().iter().map(|video| {
        let marker = if Some(video.id) == selected {
            Span::styled("●", Style::default().fg(ACCENT))
        } else if video.id == default_id {
            Span::styled("★", Style::default().fg(WARN))
        } else {
            Span::raw(" ")
        };
        Row::new([
            Cell::from(marker),
            Cell::from(video.id.to_string()).style(Style::default().fg(DIM)),
            Cell::from(video.title.as_str()),
        ])
    });

    let title = if drill.videos_loaded() {
        format!(" Videos ({}) ", drill.videos().len())
    } else {
        " Videos (loading...) ".to_string()
    };

    let table = Table::new(
        rows,
        [Constraint::Length(1), Constraint::Length(4), Constraint::Fill(1)],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED).fg(ACCENT));

    let mut state = TableState::default().with_selected(Some(app.video_cursor));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Hourly likes chart with the keyboard cursor marked.
fn render_chart(frame: &mut Frame, app: &mut App, area: Rect) {
    let drill = app.state.drill();
    let title = match drill.selected_video() {
        Some(video) => format!(" {} · {} ", video.title, video.archetype),
        None => " Likes per hour ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title);

    let series = match drill.series() {
        SeriesState::Ready(series) if !series.is_empty() => series,
        state => {
            let message = match state {
                SeriesState::Idle => "Waiting for videos...",
                SeriesState::Loading => "Loading likes...",
                SeriesState::Failed => "Could not load likes for this video.",
                SeriesState::Ready(_) => "No likes recorded.",
            };
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(DIM))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let cursor = drill.cursor().min(series.len() - 1);
    let points: Vec<(f64, f64)> = series
        .data
        .iter()
        .enumerate()
        .map(|(i, &count)| (i as f64, count as f64))
        .collect();
    let cursor_point = [points[cursor]];

    let peak = series.peak().max(1);
    let y_labels = ["0".to_string(), thousands(peak)];
    let x_labels = x_axis_labels(series);
    let plot = chart_plot_area(
        block.inner(area),
        &y_labels,
        x_labels.first().map(String::as_str),
    );

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(SERIES_COLOR))
            .data(&points),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(WARN))
            .data(&cursor_point),
    ];

    let x_max = (series.len() - 1).max(1) as f64;
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(DIM))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(DIM))
                .bounds([0.0, peak as f64])
                .labels(y_labels),
        );

    app.hit_areas.chart_plot = plot;
    frame.render_widget(chart, area);

    // Cursor caption above the axis
    let label = &series.labels[cursor];
    let caption = Line::from(vec![
        Span::styled(format!(" {} ", label), Style::default().fg(WARN)),
        Span::styled(
            format!("{} likes ", thousands(series.data[cursor])),
            Style::default().fg(Color::White),
        ),
    ]);
    if area.height > 2 {
        let caption_area = Rect::new(area.x + 2, area.y + area.height - 1, area.width.saturating_sub(4), 1);
        frame.render_widget(Paragraph::new(caption).alignment(Alignment::Right), caption_area);
    }
}

/// Where `Chart` draws data inside its block.
///
/// The y axis sits right of the widest y label, or of the first x label minus
/// the one character that hangs below the axis, whichever is wider, capped at
/// a third of the width. The bottom two rows hold the x labels and the x axis.
fn chart_plot_area(inner: Rect, y_labels: &[String], first_x_label: Option<&str>) -> Option<Rect> {
    let y_width = y_labels
        .iter()
        .map(|label| Line::from(label.as_str()).width())
        .max()
        .unwrap_or(0) as u16;
    let x_overhang = first_x_label
        .map(|label| (Line::from(label).width() as u16).saturating_sub(1))
        .unwrap_or(0);
    let left = y_width.max(x_overhang).min(inner.width / 3) + 1;
    if inner.width <= left || inner.height < 3 {
        return None;
    }
    Some(Rect::new(
        inner.x + left,
        inner.y,
        inner.width - left,
        inner.height - 2,
    ))
}

/// First, middle and last hour labels.
fn x_axis_labels(series: &LikesSeries) -> Vec<String> {
    let short = |i: usize| series.labels.get(i).map(|l| short_timestamp(l)).unwrap_or_default();
    match series.len() {
        0 => Vec::new(),
        1 => vec![short(0)],
        2 => vec![short(0), short(1)],
        n => vec![short(0), short(n / 2), short(n - 1)],
    }
}

// ========== Accounts ==========

fn render_accounts_section(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(5)]).split(area);
    render_search_box(frame, app, chunks[0]);
    render_account_table(frame, app, chunks[1]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let browser = app.state.browser();
    let editing = app.focus == Focus::Search;
    let border_style = if editing {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(DIM)
    };

    let mut spans = vec![Span::raw(browser.query().to_string())];
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(ACCENT)));
    }
    if browser.query().is_empty() && !editing {
        spans = vec![Span::styled("press / to search usernames", Style::default().fg(DIM))];
    }
    if browser.search_pending() {
        spans.push(Span::styled("  …", Style::default().fg(DIM)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Search "),
    );
    frame.render_widget(paragraph, area);
}

/// Risk-ranked accounts in server order.
fn render_account_table(frame: &mut Frame, app: &App, area: Rect) {
    let browser = app.state.browser();

    let header_cells = ["User", "Risk", "Alert", "Likes", "Created", "Bot"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).bold()));
    let header = Row::new(header_cells).height(1);

    let rows = browser.users().iter().map(|user| {
        let score_style = if user.is_elevated() {
            Style::default().fg(ALERT).bold()
        } else {
            Style::default().fg(DIM)
        };
        let reason_style = if user.is_flagged() {
            Style::default().fg(WARN)
        } else {
            Style::default().fg(DIM)
        };
        Row::new([
            Cell::from(user.username.as_str()),
            Cell::from(format!("{:.0}", user.risk_score)).style(score_style),
            Cell::from(user.alert_reason.as_str()).style(reason_style),
            Cell::from(thousands(user.total_likes)),
            Cell::from(date_part(&user.created_at)).style(Style::default().fg(DIM)),
            Cell::from(if user.is_bot { "bot" } else { "" }).style(Style::default().fg(ALERT)),
        ])
    });

    let widths = [
        Constraint::Fill(1),    // User
        Constraint::Length(5),  // Risk
        Constraint::Length(24), // Alert
        Constraint::Length(7),  // Likes
        Constraint::Length(11), // Created
        Constraint::Length(4),  // Bot
    ];

    let title = if !browser.is_loaded() {
        " Accounts (loading...) ".to_string()
    } else {
        format!(" Accounts ({}) ", browser.users().len())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title);

    if browser.is_loaded() && browser.users().is_empty() {
        let paragraph = Paragraph::new("No accounts match this search.")
            .style(Style::default().fg(DIM))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED).fg(ACCENT))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(browser.cursor()));
    frame.render_stateful_widget(table, area, &mut state);
}

// ========== Chat ==========

fn render_chat(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);
    let chat = app.state.chat();

    let mut lines: Vec<Line> = Vec::new();
    for message in chat.transcript() {
        let (who, color) = match message.role {
            ChatRole::User => ("you", Color::White),
            ChatRole::Agent => ("agent", AGENT_COLOR),
        };
        lines.push(Line::from(Span::styled(
            who,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(message.text.clone()));
        lines.push(Line::default());
    }
    if chat.pending() {
        lines.push(Line::from(Span::styled(
            "Agent is typing...",
            Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
        )));
    }

    let height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Assistant "),
        );
    frame.render_widget(transcript, chunks[0]);

    let editing = app.focus == Focus::Chat;
    let input = if editing || !chat.input().is_empty() {
        Line::from(vec![
            Span::raw(chat.input().to_string()),
            Span::styled(if editing { "▏" } else { "" }, Style::default().fg(ACCENT)),
        ])
    } else {
        Line::from(Span::styled("press c to ask", Style::default().fg(DIM)))
    };
    let border_style = if editing {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(DIM)
    };
    frame.render_widget(
        Paragraph::new(input).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        ),
        chunks[1],
    );
}

// ========== Footer ==========

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow);
    let hints: &[(&str, &str)] = match (app.focus, app.state.overlay()) {
        (Focus::Search, _) => &[("type", " filter  "), ("Enter/Esc", " done  ")],
        (Focus::Chat, _) => &[("Enter", " send  "), ("Esc", " leave chat  ")],
        (Focus::Browse, Overlay::HourDrillDown(_)) => &[
            ("j/k", " select  "),
            ("Enter", " open account  "),
            ("Esc", " close  "),
        ],
        (Focus::Browse, Overlay::Closed) => match app.state.section() {
            Section::Videos => &[
                ("Tab", " accounts  "),
                ("Enter", " select video  "),
                ("h/l", " move  "),
                ("Space", " drill  "),
                ("c", " chat  "),
                ("?", " about  "),
                ("q", " quit  "),
            ],
            Section::Accounts => &[
                ("Tab", " videos  "),
                ("/", " search  "),
                ("Enter", " open  "),
                ("r", " refresh  "),
                ("c", " chat  "),
                ("q", " quit  "),
            ],
        },
        (Focus::Browse, _) => &[("Esc", " close  ")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(*action));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ========== Overlays ==========

/// Centered box of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn overlay_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ACCENT))
        .title(title)
        .title_bottom(Line::from(" Esc or click outside to close ").right_aligned())
}

fn render_overlay(frame: &mut Frame, app: &mut App, area: Rect) {
    let content = match app.state.overlay() {
        Overlay::Closed => return,
        Overlay::AccountDetail(detail) => {
            let content = centered(area, 76, 26);
            render_account_detail(frame, detail, content);
            content
        }
        Overlay::HourDrillDown(hour) => {
            let content = centered(area, 80, 22);
            if let Some((rows, offset)) =
                render_hour_drill_down(frame, hour, app.hour_cursor, content)
            {
                app.hit_areas.activity_rows = Some(rows);
                app.hit_areas.activity_offset = offset;
            }
            content
        }
        Overlay::About => {
            let content = centered(area, 56, 12);
            render_about(frame, content);
            content
        }
    };
    app.hit_areas.overlay = Some(content);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(LABEL_COLOR)),
        Span::raw(value),
    ])
}

fn render_account_detail(frame: &mut Frame, detail: &UserDetail, area: Rect) {
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(detail.username.clone(), Style::default().fg(Color::White).bold()),
            if detail.is_bot {
                Span::styled("  BOT", Style::default().fg(ALERT).bold())
            } else {
                Span::raw("")
            },
        ]),
        Line::default(),
        Line::from(Span::styled(
            detail.profile.bio_or_default().to_string(),
            Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
        field("Joined", date_part(&detail.created_at)),
        field("Location", detail.profile.location_or_default().to_string()),
        field("Followers", thousands(detail.profile.followers_or_zero())),
        field("Following", thousands(detail.profile.following_or_zero())),
        field("Total likes", thousands(detail.total_likes)),
    ];
    if let Some(posts) = detail.profile.posts {
        lines.push(field("Posts", thousands(posts)));
    }
    if let Some(last_active) = &detail.last_active {
        lines.push(field(
            "Last active",
            format!("{} ({})", spaced_timestamp(last_active), relative_from_str(last_active)),
        ));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Risk assessment",
        Style::default().fg(WARN).bold(),
    )));
    lines.push(Line::from(detail.narrative_or_default().to_string()));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Recent activity",
        Style::default().fg(LABEL_COLOR).bold(),
    )));
    if detail.recent_activity.is_empty() {
        lines.push(Line::from(Span::styled("No recent likes.", Style::default().fg(DIM))));
    }
    for entry in &detail.recent_activity {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}  ", short_timestamp(&entry.timestamp)),
                Style::default().fg(DIM),
            ),
            Span::raw(entry.title.clone()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(overlay_block(" Account ".to_string()));
    frame.render_widget(paragraph, area);
}

/// Returns the record rows' area and the table's scroll offset once records
/// are shown.
fn render_hour_drill_down(
    frame: &mut Frame,
    hour: &HourDrillDown,
    cursor: usize,
    area: Rect,
) -> Option<(Rect, usize)> {
    frame.render_widget(Clear, area);
    let block = overlay_block(format!(" {} · {} ", hour.video_title, hour.label));
    let inner = block.inner(area);

    if hour.is_loading() || hour.is_empty_result() {
        let message = if hour.is_loading() {
            "Loading activity..."
        } else {
            "No activity recorded for this hour."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(DIM))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return None;
    }

    let header_cells = ["Time", "User", "Risk label", "Bot"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).bold()));
    let header = Row::new(header_cells).height(1);

    let rows = hour.records().iter().map(|record| {
        let label_style = if record.is_flagged() {
            Style::default().fg(WARN)
        } else {
            Style::default().fg(DIM)
        };
        Row::new([
            Cell::from(clock_part(&record.timestamp)).style(Style::default().fg(DIM)),
            Cell::from(record.username.as_str()),
            Cell::from(record.risk_label.as_str()).style(label_style),
            Cell::from(if record.is_bot { "bot" } else { "" }).style(Style::default().fg(ALERT)),
        ])
    });

    let widths = [
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(24),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED).fg(ACCENT))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(table, area, &mut state);

    // Below the header row
    let rows = Rect::new(inner.x, inner.y + 1, inner.width, inner.height.saturating_sub(1));
    Some((rows, state.offset()))
}

fn render_about(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled("fraudlens", Style::default().fg(ACCENT).bold())),
        Line::from(Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(DIM),
        )),
        Line::default(),
        Line::from("Review like activity per video, drill into"),
        Line::from("single hours, and inspect risk-ranked accounts."),
        Line::default(),
        Line::from(Span::styled(
            "Risk scores and labels are computed by the backend.",
            Style::default().fg(DIM),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(overlay_block(" About ".to_string()));
    frame.render_widget(paragraph, area);
}

/// Blocking notice drawn above everything else.
fn render_notice(frame: &mut Frame, message: &str, area: Rect) {
    let content = centered(area, 48, 5);
    frame.render_widget(Clear, content);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(ALERT).bold())),
        Line::from(Span::styled("press any key", Style::default().fg(DIM))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(ALERT)),
    );
    frame.render_widget(paragraph, content);
}
