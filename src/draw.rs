use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::components::shot_map::ShotMap;
use crate::state::match_state::{Ball, BallKind, MatchState};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use cric_api::MatchSummary;

static TABS: &[&str; 2] = &["Overlay", "Matches"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Overlay => draw_overlay(f, layout.main, app),
                MenuItem::Selector => draw_selector(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Help: q=quit  n/Space=next ball  s=sync now  m=matches  j/k=move  Enter=select  f=fullscreen  \"=logs",
                ),
            }

            draw_over_timeline(f, layout.timeline, &app.state.session.state);

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Overlay => 0,
        MenuItem::Selector => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Overlay tab
// ---------------------------------------------------------------------------

fn draw_overlay(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state.session.state;

    let [header, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
    draw_score_strip(f, header, state);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(body);

    let [batters, bowler, status] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(left);
    draw_batters(f, batters, state);
    draw_bowler(f, bowler, state);
    draw_status_panel(f, status, app);

    draw_shot_panel(f, right, state);
}

fn draw_score_strip(f: &mut Frame, area: Rect, state: &MatchState) {
    let block = default_border(Color::White);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.batting_team.short_name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", state.score_line()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({} ov)", state.overs), Style::default().fg(Color::Gray)),
        Span::styled("  vs ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            state.bowling_team.short_name.clone(),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            if state.overs.legal_balls() == 0 {
                "   CRR —".to_string()
            } else {
                format!("   CRR {:.2}", state.crr)
            },
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(target) = state.target {
        spans.push(Span::styled(
            format!("   Target {target}"),
            Style::default().fg(Color::Cyan),
        ));
        if let Some(rrr) = state.rrr {
            spans.push(Span::styled(
                format!("  Req {rrr:.2}"),
                Style::default().fg(Color::Cyan),
            ));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_batters(f: &mut Frame, area: Rect, state: &MatchState) {
    let block = default_border(Color::DarkGray).title(" Batting ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::with_capacity(2);
    for (idx, batter) in state.batsmen.iter().enumerate() {
        let on_strike = idx == state.striker;
        let marker = if on_strike { "*" } else { " " };
        let style = if on_strike {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let portrait = if batter.portrait_url.is_some() { "◉ " } else { "" };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker} {portrait}{:<18} {:>3} ({:>3})  4s:{} 6s:{}  SR {:.2}  {}",
                batter.name,
                batter.runs,
                batter.balls,
                batter.fours,
                batter.sixes,
                batter.strike_rate(),
                batter.batting_style.label(),
            ),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_bowler(f: &mut Frame, area: Rect, state: &MatchState) {
    let block = default_border(Color::DarkGray).title(" Bowling ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let b = &state.bowler;
    let text = format!(
        " {:<18} {}-{}  {} ov  {} mdn  Econ {:.2}",
        b.name, b.wickets, b.runs_conceded, b.overs, b.maidens, b.economy()
    );
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_status_panel(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state.session.state;
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("Partnership ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} ({})", state.partnership.runs, state.partnership.balls),
            Style::default().fg(Color::White),
        ),
    ]));

    if let Some(fallen) = &state.last_wicket {
        lines.push(Line::from(vec![
            Span::styled("Last wicket ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "{} {} ({}) {} at {}",
                    fallen.batter_name, fallen.runs, fallen.balls, fallen.how_out, fallen.at_score
                ),
                Style::default().fg(Color::Red),
            ),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(commentary) = state.last_commentary.as_deref() {
        lines.push(Line::from(Span::styled(
            commentary.to_string(),
            Style::default().fg(Color::White),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_shot_panel(f: &mut Frame, area: Rect, state: &MatchState) {
    let block = default_border(Color::DarkGray).title(" Shot Map ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [map_area, detail] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);
    f.render_widget(ShotMap { state }, map_area);

    let mut detail_lines = Vec::new();
    if let Some(shot) = state.last_shot_type.as_deref() {
        let pitch = state
            .current_over
            .last()
            .or(state.last_over.last())
            .and_then(|b| b.pitch_map.as_deref())
            .unwrap_or("-");
        detail_lines.push(Line::from(Span::styled(
            format!("{shot}  |  {pitch}"),
            Style::default().fg(Color::Gray),
        )));
    }
    f.render_widget(Paragraph::new(detail_lines).alignment(Alignment::Center), detail);
}

// ---------------------------------------------------------------------------
// Over timeline
// ---------------------------------------------------------------------------

fn draw_over_timeline(f: &mut Frame, area: Rect, state: &MatchState) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let [current, last] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(Paragraph::new(over_line("This over", &state.current_over)), current);
    f.render_widget(Paragraph::new(over_line("Last over", &state.last_over)), last);
}

fn over_line<'a>(label: &'a str, balls: &'a [Ball]) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!(" {label:<10}"),
        Style::default().fg(Color::DarkGray),
    )];
    for ball in balls {
        spans.push(Span::styled(
            format!(" {} ", ball.display),
            ball_style(ball.kind),
        ));
    }
    if !balls.is_empty() {
        let runs: u32 = balls.iter().map(|b| u32::from(b.runs)).sum();
        spans.push(Span::styled(
            format!("  = {runs}"),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

fn ball_style(kind: BallKind) -> Style {
    match kind {
        BallKind::Wicket => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        BallKind::Four => Style::default().fg(Color::Green),
        BallKind::Six => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        BallKind::Dot => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::White),
    }
}

// ---------------------------------------------------------------------------
// Match selector tab
// ---------------------------------------------------------------------------

fn draw_selector(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.selector.matches.is_empty() {
        let msg = if !app.settings.has_credentials() {
            "No API key configured.\nSet CRICTUI_API_KEY to browse live matches;\nthe overlay runs in simulation mode without one."
                .to_string()
        } else if let Some(err) = app.state.last_error.as_deref() {
            format!("Catalog load failed:\n{err}\n\nPress r to retry")
        } else {
            "Loading match catalog...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines = Vec::with_capacity(app.state.selector.matches.len() + 2);
    lines.push(Line::from(Span::styled(
        "j/k to move, Enter to overlay, r to reload",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let visible = inner.height.saturating_sub(2) as usize;
    let selected = app.state.selector.selected;
    let start = selected.saturating_sub(visible.saturating_sub(1));
    for (idx, m) in app
        .state
        .selector
        .matches
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
    {
        let marker = if idx == selected { ">" } else { " " };
        let style = if idx == selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {}", summary_line(m)),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn summary_line(m: &MatchSummary) -> String {
    let score = m
        .current_inning()
        .map(|i| format!("{}/{} ({} ov)", i.runs, i.wickets, i.overs))
        .unwrap_or_else(|| {
            m.start_time
                .map(|t| t.format("%m/%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "not started".to_string())
        });
    format!(
        "{:<40} [{}] {}  — {}",
        m.name,
        m.match_type.to_uppercase(),
        score,
        m.status
    )
}

// ---------------------------------------------------------------------------
// Shared chrome
// ---------------------------------------------------------------------------

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, logs_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(widget, logs_area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
