use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::score::HighScores;
use crate::session::{Crash, EndReason, GameMode, ParticipantId, Session};

/// Draws the mode picker as a centered popup.
pub fn render_main_menu(frame: &mut Frame<'_>, area: Rect, scores: &HighScores, theme: &Theme) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("GRID SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let mut body: Vec<Line<'_>> = GameMode::ALL
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            Line::from(format!(
                "[{}] {:<18} best {}",
                index + 1,
                mode.label(),
                scores.get(*mode)
            ))
        })
        .collect();
    body.push(Line::from(""));
    body.push(Line::from("[Q] Quit"));
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" modes ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("P1 arrows + J, P2 WASD + K"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_footer)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[Enter] Main menu"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &Session,
    high_score: u32,
) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let best = session.best_score();
    let is_new_high = best > high_score;
    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Level reached: {}", session.level_index())),
        Line::from(score_summary(session)),
        Line::from(format!(
            "High score: {}",
            if is_new_high { best } else { high_score }
        )),
        Line::from(end_reason_text(session.end_reason())),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter] Main menu"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn score_summary(session: &Session) -> String {
    if !session.mode().is_adversarial() {
        return format!("Score: {}", session.score(ParticipantId(0)));
    }

    let scores: Vec<String> = (0..session.mode().roster().len())
        .map(|index| session.score(ParticipantId(index)).to_string())
        .collect();
    format!("Scores: {}", scores.join(" - "))
}

/// One-line cause shown on the game-over screen.
#[must_use]
pub fn end_reason_text(reason: Option<EndReason>) -> String {
    match reason {
        Some(EndReason::LevelsExhausted) => "Every level cleared".to_owned(),
        Some(EndReason::LevelLoadFailed) => "Next level could not be loaded".to_owned(),
        Some(EndReason::Crashed { participant, crash }) => {
            let what = match crash {
                Crash::Body => "a body",
                Crash::Wall => "a wall",
            };
            format!("Snake {} hit {what}", participant.0 + 1)
        }
        None => String::new(),
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
