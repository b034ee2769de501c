use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::session::{ParticipantId, Session};
use crate::snake::Snake;

const SEPARATOR: &str = " │ ";
const HUD_MARGIN_X: u16 = 1;

/// Values the HUD shows that the session does not own.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub high_score: u32,
    pub theme: &'a Theme,
}

/// One labelled HUD value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudField {
    pub label: String,
    pub short_label: String,
    pub value: String,
}

impl HudField {
    fn new(label: impl Into<String>, short_label: impl Into<String>, value: String) -> Self {
        Self {
            label: label.into(),
            short_label: short_label.into(),
            value,
        }
    }
}

/// Renders the two HUD rows and returns the play area above them.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &Session,
    snakes: &[Snake],
    info: &HudInfo<'_>,
) -> Rect {
    let [play_area, score_area, help_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let score_area = inset_horizontal(score_area, HUD_MARGIN_X);
    let help_area = inset_horizontal(help_area, HUD_MARGIN_X);

    let fields = score_fields(session, snakes, info.high_score);
    let compact = fields_width(&fields, false) > usize::from(score_area.width);
    frame.render_widget(
        Paragraph::new(fields_line(&fields, compact, info.theme)).alignment(Alignment::Right),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(Line::from(session.mode().label()))
            .alignment(Alignment::Left)
            .style(Style::default().fg(info.theme.hud_label)),
        help_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from("arrows/WASD steer · J/K hop · P pause · Q quit"))
            .alignment(Alignment::Right)
            .style(Style::default().fg(info.theme.hud_label)),
        help_area,
    );

    play_area
}

/// Score fields for the current mode: per-participant in adversarial modes,
/// one shared tally otherwise.
#[must_use]
pub fn score_fields(session: &Session, snakes: &[Snake], high_score: u32) -> Vec<HudField> {
    let threshold = session.targets_per_level();
    let mut fields = vec![HudField::new(
        "Level",
        "V",
        session.level_index().to_string(),
    )];

    if session.mode().is_adversarial() {
        for snake in snakes {
            let id = snake.participant();
            let (label, short) = participant_labels(snake);
            fields.push(HudField::new(
                label,
                short,
                format!(
                    "{} ({}/{threshold})",
                    session.score(id),
                    session.level_progress(id)
                ),
            ));
        }
    } else {
        let shared = ParticipantId(0);
        fields.push(HudField::new(
            "Score",
            "S",
            session.score(shared).to_string(),
        ));
        fields.push(HudField::new(
            "Targets",
            "T",
            format!("{}/{threshold}", session.level_progress(shared)),
        ));
    }

    fields.push(HudField::new("Hi", "H", high_score.to_string()));
    fields
}

fn participant_labels(snake: &Snake) -> (String, String) {
    match snake.player() {
        Some(player) => (format!("P{}", player + 1), format!("{}", player + 1)),
        None => ("AI".to_owned(), "A".to_owned()),
    }
}

/// Display width of the rendered fields.
#[must_use]
pub fn fields_width(fields: &[HudField], compact: bool) -> usize {
    let separators = fields.len().saturating_sub(1) * SEPARATOR.width();
    fields
        .iter()
        .map(|field| {
            let label = if compact { &field.short_label } else { &field.label };
            label.width() + ": ".width() + field.value.width()
        })
        .sum::<usize>()
        + separators
}

fn fields_line(fields: &[HudField], compact: bool, theme: &Theme) -> Line<'static> {
    let label_style = Style::default().fg(theme.hud_label);
    let value_style = Style::default()
        .fg(theme.hud_value)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(fields.len() * 4);
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        let label = if compact { &field.short_label } else { &field.label };
        spans.push(Span::styled(format!("{label}: "), label_style));
        spans.push(Span::styled(field.value.clone(), value_style));
    }
    Line::from(spans)
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(margin.saturating_mul(2)),
        height: area.height,
    }
}
