use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::arena::Arena;
use crate::config::{
    GLYPH_BODY, GLYPH_DOOR, GLYPH_FLOOR, GLYPH_HEAD_AIRBORNE, GLYPH_HEAD_DOWN, GLYPH_HEAD_IDLE,
    GLYPH_HEAD_LEFT, GLYPH_HEAD_RIGHT, GLYPH_HEAD_UP, GLYPH_TARGET, GLYPH_VOID, GLYPH_WALL,
    TILE_COLUMNS, Theme,
};
use crate::grid::{Direction, GridPosition};
use crate::level::{Level, LevelProvider, Tile};
use crate::score::HighScores;
use crate::session::ModalView;
use crate::snake::Snake;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_main_menu, render_pause_menu};

/// Renders the full frame from immutable arena state.
pub fn render<P: LevelProvider>(
    frame: &mut Frame<'_>,
    arena: &Arena<P>,
    scores: &HighScores,
    theme: &Theme,
) {
    let session = arena.session();
    let high_score = scores.get(session.mode());
    let info = HudInfo { high_score, theme };
    let area = frame.area();
    let play_area = render_hud(frame, area, session, arena.snakes(), &info);

    let block = Block::bordered().border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    if let Some(level) = arena.level() {
        let board = BoardView::centered(inner, level);
        let buffer = frame.buffer_mut();
        render_tiles(buffer, &board, level, theme);
        for target in arena.world().targets() {
            board.put(buffer, target.position, GLYPH_TARGET, Style::new().fg(theme.target));
        }
        for (slot, snake) in arena.snakes().iter().enumerate() {
            render_snake(buffer, &board, snake, color_slot(snake, slot), theme);
        }
    }

    match session.modal() {
        Some(ModalView::MainMenu) => render_main_menu(frame, play_area, scores, theme),
        Some(ModalView::Pause) => render_pause_menu(frame, play_area),
        Some(ModalView::GameOver) => {
            render_game_over_menu(frame, play_area, session, high_score);
        }
        None => {}
    }
}

/// Maps grid tiles onto terminal cells, centering the level in `area`.
#[derive(Debug, Clone, Copy)]
struct BoardView<'a> {
    area: Rect,
    origin_x: u16,
    origin_y: u16,
    level: &'a Level,
}

impl<'a> BoardView<'a> {
    fn centered(area: Rect, level: &'a Level) -> Self {
        let width = u16::try_from(level.width())
            .unwrap_or(u16::MAX)
            .saturating_mul(TILE_COLUMNS);
        let height = u16::try_from(level.height()).unwrap_or(u16::MAX);
        Self {
            area,
            origin_x: area.x + area.width.saturating_sub(width) / 2,
            origin_y: area.y + area.height.saturating_sub(height) / 2,
            level,
        }
    }

    fn cell(&self, position: GridPosition) -> Option<(u16, u16)> {
        let (column, row) = self.level.screen_cell(position)?;
        let x = self
            .origin_x
            .checked_add(u16::try_from(column).ok()?.checked_mul(TILE_COLUMNS)?)?;
        let y = self.origin_y.checked_add(u16::try_from(row).ok()?)?;
        if x.saturating_add(TILE_COLUMNS) > self.area.right() || y >= self.area.bottom() {
            return None;
        }
        Some((x, y))
    }

    fn put(&self, buffer: &mut Buffer, position: GridPosition, glyph: &str, style: Style) {
        if let Some((x, y)) = self.cell(position) {
            buffer.set_string(x, y, glyph, style);
        }
    }
}

fn render_tiles(buffer: &mut Buffer, board: &BoardView<'_>, level: &Level, theme: &Theme) {
    for position in (0..level.height()).flat_map(|x| (0..level.width()).map(move |y| (x, y))) {
        let (Ok(x), Ok(y)) = (i32::try_from(position.0), i32::try_from(position.1)) else {
            continue;
        };
        let tile = GridPosition::new(x, y);
        let (glyph, color) = match level.tile(tile) {
            Tile::Floor => (GLYPH_FLOOR, theme.floor),
            Tile::Wall => (GLYPH_WALL, theme.wall),
            Tile::Door => (GLYPH_DOOR, theme.door),
            Tile::Void => (GLYPH_VOID, theme.void),
        };
        board.put(buffer, tile, glyph, Style::new().fg(color));
    }
}

fn render_snake(
    buffer: &mut Buffer,
    board: &BoardView<'_>,
    snake: &Snake,
    slot: usize,
    theme: &Theme,
) {
    let body_style = Style::new().fg(theme.snake_bodies[slot]);
    for segment in snake.body().segments().iter().rev() {
        board.put(
            buffer,
            GridPosition::from_world(segment.position()),
            GLYPH_BODY,
            body_style,
        );
    }

    let motion = snake.motion();
    let glyph = if motion.is_airborne() {
        GLYPH_HEAD_AIRBORNE
    } else {
        head_glyph(facing(motion.facing_yaw(), motion.direction()))
    };
    board.put(
        buffer,
        GridPosition::from_world(motion.position()),
        glyph,
        Style::new()
            .fg(theme.snake_heads[slot])
            .add_modifier(Modifier::BOLD),
    );
}

fn color_slot(snake: &Snake, index: usize) -> usize {
    if snake.is_ai() { 2 } else { index.min(1) }
}

/// Direction the head glyph points at; idle heads keep their facing.
fn facing(yaw_degrees: f32, direction: Direction) -> Direction {
    if direction != Direction::None {
        return direction;
    }
    Direction::MOVING
        .into_iter()
        .find(|candidate| candidate.yaw_degrees() == Some(yaw_degrees))
        .unwrap_or(Direction::None)
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_HEAD_UP,
        Direction::Down => GLYPH_HEAD_DOWN,
        Direction::Left => GLYPH_HEAD_LEFT,
        Direction::Right => GLYPH_HEAD_RIGHT,
        Direction::None => GLYPH_HEAD_IDLE,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::{facing, render};
    use crate::arena::Arena;
    use crate::config::{GLYPH_TARGET, GameConfig, THEME_CLASSIC};
    use crate::grid::Direction;
    use crate::level::BuiltinLevels;
    use crate::score::HighScores;
    use crate::session::GameMode;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn idle_head_faces_its_last_yaw() {
        assert_eq!(facing(90.0, Direction::None), Direction::Right);
        assert_eq!(facing(0.0, Direction::Left), Direction::Left);
        assert_eq!(facing(45.0, Direction::None), Direction::None);
    }

    #[test]
    fn main_menu_lists_modes() {
        let arena = Arena::new(BuiltinLevels, GameConfig::default(), 1);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");

        terminal
            .draw(|frame| render(frame, &arena, &HighScores::default(), &THEME_CLASSIC))
            .expect("draw succeeds");

        let text = buffer_text(&terminal);
        assert!(text.contains("GRID SNAKE"));
        assert!(text.contains("Player vs AI"));
    }

    #[test]
    fn running_match_draws_level_and_target() {
        let mut arena = Arena::new(BuiltinLevels, GameConfig::default(), 1);
        arena.start(GameMode::SinglePlayer).expect("built-in level loads");
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");

        terminal
            .draw(|frame| render(frame, &arena, &HighScores::default(), &THEME_CLASSIC))
            .expect("draw succeeds");

        let text = buffer_text(&terminal);
        assert!(text.contains(GLYPH_TARGET));
        assert!(text.contains("Level: 1"));
    }
}
