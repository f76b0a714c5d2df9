use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::constants::FOOTER_HEIGHT;
use super::view::Ui;
use super::widgets::TileWidget;

impl Ui {
    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(f.area());

        self.draw_board(f, chunks[0]);
        self.draw_footer(f, chunks[1]);
    }

    fn draw_board(&self, f: &mut Frame<'_>, area: Rect) {
        let style = &self.board.config().tile;
        for frame in self.board.frames() {
            f.render_widget(TileWidget::new(&frame, style), area);
        }
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let auto_add = self.board.auto_add_enabled();
        let help = self.keybindings.generate_help_text(self.key_context(), auto_add);
        let grid = self.board.grid();
        let mut status = format!(
            "  queue {}  shown {}/{}  waiting {}",
            self.board.queue().len(),
            grid.occupied(),
            grid.capacity(),
            grid.buffer().len(),
        );
        if auto_add {
            status.push_str("  [auto]");
        }
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::styled(status, Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}
