use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::{alarm::AlarmSink, app::App};

const HORIZONTAL_MARGIN: u16 = 5;
const DISPLAY_WIDTH: u16 = 30;

const START_BG: Color = Color::Rgb(187, 247, 208);
const STOP_BG: Color = Color::Rgb(254, 202, 202);
const RESET_BG: Color = Color::Rgb(191, 219, 254);

pub fn draw<A: AlarmSink>(app: &App<A>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl<A: AlarmSink> Widget for &App<A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let countdown = self.countdown();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let button_style = Style::default().patch(bold_style).fg(Color::Black);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3), // display
                Constraint::Length(1),
                Constraint::Length(1), // buttons
                Constraint::Length(1), // alarm
                Constraint::Min(0),
                Constraint::Length(1), // help
            ])
            .split(area);

        let display_area = centered(rows[1], DISPLAY_WIDTH);

        let (text, title) = match self.editing() {
            Some(buffer) => (format!("{buffer}_"), " edit HH:MM:SS "),
            None if countdown.is_at_rest() => (countdown.display(), " duration "),
            None => (countdown.display(), " remaining "),
        };

        let display_style = match countdown.urgency() {
            Some(urgency) => bold_style.bg(urgency.color()).fg(Color::Black),
            None => bold_style,
        };

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(display_style)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(display_area, buf);

        let mut buttons = vec![
            if countdown.is_running() {
                Span::styled(" [space] Stop ", button_style.bg(STOP_BG))
            } else {
                Span::styled(" [space] Start ", button_style.bg(START_BG))
            },
            Span::raw("   "),
            Span::styled(" [r] Reset ", button_style.bg(RESET_BG)),
        ];
        if countdown.variant().has_alarm() {
            let check = if countdown.is_muted() { "x" } else { " " };
            buttons.push(Span::raw("   "));
            buttons.push(Span::styled(format!("[m] [{check}] mute"), bold_style));
        }
        Paragraph::new(Line::from(buttons))
            .alignment(Alignment::Center)
            .render(rows[3], buf);

        if countdown.alarm_armed() {
            let banner = if countdown.is_muted() {
                "time's up (muted)"
            } else {
                "time's up"
            };
            Paragraph::new(Span::styled(
                banner,
                bold_style.fg(Color::Red).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(rows[4], buf);
        }

        let help = if self.editing().is_some() {
            "enter apply · esc cancel"
        } else {
            "↑/↓ or wheel adjust · e edit · q quit"
        };
        Paragraph::new(Span::styled(help, dim_style))
            .alignment(Alignment::Center)
            .render(rows[6], buf);
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
