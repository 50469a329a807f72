use crate::state::match_state::MatchState;
use crate::state::outcome::direction_label;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;

/// Wagon-wheel shot map. Draws the field as an ellipse with the batter at
/// the center and a ray for the most recent shot's angle (0° straight
/// down the ground, clockwise).
pub struct ShotMap<'a> {
    pub state: &'a MatchState,
}

impl Widget for ShotMap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 13 || area.height < 7 {
            return;
        }

        let cx = f64::from(area.x) + f64::from(area.width) / 2.0;
        let cy = f64::from(area.y) + f64::from(area.height - 1) / 2.0;
        // Terminal cells are roughly twice as tall as wide.
        let rx = (f64::from(area.width) / 2.0 - 1.0).max(1.0);
        let ry = (f64::from(area.height - 1) / 2.0 - 1.0).max(1.0);

        let boundary = Style::default().fg(Color::DarkGray);
        for step in 0..72 {
            let theta = f64::from(step) * std::f64::consts::TAU / 72.0;
            let x = cx + rx * theta.sin();
            let y = cy - ry * theta.cos();
            set_cell(buf, area, x, y, "·", boundary);
        }

        set_cell(buf, area, cx, cy, "●", Style::default().fg(Color::White));

        let Some(angle) = self.state.last_shot_angle else {
            return;
        };

        let rad = f64::from(angle).to_radians();
        let ray = Style::default().fg(Color::Yellow);
        for step in 1..=16 {
            let r = f64::from(step) / 16.0;
            let x = cx + rx * r * rad.sin();
            let y = cy - ry * r * rad.cos();
            set_cell(buf, area, x, y, "•", ray);
        }

        let label = direction_label(angle);
        let label_x = area.x + (area.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(
            label_x,
            area.y + area.height - 1,
            label,
            Style::default().fg(Color::Gray),
        );
    }
}

fn set_cell(buf: &mut Buffer, area: Rect, x: f64, y: f64, symbol: &str, style: Style) {
    let (x, y) = (x.round() as i32, y.round() as i32);
    if x < i32::from(area.x)
        || y < i32::from(area.y)
        || x >= i32::from(area.x + area.width)
        || y >= i32::from(area.y + area.height)
    {
        return;
    }
    buf.set_string(x as u16, y as u16, symbol, style);
}
