use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// One labelled column
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Vertical bar chart with a value row and a label row under the bars
pub struct BarsWidget<'a> {
    title: &'a str,
    bars: Vec<Bar>,
    precision: usize,
}

impl<'a> BarsWidget<'a> {
    pub fn new(title: &'a str, bars: Vec<Bar>) -> Self {
        Self {
            title,
            bars,
            precision: 1,
        }
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Rows filled for `value` out of `max` in a column `height` tall.
fn bar_height(value: f64, max: f64, height: u16) -> u16 {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let h = (value / max * height as f64).round() as u16;
    h.clamp(1, height)
}

impl Widget for BarsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.bars.is_empty() {
            Paragraph::new(Span::styled("No data", Theme::dim())).render(inner, buf);
            return;
        }
        if inner.height < 3 || inner.width == 0 {
            return;
        }

        let n = self.bars.len() as u16;
        let slot = (inner.width / n).max(1);
        let bar_width = slot.saturating_sub(1).max(1);
        let chart_height = inner.height - 2;
        let value_y = inner.y + chart_height;
        let label_y = value_y + 1;
        let max = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);

        for (i, bar) in self.bars.iter().enumerate() {
            let x0 = inner.x + i as u16 * slot;
            if x0 >= inner.x + inner.width {
                break;
            }
            let width = bar_width.min(inner.x + inner.width - x0);

            let filled = bar_height(bar.value, max, chart_height);
            for dy in 0..filled {
                let y = value_y - 1 - dy;
                for x in x0..x0 + width {
                    buf[(x, y)].set_char('█').set_fg(bar.color);
                }
            }

            let value = format!("{:.prec$}", bar.value, prec = self.precision);
            buf.set_stringn(x0, value_y, &value, width as usize, Style::default().fg(bar.color));
            buf.set_stringn(x0, label_y, &bar.label, width as usize, Theme::dim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_scale_to_tallest_bar() {
        assert_eq!(bar_height(10.0, 10.0, 8), 8);
        assert_eq!(bar_height(5.0, 10.0, 8), 4);
        assert_eq!(bar_height(0.1, 10.0, 8), 1);
        assert_eq!(bar_height(0.0, 10.0, 8), 0);
        assert_eq!(bar_height(3.0, 0.0, 8), 0);
    }

    #[test]
    fn renders_labels_under_bars() {
        let area = Rect::new(0, 0, 22, 8);
        let mut buf = Buffer::empty(area);
        let bars = vec![
            Bar::new("Mon", 4.0, Color::Green),
            Bar::new("Tue", 2.0, Color::Green),
        ];
        BarsWidget::new("Daily", bars).render(area, &mut buf);

        // inner area is 20x6: 4 chart rows, value row at y=5, labels at y=6
        let label: String = (1..4).map(|x| buf[(x, 6)].symbol().to_string()).collect();
        assert_eq!(label, "Mon");
        assert_eq!(buf[(1, 1)].symbol(), "█");
        assert_eq!(buf[(11, 1)].symbol(), " ");
        assert_eq!(buf[(11, 4)].symbol(), "█");
    }
}
