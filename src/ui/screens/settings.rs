use crate::models::{BlockConfig, Crop, GrowthStage, SoilType};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Crop,
    Stage,
    Soil,
    AreaHa,
    Efficiency,
    PumpRate,
    MaxEventDepth,
    MaxEvents,
}

impl SettingsField {
    pub fn all() -> &'static [SettingsField] {
        &[
            SettingsField::Crop,
            SettingsField::Stage,
            SettingsField::Soil,
            SettingsField::AreaHa,
            SettingsField::Efficiency,
            SettingsField::PumpRate,
            SettingsField::MaxEventDepth,
            SettingsField::MaxEvents,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::Crop => "Crop",
            SettingsField::Stage => "Growth Stage",
            SettingsField::Soil => "Soil Type",
            SettingsField::AreaHa => "Area (ha)",
            SettingsField::Efficiency => "System Efficiency",
            SettingsField::PumpRate => "Pump Rate (m³/h)",
            SettingsField::MaxEventDepth => "Max Event Depth (mm)",
            SettingsField::MaxEvents => "Max Events / Week",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SettingsField::Crop => SettingsField::Stage,
            SettingsField::Stage => SettingsField::Soil,
            SettingsField::Soil => SettingsField::AreaHa,
            SettingsField::AreaHa => SettingsField::Efficiency,
            SettingsField::Efficiency => SettingsField::PumpRate,
            SettingsField::PumpRate => SettingsField::MaxEventDepth,
            SettingsField::MaxEventDepth => SettingsField::MaxEvents,
            SettingsField::MaxEvents => SettingsField::Crop,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsField::Crop => SettingsField::MaxEvents,
            SettingsField::Stage => SettingsField::Crop,
            SettingsField::Soil => SettingsField::Stage,
            SettingsField::AreaHa => SettingsField::Soil,
            SettingsField::Efficiency => SettingsField::AreaHa,
            SettingsField::PumpRate => SettingsField::Efficiency,
            SettingsField::MaxEventDepth => SettingsField::PumpRate,
            SettingsField::MaxEvents => SettingsField::MaxEventDepth,
        }
    }

    /// Crop, stage and soil cycle through their options with ←/→.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            SettingsField::Crop | SettingsField::Stage | SettingsField::Soil
        )
    }

    pub fn value_of(&self, block: &BlockConfig) -> String {
        match self {
            SettingsField::Crop => block.crop.as_str().to_string(),
            SettingsField::Stage => block.stage.as_str().to_string(),
            SettingsField::Soil => block.soil.as_str().to_string(),
            SettingsField::AreaHa => format!("{}", block.area_ha),
            SettingsField::Efficiency => format!("{}", block.efficiency),
            SettingsField::PumpRate => format!("{}", block.pump_rate_m3h),
            SettingsField::MaxEventDepth => format!("{}", block.max_event_depth_mm),
            SettingsField::MaxEvents => block.max_events.to_string(),
        }
    }

    /// Parse `value` into the block. On error the block is left unchanged.
    pub fn apply(&self, block: &mut BlockConfig, value: &str) -> Result<(), String> {
        let value = value.trim();
        let number = || {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("{}: '{}' is not a number", self.label(), value))
        };

        match self {
            SettingsField::Crop => block.crop = Crop::from_name(value),
            SettingsField::Stage => block.stage = GrowthStage::from_name(value),
            SettingsField::Soil => block.soil = SoilType::from_name(value),
            SettingsField::AreaHa => {
                let v = number()?;
                if v <= 0.0 {
                    return Err("Area must be greater than 0".into());
                }
                block.area_ha = v;
            }
            SettingsField::Efficiency => {
                let v = number()?;
                if !(v > 0.0 && v <= 1.0) {
                    return Err("Efficiency must be in (0, 1]".into());
                }
                block.efficiency = v;
            }
            SettingsField::PumpRate => {
                let v = number()?;
                if v < 0.0 {
                    return Err("Pump rate must not be negative".into());
                }
                block.pump_rate_m3h = v;
            }
            SettingsField::MaxEventDepth => {
                let v = number()?;
                if v <= 0.0 {
                    return Err("Max event depth must be greater than 0".into());
                }
                block.max_event_depth_mm = v;
            }
            SettingsField::MaxEvents => {
                let v = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| "Max events must be a whole number of at least 1".to_string())?;
                block.max_events = v;
            }
        }
        Ok(())
    }

    /// Step a choice field forward or back through its options.
    pub fn cycle(&self, block: &mut BlockConfig, forward: bool) {
        fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
            let idx = all.iter().position(|x| *x == current).unwrap_or(0);
            let n = all.len();
            let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
            all[next]
        }

        match self {
            SettingsField::Crop => block.crop = step(&Crop::ALL, block.crop, forward),
            SettingsField::Stage => block.stage = step(&GrowthStage::ALL, block.stage, forward),
            SettingsField::Soil => block.soil = step(&SoilType::ALL, block.soil, forward),
            _ => {}
        }
    }
}

pub struct SettingsScreen<'a> {
    pub block: &'a BlockConfig,
    pub focused_field: SettingsField,
    pub editing: bool,
    pub edit_buffer: String,
}

impl<'a> SettingsScreen<'a> {
    pub fn new(block: &'a BlockConfig) -> Self {
        Self {
            block,
            focused_field: SettingsField::Crop,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    pub fn with_focus(mut self, field: SettingsField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool, buffer: &str) -> Self {
        self.editing = editing;
        self.edit_buffer = buffer.to_string();
        self
    }
}

impl Widget for SettingsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(26),   // Form (8 fields * 3 lines + borders)
                Constraint::Length(4), // Help
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Settings", Theme::title()),
            Span::styled(" - Irrigated Block", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_form(chunks[1], buf);
        self.render_help(chunks[2], buf);

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("Cycle ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Cancel/Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl SettingsScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Block")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let constraints: Vec<Constraint> = SettingsField::all()
            .iter()
            .map(|_| Constraint::Length(3))
            .collect();

        let field_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in SettingsField::all().iter().enumerate() {
            let is_focused = *field == self.focused_field;

            let value = if is_focused && self.editing {
                format!("{}_", self.edit_buffer)
            } else {
                field.value_of(self.block)
            };

            let border_style = if is_focused {
                Theme::border_focused()
            } else {
                Theme::border()
            };

            let value_style = if is_focused && self.editing {
                Theme::highlight()
            } else if is_focused {
                Theme::selected()
            } else {
                Theme::normal()
            };

            let field_block = Block::default()
                .title(field.label())
                .borders(Borders::ALL)
                .border_style(border_style);

            let field_inner = field_block.inner(field_areas[i]);
            field_block.render(field_areas[i], buf);

            Paragraph::new(Span::styled(value, value_style)).render(field_inner, buf);
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Field Options")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = match self.focused_field {
            SettingsField::Crop => {
                "Options: Maize, Rice, Beans, Vegetables, Potato, Banana, Custom (unknown names use Custom)"
            }
            SettingsField::Stage => "Options: Initial, Mid, Late",
            SettingsField::Soil => "Options: Sandy, Sandy Loam, Loam, Clay Loam, Clay",
            SettingsField::AreaHa => "Irrigated area in hectares",
            SettingsField::Efficiency => "Fraction of pumped water reaching the root zone, 0-1 (drip ~0.9, furrow ~0.6)",
            SettingsField::PumpRate => "Pump delivery in m³/h; 0 when unknown (no durations shown)",
            SettingsField::MaxEventDepth => "Largest depth applied in a single event",
            SettingsField::MaxEvents => "Most events to split the week into",
        };

        Paragraph::new(Span::styled(help_text, Theme::dim())).render(inner, buf);
    }
}
