use address_form::AddressField;
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::{AddressFormComponent, FOOTER_ROWS, ROWS_PER_FIELD};
use crate::tui::Frame;

/// Draw the form pane. Each visible field takes `ROWS_PER_FIELD` rows:
/// label, value, inline error.
pub fn render_address_form(
    form: &mut AddressFormComponent,
    f: &mut Frame<'_>,
    area: Rect,
) -> Result<()> {
    let border_style = if form.is_active() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 4 || inner.height < ROWS_PER_FIELD {
        return Ok(());
    }

    form.set_last_inner_height(inner.height);
    form.ensure_visible(form.anchor(), inner.height);
    let (start, end) = form.visible_bounds(inner.height);

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_row = None;
    for field in &AddressField::ORDER[start..end] {
        let field = *field;
        let focused = form.is_active() && field == form.focused();
        let controller = form.controller();

        lines.push(Line::from(Span::styled(
            format!("{}:", field.label()),
            Style::default().fg(Color::White).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        )));

        let value = if focused {
            form.input_value()
        } else {
            controller.value(field)
        };
        let value_span = if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else if focused {
            Span::styled(value.to_string(), Style::default().fg(Color::Black).bg(Color::White))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::Cyan))
        };
        if focused {
            cursor_row = Some(lines.len() as u16);
        }
        lines.push(Line::from(vec![Span::raw("  "), value_span]));

        match controller.error_message(field) {
            Some(message) => lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::raw("")),
        }
    }

    let hints_y = inner.y + inner.height.saturating_sub(FOOTER_ROWS);
    let fields_area = Rect {
        height: hints_y.saturating_sub(inner.y),
        ..inner
    };
    f.render_widget(Paragraph::new(lines), fields_area);

    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::White)),
        Span::raw(": Next   "),
        Span::styled("Ctrl-F", Style::default().fg(Color::White)),
        Span::raw(": Postcode   "),
        Span::styled("Ctrl-S", Style::default().fg(Color::White)),
        Span::raw(": Save   "),
        Span::styled("Esc", Style::default().fg(Color::White)),
        Span::raw(": Cancel"),
    ])
    .fg(Color::DarkGray);
    f.render_widget(
        Paragraph::new(hints),
        Rect {
            y: hints_y + 1,
            height: 1,
            ..inner
        },
    );

    if let Some(row) = cursor_row {
        let x = inner.x + 2 + form.visual_cursor() as u16;
        f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
    }

    Ok(())
}
