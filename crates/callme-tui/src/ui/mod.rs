use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use callme_core::{ElementId, Field, FieldKind, ModalSupport, Page};

use crate::app::App;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(size);

    render_header(frame, chunks[0], app);

    let page = &app.page;
    if page.is_open() && page.dialog().support() == ModalSupport::Fallback {
        // The fallback dialog sits in the page flow next to the main content.
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        render_main(frame, columns[0], page);
        render_dialog(frame, columns[1], page);
    } else {
        render_main(frame, chunks[1], page);
        if page.is_open() {
            let modal = centered_rect(70, 90, size);
            frame.render_widget(Clear, modal);
            render_dialog(frame, modal, page);
        }
    }

    render_footer(frame, chunks[2], app);

    if app.show_help {
        render_help(frame, size);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let dialog = app.page.dialog();
    let result = dialog
        .result()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string());
    let title = format!(
        "surface: {}  dialog: {:?}  last result: {}",
        dialog.support(),
        dialog.state(),
        result
    );
    let block = Block::default().borders(Borders::ALL).title("callme");
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_main(frame: &mut Frame<'_>, area: Rect, page: &Page) {
    let hidden = page.doc().main().is_hidden();
    let active = page.doc().active_element();
    let controls = page.controls();

    let mut lines = vec![
        Line::from("Leave your number and we will call you back."),
        Line::from(""),
    ];
    lines.push(control_line(page, controls.intro_link, active, hidden));
    lines.push(Line::from(""));
    lines.push(control_line(page, controls.open_button, active, hidden));

    let title = if hidden { "Main (hidden)" } else { "Main" };
    let mut paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    if hidden {
        paragraph = paragraph.style(Style::default().fg(Color::DarkGray));
    }
    frame.render_widget(paragraph, area);
}

fn render_dialog(frame: &mut Frame<'_>, area: Rect, page: &Page) {
    let active = page.doc().active_element();
    let mut lines = Vec::new();

    for field in page.form().fields() {
        lines.push(field_line(field, active == Some(field.element)));
        let annotation = page.form().annotation(&field.name);
        match annotation {
            Some(annotation) if !annotation.hidden => {
                lines.push(Line::from(Span::styled(
                    format!("  {}", annotation.message),
                    Style::default().fg(Color::Red),
                )));
            }
            _ => lines.push(Line::from("")),
        }
    }

    let controls = page.controls();
    lines.push(Line::from(vec![
        button_span("[Send]", active == Some(controls.submit_button), Color::Green),
        Span::raw("  "),
        button_span("[Cancel]", active == Some(controls.close_button), Color::Red),
    ]));

    let title = match page.dialog().support() {
        ModalSupport::Native => "Request a call",
        ModalSupport::Fallback => "Request a call (fallback)",
    };
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hint = if app.page.is_open() {
        "tab next  shift+tab prev  ←/→ topic  enter activate  ctrl+s send  esc cancel"
    } else {
        "tab move  enter activate  ? help  q quit"
    };

    let mut lines = vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )));
    }
    if let Some(err) = &app.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(70, 60, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: Ctrl+C quit, ? help"),
        Line::from("Page: tab/shift+tab move, enter or space activate, q quit"),
        Line::from("Dialog: tab/shift+tab cycle, enter activate or send, esc cancel"),
        Line::from("Fields: type to edit, backspace, Ctrl+U clear, Ctrl+W delete word"),
        Line::from("Topic: left/right choose an option"),
        Line::from(""),
        Line::from("Phone digits are masked as +7 (XXX) XXX-XX-XX while typing."),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn control_line(
    page: &Page,
    id: ElementId,
    active: Option<ElementId>,
    hidden: bool,
) -> Line<'static> {
    let label = page
        .doc()
        .get(id)
        .map(|element| element.label.clone())
        .unwrap_or_default();
    let focused = active == Some(id) && !hidden;
    button_span(&format!("[{label}]"), focused, Color::Cyan).into()
}

fn field_line(field: &Field, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let label_style = if field.aria_invalid {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if field.required { "*" } else { "" };
    let value = match field.kind {
        FieldKind::Select if field.value.is_empty() => "< choose >".to_string(),
        FieldKind::Select => format!("< {} >", field.value),
        FieldKind::TextArea => field.value.replace('\n', " ⏎ "),
        _ => field.value.clone(),
    };
    let cursor = if focused && field.kind != FieldKind::Select {
        "▏"
    } else {
        ""
    };
    Line::from(vec![
        Span::styled(format!("{}{}: ", field.label, marker), label_style),
        Span::styled(value, style),
        Span::styled(cursor, style),
    ])
}

fn button_span(label: &str, focused: bool, color: Color) -> Span<'static> {
    let style = if focused {
        Style::default().fg(Color::Black).bg(color)
    } else {
        Style::default().fg(color)
    };
    Span::styled(label.to_string(), style)
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::app::App;
    use callme_core::page::PageSettings;
    use callme_core::{ModalSupport, Page, PageEvent};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app(support: ModalSupport) -> App {
        let page = Page::contact_page(PageSettings {
            support,
            ..PageSettings::default()
        })
        .expect("page");
        App::new(page)
    }

    #[test]
    fn closed_page_shows_trigger_only() {
        let app = app(ModalSupport::Native);
        let screen = rendered(&app);
        assert!(screen.contains("[Request a call]"));
        assert!(!screen.contains("[Send]"));
    }

    #[test]
    fn open_dialog_renders_fields_and_errors() {
        let mut app = app(ModalSupport::Fallback);
        let opener = app.page.controls().open_button;
        app.page.handle(PageEvent::Click(opener));
        app.page.handle(PageEvent::Submit);

        let screen = rendered(&app);
        assert!(screen.contains("Main (hidden)"));
        assert!(screen.contains("[Send]"));
        assert!(screen.contains("Email*:"));
    }
}
