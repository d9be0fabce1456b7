use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use callme_core::rules::Key;
use callme_core::{phone_digits, ElementId, FieldKind, Page, PageEffect, PageEvent, ReturnValue};

#[derive(Debug)]
pub struct App {
    pub page: Page,
    pub show_help: bool,
    pub should_quit: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl App {
    pub fn new(mut page: Page) -> Self {
        let opener = page.controls().open_button;
        page.doc_mut().focus(opener);
        Self {
            page,
            show_help: false,
            should_quit: false,
            status: None,
            error: None,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        ) {
            self.should_quit = true;
            return;
        }

        if self.page.is_open() {
            self.handle_dialog_key(key);
        } else {
            self.handle_page_key(key);
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => {
                self.page.doc_mut().focus_step(None, false);
            }
            KeyCode::BackTab => {
                self.page.doc_mut().focus_step(None, true);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(active) = self.page.doc().active_element() {
                    self.dispatch(PageEvent::Click(active));
                }
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let focused = self
            .page
            .focused_field()
            .map(|field| (field.element, field.kind));

        match key.code {
            KeyCode::Esc => self.dispatch(PageEvent::KeyDown(Key::Escape)),
            KeyCode::Tab => self.dispatch(PageEvent::KeyDown(Key::Tab { shift: false })),
            KeyCode::BackTab => self.dispatch(PageEvent::KeyDown(Key::Tab { shift: true })),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(PageEvent::Submit);
            }
            KeyCode::Enter => match focused {
                Some((element, FieldKind::TextArea)) => self.edit_field(element, |value| {
                    value.push('\n');
                }),
                _ => self.dispatch(PageEvent::KeyDown(Key::Enter)),
            },
            KeyCode::Left | KeyCode::Right => {
                if let Some((_, FieldKind::Select)) = focused {
                    self.cycle_option(key.code == KeyCode::Right);
                }
            }
            KeyCode::Char(' ') if focused.is_none() => {
                if let Some(active) = self.page.doc().active_element() {
                    self.dispatch(PageEvent::Click(active));
                }
            }
            KeyCode::Backspace => match focused {
                Some((_, FieldKind::Select)) | None => {}
                Some((element, FieldKind::Tel)) => self.edit_field(element, erase_phone_digit),
                Some((element, _)) => self.edit_field(element, |value| {
                    value.pop();
                }),
            },
            _ => match focused {
                Some((_, FieldKind::Select)) | None => {}
                Some((element, _)) => {
                    self.edit_field(element, |value| apply_text_input(value, key));
                }
            },
        }
    }

    fn edit_field(&mut self, element: ElementId, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.page.form().field_by_element(element) else {
            return;
        };
        let mut value = field.value.clone();
        edit(&mut value);
        if value != field.value {
            self.dispatch(PageEvent::Input { element, value });
        }
    }

    fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.page.focused_field() else {
            return;
        };
        if field.options.is_empty() {
            return;
        }
        let len = field.options.len();
        let current = field.options.iter().position(|option| *option == field.value);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(index), true) => (index + 1) % len,
            (Some(0), false) => len - 1,
            (Some(index), false) => index - 1,
        };
        let event = PageEvent::Input {
            element: field.element,
            value: field.options[next].clone(),
        };
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: PageEvent) {
        for effect in self.page.handle(event) {
            debug!(?effect, "page effect");
            match effect {
                PageEffect::DialogOpened => {
                    self.status = None;
                    self.error = None;
                }
                PageEffect::DialogClosed(ReturnValue::Cancel) => {
                    self.error = None;
                }
                PageEffect::DialogClosed(ReturnValue::Success) => {}
                PageEffect::Rejected(report) => {
                    let count = report.violations.len();
                    let noun = if count == 1 { "field" } else { "fields" };
                    self.set_error(format!("{count} {noun} need attention"));
                }
                PageEffect::Acknowledged(message) => {
                    self.error = None;
                    self.set_status(message);
                }
            }
        }
    }
}

/// Drops the last digit of a masked phone value. Popping a single character
/// would only remove a separator that the mask puts straight back.
fn erase_phone_digit(value: &mut String) {
    let mut digits = phone_digits(value);
    digits.pop();
    *value = digits;
}

fn apply_text_input(target: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                target.push(ch);
            }
        }
        _ => {}
    }
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(|ch: char| ch.is_whitespace()) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}
