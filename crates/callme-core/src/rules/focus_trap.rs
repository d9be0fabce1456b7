use crate::domain::{Document, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab { shift: bool },
    Escape,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Default behaviour applies.
    Pass,
    /// Focus was wrapped to the given element; default prevented.
    Wrapped(ElementId),
    /// The dialog must be cancelled; default prevented.
    Cancel,
}

impl TrapOutcome {
    pub fn prevents_default(self) -> bool {
        !matches!(self, TrapOutcome::Pass)
    }
}

/// Keeps Tab cycling inside the open dialog and turns Escape into a cancel.
pub fn trap_focus(doc: &mut Document, dialog_open: bool, key: Key) -> TrapOutcome {
    if !dialog_open {
        return TrapOutcome::Pass;
    }
    let focusable = doc.trap_focusables();
    let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
        return TrapOutcome::Pass;
    };
    let active = doc.active_element();

    match key {
        Key::Tab { shift: true } if active == Some(first) => {
            doc.focus(last);
            TrapOutcome::Wrapped(last)
        }
        Key::Tab { shift: false } if active == Some(last) => {
            doc.focus(first);
            TrapOutcome::Wrapped(first)
        }
        Key::Escape => TrapOutcome::Cancel,
        _ => TrapOutcome::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::{trap_focus, Key, TrapOutcome};
    use crate::domain::{Document, ElementId, Region, Tag};

    fn dialog() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        doc.insert(Tag::Button, Region::Main, "Open");
        let first = doc.insert(Tag::Input, Region::Dialog, "Name");
        let middle = doc.insert(Tag::Input, Region::Dialog, "Email");
        let last = doc.insert(Tag::Button, Region::Dialog, "Close");
        (doc, first, middle, last)
    }

    #[test]
    fn tab_on_last_wraps_to_first() {
        let (mut doc, first, _, last) = dialog();
        doc.focus(last);
        let outcome = trap_focus(&mut doc, true, Key::Tab { shift: false });
        assert_eq!(outcome, TrapOutcome::Wrapped(first));
        assert!(outcome.prevents_default());
        assert_eq!(doc.active_element(), Some(first));
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        let (mut doc, first, _, last) = dialog();
        doc.focus(first);
        let outcome = trap_focus(&mut doc, true, Key::Tab { shift: true });
        assert_eq!(outcome, TrapOutcome::Wrapped(last));
        assert_eq!(doc.active_element(), Some(last));
    }

    #[test]
    fn tab_in_the_middle_passes_through() {
        let (mut doc, first, middle, _) = dialog();
        doc.focus(middle);
        assert_eq!(
            trap_focus(&mut doc, true, Key::Tab { shift: false }),
            TrapOutcome::Pass
        );
        assert_eq!(
            trap_focus(&mut doc, true, Key::Tab { shift: true }),
            TrapOutcome::Pass
        );
        doc.focus(first);
        assert_eq!(
            trap_focus(&mut doc, true, Key::Tab { shift: false }),
            TrapOutcome::Pass
        );
    }

    #[test]
    fn escape_cancels_when_open() {
        let (mut doc, first, _, _) = dialog();
        doc.focus(first);
        assert_eq!(trap_focus(&mut doc, true, Key::Escape), TrapOutcome::Cancel);
    }

    #[test]
    fn closed_dialog_is_ignored() {
        let (mut doc, _, _, last) = dialog();
        doc.focus(last);
        assert_eq!(trap_focus(&mut doc, false, Key::Escape), TrapOutcome::Pass);
        assert_eq!(
            trap_focus(&mut doc, false, Key::Tab { shift: false }),
            TrapOutcome::Pass
        );
        assert_eq!(doc.active_element(), Some(last));
    }

    #[test]
    fn dialog_without_focusables_is_ignored() {
        let mut doc = Document::new();
        let open = doc.insert(Tag::Button, Region::Main, "Open");
        let close = doc.insert(Tag::Button, Region::Dialog, "Close");
        doc.set_disabled(close, true).expect("disable");
        doc.focus(open);
        assert_eq!(trap_focus(&mut doc, true, Key::Escape), TrapOutcome::Pass);
    }

    #[test]
    fn other_keys_pass() {
        let (mut doc, first, _, _) = dialog();
        doc.focus(first);
        assert_eq!(trap_focus(&mut doc, true, Key::Other), TrapOutcome::Pass);
        assert_eq!(trap_focus(&mut doc, true, Key::Enter), TrapOutcome::Pass);
    }
}
