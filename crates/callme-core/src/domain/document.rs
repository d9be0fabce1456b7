//! A minimal document: elements in tree order, the active element, and the
//! `main` landmark whose assistive-technology visibility tracks the dialog.

use serde::Serialize;
use tracing::trace;

use crate::domain::ids::ElementId;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Anchor { href: bool },
    Button,
    Input,
    Select,
    TextArea,
    Generic,
}

impl Tag {
    fn is_form_control(self) -> bool {
        matches!(self, Tag::Button | Tag::Input | Tag::Select | Tag::TextArea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Main,
    Dialog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub id: ElementId,
    pub tag: Tag,
    pub region: Region,
    pub label: String,
    pub disabled: bool,
    pub tabindex: Option<i32>,
    pub connected: bool,
}

impl Element {
    /// Whether `focus()` on this element would take effect.
    pub fn is_focusable(&self) -> bool {
        if !self.connected {
            return false;
        }
        if self.tag.is_form_control() {
            return !self.disabled;
        }
        matches!(self.tag, Tag::Anchor { href: true }) || self.tabindex.is_some()
    }

    fn in_tab_order(&self) -> bool {
        self.is_focusable() && self.tabindex.map_or(true, |index| index >= 0)
    }

    /// Membership in the dialog's focus-trap set: `a[href]`, enabled form
    /// controls, and anything with a tabindex other than -1.
    fn is_trap_candidate(&self) -> bool {
        if !self.connected {
            return false;
        }
        match self.tag {
            Tag::Anchor { href: true } => true,
            tag if tag.is_form_control() && !self.disabled => true,
            _ => self.tabindex.is_some_and(|index| index != -1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Landmark {
    aria_hidden: bool,
}

impl Landmark {
    pub fn set_hidden(&mut self, hidden: bool) {
        if self.aria_hidden != hidden {
            trace!(hidden, "main landmark aria-hidden changed");
        }
        self.aria_hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.aria_hidden
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    active: Option<ElementId>,
    main: Landmark,
    dialog_hidden: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag, region: Region, label: impl Into<String>) -> ElementId {
        let id = ElementId::from_index(self.elements.len());
        self.elements.push(Element {
            id,
            tag,
            region,
            label: label.into(),
            disabled: false,
            tabindex: None,
            connected: true,
        });
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Moves focus to `id`; returns `false` and leaves focus untouched when
    /// the element cannot take focus.
    pub fn focus(&mut self, id: ElementId) -> bool {
        let focusable = self.is_focusable(id);
        if focusable {
            trace!(element = %id, "focus");
            self.active = Some(id);
        }
        focusable
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.get(id)
            .is_some_and(|element| element.is_focusable() && self.is_rendered(element))
    }

    fn is_rendered(&self, element: &Element) -> bool {
        element.region != Region::Dialog || !self.dialog_hidden
    }

    /// Content of a closed dialog is not rendered and cannot take focus.
    pub fn set_dialog_hidden(&mut self, hidden: bool) {
        self.dialog_hidden = hidden;
        if hidden {
            let active_in_dialog = self
                .active
                .and_then(|id| self.get(id))
                .is_some_and(|element| element.region == Region::Dialog);
            if active_in_dialog {
                self.active = None;
            }
        }
    }

    pub fn is_dialog_hidden(&self) -> bool {
        self.dialog_hidden
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) -> Result<(), CoreError> {
        let element = self.get_mut(id).ok_or(CoreError::UnknownElement(id))?;
        element.disabled = disabled;
        if disabled && self.active == Some(id) {
            self.active = None;
        }
        Ok(())
    }

    pub fn set_tabindex(&mut self, id: ElementId, tabindex: Option<i32>) -> Result<(), CoreError> {
        let element = self.get_mut(id).ok_or(CoreError::UnknownElement(id))?;
        element.tabindex = tabindex;
        Ok(())
    }

    /// Removes the element from the tree; its id stays reserved.
    pub fn detach(&mut self, id: ElementId) -> Result<(), CoreError> {
        let element = self.get_mut(id).ok_or(CoreError::UnknownElement(id))?;
        element.connected = false;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(())
    }

    pub fn trap_focusables(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|element| element.region == Region::Dialog && element.is_trap_candidate())
            .map(|element| element.id)
            .collect()
    }

    /// First `input, select, textarea, button` inside the dialog, in tree
    /// order, disabled or not.
    pub fn first_dialog_control(&self) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|element| {
                element.region == Region::Dialog && element.connected && element.tag.is_form_control()
            })
            .map(|element| element.id)
    }

    /// Sequential (Tab key) navigation order, optionally limited to a region.
    pub fn tab_order(&self, scope: Option<Region>) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|element| scope.map_or(true, |region| element.region == region))
            .filter(|element| element.in_tab_order() && self.is_rendered(element))
            .map(|element| element.id)
            .collect()
    }

    /// Default Tab / Shift+Tab behaviour: step through [`Self::tab_order`],
    /// wrapping at either end.
    pub fn focus_step(&mut self, scope: Option<Region>, backwards: bool) -> Option<ElementId> {
        let order = self.tab_order(scope);
        if order.is_empty() {
            return None;
        }
        let position = self
            .active
            .and_then(|active| order.iter().position(|id| *id == active));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(index), false) => (index + 1) % order.len(),
            (Some(0), true) => order.len() - 1,
            (Some(index), true) => index - 1,
        };
        let target = order[next];
        self.focus(target).then_some(target)
    }

    pub fn main(&self) -> &Landmark {
        &self.main
    }

    pub fn main_mut(&mut self) -> &mut Landmark {
        &mut self.main
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, Region, Tag};

    fn sample() -> (Document, [crate::domain::ElementId; 4]) {
        let mut doc = Document::new();
        let link = doc.insert(Tag::Anchor { href: true }, Region::Main, "About");
        let open = doc.insert(Tag::Button, Region::Main, "Open");
        let input = doc.insert(Tag::Input, Region::Dialog, "Name");
        let close = doc.insert(Tag::Button, Region::Dialog, "Close");
        (doc, [link, open, input, close])
    }

    #[test]
    fn focus_rejects_disabled_and_detached_elements() {
        let (mut doc, [link, open, input, _]) = sample();
        assert!(doc.focus(open));
        doc.set_disabled(input, true).expect("disable");
        assert!(!doc.focus(input));
        assert_eq!(doc.active_element(), Some(open));

        doc.detach(link).expect("detach");
        assert!(!doc.focus(link));
        assert_eq!(doc.active_element(), Some(open));
    }

    #[test]
    fn detaching_active_element_clears_focus() {
        let (mut doc, [_, open, _, _]) = sample();
        doc.focus(open);
        doc.detach(open).expect("detach");
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn anchors_without_href_are_not_focusable() {
        let mut doc = Document::new();
        let anchor = doc.insert(Tag::Anchor { href: false }, Region::Main, "plain");
        assert!(!doc.focus(anchor));
        doc.set_tabindex(anchor, Some(0)).expect("tabindex");
        assert!(doc.focus(anchor));
    }

    #[test]
    fn trap_set_honours_tabindex_and_disabled() {
        let (mut doc, [_, _, input, close]) = sample();
        let hidden = doc.insert(Tag::Generic, Region::Dialog, "skip");
        doc.set_tabindex(hidden, Some(-1)).expect("tabindex");
        let custom = doc.insert(Tag::Generic, Region::Dialog, "custom");
        doc.set_tabindex(custom, Some(0)).expect("tabindex");
        doc.set_disabled(close, true).expect("disable");

        assert_eq!(doc.trap_focusables(), vec![input, custom]);
    }

    #[test]
    fn first_dialog_control_includes_disabled_controls() {
        let (mut doc, [_, _, input, _]) = sample();
        doc.set_disabled(input, true).expect("disable");
        assert_eq!(doc.first_dialog_control(), Some(input));
    }

    #[test]
    fn focus_step_wraps_within_scope() {
        let (mut doc, [link, open, input, close]) = sample();
        assert_eq!(doc.focus_step(Some(Region::Main), false), Some(link));
        assert_eq!(doc.focus_step(Some(Region::Main), false), Some(open));
        assert_eq!(doc.focus_step(Some(Region::Main), false), Some(link));

        doc.focus(input);
        assert_eq!(doc.focus_step(Some(Region::Dialog), false), Some(close));
        assert_eq!(doc.focus_step(Some(Region::Dialog), true), Some(input));
        assert_eq!(doc.focus_step(Some(Region::Dialog), true), Some(close));
    }

    #[test]
    fn hidden_dialog_content_cannot_take_focus() {
        let (mut doc, [link, open, input, _]) = sample();
        doc.focus(input);
        doc.set_dialog_hidden(true);
        assert_eq!(doc.active_element(), None);
        assert!(!doc.focus(input));
        assert_eq!(doc.tab_order(None), vec![link, open]);
        assert!(doc.trap_focusables().contains(&input));
    }

    #[test]
    fn landmark_visibility_toggles() {
        let mut doc = Document::new();
        assert!(!doc.main().is_hidden());
        doc.main_mut().set_hidden(true);
        assert!(doc.main().is_hidden());
    }
}
