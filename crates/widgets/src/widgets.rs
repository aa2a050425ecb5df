use crate::builders::*;
use arbor_core::{EventKind, LinkKind, StateEvent};

// Semantic text elements
pub fn h1(text: &str) -> Element {
    Element::new(Heading::new(1, text))
}

pub fn h2(text: &str) -> Element {
    Element::new(Heading::new(2, text))
}

pub fn h3(text: &str) -> Element {
    Element::new(Heading::new(3, text))
}

pub fn p(text: &str) -> Element {
    Element::new(Container::new("p")).child(Element::new(Text::new(text)))
}

pub fn text(text: &str) -> Element {
    Element::new(Text::new(text))
}

pub fn div() -> Element {
    Element::new(Container::div())
}

// Controls
pub fn button(label: &str, on_click: &str) -> Element {
    Element::new(Button::new(label)).on(EventKind::Click, on_click)
}

pub fn text_field(name: &str, value: &str) -> Element {
    Element::new(TextField::new(name).with_value(value)).name(name)
}

pub fn hidden(name: &str, value: &str) -> Element {
    Element::new(HiddenField::new(name, value)).name(name)
}

// Tables: a header row followed by one row per record
pub fn table<R, C>(headers: &[&str], rows: R) -> Element
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let header = Element::new(Row::new()).children(
        headers
            .iter()
            .map(|h| Element::new(Cell::header()).child(text(h))),
    );
    let body = rows.into_iter().map(|cells| {
        Element::new(Row::new()).children(
            cells
                .into_iter()
                .map(|c| Element::new(Cell::new()).child(text(&c))),
        )
    });
    Element::new(Table::new()).child(header).children(body)
}

// Resources
pub fn script(token: &str, body: &str) -> Element {
    Element::new(Script::new(token, body))
}

pub fn stylesheet(address: &str) -> Element {
    Element::new(ModuleLink::stylesheet(address))
}

pub fn module_script(address: &str) -> Element {
    Element::new(ModuleLink::script(address))
}

pub fn meta(name: &str, content: &str) -> Element {
    Element::new(MetaTag::new(name, content))
}

pub fn on_load(token: &str, script: &str) -> Element {
    Element::new(StateHook::new(token, StateEvent::Load, script))
}

/// Links a module of either kind.
pub fn link(address: &str, kind: LinkKind) -> Element {
    match kind {
        LinkKind::Script => module_script(address),
        LinkKind::Stylesheet => stylesheet(address),
    }
}
