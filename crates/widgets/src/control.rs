//! Form controls.

use arbor_core::{
    AttachContext, CompileContext, CompileError, EventKind, MarkupWriter, NodeId, RenderContext,
    RenderError, TreeError, Widget,
};
use arbor_style::ThemeKey;
use log::warn;

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn themed_keys(&self) -> &'static [&'static str] {
        &[ThemeKey::BUTTON_CLASS]
    }

    fn needs_identifier(&self) -> bool {
        true
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        if let Some(class) = ctx.themed(ThemeKey::BUTTON_CLASS) {
            ctx.node_mut()?.add_class(class);
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.open(out, "button", &[("type", "button")]);
        out.text(&self.label).close("button");
        Ok(())
    }
}

/// A text input. On its first compile it synthesizes a hidden companion
/// field on the page that mirrors the input's value, so the value is still
/// posted when the input itself is disabled client-side.
#[derive(Debug, Clone)]
pub struct TextField {
    name: String,
    value: String,
    companion: Option<NodeId>,
}

impl TextField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            companion: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// The synthesized hidden field, once compiled.
    pub fn companion(&self) -> Option<NodeId> {
        self.companion
    }
}

impl Widget for TextField {
    fn kind(&self) -> &'static str {
        "text-field"
    }

    fn needs_identifier(&self) -> bool {
        true
    }

    fn compile(&mut self, ctx: &mut CompileContext<'_>) -> Result<(), CompileError> {
        if self.companion.is_some() {
            return Ok(());
        }
        let own_id = ctx
            .node()?
            .effective_id()
            .map(|id| id.to_string())
            .ok_or_else(|| CompileError::Widget {
                node: ctx.node_id(),
                kind: self.kind(),
                message: "text field compiled without an identifier".to_string(),
            })?;
        let shadow_id = format!("{own_id}_shadow");

        let companion = ctx.create(HiddenField::new(format!("{}_shadow", self.name), &self.value));
        ctx.get_node_mut(companion)?.set_id(&shadow_id).map_err(TreeError::from)?;
        ctx.append_to_page(companion)?;
        ctx.node_mut()?.add_event(
            EventKind::Change,
            format!("document.getElementById('{shadow_id}').value=this.value"),
        );
        self.companion = Some(companion);
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.void(
            out,
            "input",
            &[("type", "text"), ("name", self.name.as_str()), ("value", self.value.as_str())],
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HiddenField {
    name: String,
    value: String,
}

impl HiddenField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Widget for HiddenField {
    fn kind(&self) -> &'static str {
        "hidden-field"
    }

    fn attached(&mut self, ctx: &mut AttachContext<'_>) -> Result<(), TreeError> {
        let key = format!("hidden-field:{}", self.name);
        let owner = ctx.node_id().to_string();
        if !ctx.flags().mark_owned(&key, &owner)? {
            warn!(
                "Hidden field '{}' ({}) duplicates a field name already on the page",
                self.name,
                ctx.node_id()
            );
        }
        Ok(())
    }

    fn render(&self, ctx: &RenderContext<'_>, out: &mut MarkupWriter) -> Result<(), RenderError> {
        ctx.void(
            out,
            "input",
            &[("type", "hidden"), ("name", self.name.as_str()), ("value", self.value.as_str())],
        );
        Ok(())
    }
}
