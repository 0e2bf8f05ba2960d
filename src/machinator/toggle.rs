use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToggleKind {
    Checkbox,
    Radio,
}

impl ToggleKind {
    fn indicator_class(self) -> &'static str {
        match self {
            Self::Checkbox => CHECKBOX_CLASS,
            Self::Radio => RADIO_CLASS,
        }
    }

    fn label_class(self) -> &'static str {
        match self {
            Self::Checkbox => CHECKBOX_LABEL_CLASS,
            Self::Radio => RADIO_LABEL_CLASS,
        }
    }
}

/// One native checkbox or radio and the indicator standing in for it.
/// A radio's group is resolved on use from its name and form owner.
#[derive(Debug, Clone)]
pub(crate) struct ToggleBinding {
    pub(crate) native: NodeId,
    pub(crate) indicator: NodeId,
    pub(crate) label: Option<NodeId>,
    pub(crate) kind: ToggleKind,
}

impl Page {
    /// Returns `false` when the control was already attached.
    pub(crate) fn attach_toggle(&mut self, native: NodeId, kind: ToggleKind) -> Result<bool> {
        if self.bindings.attached.contains_key(&native) {
            return Ok(false);
        }

        let indicator = self.dom.create_detached_element("a");
        let mut classes = vec![kind.indicator_class().to_string()];
        classes.extend(class_tokens(self.dom.attr(native, "class").as_deref()));
        self.dom.set_attr(indicator, "class", &classes.join(" "))?;
        self.dom.set_attr(indicator, "tabindex", "0")?;
        self.dom.insert_after(native, indicator)?;
        self.suppress_selection(indicator)?;
        self.dom.style_set(native, "display", "none")?;

        let label = self.resolve_toggle_label(native);
        let label_is_ancestor = label.is_some_and(|label| self.dom.is_descendant_of(native, label));

        let id = ToggleId(self.bindings.toggles.len());
        self.bindings.toggles.push(ToggleBinding {
            native,
            indicator,
            label,
            kind,
        });
        self.bindings.attached.insert(native, BindingRef::Toggle(id));

        let native_target = EventTarget::Node(native);
        let indicator_target = EventTarget::Node(indicator);
        self.listeners
            .add(native_target, "change", Handler::ToggleMirror(id));
        self.listeners
            .add(indicator_target, "keydown", Handler::ToggleKeyActivate(id));
        // An ancestor label already forwards the click to the native control.
        if !label_is_ancestor {
            self.listeners
                .add(indicator_target, "click", Handler::ToggleActivate(id));
        }

        if let Some(label) = label {
            self.dom.class_add(label, kind.label_class())?;
            self.suppress_selection(label)?;
            let label_target = EventTarget::Node(label);
            if kind == ToggleKind::Checkbox {
                self.listeners
                    .add(label_target, "dblclick", Handler::LabelDoubleActivate(id));
            }
            if kind == ToggleKind::Radio || !label_is_ancestor {
                self.listeners
                    .add(label_target, "click", Handler::LabelActivate(id));
            }
        }

        let native_label = self.trace_node_label(native);
        let label_desc = label
            .map(|label| self.trace_node_label(label))
            .unwrap_or_else(|| "none".into());
        self.trace_binding_line(format!(
            "[binding] attach {:?} native={} label={} label_is_ancestor={}",
            kind, native_label, label_desc, label_is_ancestor
        ));

        self.dispatch_event(native, "change")?;
        Ok(true)
    }

    /// `label[for=id]` first, then the nearest enclosing label.
    fn resolve_toggle_label(&self, native: NodeId) -> Option<NodeId> {
        let id = self.dom.attr(native, "id").unwrap_or_default();
        if !id.is_empty() {
            let by_for = self.dom.all_element_nodes().into_iter().find(|node| {
                is_label(&self.dom, *node) && self.dom.attr(*node, "for").as_deref() == Some(id.as_str())
            });
            if by_for.is_some() {
                return by_for;
            }
        }
        self.dom
            .parent(native)
            .and_then(|parent| self.dom.closest(parent, "label").ok().flatten())
    }

    pub(crate) fn suppress_selection(&mut self, node: NodeId) -> Result<()> {
        self.dom.style_set(node, "user-select", "none")?;
        self.listeners
            .add(EventTarget::Node(node), "selectstart", Handler::SuppressSelectStart);
        Ok(())
    }

    pub(crate) fn mirror_toggle(&mut self, id: ToggleId) -> Result<HandlerOutcome> {
        let binding = self.bindings.toggle(id)?.clone();
        let checked = self.dom.checked(binding.native)?;
        let disabled = self.dom.disabled(binding.native);

        self.dom
            .class_toggle_to(binding.indicator, CHECKED_CLASS, checked)?;
        self.dom
            .class_toggle_to(binding.indicator, UNCHECKED_CLASS, !checked)?;
        self.dom
            .class_toggle_to(binding.indicator, DISABLED_CLASS, disabled)?;
        if let Some(label) = binding.label {
            self.dom.class_toggle_to(label, DISABLED_CLASS, disabled)?;
        }
        Ok(HandlerOutcome::Continue)
    }

    /// Flips the native control on behalf of its indicator or label. A radio
    /// first clears its whole group, itself included.
    pub(crate) fn activate_toggle(&mut self, id: ToggleId) -> Result<HandlerOutcome> {
        let binding = self.bindings.toggle(id)?.clone();
        if self.dom.disabled(binding.native) {
            return Ok(HandlerOutcome::Continue);
        }

        if binding.kind == ToggleKind::Radio {
            for member in self.dom.radio_group_members(binding.native) {
                self.dom.remove_attr(member, "checked")?;
                self.dom.set_checked(member, false)?;
                self.dispatch_event(member, "change")?;
            }
        }

        let checked = self.dom.checked(binding.native)?;
        self.dom.set_checked(binding.native, !checked)?;
        let native_label = self.trace_node_label(binding.native);
        self.trace_binding_line(format!(
            "[binding] toggle {:?} native={} checked={}",
            binding.kind, native_label, !checked
        ));
        self.dispatch_event(binding.native, "change")?;
        Ok(HandlerOutcome::PreventAndStop)
    }

    pub(crate) fn key_activate_toggle(
        &mut self,
        id: ToggleId,
        event: &EventState,
    ) -> Result<HandlerOutcome> {
        if !event.key.is_some_and(Key::is_activation) {
            return Ok(HandlerOutcome::Continue);
        }
        self.activate_toggle(id)?;
        Ok(HandlerOutcome::PreventAndStop)
    }

    /// Two clicks already toggled twice, so the double-click adds the one
    /// activation that nets out to a single toggle.
    pub(crate) fn double_activate_toggle(&mut self, id: ToggleId) -> Result<HandlerOutcome> {
        self.activate_toggle(id)?;
        Ok(HandlerOutcome::Continue)
    }
}
