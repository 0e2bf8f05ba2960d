use super::*;

/// One native select, its trigger, and the popup list while one is live.
#[derive(Debug, Clone)]
pub(crate) struct SelectBinding {
    pub(crate) native: NodeId,
    pub(crate) trigger: NodeId,
    pub(crate) animation_ms: i64,
    pub(crate) popup: Option<Popup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeNotification {
    Emit,
    // Script writes to `value` never fire `change`.
    Suppress,
}

impl Page {
    pub(crate) fn attach_select(&mut self, native: NodeId, animation_ms: i64) -> Result<bool> {
        if self.bindings.attached.contains_key(&native) {
            return Ok(false);
        }

        let trigger = self.dom.create_detached_element("a");
        let mut classes = class_tokens(self.dom.attr(native, DATA_CLASS_ATTR).as_deref());
        classes.push(SELECT_TRIGGER_CLASS.to_string());
        self.dom.set_attr(trigger, "class", &classes.join(" "))?;
        self.dom.set_attr(trigger, "tabindex", "0")?;
        self.dom.insert_after(native, trigger)?;
        self.suppress_selection(trigger)?;
        self.dom.style_set(native, "display", "none")?;

        let id = SelectId(self.bindings.selects.len());
        self.bindings.selects.push(SelectBinding {
            native,
            trigger,
            animation_ms,
            popup: None,
        });
        self.bindings.attached.insert(native, BindingRef::Select(id));

        self.listeners
            .add(EventTarget::Node(native), "change", Handler::SelectMirror(id));
        self.listeners.add(
            EventTarget::Node(trigger),
            "click",
            Handler::SelectTriggerActivate(id),
        );
        self.listeners.add(
            EventTarget::Node(trigger),
            "keydown",
            Handler::SelectKeyNavigate(id),
        );

        let native_label = self.trace_node_label(native);
        self.trace_binding_line(format!(
            "[binding] attach Select native={} animation_ms={}",
            native_label, animation_ms
        ));

        self.dispatch_event(native, "change")?;
        Ok(true)
    }

    /// Re-renders the trigger from the native select.
    pub(crate) fn mirror_select(&mut self, id: SelectId) -> Result<HandlerOutcome> {
        let SelectBinding {
            native, trigger, ..
        } = *self.bindings.select(id)?;
        let disabled = self.dom.disabled(native);
        self.dom.class_toggle_to(trigger, DISABLED_CLASS, disabled)?;
        self.dom
            .set_attr(trigger, "tabindex", if disabled { "-1" } else { "0" })?;

        let model = OptionModel::build(&self.dom, native)?;
        let value = self.dom.value(native)?;
        let display = model
            .resolve(&value)
            .map(|option| option.display.clone())
            .filter(|display| !display.trim().is_empty())
            .unwrap_or_else(|| "&nbsp;".to_string());
        self.dom.set_inner_html(trigger, &display)?;
        Ok(HandlerOutcome::Continue)
    }

    /// The one path every selection goes through: keyboard, popup rows and
    /// script assignment.
    pub(crate) fn apply_option_selection(
        &mut self,
        id: SelectId,
        option: NodeId,
        notification: ChangeNotification,
    ) -> Result<()> {
        let native = self.bindings.select(id)?.native;
        self.dom.select_option(native, option)?;

        let native_label = self.trace_node_label(native);
        let value = self.dom.value(native)?;
        self.trace_binding_line(format!(
            "[binding] select native={} value={} notification={:?}",
            native_label, value, notification
        ));

        match notification {
            ChangeNotification::Emit => {
                self.dispatch_event(native, "change")?;
            }
            ChangeNotification::Suppress => {
                self.mirror_select(id)?;
            }
        }
        Ok(())
    }

    pub(crate) fn assign_select_value(&mut self, id: SelectId, requested: &str) -> Result<()> {
        let native = self.bindings.select(id)?.native;
        let model = OptionModel::build(&self.dom, native)?;
        match model.options().find(|option| option.value == requested) {
            Some(option) => {
                let option = option.node;
                self.apply_option_selection(id, option, ChangeNotification::Suppress)
            }
            None => {
                self.dom.set_select_value(native, requested)?;
                self.mirror_select(id)?;
                Ok(())
            }
        }
    }

    pub(crate) fn navigate_with_key(
        &mut self,
        id: SelectId,
        event: &EventState,
    ) -> Result<HandlerOutcome> {
        let backward = match event.key {
            Some(Key::ArrowLeft | Key::ArrowUp) => true,
            Some(Key::ArrowRight | Key::ArrowDown) => false,
            _ => return Ok(HandlerOutcome::Continue),
        };
        let native = self.bindings.select(id)?.native;
        if self.dom.disabled(native) {
            return Ok(HandlerOutcome::Continue);
        }

        let model = OptionModel::build(&self.dom, native)?;
        let value = self.dom.value(native)?;
        let current = model.resolve(&value).map(|option| option.node);
        let next = if backward {
            model.step_prev(current)
        } else {
            model.step_next(current)
        }
        .map(|option| option.node);

        if let Some(next) = next.filter(|next| Some(*next) != current) {
            self.apply_option_selection(id, next, ChangeNotification::Emit)?;
        }
        Ok(HandlerOutcome::PreventDefault)
    }
}
