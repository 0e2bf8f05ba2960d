use super::*;

impl Page {
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let event = EventState::new(event_type, EventTarget::Node(target));
        self.dispatch_prepared_event(event)
    }

    pub(crate) fn dispatch_prepared_event(&mut self, mut event: EventState) -> Result<EventState> {
        let path = self.event_path(event.target);
        let Some((first, rest)) = path.split_first() else {
            self.trace_event_done(&event, "empty_path");
            return Ok(event);
        };

        event.current_target = *first;
        self.invoke_listeners(*first, &mut event)?;
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        if event.bubbles {
            for current in rest {
                event.current_target = *current;
                self.invoke_listeners(*current, &mut event)?;
                if event.propagation_stopped {
                    self.trace_event_done(&event, "propagation_stopped");
                    return Ok(event);
                }
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    /// Target first, then its ancestors up to the document, then the window.
    /// A detached subtree never reaches the window.
    pub(crate) fn event_path(&self, target: EventTarget) -> Vec<EventTarget> {
        let EventTarget::Node(node) = target else {
            return vec![EventTarget::Window];
        };
        if !self.dom.is_valid_node(node) {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            path.push(EventTarget::Node(current));
            cursor = self.dom.parent(current);
        }
        if self.dom.is_connected(node) {
            path.push(EventTarget::Window);
        }
        path
    }

    fn invoke_listeners(&mut self, current: EventTarget, event: &mut EventState) -> Result<()> {
        let listeners = self.listeners.get(current, &event.event_type);
        for listener in listeners {
            // An earlier handler may have torn this one down.
            if !self.listeners.contains(listener.id) {
                continue;
            }
            let target_label = self.trace_target_label(event.target);
            let current_label = self.trace_target_label(current);
            self.trace_event_line(format!(
                "[event] {} target={} current={} handler={:?}",
                event.event_type, target_label, current_label, listener.handler
            ));

            match self.run_handler(listener.handler, event)? {
                HandlerOutcome::Continue => {}
                HandlerOutcome::PreventDefault => event.default_prevented = true,
                HandlerOutcome::PreventAndStop => {
                    event.default_prevented = true;
                    event.propagation_stopped = true;
                }
            }
        }
        Ok(())
    }

    /// mousedown and mouseup, then activation. Disabled controls swallow all of it.
    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.is_inert_control(target) {
            return Ok(());
        }

        let mousedown = self.dispatch_event(target, "mousedown")?;
        if !mousedown.default_prevented {
            self.focus_from_pointer(target);
        }
        self.dispatch_event(target, "mouseup")?;
        self.activate_node(target)
    }

    /// The `click` event and the default actions that follow it when nothing
    /// prevented it.
    pub(crate) fn activate_node(&mut self, target: NodeId) -> Result<()> {
        if self.is_inert_control(target) {
            return Ok(());
        }

        let click = self.dispatch_event(target, "click")?;
        if click.default_prevented {
            return Ok(());
        }

        if let Some(control) = self.label_control(target) {
            if control != target && !self.dom.is_descendant_of(target, control) {
                return self.activate_node(control);
            }
        }

        if is_checkbox_input(&self.dom, target) {
            let current = self.dom.checked(target)?;
            self.dom.set_checked(target, !current)?;
            self.dispatch_event(target, "input")?;
            self.dispatch_event(target, "change")?;
        }

        if is_radio_input(&self.dom, target) && !self.dom.checked(target)? {
            self.dom.set_checked(target, true)?;
            self.dispatch_event(target, "input")?;
            self.dispatch_event(target, "change")?;
        }
        Ok(())
    }

    /// The control a label activates: its `for` target, else its first labelable
    /// descendant.
    pub(crate) fn label_control(&self, target: NodeId) -> Option<NodeId> {
        let label = self.dom.closest(target, "label").ok().flatten()?;
        match self.dom.attr(label, "for") {
            Some(for_id) if !for_id.is_empty() => self
                .dom
                .by_id(&for_id)
                .filter(|control| self.is_labelable(*control)),
            _ => self
                .dom
                .subtree_elements(label)
                .into_iter()
                .skip(1)
                .find(|node| self.is_labelable(*node)),
        }
    }

    fn is_labelable(&self, node: NodeId) -> bool {
        let Some(tag) = self.dom.tag_name(node) else {
            return false;
        };
        if tag.eq_ignore_ascii_case("input") {
            return !self
                .dom
                .attr(node, "type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"));
        }
        tag.eq_ignore_ascii_case("select")
            || tag.eq_ignore_ascii_case("textarea")
            || tag.eq_ignore_ascii_case("button")
    }

    pub(crate) fn is_inert_control(&self, node: NodeId) -> bool {
        let Some(tag) = self.dom.tag_name(node) else {
            return false;
        };
        let is_control = tag.eq_ignore_ascii_case("input")
            || tag.eq_ignore_ascii_case("select")
            || tag.eq_ignore_ascii_case("textarea")
            || tag.eq_ignore_ascii_case("button");
        is_control && self.dom.disabled(node)
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) {
        if is_focusable(&self.dom, node) && self.dom.is_connected(node) {
            self.active_element = Some(node);
        }
    }

    /// Pointer focus lands on the nearest focusable ancestor-or-self; pressing
    /// anywhere else blurs.
    pub(crate) fn focus_from_pointer(&mut self, target: NodeId) {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if is_focusable(&self.dom, node) {
                self.active_element = Some(node);
                return;
            }
            cursor = self.dom.parent(node);
        }
        self.active_element = None;
    }

    pub(crate) fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        let target_label = self.trace_target_label(event.target);
        let current_label = self.trace_target_label(event.current_target);
        self.trace_event_line(format!(
            "[event] done {} target={} current={} outcome={} default_prevented={} propagation_stopped={}",
            event.event_type,
            target_label,
            current_label,
            outcome,
            event.default_prevented,
            event.propagation_stopped
        ));
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_frame_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.frames {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_binding_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.bindings {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            if self.trace_state.to_stderr {
                eprintln!("{line}");
            }
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }

    pub(crate) fn trace_target_label(&self, target: EventTarget) -> String {
        match target {
            EventTarget::Window => "window".to_string(),
            EventTarget::Node(node) if node == self.dom.root => "document".to_string(),
            EventTarget::Node(node) => self.trace_node_label(node),
        }
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }
}
