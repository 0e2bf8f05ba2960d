use super::*;

/// A deterministic, in-memory document that the synchronizers run against.
///
/// Everything a browser page would provide (the DOM, event dispatch, a frame
/// clock and element geometry) lives here and is driven explicitly by the caller.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) layout: LayoutState,
    pub(crate) bindings: BindingRegistry,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) trace_state: TraceState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let ParseOutput { dom } = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            layout: LayoutState::default(),
            bindings: BindingRegistry::default(),
            active_element: None,
            trace_state: TraceState::default(),
        })
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_frames(&mut self, enabled: bool) {
        self.trace_state.frames = enabled;
    }

    pub fn set_trace_bindings(&mut self, enabled: bool) {
        self.trace_state.bindings = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidOption(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    // User actions.

    /// mousedown, mouseup and click on the target, followed by the browser's
    /// default actions for it.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || self.click_node(target))
    }

    pub fn double_click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            self.click_node(target)?;
            self.click_node(target)?;
            if self.is_inert_control(target) {
                return Ok(());
            }
            self.dispatch_event(target, "dblclick")?;
            Ok(())
        })
    }

    pub fn pointer_down(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            if self.is_inert_control(target) {
                return Ok(());
            }
            let event = self.dispatch_event(target, "mousedown")?;
            if !event.default_prevented {
                self.focus_from_pointer(target);
            }
            Ok(())
        })
    }

    pub fn key_down(&mut self, selector: &str, key: Key) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            let event = EventState::new("keydown", EventTarget::Node(target)).with_key(key);
            self.dispatch_prepared_event(event)?;
            Ok(())
        })
    }

    pub fn wheel(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            self.dispatch_event(target, "wheel")?;
            Ok(())
        })
    }

    pub fn scroll_window(&mut self) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let mut event = EventState::new("scroll", EventTarget::Window);
            event.bubbles = false;
            self.dispatch_prepared_event(event)?;
            Ok(())
        })
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target);
        Ok(())
    }

    // Script-side writes. None of these fire events.

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if !is_checkbox_input(&self.dom, target) && !is_radio_input(&self.dom, target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: self.describe_element(target),
            });
        }
        self.dom.set_checked(target, checked)
    }

    pub fn set_disabled(&mut self, selector: &str, disabled: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if !is_form_control(&self.dom, target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form control".into(),
                actual: self.describe_element(target),
            });
        }
        self.dom.set_disabled(target, disabled)
    }

    /// `select.value = value`. A machinated select routes this through its
    /// selection path with the change notification suppressed.
    pub fn set_select_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !is_select(&self.dom, target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: self.describe_element(target),
            });
        }
        match self.bindings.attached.get(&target).copied() {
            Some(BindingRef::Select(id)) => self.assign_select_value(id, value),
            _ => self.dom.set_select_value(target, value),
        }
    }

    pub fn set_attribute(&mut self, selector: &str, name: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_attr(target, name, value)
    }

    pub fn remove_attribute(&mut self, selector: &str, name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.remove_attr(target, name)
    }

    /// Emits `change` on the target, as `$(el).trigger('change')` would.
    pub fn trigger_change(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            self.dispatch_event(target, "change")?;
            Ok(())
        })
    }

    // Layout table.

    pub fn set_layout_rect(&mut self, selector: &str, rect: Rect) -> Result<()> {
        let target = self.select_one(selector)?;
        self.layout.rects.insert(target, rect);
        Ok(())
    }

    pub fn set_body_height(&mut self, height: f64) -> Result<()> {
        if !height.is_finite() || height < 0.0 {
            return Err(Error::InvalidOption(format!(
                "body height must be a non-negative number (got {height})"
            )));
        }
        self.layout.body_height = height;
        Ok(())
    }

    pub fn set_option_row_height(&mut self, height: f64) -> Result<()> {
        if !height.is_finite() || height < 0.0 {
            return Err(Error::InvalidOption(format!(
                "option row height must be a non-negative number (got {height})"
            )));
        }
        self.layout.option_row_height = height;
        Ok(())
    }

    // Inspection.

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.checked(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.class_contains(target, class_name)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name}"),
                actual: self.dom.attr(target, "class").unwrap_or_default(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_absent(&self, selector: &str) -> Result<()> {
        let matched = self.dom.query_selector_all(selector)?;
        if let Some(first) = matched.first().copied() {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: format!("{} match(es)", matched.len()),
                dom_snippet: self.node_snippet(first),
            });
        }
        Ok(())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn inner_html(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.inner_html(target)
    }

    pub fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, &name.to_ascii_lowercase()))
    }

    pub fn style_property(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style_get(target, name))
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn is_focused(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.active_element == Some(target))
    }

    pub fn listener_count(&self, selector: &str) -> Result<usize> {
        let target = self.select_one(selector)?;
        Ok(self.listeners.count_on(EventTarget::Node(target)))
    }

    pub fn document_listener_count(&self) -> usize {
        self.listeners.count_on(EventTarget::Node(self.dom.root))
    }

    pub fn window_listener_count(&self) -> usize {
        self.listeners.count_on(EventTarget::Window)
    }

    pub fn global_listener_count(&self) -> usize {
        self.document_listener_count() + self.window_listener_count()
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    pub(crate) fn describe_element(&self, node_id: NodeId) -> String {
        let Some(tag) = self.dom.tag_name(node_id) else {
            return "non-element".into();
        };
        match self.dom.attr(node_id, "type") {
            Some(kind) if tag.eq_ignore_ascii_case("input") => {
                format!("input[type={}]", kind.to_ascii_lowercase())
            }
            _ => tag.to_string(),
        }
    }
}
