use super::*;

/// Where a select's popup list is in its open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// The document and window listeners that dismiss a live popup. Releasing
/// consumes the lease.
#[derive(Debug, Clone)]
pub(crate) struct DismissalLease {
    pointer: ListenerId,
    wheel: ListenerId,
    scroll: ListenerId,
}

impl DismissalLease {
    fn acquire(store: &mut ListenerStore, document: NodeId, id: SelectId) -> Self {
        Self {
            pointer: store.add(
                EventTarget::Node(document),
                "mousedown",
                Handler::OutsidePointerDown(id),
            ),
            wheel: store.add(EventTarget::Window, "wheel", Handler::OutsideWheel(id)),
            scroll: store.add(EventTarget::Window, "scroll", Handler::OutsideWheel(id)),
        }
    }

    fn release(self, store: &mut ListenerStore) -> usize {
        [self.pointer, self.wheel, self.scroll]
            .into_iter()
            .filter(|listener| store.remove(*listener))
            .count()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Popup {
    pub(crate) list: NodeId,
    pub(crate) phase: PopupPhase,
    /// Each option row paired with the native option it selects.
    pub(crate) rows: Vec<(NodeId, NodeId)>,
    pub(crate) lease: Option<DismissalLease>,
    pub(crate) row_listener: Option<ListenerId>,
    pub(crate) animation: Option<u64>,
}

impl Page {
    pub fn popup_phase(&self, selector: &str) -> Result<PopupPhase> {
        let node = self.select_one(selector)?;
        let id = self.select_binding_for(node).ok_or_else(|| Error::TypeMismatch {
            selector: selector.to_string(),
            expected: "machinated select or its trigger".into(),
            actual: self.describe_element(node),
        })?;
        Ok(self
            .bindings
            .select(id)?
            .popup
            .as_ref()
            .map(|popup| popup.phase)
            .unwrap_or(PopupPhase::Closed))
    }

    fn select_binding_for(&self, node: NodeId) -> Option<SelectId> {
        if let Some(BindingRef::Select(id)) = self.bindings.attached.get(&node) {
            return Some(*id);
        }
        self.bindings
            .selects
            .iter()
            .position(|binding| binding.trigger == node)
            .map(SelectId)
    }

    pub(crate) fn trigger_activate(&mut self, id: SelectId) -> Result<HandlerOutcome> {
        let binding = self.bindings.select(id)?;
        let (live, native) = (binding.popup.is_some(), binding.native);
        if live {
            self.request_close(id)?;
            return Ok(HandlerOutcome::PreventAndStop);
        }
        if self.dom.disabled(native) {
            return Ok(HandlerOutcome::Continue);
        }
        self.open_popup(id)?;
        Ok(HandlerOutcome::PreventAndStop)
    }

    fn open_popup(&mut self, id: SelectId) -> Result<()> {
        let SelectBinding {
            native,
            trigger,
            animation_ms,
            ..
        } = *self.bindings.select(id)?;
        let model = OptionModel::build(&self.dom, native)?;
        let value = self.dom.value(native)?;

        let list = self.dom.create_detached_element("ul");
        self.dom.set_attr(list, "class", DROPDOWN_CLASS)?;
        let mut rows = Vec::new();
        let mut group_list = None;
        for entry in &model.entries {
            match entry {
                OptionEntry::GroupHeader(header) => {
                    let mut classes = vec![OPTGROUP_ROW_CLASS];
                    if header.disabled {
                        classes.push(DISABLED_CLASS);
                    }
                    let group_row = self.append_element(list, "li", &classes.join(" "))?;
                    let label = self.append_element(group_row, "span", OPTGROUP_LABEL_CLASS)?;
                    self.dom.create_text(label, header.label.clone());
                    let options_list =
                        self.append_element(group_row, "ul", OPTGROUP_OPTIONS_CLASS)?;
                    group_list = Some((header.node, options_list));
                }
                OptionEntry::Option(option) => {
                    let parent = match (option.group, group_list) {
                        (Some(group), Some((header, options_list))) if group == header => {
                            options_list
                        }
                        _ => list,
                    };
                    let mut classes = vec![OPTION_ROW_CLASS];
                    if option.effectively_disabled() {
                        classes.push(DISABLED_CLASS);
                    }
                    if option.value == value {
                        classes.push(SELECTED_CLASS);
                    }
                    let row = self.append_element(parent, "li", &classes.join(" "))?;
                    self.dom.set_attr(row, DATA_VALUE_ATTR, &option.value)?;
                    self.dom.set_inner_html(row, &option.display)?;
                    rows.push((row, option.node));
                }
            }
        }

        let body = self
            .dom
            .body()
            .ok_or_else(|| Error::Runtime("document has no body for the popup".into()))?;
        self.dom.append_child(body, list)?;

        let natural_height = model.entries.len() as f64 * self.layout.option_row_height;
        self.position_popup(native, trigger, list)?;
        self.suppress_selection(list)?;
        let row_listener = self
            .listeners
            .add(EventTarget::Node(list), "click", Handler::PopupOptionClick(id));
        let lease = DismissalLease::acquire(&mut self.listeners, self.dom.root, id);

        self.bindings.select_mut(id)?.popup = Some(Popup {
            list,
            phase: PopupPhase::Opening,
            rows,
            lease: Some(lease),
            row_listener: Some(row_listener),
            animation: None,
        });
        let native_label = self.trace_node_label(native);
        self.trace_binding_line(format!(
            "[binding] popup open native={} rows={} natural_height={}",
            native_label,
            model.entries.len(),
            format_px(natural_height)
        ));

        let animation = self.start_height_animation(
            id,
            list,
            0.0,
            natural_height,
            animation_ms,
            AnimationPurpose::Open,
        )?;
        self.record_animation(id, animation, PopupPhase::Opening)
    }

    fn append_element(&mut self, parent: NodeId, tag: &str, class_name: &str) -> Result<NodeId> {
        let node = self.dom.create_detached_element(tag);
        self.dom.set_attr(node, "class", class_name)?;
        self.dom.append_child(parent, node)?;
        Ok(node)
    }

    /// Pins the list under the trigger, or above it for an `up` select.
    fn position_popup(&mut self, native: NodeId, trigger: NodeId, list: NodeId) -> Result<()> {
        let rect = self.layout.rect(trigger);
        let border_left = self
            .dom
            .style_get(trigger, "border-left-width")
            .map(|raw| parse_px_length(&raw))
            .unwrap_or(0.0);
        let border_right = self
            .dom
            .style_get(trigger, "border-right-width")
            .map(|raw| parse_px_length(&raw))
            .unwrap_or(0.0);

        self.dom.style_set(list, "position", "absolute")?;
        self.dom.style_set(list, "left", &format_px(rect.left))?;
        if self.dom.class_contains(native, OPEN_UPWARD_CLASS)? {
            let bottom = self.layout.body_height - rect.top;
            self.dom.style_set(list, "bottom", &format_px(bottom))?;
        } else {
            self.dom
                .style_set(list, "top", &format_px(rect.top + rect.height))?;
        }
        let width = rect.width - border_left - border_right;
        self.dom.style_set(list, "width", &format_px(width))?;
        Ok(())
    }

    // A zero-length animation finishes inside `start_height_animation`, so the
    // popup may already be gone or past `phase`.
    fn record_animation(&mut self, id: SelectId, animation: u64, phase: PopupPhase) -> Result<()> {
        let still_running = self
            .scheduler
            .animations
            .iter()
            .any(|running| running.id == animation);
        if let Some(popup) = self.bindings.select_mut(id)?.popup.as_mut() {
            if popup.phase == phase && still_running {
                popup.animation = Some(animation);
            }
        }
        Ok(())
    }

    pub(crate) fn on_open_complete(&mut self, id: SelectId) -> Result<()> {
        let Some(popup) = self.bindings.select_mut(id)?.popup.as_mut() else {
            return Ok(());
        };
        if popup.phase != PopupPhase::Opening {
            return Ok(());
        }
        popup.phase = PopupPhase::Open;
        popup.animation = None;
        self.trace_binding_line(format!("[binding] popup opened select={}", id.0));
        Ok(())
    }

    /// Starts collapsing the popup from wherever its height is now. A popup
    /// already closing keeps its current animation.
    pub(crate) fn request_close(&mut self, id: SelectId) -> Result<()> {
        let Some(popup) = self.bindings.select(id)?.popup.as_ref() else {
            return Ok(());
        };
        if popup.phase == PopupPhase::Closing {
            return Ok(());
        }
        let list = popup.list;
        if let Some(animation) = popup.animation {
            self.scheduler.cancel_animation(animation);
        }

        let from = self
            .dom
            .style_get(list, "height")
            .map(|raw| parse_px_length(&raw))
            .unwrap_or(0.0);
        if let Some(popup) = self.bindings.select_mut(id)?.popup.as_mut() {
            popup.phase = PopupPhase::Closing;
            popup.animation = None;
        }
        self.trace_binding_line(format!(
            "[binding] popup close select={} from_height={}",
            id.0,
            format_px(from)
        ));

        let animation_ms = self.bindings.select(id)?.animation_ms;
        let animation =
            self.start_height_animation(id, list, from, 0.0, animation_ms, AnimationPurpose::Close)?;
        self.record_animation(id, animation, PopupPhase::Closing)
    }

    /// Detaches the list and drops every listener the popup held.
    pub(crate) fn finish_close(&mut self, id: SelectId) -> Result<()> {
        let Some(mut popup) = self.bindings.select_mut(id)?.popup.take() else {
            return Ok(());
        };
        if let Some(animation) = popup.animation.take() {
            self.scheduler.cancel_animation(animation);
        }

        if let Some(row_listener) = popup.row_listener.take() {
            self.listeners.remove(row_listener);
        }
        let mut removed = 0;
        for node in self.dom.subtree_elements(popup.list) {
            removed += self.listeners.remove_target(EventTarget::Node(node));
        }
        if let Some(lease) = popup.lease.take() {
            removed += lease.release(&mut self.listeners);
        }
        self.dom.detach(popup.list);
        if self
            .active_element
            .is_some_and(|active| self.dom.is_same_or_descendant_of(active, popup.list))
        {
            self.active_element = None;
        }

        self.trace_binding_line(format!(
            "[binding] popup closed select={} listeners_released={}",
            id.0, removed
        ));
        Ok(())
    }

    pub(crate) fn popup_option_click(
        &mut self,
        id: SelectId,
        event: &EventState,
    ) -> Result<HandlerOutcome> {
        let Some(target) = event.target_node() else {
            return Ok(HandlerOutcome::Continue);
        };
        let SelectBinding { trigger, .. } = *self.bindings.select(id)?;
        let Some(popup) = self.bindings.select(id)?.popup.as_ref() else {
            return Ok(HandlerOutcome::Continue);
        };
        let Some((row, option)) = popup
            .rows
            .iter()
            .copied()
            .find(|(row, _)| self.dom.is_same_or_descendant_of(target, *row))
        else {
            return Ok(HandlerOutcome::Continue);
        };
        if self.dom.class_contains(row, DISABLED_CLASS)? {
            return Ok(HandlerOutcome::Continue);
        }

        if let Some(row_listener) = self
            .bindings
            .select_mut(id)?
            .popup
            .as_mut()
            .and_then(|popup| popup.row_listener.take())
        {
            self.listeners.remove(row_listener);
        }
        self.apply_option_selection(id, option, ChangeNotification::Emit)?;
        self.request_close(id)?;
        self.focus_node(trigger);
        Ok(HandlerOutcome::Continue)
    }

    pub(crate) fn outside_pointer_down(
        &mut self,
        id: SelectId,
        event: &EventState,
    ) -> Result<HandlerOutcome> {
        let binding = self.bindings.select(id)?;
        let Some(popup) = binding.popup.as_ref() else {
            return Ok(HandlerOutcome::Continue);
        };
        let inside = event.target_node().is_some_and(|target| {
            self.dom.is_same_or_descendant_of(target, popup.list)
                || self.dom.is_same_or_descendant_of(target, binding.trigger)
        });
        if !inside {
            self.request_close(id)?;
        }
        Ok(HandlerOutcome::Continue)
    }

    pub(crate) fn outside_wheel(
        &mut self,
        id: SelectId,
        event: &EventState,
    ) -> Result<HandlerOutcome> {
        let Some(popup) = self.bindings.select(id)?.popup.as_ref() else {
            return Ok(HandlerOutcome::Continue);
        };
        let inside = event
            .target_node()
            .is_some_and(|target| self.dom.is_same_or_descendant_of(target, popup.list));
        if !inside {
            self.request_close(id)?;
        }
        Ok(HandlerOutcome::Continue)
    }
}
