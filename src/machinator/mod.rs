use super::*;

pub(crate) mod config;
mod dropdown;
mod option_model;
pub(crate) mod popup;
mod toggle;

pub(crate) use config::*;
pub(crate) use dropdown::*;
pub(crate) use option_model::*;
pub(crate) use popup::*;
pub(crate) use toggle::*;

impl Page {
    /// Attaches synchronizers to every matching control in the first element
    /// matching `root_selector`, the element itself included.
    pub fn machinate(&mut self, root_selector: &str, options: &Options) -> Result<AttachReport> {
        options.validate()?;
        let root = self.select_one(root_selector)?;
        let candidates = self.dom.subtree_elements(root);
        stacker::grow(32 * 1024 * 1024, || self.attach_all(&candidates, options))
    }

    /// The default bootstrap: every `.machinator` element and its descendants,
    /// with default options.
    pub fn machinate_designated(&mut self) -> Result<AttachReport> {
        let options = Options::default();
        let selector = format!(".{DESIGNATOR_CLASS}");
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for root in self.dom.query_selector_all(&selector)? {
            for node in self.dom.subtree_elements(root) {
                if seen.insert(node) {
                    candidates.push(node);
                }
            }
        }
        stacker::grow(32 * 1024 * 1024, || self.attach_all(&candidates, &options))
    }

    fn attach_all(&mut self, candidates: &[NodeId], options: &Options) -> Result<AttachReport> {
        let mut report = AttachReport::default();
        for node in candidates.iter().copied() {
            if options.checkbox && is_checkbox_input(&self.dom, node) {
                if self.attach_toggle(node, ToggleKind::Checkbox)? {
                    report.checkboxes += 1;
                } else {
                    report.skipped += 1;
                }
            } else if options.radio && is_radio_input(&self.dom, node) {
                if self.attach_toggle(node, ToggleKind::Radio)? {
                    report.radios += 1;
                } else {
                    report.skipped += 1;
                }
            } else if options.select
                && is_select(&self.dom, node)
                && !self.dom.has_attr(node, "multiple")
            {
                if self.attach_select(node, options.popup_animation_duration_ms)? {
                    report.selects += 1;
                } else {
                    report.skipped += 1;
                }
            }
        }
        self.trace_binding_line(format!(
            "[binding] attach pass checkboxes={} radios={} selects={} skipped={}",
            report.checkboxes, report.radios, report.selects, report.skipped
        ));
        Ok(report)
    }

    pub(crate) fn run_handler(
        &mut self,
        handler: Handler,
        event: &mut EventState,
    ) -> Result<HandlerOutcome> {
        match handler {
            Handler::ToggleMirror(id) => self.mirror_toggle(id),
            Handler::ToggleActivate(id) | Handler::LabelActivate(id) => self.activate_toggle(id),
            Handler::ToggleKeyActivate(id) => self.key_activate_toggle(id, event),
            Handler::LabelDoubleActivate(id) => self.double_activate_toggle(id),
            Handler::SuppressSelectStart => Ok(HandlerOutcome::PreventDefault),
            Handler::SelectMirror(id) => self.mirror_select(id),
            Handler::SelectTriggerActivate(id) => self.trigger_activate(id),
            Handler::SelectKeyNavigate(id) => self.navigate_with_key(id, event),
            Handler::PopupOptionClick(id) => self.popup_option_click(id, event),
            Handler::OutsidePointerDown(id) => self.outside_pointer_down(id, event),
            Handler::OutsideWheel(id) => self.outside_wheel(id, event),
        }
    }
}
