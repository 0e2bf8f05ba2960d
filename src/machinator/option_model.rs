use super::*;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OptionNode {
    pub(crate) node: NodeId,
    pub(crate) value: String,
    pub(crate) has_value_attr: bool,
    pub(crate) text: String,
    /// Markup rendered for the option in the trigger and the popup.
    pub(crate) display: String,
    pub(crate) disabled: bool,
    pub(crate) group: Option<NodeId>,
    pub(crate) group_disabled: bool,
    pub(crate) ordinal: usize,
    pub(crate) selected: bool,
}

impl OptionNode {
    pub(crate) fn effectively_disabled(&self) -> bool {
        self.disabled || self.group_disabled
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupHeader {
    pub(crate) node: NodeId,
    pub(crate) label: String,
    pub(crate) disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OptionEntry {
    Option(OptionNode),
    GroupHeader(GroupHeader),
}

/// A select's options and groups flattened in document order.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionModel {
    pub(crate) entries: Vec<OptionEntry>,
}

impl OptionModel {
    pub(crate) fn build(dom: &Dom, select: NodeId) -> Result<Self> {
        let mut model = Self::default();
        let mut ordinal = 0usize;
        for child in dom.child_elements(select) {
            if is_option(dom, child) {
                model.push_option(dom, child, None, false, &mut ordinal)?;
            } else if is_optgroup(dom, child) {
                let group_disabled = dom.disabled(child);
                model.entries.push(OptionEntry::GroupHeader(GroupHeader {
                    node: child,
                    label: dom.attr(child, "label").unwrap_or_default(),
                    disabled: group_disabled,
                }));
                for grouped in dom.child_elements(child) {
                    if is_option(dom, grouped) {
                        model.push_option(dom, grouped, Some(child), group_disabled, &mut ordinal)?;
                    }
                }
            }
        }
        Ok(model)
    }

    fn push_option(
        &mut self,
        dom: &Dom,
        node: NodeId,
        group: Option<NodeId>,
        group_disabled: bool,
        ordinal: &mut usize,
    ) -> Result<()> {
        let display = match dom.attr(node, DATA_HTML_ATTR) {
            Some(markup) => markup,
            None => dom.inner_html(node)?,
        };
        self.entries.push(OptionEntry::Option(OptionNode {
            node,
            value: dom.option_effective_value(node)?,
            has_value_attr: dom.has_attr(node, "value"),
            text: normalize_visible_text(&dom.text_content(node)),
            display,
            disabled: dom.disabled(node),
            group,
            group_disabled,
            ordinal: *ordinal,
            selected: dom.has_attr(node, "selected"),
        }));
        *ordinal += 1;
        Ok(())
    }

    pub(crate) fn options(&self) -> impl Iterator<Item = &OptionNode> {
        self.entries.iter().filter_map(|entry| match entry {
            OptionEntry::Option(option) => Some(option),
            OptionEntry::GroupHeader(_) => None,
        })
    }

    pub(crate) fn option(&self, node: NodeId) -> Option<&OptionNode> {
        self.options().find(|option| option.node == node)
    }

    pub(crate) fn first_enabled(&self) -> Option<&OptionNode> {
        self.options().find(|option| !option.effectively_disabled())
    }

    /// The nearest enabled option before `current`, or `None` at the start.
    pub(crate) fn step_prev(&self, current: Option<NodeId>) -> Option<&OptionNode> {
        let Some(current) = current else {
            return self.first_enabled();
        };
        let current = self.option(current)?.ordinal;
        let options = self.options().collect::<Vec<_>>();
        options[..current]
            .iter()
            .rev()
            .find(|option| !option.effectively_disabled())
            .copied()
    }

    /// The nearest enabled option after `current`, or `None` at the end.
    pub(crate) fn step_next(&self, current: Option<NodeId>) -> Option<&OptionNode> {
        let Some(current) = current else {
            return self.first_enabled();
        };
        let current = self.option(current)?.ordinal;
        let options = self.options().collect::<Vec<_>>();
        options[current + 1..]
            .iter()
            .find(|option| !option.effectively_disabled())
            .copied()
    }

    /// The option standing for `native_value`: among the options flagged
    /// selected, the one carrying that value (else the last flagged one), then
    /// the one whose `value` attribute matches, then the one whose visible text
    /// matches.
    pub(crate) fn resolve(&self, native_value: &str) -> Option<&OptionNode> {
        let flagged = self
            .options()
            .filter(|option| option.selected)
            .collect::<Vec<_>>();
        if let Some(selected) = flagged
            .iter()
            .find(|option| option.value == native_value)
            .or_else(|| flagged.last())
        {
            return Some(*selected);
        }
        if let Some(by_value) = self
            .options()
            .find(|option| option.has_value_attr && option.value == native_value)
        {
            return Some(by_value);
        }
        let wanted = normalize_visible_text(native_value);
        self.options().find(|option| option.text == wanted)
    }
}
