use super::*;

impl Dom {
    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        Ok(element.checked)
    }

    /// Property write: checking a radio silently unchecks the rest of its group.
    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        if checked && is_radio_input(self, node_id) {
            self.uncheck_other_radios_in_group(node_id);
        }
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        element.checked = checked;
        Ok(())
    }

    /// Radios sharing `name` and form owner with `target`, `target` included.
    /// An unnamed radio belongs to no group.
    pub(crate) fn radio_group_members(&self, target: NodeId) -> Vec<NodeId> {
        let target_name = self.attr(target, "name").unwrap_or_default();
        if target_name.is_empty() {
            return Vec::new();
        }
        let target_form = self.find_ancestor_by_tag(target, "form");

        self.all_element_nodes()
            .into_iter()
            .filter(|node| is_radio_input(self, *node))
            .filter(|node| self.attr(*node, "name").unwrap_or_default() == target_name)
            .filter(|node| self.find_ancestor_by_tag(*node, "form") == target_form)
            .collect()
    }

    pub(crate) fn uncheck_other_radios_in_group(&mut self, target: NodeId) {
        for node in self.radio_group_members(target) {
            if node == target {
                continue;
            }
            if let Some(element) = self.element_mut(node) {
                element.checked = false;
            }
        }
    }

    pub(crate) fn normalize_radio_groups(&mut self) -> Result<()> {
        let all_nodes = self.all_element_nodes();
        for node in all_nodes {
            if !is_radio_input(self, node) {
                continue;
            }
            if self.attr(node, "checked").is_some() {
                self.set_checked(node, true)?;
            }
        }
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "")
        } else {
            self.remove_attr(node_id, "disabled")
        }
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(name).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .map(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Attribute write. `disabled`, `checked` and an input's `value` also move the
    /// live property; `selected` on an option re-syncs the owning select.
    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let is_option_node = is_option(self, node_id);
        let is_radio = is_radio_input(self, node_id);
        {
            let element = self
                .element_mut(node_id)
                .ok_or_else(|| Error::Runtime("setAttribute target is not an element".into()))?;
            element.attrs.insert(lowered.clone(), value.to_string());
            match lowered.as_str() {
                "disabled" => element.disabled = true,
                "checked" => element.checked = true,
                "value" if element.tag_name.eq_ignore_ascii_case("input") => {
                    element.value = value.to_string();
                }
                _ => {}
            }
        }

        if lowered == "checked" && is_radio {
            self.uncheck_other_radios_in_group(node_id);
        }
        if lowered == "selected" && is_option_node {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let is_option_node = is_option(self, node_id);
        {
            let element = self.element_mut(node_id).ok_or_else(|| {
                Error::Runtime("removeAttribute target is not an element".into())
            })?;
            element.attrs.remove(&lowered);
            match lowered.as_str() {
                "disabled" => element.disabled = false,
                "checked" => element.checked = false,
                _ => {}
            }
        }

        if lowered == "selected" && is_option_node {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.can_have_children(parent) {
            return Err(Error::Runtime(
                "appendChild target cannot have children".into(),
            ));
        }
        if child == self.root || child == parent {
            return Err(Error::Runtime("invalid appendChild node".into()));
        }
        if !self.is_valid_node(child) {
            return Err(Error::Runtime("appendChild node is invalid".into()));
        }
        if self.is_descendant_of(parent, child) {
            return Err(Error::Runtime("appendChild would create a cycle".into()));
        }

        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        if !self.can_have_children(parent) {
            return Err(Error::Runtime(
                "insertBefore target cannot have children".into(),
            ));
        }
        if child == self.root || child == parent {
            return Err(Error::Runtime("invalid insertBefore node".into()));
        }
        if !self.is_valid_node(child) || !self.is_valid_node(reference) {
            return Err(Error::Runtime("insertBefore node is invalid".into()));
        }
        if self.parent(reference) != Some(parent) {
            return Err(Error::Runtime(
                "insertBefore reference is not a direct child".into(),
            ));
        }
        if child == reference {
            return Ok(());
        }
        if self.is_descendant_of(parent, child) {
            return Err(Error::Runtime("insertBefore would create a cycle".into()));
        }

        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
            .ok_or_else(|| Error::Runtime("insertBefore reference is missing".into()))?;

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }

    pub(crate) fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(target)
            .ok_or_else(|| Error::Runtime("after target is detached".into()))?;
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == target)
            .ok_or_else(|| Error::Runtime("after target is detached".into()))?;
        let next = self.nodes[parent.0].children.get(pos + 1).copied();
        if let Some(next) = next {
            self.insert_before(parent, child, next)
        } else {
            self.append_child(parent, child)
        }
    }

    /// Unlinks `node` from its parent. The subtree stays intact and may be reattached.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        self.nodes[parent.0].children.retain(|id| *id != node);
        self.nodes[node.0].parent = None;
    }
}
