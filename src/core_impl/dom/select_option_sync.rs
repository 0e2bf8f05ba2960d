use super::*;

impl Dom {
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        let nodes = self.all_element_nodes();
        for node in nodes {
            let is_toggle = is_checkbox_input(self, node) || is_radio_input(self, node);
            if is_toggle && !self.has_attr(node, "value") {
                let element = self
                    .element_mut(node)
                    .ok_or_else(|| Error::Runtime("input target is not an element".into()))?;
                element.value = "on".to_string();
                continue;
            }

            if is_select(self, node) {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        if is_option(self, node_id) {
            return self.option_effective_value(node_id);
        }
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn sync_select_value_for_option(&mut self, option_node: NodeId) -> Result<()> {
        if !is_option(self, option_node) {
            return Ok(());
        }

        let Some(select_node) = self.find_ancestor_by_tag(option_node, "select") else {
            return Ok(());
        };
        self.sync_select_value(select_node)
    }

    /// Script-style `select.value = requested`: the first option whose value matches
    /// becomes the only selected one. No match leaves nothing selected and an empty value.
    pub(crate) fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        if !is_select(self, select_node) {
            return Err(Error::Runtime("set value target is not a select".into()));
        }

        let mut matched = None;
        for option in self.select_options(select_node) {
            if self.option_effective_value(option)? == requested {
                matched = Some(option);
                break;
            }
        }

        match matched {
            Some(option) => self.select_option(select_node, option),
            None => {
                for option in self.select_options(select_node) {
                    if let Some(element) = self.element_mut(option) {
                        element.attrs.remove("selected");
                    }
                }
                let element = self
                    .element_mut(select_node)
                    .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
                element.value.clear();
                Ok(())
            }
        }
    }

    /// Marks exactly `option` selected and takes its value as the select's value.
    pub(crate) fn select_option(&mut self, select_node: NodeId, option: NodeId) -> Result<()> {
        if !self.is_descendant_of(option, select_node) || !is_option(self, option) {
            return Err(Error::Runtime(
                "selected option does not belong to the select".into(),
            ));
        }

        for other in self.select_options(select_node) {
            let element = self
                .element_mut(other)
                .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
            if other == option {
                element
                    .attrs
                    .insert("selected".to_string(), "selected".to_string());
            } else {
                element.attrs.remove("selected");
            }
        }

        let value = self.option_effective_value(option)?;
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = value;
        Ok(())
    }

    pub(crate) fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let value = self.select_value_from_options(select_node)?;
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = value;
        Ok(())
    }

    pub(crate) fn select_value_from_options(&self, select_node: NodeId) -> Result<String> {
        if !is_select(self, select_node) {
            return Err(Error::Runtime(
                "select value target is not a select".into(),
            ));
        }

        let options = self.select_options(select_node);
        let Some(first) = options.first().copied() else {
            return Ok(String::new());
        };

        let selected = options
            .iter()
            .copied()
            .rfind(|option| self.has_attr(*option, "selected"))
            .unwrap_or(first);
        self.option_effective_value(selected)
    }

    pub(crate) fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_select_options(select_node, &mut out);
        out
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if is_option(self, *child) {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    /// The `value` attribute when present, otherwise the option's text.
    pub(crate) fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        let element = self
            .element(option_node)
            .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
        if !element.tag_name.eq_ignore_ascii_case("option") {
            return Err(Error::Runtime("option target is not an option".into()));
        }
        if let Some(value) = element.attrs.get("value") {
            return Ok(value.clone());
        }
        Ok(collapse_whitespace(&self.text_content(option_node)))
    }
}
