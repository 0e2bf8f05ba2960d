use super::*;

impl Dom {
    pub(crate) fn ensure_document_body_element(&mut self) -> Result<NodeId> {
        if let Some(body) = self.body() {
            return Ok(body);
        }

        let Some(document_element) = self.document_element() else {
            return self.wrap_root_children_with_html_body();
        };

        if !self
            .tag_name(document_element)
            .map(|tag| tag.eq_ignore_ascii_case("html"))
            .unwrap_or(false)
        {
            return self.wrap_root_children_with_html_body();
        }

        let body = self.create_element(document_element, "body".to_string(), HashMap::new());
        let html_children = self.nodes[document_element.0].children.clone();
        for child in html_children {
            if child == body {
                continue;
            }
            let keep_in_html = self
                .tag_name(child)
                .map(|tag| tag.eq_ignore_ascii_case("head"))
                .unwrap_or(false);
            if keep_in_html {
                continue;
            }
            self.append_child(body, child)?;
        }

        Ok(body)
    }

    fn wrap_root_children_with_html_body(&mut self) -> Result<NodeId> {
        let root_children = self.nodes[self.root.0].children.clone();
        let html = self.create_element(self.root, "html".to_string(), HashMap::new());
        let body = self.create_element(html, "body".to_string(), HashMap::new());
        for child in root_children {
            self.append_child(body, child)?;
        }
        Ok(body)
    }

    pub(crate) fn can_have_children(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        )
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    /// `root` itself followed by every element below it, in document order.
    pub(crate) fn subtree_elements(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(root, &mut out);
        out
    }

    pub(crate) fn child_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub(crate) fn document_element(&self) -> Option<NodeId> {
        self.child_elements(self.root).into_iter().next()
    }

    pub(crate) fn body(&self) -> Option<NodeId> {
        let document_element = self.document_element()?;
        if !self
            .tag_name(document_element)
            .map(|tag| tag.eq_ignore_ascii_case("html"))
            .unwrap_or(false)
        {
            return None;
        }
        self.child_elements(document_element)
            .into_iter()
            .find(|child| {
                self.tag_name(*child)
                    .map(|tag| tag.eq_ignore_ascii_case("body"))
                    .unwrap_or(false)
            })
    }

    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        if steps.is_empty() {
            return false;
        }
        if !self.matches_step(node_id, &steps[steps.len() - 1].step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, prev_step)),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
                SelectorCombinator::AdjacentSibling => self
                    .previous_element_sibling(current)
                    .filter(|sibling| self.matches_step(*sibling, prev_step)),
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }
}
