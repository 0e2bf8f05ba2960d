use super::*;

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    element.tag_name.eq_ignore_ascii_case("input")
        || element.tag_name.eq_ignore_ascii_case("select")
        || element.tag_name.eq_ignore_ascii_case("textarea")
        || element.tag_name.eq_ignore_ascii_case("button")
        || element.tag_name.eq_ignore_ascii_case("option")
        || element.tag_name.eq_ignore_ascii_case("optgroup")
}

fn is_input_of_type(dom: &Dom, node_id: NodeId, kind: &str) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if !element.tag_name.eq_ignore_ascii_case("input") {
        return false;
    }

    element
        .attrs
        .get("type")
        .map(|value| value.eq_ignore_ascii_case(kind))
        .unwrap_or(false)
}

pub(crate) fn is_checkbox_input(dom: &Dom, node_id: NodeId) -> bool {
    is_input_of_type(dom, node_id, "checkbox")
}

pub(crate) fn is_radio_input(dom: &Dom, node_id: NodeId) -> bool {
    is_input_of_type(dom, node_id, "radio")
}

pub(crate) fn is_select(dom: &Dom, node_id: NodeId) -> bool {
    dom.tag_name(node_id)
        .map(|tag| tag.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}

pub(crate) fn is_option(dom: &Dom, node_id: NodeId) -> bool {
    dom.tag_name(node_id)
        .map(|tag| tag.eq_ignore_ascii_case("option"))
        .unwrap_or(false)
}

pub(crate) fn is_optgroup(dom: &Dom, node_id: NodeId) -> bool {
    dom.tag_name(node_id)
        .map(|tag| tag.eq_ignore_ascii_case("optgroup"))
        .unwrap_or(false)
}

pub(crate) fn is_label(dom: &Dom, node_id: NodeId) -> bool {
    dom.tag_name(node_id)
        .map(|tag| tag.eq_ignore_ascii_case("label"))
        .unwrap_or(false)
}

/// Elements that take focus when clicked: form controls (unless disabled),
/// anchors with an href, and anything carrying a non-negative `tabindex`.
pub(crate) fn is_focusable(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if let Some(tabindex) = element.attrs.get("tabindex") {
        return tabindex.trim().parse::<i64>().map(|n| n >= 0).unwrap_or(false);
    }

    let tag = element.tag_name.as_str();
    if tag.eq_ignore_ascii_case("a") {
        return element.attrs.contains_key("href");
    }
    (tag.eq_ignore_ascii_case("input")
        || tag.eq_ignore_ascii_case("select")
        || tag.eq_ignore_ascii_case("textarea")
        || tag.eq_ignore_ascii_case("button"))
        && !element.disabled
}
