use super::*;

fn machinated(html: &str) -> Result<Page> {
    let mut page = Page::from_html(html)?;
    page.machinate("body", &Options::default())?;
    Ok(page)
}

#[test]
fn checkbox_indicator_follows_clicks() -> Result<()> {
    let mut page = machinated("<input id='c' type='checkbox' class='fancy'>")?;
    page.assert_has_class("#c + a", "machinator-checkbox")?;
    page.assert_has_class("#c + a", "fancy")?;
    page.assert_has_class("#c + a", "unchecked")?;
    assert_eq!(page.style_property("#c", "display")?.as_deref(), Some("none"));

    page.click("#c + a")?;
    page.assert_checked("#c", true)?;
    page.assert_has_class("#c + a", "checked")?;
    assert!(page.is_focused("#c + a")?);

    page.click("#c + a")?;
    page.assert_checked("#c", false)?;
    page.assert_has_class("#c + a", "unchecked")?;
    Ok(())
}

#[test]
fn initial_render_reflects_checked_and_disabled_markup() -> Result<()> {
    let page = machinated(
        "<label for='c'>Terms</label><input id='c' type='checkbox' checked disabled>",
    )?;
    page.assert_has_class("#c + a", "checked")?;
    page.assert_has_class("#c + a", "Disabled")?;
    page.assert_has_class("label", "Disabled")?;
    page.assert_has_class("label", "machinator-checkbox-label")?;
    Ok(())
}

#[test]
fn disabled_checkbox_ignores_activation() -> Result<()> {
    let mut page = machinated("<input id='c' type='checkbox' disabled>")?;
    page.click("#c + a")?;
    page.key_down("#c + a", Key::Enter)?;
    page.assert_checked("#c", false)?;
    page.assert_has_class("#c + a", "unchecked")?;
    Ok(())
}

#[test]
fn activation_keys_toggle_and_other_keys_do_not() -> Result<()> {
    let mut page = machinated("<input id='c' type='checkbox'>")?;
    page.key_down("#c + a", Key::Space)?;
    page.assert_checked("#c", true)?;
    page.key_down("#c + a", Key::from_code(10))?;
    page.assert_checked("#c", false)?;
    page.key_down("#c + a", Key::Other(65))?;
    page.key_down("#c + a", Key::ArrowDown)?;
    page.assert_checked("#c", false)?;
    Ok(())
}

#[test]
fn ancestor_label_activates_checkbox_once() -> Result<()> {
    let mut page = machinated("<label id='l'><input id='c' type='checkbox'> Accept</label>")?;
    page.click("#l")?;
    page.assert_checked("#c", true)?;
    page.assert_has_class("#c + a", "checked")?;

    // The indicator sits inside the label and defers to it.
    page.click("#c + a")?;
    page.assert_checked("#c", false)?;
    page.assert_has_class("#c + a", "unchecked")?;
    Ok(())
}

#[test]
fn double_click_on_label_is_a_single_toggle() -> Result<()> {
    let mut page = machinated(
        "<label id='inner'><input id='a' type='checkbox'> A</label>\
         <input id='b' type='checkbox'><label id='outer' for='b'>B</label>",
    )?;
    page.double_click("#inner")?;
    page.assert_checked("#a", true)?;
    page.double_click("#outer")?;
    page.assert_checked("#b", true)?;
    page.assert_has_class("#b + a", "checked")?;
    Ok(())
}

#[test]
fn radio_activation_clears_the_group_first() -> Result<()> {
    let mut page = machinated(
        "<label id='l1' for='r1'>One</label><input type='radio' name='g' id='r1' value='1' checked>\
         <label id='l2'><input type='radio' name='g' id='r2' value='2'> Two</label>\
         <input type='radio' name='other' id='r3' checked>",
    )?;
    page.assert_has_class("#r1 + a", "checked")?;
    page.assert_has_class("#r2 + a", "unchecked")?;

    page.click("#l2")?;
    page.assert_checked("#r1", false)?;
    page.assert_checked("#r2", true)?;
    page.assert_has_class("#r1 + a", "unchecked")?;
    page.assert_has_class("#r2 + a", "checked")?;
    page.assert_checked("#r3", true)?;

    page.click("#r1 + a")?;
    page.assert_checked("#r1", true)?;
    page.assert_checked("#r2", false)?;

    // Activating the checked radio keeps it checked.
    page.click("#r1 + a")?;
    page.assert_checked("#r1", true)?;
    page.assert_has_class("#r1 + a", "checked")?;
    Ok(())
}

#[test]
fn attach_is_idempotent() -> Result<()> {
    let mut page = Page::from_html(
        "<form id='f'><input id='c' type='checkbox'><select id='s'><option>A</option></select></form>",
    )?;
    let first = page.machinate("#f", &Options::default())?;
    assert_eq!(first.checkboxes, 1);
    assert_eq!(first.selects, 1);
    assert_eq!(first.skipped, 0);

    let second = page.machinate("#f", &Options::default())?;
    assert_eq!(second.attached(), 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(page.count("a.machinator-checkbox")?, 1);
    assert_eq!(page.count("a.machinator-select")?, 1);
    assert_eq!(page.listener_count("#c")?, 1);
    assert_eq!(page.listener_count("#s")?, 1);
    Ok(())
}

#[test]
fn options_limit_which_controls_attach() -> Result<()> {
    let mut page = Page::from_html(
        "<input id='c' type='checkbox'><input id='r' type='radio'><select id='s'></select>\
         <select id='m' multiple><option>A</option></select>",
    )?;
    let report = page.machinate(
        "body",
        &Options::default().with_checkbox(false).with_radio(true),
    )?;
    assert_eq!(report.checkboxes, 0);
    assert_eq!(report.radios, 1);
    assert_eq!(report.selects, 1);
    page.assert_absent("a.machinator-checkbox")?;
    page.assert_absent("#m + a")?;
    Ok(())
}

#[test]
fn designated_bootstrap_only_touches_marked_scopes() -> Result<()> {
    let mut page = Page::from_html(
        "<div class='machinator'><input id='a' type='checkbox'>\
           <div class='machinator'><input id='b' type='checkbox'></div></div>\
         <input id='c' type='checkbox'>",
    )?;
    let report = page.machinate_designated()?;
    assert_eq!(report.checkboxes, 2);
    assert_eq!(report.skipped, 0);
    page.assert_exists("#a + a")?;
    page.assert_exists("#b + a")?;
    page.assert_absent("#c + a")?;
    Ok(())
}

#[test]
fn script_writes_do_not_fire_change() -> Result<()> {
    let mut page = machinated("<input id='c' type='checkbox'>")?;
    page.set_checked("#c", true)?;
    page.assert_has_class("#c + a", "unchecked")?;
    page.trigger_change("#c")?;
    page.assert_has_class("#c + a", "checked")?;

    match page.set_checked("#c + a", true) {
        Err(Error::TypeMismatch { expected, .. }) => {
            assert_eq!(expected, "input[type=checkbox|radio]");
        }
        other => panic!("expected type mismatch, got: {other:?}"),
    }
    Ok(())
}

#[test]
fn text_fallback_resolves_display_when_value_misses() -> Result<()> {
    let mut page = machinated(
        "<select id='s'><option value='a'>Apple</option><option value='p'>Pear</option></select>",
    )?;
    page.assert_text("#s + a", "Apple")?;

    let select = page.select_one("#s")?;
    let element = page
        .dom
        .element_mut(select)
        .ok_or_else(|| Error::Runtime("select missing".into()))?;
    element.value = " Pear ".to_string();
    page.trigger_change("#s")?;
    page.assert_text("#s + a", "Pear")?;

    let element = page
        .dom
        .element_mut(select)
        .ok_or_else(|| Error::Runtime("select missing".into()))?;
    element.value = "nothing".to_string();
    page.trigger_change("#s")?;
    page.assert_text("#s + a", "\u{a0}")?;
    assert_eq!(page.inner_html("#s + a")?, "&nbsp;");
    Ok(())
}

#[test]
fn trace_logs_cover_events_bindings_and_frames() -> Result<()> {
    let mut page = Page::from_html(
        "<input id='c' type='checkbox'><select id='s'><option>A</option></select>",
    )?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.machinate("body", &Options::default())?;
    page.click("#c + a")?;
    page.click("#s + a")?;
    page.flush()?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[binding] attach Checkbox")));
    assert!(logs.iter().any(|line| line.starts_with("[binding] toggle Checkbox native=#c checked=true")));
    assert!(logs.iter().any(|line| line.starts_with("[event] click target=a")));
    assert!(logs.iter().any(|line| line.starts_with("[frame] done")));
    assert!(page.take_trace_logs().is_empty());

    page.set_trace_events(false);
    page.set_trace_frames(false);
    page.set_trace_bindings(false);
    page.click("#c + a")?;
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_log_limit_keeps_newest_lines() -> Result<()> {
    let mut page = machinated("<input id='c' type='checkbox'>")?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_trace_log_limit(2)?;
    page.click("#c + a")?;
    let logs = page.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[1].starts_with("[event] done click"));

    assert!(matches!(
        page.set_trace_log_limit(0),
        Err(Error::InvalidOption(_))
    ));
    Ok(())
}
