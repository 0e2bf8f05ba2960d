use input_machinator::{Error, Options, Page, PopupPhase, Rect, Result};

const DROPDOWN: &str = "ul.machinator-select-dropdown";

fn page_with_select(html: &str, options: &Options) -> Result<Page> {
    let mut page = Page::from_html(html)?;
    page.machinate("body", options)?;
    page.set_layout_rect("#s + a", Rect::new(10.0, 30.0, 120.0, 20.0))?;
    page.set_body_height(400.0)?;
    Ok(page)
}

fn fruit_page() -> Result<Page> {
    page_with_select(
        r#"
        <div id='outside'>elsewhere</div>
        <select id='s'>
          <option value='a'>Apple</option>
          <option value='b' disabled>Banana</option>
          <option value='c'>Cherry</option>
        </select>
        "#,
        &Options::default(),
    )
}

#[test]
fn opening_positions_and_grows_the_list() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Opening);
    assert_eq!(page.count(DROPDOWN)?, 1);

    assert_eq!(
        page.style_property(DROPDOWN, "position")?.as_deref(),
        Some("absolute")
    );
    assert_eq!(page.style_property(DROPDOWN, "left")?.as_deref(), Some("10px"));
    assert_eq!(page.style_property(DROPDOWN, "top")?.as_deref(), Some("50px"));
    assert_eq!(page.style_property(DROPDOWN, "width")?.as_deref(), Some("120px"));
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("0px"));

    page.advance_time(95)?;
    assert_eq!(page.now_ms(), 95);
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("36px"));
    assert_eq!(page.popup_phase("#s + a")?, PopupPhase::Opening);

    page.flush()?;
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("72px"));
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);
    Ok(())
}

#[test]
fn upward_select_anchors_the_bottom_edge() -> Result<()> {
    let mut page = page_with_select(
        "<select id='s' class='up'><option>A</option></select>",
        &Options::default(),
    )?;
    page.click("#s + a")?;
    assert_eq!(page.style_property(DROPDOWN, "bottom")?.as_deref(), Some("370px"));
    assert_eq!(page.style_property(DROPDOWN, "top")?, None);
    Ok(())
}

#[test]
fn list_width_excludes_trigger_borders() -> Result<()> {
    let mut page = fruit_page()?;
    page.set_attribute(
        "#s + a",
        "style",
        "border-left-width: 1px; border-right-width: 2.5px",
    )?;
    page.click("#s + a")?;
    assert_eq!(page.style_property(DROPDOWN, "width")?.as_deref(), Some("116.5px"));
    Ok(())
}

#[test]
fn rows_mirror_options_and_groups() -> Result<()> {
    let mut page = page_with_select(
        r#"
        <select id='s'>
          <option value='a'>Apple</option>
          <optgroup label='Citrus'>
            <option value='l'>Lemon</option>
            <option value='o' disabled>Orange</option>
          </optgroup>
          <optgroup label='Gone' disabled>
            <option value='g'>Grape</option>
          </optgroup>
        </select>
        "#,
        &Options::default(),
    )?;
    page.click("#s + a")?;
    page.flush()?;

    assert_eq!(page.count("li.machinator-option")?, 4);
    assert_eq!(page.count("li.machinator-optgroup")?, 2);
    assert_eq!(
        page.count("li.machinator-optgroup > ul.machinator-optgroup-options > li")?,
        3
    );
    page.assert_text("li.machinator-optgroup > span.machinator-optgroup-label", "Citrus")?;
    page.assert_has_class("li.machinator-optgroup.Disabled", "machinator-optgroup")?;
    assert_eq!(page.count("li.machinator-option.Disabled")?, 2);
    assert_eq!(
        page.attribute("li.machinator-option.selected", "data-machinator-val")?
            .as_deref(),
        Some("a")
    );
    // Six entries at the default 24px row height.
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("144px"));
    Ok(())
}

#[test]
fn choosing_a_row_selects_closes_and_refocuses() -> Result<()> {
    let mut page = fruit_page()?;
    let baseline = page.listener_count("#s + a")?;
    page.click("#s + a")?;
    page.flush()?;
    assert_eq!(page.document_listener_count(), 1);
    assert_eq!(page.window_listener_count(), 2);

    page.click("li[data-machinator-val='c']")?;
    page.assert_value("#s", "c")?;
    page.assert_text("#s + a", "Cherry")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);
    assert!(page.is_focused("#s + a")?);

    page.advance_time(95)?;
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("36px"));

    page.flush()?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closed);
    page.assert_absent(DROPDOWN)?;
    assert_eq!(page.global_listener_count(), 0);
    assert_eq!(page.listener_count("#s + a")?, baseline);
    Ok(())
}

#[test]
fn disabled_rows_ignore_clicks() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.flush()?;
    page.click("li[data-machinator-val='b']")?;
    page.assert_value("#s", "a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);
    Ok(())
}

#[test]
fn pointer_outside_dismisses_but_trigger_and_list_do_not() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.flush()?;

    page.pointer_down(DROPDOWN)?;
    page.pointer_down("#s + a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);

    page.pointer_down("#outside")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);
    page.flush()?;
    page.assert_absent(DROPDOWN)?;
    page.assert_value("#s", "a")?;
    Ok(())
}

#[test]
fn wheel_inside_keeps_the_list_and_window_scroll_closes_it() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.flush()?;

    page.wheel("li[data-machinator-val='a']")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);

    page.scroll_window()?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);
    page.flush()?;
    assert_eq!(page.global_listener_count(), 0);
    Ok(())
}

#[test]
fn wheel_outside_closes() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.wheel("#outside")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);
    Ok(())
}

#[test]
fn closing_mid_open_collapses_from_the_current_height() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.advance_time(95)?;
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("36px"));

    page.click("#s + a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);
    page.advance_time(95)?;
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("18px"));
    page.flush()?;
    page.assert_absent(DROPDOWN)?;
    Ok(())
}

#[test]
fn at_most_one_list_per_select() -> Result<()> {
    let mut page = fruit_page()?;
    page.click("#s + a")?;
    page.click("#s + a")?;
    page.click("#s + a")?;
    assert_eq!(page.count(DROPDOWN)?, 1);
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closing);

    page.flush()?;
    page.assert_absent(DROPDOWN)?;
    page.click("#s + a")?;
    assert_eq!(page.count(DROPDOWN)?, 1);
    assert_eq!(page.document_listener_count(), 1);
    Ok(())
}

#[test]
fn opening_a_second_select_dismisses_the_first() -> Result<()> {
    let mut page = Page::from_html(
        r#"
        <select id='s1'><option>A</option></select>
        <select id='s2'><option>B</option></select>
        "#,
    )?;
    page.machinate("body", &Options::default())?;
    page.click("#s1 + a")?;
    page.flush()?;
    page.click("#s2 + a")?;
    assert_eq!(page.popup_phase("#s1")?, PopupPhase::Closing);
    assert_eq!(page.popup_phase("#s2")?, PopupPhase::Opening);

    page.flush()?;
    assert_eq!(page.popup_phase("#s1")?, PopupPhase::Closed);
    assert_eq!(page.popup_phase("#s2")?, PopupPhase::Open);
    assert_eq!(page.count(DROPDOWN)?, 1);
    assert_eq!(page.document_listener_count(), 1);
    Ok(())
}

#[test]
fn disabled_select_never_opens() -> Result<()> {
    let mut page = page_with_select(
        "<select id='s' disabled><option>A</option></select>",
        &Options::default(),
    )?;
    page.click("#s + a")?;
    page.assert_absent(DROPDOWN)?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closed);
    Ok(())
}

#[test]
fn zero_duration_opens_and_closes_synchronously() -> Result<()> {
    let mut page = page_with_select(
        "<select id='s'><option>A</option><option>B</option></select>",
        &Options::default().with_popup_animation_duration_ms(0),
    )?;
    page.click("#s + a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("48px"));

    page.click("#s + a")?;
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Closed);
    page.assert_absent(DROPDOWN)?;
    assert_eq!(page.global_listener_count(), 0);
    Ok(())
}

#[test]
fn runaway_frame_loops_are_reported() -> Result<()> {
    let mut page = fruit_page()?;
    page.set_frame_step_limit(3)?;
    page.click("#s + a")?;
    match page.flush() {
        Err(Error::Runtime(message)) => {
            assert!(
                message.contains("frame loop exceeded max steps: limit=3"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected step limit error, got: {other:?}"),
    }
    Ok(())
}

#[test]
fn clock_and_layout_inputs_are_validated() -> Result<()> {
    let mut page = fruit_page()?;
    assert!(matches!(page.advance_time(-1), Err(Error::Runtime(_))));
    assert!(matches!(page.set_frame_interval(0), Err(Error::InvalidOption(_))));
    assert!(matches!(page.set_frame_step_limit(0), Err(Error::InvalidOption(_))));
    assert!(matches!(page.set_body_height(-5.0), Err(Error::InvalidOption(_))));
    assert!(matches!(
        page.set_option_row_height(f64::NAN),
        Err(Error::InvalidOption(_))
    ));
    assert!(matches!(
        page.machinate("body", &Options::default().with_popup_animation_duration_ms(-10)),
        Err(Error::InvalidOption(_))
    ));
    assert!(matches!(
        page.popup_phase("#outside"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn custom_frame_interval_changes_the_sampling() -> Result<()> {
    let mut page = fruit_page()?;
    page.set_frame_interval(50)?;
    page.set_option_row_height(10.0)?;
    page.click("#s + a")?;
    page.advance_time(100)?;
    let height = page
        .style_property(DROPDOWN, "height")?
        .unwrap_or_default();
    assert_ne!(height, "0px");
    assert_ne!(height, "30px");
    page.advance_time(90)?;
    assert_eq!(page.style_property(DROPDOWN, "height")?.as_deref(), Some("30px"));
    assert_eq!(page.popup_phase("#s")?, PopupPhase::Open);
    Ok(())
}
