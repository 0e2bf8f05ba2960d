use input_machinator::{Key, Options, Page, PopupPhase};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const MACHINATOR_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/machinator_property_fuzz_test.txt";
const DEFAULT_MACHINATOR_PROPTEST_CASES: u32 = 128;

const FORM_HTML: &str = r#"
<div id='outside'>outside</div>
<form id='f'>
  <label id='lc'><input id='c' type='checkbox'> Check</label>
  <input type='radio' name='g' id='r1' checked><label id='lr1' for='r1'>One</label>
  <label id='lr2'><input type='radio' name='g' id='r2'> Two</label>
  <input type='radio' name='g' id='r3' disabled>
  <select id='s'>
    <option value='a'>Apple</option>
    <option value='b' disabled>Banana</option>
    <optgroup label='Stone'>
      <option value='c'>Cherry</option>
      <option value='d'>Damson</option>
    </optgroup>
    <option value='e'>Elder</option>
  </select>
</form>
"#;

const TOGGLES: [&str; 4] = ["#c", "#r1", "#r2", "#r3"];
const RADIOS: [&str; 3] = ["#r1", "#r2", "#r3"];
const OPTION_TEXT: [(&str, &str); 5] = [
    ("a", "Apple"),
    ("b", "Banana"),
    ("c", "Cherry"),
    ("d", "Damson"),
    ("e", "Elder"),
];
const DROPDOWN: &str = "ul.machinator-select-dropdown";

#[derive(Clone, Debug)]
enum UiAction {
    ClickIndicator(usize),
    ClickLabel(usize),
    DoubleClickLabel(usize),
    KeyIndicator(usize, Key),
    ScriptCheck(bool),
    ClickTrigger,
    KeyTrigger(Key),
    ClickRow(usize),
    PointerOutside,
    WheelOutside,
    ScrollWindow,
    ScriptSelect(usize),
    Advance(i64),
    Flush,
}

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn machinator_proptest_cases() -> u32 {
    std::env::var("MACHINATOR_FUZZ_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases(
                "MACHINATOR_PROPTEST_CASES",
                DEFAULT_MACHINATOR_PROPTEST_CASES,
            )
        })
}

fn key_strategy() -> BoxedStrategy<Key> {
    prop_oneof![
        Just(Key::Enter),
        Just(Key::Space),
        Just(Key::LineFeed),
        Just(Key::ArrowLeft),
        Just(Key::ArrowUp),
        Just(Key::ArrowRight),
        Just(Key::ArrowDown),
        Just(Key::Tab),
        (0u32..128).prop_map(Key::from_code),
    ]
    .boxed()
}

fn toggle_action_strategy() -> BoxedStrategy<UiAction> {
    prop_oneof![
        3 => (0..TOGGLES.len()).prop_map(UiAction::ClickIndicator),
        2 => (0..3usize).prop_map(UiAction::ClickLabel),
        1 => (0..3usize).prop_map(UiAction::DoubleClickLabel),
        2 => ((0..TOGGLES.len()), key_strategy())
            .prop_map(|(index, key)| UiAction::KeyIndicator(index, key)),
        1 => any::<bool>().prop_map(UiAction::ScriptCheck),
    ]
    .boxed()
}

fn select_action_strategy() -> BoxedStrategy<UiAction> {
    prop_oneof![
        3 => Just(UiAction::ClickTrigger),
        2 => key_strategy().prop_map(UiAction::KeyTrigger),
        3 => (0..OPTION_TEXT.len()).prop_map(UiAction::ClickRow),
        1 => Just(UiAction::PointerOutside),
        1 => Just(UiAction::WheelOutside),
        1 => Just(UiAction::ScrollWindow),
        1 => (0..OPTION_TEXT.len()).prop_map(UiAction::ScriptSelect),
        2 => (0i64..400).prop_map(UiAction::Advance),
        1 => Just(UiAction::Flush),
    ]
    .boxed()
}

fn ui_action_strategy() -> BoxedStrategy<UiAction> {
    prop_oneof![
        2 => toggle_action_strategy(),
        3 => select_action_strategy(),
    ]
    .boxed()
}

fn ui_action_sequence_strategy() -> BoxedStrategy<Vec<UiAction>> {
    vec(ui_action_strategy(), 1..=24).boxed()
}

fn run_action(page: &mut Page, action: &UiAction) -> input_machinator::Result<()> {
    match action {
        UiAction::ClickIndicator(index) => page.click(&format!("{} + a", TOGGLES[*index])),
        UiAction::ClickLabel(index) => page.click(["#lc", "#lr1", "#lr2"][*index]),
        UiAction::DoubleClickLabel(index) => page.double_click(["#lc", "#lr1", "#lr2"][*index]),
        UiAction::KeyIndicator(index, key) => {
            page.key_down(&format!("{} + a", TOGGLES[*index]), *key)
        }
        UiAction::ScriptCheck(checked) => {
            page.set_checked("#c", *checked)?;
            page.trigger_change("#c")
        }
        UiAction::ClickTrigger => page.click("#s + a"),
        UiAction::KeyTrigger(key) => page.key_down("#s + a", *key),
        UiAction::ClickRow(index) => {
            let selector = format!("li[data-machinator-val='{}']", OPTION_TEXT[*index].0);
            if page.count(&selector)? == 0 {
                return Ok(());
            }
            page.click(&selector)
        }
        UiAction::PointerOutside => page.pointer_down("#outside"),
        UiAction::WheelOutside => page.wheel("#outside"),
        UiAction::ScrollWindow => page.scroll_window(),
        UiAction::ScriptSelect(index) => page.set_select_value("#s", OPTION_TEXT[*index].0),
        UiAction::Advance(delta_ms) => page.advance_time(*delta_ms),
        UiAction::Flush => page.flush(),
    }
}

fn assert_invariants(page: &Page, step: usize, action: &UiAction) -> TestCaseResult {
    for native in TOGGLES {
        let indicator = format!("{native} + a");
        let checked = page.assert_checked(native, true).is_ok();
        let expected_class = if checked { "checked" } else { "unchecked" };
        prop_assert!(
            page.assert_has_class(&indicator, expected_class).is_ok(),
            "indicator for {native} lost sync after step {step}: {action:?}"
        );
    }

    let checked_radios = RADIOS
        .iter()
        .filter(|radio| page.assert_checked(radio, true).is_ok())
        .count();
    prop_assert!(
        checked_radios <= 1,
        "{checked_radios} radios checked after step {step}: {action:?}"
    );
    prop_assert!(
        page.assert_checked("#r3", false).is_ok(),
        "disabled radio became checked after step {step}: {action:?}"
    );

    let trigger_html = page.inner_html("#s + a").map_err(fail)?;
    let expected_html = OPTION_TEXT
        .iter()
        .find(|(value, _)| page.assert_value("#s", value).is_ok())
        .map(|(_, text)| *text)
        .unwrap_or("&nbsp;");
    prop_assert_eq!(
        trigger_html.as_str(),
        expected_html,
        "trigger out of sync after step {}: {:?}",
        step,
        action
    );

    let lists = page.count(DROPDOWN).map_err(fail)?;
    let phase = page.popup_phase("#s").map_err(fail)?;
    prop_assert!(lists <= 1, "{lists} popup lists after step {step}: {action:?}");
    if phase == PopupPhase::Closed {
        prop_assert_eq!(lists, 0);
        prop_assert_eq!(page.global_listener_count(), 0);
    } else {
        prop_assert_eq!(lists, 1);
        prop_assert_eq!(page.document_listener_count(), 1);
        prop_assert_eq!(page.window_listener_count(), 2);
    }
    Ok(())
}

fn fail(error: input_machinator::Error) -> TestCaseError {
    TestCaseError::fail(format!("{error:?}"))
}

fn assert_machinator_sequence_is_stable(actions: &[UiAction]) -> TestCaseResult {
    let mut page = Page::from_html(FORM_HTML).map_err(fail)?;
    page.machinate("#f", &Options::default()).map_err(fail)?;
    assert_invariants(&page, 0, &UiAction::Flush)?;

    for (step, action) in actions.iter().enumerate() {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_action(&mut page, action)
        }));

        match outcome {
            Err(_) => {
                prop_assert!(
                    false,
                    "action panicked at step {step}: {action:?}, actions={actions:?}"
                );
            }
            Ok(Err(error)) => {
                prop_assert!(
                    false,
                    "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
                );
            }
            Ok(Ok(())) => {}
        }

        assert_invariants(&page, step, action)?;
    }

    if page.popup_phase("#s").map_err(fail)? != PopupPhase::Closed {
        page.pointer_down("#outside").map_err(fail)?;
    }
    page.flush().map_err(fail)?;
    prop_assert_eq!(page.popup_phase("#s").map_err(fail)?, PopupPhase::Closed);
    prop_assert!(page.assert_absent(DROPDOWN).is_ok());
    prop_assert_eq!(page.global_listener_count(), 0);
    Ok(())
}

#[test]
fn popup_left_open_by_the_last_action_is_released_after_dismissal() {
    let actions = [
        UiAction::ClickTrigger,
        UiAction::ClickIndicator(0),
        UiAction::Advance(190),
        UiAction::ClickTrigger,
    ];
    if let Err(error) = assert_machinator_sequence_is_stable(&actions) {
        panic!("{error}");
    }
}

#[test]
fn popup_still_opening_at_the_end_is_released_after_dismissal() {
    let actions = [UiAction::ClickTrigger, UiAction::Advance(40)];
    if let Err(error) = assert_machinator_sequence_is_stable(&actions) {
        panic!("{error}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: machinator_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(MACHINATOR_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn machinated_controls_stay_in_sync_with_their_natives(actions in ui_action_sequence_strategy()) {
        assert_machinator_sequence_is_stable(&actions)?;
    }
}
