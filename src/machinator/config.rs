use super::*;

pub(crate) const DESIGNATOR_CLASS: &str = "machinator";
pub(crate) const OPEN_UPWARD_CLASS: &str = "up";

pub(crate) const CHECKBOX_CLASS: &str = "machinator-checkbox";
pub(crate) const RADIO_CLASS: &str = "machinator-radio";
pub(crate) const CHECKBOX_LABEL_CLASS: &str = "machinator-checkbox-label";
pub(crate) const RADIO_LABEL_CLASS: &str = "machinator-radio-label";
pub(crate) const CHECKED_CLASS: &str = "checked";
pub(crate) const UNCHECKED_CLASS: &str = "unchecked";
pub(crate) const DISABLED_CLASS: &str = "Disabled";
pub(crate) const SELECTED_CLASS: &str = "selected";

pub(crate) const SELECT_TRIGGER_CLASS: &str = "machinator-select";
pub(crate) const DROPDOWN_CLASS: &str = "machinator-select-dropdown";
pub(crate) const OPTION_ROW_CLASS: &str = "machinator-option";
pub(crate) const OPTGROUP_ROW_CLASS: &str = "machinator-optgroup";
pub(crate) const OPTGROUP_LABEL_CLASS: &str = "machinator-optgroup-label";
pub(crate) const OPTGROUP_OPTIONS_CLASS: &str = "machinator-optgroup-options";

pub(crate) const DATA_HTML_ATTR: &str = "data-machinator-html";
pub(crate) const DATA_CLASS_ATTR: &str = "data-machinator-class";
pub(crate) const DATA_VALUE_ATTR: &str = "data-machinator-val";

pub(crate) const DEFAULT_POPUP_ANIMATION_MS: i64 = 190;

/// Which control kinds an attach pass synchronizes, and how long the popup
/// takes to open and close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub checkbox: bool,
    pub radio: bool,
    pub select: bool,
    pub popup_animation_duration_ms: i64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            checkbox: true,
            radio: true,
            select: true,
            popup_animation_duration_ms: DEFAULT_POPUP_ANIMATION_MS,
        }
    }
}

impl Options {
    pub fn with_checkbox(mut self, enabled: bool) -> Self {
        self.checkbox = enabled;
        self
    }

    pub fn with_radio(mut self, enabled: bool) -> Self {
        self.radio = enabled;
        self
    }

    pub fn with_select(mut self, enabled: bool) -> Self {
        self.select = enabled;
        self
    }

    pub fn with_popup_animation_duration_ms(mut self, duration_ms: i64) -> Self {
        self.popup_animation_duration_ms = duration_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.popup_animation_duration_ms < 0 {
            return Err(Error::InvalidOption(format!(
                "popup animation duration must be non-negative (got {})",
                self.popup_animation_duration_ms
            )));
        }
        Ok(())
    }
}

/// What one attach pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachReport {
    pub checkboxes: usize,
    pub radios: usize,
    pub selects: usize,
    /// Controls that were already attached by an earlier pass.
    pub skipped: usize,
}

impl AttachReport {
    pub fn attached(&self) -> usize {
        self.checkboxes + self.radios + self.selects
    }
}
