use eyre::Result;

use super::conversation_state::Entry;

/// The message list the widget renders into.
pub trait MessageSurface {
    /// Drop everything currently shown.
    fn clear(&mut self) -> Result<()>;

    fn append(&mut self, entry: Entry) -> Result<()>;

    /// Remove the first loading placeholder, returning whether one was found.
    fn remove_first_loading(&mut self) -> Result<bool>;

    /// Bring the newest entry into view.
    fn scroll_to_latest(&mut self) -> Result<()>;
}

/// The text field the user types into.
pub trait InputControl {
    fn set_disabled(&mut self, disabled: bool);
    fn is_disabled(&self) -> bool;
    fn value(&self) -> &str;
    fn set_value(&mut self, value: &str);
    fn focus(&mut self);

    fn clear(&mut self) {
        self.set_value("");
    }
}

/// Plain input field state with no device behind it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    pub disabled: bool,
    pub value: String,
    pub focused: bool,
}

impl InputControl for InputState {
    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.focused = false;
        }
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_drops_focus() {
        let mut input = InputState::default();
        input.focus();
        input.set_disabled(true);
        assert!(input.is_disabled());
        assert!(!input.focused);
    }

    #[test]
    fn clear_empties_value() {
        let mut input = InputState::default();
        input.set_value("fire drill");
        input.clear();
        assert_eq!(input.value(), "");
    }
}
