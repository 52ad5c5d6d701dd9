//! Terminal button identifiers and the packed per-button state field

/// Buttons per terminal
pub const MAX_BUTTONS: usize = 3;

/// Bits used by [`ButtonStates`] on the wire
pub const BUTTON_STATES_MASK: u8 = 0x3F;

/// One of the three keypad buttons (numbered from 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    One,
    Two,
    Three,
}

impl ButtonId {
    pub const ALL: [ButtonId; MAX_BUTTONS] = [ButtonId::One, ButtonId::Two, ButtonId::Three];

    /// Parse a 1-based button number
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(ButtonId::One),
            2 => Some(ButtonId::Two),
            3 => Some(ButtonId::Three),
            _ => None,
        }
    }

    /// 1-based button number
    pub const fn number(self) -> u8 {
        match self {
            ButtonId::One => 1,
            ButtonId::Two => 2,
            ButtonId::Three => 3,
        }
    }

    /// 0-based index for table lookups
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }

    const fn shift(self) -> u8 {
        (self.number() - 1) * 2
    }
}

/// Classified state of one button since the last report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[default]
    Idle,
    Pressed,
    DoublePressed,
    Held,
}

// Wire format values
const STATE_IDLE: u8 = 0;
const STATE_PRESSED: u8 = 1;
const STATE_DOUBLE_PRESSED: u8 = 2;
const STATE_HELD: u8 = 3;

impl ButtonState {
    /// Every non-idle state, in keymap column order
    pub const ACTIVE: [ButtonState; 3] = [
        ButtonState::Pressed,
        ButtonState::DoublePressed,
        ButtonState::Held,
    ];

    /// Parse a 2-bit state value
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            STATE_IDLE => ButtonState::Idle,
            STATE_PRESSED => ButtonState::Pressed,
            STATE_DOUBLE_PRESSED => ButtonState::DoublePressed,
            _ => ButtonState::Held,
        }
    }

    pub const fn to_bits(self) -> u8 {
        match self {
            ButtonState::Idle => STATE_IDLE,
            ButtonState::Pressed => STATE_PRESSED,
            ButtonState::DoublePressed => STATE_DOUBLE_PRESSED,
            ButtonState::Held => STATE_HELD,
        }
    }

    /// Column of a non-idle state in a keymap row
    pub const fn active_index(self) -> Option<usize> {
        match self {
            ButtonState::Idle => None,
            ButtonState::Pressed => Some(0),
            ButtonState::DoublePressed => Some(1),
            ButtonState::Held => Some(2),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ButtonState::Idle)
    }
}

/// All button states of a terminal, two bits per button.
///
/// Button `n` occupies bits `2(n-1)..2n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonStates(u8);

impl ButtonStates {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Build from the packed representation; bits above button 3 are dropped
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & BUTTON_STATES_MASK)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn get(self, button: ButtonId) -> ButtonState {
        ButtonState::from_bits(self.0 >> button.shift())
    }

    pub fn set(&mut self, button: ButtonId, state: ButtonState) {
        let shift = button.shift();
        self.0 = (self.0 & !(0x03 << shift)) | (state.to_bits() << shift);
    }

    /// True when every button is idle
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return every button to idle
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Buttons that are not idle, in button order
    pub fn active(self) -> impl Iterator<Item = (ButtonId, ButtonState)> {
        ButtonId::ALL
            .into_iter()
            .map(move |button| (button, self.get(button)))
            .filter(|(_, state)| !state.is_idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_number_roundtrip() {
        for button in ButtonId::ALL {
            assert_eq!(ButtonId::from_number(button.number()), Some(button));
        }
        assert!(ButtonId::from_number(0).is_none());
        assert!(ButtonId::from_number(4).is_none());
        assert_eq!(ButtonId::Three.index(), 2);
    }

    #[test]
    fn test_state_bits() {
        for state in [
            ButtonState::Idle,
            ButtonState::Pressed,
            ButtonState::DoublePressed,
            ButtonState::Held,
        ] {
            assert_eq!(ButtonState::from_bits(state.to_bits()), state);
        }
        assert_eq!(ButtonState::Held.active_index(), Some(2));
        assert_eq!(ButtonState::Idle.active_index(), None);
    }

    #[test]
    fn test_bit_positions() {
        let mut states = ButtonStates::new();
        states.set(ButtonId::One, ButtonState::Pressed);
        assert_eq!(states.raw(), 0b00_00_01);

        states.set(ButtonId::Two, ButtonState::Held);
        assert_eq!(states.raw(), 0b00_11_01);

        states.set(ButtonId::Three, ButtonState::DoublePressed);
        assert_eq!(states.raw(), 0b10_11_01);

        states.set(ButtonId::Two, ButtonState::Idle);
        assert_eq!(states.raw(), 0b10_00_01);
        assert_eq!(states.get(ButtonId::Three), ButtonState::DoublePressed);
    }

    #[test]
    fn test_from_raw_masks_high_bits() {
        let states = ButtonStates::from_raw(0xFF);
        assert_eq!(states.raw(), BUTTON_STATES_MASK);
        assert_eq!(states.get(ButtonId::Three), ButtonState::Held);
    }

    #[test]
    fn test_active_iterator() {
        let mut states = ButtonStates::new();
        assert!(states.is_empty());
        assert_eq!(states.active().count(), 0);

        states.set(ButtonId::Three, ButtonState::Held);
        states.set(ButtonId::One, ButtonState::Pressed);
        let mut active = states.active();
        assert_eq!(active.next(), Some((ButtonId::One, ButtonState::Pressed)));
        assert_eq!(active.next(), Some((ButtonId::Three, ButtonState::Held)));
        assert_eq!(active.next(), None);

        states.clear();
        assert!(states.is_empty());
    }
}
