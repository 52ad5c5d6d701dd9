//! Button press classification
//!
//! The terminal samples its keypad periodically and feeds every detection
//! here. Consecutive detections of the same button form a run; the run
//! length decides the state reported for that button:
//!
//! | run length            | state          |
//! |-----------------------|----------------|
//! | 1                     | Pressed        |
//! | 2                     | DoublePressed  |
//! | 3 ..= held_threshold  | Pressed        |
//! | > held_threshold      | Held           |
//!
//! States persist until the terminal has reported them and calls
//! [`ButtonClassifier::reset`].

use domotica_protocol::{ButtonId, ButtonState, ButtonStates};

#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    states: ButtonStates,
    current: Option<ButtonId>,
    press_count: u8,
    held_threshold: u8,
}

impl ButtonClassifier {
    pub fn new(held_threshold: u8) -> Self {
        Self {
            states: ButtonStates::new(),
            current: None,
            press_count: 0,
            held_threshold,
        }
    }

    /// Feed one keypad sample.
    ///
    /// Returns the detected button and its new state; the caller should
    /// hold off sampling for the debounce time after any detection.
    pub fn update(&mut self, detection: Option<ButtonId>) -> Option<(ButtonId, ButtonState)> {
        let Some(button) = detection else {
            self.current = None;
            self.press_count = 0;
            return None;
        };

        if self.current != Some(button) {
            self.current = Some(button);
            self.press_count = 0;
        }
        self.press_count = self.press_count.saturating_add(1);

        let previous = self.states.get(button);
        let next = match self.press_count {
            _ if previous == ButtonState::Held => ButtonState::Held,
            n if n > self.held_threshold => ButtonState::Held,
            1 if !previous.is_idle() => previous,
            2 => ButtonState::DoublePressed,
            _ => ButtonState::Pressed,
        };
        self.states.set(button, next);

        Some((button, next))
    }

    /// Current state of every button
    pub fn states(&self) -> ButtonStates {
        self.states
    }

    /// Length of the current run
    pub fn press_count(&self) -> u8 {
        self.press_count
    }

    /// Return every button to idle after a report
    pub fn reset(&mut self) {
        self.states.clear();
        self.current = None;
        self.press_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B1: Option<ButtonId> = Some(ButtonId::One);
    const B2: Option<ButtonId> = Some(ButtonId::Two);

    fn feed(classifier: &mut ButtonClassifier, samples: &[Option<ButtonId>]) {
        for &sample in samples {
            classifier.update(sample);
        }
    }

    #[test]
    fn test_single_detection_is_pressed() {
        let mut classifier = ButtonClassifier::new(5);
        assert_eq!(
            classifier.update(B1),
            Some((ButtonId::One, ButtonState::Pressed))
        );
        assert_eq!(classifier.states().get(ButtonId::One), ButtonState::Pressed);
    }

    #[test]
    fn test_two_consecutive_is_double_pressed() {
        let mut classifier = ButtonClassifier::new(5);
        feed(&mut classifier, &[B1, B1]);
        assert_eq!(
            classifier.states().get(ButtonId::One),
            ButtonState::DoublePressed
        );
    }

    #[test]
    fn test_gap_breaks_the_run() {
        let mut classifier = ButtonClassifier::new(5);
        feed(&mut classifier, &[B1, None, B1]);
        assert_eq!(classifier.states().get(ButtonId::One), ButtonState::Pressed);
        assert_eq!(classifier.press_count(), 1);
    }

    #[test]
    fn test_long_run_becomes_held() {
        let mut classifier = ButtonClassifier::new(5);
        let expected = [
            ButtonState::Pressed,
            ButtonState::DoublePressed,
            ButtonState::Pressed,
            ButtonState::Pressed,
            ButtonState::Pressed,
            ButtonState::Held,
        ];
        for state in expected {
            assert_eq!(classifier.update(B1), Some((ButtonId::One, state)));
        }
        classifier.update(B1);
        assert_eq!(classifier.states().get(ButtonId::One), ButtonState::Held);
    }

    #[test]
    fn test_held_survives_a_new_run() {
        let mut classifier = ButtonClassifier::new(2);
        feed(&mut classifier, &[B1, B1, B1, None, B1, B1]);
        assert_eq!(classifier.states().get(ButtonId::One), ButtonState::Held);
    }

    #[test]
    fn test_switching_buttons_resets_the_run() {
        let mut classifier = ButtonClassifier::new(5);
        feed(&mut classifier, &[B1, B2, B1]);
        let states = classifier.states();
        assert_eq!(states.get(ButtonId::One), ButtonState::Pressed);
        assert_eq!(states.get(ButtonId::Two), ButtonState::Pressed);
        assert_eq!(states.get(ButtonId::Three), ButtonState::Idle);
    }

    #[test]
    fn test_no_detection_changes_nothing() {
        let mut classifier = ButtonClassifier::new(5);
        assert_eq!(classifier.update(None), None);
        assert!(classifier.states().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut classifier = ButtonClassifier::new(5);
        feed(&mut classifier, &[B1, B1]);
        classifier.reset();
        assert!(classifier.states().is_empty());
        assert_eq!(classifier.press_count(), 0);

        // A run continuing across the reset starts over
        assert_eq!(
            classifier.update(B1),
            Some((ButtonId::One, ButtonState::Pressed))
        );
    }
}
