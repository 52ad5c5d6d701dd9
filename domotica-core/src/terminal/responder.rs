//! Terminal side of a bus transaction
//!
//! A terminal answers a poll only when it is addressed, has something to
//! report, and the user has stopped touching it for `lock_ms`. The last rule
//! lets a press sequence finish before it is reported.

use domotica_protocol::wire::{decode_master_byte, is_master_byte};
use domotica_protocol::{DeviceId, TerminalReport, REPLY_LEN};

use super::classifier::ButtonClassifier;
use super::trimmer::TrimmerTracker;

#[derive(Debug, Clone)]
pub struct TerminalResponder {
    device: DeviceId,
    lock_ms: u32,
    last_activity_ms: Option<u64>,
}

impl TerminalResponder {
    pub fn new(device: DeviceId, lock_ms: u32) -> Self {
        Self {
            device,
            lock_ms,
            last_activity_ms: None,
        }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Record a button detection or trimmer movement
    pub fn note_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = Some(now_ms);
    }

    /// Byte is a poll for this terminal
    pub fn is_addressed(&self, byte: u8) -> bool {
        is_master_byte(byte) && decode_master_byte(byte) == self.device.get()
    }

    /// Quiet period since the last activity has elapsed
    pub fn is_unlocked(&self, now_ms: u64) -> bool {
        match self.last_activity_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.lock_ms as u64,
            None => true,
        }
    }

    /// Handle one received bus byte.
    ///
    /// Returns the reply to transmit, after which the button states and the
    /// trimmer change flag have been cleared. Returns `None` to stay silent.
    pub fn respond(
        &mut self,
        byte: u8,
        now_ms: u64,
        buttons: &mut ButtonClassifier,
        trimmer: &mut TrimmerTracker,
    ) -> Option<[u8; REPLY_LEN]> {
        if !self.is_addressed(byte) {
            return None;
        }
        let states = buttons.states();
        if states.is_empty() && !trimmer.is_changed() {
            return None;
        }
        if !self.is_unlocked(now_ms) {
            return None;
        }

        let reply = TerminalReport::new(trimmer.value(), states)
            .to_reply(self.device)
            .ok()?;
        buttons.reset();
        trimmer.clear_changed();
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domotica_protocol::{ButtonId, ButtonState};

    struct Terminal {
        responder: TerminalResponder,
        buttons: ButtonClassifier,
        trimmer: TrimmerTracker,
    }

    impl Terminal {
        fn new(id: u8) -> Self {
            let mut trimmer = TrimmerTracker::new(5);
            trimmer.update(0x012);
            Self {
                responder: TerminalResponder::new(DeviceId::new(id).unwrap(), 500),
                buttons: ButtonClassifier::new(5),
                trimmer,
            }
        }

        fn press(&mut self, button: ButtonId, now_ms: u64) {
            self.buttons.update(Some(button));
            self.responder.note_activity(now_ms);
        }

        fn poll(&mut self, byte: u8, now_ms: u64) -> Option<[u8; REPLY_LEN]> {
            self.responder
                .respond(byte, now_ms, &mut self.buttons, &mut self.trimmer)
        }
    }

    #[test]
    fn test_silent_with_nothing_to_report() {
        let mut terminal = Terminal::new(1);
        assert_eq!(terminal.poll(0x81, 10_000), None);
    }

    #[test]
    fn test_reply_after_lock_out() {
        let mut terminal = Terminal::new(1);
        terminal.press(ButtonId::One, 1000);
        terminal.press(ButtonId::Two, 1200);
        terminal.press(ButtonId::Two, 1400);
        terminal.press(ButtonId::Two, 1600);
        terminal.press(ButtonId::Two, 1800);
        terminal.press(ButtonId::Two, 2000);
        terminal.press(ButtonId::Two, 2200);
        assert_eq!(
            terminal.buttons.states().get(ButtonId::Two),
            ButtonState::Held
        );

        assert_eq!(terminal.poll(0x81, 2600), None);
        let reply = terminal.poll(0x81, 2700).unwrap();
        assert_eq!(reply, [0x01, 0x12, 0x68, 0x44, 0x07]);

        // Reported state is cleared
        assert!(terminal.buttons.states().is_empty());
        assert_eq!(terminal.poll(0x81, 5000), None);
    }

    #[test]
    fn test_other_address_ignored() {
        let mut terminal = Terminal::new(1);
        terminal.press(ButtonId::One, 0);
        assert_eq!(terminal.poll(0x82, 1000), None);
        assert_eq!(terminal.poll(0x01, 1000), None);
        assert!(!terminal.buttons.states().is_empty());
        assert!(terminal.poll(0x81, 1000).is_some());
    }

    #[test]
    fn test_trimmer_movement_is_reported() {
        let mut terminal = Terminal::new(3);
        assert!(terminal.trimmer.update(700));
        terminal.responder.note_activity(100);

        let reply = terminal.poll(0x83, 600).unwrap();
        assert_eq!(reply[0], 0x03);
        let report = TerminalReport::from_wire(&reply[1..]).unwrap();
        assert_eq!(report.trimmer, 700);
        assert!(report.buttons.is_empty());
        assert!(!terminal.trimmer.is_changed());
    }

    #[test]
    fn test_unlocked_without_activity() {
        let responder = TerminalResponder::new(DeviceId::new(0).unwrap(), 500);
        assert!(responder.is_unlocked(0));
        assert!(responder.is_addressed(0x80));
        assert!(!responder.is_addressed(0x00));
    }
}
