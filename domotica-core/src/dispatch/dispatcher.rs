//! Zone dispatcher
//!
//! Owns the persistent enabled/duty state of every zone and turns terminal
//! reports into zone commands. Buttons toggle zones; trimmers dim zones
//! that are already on.

use heapless::Vec;

use domotica_protocol::{ButtonId, ButtonState, ButtonStates, DeviceId, TerminalReport, MAX_BUTTONS};

use super::gamma::gamma_correct;
use crate::config::{DimmingConfig, KeymapTable, ZoneId, ZoneKind, ZoneTable, MAX_ZONES};
use crate::traits::{ActuationError, ZoneActuator};

/// Most zone changes a single report can cause (two zones per button)
pub const MAX_CHANGES: usize = MAX_BUTTONS * 2;

/// Persistent state of one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneState {
    pub enabled: bool,
    /// Gamma-corrected duty restored when the zone is switched on
    pub target_duty: u16,
}

/// Input that caused a zone change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Button { button: ButtonId, state: ButtonState },
    Trimmer { value: u16 },
}

/// One zone command issued while handling a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneChange {
    pub device: DeviceId,
    pub trigger: Trigger,
    pub zone: ZoneId,
    pub kind: ZoneKind,
    /// State after the change
    pub enabled: bool,
    /// Duty sent to a PWM zone (0 for digital zones)
    pub duty: u16,
    /// Outcome of the actuator call; the zone state keeps the intent either way
    pub result: Result<(), ActuationError>,
}

pub type ZoneChanges = Vec<ZoneChange, MAX_CHANGES>;

/// Errors handling a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Report from a device beyond the configured terminal count
    UnknownDevice(DeviceId),
}

/// Single owner of all zone state
#[derive(Debug, Clone)]
pub struct ZoneDispatcher {
    zones: ZoneTable,
    keymap: KeymapTable,
    dimming: DimmingConfig,
    states: [ZoneState; MAX_ZONES],
    default_duty: u16,
}

impl ZoneDispatcher {
    /// All zones start off; PWM zones remember the gamma-corrected default duty
    pub fn new(zones: ZoneTable, keymap: KeymapTable, dimming: DimmingConfig) -> Self {
        let default_duty = gamma_correct(dimming.default_duty, dimming.gamma);
        let mut states = [ZoneState::default(); MAX_ZONES];
        for (zone, kind) in zones.iter() {
            if kind == ZoneKind::Pwm {
                states[zone.index()].target_duty = default_duty;
            }
        }
        Self {
            zones,
            keymap,
            dimming,
            states,
            default_duty,
        }
    }

    pub fn zone_state(&self, zone: ZoneId) -> Option<ZoneState> {
        self.zones.contains(zone).then(|| self.states[zone.index()])
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// Handle a polled report: buttons take precedence over the trimmer
    pub fn handle_report<A: ZoneActuator>(
        &mut self,
        device: DeviceId,
        report: &TerminalReport,
        actuator: &mut A,
    ) -> Result<ZoneChanges, DispatchError> {
        if report.buttons.is_empty() {
            self.handle_trimmer(device, report.trimmer, actuator)
        } else {
            self.handle_buttons(device, report.buttons, actuator)
        }
    }

    /// Toggle every zone bound to a non-idle button
    pub fn handle_buttons<A: ZoneActuator>(
        &mut self,
        device: DeviceId,
        buttons: ButtonStates,
        actuator: &mut A,
    ) -> Result<ZoneChanges, DispatchError> {
        self.check_device(device)?;

        let mut changes = ZoneChanges::new();
        for (button, state) in buttons.active() {
            let trigger = Trigger::Button { button, state };
            for zone in self.keymap.button_zones(device, button, state).zones() {
                if let Some(change) = self.toggle(device, trigger, zone, actuator) {
                    let _ = changes.push(change);
                }
            }
        }
        Ok(changes)
    }

    /// Dim every enabled zone bound to the trimmer
    pub fn handle_trimmer<A: ZoneActuator>(
        &mut self,
        device: DeviceId,
        value: u16,
        actuator: &mut A,
    ) -> Result<ZoneChanges, DispatchError> {
        self.check_device(device)?;

        let mut changes = ZoneChanges::new();
        let trigger = Trigger::Trimmer { value };
        for zone in self.keymap.trimmer_zones(device).zones() {
            if let Some(change) = self.dim(device, trigger, zone, value, actuator) {
                let _ = changes.push(change);
            }
        }
        Ok(changes)
    }

    fn check_device(&self, device: DeviceId) -> Result<(), DispatchError> {
        if self.keymap.contains_device(device) {
            Ok(())
        } else {
            Err(DispatchError::UnknownDevice(device))
        }
    }

    fn toggle<A: ZoneActuator>(
        &mut self,
        device: DeviceId,
        trigger: Trigger,
        zone: ZoneId,
        actuator: &mut A,
    ) -> Option<ZoneChange> {
        let kind = self.zones.kind(zone)?;
        let state = &mut self.states[zone.index()];
        state.enabled = !state.enabled;

        let (duty, result) = match kind {
            ZoneKind::Pwm => {
                let duty = if state.enabled { state.target_duty } else { 0 };
                (duty, actuator.pwm_write_zone(zone, duty, self.dimming.fade_ms))
            }
            ZoneKind::Digital => (0, actuator.gpio_write_zone(zone, state.enabled)),
        };

        Some(ZoneChange {
            device,
            trigger,
            zone,
            kind,
            enabled: state.enabled,
            duty,
            result,
        })
    }

    fn dim<A: ZoneActuator>(
        &mut self,
        device: DeviceId,
        trigger: Trigger,
        zone: ZoneId,
        value: u16,
        actuator: &mut A,
    ) -> Option<ZoneChange> {
        if !self.zones.is_pwm(zone) {
            return None;
        }
        let state = &mut self.states[zone.index()];
        if !state.enabled {
            return None;
        }

        let duty = gamma_correct(value, self.dimming.gamma);
        state.enabled = duty > 0;
        state.target_duty = if duty > 0 { duty } else { self.default_duty };
        let result = actuator.pwm_write_zone(zone, duty, self.dimming.fade_ms);

        Some(ZoneChange {
            device,
            trigger,
            zone,
            kind: ZoneKind::Pwm,
            enabled: state.enabled,
            duty,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::installation::zone::*;
    use crate::config::{default_keymap, default_zone_table, KeymapBuilder, ZonePair};
    use std::vec::Vec as StdVec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Command {
        Pwm(ZoneId, u16, u16),
        Gpio(ZoneId, bool),
    }

    #[derive(Default)]
    struct MockActuator {
        commands: StdVec<Command>,
        queue_full: bool,
    }

    impl ZoneActuator for MockActuator {
        fn pwm_write_zone(&mut self, zone: ZoneId, duty: u16, fade_ms: u16) -> Result<(), ActuationError> {
            if self.queue_full {
                return Err(ActuationError::QueueFull);
            }
            self.commands.push(Command::Pwm(zone, duty, fade_ms));
            Ok(())
        }

        fn gpio_write_zone(&mut self, zone: ZoneId, level: bool) -> Result<(), ActuationError> {
            self.commands.push(Command::Gpio(zone, level));
            Ok(())
        }
    }

    fn dispatcher() -> ZoneDispatcher {
        let zones = default_zone_table();
        let keymap = default_keymap(&zones).unwrap();
        ZoneDispatcher::new(zones, keymap, DimmingConfig::default())
    }

    fn device(id: u8) -> DeviceId {
        DeviceId::new(id).unwrap()
    }

    fn pressed(button: ButtonId) -> ButtonStates {
        let mut states = ButtonStates::new();
        states.set(button, ButtonState::Pressed);
        states
    }

    #[test]
    fn test_initial_state() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.zone_state(LED_2),
            Some(ZoneState {
                enabled: false,
                target_duty: 223
            })
        );
        assert_eq!(dispatcher.zone_state(LED_7).map(|s| s.target_duty), Some(0));
        assert_eq!(dispatcher.zone_state(ZoneId::new(30).unwrap()), None);
    }

    #[test]
    fn test_button_toggles_pwm_zone_on_and_off() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        let changes = dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].zone, LED_2);
        assert!(changes[0].enabled);
        assert_eq!(changes[0].duty, 223);
        assert_eq!(actuator.commands, [Command::Pwm(LED_2, 223, 500)]);
        assert!(dispatcher.zone_state(LED_2).unwrap().enabled);

        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands[1], Command::Pwm(LED_2, 0, 500));
        assert!(!dispatcher.zone_state(LED_2).unwrap().enabled);
    }

    #[test]
    fn test_button_toggles_digital_zone() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        // Device 10, button 1 switches LED_7 (digital)
        let changes = dispatcher
            .handle_buttons(device(10), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(changes[0].kind, ZoneKind::Digital);
        assert_eq!(actuator.commands, [Command::Gpio(LED_7, true)]);
    }

    #[test]
    fn test_batch_handles_every_active_button() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        let mut states = ButtonStates::new();
        states.set(ButtonId::One, ButtonState::Held);
        states.set(ButtonId::Three, ButtonState::DoublePressed);
        let changes = dispatcher
            .handle_buttons(device(11), states, &mut actuator)
            .unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(
            actuator.commands,
            [Command::Pwm(LED_1, 223, 500), Command::Pwm(LED_4, 223, 500)]
        );
        assert_eq!(
            changes[1].trigger,
            Trigger::Button {
                button: ButtonId::Three,
                state: ButtonState::DoublePressed
            }
        );
    }

    #[test]
    fn test_trimmer_ignored_while_zone_off() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        let changes = dispatcher
            .handle_trimmer(device(1), 1023, &mut actuator)
            .unwrap();
        assert!(changes.is_empty());
        assert!(actuator.commands.is_empty());
        assert_eq!(dispatcher.zone_state(LED_2).unwrap().target_duty, 223);
    }

    #[test]
    fn test_trimmer_dims_enabled_zone() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        let changes = dispatcher
            .handle_trimmer(device(1), 300, &mut actuator)
            .unwrap();

        assert_eq!(changes[0].duty, 69);
        assert_eq!(actuator.commands[1], Command::Pwm(LED_2, 69, 500));
        assert_eq!(
            dispatcher.zone_state(LED_2),
            Some(ZoneState {
                enabled: true,
                target_duty: 69
            })
        );

        // Switching off and on again restores the dimmed level
        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands[3], Command::Pwm(LED_2, 69, 500));
    }

    #[test]
    fn test_trimmer_to_zero_switches_off_and_restores_default() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        dispatcher.handle_trimmer(device(1), 1, &mut actuator).unwrap();

        assert_eq!(actuator.commands[1], Command::Pwm(LED_2, 0, 500));
        assert_eq!(
            dispatcher.zone_state(LED_2),
            Some(ZoneState {
                enabled: false,
                target_duty: 223
            })
        );

        dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands[2], Command::Pwm(LED_2, 223, 500));
    }

    #[test]
    fn test_report_routing() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        let report = TerminalReport::new(1023, pressed(ButtonId::One));
        dispatcher
            .handle_report(device(1), &report, &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands, [Command::Pwm(LED_2, 223, 500)]);

        let report = TerminalReport::new(1023, ButtonStates::new());
        dispatcher
            .handle_report(device(1), &report, &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands[1], Command::Pwm(LED_2, 1023, 500));
    }

    #[test]
    fn test_unmapped_input_is_ignored() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        let changes = dispatcher
            .handle_buttons(device(2), pressed(ButtonId::Three), &mut actuator)
            .unwrap();
        assert!(changes.is_empty());
        let changes = dispatcher.handle_trimmer(device(2), 800, &mut actuator).unwrap();
        assert!(changes.is_empty());
        assert!(actuator.commands.is_empty());
    }

    #[test]
    fn test_unknown_device() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator::default();

        assert_eq!(
            dispatcher.handle_buttons(device(13), pressed(ButtonId::One), &mut actuator),
            Err(DispatchError::UnknownDevice(device(13)))
        );
        assert!(actuator.commands.is_empty());
    }

    #[test]
    fn test_queue_full_keeps_intended_state() {
        let mut dispatcher = dispatcher();
        let mut actuator = MockActuator {
            queue_full: true,
            ..Default::default()
        };

        let changes = dispatcher
            .handle_buttons(device(1), pressed(ButtonId::One), &mut actuator)
            .unwrap();
        assert_eq!(changes[0].result, Err(ActuationError::QueueFull));
        assert!(dispatcher.zone_state(LED_2).unwrap().enabled);
    }

    #[test]
    fn test_pair_binding_toggles_both_zones() {
        let zones = default_zone_table();
        let mut builder = KeymapBuilder::new(1).unwrap();
        builder
            .bind_button(0, ButtonId::Two, ButtonState::Held, ZonePair::pair(LED_3, RELAY_1))
            .unwrap();
        let keymap = builder.build(&zones).unwrap();
        let mut dispatcher = ZoneDispatcher::new(zones, keymap, DimmingConfig::default());
        let mut actuator = MockActuator::default();

        let mut states = ButtonStates::new();
        states.set(ButtonId::Two, ButtonState::Held);
        dispatcher.handle_buttons(device(0), states, &mut actuator).unwrap();
        assert_eq!(
            actuator.commands,
            [Command::Pwm(LED_3, 223, 500), Command::Gpio(RELAY_1, true)]
        );

        // Pressed is not bound
        dispatcher
            .handle_buttons(device(0), pressed(ButtonId::Two), &mut actuator)
            .unwrap();
        assert_eq!(actuator.commands.len(), 2);
    }
}
