//! Input map engine
//!
//! Compiles an ordered list of [`Binding`]s into flat lookup tables:
//!
//! - `key_inputs`: for every key in the key space, the inputs it triggers
//! - `input_keys`: for every input, the keys bound to it
//! - `held` / `pressed`: per-input, per-binding-slot flags followed by the
//!   per-input aggregates, each in one contiguous block
//!
//! Pressing a key sets the aggregate of every input it triggers directly.
//! Releasing a key clears only the matching slots and recomputes the
//! aggregate from the remaining slots, so an input stays held while any
//! other bound key is down.

use crate::binding::{Binding, InputId, KeyAction};
use crate::key::{Key, KEY_COUNT};
use nasr_core::{NasrError, Result};

/// Upper bound on logical input ids (exclusive). The tables are dense in the
/// highest id, so ids are bounded to keep registration allocations small.
pub const MAX_INPUTS: usize = 1 << 16;

/// Fixed-width rows of `u32` values with a fill count per row
#[derive(Debug, Default, Clone)]
struct RowTable {
    width: usize,
    values: Vec<u32>,
    counts: Vec<usize>,
}

impl RowTable {
    fn new(rows: usize, width: usize) -> Self {
        Self {
            width,
            values: vec![0; rows * width],
            counts: vec![0; rows],
        }
    }

    fn push(&mut self, row: usize, value: u32) {
        let len = self.counts[row];
        self.values[row * self.width + len] = value;
        self.counts[row] = len + 1;
    }

    fn row(&self, row: usize) -> &[u32] {
        let start = row * self.width;
        &self.values[start..start + self.counts[row]]
    }
}

/// Per-slot flags for every input followed by one aggregate flag per input
#[derive(Debug, Default, Clone)]
struct FlagBlock {
    slots_per_input: usize,
    aggregate_start: usize,
    flags: Vec<bool>,
}

impl FlagBlock {
    fn new(inputs: usize, slots_per_input: usize) -> Self {
        let aggregate_start = inputs * slots_per_input;
        Self {
            slots_per_input,
            aggregate_start,
            flags: vec![false; aggregate_start + inputs],
        }
    }

    fn slots(&self, input: usize) -> &[bool] {
        let start = input * self.slots_per_input;
        &self.flags[start..start + self.slots_per_input]
    }

    fn slots_mut(&mut self, input: usize) -> &mut [bool] {
        let start = input * self.slots_per_input;
        &mut self.flags[start..start + self.slots_per_input]
    }

    fn get(&self, input: usize) -> bool {
        self.flags[self.aggregate_start + input]
    }

    fn set(&mut self, input: usize, value: bool) {
        self.flags[self.aggregate_start + input] = value;
    }

    fn recompute(&mut self, input: usize) {
        let any = self.slots(input).iter().any(|&f| f);
        self.set(input, any);
    }

    fn clear(&mut self) {
        self.flags.fill(false);
    }
}

/// Many-to-many key/input association with O(1) held and pressed queries
#[derive(Debug, Default, Clone)]
pub struct InputMap {
    input_count: usize,
    key_inputs: RowTable,
    input_keys: RowTable,
    held: FlagBlock,
    pressed: FlagBlock,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every registered binding.
    ///
    /// Previous tables and key state are discarded. On an out-of-range key
    /// code or input id the map is left empty and the offending binding is
    /// reported.
    pub fn register_inputs(&mut self, bindings: &[Binding]) -> Result<()> {
        self.close();

        if let Some((index, binding)) = bindings
            .iter()
            .enumerate()
            .find(|(_, b)| b.key as usize >= KEY_COUNT)
        {
            return Err(NasrError::InvalidKeyCode {
                index,
                code: binding.key,
            });
        }
        if let Some((index, binding)) = bindings
            .iter()
            .enumerate()
            .find(|(_, b)| b.input as usize >= MAX_INPUTS)
        {
            return Err(NasrError::InputIdOutOfRange {
                index,
                id: binding.input,
                limit: MAX_INPUTS,
            });
        }

        let input_count = bindings
            .iter()
            .map(|b| b.input as usize + 1)
            .max()
            .unwrap_or(0);

        let mut per_key = vec![0usize; KEY_COUNT];
        let mut per_input = vec![0usize; input_count];
        for binding in bindings {
            per_key[binding.key as usize] += 1;
            per_input[binding.input as usize] += 1;
        }
        let inputs_per_key = per_key.iter().copied().max().unwrap_or(0);
        let keys_per_input = per_input.iter().copied().max().unwrap_or(0);

        let mut key_inputs = RowTable::new(KEY_COUNT, inputs_per_key);
        let mut input_keys = RowTable::new(input_count, keys_per_input);
        for binding in bindings {
            key_inputs.push(binding.key as usize, binding.input);
            input_keys.push(binding.input as usize, binding.key);
        }

        *self = Self {
            input_count,
            key_inputs,
            input_keys,
            held: FlagBlock::new(input_count, keys_per_input),
            pressed: FlagBlock::new(input_count, keys_per_input),
        };

        log::debug!(
            "registered {} bindings: {} inputs, up to {} keys per input, up to {} inputs per key",
            bindings.len(),
            input_count,
            keys_per_input,
            inputs_per_key
        );
        Ok(())
    }

    /// Apply a physical key edge to every input bound to `key`
    pub fn on_key_event(&mut self, key: Key, action: KeyAction) {
        if !self.is_registered() {
            return;
        }
        let code = key.index();
        for &input in self.key_inputs.row(code as usize) {
            let input = input as usize;
            let bound = self.input_keys.row(input);
            match action {
                KeyAction::Press => {
                    self.held.set(input, true);
                    self.pressed.set(input, true);
                    for (slot, &k) in bound.iter().enumerate() {
                        if k == code {
                            self.held.slots_mut(input)[slot] = true;
                            self.pressed.slots_mut(input)[slot] = true;
                        }
                    }
                }
                KeyAction::Release => {
                    for (slot, &k) in bound.iter().enumerate() {
                        if k == code {
                            self.held.slots_mut(input)[slot] = false;
                            self.pressed.slots_mut(input)[slot] = false;
                        }
                    }
                    self.held.recompute(input);
                    self.pressed.recompute(input);
                }
            }
        }
    }

    /// Like [`InputMap::on_key_event`] for an unchecked key index; codes
    /// outside the key space are ignored.
    pub fn on_raw_key_event(&mut self, code: u32, action: KeyAction) {
        match Key::from_index(code) {
            Some(key) => self.on_key_event(key, action),
            None => log::debug!("ignoring event for unknown key code {}", code),
        }
    }

    /// Is any key bound to `input` currently down?
    pub fn held(&self, input: InputId) -> bool {
        self.try_held(input).unwrap_or_else(|e| {
            log::warn!("{}", e);
            false
        })
    }

    /// Was any key bound to `input` pressed since the last `input_update`?
    pub fn pressed(&self, input: InputId) -> bool {
        self.try_pressed(input).unwrap_or_else(|e| {
            log::warn!("{}", e);
            false
        })
    }

    pub fn try_held(&self, input: InputId) -> Result<bool> {
        let index = self.check_input(input)?;
        Ok(self.held.get(index))
    }

    pub fn try_pressed(&self, input: InputId) -> Result<bool> {
        let index = self.check_input(input)?;
        Ok(self.pressed.get(index))
    }

    /// Frame boundary: forget this frame's presses. Held state is kept.
    pub fn input_update(&mut self) {
        self.pressed.clear();
    }

    /// Drop every held and pressed key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Release all tables and return to the unregistered state
    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// One past the highest registered input id
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn is_registered(&self) -> bool {
        self.input_count > 0
    }

    /// Key codes bound to `input`, in registration order
    pub fn keys_for(&self, input: InputId) -> &[u32] {
        match self.check_input(input) {
            Ok(index) => self.input_keys.row(index),
            Err(_) => &[],
        }
    }

    /// Inputs triggered by `key`, in registration order
    pub fn inputs_for(&self, key: Key) -> &[InputId] {
        if self.input_count == 0 {
            return &[];
        }
        self.key_inputs.row(key.index() as usize)
    }

    fn check_input(&self, input: InputId) -> Result<usize> {
        let index = input as usize;
        if index >= self.input_count {
            return Err(NasrError::InvalidLogicalId {
                id: input,
                count: self.input_count,
            });
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE_RIGHT: InputId = 0;
    const JUMP: InputId = 1;
    const FIRE: InputId = 5;

    fn press(map: &mut InputMap, key: Key) {
        map.on_key_event(key, KeyAction::Press);
    }

    fn release(map: &mut InputMap, key: Key) {
        map.on_key_event(key, KeyAction::Release);
    }

    fn sample_map() -> InputMap {
        let mut map = InputMap::new();
        map.register_inputs(&[
            Binding::new(MOVE_RIGHT, Key::KeyD),
            Binding::new(MOVE_RIGHT, Key::ArrowRight),
            Binding::new(JUMP, Key::Space),
            Binding::new(FIRE, Key::KeyA),
            Binding::new(FIRE, Key::KeyB),
            Binding::new(JUMP, Key::KeyA),
        ])
        .unwrap();
        map
    }

    #[test]
    fn test_register_computes_dimensions() {
        let map = sample_map();
        assert_eq!(map.input_count(), 6);
        assert!(map.is_registered());
        assert_eq!(
            map.keys_for(MOVE_RIGHT),
            &[Key::KeyD.index(), Key::ArrowRight.index()]
        );
        assert_eq!(map.inputs_for(Key::KeyA), &[FIRE, JUMP]);
        assert!(map.inputs_for(Key::KeyZ).is_empty());
        // Ids without bindings are valid but never held
        assert!(!map.try_held(3).unwrap());
    }

    #[test]
    fn test_press_and_frame_clear() {
        let mut map = sample_map();
        press(&mut map, Key::Space);
        assert!(map.held(JUMP));
        assert!(map.pressed(JUMP));

        map.input_update();
        assert!(map.held(JUMP));
        assert!(!map.pressed(JUMP));

        release(&mut map, Key::Space);
        assert!(!map.held(JUMP));
    }

    #[test]
    fn test_release_does_not_over_clear() {
        let mut map = sample_map();
        press(&mut map, Key::KeyA);
        press(&mut map, Key::KeyB);
        release(&mut map, Key::KeyA);
        assert!(map.held(FIRE));
        assert!(map.pressed(FIRE));

        release(&mut map, Key::KeyB);
        assert!(!map.held(FIRE));
        assert!(!map.pressed(FIRE));
    }

    #[test]
    fn test_one_key_triggers_several_inputs() {
        let mut map = sample_map();
        press(&mut map, Key::KeyA);
        assert!(map.held(FIRE));
        assert!(map.held(JUMP));

        press(&mut map, Key::Space);
        release(&mut map, Key::KeyA);
        assert!(!map.held(FIRE));
        assert!(map.held(JUMP));
    }

    #[test]
    fn test_input_update_twice_is_idempotent() {
        let mut map = sample_map();
        press(&mut map, Key::KeyD);
        map.input_update();
        map.input_update();
        for id in 0..map.input_count() as u32 {
            assert!(!map.pressed(id));
        }
        assert!(map.held(MOVE_RIGHT));
        assert!(!map.held(JUMP));
    }

    #[test]
    fn test_pressed_survives_until_frame_end_after_release_of_other_key() {
        let mut map = sample_map();
        press(&mut map, Key::KeyD);
        map.input_update();
        press(&mut map, Key::ArrowRight);
        release(&mut map, Key::KeyD);
        // ArrowRight was pressed this frame and is still down
        assert!(map.pressed(MOVE_RIGHT));
        assert!(map.held(MOVE_RIGHT));
    }

    #[test]
    fn test_reregistration_discards_state() {
        let mut map = sample_map();
        press(&mut map, Key::KeyA);
        assert!(map.held(FIRE));

        map.register_inputs(&[Binding::new(0, Key::KeyQ), Binding::new(1, Key::KeyA)])
            .unwrap();
        assert_eq!(map.input_count(), 2);
        assert!(matches!(
            map.try_held(FIRE),
            Err(NasrError::InvalidLogicalId { id: 5, count: 2 })
        ));
        assert!(!map.held(FIRE));
        assert!(!map.pressed(FIRE));
        // Fresh tables: the key held before registration is not remembered
        assert!(!map.held(1));
    }

    #[test]
    fn test_invalid_key_code_leaves_map_empty() {
        let mut map = sample_map();
        let err = map
            .register_inputs(&[
                Binding::new(0, Key::KeyW),
                Binding::from_raw(1, KEY_COUNT as u32 + 7),
            ])
            .unwrap_err();
        match err {
            NasrError::InvalidKeyCode { index, code } => {
                assert_eq!(index, 1);
                assert_eq!(code, KEY_COUNT as u32 + 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(map.input_count(), 0);
        press(&mut map, Key::KeyW);
        assert!(!map.held(0));
        assert!(map.try_pressed(0).is_err());
    }

    #[test]
    fn test_huge_input_id_is_rejected() {
        let mut map = sample_map();
        let err = map
            .register_inputs(&[
                Binding::new(0, Key::KeyW),
                Binding::new(u32::MAX, Key::KeyA),
            ])
            .unwrap_err();
        match err {
            NasrError::InputIdOutOfRange { index, id, limit } => {
                assert_eq!(index, 1);
                assert_eq!(id, u32::MAX);
                assert_eq!(limit, MAX_INPUTS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!map.is_registered());
        press(&mut map, Key::KeyW);
        assert!(!map.held(0));

        // The largest allowed id still registers
        let top = (MAX_INPUTS - 1) as u32;
        map.register_inputs(&[Binding::new(top, Key::KeyA)]).unwrap();
        assert_eq!(map.input_count(), MAX_INPUTS);
        press(&mut map, Key::KeyA);
        assert!(map.held(top));
    }

    #[test]
    fn test_duplicate_binding_is_tolerated() {
        let mut map = InputMap::new();
        map.register_inputs(&[Binding::new(2, Key::KeyE), Binding::new(2, Key::KeyE)])
            .unwrap();
        press(&mut map, Key::KeyE);
        assert!(map.held(2));
        release(&mut map, Key::KeyE);
        assert!(!map.held(2));
    }

    #[test]
    fn test_empty_registration() {
        let mut map = InputMap::new();
        map.register_inputs(&[]).unwrap();
        assert_eq!(map.input_count(), 0);
        press(&mut map, Key::Space);
        assert!(!map.held(0));
    }

    #[test]
    fn test_raw_events_and_release_all() {
        let mut map = sample_map();
        map.on_raw_key_event(Key::KeyD.index(), KeyAction::Press);
        map.on_raw_key_event(10_000, KeyAction::Press);
        assert!(map.held(MOVE_RIGHT));

        map.release_all();
        assert!(!map.held(MOVE_RIGHT));
        assert!(!map.pressed(MOVE_RIGHT));
    }

    #[test]
    fn test_close_returns_to_empty() {
        let mut map = sample_map();
        press(&mut map, Key::Space);
        map.close();
        assert!(!map.is_registered());
        assert!(map.try_held(JUMP).is_err());
        assert!(map.keys_for(JUMP).is_empty());
    }

    /// Drives random press/release sequences and checks the aggregates
    /// against a direct model of which keys are down / were pressed.
    #[test]
    fn test_aggregates_match_key_model() {
        let keys = [Key::KeyA, Key::KeyB, Key::KeyD, Key::Space, Key::ArrowRight];
        let bindings = [
            Binding::new(0, Key::KeyA),
            Binding::new(0, Key::KeyB),
            Binding::new(1, Key::KeyB),
            Binding::new(1, Key::KeyD),
            Binding::new(1, Key::Space),
            Binding::new(2, Key::Space),
            Binding::new(3, Key::ArrowRight),
            Binding::new(3, Key::KeyA),
        ];
        let mut map = InputMap::new();
        map.register_inputs(&bindings).unwrap();

        let mut down = [false; 5];
        let mut pressed_since = [false; 5];
        let mut seed: u32 = 0x2545_f491;

        for step in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let which = (seed >> 16) as usize % keys.len();
            let roll = (seed >> 8) & 0xff;

            if roll < 16 {
                map.input_update();
                pressed_since = [false; 5];
            } else if down[which] {
                map.on_key_event(keys[which], KeyAction::Release);
                down[which] = false;
                pressed_since[which] = false;
            } else {
                map.on_key_event(keys[which], KeyAction::Press);
                down[which] = true;
                pressed_since[which] = true;
            }

            for id in 0..4u32 {
                let bound: Vec<usize> = bindings
                    .iter()
                    .filter(|b| b.input == id)
                    .map(|b| keys.iter().position(|k| k.index() == b.key).unwrap())
                    .collect();
                let expect_held = bound.iter().any(|&k| down[k]);
                let expect_pressed = bound.iter().any(|&k| pressed_since[k]);
                assert_eq!(map.held(id), expect_held, "held({id}) at step {step}");
                assert_eq!(map.pressed(id), expect_pressed, "pressed({id}) at step {step}");
            }
        }
    }
}
