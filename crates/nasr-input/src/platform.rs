//! Bridge from winit window events to an [`InputMap`]

use crate::binding::KeyAction;
use crate::key::Key;
use crate::map::InputMap;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Feed a window event to the map. Returns true if the event was consumed.
///
/// Key repeats are swallowed without touching the map. Losing focus
/// releases every key, since the matching release events never arrive.
pub fn handle_window_event(map: &mut InputMap, event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            process_physical_key(map, event.physical_key, event.state, event.repeat)
        }
        WindowEvent::Focused(false) => {
            map.release_all();
            true
        }
        _ => false,
    }
}

/// Apply one physical key edge
pub fn process_physical_key(
    map: &mut InputMap,
    physical_key: PhysicalKey,
    state: ElementState,
    repeat: bool,
) -> bool {
    if repeat {
        return true;
    }

    let PhysicalKey::Code(code) = physical_key else {
        return false;
    };
    let Some(key) = Key::from_winit(code) else {
        log::debug!("no key mapping for {:?}", code);
        return false;
    };

    let action = match state {
        ElementState::Pressed => KeyAction::Press,
        ElementState::Released => KeyAction::Release,
    };
    map.on_key_event(key, action);
    true
}
