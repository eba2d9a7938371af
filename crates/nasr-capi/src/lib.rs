//! C ABI for Nasringine
//!
//! The host owns an opaque `NasrEngine*` from `nasr_engine_create` and frees
//! it with `nasr_engine_destroy`. Strings are NUL-terminated UTF-8. Strings
//! returned by the translate functions stay valid until the next translate
//! call or successful language change on the same engine.
//!
//! Drawing goes to a window the engine opens itself (`nasr_window_open`);
//! the host calls `nasr_poll_events` once per frame to keep it responsive
//! and to feed keyboard events into the input map.

use nasr_core::{Color, NasrError, Rect};
use nasr_engine::{Engine, EngineConfig};
use nasr_input::{Binding, KeyAction};
use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

/// Opaque engine handle
pub struct NasrEngine {
    engine: Engine,
    translation: CString,
}

impl NasrEngine {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            translation: CString::default(),
        }
    }

    /// Stash `text` and hand out a pointer to it, or echo `fallback` if it
    /// cannot be represented as a C string.
    fn hold(&mut self, text: String, fallback: *const c_char) -> *const c_char {
        match CString::new(text) {
            Ok(s) => {
                self.translation = s;
                self.translation.as_ptr()
            }
            Err(_) => fallback,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NasrBinding {
    pub input: u32,
    pub key: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NasrStatus {
    Ok = 0,
    InvalidKeyCode = 1,
    InvalidLogicalId = 2,
    MalformedResource = 3,
    ResourceUnreadable = 4,
    InvalidArgument = 5,
    AudioError = 6,
    RenderError = 7,
}

impl From<&NasrError> for NasrStatus {
    fn from(err: &NasrError) -> Self {
        match err {
            NasrError::InvalidKeyCode { .. } => NasrStatus::InvalidKeyCode,
            NasrError::InvalidLogicalId { .. } | NasrError::InputIdOutOfRange { .. } => {
                NasrStatus::InvalidLogicalId
            }
            NasrError::MalformedResource { .. } => NasrStatus::MalformedResource,
            NasrError::ResourceUnreadable { .. } | NasrError::Io(_) => {
                NasrStatus::ResourceUnreadable
            }
            NasrError::AudioError(_) => NasrStatus::AudioError,
            NasrError::RenderError(_) => NasrStatus::RenderError,
            NasrError::ConfigError(_) => NasrStatus::InvalidArgument,
        }
    }
}

fn status_of(result: nasr_core::Result<()>) -> NasrStatus {
    match result {
        Ok(()) => NasrStatus::Ok,
        Err(e) => {
            log::warn!("{e}");
            NasrStatus::from(&e)
        }
    }
}

/// Borrow a C string as UTF-8, `None` for null or invalid input
unsafe fn borrow_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

// --- Lifetime ---

/// Create an engine with no bindings and no language loaded.
#[no_mangle]
pub extern "C" fn nasr_engine_create() -> *mut NasrEngine {
    match Engine::new(EngineConfig::default()) {
        Ok(engine) => Box::into_raw(Box::new(NasrEngine::new(engine))),
        Err(e) => {
            log::error!("Engine creation failed: {e}");
            ptr::null_mut()
        }
    }
}

/// Create an engine from a TOML config file. Returns null on failure.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn nasr_engine_create_from_config(path: *const c_char) -> *mut NasrEngine {
    let Some(path) = borrow_str(path) else {
        return ptr::null_mut();
    };
    match Engine::from_config_file(path) {
        Ok(engine) => Box::into_raw(Box::new(NasrEngine::new(engine))),
        Err(e) => {
            log::error!("Engine creation from '{path}' failed: {e}");
            ptr::null_mut()
        }
    }
}

/// # Safety
/// `engine` must be null or a handle from `nasr_engine_create*` that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn nasr_engine_destroy(engine: *mut NasrEngine) {
    if !engine.is_null() {
        let mut engine = Box::from_raw(engine);
        engine.engine.close();
    }
}

// --- Input ---

/// Replace all bindings. On error the engine is left with no bindings.
///
/// # Safety
/// `engine` must be a live handle; `bindings` must point to `len` entries
/// (it may be null when `len` is 0).
#[no_mangle]
pub unsafe extern "C" fn nasr_register_inputs(
    engine: *mut NasrEngine,
    bindings: *const NasrBinding,
    len: usize,
) -> NasrStatus {
    let Some(engine) = engine.as_mut() else {
        return NasrStatus::InvalidArgument;
    };
    let raw: &[NasrBinding] = if len == 0 {
        &[]
    } else if bindings.is_null() {
        return NasrStatus::InvalidArgument;
    } else {
        std::slice::from_raw_parts(bindings, len)
    };

    let bindings: Vec<Binding> = raw
        .iter()
        .map(|b| Binding::from_raw(b.input, b.key))
        .collect();
    status_of(engine.engine.register_inputs(&bindings))
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_held(engine: *const NasrEngine, input: u32) -> bool {
    engine.as_ref().is_some_and(|e| e.engine.held(input))
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_pressed(engine: *const NasrEngine, input: u32) -> bool {
    engine.as_ref().is_some_and(|e| e.engine.pressed(input))
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_input_update(engine: *mut NasrEngine) {
    if let Some(engine) = engine.as_mut() {
        engine.engine.input_update();
    }
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_input_close(engine: *mut NasrEngine) {
    if let Some(engine) = engine.as_mut() {
        engine.engine.input.close();
    }
}

/// Forward a key edge from the host's event loop. `action` is 0 for press
/// and 1 for release. Unknown key codes are ignored.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_key_event(
    engine: *mut NasrEngine,
    key: u32,
    action: u32,
) -> NasrStatus {
    let Some(engine) = engine.as_mut() else {
        return NasrStatus::InvalidArgument;
    };
    let action = match action {
        0 => KeyAction::Press,
        1 => KeyAction::Release,
        _ => return NasrStatus::InvalidArgument,
    };
    engine.engine.input.on_raw_key_event(key, action);
    NasrStatus::Ok
}

// --- Localization ---
//
// Every translate function takes a `domain` string, which may be null. It is
// accepted for compatibility and does not affect the lookup.

/// Load a JSON translation resource. On failure the previous language stays
/// active and previously returned translations stay valid.
///
/// # Safety
/// `engine` must be null or a live handle; `path` null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn nasr_set_language(
    engine: *mut NasrEngine,
    path: *const c_char,
) -> NasrStatus {
    let Some(engine) = engine.as_mut() else {
        return NasrStatus::InvalidArgument;
    };
    let Some(path) = borrow_str(path) else {
        return NasrStatus::InvalidArgument;
    };
    let result = engine.engine.set_language(Path::new(path));
    if result.is_ok() {
        engine.translation = CString::default();
    }
    status_of(result)
}

/// Translate `s`, echoing it back when no translation exists.
///
/// # Safety
/// `engine` must be null or a live handle; `s` and `domain` null or valid C
/// strings.
#[no_mangle]
pub unsafe extern "C" fn nasr_translate(
    engine: *mut NasrEngine,
    s: *const c_char,
    domain: *const c_char,
) -> *const c_char {
    nasr_translate_with_context(engine, s, ptr::null(), domain)
}

/// Translate `s` under `context` (null means the default context).
///
/// # Safety
/// `engine` must be null or a live handle; `s`, `context` and `domain` null
/// or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn nasr_translate_with_context(
    engine: *mut NasrEngine,
    s: *const c_char,
    context: *const c_char,
    domain: *const c_char,
) -> *const c_char {
    let (Some(engine), Some(text)) = (engine.as_mut(), borrow_str(s)) else {
        return s;
    };
    let context = borrow_str(context).unwrap_or("");
    let translated = engine
        .engine
        .translate_with_context(text, context, borrow_str(domain))
        .to_owned();
    engine.hold(translated, s)
}

/// Pick the singular or plural form of `singular` for `count`.
///
/// # Safety
/// `engine` must be null or a live handle; `singular`, `plural` and `domain`
/// null or valid C strings.
#[no_mangle]
pub unsafe extern "C" fn nasr_translate_plural(
    engine: *mut NasrEngine,
    singular: *const c_char,
    plural: *const c_char,
    count: u64,
    domain: *const c_char,
) -> *const c_char {
    let echo = if count == 1 { singular } else { plural };
    let (Some(engine), Some(one), Some(many)) =
        (engine.as_mut(), borrow_str(singular), borrow_str(plural))
    else {
        return echo;
    };
    let translated = engine
        .engine
        .translate_plural(one, many, count, borrow_str(domain))
        .to_owned();
    engine.hold(translated, echo)
}

// --- Window and drawing ---

/// Open the engine's window using the `[window]` config. Opening twice is a
/// no-op.
///
/// # Safety
/// `engine` must be null or a live handle. Call from the main thread.
#[no_mangle]
pub unsafe extern "C" fn nasr_window_open(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.open_window()),
        None => NasrStatus::InvalidArgument,
    }
}

/// Pump window events into the input map. Returns false when no window is
/// open or the user closed it.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_poll_events(engine: *mut NasrEngine) -> bool {
    engine.as_mut().is_some_and(|e| e.engine.poll_events())
}

/// Set the color the next frame is cleared to (sRGB components, 0 to 1).
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_clear_color(engine: *mut NasrEngine, r: f32, g: f32, b: f32, a: f32) {
    if let Some(engine) = engine.as_mut() {
        engine.engine.clear_color(Color::new(r, g, b, a));
    }
}

/// Queue a rectangle in pixels from the top-left corner. Rectangles with a
/// zero or negative size are ignored.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn nasr_draw_rect(
    engine: *mut NasrEngine,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    r: f32,
    g: f32,
    b: f32,
    a: f32,
) {
    if let Some(engine) = engine.as_mut() {
        engine
            .engine
            .draw_rect(Rect::new(x, y, width, height), Color::new(r, g, b, a));
    }
}

/// Rectangles queued for the next `nasr_present`.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_rect_count(engine: *const NasrEngine) -> usize {
    engine.as_ref().map_or(0, |e| e.engine.rect_count())
}

/// Draw the queued rectangles and start a new frame. Returns `RenderError`
/// (and drops the queue) when no window is open.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_present(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.present()),
        None => NasrStatus::InvalidArgument,
    }
}

// --- Audio ---

/// Open the audio stream. Without an audio device the stream stays silent
/// and the other audio calls still succeed.
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_audio_open(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => {
            engine.engine.open_audio();
            NasrStatus::Ok
        }
        None => NasrStatus::InvalidArgument,
    }
}

/// Stream a sound file, replacing the current one.
///
/// # Safety
/// `engine` must be null or a live handle; `path` null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn nasr_play_music(
    engine: *mut NasrEngine,
    path: *const c_char,
    looping: bool,
) -> NasrStatus {
    let (Some(engine), Some(path)) = (engine.as_mut(), borrow_str(path)) else {
        return NasrStatus::InvalidArgument;
    };
    status_of(engine.engine.play_music(path, looping))
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_pause_music(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.pause_music()),
        None => NasrStatus::InvalidArgument,
    }
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_resume_music(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.resume_music()),
        None => NasrStatus::InvalidArgument,
    }
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_stop_music(engine: *mut NasrEngine) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.stop_music()),
        None => NasrStatus::InvalidArgument,
    }
}

/// Set the stream volume as linear amplitude (1.0 = unchanged).
///
/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_set_volume(engine: *mut NasrEngine, amplitude: f64) -> NasrStatus {
    match engine.as_mut() {
        Some(engine) => status_of(engine.engine.set_volume(amplitude)),
        None => NasrStatus::InvalidArgument,
    }
}

/// # Safety
/// `engine` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn nasr_is_music_playing(engine: *const NasrEngine) -> bool {
    engine.as_ref().is_some_and(|e| e.engine.is_music_playing())
}

// --- Logging ---

/// Install the logger at `level` ("error", "warn", "info", "debug",
/// "trace"; null means "info"). Returns false if a logger already exists.
///
/// # Safety
/// `level` must be null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn nasr_init_logging(level: *const c_char) -> bool {
    nasr_engine::init_logging(borrow_str(level).unwrap_or("info"))
}
