//! The engine facade a host drives each frame

use crate::config::EngineConfig;
use crate::logging::init_logging;
use crate::window::WindowHost;
use nasr_audio::AudioStream;
use nasr_core::{Color, NasrError, Rect, Result};
use nasr_input::{Binding, InputId, InputMap, Key, KeyAction};
use nasr_locale::Localizer;
use nasr_render::RectBatch;
use std::path::Path;
use winit::event::WindowEvent;

/// Owns the input map, the active translation table, and optionally an
/// audio stream and a window to draw in
pub struct Engine {
    pub input: InputMap,
    pub locale: Localizer,
    pub audio: Option<AudioStream>,
    frame: RectBatch,
    clear: Color,
    window: Option<WindowHost>,
    config: EngineConfig,
}

impl Engine {
    /// Build an engine from config: installs the logger at the configured
    /// level, registers the configured bindings and loads the configured
    /// language.
    pub fn new(config: EngineConfig) -> Result<Self> {
        init_logging(&config.log_level);

        let mut input = InputMap::new();
        let bindings = config.to_bindings()?;
        if !bindings.is_empty() {
            input.register_inputs(&bindings)?;
        }

        let mut locale = Localizer::new();
        if let Some(path) = &config.language {
            locale.set_language(path)?;
        }

        log::info!(
            "Engine ready: {} logical inputs, language {}",
            input.input_count(),
            config
                .language
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );

        Ok(Self {
            input,
            locale,
            audio: None,
            frame: RectBatch::new(),
            clear: Color::BLACK,
            window: None,
            config,
        })
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(EngineConfig::load(path)?)
    }

    /// Open the audio stream at the configured volume
    pub fn with_audio(mut self) -> Self {
        self.open_audio();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Input ---

    pub fn register_inputs(&mut self, bindings: &[Binding]) -> Result<()> {
        self.input.register_inputs(bindings)
    }

    pub fn held(&self, input: InputId) -> bool {
        self.input.held(input)
    }

    pub fn pressed(&self, input: InputId) -> bool {
        self.input.pressed(input)
    }

    pub fn input_update(&mut self) {
        self.input.input_update();
    }

    pub fn key_event(&mut self, key: Key, action: KeyAction) {
        self.input.on_key_event(key, action);
    }

    /// Feed a winit window event; returns true if it was consumed as input
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        nasr_input::handle_window_event(&mut self.input, event)
    }

    /// Drop all bindings, stop any playback and close the window
    pub fn close(&mut self) {
        self.input.close();
        if let Some(audio) = &mut self.audio {
            audio.stop();
        }
        self.window = None;
        self.frame.clear();
    }

    // --- Localization ---
    //
    // `domain` is accepted and ignored: there is one table per language.

    pub fn set_language<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.locale.set_language(path)
    }

    pub fn translate<'a>(&'a self, s: &'a str, domain: Option<&str>) -> &'a str {
        self.locale.translate(s, domain)
    }

    pub fn translate_with_context<'a>(
        &'a self,
        s: &'a str,
        context: &str,
        domain: Option<&str>,
    ) -> &'a str {
        self.locale.translate_with_context(s, context, domain)
    }

    pub fn translate_plural<'a>(
        &'a self,
        singular: &'a str,
        plural: &'a str,
        count: u64,
        domain: Option<&str>,
    ) -> &'a str {
        self.locale.translate_plural(singular, plural, count, domain)
    }

    // --- Window and drawing ---

    /// Create the engine's own window from `[window]` config. Hosts that run
    /// a winit loop themselves use `nasr_render` directly instead.
    pub fn open_window(&mut self) -> Result<()> {
        if self.window.is_none() {
            self.window = Some(WindowHost::open(&mut self.input, &self.config.window)?);
        }
        Ok(())
    }

    pub fn is_window_open(&self) -> bool {
        self.window.is_some()
    }

    /// Pump window events into the input map. Returns false when there is
    /// no window or it was closed; a closed window is dropped.
    pub fn poll_events(&mut self) -> bool {
        let Some(window) = &mut self.window else {
            return false;
        };
        let open = window.pump(&mut self.input, &self.config.window);
        if !open {
            log::info!("Window closed");
            self.window = None;
            self.input.release_all();
        }
        open
    }

    pub fn clear_color(&mut self, color: Color) {
        self.clear = color;
    }

    /// Queue a rectangle for the next `present`; empty rectangles are dropped
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.frame.push(rect, color);
    }

    pub fn rect_count(&self) -> usize {
        self.frame.len()
    }

    /// Draw the queued rectangles and start a new frame. Without a window the
    /// queue is discarded and a `RenderError` returned.
    pub fn present(&mut self) -> Result<()> {
        match &mut self.window {
            Some(window) => window.present(&mut self.frame, self.clear),
            None => {
                self.frame.clear();
                Err(NasrError::RenderError("no window open".into()))
            }
        }
    }

    // --- Audio ---

    /// Open the audio stream at the configured volume if not already open
    pub fn open_audio(&mut self) {
        if self.audio.is_none() {
            let mut audio = AudioStream::new();
            audio.set_volume(self.config.audio.volume);
            self.audio = Some(audio);
        }
    }

    pub fn play_music<P: AsRef<Path>>(&mut self, path: P, looping: bool) -> Result<()> {
        self.audio_mut()?.play(path.as_ref(), looping)
    }

    pub fn pause_music(&mut self) -> Result<()> {
        self.audio_mut()?.pause();
        Ok(())
    }

    pub fn resume_music(&mut self) -> Result<()> {
        self.audio_mut()?.resume();
        Ok(())
    }

    pub fn stop_music(&mut self) -> Result<()> {
        self.audio_mut()?.stop();
        Ok(())
    }

    /// Linear amplitude; 1.0 plays the stream unchanged
    pub fn set_volume(&mut self, amplitude: f64) -> Result<()> {
        self.audio_mut()?.set_volume(amplitude);
        Ok(())
    }

    pub fn is_music_playing(&self) -> bool {
        self.audio.as_ref().is_some_and(AudioStream::is_playing)
    }

    fn audio_mut(&mut self) -> Result<&mut AudioStream> {
        self.audio
            .as_mut()
            .ok_or_else(|| NasrError::AudioError("audio stream not opened".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nasr_input::BindingConfig;
    use std::fs;

    const SPANISH: &str = r#"{"localization": [
        {"original": "Hello", "translation": "Hola"},
        {"original": "apple", "translation": "manzana", "translationPlural": "manzanas"},
        {"original": "Open", "translation": "Abrir", "context": "verb"}
    ]}"#;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("nasr_engine_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn jump_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.bindings = vec![
            BindingConfig {
                input: 0,
                key: "Space".into(),
            },
            BindingConfig {
                input: 0,
                key: "KeyW".into(),
            },
            BindingConfig {
                input: 1,
                key: "Escape".into(),
            },
        ];
        config
    }

    #[test]
    fn test_engine_registers_config_bindings() {
        let mut engine = Engine::new(jump_config()).unwrap();
        assert_eq!(engine.input.input_count(), 2);

        engine.key_event(Key::KeyW, KeyAction::Press);
        assert!(engine.held(0));
        assert!(engine.pressed(0));
        assert!(!engine.held(1));

        engine.input_update();
        assert!(engine.held(0));
        assert!(!engine.pressed(0));

        engine.key_event(Key::KeyW, KeyAction::Release);
        assert!(!engine.held(0));
    }

    #[test]
    fn test_engine_without_bindings() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert!(!engine.input.is_registered());
        assert!(!engine.held(0));
        assert_eq!(engine.translate("Hello", None), "Hello");
    }

    #[test]
    fn test_engine_loads_language() {
        let dir = temp_dir();
        let path = dir.join("es.json");
        fs::write(&path, SPANISH).unwrap();

        let mut config = EngineConfig::default();
        config.language = Some(path);
        let engine = Engine::new(config).unwrap();

        assert_eq!(engine.translate("Hello", None), "Hola");
        assert_eq!(engine.translate("Goodbye", None), "Goodbye");
        assert_eq!(engine.translate_with_context("Open", "verb", None), "Abrir");
        assert_eq!(engine.translate_plural("apple", "apples", 3, None), "manzanas");
        assert_eq!(engine.translate_plural("apple", "apples", 1, None), "manzana");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_domain_does_not_change_lookup() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.locale.set_language_str(SPANISH).unwrap();

        let domain = Some("menus");
        assert_eq!(engine.translate("Hello", domain), engine.translate("Hello", None));
        assert_eq!(engine.translate("Goodbye", domain), "Goodbye");
        assert_eq!(engine.translate_with_context("Open", "verb", domain), "Abrir");
        assert_eq!(engine.translate_plural("apple", "apples", 2, domain), "manzanas");
    }

    #[test]
    fn test_engine_from_config_file() {
        let dir = temp_dir();
        let language = dir.join("es.json");
        fs::write(&language, SPANISH).unwrap();
        let config_path = dir.join("engine.toml");
        fs::write(
            &config_path,
            format!(
                r#"
language = "{}"
log_level = "debug"

[[binding]]
input = 0
key = "Space"

[[binding]]
input = 1
key = "Enter"
"#,
                language.display().to_string().replace('\\', "/")
            ),
        )
        .unwrap();

        let mut engine = Engine::from_config_file(&config_path).unwrap();
        assert_eq!(engine.config().log_level, "debug");
        assert_eq!(engine.input.input_count(), 2);

        engine.key_event(Key::Enter, KeyAction::Press);
        assert!(engine.held(1));
        assert!(!engine.held(0));
        assert_eq!(engine.translate("Hello", None), "Hola");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let path = temp_dir().join("missing.toml");
        assert!(matches!(
            Engine::from_config_file(path),
            Err(NasrError::Io(_))
        ));
    }

    #[test]
    fn test_engine_installs_logger() {
        let config = EngineConfig::from_toml_str("log_level = \"debug\"").unwrap();
        let _engine = Engine::new(config).unwrap();
        // Whichever engine in this process came first set the level
        assert_ne!(log::max_level(), log::LevelFilter::Off);
        assert!(!init_logging("debug"));
    }

    #[test]
    fn test_engine_missing_language_fails() {
        let mut config = EngineConfig::default();
        config.language = Some(temp_dir().join("missing.json"));
        assert!(matches!(
            Engine::new(config),
            Err(NasrError::ResourceUnreadable { .. })
        ));
    }

    #[test]
    fn test_engine_bad_binding_fails() {
        let mut config = EngineConfig::default();
        config.bindings.push(BindingConfig {
            input: 0,
            key: "Banana".into(),
        });
        assert!(matches!(Engine::new(config), Err(NasrError::ConfigError(_))));
    }

    #[test]
    fn test_close_clears_inputs() {
        let mut engine = Engine::new(jump_config()).unwrap();
        engine.key_event(Key::Space, KeyAction::Press);
        engine.draw_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);
        engine.close();
        assert!(!engine.input.is_registered());
        assert!(!engine.held(0));
        assert_eq!(engine.rect_count(), 0);
    }

    #[test]
    fn test_drawing_without_window() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        assert!(!engine.is_window_open());
        assert!(!engine.poll_events());

        engine.clear_color(Color::BLUE);
        engine.draw_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Color::RED);
        engine.draw_rect(Rect::new(10.0, 10.0, 0.0, 20.0), Color::RED);
        assert_eq!(engine.rect_count(), 1);

        assert!(matches!(engine.present(), Err(NasrError::RenderError(_))));
        assert_eq!(engine.rect_count(), 0);
    }

    #[test]
    fn test_music_without_audio() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        assert!(matches!(
            engine.play_music("song.ogg", true),
            Err(NasrError::AudioError(_))
        ));
        assert!(matches!(engine.stop_music(), Err(NasrError::AudioError(_))));
        assert!(matches!(engine.set_volume(0.5), Err(NasrError::AudioError(_))));
        assert!(!engine.is_music_playing());
    }

    #[test]
    fn test_with_audio_applies_volume() {
        let mut config = EngineConfig::default();
        config.audio.volume = 0.25;
        let mut engine = Engine::new(config).unwrap().with_audio();
        assert_eq!(engine.audio.as_ref().unwrap().volume(), 0.25);

        // Works with or without a device
        engine.set_volume(0.75).unwrap();
        engine.pause_music().unwrap();
        engine.resume_music().unwrap();
        engine.stop_music().unwrap();
        assert_eq!(engine.audio.as_ref().unwrap().volume(), 0.75);
        assert!(!engine.is_music_playing());
    }
}
