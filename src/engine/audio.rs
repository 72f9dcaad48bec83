use std::collections::HashMap;
use web_sys::HtmlAudioElement;

/// Sounds are addressed by file name inside the audio folder
pub trait Audio {
    fn load(&mut self, name: &str);
    fn is_loaded(&self, name: &str) -> bool;
    fn play(&mut self, name: &str);
    fn stop(&mut self, name: &str);
    fn set_looping(&mut self, name: &str, looping: bool);
    /// 0.0 silent to 1.0 full volume
    fn set_gain(&mut self, name: &str, gain: f64);
}

// HTMLMediaElement.HAVE_ENOUGH_DATA
const HAVE_ENOUGH_DATA: u16 = 4;

pub struct WebAudio {
    folder: String,
    sounds: HashMap<String, HtmlAudioElement>,
}

impl WebAudio {
    pub fn new(folder: &str) -> Self {
        WebAudio {
            folder: folder.to_string(),
            sounds: HashMap::new(),
        }
    }

    fn sound(&mut self, name: &str) -> Option<&HtmlAudioElement> {
        if !self.sounds.contains_key(name) {
            self.load(name);
        }
        self.sounds.get(name)
    }
}

impl Audio for WebAudio {
    fn load(&mut self, name: &str) {
        if self.sounds.contains_key(name) {
            return;
        }
        let url = format!("{}{}", self.folder, name);
        match HtmlAudioElement::new_with_src(&url) {
            Ok(element) => {
                element.set_preload("auto");
                self.sounds.insert(name.to_string(), element);
            }
            Err(err) => error!("[audio] Could not load {} : {:#?}", url, err),
        }
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.sounds
            .get(name)
            .map(|sound| sound.ready_state() >= HAVE_ENOUGH_DATA)
            .unwrap_or(false)
    }

    fn play(&mut self, name: &str) {
        if let Some(sound) = self.sound(name) {
            // the returned promise only reports autoplay refusals
            if let Err(err) = sound.play() {
                error!("[audio] Could not play {} : {:#?}", name, err);
            }
        }
    }

    fn stop(&mut self, name: &str) {
        if let Some(sound) = self.sounds.get(name) {
            if let Err(err) = sound.pause() {
                error!("[audio] Could not stop {} : {:#?}", name, err);
            }
            sound.set_current_time(0.0);
        }
    }

    fn set_looping(&mut self, name: &str, looping: bool) {
        if let Some(sound) = self.sound(name) {
            sound.set_loop(looping);
        }
    }

    fn set_gain(&mut self, name: &str, gain: f64) {
        if let Some(sound) = self.sounds.get(name) {
            sound.set_volume(gain.clamp(0.0, 1.0));
        }
    }
}

/// Used when the game is muted: every sound counts as loaded and plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Audio for Silent {
    fn load(&mut self, _name: &str) {}

    fn is_loaded(&self, _name: &str) -> bool {
        true
    }

    fn play(&mut self, _name: &str) {}

    fn stop(&mut self, _name: &str) {}

    fn set_looping(&mut self, _name: &str, _looping: bool) {}

    fn set_gain(&mut self, _name: &str, _gain: f64) {}
}
