//! Browser implementations of the shared services

use std::cell::RefCell;

use playroom_core::{AnimalCall, Announcer, AudioCues, Celebration, Cue};
use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::{
    AudioContext, AudioContextState, CustomEvent, CustomEventInit, OscillatorType,
    SpeechSynthesisUtterance,
};

/// Name of the DOM event carrying a celebration burst
pub const BURST_EVENT: &str = "playroom:burst";

/// One oscillator note of a cue
struct Tone {
    start: f64,
    duration: f64,
    from_hz: f32,
    to_hz: f32,
    gain: f32,
    wave: OscillatorType,
}

impl Tone {
    const fn sweep(from_hz: f32, to_hz: f32, duration: f64, gain: f32) -> Self {
        Self {
            start: 0.0,
            duration,
            from_hz,
            to_hz,
            gain,
            wave: OscillatorType::Sine,
        }
    }

    const fn note(hz: f32, start: f64, duration: f64, gain: f32, wave: OscillatorType) -> Self {
        Self::glide(hz, hz, start, duration, gain, wave)
    }

    const fn glide(
        from_hz: f32,
        to_hz: f32,
        start: f64,
        duration: f64,
        gain: f32,
        wave: OscillatorType,
    ) -> Self {
        Self {
            start,
            duration,
            from_hz,
            to_hz,
            gain,
            wave,
        }
    }
}

const ARPEGGIO: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];
const CHIME: [(f32, f32); 5] = [
    (523.25, 0.5),
    (659.25, 0.3),
    (783.99, 0.2),
    (1046.50, 0.15),
    (1318.51, 0.1),
];

/// `count` identical glides `spacing` seconds apart
fn repeated(count: usize, spacing: f64, tone: impl Fn(f64) -> Tone) -> Vec<Tone> {
    (0..count).map(|i| tone(i as f64 * spacing)).collect()
}

fn animal_call(call: AnimalCall) -> Vec<Tone> {
    use OscillatorType::{Sawtooth, Square, Triangle};
    match call {
        AnimalCall::Bark => repeated(2, 0.15, |t| Tone::glide(300.0, 200.0, t, 0.1, 0.3, Sawtooth)),
        AnimalCall::Meow => vec![
            Tone::glide(600.0, 800.0, 0.0, 0.1, 0.3, Triangle),
            Tone::glide(800.0, 400.0, 0.1, 0.3, 0.3, Triangle),
        ],
        AnimalCall::Moo => vec![
            Tone::glide(200.0, 150.0, 0.0, 0.4, 0.4, Sawtooth),
            Tone::glide(150.0, 180.0, 0.4, 0.4, 0.4, Sawtooth),
        ],
        AnimalCall::Quack => repeated(2, 0.12, |t| Tone::glide(400.0, 300.0, t, 0.08, 0.3, Square)),
        AnimalCall::Baa => vec![
            Tone::glide(350.0, 300.0, 0.0, 0.25, 0.3, Sawtooth),
            Tone::glide(300.0, 320.0, 0.25, 0.25, 0.3, Sawtooth),
        ],
        AnimalCall::Oink => repeated(3, 0.15, |t| Tone::glide(250.0, 200.0, t, 0.1, 0.3, Sawtooth)),
    }
}

fn tones(cue: Cue) -> Vec<Tone> {
    match cue {
        Cue::Pop => vec![Tone::sweep(600.0, 300.0, 0.1, 0.3)],
        Cue::Thud => vec![Tone::sweep(150.0, 50.0, 0.15, 0.4)],
        Cue::Success => ARPEGGIO
            .iter()
            .enumerate()
            .map(|(i, hz)| Tone::note(*hz, i as f64 * 0.1, 0.3, 0.3, OscillatorType::Sine))
            .collect(),
        Cue::Chime => CHIME
            .iter()
            .enumerate()
            .flat_map(|(i, (hz, level))| {
                let start = i as f64 * 0.08;
                [
                    Tone::note(*hz, start, 0.5, 0.4 * level, OscillatorType::Sine),
                    Tone::note(hz * 2.0, start, 0.3, 0.1 * level, OscillatorType::Triangle),
                ]
            })
            .collect(),
        Cue::Note(note) => vec![Tone::note(note.frequency(), 0.0, 0.5, 0.3, OscillatorType::Sine)],
        Cue::Animal(call) => animal_call(call),
    }
}

/// Oscillator cues through the Web Audio API.
///
/// The context is created lazily on the first cue, which is always the
/// result of a user gesture, and resumed when the browser suspended it.
#[derive(Default)]
pub struct WebAudio {
    context: RefCell<Option<AudioContext>>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Option<AudioContext> {
        let mut slot = self.context.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(context) => *slot = Some(context),
                Err(err) => {
                    warn!(?err, "audio context unavailable");
                    return None;
                }
            }
        }
        let context = slot.clone()?;
        if context.state() == AudioContextState::Suspended {
            let _ = context.resume();
        }
        Some(context)
    }

    fn play_tone(context: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
        let oscillator = context.create_oscillator()?;
        let gain = context.create_gain()?;
        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&context.destination())?;
        oscillator.set_type(tone.wave);

        let start = context.current_time() + tone.start;
        let end = start + tone.duration;
        let frequency = oscillator.frequency();
        frequency.set_value_at_time(tone.from_hz, start)?;
        if tone.to_hz != tone.from_hz {
            frequency.exponential_ramp_to_value_at_time(tone.to_hz, end)?;
        }
        let level = gain.gain();
        level.set_value_at_time(tone.gain, start)?;
        level.exponential_ramp_to_value_at_time(0.01, end)?;

        oscillator.start_with_when(start)?;
        oscillator.stop_with_when(end)?;
        Ok(())
    }
}

impl AudioCues for WebAudio {
    fn play_cue(&self, cue: Cue) {
        let Some(context) = self.context() else {
            return;
        };
        for tone in tones(cue) {
            if let Err(err) = Self::play_tone(&context, &tone) {
                debug!(?cue, ?err, "tone failed");
            }
        }
    }
}

/// French speech through `speechSynthesis`
#[derive(Debug, Default)]
pub struct SpeechAnnouncer;

impl SpeechAnnouncer {
    pub const LANG: &'static str = "fr-FR";
    pub const PITCH: f32 = 1.1;
    pub const RATE: f32 = 0.9;

    pub fn new() -> Self {
        Self
    }

    fn synth() -> Option<web_sys::SpeechSynthesis> {
        web_sys::window()?.speech_synthesis().ok()
    }
}

impl Announcer for SpeechAnnouncer {
    fn speak(&self, text: &str) {
        let Some(synth) = Self::synth() else {
            return;
        };
        let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(text) else {
            return;
        };
        utterance.set_lang(Self::LANG);
        utterance.set_pitch(Self::PITCH);
        utterance.set_rate(Self::RATE);
        synth.cancel();
        synth.speak(&utterance);
    }

    fn stop(&self) {
        if let Some(synth) = Self::synth() {
            synth.cancel();
        }
    }
}

#[derive(Serialize)]
struct BurstDetail {
    x: f32,
    y: f32,
    count: u32,
}

/// Dispatches [`BURST_EVENT`] on the window for the page's confetti layer
#[derive(Debug, Default)]
pub struct BurstEvents;

impl BurstEvents {
    pub fn new() -> Self {
        Self
    }

    fn dispatch(x: f32, y: f32, count: u32) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let detail = serde_json::to_string(&BurstDetail { x, y, count })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let init = CustomEventInit::new();
        init.set_detail(&js_sys::JSON::parse(&detail)?);
        let event = CustomEvent::new_with_event_init_dict(BURST_EVENT, &init)?;
        window.dispatch_event(&event)?;
        Ok(())
    }
}

impl Celebration for BurstEvents {
    fn burst(&self, x: f32, y: f32, count: u32) {
        if let Err(err) = Self::dispatch(x, y, count) {
            debug!(?err, "burst not delivered");
        }
    }
}
