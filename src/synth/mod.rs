// Voice layer: one note's signal path, its events and pitch-wheel handling.
// Voice allocation lives with whatever owns the voices (see the demo binary).

pub mod message;
pub mod pitch;
pub mod voice;

pub use message::{MessageReceiver, SynthMessage, VoiceEvent};
pub use voice::{RenderCtx, RenderResult, Voice, AUDIBILITY_THRESHOLD};
