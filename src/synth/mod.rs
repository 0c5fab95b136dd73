// Purpose: the voice layer - triggering, post-processing, speaker protection
// and the lock-free control path into the audio thread

pub mod message;
pub mod protection;
#[cfg(feature = "rtrb")]
pub mod shared;
pub mod voice;

pub use message::{MessageReceiver, SynthMessage};
#[cfg(feature = "rtrb")]
pub use shared::{SharedVoice, VoiceHandle, VoiceStatus};
pub use voice::Voice;
