// Audio module - audio file detection and format probing

pub mod detection;
pub mod metadata;

pub use detection::is_audio_file;
pub use metadata::{format_duration, format_size, probe_audio, AudioDetails};
