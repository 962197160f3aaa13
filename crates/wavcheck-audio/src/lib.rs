//! wavcheck audio accessor
//!
//! Opens uncompressed WAV files, exposes their rate, length and samples,
//! computes short-term energy and resamples them, either with an FFT
//! resampler or through an external transcoder.
//!
//! ## Example
//!
//! ```rust,ignore
//! use wavcheck_audio::{AudioHandle, ScratchDir};
//!
//! let scratch = ScratchDir::acquire("tmp_1")?;
//! let mut audio = AudioHandle::new("samples/A.wav");
//! audio.read()?;
//! let before = audio.checked_energy()?;
//!
//! audio.resampling(24000, &scratch)?;
//! audio.read()?;
//! assert_eq!(audio.rate(), 24000);
//! let after = audio.checked_energy()?;
//! ```

pub mod energy;
pub mod error;
pub mod handle;
pub mod resample;
pub mod scratch;
pub mod transcoder;
pub mod wav;

pub use energy::{chunk_frames, energy, short_term_energy};
pub use error::{AudioError, AudioResult, ReadError};
pub use handle::{AudioHandle, DEFAULT_FRAME_MS, UNREAD_RATE};
pub use scratch::{ScratchDir, DEFAULT_SCRATCH_DIR};
pub use transcoder::{TranscodeOutput, Transcoder, DEFAULT_TRANSCODER};
pub use wav::DecodedAudio;
