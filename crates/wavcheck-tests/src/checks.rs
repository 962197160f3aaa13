//! The per-file and per-case checks.
//!
//! Every check takes one parametrization value and returns a
//! [`CheckOutcome`]. Checks that need energy first require a valid handle,
//! so an unreadable file fails as "not a valid wav" and never passes on a
//! zero energy.

use std::fmt;
use std::fs;
use std::path::Path;

use wavcheck_audio::{AudioError, AudioHandle, ScratchDir, Transcoder};
use wavcheck_fixtures::{ResampleCase, Settings};

/// Result of running one check on one case.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl CheckOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckOutcome::Failed(_))
    }

    fn check(condition: bool, message: impl FnOnce() -> String) -> Self {
        if condition {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed(message())
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Passed => write!(f, "ok"),
            CheckOutcome::Failed(msg) => write!(f, "FAILED: {}", msg),
            CheckOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Reads `file` and returns the handle only if it decoded.
fn open_valid(file: &Path, settings: &Settings) -> Result<AudioHandle, CheckOutcome> {
    let mut audio = AudioHandle::with_frame_ms(file, settings.frame_ms);
    match audio.read() {
        Ok(_) => Ok(audio),
        Err(e) => Err(CheckOutcome::Failed(format!(
            "{} is not a valid wav: {}",
            file.display(),
            e
        ))),
    }
}

fn energy_of(audio: &AudioHandle) -> Result<f64, CheckOutcome> {
    audio
        .checked_energy()
        .map_err(|e| CheckOutcome::Failed(e.to_string()))
}

/// The file exists and has a non-zero size.
pub fn file_size_is_not_zero(file: &Path) -> CheckOutcome {
    match fs::metadata(file) {
        Ok(meta) => CheckOutcome::check(meta.len() > 0, || "Empty file".to_string()),
        Err(e) => CheckOutcome::Failed(format!("Cannot stat {}: {}", file.display(), e)),
    }
}

/// The file name ends in `.wav`.
pub fn file_ends_with_wav(file: &Path) -> CheckOutcome {
    let is_wav = file.extension().map_or(false, |ext| ext == "wav");
    CheckOutcome::check(is_wav, || "Does not end with 'wav' extension".to_string())
}

/// The file decodes as uncompressed WAV.
pub fn is_wav_file(file: &Path, settings: &Settings) -> CheckOutcome {
    match open_valid(file, settings) {
        Ok(_) => CheckOutcome::Passed,
        Err(outcome) => outcome,
    }
}

/// The sample rate lies within the configured bounds.
pub fn sample_rate_is_plausible(file: &Path, settings: &Settings) -> CheckOutcome {
    let audio = match open_valid(file, settings) {
        Ok(audio) => audio,
        Err(outcome) => return outcome,
    };
    let rate = audio.rate();
    let (min, max) = (
        i64::from(settings.min_sample_rate),
        i64::from(settings.max_sample_rate),
    );
    CheckOutcome::check((min..=max).contains(&rate), || {
        format!("Rate {} Hz is outside {}..={} Hz", rate, min, max)
    })
}

/// Short-term energy exceeds the configured threshold.
pub fn energy_above_threshold(file: &Path, settings: &Settings) -> CheckOutcome {
    let energy = match open_valid(file, settings).and_then(|audio| energy_of(&audio)) {
        Ok(energy) => energy,
        Err(outcome) => return outcome,
    };
    CheckOutcome::check(energy > settings.energy_threshold, || {
        format!(
            "Energy {:.6} is lower than expected (threshold {})",
            energy, settings.energy_threshold
        )
    })
}

/// Short-term energy is strictly positive.
pub fn energy_is_positive(file: &Path, settings: &Settings) -> CheckOutcome {
    let energy = match open_valid(file, settings).and_then(|audio| energy_of(&audio)) {
        Ok(energy) => energy,
        Err(outcome) => return outcome,
    };
    CheckOutcome::check(energy > 0.0, || {
        "Energy should not be lower or equal to 0".to_string()
    })
}

/// Energy stays comparable after FFT resampling to `rate ± rate/2`.
///
/// The resampled file must report the target rate, its energy must exceed
/// the case threshold, and the relative change must stay within
/// `max_energy_drift`.
pub fn energy_after_fft_resampling(
    case: &ResampleCase,
    settings: &Settings,
    scratch: &ScratchDir,
) -> CheckOutcome {
    let mut audio = match open_valid(&case.file, settings) {
        Ok(audio) => audio,
        Err(outcome) => return outcome,
    };
    let before = match energy_of(&audio) {
        Ok(energy) => energy,
        Err(outcome) => return outcome,
    };
    let Some(rate) = audio.sample_rate() else {
        return CheckOutcome::Failed("no sample rate after read".to_string());
    };
    let target = case.target_rate(rate);

    if let Err(e) = audio.resampling(target, scratch) {
        return CheckOutcome::Failed(format!("Resampling to {} Hz failed: {}", target, e));
    }
    if let Err(e) = audio.read() {
        return CheckOutcome::Failed(format!("Cannot read resampled file: {}", e));
    }
    if audio.rate() != i64::from(target) {
        return CheckOutcome::Failed(format!(
            "Resampled file reports {} Hz, expected {} Hz",
            audio.rate(),
            target
        ));
    }

    let after = match energy_of(&audio) {
        Ok(energy) => energy,
        Err(outcome) => return outcome,
    };
    if after <= case.threshold {
        return CheckOutcome::Failed(format!(
            "Energy after resampling {:.6} is lower than expected (threshold {})",
            after, case.threshold
        ));
    }

    let drift = (before - after).abs() / before;
    CheckOutcome::check(drift <= settings.max_energy_drift, || {
        format!(
            "Energy changed by {:.1}% ({:.6} -> {:.6}), limit {:.1}%",
            drift * 100.0,
            before,
            after,
            settings.max_energy_drift * 100.0
        )
    })
}

/// Energy stays above the case threshold after external transcoding.
///
/// Skipped when the transcoder is not installed.
pub fn energy_after_external_resampling(
    case: &ResampleCase,
    settings: &Settings,
    transcoder: &Transcoder,
    scratch: &ScratchDir,
) -> CheckOutcome {
    if !transcoder.is_available() {
        return CheckOutcome::Skipped(format!(
            "{} not found",
            transcoder.executable().display()
        ));
    }

    let mut audio = match open_valid(&case.file, settings) {
        Ok(audio) => audio,
        Err(outcome) => return outcome,
    };
    let Some(rate) = audio.sample_rate() else {
        return CheckOutcome::Failed("no sample rate after read".to_string());
    };
    let target = case.target_rate(rate);

    match audio.resampling_by_external_tool(target, transcoder, scratch) {
        Ok(_) => {}
        Err(AudioError::ToolMissing { executable }) => {
            return CheckOutcome::Skipped(format!("{} not found", executable.display()));
        }
        Err(e) => {
            return CheckOutcome::Failed(format!("Transcoding to {} Hz failed: {}", target, e));
        }
    }

    let after = match open_valid(audio.path(), settings).and_then(|a| energy_of(&a)) {
        Ok(energy) => energy,
        Err(outcome) => return outcome,
    };
    CheckOutcome::check(after > case.threshold, || {
        format!(
            "Energy after transcoding {:.6} is lower than expected (threshold {})",
            after, case.threshold
        )
    })
}
