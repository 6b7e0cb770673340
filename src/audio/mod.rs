pub mod decoder;
pub mod resample;

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::types::AudioSignal;

/// Decode `path` and bring it to `sample_rate`, resampling when the file's native rate differs.
pub fn load_at_rate<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<AudioSignal> {
    let decoded = decoder::decode_audio(path.as_ref())?;
    if decoded.sample_rate == sample_rate {
        return Ok(decoded);
    }
    debug!(
        path = %path.as_ref().display(),
        from = decoded.sample_rate,
        to = sample_rate,
        "resampling decoded audio to recorded rate"
    );
    let samples = resample::sinc_resample(&decoded.samples, decoded.sample_rate, sample_rate)?;
    Ok(AudioSignal::new(samples, sample_rate))
}
