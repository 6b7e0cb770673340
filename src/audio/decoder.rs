use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::types::AudioSignal;

/// Decode an audio file to mono f32 samples at the file's native rate.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioSignal> {
    let path = path.as_ref();
    let load_err = |message: String| ExtractionError::audio_load(path, message);

    let file = std::fs::File::open(path).map_err(|err| load_err(err.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| load_err(format!("failed to probe audio format: {}", err)))?;
    let mut format = probe_result.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| load_err("no audio tracks found in file".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| load_err("sample rate not specified in audio file".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| load_err(format!("failed to create decoder: {}", err)))?;

    let mut samples = Vec::new();
    let mut interleaved: Option<SampleBuffer<f32>> = None;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(load_err(format!("failed to read packet: {}", err))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|err| load_err(format!("failed to decode audio packet: {}", err)))?;
        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        let required = decoded.capacity() * channels;
        if interleaved
            .as_ref()
            .map_or(true, |buffer| buffer.capacity() < required)
        {
            interleaved = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        if let Some(buffer) = interleaved.as_mut() {
            buffer.copy_interleaved_ref(decoded);
            mix_to_mono(buffer.samples(), channels, &mut samples);
        }
    }

    if samples.is_empty() {
        return Err(load_err("file contains no audio samples".to_string()));
    }
    debug!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate,
        "decoded audio"
    );
    Ok(AudioSignal::new(samples, sample_rate))
}

/// Average interleaved frames down to a single channel.
fn mix_to_mono(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
