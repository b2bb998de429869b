//! Audio decoding via Symphonia.
//!
//! Decodes a complete in-memory file into interleaved `f32` PCM. The format
//! is probed from the content; corrupt packets are skipped.

use std::future::Future;
use std::io::Cursor;

use proedit_audio::{AudioDecode, DecodedAudio};
use proedit_core::{ProEditError, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Packet-at-a-time decoder over an in-memory file.
struct PacketDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl PacketDecoder {
    fn open(bytes: Vec<u8>) -> Result<Self> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
        let format_opts = FormatOptions {
            enable_gapless: true,
            ..Default::default()
        };
        let probed = symphonia::default::get_probe()
            .format(&Hint::new(), mss, &format_opts, &MetadataOptions::default())
            .map_err(|e| ProEditError::UnsupportedFormat(e.to_string()))?;
        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.channels.is_some())
            .ok_or_else(|| ProEditError::Decoder("No audio track".into()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| ProEditError::Decoder("No sample rate in codec params".into()))?;
        let channels = codec_params.channels.map_or(0, |c| c.count() as u16);

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| ProEditError::UnsupportedFormat(format!("Codec init failed: {e}")))?;

        Ok(Self {
            reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            samples: Vec::new(),
        })
    }

    /// Decode the next packet. Returns `false` once the stream is exhausted.
    fn step(&mut self) -> Result<bool> {
        let packet = match self.reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(false);
            }
            Err(SymphoniaError::ResetRequired) => return Ok(false),
            Err(e) => return Err(ProEditError::Decoder(e.to_string())),
        };
        if packet.track_id() != self.track_id {
            return Ok(true);
        }

        let decoded = match self.decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(error = %msg, "Skipping corrupted audio packet");
                return Ok(true);
            }
            Err(e) => return Err(ProEditError::Decoder(e.to_string())),
        };
        if decoded.frames() == 0 {
            return Ok(true);
        }

        let spec = *decoded.spec();
        self.sample_rate = spec.rate;
        self.channels = spec.channels.count() as u16;
        let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        self.samples.extend_from_slice(buf.samples());
        Ok(true)
    }

    fn finish(self) -> DecodedAudio {
        let audio = DecodedAudio::new(self.samples, self.sample_rate, self.channels);
        debug!(
            sample_rate = audio.sample_rate,
            channels = audio.channels,
            secs = audio.duration_secs(),
            "Decoded audio"
        );
        audio
    }
}

/// Decode an encoded audio file held in memory.
///
/// Runs to completion on the calling thread; async callers go through
/// [`SymphoniaDecoder`], which yields to the runtime between packets.
pub fn decode_audio(bytes: Vec<u8>) -> Result<DecodedAudio> {
    let mut packets = PacketDecoder::open(bytes)?;
    while packets.step()? {}
    Ok(packets.finish())
}

/// [`AudioDecode`] backed by Symphonia's default codec registry.
///
/// Yields after every packet so other tasks on the same runtime thread
/// (concurrent decodes, the playback frame task) keep running.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl AudioDecode for SymphoniaDecoder {
    fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<DecodedAudio>> + Send {
        async move {
            let mut packets = PacketDecoder::open(bytes)?;
            while packets.step()? {
                tokio::task::yield_now().await;
            }
            Ok(packets.finish())
        }
    }
}
