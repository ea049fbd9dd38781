use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, Device, OutputCallbackInfo, StreamConfig, SupportedBufferSize,
};
use sounder_core::{Sig, SigCtx, SigT};
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc, RwLock,
    },
    time::Duration,
};

/// How long to wait for the audio driver to ask for samples before checking again whether to
/// keep playing.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.01
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.01,
        }
    }
}

pub struct Player {
    device: Device,
}

struct SyncCommandRequestNumSamples(usize);
struct SyncCommandDone;

/// Number of interleaved frames in an output buffer. Ideal buffer sizes are rounded down to a
/// multiple of 4 since alsa rejects other sizes.
fn ideal_buffer_size(sample_rate_hz: u32, channels: u32, config: Config) -> u32 {
    let ideal = (sample_rate_hz as f32 * config.target_latency_s) as u32 * channels;
    ideal & !3
}

fn clamp_buffer_size(ideal: u32, supported: &SupportedBufferSize) -> BufferSize {
    match supported {
        SupportedBufferSize::Range { min, max } => {
            BufferSize::Fixed(ideal.clamp(*min, (*max).max(*min)))
        }
        SupportedBufferSize::Unknown => BufferSize::Default,
    }
}

impl Player {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        Ok(Self { device })
    }

    fn choose_config(&self, config: Config) -> anyhow::Result<StreamConfig> {
        let default_config = self.device.default_output_config()?;
        let sample_rate = default_config.sample_rate();
        let channels = 2;
        let buffer_size = clamp_buffer_size(
            ideal_buffer_size(sample_rate.0, channels, config),
            default_config.buffer_size(),
        );
        Ok(StreamConfig {
            channels: channels as u16,
            sample_rate,
            buffer_size,
        })
    }

    fn make_stream_sync_mono(
        &self,
        stream_config: &StreamConfig,
        buf: Arc<RwLock<Vec<f32>>>,
        send_sync_command_request_num_samples: mpsc::Sender<
            SyncCommandRequestNumSamples,
        >,
        recv_sync_command_done: mpsc::Receiver<SyncCommandDone>,
    ) -> anyhow::Result<cpal::Stream> {
        log::info!("sample rate: {}", stream_config.sample_rate.0);
        log::info!("num channels: {}", stream_config.channels);
        log::info!("buffer size: {:?}", stream_config.buffer_size);
        let channels = stream_config.channels as usize;
        let stream = self.device.build_output_stream(
            stream_config,
            move |data: &mut [f32], _: &OutputCallbackInfo| {
                // The producing thread hangs up when playback stops. Any callback that runs
                // after that point outputs silence until the stream is dropped.
                let produced = send_sync_command_request_num_samples
                    .send(SyncCommandRequestNumSamples(data.len() / channels))
                    .is_ok()
                    && recv_sync_command_done.recv().is_ok();
                if !produced {
                    data.fill(0.0);
                    return;
                }
                let Ok(buf) = buf.read() else {
                    data.fill(0.0);
                    return;
                };
                for (output, &input) in data.chunks_mut(channels).zip(buf.iter())
                {
                    output.fill(input);
                }
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        Ok(stream)
    }

    /// Play a mono signal on the default output device. Samples are calculated on the calling
    /// thread while the audio driver waits for them, which keeps latency as low as possible.
    /// `keep_playing` is checked before each batch and at least every 100ms. Playback stops and
    /// this returns once it yields `false`.
    pub fn play_signal_sync_mono_while<S, K>(
        &self,
        mut sig: Sig<S>,
        keep_playing: K,
        config: Config,
    ) -> anyhow::Result<()>
    where
        S: SigT<Item = f32>,
        K: FnMut() -> bool,
    {
        // channel for cpal thread to send messages to the thread computing samples
        let (
            send_sync_command_request_num_samples,
            recv_sync_command_request_num_samples,
        ) = mpsc::channel::<SyncCommandRequestNumSamples>();
        let (send_sync_command_done, recv_sync_command_done) =
            mpsc::channel::<SyncCommandDone>();
        // buffer for sending samples to the cpal thread
        let buffer = Arc::new(RwLock::new(Vec::new()));
        let stream_config = self.choose_config(config)?;
        let stream = self.make_stream_sync_mono(
            &stream_config,
            Arc::clone(&buffer),
            send_sync_command_request_num_samples,
            recv_sync_command_done,
        )?;
        stream.play()?;
        let result = serve_sample_requests(
            &mut sig,
            keep_playing,
            stream_config.sample_rate.0 as f32,
            &buffer,
            &recv_sync_command_request_num_samples,
            &send_sync_command_done,
        );
        if let Ok(num_batches) = result {
            log::info!("stopping playback after {} batches", num_batches);
        }
        // Hang up before dropping the stream so a callback blocked on the done channel
        // returns rather than holding up the stream's teardown.
        drop(send_sync_command_done);
        drop(recv_sync_command_request_num_samples);
        drop(stream);
        result.map(|_| ())
    }
}

/// Fill `buffer` with the next batch of `sig` each time the cpal callback asks for samples,
/// until `keep_playing` yields `false`. Returns the number of batches produced.
fn serve_sample_requests<S, K>(
    sig: &mut Sig<S>,
    mut keep_playing: K,
    sample_rate_hz: f32,
    buffer: &RwLock<Vec<f32>>,
    recv_sync_command_request_num_samples: &mpsc::Receiver<
        SyncCommandRequestNumSamples,
    >,
    send_sync_command_done: &mpsc::Sender<SyncCommandDone>,
) -> anyhow::Result<u64>
where
    S: SigT<Item = f32>,
    K: FnMut() -> bool,
{
    let mut ctx = SigCtx {
        sample_rate_hz,
        batch_index: 0,
        num_samples: 0,
    };
    while keep_playing() {
        let num_samples = match recv_sync_command_request_num_samples
            .recv_timeout(REQUEST_TIMEOUT)
        {
            Ok(SyncCommandRequestNumSamples(num_samples)) => num_samples,
            // the driver has stalled (e.g. the device was unplugged)
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                anyhow::bail!("cpal thread stopped unexpectedly")
            }
        };
        ctx.num_samples = num_samples;
        // The callback reads the buffer once it's told the samples are ready, so keep it
        // locked until they are.
        let mut buffer = buffer
            .write()
            .map_err(|_| anyhow::anyhow!("sample buffer lock poisoned"))?;
        send_sync_command_done
            .send(SyncCommandDone)
            .map_err(|_| anyhow::anyhow!("cpal thread stopped unexpectedly"))?;
        sig.sample_into_vec(&ctx, &mut buffer);
        ctx.batch_index += 1;
    }
    Ok(ctx.batch_index)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Instant;

    #[test]
    fn ideal_buffer_size_is_a_multiple_of_4() {
        let config = Config {
            target_latency_s: 0.01,
        };
        // 441 frames * 2 channels = 882, rounded down to 880
        assert_eq!(ideal_buffer_size(44_100, 2, config), 880);
        assert_eq!(ideal_buffer_size(48_000, 2, config) % 4, 0);
    }

    #[test]
    fn buffer_size_is_clamped_to_supported_range() {
        let supported = SupportedBufferSize::Range { min: 1024, max: 4096 };
        assert_eq!(clamp_buffer_size(880, &supported), BufferSize::Fixed(1024));
        assert_eq!(
            clamp_buffer_size(8192, &supported),
            BufferSize::Fixed(4096)
        );
        assert_eq!(
            clamp_buffer_size(2048, &supported),
            BufferSize::Fixed(2048)
        );
    }

    #[test]
    fn unknown_range_uses_device_default() {
        assert_eq!(
            clamp_buffer_size(880, &SupportedBufferSize::Unknown),
            BufferSize::Default
        );
    }

    #[test]
    fn stops_when_the_driver_stalls() {
        let (_send_request, recv_request) = mpsc::channel();
        let (send_done, _recv_done) = mpsc::channel();
        let buffer = RwLock::new(Vec::new());
        let start = Instant::now();
        let mut checks = 0;
        let num_batches = serve_sample_requests(
            &mut Sig(0.0_f32),
            || {
                checks += 1;
                checks < 3
            },
            48_000.0,
            &buffer,
            &recv_request,
            &send_done,
        )
        .unwrap();
        assert_eq!(num_batches, 0);
        assert_eq!(checks, 3);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn each_request_fills_the_buffer() {
        let (send_request, recv_request) = mpsc::channel();
        let (send_done, recv_done) = mpsc::channel();
        let buffer = RwLock::new(Vec::new());
        send_request.send(SyncCommandRequestNumSamples(3)).unwrap();
        send_request.send(SyncCommandRequestNumSamples(2)).unwrap();
        let mut remaining = 2;
        let num_batches = serve_sample_requests(
            &mut Sig(0.25_f32),
            || {
                remaining -= 1;
                remaining >= 0
            },
            48_000.0,
            &buffer,
            &recv_request,
            &send_done,
        )
        .unwrap();
        assert_eq!(num_batches, 2);
        assert_eq!(recv_done.try_iter().count(), 2);
        assert_eq!(*buffer.read().unwrap(), vec![0.25; 2]);
    }

    #[test]
    fn hung_up_driver_is_an_error() {
        let (send_request, recv_request) = mpsc::channel();
        let (send_done, _recv_done) = mpsc::channel();
        drop(send_request);
        let buffer = RwLock::new(Vec::new());
        assert!(serve_sample_requests(
            &mut Sig(0.0_f32),
            || true,
            48_000.0,
            &buffer,
            &recv_request,
            &send_done,
        )
        .is_err());
    }
}
