use std::{
    sync::{Arc, Mutex, mpsc},
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result, bail};
use cpal::{
    SampleFormat, SampleRate, SupportedStreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, warn};

use speech_console_core::{AudioFormat, AudioFrame, audio};

const PREFERRED_SAMPLE_RATE: u32 = 16000;

type Listener = Arc<Mutex<Option<UnboundedSender<AudioFrame>>>>;

/// Capture from the default input device.
///
/// The cpal stream is not `Send`, so it is created and kept alive on a dedicated thread. Frames
/// are always delivered as mono, at the sample rate of the device configuration.
#[derive(Debug)]
pub struct Microphone {
    format: AudioFormat,
    listener: Listener,
    stop: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Microphone {
    pub fn open_default() -> Result<Self> {
        let listener: Listener = Default::default();
        let (ready_tx, ready_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = {
            let listener = listener.clone();
            thread::Builder::new()
                .name("microphone".into())
                .spawn(move || match open_stream(listener) {
                    Ok((stream, format)) => {
                        let _ = ready_tx.send(Ok(format));
                        // Returns when the sender is dropped.
                        let _ = stop_rx.recv();
                        drop(stream);
                        debug!("Microphone stopped");
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                })
                .context("Spawning microphone thread")?
        };

        let format = ready_rx
            .recv()
            .context("Microphone thread ended before the device was opened")??;

        info!("Microphone opened: {format:?}");

        Ok(Self {
            format,
            listener,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Start receiving frames. A previous receiver stops receiving.
    pub fn listen(&self) -> UnboundedReceiver<AudioFrame> {
        let (sender, receiver) = unbounded_channel();
        match self.listener.lock() {
            Ok(mut listener) => *listener = Some(sender),
            Err(_) => error!("Microphone listener lock poisoned"),
        }
        receiver
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Microphone thread panicked");
            }
        }
    }
}

fn open_stream(listener: Listener) -> Result<(cpal::Stream, AudioFormat)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("No default audio input device")?;
    let config = preferred_input_config(&device)?;

    let device_format = AudioFormat::new(config.channels(), config.sample_rate().0);
    debug!("Input device config: {config:?}");

    let stream_config = config.config();
    let stream = match config.sample_format() {
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                deliver(
                    &listener,
                    AudioFrame {
                        format: device_format,
                        samples: audio::into_i16(data),
                    },
                )
            },
            report_stream_error,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                deliver(
                    &listener,
                    AudioFrame {
                        format: device_format,
                        samples: data.to_vec(),
                    },
                )
            },
            report_stream_error,
            None,
        )?,
        other => bail!("Unsupported input sample format: {other:?}"),
    };

    stream.play().context("Starting input stream")?;

    Ok((stream, AudioFormat::new(1, device_format.sample_rate)))
}

/// A mono configuration at 16 kHz if the device supports one, the device default otherwise.
fn preferred_input_config(device: &cpal::Device) -> Result<SupportedStreamConfig> {
    let preferred = device
        .supported_input_configs()
        .context("Querying input configurations")?
        .find(|range| {
            range.channels() == 1
                && range.min_sample_rate().0 <= PREFERRED_SAMPLE_RATE
                && range.max_sample_rate().0 >= PREFERRED_SAMPLE_RATE
                && matches!(range.sample_format(), SampleFormat::F32 | SampleFormat::I16)
        })
        .map(|range| range.with_sample_rate(SampleRate(PREFERRED_SAMPLE_RATE)));

    match preferred {
        Some(config) => Ok(config),
        None => device
            .default_input_config()
            .context("Failed to get default input config"),
    }
}

fn deliver(listener: &Listener, frame: AudioFrame) {
    let Ok(mut listener) = listener.lock() else {
        return;
    };
    if let Some(sender) = listener.as_ref() {
        if sender.send(frame.into_mono()).is_err() {
            // Receiver is gone, nobody listens until the next `listen()`.
            *listener = None;
        }
    }
}

fn report_stream_error(err: cpal::StreamError) {
    error!("Error occurred on input stream: {err}");
}
