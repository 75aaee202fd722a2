use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rodio::{OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::AudioOutput;
use speech_console_core::{AudioFrame, audio};

enum Command {
    Play(AudioFrame),
    Drain(oneshot::Sender<()>),
    Stop,
}

/// Playback on the default output device.
///
/// The rodio output stream lives on a dedicated thread, frames are forwarded to it.
#[derive(Debug)]
pub struct Speaker {
    commands: mpsc::Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl Speaker {
    pub fn open_default() -> Result<Self> {
        let (commands, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("speaker".into())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow!("Opening default output device: {e}")));
                        return;
                    }
                };
                stream.log_on_drop(false);
                let sink = Sink::connect_new(stream.mixer());
                let _ = ready_tx.send(Ok(()));

                while let Ok(command) = command_rx.recv() {
                    match command {
                        Command::Play(frame) => {
                            let format = frame.format;
                            sink.append(SamplesBuffer::new(
                                format.channels,
                                format.sample_rate,
                                audio::from_i16(frame.samples),
                            ));
                        }
                        Command::Drain(done) => {
                            sink.sleep_until_end();
                            let _ = done.send(());
                        }
                        Command::Stop => break,
                    }
                }

                sink.sleep_until_end();
                debug!("Speaker stopped");
            })
            .context("Spawning speaker thread")?;

        ready_rx
            .recv()
            .context("Speaker thread ended before the device was opened")??;

        Ok(Self {
            commands,
            thread: Some(thread),
        })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Speaker thread is gone"))
    }

    fn stop(&mut self) {
        let _ = self.commands.send(Command::Stop);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Speaker thread panicked");
            }
        }
    }
}

#[async_trait]
impl AudioOutput for Speaker {
    fn write(&mut self, frame: AudioFrame) -> Result<()> {
        self.send(Command::Play(frame))
    }

    async fn drain(&mut self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(Command::Drain(done_tx))?;
        done_rx.await.context("Speaker thread ended while draining")
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.stop();
        Ok(())
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}
