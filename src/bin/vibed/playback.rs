//! Live playback on the default output device.
//!
//! Strings are built here on the main thread and pushed through an rtrb ring
//! to the audio callback. Strings the callback is done with come back through
//! a second ring and are dropped here.

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rtrb::RingBuffer;
use tracing::{error, info, warn};
use vibed_dsp::{
    synth::{StringMessage, StringPlayer},
    VibratingString, MAX_BLOCK_SIZE,
};

use crate::PlayArgs;

const RING_CAPACITY: usize = 16;
/// Time left for the last pluck to ring out before the stream closes.
const TAIL: Duration = Duration::from_millis(500);

pub fn run(args: &PlayArgs) -> Result<()> {
    if !(args.interval > 0.0) {
        return Err(eyre!("pluck interval must be positive, got {}s", args.interval));
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    info!(sample_rate, channels, "opened output device");

    let (mut msg_tx, msg_rx) = RingBuffer::<StringMessage>::new(RING_CAPACITY);
    let (retire_tx, mut retire_rx) = RingBuffer::<Box<VibratingString>>::new(RING_CAPACITY);

    let mut player = StringPlayer::new(sample_rate as f32, msg_rx, retire_tx);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame_block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = frame_block.len() / channels;
                    let block = &mut mono[..frames];
                    player.render_block(block);
                    for (frame, &sample) in frame_block.chunks_mut(channels).zip(block.iter()) {
                        frame.fill(sample);
                    }
                }
            },
            move |err| error!(%err, "output stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    let params = args.string.params(sample_rate);
    let engine = args.string.engine();
    let interval = Duration::from_secs_f32(args.interval);

    for n in 0..args.plucks {
        let mut rng = Pcg32::seed_from_u64(args.string.seed.wrapping_add(n as u64));
        let excitation = args.string.excitation(&mut rng);
        let string = VibratingString::new(&params, &engine, &excitation, false, &mut rng)
            .wrap_err("failed to build string")?;

        if msg_tx.push(StringMessage::Pluck(Box::new(string))).is_err() {
            warn!(pluck = n, "message ring full, dropping pluck");
        }

        thread::sleep(interval);
        while retire_rx.pop().is_ok() {}
    }

    if msg_tx.push(StringMessage::Damp).is_err() {
        warn!("message ring full, could not damp");
    }
    thread::sleep(TAIL);
    while retire_rx.pop().is_ok() {}

    Ok(())
}
