//! Offline render of a single pluck.

use std::collections::VecDeque;

use color_eyre::eyre::{eyre, Result, WrapErr};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::info;
use vibed_dsp::{
    synth::{StringMessage, StringPlayer},
    VibratingString, MAX_BLOCK_SIZE,
};

use crate::{spectrum, RenderArgs};

pub fn run(args: &RenderArgs) -> Result<()> {
    if !(args.seconds > 0.0) {
        return Err(eyre!("render length must be positive, got {}s", args.seconds));
    }

    let mut rng = Pcg32::seed_from_u64(args.string.seed);
    let params = args.string.params(args.sample_rate);
    let engine = args.string.engine();
    let excitation = args.string.excitation(&mut rng);

    let string = VibratingString::new(&params, &engine, &excitation, false, &mut rng)
        .wrap_err("failed to build string")?;
    let geometry = string.geometry();
    info!(
        length = geometry.string_length,
        pick = geometry.pick_index,
        pickup = geometry.pickup_index,
        oversample = geometry.oversample_factor,
        "string ready"
    );

    let mut rx = VecDeque::new();
    rx.push_back(StringMessage::Pluck(Box::new(string)));
    let mut player =
        StringPlayer::new(args.sample_rate as f32, rx, Vec::<Box<VibratingString>>::new());

    let total = (args.seconds * args.sample_rate as f32) as usize;
    let mut samples = vec![0.0f32; total];
    for block in samples.chunks_mut(MAX_BLOCK_SIZE) {
        player.render_block(block);
    }

    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let rms = (samples.iter().map(|&x| x * x).sum::<f32>() / total.max(1) as f32).sqrt();

    println!("frames:    {}", player.frames());
    println!("peak:      {peak:.4}");
    println!("rms:       {rms:.4}");
    match spectrum::dominant_frequency(&samples, args.sample_rate as f32) {
        Some(freq) => println!("dominant:  {freq:.2} Hz (requested {:.2} Hz)", params.pitch),
        None => println!("dominant:  n/a"),
    }

    Ok(())
}
