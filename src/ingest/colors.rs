use rand::Rng;

use crate::model::repository::Rgb;

/// the highest channel value handed out; capped below 255 so the explorer
/// colors stay soft against a dark background
pub(crate) const CHANNEL_MAX: u8 = 170;

/// Produces a random, readable hierarchy color: exactly one channel pinned at
/// 170, exactly one at 0, and the remaining channel drawn from a range that
/// keeps the color legible. The six channel assignments are equally likely,
/// and successive calls are fully independent, so a month's color is never
/// derived from its year's.
pub fn allocate() -> Rgb {
    allocate_with(&mut rand::thread_rng())
}

pub fn allocate_with<R: Rng>(rng: &mut R) -> Rgb {
    match rng.gen_range(0..6) {
        // red high, blue low
        0 => Rgb(CHANNEL_MAX, rng.gen_range(50..CHANNEL_MAX), 0),
        // green high, red low
        1 => Rgb(0, CHANNEL_MAX, rng.gen_range(1..CHANNEL_MAX)),
        // blue high, green low; red needs a floor or the color reads near-black
        2 => Rgb(rng.gen_range(91..CHANNEL_MAX), 0, CHANNEL_MAX),
        // blue high, red low; same legibility floor on green
        3 => Rgb(0, rng.gen_range(70..CHANNEL_MAX), CHANNEL_MAX),
        // red high, green low
        4 => Rgb(CHANNEL_MAX, 0, rng.gen_range(1..CHANNEL_MAX)),
        // green high, blue low
        _ => Rgb(rng.gen_range(1..CHANNEL_MAX), CHANNEL_MAX, 0),
    }
}
