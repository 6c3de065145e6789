//! Position generators: track playback and heading computation

pub mod bearing;
pub mod playback;
pub mod position;
pub mod timer;
pub mod track;

#[cfg(test)]
mod tests;
