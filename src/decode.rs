//! GIF container to a list of raw frame patches.
//!
//! Frames are kept exactly as stored: a partial patch, where it goes, how long
//! it stays, and how to clean up after it. Compositing them into full images
//! is [`crate::player::GifPlayer`]'s job.

use gif::{ColorOutput, DecodeOptions, DisposalMethod};

use crate::error::{FxError, Result};
use crate::geom::Rect;

/// GIF delays are stored in hundredths of a second.
pub const DELAY_UNIT_MS: u32 = 10;

/// What to do with a frame's area before the next frame is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// Leave the pixels; the next frame draws on top.
    None,
    /// Clear the frame's rect to transparent.
    RestoreBackground,
    /// Put back whatever was there before this frame was drawn.
    RestorePrevious,
}

impl From<DisposalMethod> for Disposal {
    fn from(method: DisposalMethod) -> Self {
        match method {
            DisposalMethod::Any | DisposalMethod::Keep => Disposal::None,
            DisposalMethod::Background => Disposal::RestoreBackground,
            DisposalMethod::Previous => Disposal::RestorePrevious,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePatch {
    pub rect: Rect,
    pub delay_ms: u32,
    pub disposal: Disposal,
    /// RGBA8, `rect.width * rect.height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl FramePatch {
    pub fn new(rect: Rect, delay_ms: u32, disposal: Disposal, rgba: Vec<u8>) -> Self {
        Self {
            rect,
            delay_ms,
            disposal,
            rgba,
        }
    }

    fn is_usable(&self) -> bool {
        self.rgba.len() == self.rect.width as usize * self.rect.height as usize * 4
    }
}

#[derive(Clone, Debug)]
pub struct DecodedGif {
    width: u32,
    height: u32,
    frames: Vec<FramePatch>,
}

impl DecodedGif {
    /// Keeps the frames whose pixel data matches their rect; fails when none do.
    pub fn new(width: u32, height: u32, frames: Vec<FramePatch>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FxError::EmptyScreen);
        }
        let total = frames.len();
        let frames: Vec<_> = frames.into_iter().filter(FramePatch::is_usable).collect();
        if frames.len() < total {
            log::warn!("dropped {} malformed gif frames", total - frames.len());
        }
        if frames.is_empty() {
            return Err(FxError::NoFrames);
        }
        Ok(Self {
            width,
            height,
            frames,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let mut decoder = options.read_info(bytes)?;
        let (width, height) = (u32::from(decoder.width()), u32::from(decoder.height()));

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame()? {
            frames.push(FramePatch::new(
                Rect::new(
                    u32::from(frame.left),
                    u32::from(frame.top),
                    u32::from(frame.width),
                    u32::from(frame.height),
                ),
                u32::from(frame.delay) * DELAY_UNIT_MS,
                frame.dispose.into(),
                frame.buffer.to_vec(),
            ));
        }
        log::debug!("decoded gif {width}x{height} with {} frames", frames.len());
        Self::new(width, height, frames)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frames(&self) -> &[FramePatch] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<FramePatch> {
        self.frames
    }
}
