use anyhow::Context;
use log::debug;
use std::{
    io::{BufRead, BufReader, Lines},
    path::Path,
};
use tank_level::{Channel, ChannelReader, ReadError};

/// One line of input: the raw electrical level of each channel, channel 0 first.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    Levels(Vec<bool>),
    Malformed { line: usize, character: char },
}

impl Frame {
    fn parse(line: usize, text: &str) -> Option<Self> {
        let text = text.split('#').next().unwrap_or_default();

        let mut levels = Vec::new();
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '0' => levels.push(false),
                '1' => levels.push(true),
                character => return Some(Self::Malformed { line, character }),
            }
        }

        if levels.is_empty() {
            None
        } else {
            Some(Self::Levels(levels))
        }
    }
}

/// Plays back input frames as channel readings, one frame per sampling cycle.
///
/// Frames are read as they are needed, so a live stream on stdin is followed
/// rather than buffered to the end.
pub(crate) struct ReplayReader {
    lines: Lines<Box<dyn BufRead>>,
    line: usize,
    frame_number: usize,
    frame: Option<Frame>,
}

impl ReplayReader {
    /// Opens a frame file, or standard input for `-`.
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new("-") {
            Ok(Self::new(std::io::stdin().lock()))
        } else {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Self::new(BufReader::new(file)))
        }
    }

    pub(crate) fn new<R: BufRead + 'static>(reader: R) -> Self {
        let reader: Box<dyn BufRead> = Box::new(reader);

        Self {
            lines: reader.lines(),
            line: 0,
            frame_number: 0,
            frame: None,
        }
    }

    /// Reads up to the next frame, returning false once the input is exhausted.
    pub(crate) fn advance(&mut self) -> anyhow::Result<bool> {
        for text in self.lines.by_ref() {
            let text = text.context("Failed to read input")?;
            self.line += 1;

            if let Some(frame) = Frame::parse(self.line, &text) {
                self.frame = Some(frame);
                self.frame_number += 1;
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// 1-based number of the current frame.
    pub(crate) fn frame_number(&self) -> usize {
        self.frame_number
    }
}

impl ChannelReader for ReplayReader {
    fn read_channel(&mut self, channel: &Channel) -> Result<bool, ReadError> {
        match &self.frame {
            Some(Frame::Levels(levels)) => levels
                .get(channel.id().index())
                .map(|high| channel.polarity().is_active(*high))
                .ok_or(ReadError::Unavailable(channel.id())),
            Some(Frame::Malformed { line, character }) => {
                debug!("Line {line} has unexpected character {character:?}");
                Err(ReadError::HardwareFault(channel.id()))
            }
            None => Err(ReadError::Unavailable(channel.id())),
        }
    }
}
