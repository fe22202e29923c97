//! ASCII art for the train animation.
//!
//! Holds the locomotive and smoke frame tables, plus the [`FrameSet`] and
//! [`Scene`] types that the renderer walks each tick.

/// Locomotive body frames. Only the wheel row changes between frames.
pub static TRAIN_FRAMES: &[&[&str]] = &[
    &[
        "      ====        ________                ___________",
        "  _D _|  |_______/        \\__I_I_____===__|_________|",
        "   |(_)---  |   H\\________/ |   |        =|___ ___|",
        "   /     |  |   H  |  |     |   |         ||_| |_||",
        "  |      |  |   H  |__--------------------| [___] |",
        "  | ________|___H__/__|_____/[][]~\\_______|       |",
        "  |/ |   |-----------I_____I [][] []  D   |=======|__",
        "__/ =| o |=-~~\\  /~~\\  /~~\\  /~~\\ ____Y___________|__",
        " \\_/      \\__/  \\__/  \\__/  \\__/      \\_/",
    ],
    &[
        "      ====        ________                ___________",
        "  _D _|  |_______/        \\__I_I_____===__|_________|",
        "   |(_)---  |   H\\________/ |   |        =|___ ___|",
        "   /     |  |   H  |  |     |   |         ||_| |_||",
        "  |      |  |   H  |__--------------------| [___] |",
        "  | ________|___H__/__|_____/[][]~\\_______|       |",
        "  |/ |   |-----------I_____I [][] []  D   |=======|__",
        "__/ =| o |=-~~\\  /~~\\  /~~\\  /~~\\ ____Y___________|__",
        " \\_/      \\O/  \\O/  \\O/  \\O/      \\_/",
    ],
];

/// Smoke puffs drifting above the chimney.
pub static SMOKE_FRAMES: &[&[&str]] = &[
    &["                (  ) (@@) ( )  (@)  ()    @@    O     @     O     @      O"],
    &["             (@@@)       (    )      (@@@)   ()      @    ()     @     ()"],
    &["         (   )      (@@@@)     (  )    @@     ()      @    ()     @      @"],
    &["      (@@)              (@@@)           O        ()     @      ()    @"],
];

/// A named sequence of frames that cycles independently of other sets.
#[derive(Debug, Clone, Copy)]
pub struct FrameSet {
    name: &'static str,
    frames: &'static [&'static [&'static str]],
}

impl FrameSet {
    /// Create a frame set from a static frame table.
    pub const fn new(name: &'static str, frames: &'static [&'static [&'static str]]) -> Self {
        Self { name, frames }
    }

    /// Name of the set, e.g. "smoke".
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of frames in the set.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the set has no frames at all.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get a frame by index.
    ///
    /// The index wraps around the frame count, so callers can increment
    /// without bound. An empty set yields an empty frame.
    pub fn frame(&self, index: usize) -> &'static [&'static str] {
        if self.frames.is_empty() {
            return &[];
        }
        self.frames[index % self.frames.len()]
    }

    /// Number of screen lines this set occupies: its tallest frame.
    pub fn height(&self) -> usize {
        self.frames.iter().map(|f| f.len()).max().unwrap_or(0)
    }

    /// Widest line across all frames, in characters.
    pub fn width(&self) -> usize {
        self.frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Frame sets in top-to-bottom render order.
#[derive(Debug, Clone)]
pub struct Scene {
    sets: Vec<FrameSet>,
}

impl Scene {
    /// Build a scene from frame sets, rendered in the given order.
    pub fn new(sets: Vec<FrameSet>) -> Self {
        Self { sets }
    }

    /// The locomotive scene: smoke on top, train body below.
    pub fn train() -> Self {
        Self::new(vec![
            FrameSet::new("smoke", SMOKE_FRAMES),
            FrameSet::new("train", TRAIN_FRAMES),
        ])
    }

    /// Frame sets in render order.
    pub fn sets(&self) -> &[FrameSet] {
        &self.sets
    }

    /// Total art lines per render, excluding the separator and status line.
    pub fn height(&self) -> usize {
        self.sets.iter().map(FrameSet::height).sum()
    }

    /// Widest line across every set.
    pub fn content_width(&self) -> usize {
        self.sets.iter().map(FrameSet::width).max().unwrap_or(0)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::train()
    }
}
