//! Scrolling train animation shown while long-running steps execute.
//!
//! A [`TrainAnimation`] renders the locomotive scene in place every tick,
//! with a status line underneath, and hands the terminal back with a single
//! success or failure line when stopped.
//!
//! Ticks run on a Tokio task. State and terminal share one mutex that is
//! never held across an await, and `stop` cancels the task while holding
//! it, so no frame is drawn after `stop` returns.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::art::Scene;
use super::terminal::{terminal_width, CrosstermTerminal, Terminal, DEFAULT_WIDTH};

/// Time between rendered frames.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Columns the train advances per tick.
pub const SCROLL_STEP: usize = 3;

/// Extra columns scrolled past the left edge before the cycle restarts.
pub const WRAP_MARGIN: usize = 10;

const STATUS_GLYPH: &str = "🚂";

/// Screen columns taken by the status prefix: two spaces, the glyph (two
/// columns wide) and a space.
const STATUS_PREFIX_COLUMNS: usize = 5;

/// Lifecycle of an animation. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet started.
    Idle,
    /// Rendering on every tick.
    Running,
    /// Finished; the final line has been printed.
    Stopped,
}

#[derive(Debug)]
struct AnimationState {
    indices: Vec<usize>,
    position: usize,
    message: String,
    phase: Phase,
    rendered_lines: usize,
}

struct Inner<T> {
    state: AnimationState,
    terminal: T,
    scene: Scene,
    width: usize,
    ticker: Option<JoinHandle<()>>,
}

/// Build the lines for one frame.
///
/// Each art line is shifted by `width - position` columns: padded on the left
/// while the train is still entering, cut on the left once it has scrolled
/// past the edge, then clipped to `width`. A blank separator and the status
/// line follow; the message is cut so the status line never wraps.
pub fn compose_frame(
    scene: &Scene,
    indices: &[usize],
    position: usize,
    width: usize,
    message: &str,
) -> Vec<String> {
    let offset = width as i64 - position as i64;
    let mut lines = Vec::with_capacity(scene.height() + 2);

    for (i, set) in scene.sets().iter().enumerate() {
        let frame = set.frame(indices.get(i).copied().unwrap_or(0));
        for row in 0..set.height() {
            let line = frame.get(row).copied().unwrap_or("");
            lines.push(shift_line(line, offset, width));
        }
    }

    lines.push(String::new());
    let message: String = message
        .chars()
        .take(width.saturating_sub(STATUS_PREFIX_COLUMNS))
        .collect();
    lines.push(format!("  {STATUS_GLYPH} {message}"));
    lines
}

fn shift_line(line: &str, offset: i64, width: usize) -> String {
    if offset > 0 {
        std::iter::repeat(' ')
            .take(offset as usize)
            .chain(line.chars())
            .take(width)
            .collect()
    } else {
        line.chars()
            .skip(offset.unsigned_abs() as usize)
            .take(width)
            .collect()
    }
}

fn final_line(success: bool, message: &str) -> String {
    if success {
        format!("\x1b[32m✔\x1b[0m {message}")
    } else {
        format!("\x1b[31m✖\x1b[0m {message}")
    }
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "terminal write failed");
    }
}

impl<T: Terminal> Inner<T> {
    /// Lines written per render: every art line plus separator and status.
    fn frame_height(&self) -> usize {
        self.scene.height() + 2
    }

    fn wrap_threshold(&self) -> usize {
        self.width + self.scene.content_width() + WRAP_MARGIN
    }

    fn erase(&mut self, count: usize) {
        let terminal = &mut self.terminal;
        report((0..count).try_for_each(|_| {
            terminal.move_cursor_up(1)?;
            terminal.clear_line()
        }));
    }

    fn write(&mut self, lines: &[String]) {
        report(self.terminal.write_lines(lines));
        report(self.terminal.flush());
    }

    /// Blank lines written then erased so later redraws don't scroll
    /// earlier output away.
    fn reserve(&mut self) {
        let blank = vec![String::new(); self.frame_height()];
        self.write(&blank);
        self.erase(blank.len());
    }

    fn tick(&mut self) {
        let lines = compose_frame(
            &self.scene,
            &self.state.indices,
            self.state.position,
            self.width,
            &self.state.message,
        );

        self.erase(self.state.rendered_lines);
        self.write(&lines);
        self.state.rendered_lines = lines.len();

        for (index, set) in self.state.indices.iter_mut().zip(self.scene.sets()) {
            *index = (*index + 1) % set.len().max(1);
        }
        self.state.position += SCROLL_STEP;
        if self.state.position > self.wrap_threshold() {
            self.state.position = 0;
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_ticks<T: Terminal + 'static>(inner: Arc<Mutex<Inner<T>>>, period: Duration) {
    let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;
        let mut inner = lock(&inner);
        if inner.state.phase != Phase::Running {
            break;
        }
        inner.tick();
    }
}

/// A scrolling ASCII train with a status line, drawn in place.
///
/// Construct one per long-running step, `start` it, and always `stop` it on
/// every exit path so the cursor is restored.
///
/// # Example
///
/// ```ignore
/// let train = TrainAnimation::new("Cloning template foo/bar...");
/// train.start();
/// match do_work().await {
///     Ok(()) => train.stop(true, "Template cloned successfully!"),
///     Err(_) => train.stop(false, "Failed to clone template"),
/// }
/// ```
pub struct TrainAnimation<T: Terminal + 'static = CrosstermTerminal<io::Stdout>> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl TrainAnimation {
    /// Create an animation on stdout, sampling the terminal width now.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_terminal(message, CrosstermTerminal::stdout(), terminal_width())
    }
}

impl<T: Terminal + 'static> TrainAnimation<T> {
    /// Create an animation drawing to the given terminal at a fixed width.
    ///
    /// A width of zero is treated as unknown and replaced by the default.
    pub fn with_terminal(message: impl Into<String>, terminal: T, width: usize) -> Self {
        let scene = Scene::train();
        let state = AnimationState {
            indices: vec![0; scene.sets().len()],
            position: 0,
            message: message.into(),
            phase: Phase::Idle,
            rendered_lines: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                terminal,
                scene,
                width: if width == 0 { DEFAULT_WIDTH } else { width },
                ticker: None,
            })),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        lock(&self.inner).state.phase
    }

    /// Whether frames are currently being drawn.
    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Current status message.
    pub fn message(&self) -> String {
        lock(&self.inner).state.message.clone()
    }

    /// Position at which the scroll cycle restarts from zero.
    pub fn wrap_threshold(&self) -> usize {
        lock(&self.inner).wrap_threshold()
    }

    /// Start drawing. Does nothing unless the animation is idle.
    ///
    /// Ticks are scheduled on the current Tokio runtime. Without one the
    /// animation still reserves its space and honours `stop`, it just never
    /// draws a frame.
    pub fn start(&self) {
        let mut inner = lock(&self.inner);
        if inner.state.phase != Phase::Idle {
            return;
        }

        report(inner.terminal.hide_cursor());
        inner.reserve();
        inner.state.phase = Phase::Running;

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let task = run_ticks(Arc::clone(&self.inner), TICK_INTERVAL);
                inner.ticker = Some(runtime.spawn(task));
            }
            Err(_) => tracing::debug!("no Tokio runtime, train animation will not tick"),
        }
    }

    /// Replace the status message. Shown from the next tick.
    pub fn update_message(&self, message: impl Into<String>) {
        lock(&self.inner).state.message = message.into();
    }

    /// Stop drawing and print the final result line.
    ///
    /// Does nothing unless the animation is running.
    pub fn stop(&self, success: bool, message: &str) {
        let mut inner = lock(&self.inner);
        if inner.state.phase != Phase::Running {
            return;
        }

        inner.cancel_ticker();
        inner.state.phase = Phase::Stopped;

        let rendered = std::mem::take(&mut inner.state.rendered_lines);
        inner.erase(rendered);
        report(inner.terminal.show_cursor());
        inner.write(&[final_line(success, message)]);
    }

    #[cfg(test)]
    fn force_tick(&self) {
        lock(&self.inner).tick();
    }

    #[cfg(test)]
    fn position(&self) -> usize {
        lock(&self.inner).state.position
    }

    #[cfg(test)]
    fn indices(&self) -> Vec<usize> {
        lock(&self.inner).state.indices.clone()
    }
}

impl<T: Terminal + 'static> Drop for TrainAnimation<T> {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        if inner.state.phase != Phase::Running {
            return;
        }
        // Dropped without stop: clear the frame and give the cursor back.
        inner.cancel_ticker();
        inner.state.phase = Phase::Stopped;
        let rendered = std::mem::take(&mut inner.state.rendered_lines);
        inner.erase(rendered);
        report(inner.terminal.show_cursor());
        report(inner.terminal.flush());
    }
}
