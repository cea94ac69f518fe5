//! Line-oriented headless front end: one command per line on stdin.

use std::fs;
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use fracview_core::PixelRect;
use fracview_render::export_png;

use crate::display::LogDisplay;
use crate::error::AppError;
use crate::navigation::NavigationController;
use crate::preferences::Preferences;

/// How long `wait` blocks per notification before re-checking the stack.
const WAIT_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Zoom(PixelRect),
    Out,
    Reset,
    Cancel,
    Resize(i32, i32),
    Wait,
    Save(Option<PathBuf>),
    Status,
    Quit,
}

fn arg<T: FromStr>(line: &str, word: Option<&str>, name: &str) -> crate::Result<T> {
    let command = |reason: String| AppError::Command {
        line: line.to_string(),
        reason,
    };
    let word = word.ok_or_else(|| command(format!("missing {name}")))?;
    word.parse()
        .map_err(|_| command(format!("{name} must be an integer, got `{word}`")))
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> crate::Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let mut words = trimmed.split_whitespace();
        let name = words.next().unwrap_or_default();
        let command = match name {
            "zoom" => {
                let x = arg(trimmed, words.next(), "x")?;
                let y = arg(trimmed, words.next(), "y")?;
                let w = arg(trimmed, words.next(), "width")?;
                let h = arg(trimmed, words.next(), "height")?;
                Self::Zoom(PixelRect::new(x, y, w, h))
            }
            "out" => Self::Out,
            "reset" => Self::Reset,
            "cancel" => Self::Cancel,
            "resize" => {
                let w = arg(trimmed, words.next(), "width")?;
                let h = arg(trimmed, words.next(), "height")?;
                Self::Resize(w, h)
            }
            "wait" => Self::Wait,
            "save" => Self::Save(words.next().map(PathBuf::from)),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::Command {
                    line: trimmed.to_string(),
                    reason: format!("unknown command `{other}`"),
                })
            }
        };
        if let Some(extra) = words.next() {
            return Err(AppError::Command {
                line: trimmed.to_string(),
                reason: format!("unexpected argument `{extra}`"),
            });
        }
        Ok(Some(command))
    }
}

pub struct Shell {
    nav: NavigationController<LogDisplay>,
    prefs: Preferences,
}

impl Shell {
    pub fn new(prefs: Preferences) -> crate::Result<Self> {
        let nav = NavigationController::new(
            prefs.width,
            prefs.height,
            prefs.max_iterations,
            prefs.home,
            prefs.cache_capacity_bytes(),
            LogDisplay::default(),
        )?;
        Ok(Self { nav, prefs })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Run one command. Returns `false` when the shell should stop.
    pub fn execute(&mut self, command: Command) -> crate::Result<bool> {
        self.nav.poll_events();
        match command {
            Command::Zoom(selection) => {
                if self.nav.is_rendering() {
                    info!("Selection is locked while rendering");
                } else {
                    self.nav.zoom_in(selection)?;
                }
            }
            Command::Out => {
                if self.nav.top().has_raster() {
                    self.nav.zoom_out();
                } else {
                    info!("Zoom out ignored while the view is rendering");
                }
            }
            Command::Reset => {
                if self.nav.top().has_raster() {
                    self.nav.reset();
                } else {
                    info!("Reset ignored while the view is rendering");
                }
            }
            Command::Cancel => self.nav.cancel(),
            Command::Resize(width, height) => {
                self.nav.resize(width, height)?;
                self.prefs.width = width;
                self.prefs.height = height;
            }
            Command::Wait => self.wait(),
            Command::Save(path) => self.save(path)?,
            Command::Status => self.status(),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Pump notifications until the top view is on screen or nothing is running.
    pub fn wait(&mut self) {
        loop {
            self.nav.poll_events();
            if self.is_showing_top() {
                return;
            }
            if !self.nav.top().has_raster() && !self.nav.is_rendering() {
                return;
            }
            self.nav.wait_event(WAIT_SLICE);
        }
    }

    fn is_showing_top(&self) -> bool {
        self.nav
            .display()
            .shown()
            .is_some_and(|(view, _)| Arc::ptr_eq(view, self.nav.top()))
    }

    fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let (view, raster) = self.nav.display().shown().ok_or(AppError::NothingToSave)?;
        let path = match path {
            Some(path) => path,
            None => {
                let dir = self.prefs.export_directory();
                fs::create_dir_all(&dir)?;
                dir.join(format!("fracview_{}.png", view.id()))
            }
        };
        export_png(view, raster, &path)?;
        info!("Saved {}", path.display());
        Ok(())
    }

    fn status(&self) {
        let top = self.nav.top();
        let look = top.look();
        let (width, height) = self.nav.size();
        info!(
            depth = self.nav.depth(),
            view = top.id(),
            width,
            height,
            limit = top.limit(),
            rendering = self.nav.is_rendering(),
            cancelable = self.nav.is_cancelable(),
            undo = self.nav.discarded().is_some(),
            cached = self.nav.cache().len(),
            cached_bytes = self.nav.cache().bytes(),
            "Status: [{}, {}] x [{}, {}]",
            look.left,
            look.right,
            look.bottom,
            look.top
        );
    }

    /// Feed every line of `input` to the shell until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> crate::Result<()> {
        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            };
            match self.execute(command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => warn!("{e}"),
            }
        }
        Ok(())
    }
}
