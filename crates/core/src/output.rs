use once_cell::unsync::OnceCell;
use tracing::warn;

use crate::error::HostResult;
use crate::host::{OutputSink, OutputWindow};

/// Caption of the pane the report is written to.
pub const DEFAULT_PANE_CAPTION: &str = "Lightweight solution load";

/// Output pane acquired from the host on first use and reused afterwards.
/// A failed acquisition is retried on the next write.
/// 首次寫入時才向主機取得的輸出窗格，之後重複使用。
pub struct OutputPane<W: OutputWindow> {
    window: W,
    caption: String,
    pane: OnceCell<Box<dyn OutputSink>>,
}

impl<W: OutputWindow> OutputPane<W> {
    pub fn new(window: W, caption: impl Into<String>) -> Self {
        Self {
            window,
            caption: caption.into(),
            pane: OnceCell::new(),
        }
    }

    pub fn is_acquired(&self) -> bool {
        self.pane.get().is_some()
    }

    pub fn write_line(&self, text: &str) -> HostResult<()> {
        let pane = self
            .pane
            .get_or_try_init(|| self.window.acquire_pane(&self.caption))?;
        pane.activate();
        pane.write_line(text)
    }

    /// Writes every line, logging failures instead of returning them.
    /// Returns how many lines reached the pane.
    pub fn write_all<I, S>(&self, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut written = 0;
        for line in lines {
            match self.write_line(line.as_ref()) {
                Ok(()) => written += 1,
                Err(err) => warn!(pane = %self.caption, error = %err, "report line dropped"),
            }
        }
        written
    }
}
