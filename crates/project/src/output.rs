use std::cell::RefCell;
use std::rc::Rc;

use lsldetails_core::{HostResult, OutputSink, OutputWindow};

/// Output window keeping every pane's lines in memory.
/// 將各窗格輸出保存在記憶體中的輸出視窗。
#[derive(Debug, Default, Clone)]
pub struct MemoryOutput {
    panes: Rc<RefCell<Vec<(String, Rc<RefCell<Vec<String>>>)>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written to the pane with `caption`, empty when it was never acquired.
    pub fn lines(&self, caption: &str) -> Vec<String> {
        self.panes
            .borrow()
            .iter()
            .find(|(name, _)| name == caption)
            .map(|(_, lines)| lines.borrow().clone())
            .unwrap_or_default()
    }

    pub fn pane_count(&self) -> usize {
        self.panes.borrow().len()
    }
}

struct MemoryPane {
    lines: Rc<RefCell<Vec<String>>>,
}

impl OutputSink for MemoryPane {
    fn write_line(&self, text: &str) -> HostResult<()> {
        self.lines.borrow_mut().push(text.to_string());
        Ok(())
    }
}

impl OutputWindow for MemoryOutput {
    fn acquire_pane(&self, caption: &str) -> HostResult<Box<dyn OutputSink>> {
        let mut panes = self.panes.borrow_mut();
        let lines = match panes.iter().find(|(name, _)| name == caption) {
            Some((_, lines)) => Rc::clone(lines),
            None => {
                let lines = Rc::new(RefCell::new(Vec::new()));
                panes.push((caption.to_string(), Rc::clone(&lines)));
                lines
            }
        };
        Ok(Box::new(MemoryPane { lines }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panes_are_shared_by_caption() {
        let output = MemoryOutput::new();
        output.acquire_pane("General").unwrap().write_line("a").unwrap();
        output.acquire_pane("General").unwrap().write_line("b").unwrap();
        output.acquire_pane("Build").unwrap().write_line("c").unwrap();

        assert_eq!(output.lines("General"), vec!["a", "b"]);
        assert_eq!(output.lines("Build"), vec!["c"]);
        assert!(output.lines("Debug").is_empty());
        assert_eq!(output.pane_count(), 2);
    }
}
