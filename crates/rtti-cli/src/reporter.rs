use crate::driver::Verdict;
use colored::Colorize;

/// Renders verdicts for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, verdict: &Verdict) -> String {
        match verdict {
            Verdict::Conforms => self.paint_ok("ok"),
            Verdict::Compatible => self.paint_ok("compatible"),
            Verdict::Incompatible => self.paint_error("incompatible"),
            Verdict::Violation(message) => {
                let (first, rest) = match message.split_once('\n') {
                    Some((first, rest)) => (first, Some(rest)),
                    None => (message.as_str(), None),
                };
                let mut out = self.paint_error(first);
                if let Some(rest) = rest {
                    out.push('\n');
                    out.push_str(rest);
                }
                out
            }
            Verdict::Printed(text) => text.clone(),
        }
    }

    fn paint_ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
