//! Program line sanitizer
//!
//! Final clean-up pass over a generated program. Each [`LineProcessor`]
//! maps one line to zero or more lines; the [`LineSanitizer`] chains them.

use serde::{Deserialize, Serialize};

/// Column limit applied when no dialect overrides it
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Options for a [`LineSanitizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Drop a leading motion word repeated from the previous line
    pub collapse_motion_words: bool,
    /// Hard wrap longer lines at word boundaries
    pub max_line_length: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            collapse_motion_words: true,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// State carried between lines of one program
#[derive(Debug, Default, Clone)]
pub struct SanitizerState {
    /// Leading motion word of the last motion line, if still in effect
    pub last_motion: Option<String>,
}

/// One step of the sanitizer pipeline
pub trait LineProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn process(&self, line: &str, state: &mut SanitizerState) -> Vec<String>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Removes blank lines and surrounding whitespace
#[derive(Debug, Clone, Default)]
pub struct EmptyLineRemover;

impl LineProcessor for EmptyLineRemover {
    fn name(&self) -> &str {
        "empty_line_remover"
    }

    fn description(&self) -> &str {
        "Removes blank lines"
    }

    fn process(&self, line: &str, _state: &mut SanitizerState) -> Vec<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            vec![]
        } else {
            vec![trimmed.to_string()]
        }
    }
}

/// Drops a leading `G0`..`G3` word identical to the previous motion line's
#[derive(Debug, Clone)]
pub struct MotionWordCollapser {
    enabled: bool,
}

impl MotionWordCollapser {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn leading_motion_word(line: &str) -> Option<&str> {
        let word = line.split_whitespace().next()?;
        let code = word.strip_prefix('G')?;
        match code.parse::<u32>() {
            Ok(0..=3) => Some(word),
            _ => None,
        }
    }

    fn continues_motion(line: &str) -> bool {
        matches!(line.chars().next(), Some('X' | 'Y' | 'Z' | 'A' | 'F'))
    }
}

impl LineProcessor for MotionWordCollapser {
    fn name(&self) -> &str {
        "motion_word_collapser"
    }

    fn description(&self) -> &str {
        "Removes motion words repeated on consecutive lines"
    }

    fn process(&self, line: &str, state: &mut SanitizerState) -> Vec<String> {
        if let Some(word) = Self::leading_motion_word(line) {
            let rest = line[word.len()..].trim_start();
            let repeated = state.last_motion.as_deref() == Some(word);
            state.last_motion = Some(word.to_string());
            if repeated && !rest.is_empty() {
                return vec![rest.to_string()];
            }
        } else if !Self::continues_motion(line) {
            state.last_motion = None;
        }
        vec![line.to_string()]
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Hard-wraps lines longer than a column limit
///
/// Code lines split on spaces, and a single word longer than the limit is
/// broken across lines. Comment-only lines are re-wrapped so each piece
/// stays a complete comment. Motion blocks are never split, since one move
/// must stay one block.
#[derive(Debug, Clone)]
pub struct LineWrapper {
    max_length: usize,
}

impl LineWrapper {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(8),
        }
    }

    fn split_words(text: &str, max_length: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for part in text.split(' ').filter(|p| !p.is_empty()) {
            if !current.is_empty() && current.len() + 1 + part.len() <= max_length {
                current.push(' ');
                current.push_str(part);
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = part.chars().collect();
            let mut pieces = chars.chunks(max_length).map(|c| c.iter().collect::<String>());
            // all but the last piece are full
            let mut tail = pieces.next().unwrap_or_default();
            for piece in pieces {
                lines.push(std::mem::replace(&mut tail, piece));
            }
            current = tail;
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn is_motion_block(line: &str) -> bool {
        MotionWordCollapser::leading_motion_word(line).is_some()
            || MotionWordCollapser::continues_motion(line)
    }
}

impl LineProcessor for LineWrapper {
    fn name(&self) -> &str {
        "line_wrapper"
    }

    fn description(&self) -> &str {
        "Splits long lines at word boundaries"
    }

    fn process(&self, line: &str, _state: &mut SanitizerState) -> Vec<String> {
        if line.len() <= self.max_length || Self::is_motion_block(line) {
            return vec![line.to_string()];
        }

        if let Some(inner) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
            return Self::split_words(inner, self.max_length - 2)
                .into_iter()
                .map(|piece| format!("({})", piece))
                .collect();
        }

        Self::split_words(line, self.max_length)
    }
}

/// Ordered chain of line processors
pub struct LineSanitizer {
    processors: Vec<Box<dyn LineProcessor>>,
}

impl LineSanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self {
            processors: vec![
                Box::new(EmptyLineRemover),
                Box::new(MotionWordCollapser::new(config.collapse_motion_words)),
                Box::new(LineWrapper::new(config.max_line_length)),
            ],
        }
    }

    /// Names of the enabled processors, in order
    pub fn enabled_processors(&self) -> Vec<&str> {
        self.processors
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.name())
            .collect()
    }

    /// Run every enabled processor over the lines
    pub fn sanitize_lines<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current: Vec<String> = lines.into_iter().map(|l| l.as_ref().to_string()).collect();
        for processor in self.processors.iter().filter(|p| p.is_enabled()) {
            let mut state = SanitizerState::default();
            current = current
                .iter()
                .flat_map(|line| processor.process(line, &mut state))
                .collect();
        }
        current
    }

    /// Sanitize a whole program, returning newline-terminated text
    pub fn sanitize(&self, program: &str) -> String {
        let mut out = self.sanitize_lines(program.lines()).join("\n");
        out.push('\n');
        out
    }
}

impl Default for LineSanitizer {
    fn default() -> Self {
        Self::new(SanitizerConfig::default())
    }
}
