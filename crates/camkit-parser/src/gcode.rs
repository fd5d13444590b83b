//! G-Code parser and modal state tracking
//!
//! Turns program text into [`Toolpath`]s. Each line is split into words
//! (`<letter><value>`) which are applied in order to a [`GcodeState`]:
//! motion words start a pending move, axis words overwrite single fields of
//! the last position, and `T`/`M30`/unit switches close the active toolpath.
//!
//! Parsing never fails. A malformed numeric field keeps its previous value
//! and is reported through [`ParsedProgram::warnings`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, info};

use camkit_core::{Point3, Toolpath, Units};

/// G codes that consume axis words without moving along a toolpath
const NON_MOTION_CODES: [u32; 6] = [4, 10, 28, 30, 53, 92];

/// Parser options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Close the active toolpath on `M30`
    pub m30_closes_toolpath: bool,
    /// Tool number in effect before the first `T` word
    pub initial_tool: u32,
    /// Machine-specific G codes treated as motion in addition to `G0`..`G3`
    pub machine_motion_codes: Vec<u32>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            m30_closes_toolpath: true,
            initial_tool: 1,
            machine_motion_codes: vec![73, 81, 82, 83],
        }
    }
}

/// A field that could not be parsed and was ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// The offending word as written (upper-cased)
    pub word: String,
}

/// Result of parsing a program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedProgram {
    /// Non-empty toolpaths in program order
    pub toolpaths: Vec<Toolpath>,
    /// Unit mode in effect at end of input
    pub units: Units,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedProgram {
    pub fn point_count(&self) -> usize {
        self.toolpaths.iter().map(Toolpath::len).sum()
    }
}

/// Modal state for G-Code interpretation
///
/// Tracks the modal groups that influence toolpath extraction. Values
/// persist across lines until changed by another word of the same group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GcodeState {
    /// Active motion code (`G0`..`G3` or a machine cycle); `None` after `G80`
    pub motion_mode: Option<u32>,
    /// Distance mode (G90=absolute, G91=incremental)
    pub distance_mode: u8,
    /// Units mode (G20=inches, G21=millimeters)
    pub units: Units,
    /// Tool number (T value)
    pub tool_number: u32,
    /// Current feed rate (F value)
    pub feed_rate: Option<f64>,
    /// Last commanded position
    pub position: Point3,
}

impl Default for GcodeState {
    fn default() -> Self {
        Self {
            motion_mode: None,
            distance_mode: 90, // G90 (absolute)
            units: Units::MM,  // G21
            tool_number: 1,
            feed_rate: None,
            position: Point3::default(),
        }
    }
}

impl GcodeState {
    /// Create a new G-Code state with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_incremental(&self) -> bool {
        self.distance_mode == 91
    }
}

/// Axis words collected for one move
#[derive(Debug, Default, Clone, Copy)]
struct PendingMove {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    a: Option<f64>,
}

impl PendingMove {
    fn has_axes(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some() || self.a.is_some()
    }
}

/// G-Code parser
#[derive(Debug, Clone, Default)]
pub struct GcodeParser {
    config: ParserConfig,
}

impl GcodeParser {
    /// Create a new G-Code parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse program text into toolpaths
    pub fn parse(&self, text: &str) -> ParsedProgram {
        let mut run = ParseRun::new(&self.config);
        for (index, line) in text.lines().enumerate() {
            run.parse_line(index + 1, line);
        }
        let program = run.finish();
        info!(
            "Parsed G-code: {} toolpaths, {} points, {} warnings",
            program.toolpaths.len(),
            program.point_count(),
            program.warnings.len()
        );
        program
    }

    /// Parse with the modal state starting from `state` instead of the defaults
    pub fn parse_from_state(&self, text: &str, state: GcodeState) -> ParsedProgram {
        let mut run = ParseRun::new(&self.config);
        run.active = Toolpath::new(state.tool_number, state.units);
        run.state = state;
        for (index, line) in text.lines().enumerate() {
            run.parse_line(index + 1, line);
        }
        run.finish()
    }
}

/// Remove `( ... )` and `; ...` comments from a G-Code line
pub fn remove_comments(line: &str) -> String {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX
        .get_or_init(|| Regex::new(r"\([^)]*\)?|;.*").expect("invalid regex pattern"));
    regex.replace_all(line, " ").to_string()
}

/// Split a cleaned, upper-cased line into `(letter, value)` words
fn words(line: &str) -> impl Iterator<Item = (char, &str)> {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        WORD_REGEX.get_or_init(|| Regex::new(r"([A-Z])([^A-Z\s]*)").expect("invalid regex pattern"));
    regex.captures_iter(line).filter_map(|caps| {
        let letter = caps.get(1)?.as_str().chars().next()?;
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        Some((letter, value))
    })
}

/// Integer value of a G/M word, `None` for fractional codes like `G61.1`
fn code_number(value: &str) -> Option<u32> {
    let code: f64 = value.parse().ok()?;
    if code < 0.0 || code.fract() != 0.0 {
        return None;
    }
    Some(code as u32)
}

/// Per-call interpreter state
struct ParseRun<'a> {
    config: &'a ParserConfig,
    state: GcodeState,
    active: Toolpath,
    pending: Option<PendingMove>,
    toolpaths: Vec<Toolpath>,
    warnings: Vec<ParseWarning>,
}

impl<'a> ParseRun<'a> {
    fn new(config: &'a ParserConfig) -> Self {
        let state = GcodeState {
            tool_number: config.initial_tool,
            ..GcodeState::default()
        };
        Self {
            config,
            active: Toolpath::new(state.tool_number, state.units),
            state,
            pending: None,
            toolpaths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn is_motion_code(&self, code: u32) -> bool {
        code <= 3 || self.config.machine_motion_codes.contains(&code)
    }

    fn warn(&mut self, line: usize, letter: char, value: &str) {
        debug!("Ignoring malformed word {}{} on line {}", letter, value, line);
        self.warnings.push(ParseWarning {
            line,
            word: format!("{}{}", letter, value),
        });
    }

    fn parse_line(&mut self, line_number: usize, raw: &str) {
        let cleaned = remove_comments(raw).to_uppercase();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return;
        }

        let suppress_motion = words(cleaned).any(|(letter, value)| {
            letter == 'G' && code_number(value).is_some_and(|c| NON_MOTION_CODES.contains(&c))
        });

        for (letter, value) in words(cleaned) {
            match letter {
                'G' => {
                    let Some(code) = code_number(value) else {
                        continue;
                    };
                    self.apply_g_code(code, suppress_motion);
                }
                'X' | 'Y' | 'Z' | 'A' => {
                    let Ok(v) = value.parse::<f64>() else {
                        self.warn(line_number, letter, value);
                        continue;
                    };
                    if suppress_motion {
                        continue;
                    }
                    if self.pending.is_none() && self.state.motion_mode.is_some() {
                        self.pending = Some(PendingMove::default());
                    }
                    if let Some(pending) = self.pending.as_mut() {
                        match letter {
                            'X' => pending.x = Some(v),
                            'Y' => pending.y = Some(v),
                            'Z' => pending.z = Some(v),
                            _ => pending.a = Some(v),
                        }
                    }
                }
                'F' => match value.parse::<f64>() {
                    Ok(feed) => self.state.feed_rate = Some(feed),
                    Err(_) => self.warn(line_number, letter, value),
                },
                'T' => match value.parse::<u32>() {
                    Ok(tool) => {
                        self.flush_pending();
                        self.close_active();
                        self.state.tool_number = tool;
                        self.active = Toolpath::new(tool, self.state.units);
                    }
                    Err(_) => self.warn(line_number, letter, value),
                },
                'M' => {
                    if code_number(value) == Some(30) && self.config.m30_closes_toolpath {
                        self.flush_pending();
                        self.close_active();
                        self.active = Toolpath::new(self.state.tool_number, self.state.units);
                    }
                }
                _ => {}
            }
        }

        self.flush_pending();
    }

    fn apply_g_code(&mut self, code: u32, suppress_motion: bool) {
        match code {
            20 | 21 => {
                self.flush_pending();
                self.state.units = if code == 20 { Units::INCH } else { Units::MM };
                if self.active.units != self.state.units {
                    if self.active.is_empty() {
                        self.active.units = self.state.units;
                    } else {
                        self.close_active();
                        self.active = Toolpath::new(self.state.tool_number, self.state.units);
                    }
                }
            }
            90 | 91 => self.state.distance_mode = code as u8,
            80 => {
                self.flush_pending();
                self.state.motion_mode = None;
            }
            c if self.is_motion_code(c) => {
                self.flush_pending();
                self.state.motion_mode = Some(c);
                if !suppress_motion {
                    self.pending = Some(PendingMove::default());
                }
            }
            _ => {}
        }
    }

    /// Resolve the pending move against the last position and append it
    fn flush_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if !pending.has_axes() {
            return;
        }

        let incremental = self.state.is_incremental();
        let resolve = |last: f64, word: Option<f64>| -> f64 {
            match word {
                Some(v) if incremental => last + v,
                Some(v) => v,
                None => last,
            }
        };

        let last = self.state.position;
        let a = match pending.a {
            Some(v) if incremental => Some(last.a.unwrap_or(0.0) + v),
            Some(v) => Some(v),
            None => last.a,
        };
        let point = Point3 {
            x: resolve(last.x, pending.x),
            y: resolve(last.y, pending.y),
            z: resolve(last.z, pending.z),
            a,
            feed_rate: self.state.feed_rate,
        };
        self.state.position = point;
        self.active.points.push(point);
    }

    /// Emit the active toolpath if it has points; empty ones are discarded
    fn close_active(&mut self) {
        if self.active.is_empty() {
            return;
        }
        let closed = std::mem::replace(
            &mut self.active,
            Toolpath::new(self.state.tool_number, self.state.units),
        );
        debug!(
            "Closed toolpath T{} with {} points",
            closed.tool_number,
            closed.len()
        );
        self.toolpaths.push(closed);
    }

    fn finish(mut self) -> ParsedProgram {
        self.flush_pending();
        self.close_active();
        ParsedProgram {
            toolpaths: self.toolpaths,
            units: self.state.units,
            warnings: self.warnings,
        }
    }
}
