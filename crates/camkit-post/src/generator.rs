//! Program generation
//!
//! [`ProgramGenerator`] composes a complete program from toolpaths and
//! their operations through a [`Dialect`]:
//!
//! 1. dialect header
//! 2. per toolpath: tool change, spindle on, optional coolant, rapid to the
//!    first point plus safety height, plunge at the tool's plunge feed,
//!    cutting moves at the operation feed, rapid retract, spindle off,
//!    coolant off
//! 3. dialect footer
//!
//! The result is sanitized with the dialect's line rules. Generation is
//! all-or-nothing: any error discards the partial program.

use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, info};

use camkit_core::{
    MachineSetup, Operation, Point3, PostError, SpindleDirection, Tool, Toolpath, Units,
};

use crate::dialect::{Dialect, DialectKind};
use crate::sanitizer::LineSanitizer;

/// A contiguous run of points cut with one operation's parameters
struct Segment<'a> {
    operation: Option<&'a Operation>,
    points: &'a [Point3],
}

/// Builds machine programs in one dialect
pub struct ProgramGenerator {
    dialect: Box<dyn Dialect>,
    setup: MachineSetup,
    tools: HashMap<u32, Tool>,
}

impl ProgramGenerator {
    pub fn new(dialect: Box<dyn Dialect>, setup: MachineSetup) -> Self {
        Self {
            dialect,
            setup,
            tools: HashMap::new(),
        }
    }

    /// Generator for a named dialect
    pub fn for_kind(kind: DialectKind, setup: MachineSetup) -> Self {
        Self::new(kind.build(), setup)
    }

    /// Tool records looked up by toolpath tool number
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.tools = tools.into_iter().map(|t| (t.id, t)).collect();
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn setup(&self) -> &MachineSetup {
        &self.setup
    }

    /// Units the program will be written in
    pub fn program_units(&self) -> Units {
        self.dialect.resolve_units(self.setup.units)
    }

    /// Encode toolpaths and their operations into program text
    pub fn generate(
        &self,
        toolpaths: &[Toolpath],
        operations: &[Operation],
    ) -> Result<String, PostError> {
        if toolpaths.iter().all(Toolpath::is_empty) {
            return Err(PostError::EmptyToolpath);
        }

        let units = self.program_units();
        let requested = self.setup.units.unwrap_or(units);
        let safety = Units::convert(self.setup.safety_height, requested, units);

        let mut lines = self.dialect.header(&self.setup, units);
        for toolpath in toolpaths.iter().filter(|t| !t.is_empty()) {
            let ops: Vec<&Operation> = operations
                .iter()
                .filter(|op| op.toolpath_id == toolpath.id)
                .collect();
            let segments = segments(toolpath, &ops)?;
            self.emit_toolpath(&mut lines, toolpath, &segments, units, safety)?;
        }
        lines.extend(self.dialect.footer(&self.setup));

        let program = LineSanitizer::new(self.dialect.sanitizer()).sanitize_lines(lines);
        info!(
            "{} program generated: {} toolpaths, {} lines",
            self.dialect.name(),
            toolpaths.len(),
            program.len()
        );

        let mut text = program.join("\n");
        text.push('\n');
        Ok(text)
    }

    fn tool_for(&self, toolpath: &Toolpath) -> Tool {
        self.tools
            .get(&toolpath.tool_number)
            .cloned()
            .unwrap_or_else(|| Tool {
                id: toolpath.tool_number,
                description: format!("Tool {}", toolpath.tool_number),
                ..Tool::default()
            })
    }

    fn emit_toolpath(
        &self,
        lines: &mut Vec<String>,
        toolpath: &Toolpath,
        segments: &[Segment<'_>],
        units: Units,
        safety: f64,
    ) -> Result<(), PostError> {
        let d = self.dialect.as_ref();
        let tool = self.tool_for(toolpath);
        let first_op = segments.iter().find_map(|s| s.operation);
        let convert = |p: &Point3| -> Result<Point3, PostError> {
            let p = p.convert(toolpath.units, units);
            match [p.x, p.y, p.z].into_iter().find(|v| !within_limit(*v)) {
                Some(value) => Err(PostError::CoordinateOutOfRange {
                    toolpath: toolpath.id.to_string(),
                    value,
                }),
                None => Ok(p),
            }
        };
        let feed_of = |op: Option<&Operation>| {
            let feed = op.and_then(|o| o.feedrate).unwrap_or(tool.feedrate);
            Units::convert(feed, toolpath.units, units)
        };
        let plunge_feed = Units::convert(tool.plunge_rate, toolpath.units, units);

        let speed = first_op.and_then(|o| o.spindle_speed).unwrap_or(tool.rpm);
        let direction = first_op
            .map(|o| o.spindle_direction)
            .unwrap_or(SpindleDirection::Clockwise);
        let coolant = segments
            .iter()
            .filter_map(|s| s.operation)
            .find_map(|o| o.coolant);

        lines.extend(d.tool_change(&tool));
        lines.push(d.spindle_on(speed, direction));
        if let Some(kind) = coolant {
            lines.push(d.coolant_on(kind));
        }

        let retract_every = d.retract_every().filter(|n| *n > 0);
        let mut active_feed: Option<f64> = None;
        let mut set_feed = |lines: &mut Vec<String>, feed: f64| {
            if active_feed.is_none_or(|f| (f - feed).abs() > f64::EPSILON) {
                lines.push(d.feedrate_command(feed));
                active_feed = Some(feed);
            }
        };
        let mut last: Option<Point3> = None;

        for (index, segment) in segments.iter().enumerate() {
            let start = convert(&segment.points[0])?;
            let mut skip = 0;
            match last {
                None => {
                    lines.push(d.rapid_move(start.x, start.y, start.z + safety));
                    set_feed(lines, plunge_feed);
                    lines.push(d.linear_move(start.x, start.y, start.z));
                    skip = 1;
                }
                Some(prev) if retract_every.is_some_and(|n| index % n == 0) => {
                    debug!("Forced retract before operation {}", index);
                    lines.push(d.rapid_move(prev.x, prev.y, prev.z + safety));
                    lines.push(d.rapid_move(start.x, start.y, start.z + safety));
                    set_feed(lines, plunge_feed);
                    lines.push(d.linear_move(start.x, start.y, start.z));
                    skip = 1;
                }
                Some(_) => {}
            }

            let feed = feed_of(segment.operation);
            for point in &segment.points[skip..] {
                let p = convert(point)?;
                set_feed(lines, feed);
                lines.push(d.linear_move(p.x, p.y, p.z));
            }
            if let Some(end) = segment.points.last() {
                last = Some(convert(end)?);
            }
        }

        if let Some(end) = last {
            lines.push(d.rapid_move(end.x, end.y, end.z + safety));
        }
        lines.push(d.spindle_off());
        if coolant.is_some() {
            lines.push(d.coolant_off());
        }
        Ok(())
    }
}

/// Largest coordinate magnitude written into a program block
///
/// Keeps every motion block on one line under the column limit.
pub const MAX_COORDINATE: f64 = 1e9;

fn within_limit(value: f64) -> bool {
    value.is_finite() && value.abs() < MAX_COORDINATE
}

/// Split a toolpath into the segments its operations select
fn segments<'a>(
    toolpath: &'a Toolpath,
    operations: &[&'a Operation],
) -> Result<Vec<Segment<'a>>, PostError> {
    if operations.is_empty() {
        return Ok(vec![Segment {
            operation: None,
            points: &toolpath.points,
        }]);
    }

    let mut segments = Vec::with_capacity(operations.len());
    for op in operations {
        let span: Range<usize> = op.span.clone().unwrap_or(0..toolpath.len());
        if span.start >= span.end || span.end > toolpath.len() {
            return Err(PostError::SpanOutOfRange {
                operation: op.name.clone(),
                toolpath: toolpath.id.to_string(),
                start: span.start,
                end: span.end,
                len: toolpath.len(),
            });
        }
        segments.push(Segment {
            operation: Some(op),
            points: &toolpath.points[span],
        });
    }
    Ok(segments)
}
