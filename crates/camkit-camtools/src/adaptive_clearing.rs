//! Adaptive clearing toolpath generator
//!
//! Clears a rectangular stock volume layer by layer. Each layer is a
//! boustrophedon raster of cuts parallel to Y, spaced by a fixed fraction of
//! the tool diameter. Even layers step X from `min.x` towards `max.x`, odd
//! layers from `max.x` back towards `min.x`.

use tokio::task::JoinHandle;
use tracing::{debug, info};

use camkit_core::{
    BoundingBox, CamToolError, GeneratedToolpath, Material, Operation, OperationKind, Point3,
    Tool, Toolpath, Units,
};

/// Lateral engagement as a fraction of the tool diameter
pub const ADAPTIVE_STEPOVER_RATIO: f64 = 0.4;

/// Slack applied when comparing generated coordinates against the bounds
const EPSILON: f64 = 1e-9;

/// Derived cutting parameters for a generation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearingParameters {
    pub stepover: f64,
    pub stepdown: f64,
    pub feedrate: f64,
}

impl ClearingParameters {
    /// Compute stepover, stepdown and feed for a tool cutting a material
    pub fn for_tool(tool: &Tool, material: &Material) -> Self {
        Self {
            stepover: tool.diameter * ADAPTIVE_STEPOVER_RATIO,
            stepdown: tool.stepdown,
            feedrate: tool.flutes as f64 * material.feed_per_tooth * tool.rpm,
        }
    }
}

/// Builder and runner for adaptive clearing
#[derive(Debug, Clone, Default)]
pub struct AdaptiveClearingGenerator {
    bounds: Option<BoundingBox>,
    tool: Option<Tool>,
    material: Option<Material>,
    units: Units,
}

impl AdaptiveClearingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Unit system of the bounds and tool dimensions (default mm)
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Generate the clearing toolpath
    ///
    /// Returns one toolpath holding every cut in machining order and one
    /// `Cut` operation per row spanning that row's two points.
    pub fn generate(&self) -> Result<GeneratedToolpath, CamToolError> {
        let bounds = self
            .bounds
            .ok_or_else(|| CamToolError::MissingParameter("bounds".to_string()))?;
        let tool = self
            .tool
            .as_ref()
            .ok_or_else(|| CamToolError::MissingParameter("tool".to_string()))?;
        let material = self
            .material
            .as_ref()
            .ok_or_else(|| CamToolError::MissingParameter("material".to_string()))?;

        let params = ClearingParameters::for_tool(tool, material);
        validate(&bounds, &params)?;

        let mut toolpath = Toolpath::new(tool.id, self.units);
        let mut operations = Vec::new();

        for (layer, z) in layer_heights(&bounds, params.stepdown).enumerate() {
            let rows = row_positions(&bounds, params.stepover, layer % 2 == 1);
            debug!("Layer {} at z={:.4}: {} rows", layer, z, rows.len());

            for x in rows {
                let start = toolpath.points.len();
                toolpath
                    .points
                    .push(Point3::new(x, bounds.min.y, z).with_feed_rate(params.feedrate));
                toolpath
                    .points
                    .push(Point3::new(x, bounds.max.y, z).with_feed_rate(params.feedrate));

                operations.push(
                    Operation::new(OperationKind::Cut, toolpath.id.clone())
                        .with_name(format!("Cut {}", operations.len() + 1))
                        .with_span(start..start + 2)
                        .with_feedrate(params.feedrate),
                );
            }
        }

        info!(
            "Adaptive clearing generated {} cuts ({} points) with T{}",
            operations.len(),
            toolpath.len(),
            tool.id
        );

        Ok(GeneratedToolpath {
            toolpath,
            operations,
        })
    }

    /// Run [`generate`](Self::generate) on the blocking thread pool
    ///
    /// Only the finished result crosses back to the caller.
    pub fn generate_in_background(self) -> JoinHandle<Result<GeneratedToolpath, CamToolError>> {
        tokio::task::spawn_blocking(move || self.generate())
    }
}

fn validate(bounds: &BoundingBox, params: &ClearingParameters) -> Result<(), CamToolError> {
    if params.stepover.is_nan() || params.stepover <= 0.0 {
        return Err(CamToolError::InvalidParameter {
            name: "tool.diameter".to_string(),
            reason: format!("must be positive, got {}", params.stepover / ADAPTIVE_STEPOVER_RATIO),
        });
    }
    if params.stepdown.is_nan() || params.stepdown <= 0.0 {
        return Err(CamToolError::InvalidParameter {
            name: "tool.stepdown".to_string(),
            reason: format!("must be positive, got {}", params.stepdown),
        });
    }
    if !bounds.is_valid() {
        return Err(CamToolError::InvalidParameter {
            name: "bounds".to_string(),
            reason: "max corner lies below min corner".to_string(),
        });
    }
    Ok(())
}

/// `max.z - i * stepdown` for every layer not below `min.z`
fn layer_heights(bounds: &BoundingBox, stepdown: f64) -> impl Iterator<Item = f64> {
    let top = bounds.max.z;
    let floor = bounds.min.z - EPSILON;
    (0u64..)
        .map(move |i| top - i as f64 * stepdown)
        .take_while(move |z| *z >= floor)
}

/// Row X positions for one layer
fn row_positions(bounds: &BoundingBox, stepover: f64, reverse: bool) -> Vec<f64> {
    let (min, max) = (bounds.min.x, bounds.max.x);
    (0u64..)
        .map(|j| {
            let offset = j as f64 * stepover;
            if reverse {
                max - offset
            } else {
                min + offset
            }
        })
        .take_while(|x| *x >= min - EPSILON && *x <= max + EPSILON)
        .collect()
}
