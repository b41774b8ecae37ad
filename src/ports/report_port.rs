//! Report output port.

use crate::domain::error::SmacrossError;
use crate::domain::pipeline::PipelineResult;

/// Port for writing pipeline results.
pub trait ReportPort {
    fn write(&self, result: &PipelineResult, output_path: &str) -> Result<(), SmacrossError>;
}
