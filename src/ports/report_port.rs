//! Report generation port trait.

use crate::domain::error::AipError;
use crate::domain::simulation::{SimulationConfig, SimulationResult};
use std::path::Path;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        config: &SimulationConfig,
        output_path: &Path,
    ) -> Result<(), AipError>;
}
