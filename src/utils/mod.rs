/// Utility modules for ppi_tools
///
/// This module contains utility functions for locating dataset files and
/// formatting or exporting results.

pub mod file_utils;
pub mod output_formatter;
