/// Core module for PPI dataset processing
///
/// This module contains the interaction counting used by `stats` and the
/// external annotation tool driver used by `annotate`.

pub mod annotate;
pub mod stats;
