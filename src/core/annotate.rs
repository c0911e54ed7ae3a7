/// GO annotation of PPI network files
///
/// Annotation is delegated to the go2ppi Java tool, which looks up every protein of a
/// network file on UniProt and writes the GO terms to a sibling `.anno` file.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{debug, info};

use crate::config::AnnotateConfig;

/// Errors raised while running the annotation tool
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// The tool could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran but reported failure
    #[error("Annotation of {} failed ({status})", .network.display())]
    Failed { network: PathBuf, status: ExitStatus },
}

/// Runs the go2ppi annotation tool on network files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotator {
    /// Java launcher
    pub java: String,
    /// Classpath entry holding the tool
    pub jar: PathBuf,
    /// Entry point inside the jar
    pub main_class: String,
    /// Extension of network files, without the dot
    pub input_extension: String,
    /// Extension of annotation files, without the dot
    pub output_extension: String,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::from_config(&AnnotateConfig::default())
    }
}

impl Annotator {
    /// Create an annotator from the `annotate` configuration section
    pub fn from_config(config: &AnnotateConfig) -> Self {
        Self {
            java: config.java.clone(),
            jar: PathBuf::from(&config.jar),
            main_class: config.main_class.clone(),
            input_extension: config.input_extension.clone(),
            output_extension: config.output_extension.clone(),
        }
    }

    /// Path of the annotation file written for `network`.
    ///
    /// The input extension is swapped for the output extension. Files with any
    /// other extension keep it and get the output extension appended.
    pub fn annotation_path(&self, network: &Path) -> PathBuf {
        let has_input_extension = network
            .extension()
            .map(|ext| ext.to_string_lossy() == self.input_extension.as_str())
            .unwrap_or(false);

        if has_input_extension {
            network.with_extension(&self.output_extension)
        } else {
            let mut name: OsString = network.as_os_str().to_os_string();
            name.push(".");
            name.push(&self.output_extension);
            PathBuf::from(name)
        }
    }

    /// Build the tool invocation for one network file
    pub fn command(&self, network: &Path) -> Command {
        let mut command = Command::new(&self.java);
        command
            .arg("-cp")
            .arg(&self.jar)
            .arg(&self.main_class)
            .arg(network)
            .arg(self.annotation_path(network));
        command
    }

    /// Render the invocation as a single line for display
    pub fn command_line(&self, network: &Path) -> String {
        let command = self.command(network);
        let mut parts = vec![command.get_program().to_string_lossy().to_string()];
        parts.extend(command.get_args().map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.to_string()
            }
        }));
        parts.join(" ")
    }

    /// Annotate a network file, waiting for the tool to finish.
    ///
    /// The tool inherits this process's stdio, so its output goes straight to the
    /// terminal.
    ///
    /// # Returns
    ///
    /// Path of the annotation file on success
    pub fn annotate(&self, network: &Path) -> Result<PathBuf, AnnotateError> {
        info!("Annotating {}", network.display());
        debug!("Running: {}", self.command_line(network));

        let status = self
            .command(network)
            .status()
            .map_err(|e| AnnotateError::Spawn {
                program: self.java.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(AnnotateError::Failed {
                network: network.to_path_buf(),
                status,
            });
        }

        Ok(self.annotation_path(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_path() {
        let annotator = Annotator::default();
        assert_eq!(
            annotator.annotation_path(Path::new("yeast.ppi")),
            PathBuf::from("yeast.anno")
        );
        assert_eq!(
            annotator.annotation_path(Path::new("nets/hs.v2.ppi")),
            PathBuf::from("nets/hs.v2.anno")
        );
        assert_eq!(
            annotator.annotation_path(Path::new("yeast.txt")),
            PathBuf::from("yeast.txt.anno")
        );
    }

    #[test]
    fn test_command_arguments() {
        let annotator = Annotator::default();
        let command = annotator.command(Path::new("my net.ppi"));

        assert_eq!(command.get_program(), "java");
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-cp",
                "go2ppi.jar",
                "au.edu.imb.go2ppi.Id2go",
                "my net.ppi",
                "my net.anno",
            ]
        );
    }

    #[test]
    fn test_command_line_quotes_spaces() {
        let annotator = Annotator::default();
        assert_eq!(
            annotator.command_line(Path::new("my net.ppi")),
            "java -cp go2ppi.jar au.edu.imb.go2ppi.Id2go \"my net.ppi\" \"my net.anno\""
        );
    }

    #[test]
    fn test_missing_launcher() {
        let annotator = Annotator {
            java: "ppi-tools-no-such-launcher".to_string(),
            ..Annotator::default()
        };
        match annotator.annotate(Path::new("x.ppi")) {
            Err(AnnotateError::Spawn { program, .. }) => {
                assert_eq!(program, "ppi-tools-no-such-launcher")
            }
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status() {
        let ok = Annotator {
            java: "true".to_string(),
            ..Annotator::default()
        };
        assert_eq!(
            ok.annotate(Path::new("x.ppi")).unwrap(),
            PathBuf::from("x.anno")
        );

        let failing = Annotator {
            java: "false".to_string(),
            ..Annotator::default()
        };
        assert!(matches!(
            failing.annotate(Path::new("x.ppi")),
            Err(AnnotateError::Failed { .. })
        ));
    }
}
