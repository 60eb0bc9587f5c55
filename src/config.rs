//! Saved per-camera configuration.
//!
//! A config file names the camera it belongs to and lists node writes to
//! replay on `init`. The format mirrors the register dumps the rig's setup
//! scripts produce:
//!
//! ```yaml
//! serial: "18085870"
//! init:
//!   - node: AcquisitionFrameRate
//!     value: 30.0
//!   - node: Gain
//!     value: 5.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RigResult;

/// One node write applied during initialization. Order matters; writes are
/// replayed top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCommand {
    pub node: String,
    pub value: f64,
}

/// Contents of one camera's YAML config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Serial the config was saved for. Applying it to a different camera
    /// is an error.
    pub serial: String,
    /// Ordered node writes.
    #[serde(default)]
    pub init: Vec<NodeCommand>,
}

impl CameraConfig {
    pub fn load(path: &Path) -> RigResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_serial_and_ordered_init_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "serial: \"18085870\"\ninit:\n  - node: Gain\n    value: 5.0\n  - node: AcquisitionFrameRate\n    value: 30.0\n"
        )
        .unwrap();
        let config = CameraConfig::load(file.path()).unwrap();
        assert_eq!(config.serial, "18085870");
        assert_eq!(config.init.len(), 2);
        assert_eq!(config.init[0].node, "Gain");
        assert_eq!(config.init[1].value, 30.0);
    }

    #[test]
    fn init_list_is_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "serial: \"18085871\"\n").unwrap();
        let config = CameraConfig::load(file.path()).unwrap();
        assert!(config.init.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CameraConfig::load(Path::new("/nonexistent/cam.yaml")).unwrap_err();
        assert!(matches!(err, crate::error::RigError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "serial: [not a string\n").unwrap();
        let err = CameraConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, crate::error::RigError::Config(_)));
    }
}
