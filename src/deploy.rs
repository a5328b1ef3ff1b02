//! Contract deployment artifacts
//!
//! The launcher suite is deployed from compiled solc artifacts checked in
//! under the configured artifacts directory. Only the bytecode object is
//! consumed; ABI encoding of constructor arguments happens in code via
//! `SolValue`.

use crate::error::{Error, Result};
use alloy::primitives::{Address, Bytes};
use serde::Deserialize;
use std::path::Path;

/// Launcher contract artifact, relative to the artifacts directory
pub const LAUNCHER_ARTIFACT: &str = "Beeper.sol/Beeper.json";
/// Liquidity locker artifact
pub const LOCKER_ARTIFACT: &str = "LpLockerv2.sol/LpLockerv2.json";
/// Launcher util artifact
pub const UTIL_ARTIFACT: &str = "Util.sol/Util.json";

/// Addresses produced by a full launcher-suite deployment
///
/// Returned to the caller instead of being written into shared
/// configuration; adopt via `Engine::record_deployment` if the process
/// should use them for subsequent calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentResult {
    pub launcher: Address,
    pub locker: Address,
    pub util: Address,
}

/// A compiled contract artifact (solc JSON output)
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    bytecode: BytecodeObject,
}

#[derive(Debug, Deserialize)]
struct BytecodeObject {
    object: String,
}

impl ContractArtifact {
    /// Load an artifact JSON file
    pub fn load(artifacts_dir: &Path, name: &str) -> Result<Self> {
        let path = artifacts_dir.join(name);
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::Artifact(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Artifact(format!("{}: {}", path.display(), e)))
    }

    /// Deployment init code: bytecode followed by ABI-encoded constructor args
    pub fn init_code(&self, constructor_args: &[u8]) -> Result<Bytes> {
        let object = self.bytecode.object.trim();
        let object = object.strip_prefix("0x").unwrap_or(object);
        let mut code = alloy::hex::decode(object)
            .map_err(|e| Error::Artifact(format!("bytecode is not hex: {}", e)))?;
        if code.is_empty() {
            return Err(Error::Artifact("artifact has empty bytecode".to_string()));
        }
        code.extend_from_slice(constructor_args);
        Ok(Bytes::from(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolValue;
    use std::io::Write;

    fn artifact(bytecode: &str) -> ContractArtifact {
        ContractArtifact {
            bytecode: BytecodeObject {
                object: bytecode.to_string(),
            },
        }
    }

    #[test]
    fn test_init_code_appends_constructor_args() {
        let artifact = artifact("0x6080604052");
        let args = (Address::repeat_byte(0x11), Address::repeat_byte(0x22)).abi_encode_params();

        let code = artifact.init_code(&args).unwrap();
        assert_eq!(&code[..5], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(code.len(), 5 + 64);
        // Encoded addresses are left-padded to 32 bytes
        assert_eq!(&code[5 + 12..5 + 32], Address::repeat_byte(0x11).as_slice());
    }

    #[test]
    fn test_init_code_accepts_unprefixed_bytecode() {
        assert_eq!(
            artifact("6080").init_code(&[]).unwrap(),
            artifact("0x6080").init_code(&[]).unwrap()
        );
    }

    #[test]
    fn test_empty_or_bad_bytecode_rejected() {
        assert!(matches!(
            artifact("").init_code(&[]),
            Err(Error::Artifact(_))
        ));
        assert!(matches!(
            artifact("0xzz").init_code(&[]),
            Err(Error::Artifact(_))
        ));
    }

    #[test]
    fn test_load_parses_solc_shape() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Beeper.sol");
        std::fs::create_dir_all(&nested).unwrap();
        let mut file = std::fs::File::create(nested.join("Beeper.json")).unwrap();
        write!(
            file,
            r#"{{"abi": [], "bytecode": {{"object": "0x60806040", "sourceMap": ""}}}}"#
        )
        .unwrap();

        let artifact = ContractArtifact::load(dir.path(), LAUNCHER_ARTIFACT).unwrap();
        assert_eq!(artifact.init_code(&[]).unwrap().len(), 4);
    }

    #[test]
    fn test_load_missing_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ContractArtifact::load(dir.path(), UTIL_ARTIFACT),
            Err(Error::Artifact(_))
        ));
    }
}
