// crates/matdoc-cli/src/commands/mod.rs
//
// Command module declarations and shared helpers for the matdoc CLI.

pub mod build;
pub mod describe;
pub mod validate;

use std::fs;
use std::path::Path;

use matdoc_core::ValidationConfig;
use serde::de::DeserializeOwned;

use crate::error::CliError;
use crate::output::OutputFormat;

/// Settings shared by every command after config and flags are merged.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputFormat,
    pub validation: ValidationConfig,
}

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::io::Write;

    use matdoc_core::{Element, Lattice, Site, Structure};

    pub fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    pub fn rock_salt() -> Structure {
        let fcc = [
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
        ];
        let mut sites: Vec<Site> = fcc.iter().map(|p| Site::new(Element::Na, *p)).collect();
        sites.extend(fcc.iter().map(|p| Site::new(Element::Cl, [p[0] + 0.5, p[1], p[2]])));
        Structure::new(Lattice::cubic(5.64), sites)
    }

    pub fn structure_file() -> tempfile::NamedTempFile {
        write_temp(&serde_json::to_string(&rock_salt()).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::write_temp;
    use super::*;
    use matdoc_core::Structure;

    #[test]
    fn read_json_reports_path_on_bad_input() {
        let file = write_temp("{ not json");
        let err = read_json::<Structure>(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn read_json_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Structure>(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
