// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Sample manifests for exercising `update-version` end to end.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use tracing::info;

use crate::error::{self, Error};

/// Version written into every sample manifest.
pub const DUMMY_VERSION: &str = "1.2.310";

const UNITY_PACKAGE: &str = r#"{
  "name": "com.unity.plugin.example",
  "version": "1.2.310",
  "displayName": "Package Example Plugin",
  "description": "This is an example package",
  "unity": "2019.1",
  "unityRelease": "0b5",
  "dependencies": {
    "com.unity.example": "1.0.0"
  },
  "keywords": [
    "keyword1",
    "keyword2",
    "keyword3"
  ],
  "author": {
    "name": "Unity",
    "email": "unity@example.com",
    "url": "https://www.unity3d.com"
  }
}
"#;

const GODOT_PLUGIN: &str = r#"[plugin]
name="Sandbox.Godot"
description="Sample."
author="Cysharp"
version="1.2.310"
language="C-sharp"
script="GodotPlugin.cs"
"#;

const DIRECTORY_BUILD_PROPS: &str = "<Project>
  <PropertyGroup>
    <VersionPrefix>1.2.310</VersionPrefix>
  </PropertyGroup>
</Project>
";

const FILES: [(&str, &str); 3] = [
    ("package.json", UNITY_PACKAGE),
    ("plugin.cfg", GODOT_PLUGIN),
    ("Directory.Build.props", DIRECTORY_BUILD_PROPS)
];

/// Writes one manifest of every supported kind under `base`.
///
/// The directory is created when missing and existing files are
/// overwritten. Returns the written paths.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory or a file cannot be written.
pub fn create(base: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(base).map_err(|source| error::io_error(base, source))?;

    let mut written = Vec::with_capacity(FILES.len());
    for (name, contents) in FILES {
        let path = base.join(name);
        let file = File::create(&path).map_err(|source| error::io_error(&path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| error::io_error(&path, source))?;

        info!("Created {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::manifest::ManifestKind;

    #[test]
    fn creates_valid_manifests_in_new_directory() {
        let dir = tempdir().expect("failed to create tempdir");
        let base = dir.path().join("dummy/nested");

        let written = create(&base).expect("create");

        assert_eq!(written.len(), 3);
        for path in written {
            let contents = fs::read_to_string(&path).expect("read");
            let kind = ManifestKind::from_path(&path).expect("supported manifest");
            kind.validate(&contents, DUMMY_VERSION).expect("valid dummy manifest");
        }
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("plugin.cfg"), "stale").expect("write");

        create(dir.path()).expect("create");

        let contents = fs::read_to_string(dir.path().join("plugin.cfg")).expect("read");
        assert_eq!(contents, GODOT_PLUGIN);
    }
}
