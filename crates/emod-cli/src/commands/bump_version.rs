use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use emod_core::errors::{EmodError, ErrorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpLevel {
    Patch,
    Minor,
    Major,
}

#[derive(Args, Debug)]
pub struct BumpVersionArgs {
    /// Cargo manifest whose package version is rewritten.
    #[arg(long, default_value = "Cargo.toml")]
    pub manifest: PathBuf,
    /// Which version component to bump.
    #[arg(long, value_enum, default_value = "patch")]
    pub level: BumpLevel,
}

pub fn run(args: &BumpVersionArgs) -> Result<(), EmodError> {
    let raw = fs::read_to_string(&args.manifest).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("bump-read", "failed to read manifest")
                .with_context("path", args.manifest.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    let mut bumped = None;
    let mut lines: Vec<String> = Vec::with_capacity(raw.lines().count());
    for line in raw.lines() {
        if bumped.is_none() {
            if let Some(next) = rewrite_version_line(line, args.level)? {
                bumped = Some(next.1);
                lines.push(next.0);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    let new_version = bumped.ok_or_else(|| {
        EmodError::Argument(
            ErrorInfo::new("bump-no-version", "manifest has no version = \"x.y.z\" line")
                .with_context("path", args.manifest.display().to_string()),
        )
    })?;

    let mut output = lines.join("\n");
    if raw.ends_with('\n') {
        output.push('\n');
    }
    fs::write(&args.manifest, output).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("bump-write", "failed to write manifest")
                .with_context("path", args.manifest.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    log::info!("bumped {} to {new_version}", args.manifest.display());
    Ok(())
}

/// Rewrites the first `version = "x.y.z"` line. Returns the replacement line
/// and the new version, or `None` when the line is not a version assignment.
fn rewrite_version_line(line: &str, level: BumpLevel) -> Result<Option<(String, String)>, EmodError> {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix("version") else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('=') else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('"') else {
        return Ok(None);
    };
    let Some(end) = rest.find('"') else {
        return Ok(None);
    };
    let current = &rest[..end];

    let mut parts = current.split('.');
    let (major, minor, patch) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), Some(patch), None) => {
            let parse = |part: &str| {
                part.parse::<u64>().map_err(|_| {
                    EmodError::Argument(
                        ErrorInfo::new("bump-bad-version", "version is not semver x.y.z")
                            .with_context("version", current),
                    )
                })
            };
            (parse(major)?, parse(minor)?, parse(patch)?)
        }
        _ => return Ok(None),
    };

    let next = match level {
        BumpLevel::Patch => format!("{major}.{minor}.{}", patch + 1),
        BumpLevel::Minor => format!("{major}.{}.0", minor + 1),
        BumpLevel::Major => format!("{}.0.0", major + 1),
    };
    let indent = &line[..line.len() - trimmed.len()];
    Ok(Some((format!("{indent}version = \"{next}\""), next)))
}

#[cfg(test)]
mod tests {
    use super::{rewrite_version_line, run, BumpLevel, BumpVersionArgs};
    use tempfile::tempdir;

    #[test]
    fn bumps_patch() {
        let (line, version) = rewrite_version_line("version = \"1.2.3\"", BumpLevel::Patch)
            .unwrap()
            .unwrap();
        assert_eq!(version, "1.2.4");
        assert_eq!(line, "version = \"1.2.4\"");
    }

    #[test]
    fn bumps_minor_resets_patch() {
        let (_, version) = rewrite_version_line("version = \"1.2.3\"", BumpLevel::Minor)
            .unwrap()
            .unwrap();
        assert_eq!(version, "1.3.0");
    }

    #[test]
    fn bumps_major_resets_rest() {
        let (_, version) = rewrite_version_line("version = \"1.2.3\"", BumpLevel::Major)
            .unwrap()
            .unwrap();
        assert_eq!(version, "2.0.0");
    }

    #[test]
    fn ignores_dependency_versions() {
        assert!(rewrite_version_line("serde = { version = \"1.0\" }", BumpLevel::Patch)
            .unwrap()
            .is_none());
    }

    #[test]
    fn rejects_non_numeric_version() {
        assert!(rewrite_version_line("version = \"1.2.x\"", BumpLevel::Patch).is_err());
    }

    #[test]
    fn run_rewrites_the_manifest_in_place() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("Cargo.toml");
        std::fs::write(
            &manifest,
            concat!(
                "[package]\n",
                "name = \"demo\"\n",
                "version = \"0.3.1\"\n",
                "\n",
                "[dependencies]\n",
                "serde = { version = \"1.0\" }\n",
            ),
        )
        .expect("write manifest");

        run(&BumpVersionArgs {
            manifest: manifest.clone(),
            level: BumpLevel::Minor,
        })
        .expect("bump");

        let rewritten = std::fs::read_to_string(&manifest).expect("read back");
        assert!(rewritten.contains("version = \"0.4.0\""));
        // dependency version specs are untouched
        assert!(rewritten.contains("serde = { version = \"1.0\" }"));
        assert!(rewritten.ends_with('\n'));
    }

    #[test]
    fn run_fails_without_a_package_version() {
        let dir = tempdir().expect("tempdir");
        let manifest = dir.path().join("Cargo.toml");
        std::fs::write(&manifest, "[package]\nname = \"demo\"\n").expect("write manifest");

        let err = run(&BumpVersionArgs {
            manifest,
            level: BumpLevel::Patch,
        })
        .unwrap_err();
        assert_eq!(err.code(), "bump-no-version");
    }
}
