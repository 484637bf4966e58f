//! Running one destination job: read the sources, build the sprite, write
//! the sprite and (optionally) its demo page.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Options;
use crate::demo::{build_demo, demo_path};
use crate::error::SvgstoreError;
use crate::sprite::SpriteBuilder;
use crate::symbol::icon_id_from_path;

/// Source files merged into one destination sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub sources: Vec<PathBuf>,
    pub dest: PathBuf,
}

/// What a job wrote.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub sprite_path: PathBuf,
    pub demo_path: Option<PathBuf>,
    /// Public ids of the symbols written, in order
    pub icons: Vec<String>,
}

impl Job {
    pub fn new(sources: Vec<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            dest: dest.into(),
        }
    }

    /// Build a job from source patterns, resolved against `base_dir`.
    ///
    /// Patterns with glob metacharacters expand to their sorted matches.
    /// Plain paths are kept as written even when they do not exist, so the
    /// job can report them as missing.
    pub fn expand(
        patterns: &[String],
        dest: &Path,
        base_dir: &Path,
    ) -> Result<Self, SvgstoreError> {
        // The base directory is matched literally, only the pattern globs
        let glob_base = PathBuf::from(glob::Pattern::escape(&base_dir.to_string_lossy()));

        let mut sources = Vec::new();
        for pattern in patterns {
            if glob::Pattern::escape(pattern) == *pattern {
                sources.push(base_dir.join(pattern));
                continue;
            }
            let full = glob_base.join(pattern);
            for entry in glob::glob(&full.to_string_lossy())? {
                sources.push(entry.map_err(|e| e.into_error())?);
            }
        }
        Ok(Self::new(sources, base_dir.join(dest)))
    }
}

/// Run one job.
///
/// Every source is processed before anything is written: a malformed icon
/// fails the whole job and leaves no sprite behind. Missing sources are
/// skipped with a warning.
pub fn run_job(job: &Job, options: &Options) -> Result<JobReport, SvgstoreError> {
    let mut builder = SpriteBuilder::new(options);

    for source in &job.sources {
        if !source.is_file() {
            warn!("File \"{}\" not found.", source.display());
            continue;
        }
        let content = fs::read_to_string(source).map_err(|e| SvgstoreError::Icon {
            path: source.clone(),
            source: Box::new(e.into()),
        })?;
        builder
            .add_icon(&icon_id_from_path(source), &content)
            .map_err(|e| SvgstoreError::Icon {
                path: source.clone(),
                source: Box::new(e),
            })?;
    }

    let sprite = builder.finish();
    let svg = sprite.to_svg()?;
    let demo = if options.include_demo {
        Some((
            demo_path(&job.dest, options),
            build_demo(&sprite, &job.dest, options)?,
        ))
    } else {
        None
    };

    write_file(&job.dest, &svg)?;
    info!("File {} created.", job.dest.display());

    let demo_path = match demo {
        Some((path, html)) => {
            write_file(&path, &html)?;
            info!("Demo file {} created.", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(JobReport {
        sprite_path: job.dest.clone(),
        demo_path,
        icons: sprite.icons().to_vec(),
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), SvgstoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_keeps_literal_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("b.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let job = Job::expand(
            &["*.svg".to_string(), "missing.svg".to_string()],
            Path::new("out/sprite.svg"),
            dir.path(),
        )
        .unwrap();

        assert_eq!(
            job.sources,
            [
                dir.path().join("a.svg"),
                dir.path().join("b.svg"),
                dir.path().join("missing.svg"),
            ]
        );
        assert_eq!(job.dest, dir.path().join("out/sprite.svg"));
    }

    #[test]
    fn test_malformed_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.svg");
        let bad = dir.path().join("bad.svg");
        fs::write(&good, "<svg><path/></svg>").unwrap();
        fs::write(&bad, "<svg><path></svg>").unwrap();

        let dest = dir.path().join("sprite.svg");
        let job = Job::new(vec![good, bad], &dest);
        let err = run_job(&job, &Options::default()).unwrap_err();
        assert!(err.to_string().contains("bad.svg"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_expand_base_dir_is_not_a_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("icons[1]");
        fs::create_dir(&base).unwrap();
        fs::write(base.join("a.svg"), "<svg/>").unwrap();

        let job = Job::expand(&["*.svg".to_string()], Path::new("sprite.svg"), &base).unwrap();
        assert_eq!(job.sources, [base.join("a.svg")]);
        assert_eq!(job.dest, base.join("sprite.svg"));
    }

    #[test]
    fn test_unreadable_source_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let latin1 = dir.path().join("latin1.svg");
        fs::write(&latin1, [0xff, 0xfe, 0x00]).unwrap();

        let dest = dir.path().join("sprite.svg");
        let job = Job::new(vec![latin1], &dest);
        let err = run_job(&job, &Options::default()).unwrap_err();
        assert!(matches!(err, SvgstoreError::Icon { .. }));
        assert!(err.to_string().contains("latin1.svg"));
        assert!(!dest.exists());
    }
}
