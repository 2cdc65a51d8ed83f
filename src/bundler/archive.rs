//! Deterministic skill archives.
//!
//! An archive is a zip file whose entries are all prefixed with `<name>/`.
//! Entries are written in path order with a fixed timestamp and fixed modes,
//! so the same tree always produces the same bytes.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::core::skill::{Entry, EntryKind, SkillPackage};
use crate::error::{Result, SkillpackError};

/// Mode for directories and executable files.
pub const EXECUTABLE_MODE: u32 = 0o755;
/// Mode for every other file.
pub const REGULAR_MODE: u32 = 0o644;

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub file_count: usize,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the archive bytes.
    pub sha256: String,
}

fn options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(mode)
}

/// Write the archive for `skill` into `temp`, then report its size and digest.
///
/// The caller owns the temp file and decides whether to persist it.
pub fn write_archive(skill: &SkillPackage, temp: NamedTempFile) -> Result<(NamedTempFile, ArchiveSummary)> {
    let prefix = &skill.name;
    let mut writer = ZipWriter::new(temp);
    writer.add_directory(format!("{prefix}/"), options(EXECUTABLE_MODE))?;

    let mut ordered: Vec<(String, &Entry)> = skill
        .entries
        .iter()
        .map(|entry| {
            let name = match entry.kind {
                EntryKind::Directory => format!("{prefix}/{}/", entry.rel_path),
                _ => format!("{prefix}/{}", entry.rel_path),
            };
            (name, entry)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let mut file_count = 0;
    for (name, entry) in ordered {
        match entry.kind {
            EntryKind::Directory => {
                writer.add_directory(name, options(EXECUTABLE_MODE))?;
            }
            EntryKind::File => {
                let mode = if entry.executable { EXECUTABLE_MODE } else { REGULAR_MODE };
                writer.start_file(name.as_str(), options(mode))?;
                let mut source = File::open(skill.root.join(&entry.rel_path))?;
                let copied = io::copy(&mut source, &mut writer)?;
                debug!(entry = %name, bytes = copied, mode = %format!("{mode:o}"), "archived file");
                file_count += 1;
            }
            // Symlinks fail validation before archiving starts.
            EntryKind::Symlink => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("refusing to archive symbolic link '{}'", entry.rel_path),
                )
                .into());
            }
        }
    }

    let mut temp = writer.finish()?;
    temp.flush()?;
    temp.as_file().sync_all()?;

    let file = temp.as_file_mut();
    file.seek(SeekFrom::Start(0))?;
    let mut hasher = Sha256::new();
    let bytes = io::copy(file, &mut hasher)?;

    Ok((
        temp,
        ArchiveSummary {
            file_count,
            bytes,
            sha256: hex::encode(hasher.finalize()),
        },
    ))
}

/// Move a finished temp file onto `target` without replacing anything.
pub fn persist(temp: NamedTempFile, target: &Path) -> Result<()> {
    match temp.persist_noclobber(target) {
        Ok(_) => Ok(()),
        // Dropping the error drops the temp file with it.
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            Err(SkillpackError::OutputExists(target.to_path_buf()))
        }
        Err(err) => Err(err.error.into()),
    }
}

/// Extract `archive` into `dest`, restoring executable bits.
///
/// Returns the paths of the extracted regular files.
pub fn unpack(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let mut extracted = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(rel) = entry.enclosed_name() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("archive entry '{}' escapes the destination", entry.name()),
            )
            .into());
        };
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        set_mode(&out_path, entry.unix_mode())?;
        extracted.push(out_path);
    }

    Ok(extracted)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SkillFixture;

    fn build(fixture: &SkillFixture) -> (PathBuf, ArchiveSummary) {
        let skill = SkillPackage::load(fixture.root()).unwrap();
        let out = fixture.sibling("dist");
        fs::create_dir_all(&out).unwrap();
        let temp = NamedTempFile::new_in(&out).unwrap();
        let (temp, summary) = write_archive(&skill, temp).unwrap();
        let target = out.join("demo.skill");
        persist(temp, &target).unwrap();
        (target, summary)
    }

    #[test]
    fn test_entries_are_prefixed_sorted_and_stamped() {
        let fixture = SkillFixture::new("demo");
        fixture.write_valid_skill();
        fixture.write_script("scripts/run.sh", "#!/bin/sh\n");
        let (archive, summary) = build(&fixture);

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let names: Vec<String> = zip.file_names().map(String::from).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.iter().all(|n| n.starts_with("demo/")));
        assert!(names.contains(&"demo/SKILL.md".to_string()));
        assert!(names.contains(&"demo/references/".to_string()));
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.bytes, fs::metadata(&archive).unwrap().len());

        let script = zip.by_name("demo/scripts/run.sh").unwrap();
        #[cfg(unix)]
        assert_eq!(script.unix_mode().map(|m| m & 0o777), Some(EXECUTABLE_MODE));
        drop(script);
        let doc = zip.by_name("demo/SKILL.md").unwrap();
        assert_eq!(doc.unix_mode().map(|m| m & 0o777), Some(REGULAR_MODE));
    }

    #[test]
    fn test_same_tree_same_digest() {
        let fixture = SkillFixture::new("demo");
        fixture.write_valid_skill();
        let skill = SkillPackage::load(fixture.root()).unwrap();

        let first = write_archive(&skill, NamedTempFile::new().unwrap()).unwrap().1;
        let second = write_archive(&skill, NamedTempFile::new().unwrap()).unwrap().1;
        assert_eq!(first, second);
        assert_eq!(first.sha256.len(), 64);
    }

    #[test]
    fn test_persist_does_not_clobber() {
        let fixture = SkillFixture::new("demo");
        fixture.write_valid_skill();
        let (archive, _) = build(&fixture);
        let before = fs::read(&archive).unwrap();

        let temp = NamedTempFile::new_in(archive.parent().unwrap()).unwrap();
        let temp_path = temp.path().to_path_buf();
        let err = persist(temp, &archive).unwrap_err();
        assert!(matches!(err, SkillpackError::OutputExists(_)));
        assert_eq!(fs::read(&archive).unwrap(), before);
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_unpack_restores_tree() {
        let fixture = SkillFixture::new("demo");
        fixture.write_valid_skill();
        fixture.write_script("scripts/run.sh", "#!/bin/sh\necho ok\n");
        let (archive, _) = build(&fixture);

        let dest = fixture.sibling("unpacked");
        let files = unpack(&archive, &dest).unwrap();
        assert_eq!(files.len(), 3);
        let script = dest.join("demo/scripts/run.sh");
        assert_eq!(fs::read_to_string(&script).unwrap(), "#!/bin/sh\necho ok\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&script).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, EXECUTABLE_MODE);
        }
    }
}
