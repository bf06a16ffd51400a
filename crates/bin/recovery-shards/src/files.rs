//! share and phrase files
//!
//! a share file holds one `0x<identifier>: <phrase>` line per share. split
//! writes either one file per share into a directory, or every share into a
//! single file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use shards::{MnemonicCodec, MnemonicShare, ShareCodec};
use tracing::{debug, info};

/// read a bare phrase from a file, rejecting lines that carry an identifier
pub fn read_phrase<M: MnemonicCodec>(codec: &ShareCodec<M>, path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read mnemonic file {}", path.display()))?;
    let line = codec.parse_line(&content)?;
    if let Some(identifier) = line.identifier {
        bail!("unexpected identifier in mnemonic file: {}", identifier);
    }
    Ok(line.phrase)
}

/// read every share line of a file
pub fn read_shares_from_file<M: MnemonicCodec>(
    codec: &ShareCodec<M>,
    path: &Path,
) -> Result<Vec<MnemonicShare>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read share file {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            codec
                .decode_line(line)
                .with_context(|| format!("{}:{}: invalid share line", path.display(), n + 1))
        })
        .collect()
}

/// read shares from every regular file in a directory, in file name order
pub fn read_shares_from_dir<M: MnemonicCodec>(
    codec: &ShareCodec<M>,
    dir: &Path,
) -> Result<Vec<MnemonicShare>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut shares = Vec::new();
    for file in files {
        debug!(file = %file.display(), "reading shares");
        shares.extend(read_shares_from_file(codec, &file)?);
    }
    Ok(shares)
}

/// read shares from a file or a directory
pub fn read_shares<M: MnemonicCodec>(
    codec: &ShareCodec<M>,
    path: &Path,
) -> Result<Vec<MnemonicShare>> {
    let meta = fs::metadata(path)
        .with_context(|| format!("failed to read path {}", path.display()))?;
    if meta.is_dir() {
        read_shares_from_dir(codec, path)
    } else {
        read_shares_from_file(codec, path)
    }
}

/// where split output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// one `share_<identifier>.txt` per share
    Directory(PathBuf),
    /// all shares in one file
    File(PathBuf),
}

impl OutputTarget {
    /// a trailing separator or an existing directory means directory output
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches(['/', '\\']);
        let is_dir = trimmed.len() != path.len() || Path::new(path).is_dir();
        if is_dir {
            let dir = if trimmed.is_empty() { path } else { trimmed };
            OutputTarget::Directory(PathBuf::from(dir))
        } else {
            OutputTarget::File(PathBuf::from(path))
        }
    }
}

/// write shares, returning the files written
pub fn write_shares(shares: &[MnemonicShare], target: &OutputTarget) -> Result<Vec<PathBuf>> {
    match target {
        OutputTarget::Directory(dir) => {
            create_private_dir(dir)?;
            let mut written = Vec::with_capacity(shares.len());
            for share in shares {
                let path = dir.join(share_file_name(share));
                write_private(&path, &format!("{}\n", share))?;
                written.push(path);
            }
            info!(count = written.len(), dir = %dir.display(), "saved shares");
            Ok(written)
        }
        OutputTarget::File(path) => {
            let content: String = shares.iter().map(|s| format!("{}\n", s)).collect();
            write_private(path, &content)?;
            info!(count = shares.len(), file = %path.display(), "saved shares");
            Ok(vec![path.clone()])
        }
    }
}

/// `share_<identifier-hex>.txt`
pub fn share_file_name(share: &MnemonicShare) -> String {
    format!("share_{}.txt", share.identifier_hex().trim_start_matches("0x"))
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

fn write_private(path: &Path, content: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to write share file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to write share file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "goose apple ecology ill reduce poem wish olive guitar health run chimney limb village nice dismiss razor meat property try talent toward clever cherry";

    fn shares(tags: &[u8]) -> Vec<MnemonicShare> {
        let codec = ShareCodec::default();
        let entropy = codec.mnemonic().decode(SECRET).unwrap();
        tags.iter()
            .map(|&tag| {
                let mut raw = entropy.clone();
                raw.push(tag);
                codec.encode_from_raw(&raw).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_output_target() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().to_str().unwrap();

        assert_eq!(
            OutputTarget::from_path("out/"),
            OutputTarget::Directory(PathBuf::from("out"))
        );
        assert_eq!(
            OutputTarget::from_path(existing),
            OutputTarget::Directory(PathBuf::from(existing))
        );
        assert_eq!(
            OutputTarget::from_path("shares.txt"),
            OutputTarget::File(PathBuf::from("shares.txt"))
        );
    }

    #[test]
    fn test_directory_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("shares");
        let shares = shares(&[0x01, 0x02, 0xff]);

        let written = write_shares(&shares, &OutputTarget::Directory(out.clone())).unwrap();
        assert_eq!(written.len(), 3);
        assert!(out.join(share_file_name(&shares[2])).exists());

        let read = read_shares(&ShareCodec::default(), &out).unwrap();
        assert_eq!(read, shares);
    }

    #[test]
    fn test_file_roundtrip_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.txt");
        let shares = shares(&[0x10, 0x20]);

        write_shares(&shares, &OutputTarget::File(path.clone())).unwrap();
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("\n   \n");
        fs::write(&path, content).unwrap();

        assert_eq!(read_shares(&ShareCodec::default(), &path).unwrap(), shares);
    }

    #[cfg(unix)]
    #[test]
    fn test_share_files_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.txt");
        write_shares(&shares(&[0x01]), &OutputTarget::File(path.clone())).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_share_lines_need_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.txt");
        fs::write(&path, SECRET).unwrap();
        let err = read_shares(&ShareCodec::default(), &path).unwrap_err();
        assert!(format!("{:#}", err).contains("no identifier"));
    }

    #[test]
    fn test_read_phrase() {
        let codec = ShareCodec::default();
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("phrase.txt");
        fs::write(&path, format!("{}\n", SECRET)).unwrap();
        assert_eq!(read_phrase(&codec, &path).unwrap(), SECRET);

        let tagged = dir.path().join("tagged.txt");
        fs::write(&tagged, shares(&[0x01])[0].to_string()).unwrap();
        let err = read_phrase(&codec, &tagged).unwrap_err();
        assert!(err.to_string().contains("unexpected identifier"));

        let bad = dir.path().join("bad.txt");
        fs::write(&bad, "not a valid mnemonic").unwrap();
        assert!(read_phrase(&codec, &bad).is_err());
    }
}
