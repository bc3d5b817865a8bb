//! End-to-end batch pipeline tests: scan, hash, sidecar, archive.

use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use sumpack_core::archive::ArchiveFormat;
use sumpack_core::batch::{BatchOptions, BatchRunner, FailurePolicy};
use sumpack_core::hash::{ChecksumAlgorithm, HashRegistry};

const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";
const HELLO_CKSUM: &str = "3015617425 6";

fn runner() -> BatchRunner {
    BatchRunner::new(HashRegistry::with_builtin())
}

fn options(dir: &Path) -> BatchOptions {
    BatchOptions {
        dir: dir.to_path_buf(),
        extension: "txt".to_string(),
        algorithms: vec![ChecksumAlgorithm::Md5],
        write_sidecars: false,
        archive: None,
        policy: FailurePolicy::FailFast,
    }
}

/// Read back a tar.gz as name -> content.
fn archive_contents(path: &Path) -> BTreeMap<String, String> {
    let file = File::open(path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut contents = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        contents.insert(name, body);
    }
    contents
}

#[test]
fn full_pipeline_sidecars_and_archive() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("report.txt"), b"hello\n").unwrap();

    let mut opts = options(dir.path());
    opts.algorithms = vec![ChecksumAlgorithm::Cksum, ChecksumAlgorithm::Md5];
    opts.write_sidecars = true;
    opts.archive = Some(ArchiveFormat::TarGz);

    let report = runner().run(&opts).unwrap();

    let result = report.checksums("report.txt").unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.get(&ChecksumAlgorithm::Md5).unwrap(), HELLO_MD5);
    assert_eq!(result.get(&ChecksumAlgorithm::Cksum).unwrap(), HELLO_CKSUM);

    let md5_sidecar = dir.path().join("report.txt.md5");
    let cksum_sidecar = dir.path().join("report.txt.cksum");
    assert_eq!(fs::read_to_string(&md5_sidecar).unwrap(), HELLO_MD5);
    assert_eq!(fs::read_to_string(&cksum_sidecar).unwrap(), HELLO_CKSUM);

    let contents = archive_contents(&dir.path().join("report.tar.gz"));
    let names: Vec<&str> = contents.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["report.txt", "report.txt.cksum", "report.txt.md5"]);
    assert_eq!(contents["report.txt"], "hello\n");
    assert_eq!(contents["report.txt.md5"], HELLO_MD5);
    assert_eq!(contents["report.txt.cksum"], HELLO_CKSUM);
}

#[test]
fn archive_excludes_sidecars_from_unrequested_algorithms() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello\n").unwrap();
    // Leftover from some earlier run with a different algorithm set.
    fs::write(dir.path().join("a.txt.cksum"), b"stale").unwrap();

    let mut opts = options(dir.path());
    opts.write_sidecars = true;
    opts.archive = Some(ArchiveFormat::TarGz);

    runner().run(&opts).unwrap();

    let contents = archive_contents(&dir.path().join("a.tar.gz"));
    let names: Vec<&str> = contents.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a.txt", "a.txt.md5"]);
}

#[test]
fn rerun_is_idempotent_and_replaces_stale_sidecars() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello\n").unwrap();
    fs::write(dir.path().join("a.txt.md5"), b"not a digest at all").unwrap();

    let mut opts = options(dir.path());
    opts.write_sidecars = true;

    runner().run(&opts).unwrap();
    let first = fs::read_to_string(dir.path().join("a.txt.md5")).unwrap();
    assert_eq!(first, HELLO_MD5);

    runner().run(&opts).unwrap();
    let second = fs::read_to_string(dir.path().join("a.txt.md5")).unwrap();
    assert_eq!(second, first);
}

#[test]
fn report_has_exactly_one_entry_per_matched_file() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::write(dir.path().join("b.txt"), b"b").unwrap();
    fs::write(dir.path().join("c.bin"), b"c").unwrap();

    let report = runner().run(&options(dir.path())).unwrap();

    let names: Vec<&str> = report.files.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    for name in names {
        let result = report.checksums(name).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_key(&ChecksumAlgorithm::Md5));
    }
}

#[test]
fn missing_source_mid_scan_fails_the_whole_run() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    // Checksum capability that never succeeds, standing in for a file that
    // becomes unreadable between discovery and hashing.
    struct Broken;
    impl sumpack_core::hash::HashCapability for Broken {
        fn digest_file(&self, path: &Path) -> sumpack_core::error::Result<String> {
            Err(sumpack_core::error::SumpackError::Io {
                op: "open",
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    let mut registry = HashRegistry::empty();
    registry.register(ChecksumAlgorithm::Md5, Box::new(Broken));

    let err = BatchRunner::new(registry).run(&options(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        sumpack_core::error::SumpackError::Io { op: "open", .. }
    ));
}
