//! Download a release archive and unpack the library out of it.

use crate::PdfiumAutoError;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// `(bytes_so_far, total_if_known)`, called as the download advances.
pub type DownloadProgress<'a> = &'a dyn Fn(u64, Option<u64>);

const READ_BUF: usize = 64 * 1024;

/// Fetch `url` into memory, reporting progress every read.
pub fn download(
    url: &str,
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<Vec<u8>, PdfiumAutoError> {
    info!("Downloading pdfium from {url}");
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("s2v-pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    read_reporting(response, &mut body, total, on_progress)
        .map_err(|e| PdfiumAutoError::Download(format!("reading body: {e}")))?;
    debug!("Downloaded {} bytes", body.len());
    Ok(body)
}

/// Copy `reader` into `sink`, calling `on_progress` after every read.
pub(crate) fn read_reporting(
    mut reader: impl Read,
    sink: &mut impl Write,
    total: Option<u64>,
    on_progress: Option<DownloadProgress<'_>>,
) -> std::io::Result<u64> {
    let mut buf = vec![0u8; READ_BUF];
    let mut seen = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(seen),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buf[..n])?;
        seen += n as u64;
        if let Some(report) = on_progress {
            report(seen, total);
        }
    }
}

/// Unpack `member` from a gzipped tarball to `dest`.
///
/// The file is written next to `dest` first and renamed into place, so an
/// interrupted unpack never leaves a truncated library in the cache.
pub fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    let extract_err = |e: std::io::Error| PdfiumAutoError::Extract(e.to_string());

    let mut tarball = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    for entry in tarball.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        if entry.path().map_err(extract_err)?.to_string_lossy() != member {
            continue;
        }

        let mut partial = dest.as_os_str().to_owned();
        partial.push(".part");
        let partial = std::path::PathBuf::from(partial);
        entry.unpack(&partial).map_err(extract_err)?;
        std::fs::rename(&partial, dest).map_err(extract_err)?;
        return Ok(());
    }

    Err(PdfiumAutoError::Extract(format!("'{member}' not found in archive")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        let mut builder = tar::Builder::new(gz);
        for (name, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn member_is_unpacked_to_destination() {
        let archive = tarball(&[
            ("include/fpdfview.h", &b"/* header */"[..]),
            ("lib/libpdfium.so", &b"\x7fELF fake"[..]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libpdfium.so");

        unpack_member(&archive, "lib/libpdfium.so", &dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"\x7fELF fake");
        assert!(!dir.path().join("libpdfium.so.part").exists());
    }

    #[test]
    fn missing_member_is_an_extract_error() {
        let archive = tarball(&[("LICENSE", &b"BSD"[..])]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pdfium.dll");

        let err = unpack_member(&archive, "bin/pdfium.dll", &dest).unwrap_err();
        assert!(matches!(err, PdfiumAutoError::Extract(ref m) if m.contains("bin/pdfium.dll")));
        assert!(!dest.exists());
    }

    #[test]
    fn garbage_archive_is_an_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libpdfium.so");
        let err = unpack_member(b"not gzip", "lib/libpdfium.so", &dest).unwrap_err();
        assert!(matches!(err, PdfiumAutoError::Extract(_)));
    }

    #[test]
    fn progress_reports_running_total() {
        let data = vec![7u8; READ_BUF * 2 + 10];
        let seen = RefCell::new(Vec::new());
        let report = |done: u64, total: Option<u64>| seen.borrow_mut().push((done, total));
        let mut sink = Vec::new();

        let total = Some(data.len() as u64);
        let copied = read_reporting(&data[..], &mut sink, total, Some(&report)).unwrap();

        assert_eq!(copied, data.len() as u64);
        assert_eq!(sink, data);
        let seen = seen.into_inner();
        assert_eq!(seen.last(), Some(&(data.len() as u64, total)));
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
