//! Program loader resolution.
//!
//! A compiler binary built against a different libc than the host (for
//! example a glibc build on a musl system) cannot be executed directly: the
//! kernel fails to find the interpreter recorded in the binary. Such a binary
//! can still be started by handing it to the host's own program loader, which
//! is the `PT_INTERP` entry of the running executable.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;
const ELFDATA2MSB: u8 = 2;
const PT_INTERP: u32 = 3;
const ELF64_HEADER_SIZE: usize = 64;
const MAX_INTERPRETER_LEN: u64 = 4096;

/// Resolve the program loader of the running executable.
///
/// Returns `Ok(None)` for statically linked hosts and non-ELF platforms.
pub fn host_interpreter() -> io::Result<Option<PathBuf>> {
    if !cfg!(target_os = "linux") {
        return Ok(None);
    }
    interpreter_of(&std::env::current_exe()?)
}

/// Read the `PT_INTERP` path recorded in the ELF file at `path`.
///
/// Returns `Ok(None)` when the file is not ELF or carries no interpreter.
pub fn interpreter_of(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut file = File::open(path)?;

    let mut header = [0u8; ELF64_HEADER_SIZE];
    let read = read_up_to(&mut file, &mut header)?;
    let Some(layout) = ElfLayout::parse(&header[..read]) else {
        return Ok(None);
    };

    let table_len = usize::from(layout.phentsize) * usize::from(layout.phnum);
    let mut table = vec![0u8; table_len];
    file.seek(SeekFrom::Start(layout.phoff))?;
    file.read_exact(&mut table)?;

    for entry in table.chunks_exact(usize::from(layout.phentsize)) {
        if layout.u32_at(entry, 0) != Some(PT_INTERP) {
            continue;
        }
        let (offset, size) = match layout.class {
            ELFCLASS64 => (layout.u64_at(entry, 8), layout.u64_at(entry, 32)),
            _ => (
                layout.u32_at(entry, 4).map(u64::from),
                layout.u32_at(entry, 16).map(u64::from),
            ),
        };
        let (Some(offset), Some(size)) = (offset, size) else {
            return Err(malformed("truncated PT_INTERP entry"));
        };
        if size == 0 || size > MAX_INTERPRETER_LEN {
            return Err(malformed("implausible PT_INTERP size"));
        }

        let mut raw = vec![0u8; size as usize];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut raw)?;
        if let Some(nul) = raw.iter().position(|b| *b == 0) {
            raw.truncate(nul);
        }
        return Ok(Some(path_from_bytes(raw)));
    }

    Ok(None)
}

/// The subset of the ELF file header needed to walk program headers.
struct ElfLayout {
    class: u8,
    big_endian: bool,
    phoff: u64,
    phentsize: u16,
    phnum: u16,
}

impl ElfLayout {
    fn parse(header: &[u8]) -> Option<Self> {
        if header.len() < 20 || header[..4] != ELF_MAGIC {
            return None;
        }
        let class = header[4];
        let big_endian = match header[5] {
            ELFDATA2LSB => false,
            ELFDATA2MSB => true,
            _ => return None,
        };

        let mut layout = Self {
            class,
            big_endian,
            phoff: 0,
            phentsize: 0,
            phnum: 0,
        };
        match class {
            ELFCLASS64 => {
                layout.phoff = layout.u64_at(header, 0x20)?;
                layout.phentsize = layout.u16_at(header, 0x36)?;
                layout.phnum = layout.u16_at(header, 0x38)?;
            }
            ELFCLASS32 => {
                layout.phoff = u64::from(layout.u32_at(header, 0x1c)?);
                layout.phentsize = layout.u16_at(header, 0x2a)?;
                layout.phnum = layout.u16_at(header, 0x2c)?;
            }
            _ => return None,
        }

        let min_entry = if class == ELFCLASS64 { 56 } else { 32 };
        (usize::from(layout.phentsize) >= min_entry).then_some(layout)
    }

    fn u16_at(&self, buf: &[u8], at: usize) -> Option<u16> {
        let bytes: [u8; 2] = buf.get(at..at + 2)?.try_into().ok()?;
        Some(if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    fn u32_at(&self, buf: &[u8], at: usize) -> Option<u32> {
        let bytes: [u8; 4] = buf.get(at..at + 4)?.try_into().ok()?;
        Some(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }

    fn u64_at(&self, buf: &[u8], at: usize) -> Option<u64> {
        let bytes: [u8; 8] = buf.get(at..at + 8)?.try_into().ok()?;
        Some(if self.big_endian {
            u64::from_be_bytes(bytes)
        } else {
            u64::from_le_bytes(bytes)
        })
    }
}

fn read_up_to(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

fn malformed(detail: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("malformed ELF: {detail}"))
}

#[cfg(unix)]
fn path_from_bytes(raw: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(raw))
}

#[cfg(not(unix))]
fn path_from_bytes(raw: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&raw).into_owned())
}
