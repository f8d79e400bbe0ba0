use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::TransferError;

/// Starting capacity of the read buffer; it doubles each time it fills.
pub const INITIAL_BUFFER_SIZE: usize = 4096;

/// Reads `reader` to EOF into a single buffer sized exactly to the data.
///
/// A read may return fewer bytes than requested at any point. When the buffer
/// is exactly full, one extra byte is probed before growing so a stream that
/// ends on the boundary does not trigger a spurious reallocation.
pub fn read_to_end<R: Read>(reader: &mut R) -> Result<Vec<u8>, TransferError> {
    let mut buf = vec![0u8; INITIAL_BUFFER_SIZE];
    let mut total = 0usize;

    loop {
        let n = read_retrying(reader, &mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;

        if total == buf.len() {
            let mut probe = [0u8; 1];
            if read_retrying(reader, &mut probe)? == 0 {
                break;
            }
            buf.resize(buf.len() * 2, 0);
            buf[total] = probe[0];
            total += 1;
        }
    }

    buf.truncate(total);
    Ok(buf)
}

/// Opens `path` and buffers its whole contents with [`read_to_end`].
pub fn read_file_to_end(path: &Path) -> Result<Vec<u8>, TransferError> {
    let mut file = std::fs::File::open(path)?;
    read_to_end(&mut file)
}

fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, TransferError> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
