// ========================================================================================
//
//                                INPUT AND OUTPUT STREAMS
//
// ========================================================================================
//
// Opening of the plain-text inputs and the report destination.

use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Opens a coordinate or genotype table for buffered reading. Files ending in
/// `.gz` are decompressed on the fly.
pub fn open_text_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Opening {}: {e}", path.display()))
    })?;
    let a_reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(a_reader)))
}

/// Resolves the report destination. `-` selects standard output; any other
/// path is created (with its parent directories) or truncated.
pub fn open_report_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}
