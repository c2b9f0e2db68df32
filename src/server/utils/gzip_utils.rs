use std::io::Read;

use flate2::read::GzDecoder;

use crate::server::error::{AppResult, Error};

/// inflate a gzip payload to text, anything that isn't valid gzip fails
pub fn inflate_gzip(bytes: &[u8]) -> AppResult<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut output = String::new();

    decoder
        .read_to_string(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;
    use crate::server::error::Error;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn inflates_a_gzip_payload() {
        let compressed = gzip("<tv></tv>");
        assert_eq!(inflate_gzip(&compressed).unwrap(), "<tv></tv>");
    }

    #[test]
    fn rejects_bytes_that_are_not_gzip() {
        let result = inflate_gzip(b"<tv>plain xml, not gzip</tv>");
        assert!(matches!(result, Err(Error::Decompression(_))));
    }
}
