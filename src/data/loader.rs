use std::path::Path;

use super::error::CubeError;
use super::model::{RenderCube, SampleLine, FIRST_SAMPLE_LINE};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a render cube text file.
///
/// Layout:
/// ```text
/// line 0    header (ignored)
/// line 1    integer sample count
/// line 2-4  header (ignored)
/// line 5+   "<x> <y> <wavelength> <value> ..."
/// ```
pub fn load_file(path: &Path) -> Result<RenderCube, CubeError> {
    let text = std::fs::read_to_string(path).map_err(|source| CubeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cube = parse_cube(&text)?;
    if cube.is_empty() {
        log::warn!("{} has a header but no sample lines", path.display());
    }
    log::info!(
        "Loaded {} with {} sample lines (header declares {})",
        path.display(),
        cube.len(),
        cube.declared_count
    );
    Ok(cube)
}

/// Parse render cube text that is already in memory.
///
/// Only the header count is validated here; sample fields are parsed when
/// the cube is scanned or binned.
pub fn parse_cube(text: &str) -> Result<RenderCube, CubeError> {
    let raw: Vec<&str> = text.lines().collect();

    let count_line = raw.get(1).ok_or(CubeError::MissingHeader)?;
    let declared_count = count_line
        .trim()
        .parse::<i64>()
        .map_err(|_| CubeError::BadCount {
            value: count_line.to_string(),
        })?;

    let lines = raw
        .iter()
        .enumerate()
        .skip(FIRST_SAMPLE_LINE)
        .map(|(number, text)| SampleLine {
            number,
            text: text.to_string(),
        })
        .collect();

    Ok(RenderCube {
        declared_count,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "FoMo render cube\n3\nx y l\nunits\n---\n";

    #[test]
    fn test_parse_keeps_lines_from_index_five() {
        let text = format!("{HEADER}0 0 1 3.0\n1 1 2 4.0\n2 2 3 5.0\n");
        let cube = parse_cube(&text).unwrap();
        assert_eq!(cube.declared_count, 3);
        assert_eq!(cube.len(), 3);
        assert_eq!(cube.lines[0].number, 5);
        assert_eq!(cube.lines[0].text, "0 0 1 3.0");
        assert_eq!(cube.lines[2].number, 7);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "h\r\n 2 \r\nh\r\nh\r\nh\r\n1 2 3 4\r\n5 6 7 8\r\n";
        let cube = parse_cube(text).unwrap();
        assert_eq!(cube.declared_count, 2);
        assert_eq!(cube.lines[1].text, "5 6 7 8");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse_cube("only one line"), Err(CubeError::MissingHeader)));
        assert!(matches!(parse_cube(""), Err(CubeError::MissingHeader)));
    }

    #[test]
    fn test_non_integer_count() {
        let err = parse_cube("h\n3.5\n").unwrap_err();
        assert!(matches!(err, CubeError::BadCount { .. }));
    }

    #[test]
    fn test_header_only_file_has_no_samples() {
        let cube = parse_cube(HEADER).unwrap();
        assert!(cube.is_empty());
    }

    #[test]
    fn test_nonexistent_path_is_io_error() {
        let path = std::env::temp_dir().join("rendercube-definitely-missing.txt");
        let err = load_file(&path).unwrap_err();
        match err {
            CubeError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_file_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!(
            "rendercube-loader-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, format!("{HEADER}0 0 1 3.0\n")).unwrap();
        let cube = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cube.len(), 1);
        assert_eq!(cube.lines[0].sample().unwrap().value, 3.0);
    }
}
