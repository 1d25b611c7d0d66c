//! File I/O for patterns: RLE and the 0/1 grid text format

use super::{LifeSimulator, Pattern};
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// A pattern read from disk, with the rule its header names (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFile {
    pub name: String,
    pub pattern: Pattern,
    pub rule: Option<String>,
}

/// Load a pattern file; `.rle` files are read as RLE, anything else as a grid
/// unless its first data line is an RLE header.
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<PatternFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pattern file: {}", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern")
        .to_string();

    let is_rle = path.extension().is_some_and(|ext| ext == "rle") || looks_like_rle(&content);
    let (pattern, rule) = if is_rle {
        parse_rle(&content)
    } else {
        parse_grid_from_string(&content).map(|pattern| (pattern, None))
    }
    .with_context(|| format!("Failed to parse pattern from file: {}", path.display()))?;

    Ok(PatternFile { name, pattern, rule })
}

fn looks_like_rle(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .is_some_and(|line| line.starts_with('x'))
}

/// Parse a grid where each line is a row, '1' for alive cells and '0' for dead.
pub fn parse_grid_from_string(content: &str) -> Result<Pattern> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let width = lines[0].len();
    let mut pattern = Pattern::new();

    for (row, line) in lines.iter().enumerate() {
        if line.len() != width {
            anyhow::bail!(
                "Row {} has length {}, expected {} (all rows must have the same length)",
                row,
                line.len(),
                width
            );
        }

        for (col, ch) in line.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => {
                    pattern.insert((col as i64, row as i64));
                }
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '0' and '1' are allowed",
                    ch,
                    row,
                    col
                ),
            }
        }
    }

    Ok(pattern)
}

/// Largest pattern an RLE file may describe
const MAX_RLE_CELLS: usize = LifeSimulator::DEFAULT_MAX_POPULATION;

/// Parse an RLE pattern, returning the cells and the header's rule.
pub fn parse_rle(content: &str) -> Result<(Pattern, Option<String>)> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let header = lines.next().ok_or_else(|| anyhow!("Missing header"))?;

    // The rule comes last and may itself contain commas (`B3/S23:T10,10`).
    let (sizes, rule) = match header.split_once("rule") {
        Some((sizes, rest)) => {
            let value = rest
                .trim_start()
                .strip_prefix('=')
                .ok_or_else(|| anyhow!("Invalid header: missing '=' after \"rule\""))?;
            (sizes, Some(value.trim().to_string()))
        }
        None => (header, None),
    };

    let (mut width, mut height) = (None, None);
    for part in sizes.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid header entry: {:?}", part))?;
        let size = value
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid header size: {:?}", value.trim()))?;
        match key.trim() {
            "x" => width = Some(i64::from(size)),
            "y" => height = Some(i64::from(size)),
            other => anyhow::bail!("Unknown header key: {:?}", other),
        }
    }

    let mut pattern = Pattern::new();
    let (mut x, mut y) = (0i64, 0i64);
    let mut count: Option<i64> = None;

    'body: for line in lines {
        for ch in line.chars() {
            if ch.is_whitespace() {
                continue;
            }
            if let Some(digit) = ch.to_digit(10) {
                let value = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|value| value.checked_add(i64::from(digit)))
                    .ok_or_else(|| anyhow!("Run count too large"))?;
                count = Some(value);
                continue;
            }

            let run = count.take().unwrap_or(1);
            match ch {
                'b' | '.' => x = advance(x, run, width, "x")?,
                'o' | 'A' => {
                    if height.is_some_and(|height| y >= height) {
                        anyhow::bail!("Row {} is past the declared height", y);
                    }
                    let end = advance(x, run, width, "x")?;
                    if run > (MAX_RLE_CELLS - pattern.population()) as i64 {
                        anyhow::bail!("Pattern has more than {} live cells", MAX_RLE_CELLS);
                    }
                    for cell_x in x..end {
                        pattern.insert((cell_x, y));
                    }
                    x = end;
                }
                '$' => {
                    y = advance(y, run, height, "y")?;
                    x = 0;
                }
                '!' => break 'body,
                _ => anyhow::bail!("Invalid RLE character: '{}'", ch),
            }
        }
    }

    Ok((pattern, rule))
}

/// Move `run` cells along an axis, staying within the declared size.
fn advance(position: i64, run: i64, limit: Option<i64>, axis: &str) -> Result<i64> {
    let end = position
        .checked_add(run)
        .ok_or_else(|| anyhow!("Run count too large"))?;
    if limit.is_some_and(|limit| end > limit) {
        anyhow::bail!("Run ends at {} = {}, past the declared size", axis, end);
    }
    Ok(end)
}

/// Encode a pattern as RLE, anchored at its bounding box.
pub fn pattern_to_rle(pattern: &Pattern, rule: &str) -> String {
    let Some(((x0, y0), (x1, y1))) = pattern.bounding_box() else {
        return format!("x = 0, y = 0, rule = {}\n!\n", rule);
    };

    let mut body = String::new();
    let mut pending_rows = 0;
    for y in y0..=y1 {
        let mut runs: Vec<(bool, i64)> = Vec::new();
        for x in x0..=x1 {
            let alive = pattern.contains((x, y));
            if let Some((state, length)) = runs.last_mut() {
                if *state == alive {
                    *length += 1;
                    continue;
                }
            }
            runs.push((alive, 1));
        }
        if matches!(runs.last(), Some((false, _))) {
            runs.pop();
        }
        if runs.is_empty() {
            pending_rows += 1;
            continue;
        }
        if y > y0 {
            push_run(&mut body, pending_rows + 1, '$');
        }
        pending_rows = 0;
        for (alive, length) in runs {
            push_run(&mut body, length, if alive { 'o' } else { 'b' });
        }
    }
    body.push('!');

    let mut output = format!("x = {}, y = {}, rule = {}\n", x1 - x0 + 1, y1 - y0 + 1, rule);
    for chunk in body.as_bytes().chunks(70) {
        output.push_str(&String::from_utf8_lossy(chunk));
        output.push('\n');
    }
    output
}

fn push_run(body: &mut String, length: i64, symbol: char) {
    if length > 1 {
        body.push_str(&length.to_string());
    }
    body.push(symbol);
}

/// Save a pattern as RLE
pub fn save_pattern_to_file<P: AsRef<Path>>(pattern: &Pattern, rule: &str, path: P) -> Result<()> {
    let content = pattern_to_rle(pattern, rule);

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write pattern to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Load every `.rle` and `.txt` pattern in a directory, sorted by name
pub fn load_patterns_from_directory<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PatternFile>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut patterns = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        let is_pattern = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == "rle" || ext == "txt");
        if is_pattern {
            match load_pattern_from_file(&path) {
                Ok(file) => patterns.push(file),
                Err(e) => log::warn!("Skipping {}: {:#}", path.display(), e),
            }
        }
    }

    patterns.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(patterns)
}

/// Create example pattern files for testing
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples: [(&str, &[(i64, i64)]); 4] = [
        ("glider", &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]),
        ("blinker", &[(0, 0), (1, 0), (2, 0)]),
        ("block", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
        (
            "lwss",
            &[(1, 0), (4, 0), (0, 1), (0, 2), (4, 2), (0, 3), (1, 3), (2, 3), (3, 3)],
        ),
    ];

    for (name, cells) in examples {
        let pattern: Pattern = cells.iter().copied().collect();
        save_pattern_to_file(&pattern, "B3/S23", dir.join(format!("{}.rle", name)))?;
    }

    // Beacon in the plain grid format
    std::fs::write(dir.join("beacon.txt"), "1100\n1100\n0011\n0011\n")
        .context("Failed to write beacon.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn glider() -> Pattern {
        [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].into_iter().collect()
    }

    #[test]
    fn test_parse_grid_from_string() {
        let pattern = parse_grid_from_string("010\n101\n010\n").unwrap();

        assert_eq!(pattern.population(), 4);
        assert!(pattern.contains((1, 0)));
        assert!(pattern.contains((0, 1)));
        assert!(pattern.contains((2, 1)));
        assert!(pattern.contains((1, 2)));
    }

    #[test]
    fn test_invalid_grid() {
        assert!(parse_grid_from_string("010\n1X1\n010\n").is_err());
        assert!(parse_grid_from_string("010\n11\n010\n").is_err());
        assert!(parse_grid_from_string("").is_err());
    }

    #[test]
    fn test_parse_rle() {
        let (pattern, rule) =
            parse_rle("#C comment\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n").unwrap();
        assert_eq!(pattern, glider());
        assert_eq!(rule.as_deref(), Some("B3/S23"));

        let (_, rule) = parse_rle("x = 3, y = 3, rule = B3/S23:T10,10\nbo$2bo$3o!").unwrap();
        assert_eq!(rule.as_deref(), Some("B3/S23:T10,10"));
    }

    #[test]
    fn test_parse_rle_multiline_and_blank_rows() {
        let (pattern, rule) = parse_rle("x = 3, y = 4\n3o2$\n3o!").unwrap();
        assert_eq!(rule, None);
        assert_eq!(pattern.population(), 6);
        assert!(pattern.contains((2, 2)));
        assert!(!pattern.contains((0, 1)));
    }

    #[test]
    fn test_invalid_rle() {
        assert!(parse_rle("").is_err());
        assert!(parse_rle("x = 3, y = 3\nbo$2bz!").is_err());
        assert!(parse_rle("x = three, y = 3\nbo!").is_err());
        assert!(parse_rle("width = 3\nbo!").is_err());
    }

    #[test]
    fn test_rle_run_count_overflow_is_an_error() {
        assert!(parse_rle("x = 1, y = 1\n99999999999999999999o!\n").is_err());
        assert!(parse_rle("rule = B3/S23\n9223372036854775807b9223372036854775807o!").is_err());
    }

    #[test]
    fn test_rle_body_bounded_by_header() {
        assert!(parse_rle("x = 2, y = 2\n3o!").is_err());
        assert!(parse_rle("x = 2, y = 2\n2o3$o!").is_err());
        assert!(parse_rle("x = 2, y = 1\no$o!").is_err());
        // Without sizes the cell cap still applies.
        assert!(parse_rle("rule = B3/S23\n3000000000o!").is_err());
        assert!(parse_rle("x = 5000000000, y = 1\n3o!").is_err());
    }

    #[test]
    fn test_rle_count_survives_whitespace() {
        let (pattern, _) = parse_rle("x = 3, y = 1\n3 o!").unwrap();
        assert_eq!(pattern.population(), 3);
    }

    #[test]
    fn test_rle_encoding() {
        assert_eq!(
            pattern_to_rle(&glider(), "B3/S23"),
            "x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n"
        );

        let gap: Pattern = [(0, 0), (0, 3)].into_iter().collect();
        let rle = pattern_to_rle(&gap, "B3/S23");
        assert_eq!(rle, "x = 1, y = 4, rule = B3/S23\no3$o!\n");
        assert_eq!(parse_rle(&rle).unwrap().0, gap);
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/glider.rle");

        save_pattern_to_file(&glider(), "B3/S23", &file_path).unwrap();
        let loaded = load_pattern_from_file(&file_path).unwrap();

        assert_eq!(loaded.name, "glider");
        assert_eq!(loaded.pattern, glider());
        assert_eq!(loaded.rule.as_deref(), Some("B3/S23"));
    }

    #[test]
    fn test_rle_detected_without_extension() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("glider.txt");
        std::fs::write(&file_path, "x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n").unwrap();
        assert_eq!(load_pattern_from_file(&file_path).unwrap().pattern, glider());
    }

    #[test]
    fn test_create_example_patterns() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();

        let patterns = load_patterns_from_directory(temp_dir.path()).unwrap();
        let names: Vec<_> = patterns.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["beacon", "blinker", "block", "glider", "lwss"]);

        let glider_file = &patterns[3];
        assert_eq!(glider_file.pattern, glider());
        assert_eq!(patterns[0].pattern.population(), 8);
        assert_eq!(patterns[0].rule, None);
        assert_eq!(patterns[4].pattern.population(), 9);
        assert!(patterns[1..].iter().all(|p| p.rule.as_deref() == Some("B3/S23")));

        let lwss = std::fs::read_to_string(temp_dir.path().join("lwss.rle")).unwrap();
        assert_eq!(lwss, "x = 5, y = 4, rule = B3/S23\nbo2bo$o$o3bo$4o!\n");
    }
}
