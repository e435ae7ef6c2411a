//! Resolves the CLI's positional input arguments into a flat list of
//! SystemVerilog source paths, expanding any `.f` file list in place.

use std::path::{Path, PathBuf};

/// Expands `inputs` into a flat list of source file paths. An entry ending
/// in `.f` is read as a line-delimited file list: blank lines and lines
/// starting with `//` are skipped, every other line is a path relative to
/// the `.f` file's own directory (or absolute, if given as one).
pub fn resolve_inputs(inputs: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for raw in inputs {
        let path = PathBuf::from(raw);
        if path.extension().and_then(|e| e.to_str()) == Some("f") {
            expand_file_list(&path, &mut out)?;
        } else {
            out.push(path);
        }
    }
    Ok(out)
}

fn expand_file_list(list_path: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let content = std::fs::read_to_string(list_path)?;
    let base = list_path.parent().unwrap_or_else(|| Path::new("."));
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let entry = PathBuf::from(line);
        if entry.is_absolute() {
            out.push(entry);
        } else {
            out.push(base.join(entry));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn plain_paths_pass_through() {
        let resolved = resolve_inputs(&["a.sv".to_string(), "b.sv".to_string()]).unwrap();
        assert_eq!(resolved, vec![PathBuf::from("a.sv"), PathBuf::from("b.sv")]);
    }

    #[test]
    fn file_list_expands_and_skips_comments_and_blanks() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.sv"), "module top; endmodule").unwrap();
        fs::write(tmp.path().join("sub.sv"), "module sub; endmodule").unwrap();
        let list_path = tmp.path().join("files.f");
        fs::write(&list_path, "// a comment\n\ntop.sv\nsub.sv\n").unwrap();

        let resolved = resolve_inputs(&[list_path.to_str().unwrap().to_string()]).unwrap();
        assert_eq!(
            resolved,
            vec![tmp.path().join("top.sv"), tmp.path().join("sub.sv")]
        );
    }

    #[test]
    fn file_list_entries_mix_with_plain_paths() {
        let tmp = TempDir::new().unwrap();
        let list_path = tmp.path().join("files.f");
        fs::write(&list_path, "top.sv\n").unwrap();

        let resolved = resolve_inputs(&[
            "extra.sv".to_string(),
            list_path.to_str().unwrap().to_string(),
        ])
        .unwrap();
        assert_eq!(
            resolved,
            vec![PathBuf::from("extra.sv"), tmp.path().join("top.sv")]
        );
    }
}
