use std::env;
use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    // Data files live under the crate directory so they are included in the
    // crate tarball and `cargo publish` / `cargo install` work correctly.
    let data_dir = Path::new(&manifest_dir).join("assets").join("data");

    compile_confusables(&data_dir, &out_dir);

    println!("cargo:rerun-if-changed=assets/data/confusables.txt");
    println!("cargo:rerun-if-changed=build.rs");
}

/// One parsed line of the upstream table.
struct Entry {
    source: char,
    target: Vec<char>,
    classification: String,
    description: Option<String>,
}

fn parse_code_point(hex: &str, line_no: usize) -> char {
    let value = u32::from_str_radix(hex, 16)
        .unwrap_or_else(|e| panic!("confusables.txt:{line_no}: bad code point '{hex}': {e}"));
    char::from_u32(value)
        .unwrap_or_else(|| panic!("confusables.txt:{line_no}: U+{value:04X} is not a scalar value"))
}

/// Pull `# Version:` / `# Date:` provenance out of a header comment.
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix('#')
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix(key))
        .map(str::trim)
}

fn compile_confusables(data_dir: &Path, out_dir: &str) {
    let confusables_path = data_dir.join("confusables.txt");
    let content = fs::read_to_string(&confusables_path)
        .unwrap_or_else(|e| panic!("Failed to read confusables.txt: {e}"));

    let mut version = String::new();
    let mut date = String::new();
    let mut entries: Vec<Entry> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if let Some(v) = header_value(line, "Version:") {
                version = v.to_string();
            } else if let Some(d) = header_value(line, "Date:") {
                date = d.to_string();
            }
            continue;
        }

        let (data, comment) = match line.split_once('#') {
            Some((data, comment)) => (data, Some(comment)),
            None => (line, None),
        };
        let fields: Vec<&str> = data.split(';').map(str::trim).collect();
        if fields.len() < 3 {
            panic!("confusables.txt:{line_no}: expected 3 fields, found {}", fields.len());
        }

        let source = parse_code_point(fields[0], line_no);
        let target: Vec<char> = fields[1]
            .split_whitespace()
            .map(|hex| parse_code_point(hex, line_no))
            .collect();
        if target.is_empty() {
            panic!("confusables.txt:{line_no}: empty target for U+{:04X}", source as u32);
        }
        let classification = fields[2].to_string();
        if !matches!(classification.as_str(), "MA" | "MI" | "X") {
            panic!("confusables.txt:{line_no}: unknown classification '{classification}'");
        }
        let description = comment
            .map(|c| c.trim().trim_end_matches('#').trim().to_string())
            .filter(|c| !c.is_empty());

        entries.push(Entry {
            source,
            target,
            classification,
            description,
        });
    }

    if version.is_empty() || date.is_empty() {
        panic!("confusables.txt: missing '# Version:' or '# Date:' header");
    }

    let mut confusables = Map::new();
    let mut reverse: Map<String, Value> = Map::new();
    for entry in &entries {
        let key = entry.source.to_string();
        let target: Vec<String> = entry.target.iter().map(|c| c.to_string()).collect();
        let mut record = json!({
            "source": key,
            "target": target,
            "classification": entry.classification,
        });
        if let Some(description) = &entry.description {
            record["description"] = Value::String(description.clone());
        }
        if confusables.insert(key.clone(), record).is_some() {
            panic!("confusables.txt: duplicate source U+{:04X}", entry.source as u32);
        }

        for t in &entry.target {
            let sources = reverse
                .entry(t.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = sources {
                if !list.iter().any(|s| s.as_str() == Some(key.as_str())) {
                    list.push(Value::String(key.clone()));
                }
            }
        }
    }

    let document = json!({
        "version": version,
        "date": date,
        "confusables": confusables,
        "reverseLookup": reverse,
    });

    let out_path = Path::new(out_dir).join("confusables.json");
    fs::write(&out_path, serde_json::to_string(&document).unwrap()).unwrap();
}
