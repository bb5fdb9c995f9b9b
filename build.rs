use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Only the crate's own sources are checked.
const SOURCE_DIRS: [&str; 4] = ["gwas", "src", "tests", "benches"];

// Collects every matching line of one file for a single rule.
struct ViolationCollector {
    violations: Vec<String>,
    file_path: PathBuf,
}

impl ViolationCollector {
    fn new(file_path: &Path) -> Self {
        Self {
            violations: Vec::new(),
            file_path: file_path.to_path_buf(),
        }
    }

    fn check_and_get_error_message(&self, rule: &Rule) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }

        let file_name = self.file_path.to_str().unwrap_or("?");
        let mut error_msg = format!(
            "\n❌ ERROR: Found {} {} in {}:\n",
            self.violations.len(),
            rule.description,
            file_name
        );
        for violation in &self.violations {
            error_msg.push_str(&format!("   {violation}\n"));
        }
        error_msg.push_str(&format!("\n⚠️ {}\n", rule.advice));

        Some(error_msg)
    }
}

impl Sink for ViolationCollector {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let line_number = mat.line_number().unwrap_or(0);
        let line_text = std::str::from_utf8(mat.bytes()).unwrap_or("").trim_end();
        self.violations.push(format!("{line_number}:{line_text}"));
        Ok(true)
    }
}

struct Rule {
    pattern: &'static str,
    description: &'static str,
    advice: &'static str,
}

const RULES: [Rule; 2] = [
    Rule {
        pattern: r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]",
        description: "#[allow(dead_code)] attributes",
        advice: "#[allow(dead_code)] is not allowed. Either use the code or remove it completely.",
    },
    Rule {
        pattern: r"(//|/\*).*\b(?:FIXED|CORRECTED|FIX|FIXES|CHANGED|MODIFIED|UPDATED)\b",
        description: "forbidden comment patterns",
        advice: "Comments describing edits ('FIXED', 'CHANGED', ...) are not allowed. Remove them completely.",
    },
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for dir in SOURCE_DIRS {
        println!("cargo:rerun-if-changed={dir}");
    }

    if let Err(e) = scan_sources() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn scan_sources() -> Result<(), Box<dyn Error>> {
    let mut searcher = Searcher::new();

    for rule in &RULES {
        let matcher = RegexMatcher::new_line_matcher(rule.pattern)?;

        for entry in SOURCE_DIRS
            .iter()
            .flat_map(|dir| WalkDir::new(dir).into_iter().filter_map(|e| e.ok()))
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        {
            let path = entry.path();
            let mut collector = ViolationCollector::new(path);
            searcher.search_path(&matcher, path, &mut collector)?;

            if let Some(error_message) = collector.check_and_get_error_message(rule) {
                return Err(error_message.into());
            }
        }
    }

    Ok(())
}
