//! Conformance harness for tsdecl.
//!
//! Runs TypeScript snippets through the parser and records, per case,
//! whether the parse completed and whether it produced exactly the expected
//! diagnostic codes. Cases are grouped into categories for the summary.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tsdecl_ast::SourceFile;
use tsdecl_parser::{parse_source_file, ParseOptions};

/// Outcome of a single conformance case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub category: String,
    pub source: String,
    pub expected_codes: Vec<u32>,
    pub actual_codes: Vec<u32>,
    /// Panic message or parse error, when the parse did not complete.
    pub failure: Option<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none() && self.expected_codes == self.actual_codes
    }
}

/// Parse `source` as `file_name`, turning a panic into an error string.
pub fn parse_catching(file_name: &str, source: &str) -> Result<SourceFile, String> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        parse_source_file(file_name, source, &ParseOptions::default())
    }));
    match result {
        Ok(Ok(file)) => Ok(file),
        Ok(Err(error)) => Err(error.to_string()),
        Err(payload) => Err(if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else {
            "Unknown panic".to_string()
        }),
    }
}

/// Collects case results and reports pass rates by category.
#[derive(Debug, Default)]
pub struct ConformanceSuite {
    pub results: Vec<CaseResult>,
}

impl ConformanceSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// A case that must parse without diagnostics.
    pub fn add_test(&mut self, name: &str, category: &str, source: &str) {
        self.add_test_expecting(name, category, source, &[]);
    }

    /// A case that must report exactly `expected_codes`, in order.
    pub fn add_test_expecting(&mut self, name: &str, category: &str, source: &str, expected_codes: &[u32]) {
        let file_name = if category == "jsx" { "test.tsx" } else { "test.ts" };
        let (actual_codes, failure) = match parse_catching(file_name, source) {
            Ok(file) => (file.parse_diagnostics.iter().map(|d| d.code).collect(), None),
            Err(message) => (Vec::new(), Some(message)),
        };
        self.results.push(CaseResult {
            name: name.to_string(),
            category: category.to_string(),
            source: source.to_string(),
            expected_codes: expected_codes.to_vec(),
            actual_codes,
            failure,
        });
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.passed()).count()
    }

    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|result| !result.passed()).collect()
    }

    /// `(passed, total)` per category, ordered by category name.
    pub fn by_category(&self) -> BTreeMap<&str, (usize, usize)> {
        let mut categories = BTreeMap::new();
        for result in &self.results {
            let entry = categories.entry(result.category.as_str()).or_insert((0, 0));
            if result.passed() {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
        categories
    }

    pub fn summary(&self) -> String {
        let total = self.results.len();
        let passed = self.passed();
        let rate = if total > 0 { passed as f64 / total as f64 * 100.0 } else { 0.0 };
        let mut out = format!("=== Conformance Summary ===\nPassed: {passed}/{total} ({rate:.2}%)\n");
        for (category, (passed, total)) in self.by_category() {
            out.push_str(&format!("  {category}: {passed}/{total}\n"));
        }
        for failure in self.failures().iter().take(10) {
            out.push_str(&format!(
                "  FAILED [{}] {}: expected {:?}, got {:?}{}\n",
                failure.category,
                failure.name,
                failure.expected_codes,
                failure.actual_codes,
                failure.failure.as_deref().map(|f| format!(" ({f})")).unwrap_or_default()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_result_passes_on_matching_codes() {
        let mut suite = ConformanceSuite::new();
        suite.add_test("clean", "parsing", "let a = 1;");
        suite.add_test_expecting("broken", "recovery", "let a = ;", &[1109]);
        suite.add_test("wrongly_clean", "parsing", "let a = ;");
        assert_eq!(suite.passed(), 2);
        assert_eq!(suite.failures()[0].name, "wrongly_clean");
        assert_eq!(suite.by_category().get("parsing"), Some(&(1, 2)));
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut suite = ConformanceSuite::new();
        suite.add_test("wrongly_clean", "parsing", "let a = ;");
        let summary = suite.summary();
        assert!(summary.contains("Passed: 0/1"));
        assert!(summary.contains("FAILED [parsing] wrongly_clean"));
    }
}
