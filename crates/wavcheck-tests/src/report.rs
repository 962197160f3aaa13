//! Collecting and reporting check outcomes across a parametrized case list.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use wavcheck_fixtures::keyword_selects;

use crate::checks::CheckOutcome;

/// Outcomes of one check over every case it was parametrized with.
#[derive(Debug)]
pub struct SuiteReport {
    check: &'static str,
    filter: Vec<String>,
    deselected: usize,
    results: Vec<(String, CheckOutcome)>,
}

impl SuiteReport {
    pub fn new(check: &'static str) -> Self {
        Self {
            check,
            filter: Vec::new(),
            deselected: 0,
            results: Vec::new(),
        }
    }

    /// Only runs cases whose id contains one of `keywords`, ignoring case.
    pub fn with_filter(mut self, keywords: &[String]) -> Self {
        self.filter = keywords.to_vec();
        self
    }

    /// Runs `f` on every case, recording outcomes under `check[case]` ids.
    pub fn run<T, F>(check: &'static str, cases: &[T], f: F) -> Self
    where
        T: Display,
        F: FnMut(&T) -> CheckOutcome,
    {
        Self::new(check).cases(cases, f)
    }

    /// Like [`run`](Self::run) for file paths, which have no `Display`.
    pub fn run_files<F>(check: &'static str, files: &[PathBuf], f: F) -> Self
    where
        F: FnMut(&Path) -> CheckOutcome,
    {
        Self::new(check).files(files, f)
    }

    /// Runs `f` on every selected case.
    pub fn cases<T, F>(mut self, cases: &[T], mut f: F) -> Self
    where
        T: Display,
        F: FnMut(&T) -> CheckOutcome,
    {
        for case in cases {
            let id = self.case_id(&case.to_string());
            if keyword_selects(&self.filter, &id) {
                let outcome = f(case);
                self.results.push((id, outcome));
            } else {
                self.deselected += 1;
            }
        }
        self
    }

    /// Runs `f` on every selected file.
    pub fn files<F>(mut self, files: &[PathBuf], mut f: F) -> Self
    where
        F: FnMut(&Path) -> CheckOutcome,
    {
        for file in files {
            let id = self.case_id(&file.display().to_string());
            if keyword_selects(&self.filter, &id) {
                let outcome = f(file);
                self.results.push((id, outcome));
            } else {
                self.deselected += 1;
            }
        }
        self
    }

    fn case_id(&self, case: &str) -> String {
        format!("{}[{}]", self.check, case)
    }

    /// Cases skipped because no filter keyword matched their id.
    pub fn deselected(&self) -> usize {
        self.deselected
    }

    pub fn results(&self) -> &[(String, CheckOutcome)] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CheckOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(CheckOutcome::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CheckOutcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&CheckOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| pred(o)).count()
    }

    /// Prints one line per case followed by a summary.
    pub fn print(&self) {
        if self.results.is_empty() {
            if self.deselected > 0 {
                println!("{}: {} case(s) deselected by filter", self.check, self.deselected);
            } else {
                println!("{}: no cases (no sample files discovered)", self.check);
            }
            return;
        }
        for (id, outcome) in &self.results {
            println!("  {} ... {}", id, outcome);
        }
        println!(
            "{}: {} passed, {} failed, {} skipped, {} deselected",
            self.check,
            self.passed(),
            self.failed(),
            self.skipped(),
            self.deselected
        );
    }

    /// Panics listing every failed case.
    pub fn assert_passed(&self) {
        let failures: Vec<String> = self
            .results
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                CheckOutcome::Failed(msg) => Some(format!("  {}: {}", id, msg)),
                _ => None,
            })
            .collect();

        assert!(
            failures.is_empty(),
            "\n{} of {} case(s) failed:\n{}",
            failures.len(),
            self.results.len(),
            failures.join("\n")
        );
    }

    /// Prints, then asserts.
    pub fn finish(self) {
        self.print();
        self.assert_passed();
    }
}
