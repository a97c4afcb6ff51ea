//! CLI binary for rendering a site plan JSON via stdin.
//!
//! Usage:
//!   cat data.json | cargo run --bin render
//!
//! Input (JSON on stdin):
//!   - elements: Array — element descriptors of the configuration page
//!   - meta: Object — page metadata (at minimum a title)
//!
//! Output: the materialized page as indented HTML on stdout. The page
//! title is emitted as a leading comment so it stays observable without a
//! browser.

use siteweaver_engine::{Document, SiteBuilder, SitePlan};
use std::io::Read;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }

    let plan = match SitePlan::from_json_str(&input) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Failed to parse site plan: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut doc = Document::new();
    SiteBuilder::new(&mut doc).build(&plan.elements);
    doc.set_title(&plan.meta.title);

    if !doc.title().is_empty() {
        println!("<!-- title: {} -->", doc.title());
    }
    print!("{}", doc.to_html());
    ExitCode::SUCCESS
}
