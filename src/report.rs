// src/report.rs
use crate::step::Outcome;
use anyhow::Result;
use bson::{Bson, Document};
use serde_json::Value;
use std::io::Write;

/// Writes each step's label and result for a human to read.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn report(&mut self, label: &str, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::Documents(docs) => {
                let values: Vec<Value> = docs.iter().map(relaxed_json).collect();
                writeln!(self.out, "{}:", label)?;
                writeln!(self.out, "{}", serde_json::to_string_pretty(&values)?)?;
            }
            Outcome::Updated(summary) => {
                writeln!(self.out, "{}:", label)?;
                writeln!(
                    self.out,
                    "matched {}, modified {}",
                    summary.matched, summary.modified
                )?;
            }
            Outcome::Deleted(summary) => {
                writeln!(self.out, "{}:", label)?;
                writeln!(self.out, "deleted {}", summary.deleted)?;
            }
            Outcome::IndexCreated(name) => {
                writeln!(self.out, "{}: {}", label, name)?;
            }
            Outcome::Plan(plan) => {
                writeln!(self.out, "{}:", label)?;
                writeln!(self.out, "{}", serde_json::to_string_pretty(&relaxed_json(plan))?)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Dry-run output: the request a step would send.
    pub fn request(&mut self, label: &str, request: &Document) -> Result<()> {
        writeln!(self.out, "{}:", label)?;
        writeln!(self.out, "{}", serde_json::to_string_pretty(&relaxed_json(request))?)?;
        self.out.flush()?;
        Ok(())
    }
}

fn relaxed_json(doc: &Document) -> Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}
