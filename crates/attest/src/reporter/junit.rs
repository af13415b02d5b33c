//! JUnit-XML reporter
//!
//! One file per class, named from the lower-cased class name, written into
//! the configured directory. The class file is opened at `start_class` and
//! guaranteed closed by `end_suite` even when the run recorded failures.

use crate::failure::Failure;
use crate::reporter::Reporter;
use crate::result::RunResult;
use crate::runner::RunnerError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Fixed `type` attribute on `<failure>` elements.
const FAILURE_TYPE: &str = "test failure";

pub struct JunitReporter {
    dir: PathBuf,
    current: Option<ClassFile>,
}

struct ClassFile {
    class: String,
    out: BufWriter<File>,
    current_test: String,
    failures: Vec<Failure>,
}

impl ClassFile {
    fn write_testcase(&mut self) -> Result<(), RunnerError> {
        let classname = xml_escape(&self.class);
        let name = xml_escape(&self.current_test);
        if self.failures.is_empty() {
            writeln!(
                self.out,
                "    <testcase classname=\"{}\" name=\"{}\" />",
                classname, name
            )?;
            return Ok(());
        }

        writeln!(
            self.out,
            "    <testcase classname=\"{}\" name=\"{}\">",
            classname, name
        )?;
        for failure in &self.failures {
            writeln!(
                self.out,
                "        <failure type=\"{}\">{}</failure>",
                FAILURE_TYPE,
                xml_escape(&failure.message)
            )?;
        }
        let traces: Vec<&str> = self.failures.iter().map(|f| f.trace.as_str()).collect();
        writeln!(
            self.out,
            "        <system-err><![CDATA[{}]]></system-err>",
            cdata_escape(&traces.join("\n"))
        )?;
        writeln!(self.out, "    </testcase>")?;
        Ok(())
    }

    fn finalize(mut self) -> Result<(), RunnerError> {
        writeln!(self.out, "</testsuite>")?;
        self.out.flush()?;
        Ok(())
    }
}

impl JunitReporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JunitReporter {
            dir: dir.into(),
            current: None,
        }
    }

    fn close_current(&mut self) -> Result<(), RunnerError> {
        if let Some(file) = self.current.take() {
            file.finalize()?;
        }
        Ok(())
    }
}

impl Reporter for JunitReporter {
    fn start_class(&mut self, class: &str) -> Result<(), RunnerError> {
        self.close_current()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.xml", class.to_lowercase()));
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(out, "<testsuite name=\"{}\">", xml_escape(class))?;
        self.current = Some(ClassFile {
            class: class.to_string(),
            out,
            current_test: String::new(),
            failures: Vec::new(),
        });
        Ok(())
    }

    fn start_test(&mut self, full_name: &str) -> Result<(), RunnerError> {
        if let Some(file) = &mut self.current {
            let case = full_name
                .split_once(':')
                .map(|(_, case)| case)
                .unwrap_or(full_name);
            file.current_test = case.to_string();
            file.failures.clear();
        }
        Ok(())
    }

    fn add_failure(&mut self, failure: &Failure) -> Result<(), RunnerError> {
        if let Some(file) = &mut self.current {
            file.failures.push(failure.clone());
        }
        Ok(())
    }

    fn end_test(&mut self, _failed: bool) -> Result<(), RunnerError> {
        if let Some(file) = &mut self.current {
            file.write_testcase()?;
        }
        Ok(())
    }

    fn end_class(&mut self) -> Result<(), RunnerError> {
        self.close_current()
    }

    fn end_suite(&mut self, _result: &RunResult) -> Result<(), RunnerError> {
        // The engine closes classes on the way out; this is the last-resort
        // guarantee that no file handle survives the suite.
        self.close_current()
    }
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// CDATA cannot contain the terminator sequence; split it across sections.
fn cdata_escape(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}
