use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use console::style;

/// Leveled console output.
///
/// Info, success, verbose and plain lines go to stdout; warnings and errors
/// go to stderr. Verbose lines are dropped unless verbose mode is on.
pub struct Logger {
    verbose: bool,
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self::with_writers(verbose, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(verbose: bool, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            verbose,
            out: RefCell::new(out),
            err: RefCell::new(err),
        }
    }

    /// A logger writing into in-memory buffers, returned as `(logger, stdout, stderr)`.
    pub fn captured(verbose: bool) -> (Self, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        let logger = Self::with_writers(verbose, Box::new(out.clone()), Box::new(err.clone()));
        (logger, out, err)
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.line_out(format!("{} {}", style("ℹ").blue(), msg.as_ref()));
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.line_out(format!("{} {}", style("✓").green(), msg.as_ref()));
    }

    pub fn warning(&self, msg: impl AsRef<str>) {
        self.line_err(format!("{} {}", style("⚠").yellow().bold(), msg.as_ref()));
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.line_err(format!("{} {}", style("✗").red().bold(), msg.as_ref()));
    }

    pub fn verbose(&self, msg: impl AsRef<str>) {
        if self.verbose {
            self.line_out(format!("{} {}", style("  →").blue(), msg.as_ref()));
        }
    }

    /// A line without an icon prefix.
    pub fn plain(&self, msg: impl AsRef<str>) {
        self.line_out(msg.as_ref().to_string());
    }

    /// Warning with the dry-run marker.
    pub fn dry_run(&self, msg: impl AsRef<str>) {
        self.warning(format!("[DRY-RUN] {}", msg.as_ref()));
    }

    // Console output is best-effort; a closed pipe must not abort a scaffold run.
    fn line_out(&self, line: String) {
        let _ = writeln!(self.out.borrow_mut(), "{line}");
    }

    fn line_err(&self, line: String) {
        let _ = writeln!(self.err.borrow_mut(), "{line}");
    }
}

/// Shared in-memory sink used by [`Logger::captured`].
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
