use crate::events::{Event as E, Stage};
use super::Verbosity as V;
use colored::*;

/// Which terminal stream a line belongs on.  Errors go to stderr like the
/// errors reported from main.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Output handle that can be passed between contexts.  Makes
/// indentation for nested sections a little easier.
#[derive(Clone)]
pub struct Out {
    idt: usize,
    captured: Option<Vec<(Stream, String)>>,
}

impl Out {
    pub fn new(idt: usize) -> Self {
        Self { idt, captured: None }
    }

    /// Keeps lines instead of printing them
    #[cfg(test)]
    pub fn capturing() -> Self {
        Self { idt: 0, captured: Some(Vec::new()) }
    }

    fn dedent(&mut self) {
        if self.idt >= 2 {
            self.idt -= 2
        }
    }

    fn indent(&mut self) {
        self.idt += 2
    }

    fn reset(&mut self) {
        self.idt = 0
    }

    pub fn ln(&mut self, s: &str) {
        self.write(Stream::Stdout, s)
    }

    pub fn err(&mut self, s: &str) {
        self.write(Stream::Stderr, s)
    }

    fn write(&mut self, stream: Stream, s: &str) {
        let line = format!("{:indent$}{}", "", s, indent = self.idt);

        match (&mut self.captured, stream) {
            (Some(lines), _) => lines.push((stream, line)),
            (None, Stream::Stdout) => println!("{}", line),
            (None, Stream::Stderr) => eprintln!("{}", line),
        }
    }
}

pub struct RootContext {
    state: State,
    out: Out,
    v: V,
    diag_buf: Vec<E>,
}

enum State {
    Root,
    Stage(Stage),
    Final,
}

impl RootContext {
    pub fn new(v: V) -> Self {
        Self::with_out(v, Out::new(0))
    }

    fn with_out(v: V, out: Out) -> Self {
        Self { state: State::Root, out, v, diag_buf: Vec::new() }
    }

    pub fn handle(&mut self, ev: E) {
        match (&self.state, &ev) {
            // If we're not in verbose mode, collect stage progress into the diag
            // buffer so it can be replayed if the export fails
            (_, E::Stage(_) | E::Collected(_) | E::Built(_) | E::Resolved(_)) if self.v < V::Verbose => {
                self.diag_buf.push(ev);
            },
            (_, E::Error(_)) if !self.diag_buf.is_empty() && self.v > V::Quiet => {
                let replay_evs = std::mem::take(&mut self.diag_buf);
                self.v = V::Verbose;
                for diag_e in replay_evs {
                    self.handle(diag_e);
                }
                self.handle(ev);
            },
            (_, E::Stage(stage)) => {
                if matches!(self.state, State::Stage(_)) {
                    self.out.dedent();
                }
                self.out.ln(&format!("[ {} ]", stage));
                self.out.indent();
                self.state = State::Stage(*stage);
            },
            (State::Stage(_), E::Collected(n)) => {
                self.out.ln(&format!("{} inventory records", n));
            },
            (State::Stage(_), E::Built(ids)) => {
                for id in ids {
                    self.out.ln(id);
                }
            },
            (State::Stage(_), E::Resolved(units)) => {
                if self.v >= V::Debug {
                    for unit in units {
                        if unit.properties.is_empty() {
                            self.out.ln(&unit.tag());
                        } else {
                            self.out.ln(&format!("{} {{ {} }}", unit.tag(), unit.properties.tag()));
                        }
                    }
                } else {
                    self.out.ln(&format!("{} units ordered", units.len()));
                }
            },
            (_, E::Debug(msg)) => {
                if self.v >= V::Debug {
                    self.out.ln(msg);
                }
            },
            (State::Final, E::Done(summary)) => {
                if self.v > V::Quiet {
                    self.out.ln(&format!("{}", "Success".green().bold()));
                    self.out.ln(&format!(
                        "Exported {} packages, {} sources, {} resources and {} settings to {}",
                        summary.packages,
                        summary.sources,
                        summary.resources,
                        summary.settings,
                        summary.output.display(),
                    ));
                }
            },
            (State::Final, E::Error(msg)) => {
                self.out.err(&format!("{}", "Error".red().bold()));
                self.out.err(msg);
            },
            (_, E::Done(_) | E::Error(_)) => {
                self.out.reset();
                self.state = State::Final;
                self.handle(ev)
            },
            _ => (),
        }
    }
}
