//! Interactive price browser reading commands from stdin.
//!
//! The session owns its selection, price snapshot and [`AppContext`]; each
//! command line updates that state and returns the text to print.

use crate::context::AppContext;
use crate::render::render_table;
use crate::report::summary_output;
use crate::DEFAULT_HEADLINES;
use soko_data::assistant::generate_response;
use soko_data::{Selection, ViewMode, ALL};
use soko_db::snapshot::PriceSnapshot;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Log entries printed by `logs` when no count is given.
const DEFAULT_LOG_LINES: usize = 20;

const HELP: &str = "\
Commands:
  view county|commodity   switch grouping
  county <name>|all       select a county (switches to county view)
  commodity <name>|all    select a commodity (switches to commodity view)
  search [text]           filter by commodity, county or market; empty clears
  reset                   clear selectors and search
  open <path>             browse another price CSV
  reload                  read the current price CSV again
  summary                 price headlines and last update
  ask <question>          ask the price assistant
  logs [n]                recent session log
  help                    this text
  quit                    leave";

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct BrowseSession {
    prices_csv: PathBuf,
    ctx: AppContext,
    selection: Selection,
    snapshot: Rc<PriceSnapshot>,
}

/// Key of `keys` equal to `wanted` ignoring case, or [`ALL`].
fn resolve_key<'a>(mut keys: impl Iterator<Item = &'a str>, wanted: &str) -> Option<String> {
    if wanted.eq_ignore_ascii_case(ALL) {
        return Some(ALL.to_string());
    }
    let folded = wanted.to_lowercase();
    keys.find(|k| k.to_lowercase() == folded).map(str::to_string)
}

impl BrowseSession {
    pub fn open(prices_csv: PathBuf, mut ctx: AppContext) -> anyhow::Result<Self> {
        let snapshot = ctx.snapshot(&prices_csv)?;
        Ok(BrowseSession {
            prices_csv,
            ctx,
            selection: Selection::default(),
            snapshot,
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Status line followed by the selected prices.
    pub fn view_text(&self) -> String {
        let records = self.selection.select(&self.snapshot.index);
        let mut status = format!(
            "[{} view | county: {} | commodity: {}",
            self.selection.view, self.selection.county, self.selection.commodity
        );
        if !self.selection.search.is_empty() {
            status.push_str(&format!(" | search: {:?}", self.selection.search));
        }
        status.push_str(&format!(
            " | {} of {} prices]",
            records.len(),
            self.snapshot.record_count
        ));
        format!("{}\n{}", status, render_table(&records))
    }

    pub fn handle(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let text = match command.to_lowercase().as_str() {
            "" => return Outcome::Continue(String::new()),
            "quit" | "exit" => return Outcome::Quit,
            "help" => HELP.to_string(),
            "view" => match arg.parse::<ViewMode>() {
                Ok(view) => {
                    self.selection.view = view;
                    self.view_text()
                }
                Err(e) => e,
            },
            "county" => match resolve_key(self.snapshot.index.counties(), arg) {
                Some(county) => {
                    self.selection.view = ViewMode::County;
                    self.selection.county = county;
                    self.view_text()
                }
                None => format!("No prices for county {:?}.", arg),
            },
            "commodity" => match resolve_key(self.snapshot.index.commodities(), arg) {
                Some(commodity) => {
                    self.selection.view = ViewMode::Commodity;
                    self.selection.commodity = commodity;
                    self.view_text()
                }
                None => format!("No prices for commodity {:?}.", arg),
            },
            "search" => {
                self.selection.search = arg.to_string();
                self.view_text()
            }
            "reset" => {
                self.selection = Selection {
                    view: self.selection.view,
                    ..Selection::default()
                };
                self.view_text()
            }
            "open" if arg.is_empty() => "Usage: open <path>".to_string(),
            "open" => {
                let path = PathBuf::from(arg);
                match self.ctx.snapshot(&path) {
                    Ok(snapshot) => {
                        self.prices_csv = path;
                        self.snapshot = snapshot;
                        self.selection = Selection::default();
                        self.view_text()
                    }
                    Err(e) => format!("Could not open {}: {:#}", arg, e),
                }
            }
            "reload" => match self.ctx.reload(&self.prices_csv) {
                Ok(snapshot) => {
                    self.snapshot = snapshot;
                    self.view_text()
                }
                Err(e) => format!("Reload failed, keeping previous prices: {:#}", e),
            },
            "summary" => summary_output(&self.snapshot),
            "ask" if arg.is_empty() => "Usage: ask <question>".to_string(),
            "ask" => {
                self.ctx.monitor.info(format!("Assistant asked {:?}", arg));
                generate_response(arg, &self.snapshot.index)
            }
            "logs" => {
                let n = arg.parse().unwrap_or(DEFAULT_LOG_LINES);
                let lines: Vec<String> =
                    self.ctx.monitor.recent(n).map(|e| e.to_string()).collect();
                if lines.is_empty() {
                    "No log entries.".to_string()
                } else {
                    lines.join("\n")
                }
            }
            other => format!("Unknown command {:?}. Type \"help\" for commands.", other),
        };
        Outcome::Continue(text)
    }
}

pub fn run_browse(prices_csv: &str, cache_ttl_secs: u64) -> anyhow::Result<()> {
    let ctx = AppContext::new(Duration::from_secs(cache_ttl_secs), DEFAULT_HEADLINES);
    let mut session = BrowseSession::open(PathBuf::from(prices_csv), ctx)?;
    println!("{}", session.view_text());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        print!("soko> ");
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.handle(&line) {
            Outcome::Continue(text) if text.is_empty() => {}
            Outcome::Continue(text) => println!("{}", text),
            Outcome::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{temp_csv, SAMPLE_CSV};

    fn session(name: &str) -> (BrowseSession, PathBuf) {
        let path = temp_csv(name, SAMPLE_CSV);
        let ctx = AppContext::new(Duration::from_secs(3600), DEFAULT_HEADLINES);
        (BrowseSession::open(path.clone(), ctx).unwrap(), path)
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("session quit"),
        }
    }

    #[test]
    fn initial_view_lists_everything() {
        let (session, path) = session("initial");
        let view = session.view_text();
        assert!(view.starts_with("[county view | county: all | commodity: all | 3 of 3 prices]"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn county_command_resolves_case_and_switches_view() {
        let (mut session, path) = session("county");
        session.handle("view commodity");
        let view = text(session.handle("county uasin gishu"));
        assert_eq!(session.selection().view, ViewMode::County);
        assert_eq!(session.selection().county, "Uasin Gishu");
        assert!(view.contains("1 of 3 prices"));
        assert!(view.contains("Eldoret"));

        let unknown = text(session.handle("county Mombasa"));
        assert_eq!(unknown, "No prices for county \"Mombasa\".");
        assert_eq!(session.selection().county, "Uasin Gishu");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn commodity_search_and_reset() {
        let (mut session, path) = session("commodity");
        text(session.handle("commodity MAIZE"));
        assert_eq!(session.selection().commodity, "Maize");
        let view = text(session.handle("search eldoret"));
        assert!(view.contains("search: \"eldoret\""));
        assert!(view.contains("1 of 3 prices"));

        let cleared = text(session.handle("search"));
        assert!(cleared.contains("2 of 3 prices"));

        text(session.handle("reset"));
        assert_eq!(session.selection().view, ViewMode::Commodity);
        assert_eq!(session.selection().commodity, ALL);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn reload_failure_keeps_previous_prices() {
        let (mut session, path) = session("reload");
        std::fs::remove_file(&path).unwrap();
        let reply = text(session.handle("reload"));
        assert!(reply.starts_with("Reload failed, keeping previous prices"));
        assert!(session.view_text().contains("3 of 3 prices"));
        let logs = text(session.handle("logs 1"));
        assert!(logs.contains("ERROR"));
    }

    #[test]
    fn open_switches_file_and_resets_selection() {
        let (mut session, path) = session("open-first");
        let other = temp_csv(
            "open-second",
            "commodity,county,market,price,unit,date\nBeans,Kisumu,Kibuye,100,kg,2024-02-01\n",
        );
        session.handle("county Nakuru");
        let view = text(session.handle(&format!("open {}", other.display())));
        assert_eq!(session.selection(), &Selection::default());
        assert!(view.contains("1 of 1 prices"));
        assert!(view.contains("Kibuye"));
        std::fs::remove_file(path).unwrap();
        std::fs::remove_file(other).unwrap();
    }

    #[test]
    fn misc_commands() {
        let (mut session, path) = session("misc");
        assert_eq!(session.handle("quit"), Outcome::Quit);
        assert_eq!(session.handle("  "), Outcome::Continue(String::new()));
        assert!(text(session.handle("help")).starts_with("Commands:"));
        assert!(text(session.handle("view region")).contains("unknown view"));
        assert!(text(session.handle("summary")).contains("Last update: 2024-01-02"));
        assert!(text(session.handle("frobnicate")).starts_with("Unknown command"));
        assert_eq!(text(session.handle("ask")), "Usage: ask <question>");
        std::fs::remove_file(path).unwrap();
    }
}
