//! Interactive session loop: the command-line stand-in for the viewer
//! shell. Each line is one discrete mutation against the session; the
//! only call that blocks is `submit`.

use markera_core::error::MarkeraError;
use markera_core::model::RegionId;
use markera_core::session::{Session, ZOOM_STEP};
use markera_core::submit::HttpBackend;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::clipboard;
use crate::output;

enum Flow {
    Continue,
    Quit,
}

pub fn run(file: PathBuf, api_url: &str, api_path: &str) -> Result<(), MarkeraError> {
    let backend = HttpBackend::new(api_url, api_path);
    let mut session = Session::new();
    session.select_file(&file)?;
    println!(
        "Loaded {} ({} page(s)), submitting to {}. Type 'help' for commands.",
        file.display(),
        session.page_count(),
        backend.endpoint()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("markera p{}> ", session.page());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match execute(&mut session, &backend, line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(message) => eprintln!("Error: {message}"),
        }
    }

    Ok(())
}

fn execute(session: &mut Session, backend: &HttpBackend, line: &str) -> Result<Flow, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens[0] {
        "add" => {
            let id = session.add_main().map_err(stringify)?;
            if let Some(region) = session.store().get(id) {
                println!("added main box {} on page {}", region.index, session.page());
            }
        }
        "sub" => {
            let parent = resolve_region(session, arg(&tokens, 1, "main box index")?)?;
            let id = session.add_sub(parent).map_err(stringify)?;
            println!("added sub box {} on page {}", label(session, id), session.page());
        }
        "rm" => {
            let id = resolve_region(session, arg(&tokens, 1, "box label")?)?;
            session.remove(id).map_err(stringify)?;
        }
        "mv" => {
            let id = resolve_region(session, arg(&tokens, 1, "box label")?)?;
            let x: f64 = parse_number(arg(&tokens, 2, "x")?, "x coordinate")?;
            let y: f64 = parse_number(arg(&tokens, 3, "y")?, "y coordinate")?;
            session.drag(id, x, y).map_err(stringify)?;
        }
        "resize" => {
            let id = resolve_region(session, arg(&tokens, 1, "box label")?)?;
            let width: f64 = parse_number(arg(&tokens, 2, "width")?, "width")?;
            let height: f64 = parse_number(arg(&tokens, 3, "height")?, "height")?;
            let rect = session
                .store()
                .get(id)
                .map(|r| r.rect)
                .ok_or_else(|| "box disappeared".to_string())?;
            let x: f64 = match tokens.get(4) {
                Some(t) => parse_number(t, "x coordinate")?,
                None => rect.x,
            };
            let y: f64 = match tokens.get(5) {
                Some(t) => parse_number(t, "y coordinate")?,
                None => rect.y,
            };
            session.resize(id, x, y, width, height).map_err(stringify)?;
        }
        "ls" => output::table::print_regions(session),
        "page" => {
            let page: u32 = parse_number(arg(&tokens, 1, "page number")?, "page number")?;
            session.goto_page(page).map_err(stringify)?;
        }
        "next" => session.change_page(1),
        "prev" => session.change_page(-1),
        "zoom" => match arg(&tokens, 1, "direction (in/out)")? {
            "in" => {
                session.zoom(ZOOM_STEP);
                println!("scale {:.1}", session.scale());
            }
            "out" => {
                session.zoom(-ZOOM_STEP);
                println!("scale {:.1}", session.scale());
            }
            other => return Err(format!("invalid zoom direction '{other}', use in or out")),
        },
        "submit" => {
            if session.submit(backend) {
                output::table::print_result(session.result_text());
            } else {
                println!("nothing to submit: add at least one box first");
            }
        }
        "show" => output::table::print_result(session.result_text()),
        "copy" => {
            if session.result_text().is_empty() {
                println!("nothing to copy");
            } else if clipboard::copy(session.result_text()) {
                println!("copied to clipboard");
            }
        }
        "open" => {
            let path = arg(&tokens, 1, "file path")?;
            session.select_file(Path::new(path)).map_err(stringify)?;
            println!("Loaded {} ({} page(s))", path, session.page_count());
        }
        "help" => print_help(),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => return Err(format!("unknown command '{other}', try 'help'")),
    }

    Ok(Flow::Continue)
}

/// Resolve a user-facing box label (`3` for a main box, `2-1` for a sub
/// box) to its region id.
fn resolve_region(session: &Session, token: &str) -> Result<RegionId, String> {
    let store = session.store();
    match token.split_once('-') {
        None => {
            let index: u32 = parse_number(token, "main box index")?;
            store
                .iter()
                .find(|(_, r)| r.is_main() && r.index == index)
                .map(|(_, r)| r.id)
                .ok_or_else(|| format!("no main box {index}"))
        }
        Some((main_token, sub_token)) => {
            let main_index: u32 = parse_number(main_token, "main box index")?;
            let sub_index: u32 = parse_number(sub_token, "sub box index")?;
            let parent = store
                .iter()
                .find(|(_, r)| r.is_main() && r.index == main_index)
                .map(|(_, r)| r.id)
                .ok_or_else(|| format!("no main box {main_index}"))?;
            store
                .iter()
                .find(|(_, r)| r.parent_id() == Some(parent) && r.index == sub_index)
                .map(|(_, r)| r.id)
                .ok_or_else(|| format!("no sub box {main_index}-{sub_index}"))
        }
    }
}

/// The user-facing label of a region: its index, or parent-sub for subs.
fn label(session: &Session, id: RegionId) -> String {
    let store = session.store();
    match store.get(id) {
        Some(region) => match region.parent_id() {
            None => region.index.to_string(),
            Some(parent) => {
                let parent_index = store.get(parent).map(|p| p.index).unwrap_or(0);
                format!("{}-{}", parent_index, region.index)
            }
        },
        None => id.to_string(),
    }
}

fn arg<'a>(tokens: &[&'a str], position: usize, what: &str) -> Result<&'a str, String> {
    tokens
        .get(position)
        .copied()
        .ok_or_else(|| format!("missing {what}"))
}

fn parse_number<T: FromStr>(token: &str, what: &str) -> Result<T, String> {
    token
        .parse()
        .map_err(|_| format!("invalid {what} '{token}'"))
}

fn stringify(e: MarkeraError) -> String {
    e.to_string()
}

fn print_help() {
    println!(
        "\
commands:
  add                       add a main box on the current page
  sub <main>                add a sub box under main box <main>
  rm <label>                remove a box (label: 3 or 2-1); removing a
                            main box removes its sub boxes too
  mv <label> <x> <y>        move a box (clamped to the page)
  resize <label> <w> <h> [x y]   resize (and optionally move) a box
  ls                        list boxes on all pages
  page <n> | next | prev    navigate pages
  zoom in | zoom out        change display zoom
  submit                    send the file and boxes to the parsing service
  show                      print the last parsed text
  copy                      copy the last parsed text to the clipboard
  open <file>               select a new file (clears all boxes)
  help                      this text
  quit                      leave"
    );
}
