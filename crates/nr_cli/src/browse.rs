use nr_core::{Article, Category, FetchError};
use nr_feed::{run_fetch, Debouncer, FeedController, FetchTicket, Preferences, ShareLinks};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::render;

type FetchOutcome = (FetchTicket, Result<Vec<Article>, FetchError>);

const HELP: &str = "\
Type to search (each line replaces the query, an empty line clears it).
  :c NAME   select a category (all, world, nation, business, technology,
            entertainment, sports, science, health)
  :b ID     toggle a bookmark
  :d        toggle dark mode
  :e        dismiss the error message
  :s ID     share an article
  :h        this help
  :q        quit";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Search(String),
    Category(String),
    Bookmark(String),
    Share(String),
    DarkMode,
    DismissError,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Input::Search(line.trim().to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match (name, arg) {
        ("q", _) => Input::Quit,
        ("h", _) => Input::Help,
        ("d", _) => Input::DarkMode,
        ("e", _) => Input::DismissError,
        ("c", arg) if !arg.is_empty() => Input::Category(arg.to_string()),
        ("b", arg) if !arg.is_empty() => Input::Bookmark(arg.to_string()),
        ("s", arg) if !arg.is_empty() => Input::Share(arg.to_string()),
        _ => Input::Unknown(line.trim().to_string()),
    }
}

/// Drives fetch tasks for the browse loop. Only one task is kept alive; a
/// superseded one is aborted, and its result would be discarded anyway.
struct Fetcher {
    results: mpsc::UnboundedSender<FetchOutcome>,
    in_flight: Option<JoinHandle<()>>,
}

impl Fetcher {
    fn start(&mut self, controller: &FeedController, ticket: FetchTicket) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        let source = controller.source();
        let timeout = controller.timeout();
        let results = self.results.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = run_fetch(source, &ticket, timeout).await;
            // The loop has exited if nobody receives.
            let _ = results.send((ticket, result));
        }));
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

pub async fn run(mut controller: FeedController, mut prefs: Preferences, delay: Duration) -> anyhow::Result<()> {
    let (debouncer, mut search) = Debouncer::new(controller.query().search.clone(), delay);
    let (results_tx, mut results) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut fetcher = Fetcher {
        results: results_tx,
        in_flight: None,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n", HELP);
    let ticket = controller.begin_fetch();
    fetcher.start(&controller, ticket);
    render::print_feed(&controller, prefs.dark_mode());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{}", HELP),
                    Input::Search(text) => debouncer.push(text),
                    Input::Category(name) => match name.parse::<Category>() {
                        Ok(category) => {
                            if let Some(ticket) = controller.select_category(category) {
                                fetcher.start(&controller, ticket);
                                render::print_feed(&controller, prefs.dark_mode());
                            }
                        }
                        Err(e) => println!("{}", e),
                    },
                    Input::Bookmark(id) => {
                        controller.toggle_bookmark(&id).await;
                        render::print_feed(&controller, prefs.dark_mode());
                    }
                    Input::DarkMode => {
                        prefs.toggle_dark_mode().await;
                        render::print_feed(&controller, prefs.dark_mode());
                    }
                    Input::DismissError => {
                        if controller.error().is_some() {
                            controller.dismiss_error();
                            render::print_feed(&controller, prefs.dark_mode());
                        }
                    }
                    Input::Share(id) => match controller.find(&id) {
                        Some(article) => render::print_share(article, &ShareLinks::for_article(article)?),
                        None => println!("No article with id {}", id),
                    },
                    Input::Unknown(text) => println!("Unknown command: {} (:h for help)", text),
                }
            }
            changed = search.changed() => {
                if changed.is_err() {
                    break;
                }
                let query = search.borrow_and_update().clone();
                if let Some(ticket) = controller.set_search(&query) {
                    fetcher.start(&controller, ticket);
                    render::print_feed(&controller, prefs.dark_mode());
                }
            }
            Some((ticket, result)) = results.recv() => {
                if controller.complete(&ticket, result) {
                    render::print_feed(&controller, prefs.dark_mode());
                } else {
                    debug!("Ignored result of superseded cycle {}", ticket.generation());
                }
            }
        }
    }

    // Dropping these cancels the pending search update and any fetch.
    drop(debouncer);
    drop(fetcher);
    Ok(())
}
