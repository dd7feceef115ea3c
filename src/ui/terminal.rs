//! Terminal results region for the command-line client.

use owo_colors::OwoColorize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::render::{DisplayFragment, ResultCard, ResultsView};

#[derive(Default)]
struct TerminalState {
    spinner: Option<indicatif::ProgressBar>,
    markup: String,
}

/// Prints fragments to the terminal
///
/// The loading placeholder is an animated spinner on stderr; errors and
/// result cards are printed to stdout once the search resolves.
#[derive(Default)]
pub struct TerminalView {
    state: Mutex<TerminalState>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn spinner(msg: &str) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl ResultsView for TerminalView {
    fn replace(&self, fragment: &DisplayFragment) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
        state.markup = fragment.to_html();

        match fragment {
            DisplayFragment::Loading => {
                state.spinner = Some(Self::spinner("Searching..."));
            }
            DisplayFragment::Error(message) => {
                eprintln!("{} {}", "✗".red().bold(), message.red());
            }
            DisplayFragment::Results(cards) if cards.is_empty() => {
                println!("{} No results found.", "○".white().dimmed());
            }
            DisplayFragment::Results(cards) => {
                println!(
                    "{} Found {} papers",
                    "✓".green().bold(),
                    cards.len().to_string().bold()
                );
                println!();
                for (i, card) in cards.iter().enumerate() {
                    print_card(i + 1, card);
                }
            }
        }
    }

    fn markup(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .markup
            .clone()
    }

    fn set_markup(&self, markup: String) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .markup = markup;
    }
}

fn print_card(rank: usize, card: &ResultCard) {
    println!("{:>3}. {}", rank.dimmed(), card.title.bold());

    let similarity = card
        .similarity
        .as_deref()
        .map(|d| format!("distance {}", d))
        .unwrap_or_default();
    let meta = [card.id.as_str(), card.date.as_str(), similarity.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    println!("     {}", meta.yellow());

    if !card.authors.is_empty() {
        println!("     {}", card.authors.dimmed());
    }
    println!("     {}", card.abstract_preview);

    if !card.categories.is_empty() {
        let tags: Vec<String> = card.categories.iter().map(|c| format!("[{}]", c)).collect();
        println!("     {}", tags.join(" ").cyan());
    }
    if !card.url.is_empty() {
        println!("     {}", card.url.blue().underline());
    }
    if let Some(pdf) = &card.pdf {
        println!("     {} {}", "pdf:".dimmed(), pdf.blue().underline());
    }
    println!("     {} {}", "similar:".dimmed(), card.similar_link.dimmed());
    println!();
}
