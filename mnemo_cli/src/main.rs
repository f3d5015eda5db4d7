use chrono::Utc;
use clap::{Parser, Subcommand};
use mnemo_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mnemo")]
#[command(about = "Spaced repetition study system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a card to the deck
    Add {
        /// Prompt side of the card
        #[arg(long)]
        front: String,

        /// Answer side of the card
        #[arg(long)]
        back: String,

        /// Tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Study the cards that are due (default)
    Review {
        /// Cap on due cards this session
        #[arg(long)]
        limit: Option<usize>,

        /// Answer every prompt with this grade (for scripting)
        #[arg(long)]
        yes_quality: Option<u8>,
    },

    /// Show progress statistics
    Stats,

    /// List cards in the deck
    List {
        /// Only cards carrying this tag (repeatable, all must match)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Only cards matching this text
        #[arg(long)]
        search: Option<String>,

        /// Ordering: due, newest, or mastered
        #[arg(long)]
        sort: Option<String>,
    },

    /// Export the daily progress rollup to CSV
    Export {
        /// Output file
        #[arg(long)]
        output: PathBuf,
    },
}

/// Feedback printed after each graded card
struct ConsoleNotifier;

impl ReviewNotifier for ConsoleNotifier {
    fn on_review(&mut self, correct: bool) {
        if correct {
            println!("  ✓ Correct!");
        } else {
            println!("  ✗ Keep practicing");
        }
    }
}

fn main() -> Result<()> {
    mnemo_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Add { front, back, tags }) => cmd_add(data_dir, front, back, tags),
        Some(Commands::Review { limit, yes_quality }) => {
            cmd_review(data_dir, limit, yes_quality, &config)
        }
        Some(Commands::Stats) => cmd_stats(data_dir),
        Some(Commands::List { tags, search, sort }) => cmd_list(data_dir, tags, search, sort),
        Some(Commands::Export { output }) => cmd_export(data_dir, output),
        None => cmd_review(data_dir, None, None, &config),
    }
}

fn deck_file(data_dir: &PathBuf) -> PathBuf {
    data_dir.join("deck.json")
}

fn journal_file(data_dir: &PathBuf) -> PathBuf {
    data_dir.join("journal").join("reviews.jsonl")
}

fn cmd_add(data_dir: PathBuf, front: String, back: String, tags: Vec<String>) -> Result<()> {
    let deck_path = deck_file(&data_dir);
    let mut deck = Deck::load(&deck_path)?;

    let card = Card::new(front, back, tags, Utc::now());
    let id = card.id;
    deck.upsert(card);
    deck.save(&deck_path)?;

    println!("✓ Added card {}", id);
    println!("  Deck now holds {} cards", deck.len());
    Ok(())
}

fn cmd_review(
    data_dir: PathBuf,
    limit: Option<usize>,
    yes_quality: Option<u8>,
    config: &Config,
) -> Result<()> {
    let deck_path = deck_file(&data_dir);
    let mut deck = Deck::load(&deck_path)?;

    if deck.is_empty() {
        println!("The deck is empty - add some cards first.");
        return Ok(());
    }

    let now = Utc::now();
    let mut study = config.study.clone();
    if let Some(limit) = limit {
        study.max_due_per_session = limit;
    }

    let queue = build_session(&deck.cards, now, &study);
    if queue.is_empty() {
        println!("Nothing is due right now. Come back later!");
        return Ok(());
    }

    let preset = match yes_quality {
        Some(value) => Some(Quality::new(value)?),
        None => None,
    };

    let mut recorder = SessionRecorder::new(now);
    let mut notifier = ConsoleNotifier;
    let mut journal = JsonlJournal::new(journal_file(&data_dir));

    println!("Studying {} cards\n", queue.len());

    for (index, card_id) in queue.iter().enumerate() {
        let card = match deck.get(*card_id) {
            Some(card) => card.clone(),
            None => continue,
        };

        println!("── Card {}/{} ──", index + 1, queue.len());
        println!("  {}", card.front);

        let started = Instant::now();
        let quality = match preset {
            Some(quality) => quality,
            None => {
                wait_for_reveal()?;
                println!("  → {}", card.back);
                prompt_quality()?
            }
        };
        let response_ms = started.elapsed().as_millis() as u64;

        let reviewed_at = Utc::now();
        let updated = review(&card, quality, reviewed_at);

        journal.append(&JournalEntry {
            card_id: card.id,
            record: ReviewRecord::new(reviewed_at, quality),
        })?;

        recorder.record(StudyEvent::CardReviewed {
            card_id: card.id,
            at: reviewed_at,
            quality,
            response_ms: Some(response_ms),
            repetition_count: updated.repetition_count,
            strength_factor: updated.strength_factor,
        });
        notifier.on_review(quality.is_passing());

        deck.upsert(updated);
    }

    deck.save(&deck_path)?;
    recorder.finish(Utc::now());

    display_session_summary(&recorder.summary(), &deck);
    Ok(())
}

fn cmd_stats(data_dir: PathBuf) -> Result<()> {
    let deck = Deck::load(&deck_file(&data_dir))?;
    let now = Utc::now();

    let stats = summarize(&deck.cards, now);
    let daily = daily_progress(&deck.cards);
    let trend = accuracy_trend(&daily);

    println!("╭─────────────────────────────────────────╮");
    println!("│  STUDY PROGRESS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total cards:    {}", stats.total_cards);
    println!("  Due now:        {}", stats.due_cards);
    println!("  Mastered:       {}", stats.mastered_cards);
    println!("  Learning:       {}", stats.learning_cards);
    println!("  New:            {}", stats.new_cards);
    println!();
    println!("  Accuracy:       {:.1}%", stats.accuracy);
    println!("  Mastered share: {:.1}%", mastery_percent(&stats));
    println!("  Day streak:     {}", stats.streak);
    if trend != 0.0 {
        println!("  Weekly trend:   {:+.1}%", trend);
    }

    if !daily.is_empty() {
        println!();
        println!("  Recent days:");
        for stat in daily.iter().take(7) {
            println!(
                "    {}  {:>3} reviewed  {:>3} correct  streak {}",
                stat.date, stat.reviewed_count, stat.correct_count, stat.streak
            );
        }
    }

    Ok(())
}

fn cmd_list(
    data_dir: PathBuf,
    tags: Vec<String>,
    search_query: Option<String>,
    sort: Option<String>,
) -> Result<()> {
    let deck = Deck::load(&deck_file(&data_dir))?;
    let now = Utc::now();

    let order = match sort.map(|s| s.to_lowercase()).as_deref() {
        Some("newest") => deck::SortOrder::Newest,
        Some("mastered") => deck::SortOrder::Mastered,
        Some("due") | None => deck::SortOrder::Due,
        Some(other) => {
            eprintln!("Unknown sort order: {}. Using due-date order.", other);
            deck::SortOrder::Due
        }
    };

    let mut cards: Vec<Card> = deck::filter_by_tags(&deck.cards, &tags)
        .into_iter()
        .cloned()
        .collect();
    if let Some(query) = &search_query {
        let matched: Vec<Card> = deck::search(&cards, query).into_iter().cloned().collect();
        cards = matched;
    }
    let sorted = deck::sort_cards(&cards, order);

    if sorted.is_empty() {
        println!("No cards match.");
        return Ok(());
    }

    for card in sorted {
        let tag_list = if card.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", card.tags.join(", "))
        };
        println!(
            "  {}  ({}){}",
            card.front,
            deck::describe_next_review(card, now),
            tag_list
        );
    }

    Ok(())
}

fn cmd_export(data_dir: PathBuf, output: PathBuf) -> Result<()> {
    let deck = Deck::load(&deck_file(&data_dir))?;
    let daily = daily_progress(&deck.cards);

    let count = export::write_daily_csv(&daily, &output)?;

    println!("✓ Exported {} days to {}", count, output.display());
    Ok(())
}

fn display_session_summary(summary: &SessionSummary, deck: &Deck) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SESSION COMPLETE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Reviewed:  {}", summary.cards_reviewed);
    println!("  Correct:   {}", summary.correct);
    println!("  Missed:    {}", summary.incorrect);
    if let Some(avg) = summary.average_response_ms {
        println!("  Avg time:  {:.0} ms", avg);
    }

    if !summary.most_difficult.is_empty() {
        println!();
        println!("  Worth another look:");
        for card_id in &summary.most_difficult {
            if let Some(card) = deck.get(*card_id) {
                println!("    - {}", card.front);
            }
        }
    }
}

fn wait_for_reveal() -> Result<()> {
    print!("  [Enter] to reveal... ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

fn prompt_quality() -> Result<Quality> {
    loop {
        print!("  Grade 1-5 (1 = blackout, 5 = perfect): ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;

        match line.trim().parse::<u8>().map_err(|_| ()).and_then(|value| {
            Quality::new(value).map_err(|_| ())
        }) {
            Ok(quality) => return Ok(quality),
            Err(()) => println!("  Please enter a number from 1 to 5."),
        }
    }
}
