use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use arxiupull::constants::{DEFAULT_DATA_DIR, DEFAULT_OUTPUT_DIR};
use arxiupull::{
    Generator, NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient, ScrapeOptions,
    SharedProgressReporter, Storage, TagSystem, run_scrape,
};

// Emoji with fallback for terminals without Unicode support
static RADIO: Emoji<'_, '_> = Emoji("📻 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static PAGE: Emoji<'_, '_> = Emoji("📄 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Action {
    /// Fetch the episode catalog and download metadata and media
    #[default]
    Scrape,
    /// Generate the webapp JSON files from stored metadata
    Generate,
    /// Generate the tag index from stored metadata
    Tags,
}

/// Archive the En Guàrdia radio program from the 3Cat API
#[derive(Parser, Debug)]
#[command(name = "arxiupull")]
#[command(about = "Archive the En Guàrdia radio program from the 3Cat API")]
#[command(version)]
struct Args {
    /// What to do
    #[arg(value_enum, default_value_t = Action::Scrape)]
    action: Action,

    /// Directory holding episode metadata and media
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Output directory for generated webapp files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Skip media downloads; generated data points at remote URLs
    #[arg(long)]
    lazy: bool,

    /// Stop after this many listing pages (0 means all)
    #[arg(long, default_value = "0")]
    max_pages: u32,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    multi: MultiProgress,
    download_bar: Mutex<Option<ProgressBar>>,
    main_bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            download_bar: Mutex::new(None),
            main_bar,
        }
    }

    // Downloads run one at a time, so a single reusable bar is enough
    fn get_or_create_bar(&self) -> ProgressBar {
        let mut slot = self.download_bar.lock().unwrap();

        if let Some(bar) = slot.as_ref() {
            return bar.clone();
        }

        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(style);
        *slot = Some(bar.clone());
        bar
    }

    fn finish_bar(&self) {
        let mut slot = self.download_bar.lock().unwrap();
        if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingPage { page } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching page {}", page.to_string().cyan()));
            }

            ProgressEvent::PaginationInfo {
                total_pages,
                total_items,
                ..
            } => {
                self.main_bar.set_message(format!(
                    "{PAGE}{} episodes across {} pages",
                    total_items.to_string().cyan(),
                    total_pages.to_string().cyan()
                ));
            }

            ProgressEvent::PageProcessed {
                page,
                total_episodes,
                ..
            } => {
                self.main_bar.set_message(format!(
                    "{PAGE}Page {} done, {} episodes collected",
                    page.to_string().cyan(),
                    total_episodes.to_string().green()
                ));
            }

            ProgressEvent::AudioFallbackFailed {
                episode_title,
                error,
                ..
            } => {
                self.multi.suspend(|| {
                    println!(
                        "  {FAILURE}{} - no audio URL ({})",
                        truncate_title(&episode_title, 40).yellow(),
                        error.dimmed()
                    );
                });
            }

            ProgressEvent::EpisodeProcessing {
                index,
                total,
                episode_title,
            } => {
                self.main_bar.set_message(format!(
                    "[{}/{}] {}",
                    (index + 1).to_string().cyan(),
                    total.to_string().cyan(),
                    truncate_title(&episode_title, 50)
                ));
            }

            ProgressEvent::DownloadStarting { content_length, kind, episode_title } => {
                let bar = self.get_or_create_bar();
                bar.set_length(content_length.unwrap_or(0));
                bar.set_position(0);
                bar.set_message(format!(
                    "{} ({})",
                    truncate_title(&episode_title, 40),
                    kind.label()
                ));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                ..
            } => {
                let bar = self.get_or_create_bar();
                if let Some(total) = total_bytes {
                    bar.set_length(total);
                }
                bar.set_position(bytes_downloaded);
            }

            ProgressEvent::DownloadCompleted {
                kind,
                episode_title,
                bytes_downloaded,
            } => {
                let bar = self.get_or_create_bar();
                bar.set_position(bytes_downloaded);
                bar.set_message(format!(
                    "{SUCCESS}{} ({})",
                    truncate_title(&episode_title, 40).green(),
                    kind.label()
                ));
                self.finish_bar();
            }

            ProgressEvent::DownloadFailed {
                kind,
                episode_title,
                error,
            } => {
                self.finish_bar();
                self.multi.suspend(|| {
                    println!(
                        "  {FAILURE}{} ({}) - {}",
                        truncate_title(&episode_title, 30).red(),
                        kind.label(),
                        error.red()
                    );
                });
            }

            ProgressEvent::DownloadSkipped { .. }
            | ProgressEvent::MetadataSaved { .. }
            | ProgressEvent::MetadataExists { .. } => {}

            ProgressEvent::MetadataSkipped { path, error } => {
                self.multi.suspend(|| {
                    println!(
                        "  {FAILURE}Skipped {}: {}",
                        path.display().to_string().yellow(),
                        error.dimmed()
                    );
                });
            }

            ProgressEvent::ScrapeCompleted {
                succeeded,
                skipped,
                errored,
                ..
            } => {
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} succeeded, {} skipped, {} with errors",
                    "Scrape complete:".bold().green(),
                    succeeded.to_string().green().bold(),
                    skipped.to_string().yellow(),
                    if errored > 0 {
                        errored.to_string().red().bold()
                    } else {
                        errored.to_string().green()
                    }
                );
            }

            ProgressEvent::OutputWritten { path } => {
                self.main_bar.finish_and_clear();
                println!(
                    "{SUCCESS}Wrote {}",
                    path.display().to_string().cyan()
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let cut: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            RADIO,
            "arxiupull".bold().magenta(),
            "- En Guàrdia archiver".dimmed()
        );
    }

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    match args.action {
        Action::Scrape => {
            std::fs::create_dir_all(&args.data_dir).with_context(|| {
                format!("Failed to create data directory {}", args.data_dir.display())
            })?;

            let client = ReqwestClient::new();
            let storage = Storage::new(&args.data_dir);
            let options = ScrapeOptions {
                lazy: args.lazy,
                max_pages: args.max_pages,
            };

            let summary = run_scrape(&client, &storage, &options, reporter)
                .await
                .context("Scrape aborted")?;

            if !args.quiet && !summary.failures.is_empty() {
                println!("\n{}", "Failed downloads:".red().bold());
                for (title, error) in &summary.failures {
                    println!("  {}{} - {}", CROSS, title.yellow(), error.dimmed());
                }
            }

            if !args.quiet {
                println!(
                    "\n{FOLDER}Data: {}\n",
                    args.data_dir.display().to_string().cyan()
                );
            }
        }

        Action::Generate => {
            let generator = Generator::new(&args.data_dir);
            generator
                .generate_webapp_data(&args.output, args.lazy, &reporter)
                .context("Failed to generate webapp data")?;

            if !args.quiet {
                println!(
                    "\n{FOLDER}Output: {}\n",
                    args.output.display().to_string().cyan()
                );
            }
        }

        Action::Tags => {
            let tag_system = TagSystem::new(&args.data_dir);
            tag_system
                .generate_tags_file(&args.output, &reporter)
                .context("Failed to generate tag index")?;
        }
    }

    Ok(())
}
