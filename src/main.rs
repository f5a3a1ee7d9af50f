use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use review_scrape::config::{
    parse_word_list, AnalysisConfig, SiteProfile, DEFAULT_ORIGIN, WORD_CLASSES,
};
use review_scrape::morph::{Analyzer, IpadicAnalyzer, LexiconAnalyzer};
use review_scrape::request::HttpClient;
use review_scrape::{analyze, crawl, info_time, Report, Result, ScoreRange};

#[derive(Parser)]
#[command(name = "review_scrape", about = "Scrape a review listing and count its words")]
struct Cli {
    /// First listing page, e.g. https://filmarks.com/animes/4206/5682
    url: String,
    /// Score bucket to analyze, `min-max` with max excluded
    #[arg(short, long, default_value = "4-5")]
    range: ScoreRange,
    /// Top-level part of speech to keep; repeat for several
    #[arg(
        short,
        long = "category",
        value_parser = WORD_CLASSES,
        default_values_t = ["名詞".to_string()]
    )]
    categories: Vec<String>,
    /// Comma separated words for the word cloud to leave out
    #[arg(long, default_value = "")]
    stop: String,
    /// Comma separated words to count
    #[arg(short, long, default_value = "")]
    targets: String,
    /// Lexicon TSV (surface, part of speech, base form) to use instead of IPADIC
    #[arg(short, long)]
    lexicon: Option<PathBuf>,
    /// Origin that relative links are resolved against
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    origin: String,
    /// Most frequent words to print
    #[arg(short = 'n', long, default_value = "20")]
    top: usize,
    /// Print the whole report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let cli = Cli::parse();

    let analyzer: Box<dyn Analyzer> = match &cli.lexicon {
        Some(path) => {
            let lexicon = LexiconAnalyzer::from_file(path)?;
            info_time!("Lexicon holds {} entries", lexicon.len());
            Box::new(lexicon)
        }
        None => Box::new(IpadicAnalyzer::new()?),
    };

    let profile = SiteProfile {
        origin: cli.origin.clone(),
        ..SiteProfile::default()
    };
    let client = HttpClient::default();
    let crawl = crawl(&client, profile, &cli.url).await?;

    let config = AnalysisConfig {
        range: cli.range,
        categories: cli.categories.clone(),
        stop_words: parse_word_list(&cli.stop),
        target_words: parse_word_list(&cli.targets),
    };
    let report = analyze(&crawl.dataset, &config, &*analyzer)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stats": crawl.stats,
                "records": crawl.dataset,
                "report": report,
            }))?
        );
    } else {
        print_report(&report, cli.top);
    }

    info_time!(start_time, "Full program time:");
    Ok(())
}

fn print_report(report: &Report, top: usize) {
    println!("{} reviews in range", report.selected.len());

    if !report.targets.is_empty() {
        println!("\nTarget words");
        for (word, count) in report.targets.iter() {
            println!("{:<20} {}", word, count);
        }
    }

    if !report.has_words() {
        println!("\nNo words matched the selected parts of speech.");
        return;
    }
    println!("\nMost frequent words");
    for (label, count) in report.frequencies.ranked_labels().into_iter().take(top) {
        println!("{:<20} {}", label, count);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn categories_default_to_nouns() {
        let cli =
            Cli::try_parse_from(["review_scrape", "https://filmarks.com/animes/1/2"]).unwrap();
        assert_eq!(cli.categories, vec!["名詞"]);
        assert_eq!(cli.range, ScoreRange::new(4.0, 5.0).unwrap());
    }

    #[test]
    fn categories_must_be_known_word_classes() {
        let cli =
            Cli::try_parse_from(["review_scrape", "u", "-c", "形容詞", "-c", "副詞"]).unwrap();
        assert_eq!(cli.categories, vec!["形容詞", "副詞"]);
        assert!(Cli::try_parse_from(["review_scrape", "u", "-c", "助詞"]).is_err());
    }
}
