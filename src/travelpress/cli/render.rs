use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use travelpress::api::{CmdMessage, MessageLevel, PageInfo};
use travelpress::config::PressConfig;
use travelpress::model::Article;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 34;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per article: id, title with province, relative age.
pub(super) fn print_article_list(articles: &[Article], page: Option<&PageInfo>) {
    let now = Utc::now();
    for article in articles {
        println!("{}", article_line(article, now));
    }
    if let Some(page) = page {
        if page.has_next {
            println!(
                "{}",
                format!("-- page {}, more with --page {}", page.number, page.number + 1).dimmed()
            );
        }
    }
}

fn article_line(article: &Article, now: DateTime<Utc>) -> String {
    let mut label = article.title.clone();
    if !article.province.is_empty() {
        label = format!("{} · {}", label, article.province);
    }
    let marker = if article.is_new(now) {
        "new "
    } else if article.is_trending() {
        "hot "
    } else {
        ""
    };

    let available = LINE_WIDTH.saturating_sub(ID_WIDTH + TIME_WIDTH + marker.width());
    let title = truncate_to_width(&label, available);
    let padding = available.saturating_sub(title.width());

    let id = format!("{:<width$}", article.id.as_str(), width = ID_WIDTH);
    format!(
        "{}{}{}{}{}",
        id.yellow(),
        marker.cyan(),
        title,
        " ".repeat(padding),
        format_time_ago(article.created_at, now).dimmed(),
    )
}

pub(super) fn print_article(article: &Article, body: &str) {
    println!("{}", article.title.bold());
    let mut meta = format!(
        "{} · {} min read · {} views",
        article.author,
        article.reading_time_minutes(),
        article.views
    );
    if !article.province.is_empty() {
        meta = format!("{} · {}", article.province, meta);
    }
    println!("{}", meta.dimmed());

    let toc = article.table_of_contents();
    if toc.len() > 1 {
        println!();
        for entry in toc {
            println!("  {} {}", "-".dimmed(), entry.title);
        }
    }
    println!("--------------------------------");
    println!("{}", body);
}

pub(super) fn print_config(config: &PressConfig) {
    for key in PressConfig::KEYS {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
    println!("{}", format!("{} account(s) configured", config.accounts.len()).dimmed());
}

/// Upload progress for one image, redrawn in place on stderr.
pub(super) fn print_progress(name: &str, percent: u8) {
    eprint!("\r  {} {:>3}%", name, percent);
    if percent >= 100 {
        eprintln!();
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn truncates_on_display_width() {
        assert_eq!(truncate_to_width("Boracay", 10), "Boracay");
        assert_eq!(truncate_to_width("Puerto Princesa", 8), "Puerto …");
        // Wide characters count double.
        assert_eq!(truncate_to_width("日本語の旅", 5), "日本…");
    }

    #[test]
    fn time_is_right_aligned() {
        let now = Utc::now();
        let s = format_time_ago(now - Duration::hours(3), now);
        assert_eq!(s.width(), TIME_WIDTH);
        assert!(s.trim_start().starts_with("3 hours"));
    }
}
