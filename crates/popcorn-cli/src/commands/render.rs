use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_models::{MovieDetail, SearchResultItem, UserRating, WatchedRecord, WatchedSummary};
use super::prompts::stars;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(title: &str) -> Cell {
    Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

/// Numbered result list; the number is what `:N` selects in browse
pub fn results_table(results: &[SearchResultItem]) -> Table {
    let mut table = table();
    table.set_header(vec![header("#"), header("Title"), header("Year"), header("IMDb ID"), header("Poster")]);
    for (i, item) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.title),
            Cell::new(format!("🗓 {}", item.year)),
            Cell::new(&item.imdb_id),
            Cell::new(if item.has_poster() { "🖼" } else { "-" }),
        ]);
    }
    table
}

pub fn detail_table(detail: &MovieDetail) -> Table {
    let mut table = table();
    let title = if detail.is_top() {
        format!("{} ({})  🏆 top rated", detail.title, detail.year)
    } else {
        format!("{} ({})", detail.title, detail.year)
    };
    table.set_header(vec![header(&title)]);

    let rows = [
        ("Released", detail.released.clone()),
        ("Runtime", detail.runtime.clone()),
        ("Genre", detail.genre.clone()),
        ("IMDb rating", format!("⭐ {}", detail.imdb_rating)),
        ("Plot", detail.plot.clone()),
        ("Starring", detail.actors.clone()),
        ("Directed by", detail.director.clone()),
        ("Poster", detail.poster.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

pub fn rated_line(rating: UserRating) -> String {
    format!("You rated this movie {} {}", rating, stars(rating.value()).yellow())
}

pub fn summary_line(summary: &WatchedSummary) -> String {
    format!(
        "#️⃣  {} movies   ⭐ {:.2}   🌟 {:.2}   ⏳ {:.0} min",
        summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
    )
}

pub fn watched_table(records: &[WatchedRecord]) -> Table {
    let mut table = table();
    table.set_header(vec![
        header("Title"),
        header("Year"),
        header("IMDb"),
        header("Yours"),
        header("Runtime"),
        header("IMDb ID"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.title),
            Cell::new(&record.year),
            Cell::new(or_unknown(record.imdb_rating.map(|r| format!("⭐ {}", r)))),
            Cell::new(format!("🌟 {}", record.user_rating)),
            Cell::new(or_unknown(record.runtime.map(|m| format!("⏳ {} min", m)))),
            Cell::new(&record.imdb_id),
        ]);
    }
    table
}
