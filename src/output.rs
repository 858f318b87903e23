//! Report rendering and logging.
//!
//! The HTML document is built fully in memory and written in one go, so a
//! failed run never leaves a partial page on stdout.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::model::{Item, Rating};
use crate::report::Report;
use crate::stats::PersonStats;

/// Logs every person's statistics as pretty-printed JSON.
pub fn log_stats(report: &Report) -> Result<()> {
    for (person, stats) in &report.stats {
        let json = serde_json::to_string_pretty(stats)?;
        debug!(person = %person, "{json}");
    }
    Ok(())
}

/// Renders `report` and writes the document to `out`.
pub fn write_report<W: Write>(report: &Report, mut out: W) -> Result<()> {
    let html = render_html(report);
    out.write_all(html.as_bytes())?;
    out.flush()?;
    debug!(bytes = html.len(), "Report written");
    Ok(())
}

/// Renders the full HTML page.
pub fn render_html(report: &Report) -> String {
    format!(
        r#"<html>
<head>
<meta charset="UTF-8">
<title>Year of the YYL</title>
<style>{css}</style>
</head>
<body>
<div id="content">
<h1>Year of the YYL</h1>

<p>
In 2015, three boys decided to embark on an epic challenge: eat all 40 items on
the Yin Yin menu, in order, in less than a year. Three men emerged, victorious.
</p>

<h2>Ratings</h2>

<div id="items">
{items}</div>

<hr class="clear" />

<h2>Statistics</h2>
{stats}
</div>
</body>
</html>
"#,
        css = inline_css(),
        items = render_items(&report.items),
        stats = render_all_stats(report),
    )
}

fn render_items(items: &[Item]) -> String {
    items.iter().map(render_item).collect()
}

fn render_item(item: &Item) -> String {
    let name = html_escape(&item.name);
    let mut ratings = String::new();
    for (who, rating) in &item.ratings {
        ratings.push_str(&render_rating(who, rating));
    }

    format!(
        r#"<div class="item">
<h3>#{number}: {name}</h3>
<img src="img/{number:02}.jpg" title="{name}" />
<div class="ratings">
<ul>
{ratings}</ul>
</div>
</div>
"#,
        number = item.number,
    )
}

fn render_rating(who: &str, rating: &Rating) -> String {
    let mut line = format!(
        "<li>{}: {}/{}",
        html_escape(who),
        rating.value,
        rating.max
    );
    if rating.date.is_some() {
        line.push_str(&format!(" on {}", rating.formatted_date));
    }
    line.push_str("</li>\n");
    line
}

fn render_all_stats(report: &Report) -> String {
    report
        .stats
        .iter()
        .map(|(who, stats)| render_stats(who, stats))
        .collect()
}

fn render_stats(who: &str, stats: &PersonStats) -> String {
    let mut html = format!("\n<h3>{}</h3>\n", html_escape(who));

    if stats.has_date {
        let after = stats.longest_after.as_deref().unwrap_or_default();
        html.push_str(&format!(
            "<p>Most visits in a week: {}</p>\n\
             <p>Longest time between YYLs: {} after {}</p>\n",
            stats.max_per_week,
            stats.formatted_longest,
            html_escape(after),
        ));
        html.push_str(&render_chart("Day of Week", &stats.weekday_ratios));
    }

    html.push_str(&render_chart("Rating", &stats.rating_ratios));
    html.push_str("<br class=\"clear\" />\n");
    html
}

/// A bar per value; values are percentages in `0..=100`.
fn render_chart(title: &str, ratios: &[f64]) -> String {
    let mut html = format!("<div class=\"chart\">\n<h4>{title}</h4>\n");
    for &ratio in ratios {
        html.push_str(&render_bar(ratio));
    }
    html.push_str("</div>\n");
    html
}

fn render_bar(ratio: f64) -> String {
    let height = ratio.clamp(0.0, 100.0);
    format!(
        r#"<div class="progress-bar">
<div class="progress-track">
<div class="progress-fill" style="height: {height:.2}%; top: {top:.2}%">
<span>{ratio:2.0}%</span>
</div>
</div>
</div>
"#,
        top = 100.0 - height,
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css() -> &'static str {
    r#"
img {
    width: 400px;
}
div.item {
    float: left;
    padding: 10px;
}
#content {
    padding: 10px;
}
div.ratings {
    padding: 5px;
}
hr.clear, br.clear {
    clear: both;
}
.chart {
    width: 500px;
    background: #fff;
    overflow: hidden;
    float: left;
    padding: 10px;
}
.progress-bar {
    float: left;
    height: 300px;
    width: 40px;
    margin-right: 25px;
}
.progress-track {
    position: relative;
    width: 40px;
    height: 100%;
    background: #ebebeb;
}
.progress-fill {
    position: relative;
    background: #825;
    width: 40px;
    color: #fff;
    text-align: center;
    font-family: "Lato", "Verdana", sans-serif;
    font-size: 12px;
    line-height: 20px;
}
"#
}
