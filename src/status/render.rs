//! Status page rendering.

use super::StatusView;
use std::fmt::Write;

const STYLE: &str = "body { font-size: 26px; font-family: Roboto; }
            th { text-align: left; }
            th, td { padding-right: 1em; }
            .current-deck { color: yellow; }";

/// Full HTML page; reloads itself every `refresh_secs` seconds
pub fn html(view: &StatusView, refresh_secs: u32) -> String {
    let mut rows = String::new();
    for row in &view.decks {
        let class = if view.current_deck.as_deref() == Some(row.deck.as_str()) {
            " class=\"current-deck\""
        } else {
            ""
        };
        // Writing to a String cannot fail
        let _ = write!(
            rows,
            "                <tr>\n                    <td{}>{}</td>\n                    <td>{}</td>\n                    <td>{}</td>\n                    <td>{}%</td>\n                </tr>\n",
            class,
            escape_html(&row.deck),
            row.wins,
            row.losses,
            row.win_rate
        );
    }

    format!(
        "<!doctype html>
<html>
    <head>
        <title>Deck Stats</title>
        <style>
            {style}
        </style>
        <script>
            setTimeout(function() {{ location.reload(); }}, {refresh_ms});
        </script>
    </head>
    <body>
        <table>
            <thead>
                <tr><th>Deck</th><th>Wins</th><th>Losses</th><th>WR</th></tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
    </body>
</html>
",
        style = STYLE,
        refresh_ms = u64::from(refresh_secs) * 1000,
        rows = rows,
    )
}

pub fn json(view: &StatusView) -> Result<String, serde_json::Error> {
    serde_json::to_string(view)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
