//! Server-rendered pages. Small HTML shells; the watch-list tables load
//! their rows from the JSON API so a slow batch never blocks the page.

use crate::constants::DAILY_CHART_LOOKBACK_DAYS;
use crate::models::{Advice, DailySeries, StockSnapshot};
use crate::server::AppState;
use crate::services::{all_averages, daily_series};
use axum::{
    extract::{Form, Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::warn;

const AVERAGE_LABELS: &[&str] = &["5d", "20d", "50d", "100d", "200d", "200w"];

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn page_shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #222; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.7rem; text-align: left; }}
input[type=text] {{ padding: 0.4rem; width: 16rem; }}
button {{ padding: 0.4rem 1rem; }}
.rec-buy {{ color: #0a7f2e; font-weight: bold; }}
.rec-avoid {{ color: #b00020; font-weight: bold; }}
.rec-neutral {{ color: #555; font-weight: bold; }}
.flash {{ color: #b00020; }}
</style>
</head>
<body>
<nav>
<a href="/">Lookup</a>
<a href="/stocks">All stocks</a>
<a href="/fno">F&amp;O</a>
<a href="/nifty50">NIFTY 50</a>
<a href="/nifty-next-50">NIFTY Next 50</a>
</nav>
{body}
</body>
</html>"#
    ))
}

fn render_form(message: Option<&str>) -> Html<String> {
    let flash = match message {
        Some(message) => format!("<p class=\"flash\">{}</p>", html_escape(message)),
        None => String::new(),
    };
    let body = format!(
        r#"<h1>200-week average check</h1>
{flash}
<form method="post" action="/">
<input type="text" name="ticker" placeholder="e.g. RELIANCE or AAPL" autofocus>
<button type="submit">Check</button>
</form>
<p>Enter an NSE symbol (the .NS suffix is added automatically when needed), an index like ^NSEI, or a foreign symbol.</p>"#
    );
    page_shell("200-week average check", &body)
}

fn render_result(snapshot: &StockSnapshot, chart: &DailySeries) -> Html<String> {
    let rows: String = AVERAGE_LABELS
        .iter()
        .map(|&label| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                label,
                fmt_opt(snapshot.averages.get(label).copied().flatten())
            )
        })
        .collect();

    let rec_class = match snapshot.recommendation.kind {
        Advice::Buy => "rec-buy",
        Advice::Avoid => "rec-avoid",
        Advice::Neutral => "rec-neutral",
    };

    let dates_json = serde_json::to_string(&chart.dates).unwrap_or_else(|_| "[]".to_string());
    let closes_json = serde_json::to_string(&chart.closes).unwrap_or_else(|_| "[]".to_string());

    let body = format!(
        r##"<h1>{ticker}</h1>
<p class="{rec_class}">{rec_text}</p>
<table>
<tr><th>Latest price</th><td>{latest}</td></tr>
<tr><th>200-week average</th><td>{avg200w}</td></tr>
<tr><th>Distance from 200-week average</th><td>{diff}</td></tr>
<tr><th>Weeks of history used</th><td>{weeks_used} of {weeks_available} available</td></tr>
<tr><th>52-week high / low</th><td>{high} / {low}</td></tr>
</table>
<h2>Trailing averages</h2>
<table><tr><th>Window</th><th>Average</th></tr>{rows}</table>
<h2>Last year of closes</h2>
<canvas id="chart" width="820" height="260"></canvas>
<script>
const dates = {dates_json};
const closes = {closes_json};
const canvas = document.getElementById("chart");
const ctx = canvas.getContext("2d");
if (closes.length > 1) {{
  const min = Math.min(...closes), max = Math.max(...closes);
  const span = (max - min) || 1;
  ctx.strokeStyle = "#1565c0";
  ctx.beginPath();
  closes.forEach((c, i) => {{
    const x = i / (closes.length - 1) * (canvas.width - 20) + 10;
    const y = canvas.height - 20 - (c - min) / span * (canvas.height - 40);
    i === 0 ? ctx.moveTo(x, y) : ctx.lineTo(x, y);
  }});
  ctx.stroke();
  ctx.fillStyle = "#555";
  ctx.fillText(dates[0], 10, canvas.height - 5);
  ctx.fillText(dates[dates.length - 1], canvas.width - 80, canvas.height - 5);
}} else {{
  ctx.fillText("No chart data", 10, 20);
}}
</script>
<p><a href="/">Check another ticker</a></p>"##,
        ticker = html_escape(&snapshot.ticker),
        rec_text = html_escape(&snapshot.recommendation.text),
        latest = fmt_opt(snapshot.latest_price),
        avg200w = fmt_opt(snapshot.averages.get("200w").copied().flatten()),
        diff = match snapshot.diff_pct {
            Some(d) => format!("{:+.2}%", d),
            None => "-".to_string(),
        },
        weeks_used = snapshot.weeks_used,
        weeks_available = snapshot.weeks_available,
        high = fmt_opt(snapshot.fifty_two_week_high),
        low = fmt_opt(snapshot.fifty_two_week_low),
    );
    page_shell(&snapshot.ticker, &body)
}

async fn lookup_and_render(state: &AppState, raw_ticker: &str) -> Html<String> {
    let ticker = raw_ticker.trim();
    if ticker.is_empty() {
        return render_form(Some("Please enter a ticker symbol."));
    }

    match all_averages(state.market.as_ref(), ticker).await {
        Ok(snapshot) => {
            // Chart data is decoration; a failed fetch renders an empty chart
            let chart = match daily_series(
                state.market.as_ref(),
                &snapshot.ticker,
                DAILY_CHART_LOOKBACK_DAYS,
            )
            .await
            {
                Ok(chart) => chart,
                Err(e) => {
                    warn!(ticker = %snapshot.ticker, error = %e, "Chart series fetch failed");
                    DailySeries::empty()
                }
            };
            render_result(&snapshot, &chart)
        }
        Err(e) => render_form(Some(&format!("Error fetching data for '{}': {}", ticker, e))),
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub ticker: Option<String>,
}

/// GET / - the lookup form, or a result when ?ticker= is given
pub async fn home_page(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> Html<String> {
    match params.ticker {
        Some(ticker) if !ticker.trim().is_empty() => lookup_and_render(&state, &ticker).await,
        _ => render_form(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeForm {
    #[serde(default)]
    pub ticker: String,
}

/// POST / - form submission
pub async fn home_submit(
    State(state): State<AppState>,
    Form(form): Form<HomeForm>,
) -> Html<String> {
    lookup_and_render(&state, &form.ticker).await
}

fn render_watchlist_page(title: &str, endpoint: &str) -> Html<String> {
    let body = format!(
        r##"<h1>{title}</h1>
<input type="text" id="filter" placeholder="Filter by symbol prefix">
<button onclick="load()">Load</button>
<p id="status"></p>
<table id="list" hidden>
<thead><tr><th>Symbol</th><th>Price</th><th>200-week average</th><th>Status</th></tr></thead>
<tbody></tbody>
</table>
<script>
async function load() {{
  const q = document.getElementById("filter").value.trim();
  const status = document.getElementById("status");
  status.textContent = "Loading (this fans out one fetch per symbol)...";
  const res = await fetch("{endpoint}" + (q ? "?q=" + encodeURIComponent(q) : ""));
  const data = await res.json();
  const rows = data.stocks.sort((a, b) => a.symbol.localeCompare(b.symbol));
  const tbody = document.querySelector("#list tbody");
  tbody.innerHTML = "";
  for (const s of rows) {{
    const tr = document.createElement("tr");
    const price = s.price == null ? "-" : s.price.toFixed(2);
    const avg = s.avg_200w == null ? "-" : s.avg_200w.toFixed(2);
    tr.innerHTML = "<td><a href='/?ticker=" + encodeURIComponent(s.symbol) + "'>" + s.symbol + "</a></td>" +
      "<td>" + price + "</td><td>" + avg + "</td><td>" + s.status + "</td>";
    tbody.appendChild(tr);
  }}
  status.textContent = rows.length + " stocks";
  document.getElementById("list").hidden = false;
}}
</script>"##
    );
    page_shell(title, &body)
}

/// GET /fno
pub async fn fno_page() -> Html<String> {
    render_watchlist_page("F&O stocks", "/api/fno-stocks")
}

/// GET /nifty50
pub async fn nifty50_page() -> Html<String> {
    render_watchlist_page("NIFTY 50", "/api/nifty-stocks")
}

/// GET /nifty-next-50
pub async fn nifty_next_50_page() -> Html<String> {
    render_watchlist_page("NIFTY Next 50", "/api/nifty-next-50-stocks")
}

/// GET /stocks - directory search over all NSE-listed symbols
pub async fn stocks_page() -> Html<String> {
    let body = r#"<h1>All NSE stocks</h1>
<input type="text" id="q" placeholder="Symbol or company name">
<ul id="hits"></ul>
<script>
const input = document.getElementById("q");
const hits = document.getElementById("hits");
let timer = null;
input.addEventListener("input", () => {
  clearTimeout(timer);
  timer = setTimeout(async () => {
    const q = input.value.trim();
    if (!q) { hits.innerHTML = ""; return; }
    const res = await fetch("/api/search?q=" + encodeURIComponent(q) + "&limit=20");
    const entries = await res.json();
    hits.innerHTML = entries.map(e =>
      "<li><a href='/?ticker=" + encodeURIComponent(e.symbol) + "'>" + e.symbol + "</a> - " + e.name + "</li>"
    ).join("");
  }, 200);
});
</script>"#;
    page_shell("All NSE stocks", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("A&B <x>\"q\""), "A&amp;B &lt;x&gt;&quot;q&quot;");
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(12.345)), "12.35");
        assert_eq!(fmt_opt(None), "-");
    }
}
