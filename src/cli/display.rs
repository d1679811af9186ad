// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the folio CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `FOLIO_THEME` first, then `COLORFGBG`, then macOS system appearance, then
//! falls back to dark. `NO_COLOR` and non-TTY stdout turn colour off entirely,
//! so piped output is plain text.
//!
//! # Theme detection order
//!
//! 1. `FOLIO_THEME` env var ("dark" or "light")
//! 2. `COLORFGBG` env var (terminal background hint)
//! 3. macOS appearance (via defaults read)
//! 4. Default to dark theme

use std::path::Path;
use std::sync::OnceLock;

use folio::{BuildReport, CorpusStats, SearchResponse};
use regex::RegexBuilder;

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

/// Contexts printed per hit; the rest are summarised.
pub const CONTEXTS_SHOWN: usize = 3;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Terminal color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Cached theme detection result
static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("FOLIO_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and up (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.contains("Dark") && output.status.success() {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

/// Get the current theme (cached)
pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// ONEDARK / ONE LIGHT COLOR PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════
//
// OneDark: https://github.com/joshdick/onedark.vim
// One Light: https://github.com/sonph/onehalf

/// True color escape sequence helper
fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
}

pub use colors::*;

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117); // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121); // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123); // #e5c07b
    pub const BLUE: (u8, u8, u8) = (97, 175, 239); // #61afef
    pub const CYAN: (u8, u8, u8) = (86, 182, 194); // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112); // #5c6370
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73); // #e45649
    pub const GREEN: (u8, u8, u8) = (80, 161, 79); // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1); // #c18401
    pub const BLUE: (u8, u8, u8) = (64, 120, 242); // #4078f2
    pub const CYAN: (u8, u8, u8) = (1, 132, 188); // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167); // #a0a1a7
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

// ═══════════════════════════════════════════════════════════════════════════
// THEME-AWARE COLOR ACCESSORS
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Border color, or nothing when output is plain.
fn border(color_fn: fn() -> String) -> String {
    if use_colors() {
        color_fn()
    } else {
        String::new()
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    let b = border(GRAY);
    println!("{b}│{r}{content}{}{b}│{r}", " ".repeat(pad), r = reset());
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    let b = border(GRAY);
    println!("{b}┌{r}{label_part}{b}{}┐{r}", "─".repeat(remaining), r = reset());
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", border(GRAY), "─".repeat(BOX_WIDTH), reset());
}

/// Print double-line header: ╔══════════════════╗
pub fn double_header() {
    println!("{}╔{}╗{}", border(BLUE), "═".repeat(BOX_WIDTH), reset());
}

/// Print double-line footer: ╚══════════════════╝
pub fn double_footer() {
    println!("{}╚{}╝{}", border(BLUE), "═".repeat(BOX_WIDTH), reset());
}

/// Print centered title with bold
pub fn title(text: &str) {
    let colored = themed(BRIGHT_CYAN, &[BOLD], text);
    let total_pad = BOX_WIDTH.saturating_sub(visible_len(&colored));
    let left_pad = total_pad / 2;
    let b = border(BLUE);
    println!(
        "{b}║{r}{}{colored}{}{b}║{r}",
        " ".repeat(left_pad),
        " ".repeat(total_pad - left_pad),
        r = reset()
    );
}

/// Print a full-width rule: ════════════════════
pub fn rule() {
    println!("{}{}{}", border(GRAY), "═".repeat(BOX_WIDTH + 2), reset());
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Words of a match label worth highlighting. Operator words and the
/// proximity separator are not.
fn label_words(matched: &str) -> Vec<&str> {
    matched
        .split(|c: char| c.is_whitespace() || c == '"' || c == '.')
        .filter(|w| !w.is_empty() && !matches!(*w, "AND" | "OR"))
        .collect()
}

/// Wrap every occurrence of the label's words in `open`/`close`,
/// case-insensitively.
pub fn mark(context: &str, matched: &str, open: &str, close: &str) -> String {
    let words = label_words(matched);
    if words.is_empty() {
        return context.to_string();
    }
    let pattern = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re
            .replace_all(context, |caps: &regex::Captures| {
                format!("{}{}{}", open, &caps[0], close)
            })
            .into_owned(),
        Err(_) => context.to_string(),
    }
}

fn highlight(context: &str, matched: &str) -> String {
    if !use_colors() {
        return context.to_string();
    }
    let open = format!("{}{}", BOLD, YELLOW());
    mark(context, matched, &open, RESET)
}

/// Collapse the newlines and page breaks of extracted text onto one line.
fn one_line(context: &str) -> String {
    context.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub fn print_results(response: &SearchResponse) {
    for warning in &response.warnings {
        println!("{}", themed(YELLOW, &[], &format!("⚠ {}", warning)));
    }
    if response.results.is_empty() {
        if response.total == 0 {
            println!("\nNo results found.");
        } else {
            println!(
                "\nPage {} is past the end ({} result(s)).",
                response.page, response.total
            );
        }
        return;
    }

    println!();
    rule();
    println!(
        "Found {} document(s) with {} total match(es)",
        themed(GREEN, &[BOLD], &response.total.to_string()),
        themed(GREEN, &[BOLD], &response.total_matches.to_string())
    );
    let first = (response.page - 1) * response.per_page + 1;
    if response.total > response.results.len() {
        let pages = response.total.div_ceil(response.per_page);
        println!(
            "{}",
            themed(
                GRAY,
                &[],
                &format!(
                    "Showing {}-{} (page {} of {})",
                    first,
                    first + response.results.len() - 1,
                    response.page,
                    pages
                )
            )
        );
    }
    rule();
    println!();

    for (i, hit) in response.results.iter().enumerate() {
        println!(
            "{}. {} (Data Set {})",
            first + i,
            themed(BLUE, &[BOLD], &hit.filename),
            hit.dataset
        );
        println!("   Pages: {} | Matches: {}", hit.pages, hit.match_count);
        println!("   Path: {}", themed(GRAY, &[], &hit.filepath));

        let shown = hit.contexts.len().min(CONTEXTS_SHOWN);
        for (j, ctx) in hit.contexts.iter().take(shown).enumerate() {
            let page = ctx.page.map(|p| format!(" (Page {})", p)).unwrap_or_default();
            println!("\n   {}{}:", themed(CYAN, &[], &format!("Match {}", j + 1)), page);
            println!("   {}", highlight(&one_line(&ctx.context), &ctx.matched));
        }

        let remaining = hit.match_count.max(hit.contexts.len()).saturating_sub(shown);
        if remaining > 0 {
            println!("\n   ... and {} more match(es)", remaining);
        }
        println!();
    }
}

pub fn print_build_report(target: &Path, report: &BuildReport) {
    section_top("INDEX BUILT");
    row(&format!(" Documents indexed  {}", themed(GREEN, &[BOLD], &report.indexed.to_string())));
    let skipped = if report.errors > 0 {
        themed(RED, &[], &report.errors.to_string())
    } else {
        report.errors.to_string()
    };
    row(&format!(" Records skipped    {}", skipped));
    row(&format!(" Batches committed  {}", report.batches));
    row(&format!(" Index size         {}", format_size(report.db_size_bytes)));
    row(&format!(" Elapsed            {:.2}s", report.elapsed.as_secs_f64()));
    row(&format!(" Location           {}", target.display()));
    section_bot();
}

pub fn print_existing_index(target: &Path) {
    println!(
        "Index already exists at {} (use --force to rebuild)",
        themed(CYAN, &[], &target.display().to_string())
    );
}

pub fn print_stats(backend: &str, stats: &CorpusStats) {
    section_top("CORPUS");
    row(&format!(" Backend    {}", backend));
    row(&format!(" Documents  {}", themed(GREEN, &[BOLD], &stats.total_docs.to_string())));
    row(&format!(" Pages      {}", themed(GREEN, &[BOLD], &stats.total_pages.to_string())));
    section_bot();
}

pub fn print_shell_banner(backend: &str, stats: &CorpusStats) {
    double_header();
    title("FOLIO INTERACTIVE SEARCH");
    double_footer();
    println!(
        "{} documents, {} pages ({} backend)",
        stats.total_docs, stats.total_pages, backend
    );
    println!(
        "{}",
        themed(
            GRAY,
            &[],
            "Quoted phrases, AND, OR, NOT and NEAR/N work. Type 'quit' to exit."
        )
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
