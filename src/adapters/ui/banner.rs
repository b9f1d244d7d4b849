//! Startup banner: shop name in FIGlet letters faded from signal red to workshop
//! blue, followed by the service line.

use crossterm::QueueableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

const BANNER_TEXT: &str = "BODYSHOP";

/// Services the shop advertises under the logo.
const SERVICES: [&str; 4] = ["кузовной ремонт", "покраска", "рихтовка", "полировка"];

/// Signal red (#e53935).
const SIGNAL_RED: (u8, u8, u8) = (0xe5, 0x39, 0x35);
/// Workshop blue (#1e63d6).
const WORKSHOP_BLUE: (u8, u8, u8) = (0x1e, 0x63, 0xd6);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the logo with a left-to-right red-to-blue fade, then the service
/// line. Falls back to plain text if the built-in font cannot render.
pub fn print_welcome() {
    let mut out = stdout();
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(BANNER_TEXT).map(|f| f.to_string()))
        .unwrap_or_else(|| BANNER_TEXT.to_string());
    let width = art.lines().map(|l| l.chars().count()).max().unwrap_or(0);

    for line in art.lines() {
        for (col, ch) in line.chars().enumerate() {
            let (r, g, b) = lerp_rgb(SIGNAL_RED, WORKSHOP_BLUE, column_t(col, width));
            let _ = out.queue(SetForegroundColor(Color::Rgb { r, g, b }));
            let _ = out.queue(Print(ch));
        }
        let _ = out.queue(ResetColor);
        let _ = out.queue(Print("\r\n"));
    }

    let (r, g, b) = WORKSHOP_BLUE;
    let _ = out.queue(SetForegroundColor(Color::Rgb { r, g, b }));
    let _ = out.queue(Print(format!("{}\r\n", tagline())));
    let _ = out.queue(ResetColor);
    let _ = out.queue(Print(format!(
        "Приём заявок · v{}\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.flush();
}

/// Position of `col` across a logo `width` columns wide, in [0.0, 1.0].
fn column_t(col: usize, width: usize) -> f64 {
    if width <= 1 {
        0.0
    } else {
        col.min(width - 1) as f64 / (width - 1) as f64
    }
}

/// Service list as one line, e.g. `кузовной ремонт · покраска · ...`.
fn tagline() -> String {
    SERVICES.join(" · ")
}
