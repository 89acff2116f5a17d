//! Welcome banner: "PILI" in figlet with an electric yellow-to-blue gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Electric yellow (#ffd400).
const ELECTRIC_YELLOW: (u8, u8, u8) = (0xff, 0xd4, 0x00);
/// Cable blue (#1e90ff).
const CABLE_BLUE: (u8, u8, u8) = (0x1e, 0x90, 0xff);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Banner text lines. Plain "PILI" when the font is unavailable.
fn banner_lines() -> Vec<String> {
    figlet_lines("PILI").unwrap_or_else(|| vec!["PILI".to_string()])
}

fn figlet_lines(text: &str) -> Option<Vec<String>> {
    let font = FIGfont::standard().ok()?;
    let figure = font.convert(text)?;
    Some(figure.to_string().lines().map(str::to_string).collect())
}

/// Prints the banner, then the company line and version.
pub fn print_welcome(company_name: &str) {
    let mut out = stdout();
    let lines = banner_lines();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(ELECTRIC_YELLOW, CABLE_BLUE, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: CABLE_BLUE.0,
        g: CABLE_BLUE.1,
        b: CABLE_BLUE.2,
    }));
    let _ = out.execute(Print(format!(
        "Cotizador PILI v{} | {}\r\n",
        env!("CARGO_PKG_VERSION"),
        company_name
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints() {
        assert_eq!(lerp_rgb(ELECTRIC_YELLOW, CABLE_BLUE, 0.0), ELECTRIC_YELLOW);
        assert_eq!(lerp_rgb(ELECTRIC_YELLOW, CABLE_BLUE, 1.0), CABLE_BLUE);
    }

    #[test]
    fn banner_is_not_empty() {
        assert!(!banner_lines().is_empty());
    }
}
