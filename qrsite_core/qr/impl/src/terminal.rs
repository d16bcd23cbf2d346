use qrcode::render::unicode::Dense1x2;

use crate::encode_symbol;

/// Renders the payload with unicode half blocks, two modules per character
/// cell. Colors are inverted for dark terminal backgrounds.
pub fn render(payload: &str) -> anyhow::Result<String> {
    Ok(encode_symbol(payload)?
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square() {
        let rendered = render("hello").unwrap();

        let lines = rendered.lines().collect::<Vec<_>>();
        let width = lines[0].chars().count();
        assert!(width > 21);
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(lines.len() < width);
    }

    #[test]
    fn too_long() {
        assert!(render(&"ü".repeat(2000)).is_err());
    }
}
